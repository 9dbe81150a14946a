//! HLS playlist parser.
//!
//! Turns an M3U8 document, either a master or a media playlist, into a
//! [`Playlist`]. Malformed tags are dropped with a warning through the `log`
//! facade; only a missing `#EXTM3U` header fails the whole parse.
//!
//! ```
//! let data = "#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:9.009,\nfirst.ts\n#EXT-X-ENDLIST\n";
//! let base = url::Url::parse("http://media.example.com/index.m3u8").unwrap();
//!
//! let playlist = iori_m3u8::parse_str(data, Some(&base)).unwrap();
//! assert!(playlist.is_endlist);
//! assert_eq!(playlist.segments[0].uri, "http://media.example.com/first.ts");
//! ```

pub mod attributes;
pub mod decode;
pub mod error;
pub mod parser;
pub mod playlist;
pub mod registry;
pub mod tags;
pub mod uri;

pub use error::{M3u8Error, M3u8Result};
pub use parser::{associate_media, M3u8Parser, ParserState};
pub use playlist::*;
pub use registry::{TagHandler, TagRegistry};

use url::Url;

fn parser(base_uri: Option<&Url>) -> M3u8Parser<'static> {
    match base_uri {
        Some(base_uri) => M3u8Parser::new().with_base_uri(base_uri.clone()),
        None => M3u8Parser::new(),
    }
}

/// Parses a playlist from its lines with the built-in tag set.
///
/// Relative URIs are resolved against `base_uri` when given.
pub fn parse<I, S>(lines: I, base_uri: Option<&Url>) -> M3u8Result<Playlist>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parser(base_uri).parse_lines(lines)
}

pub fn parse_str(data: &str, base_uri: Option<&Url>) -> M3u8Result<Playlist> {
    parser(base_uri).parse_str(data)
}
