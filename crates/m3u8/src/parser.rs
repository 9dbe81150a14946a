use std::{io::BufRead, sync::LazyLock};

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use url::Url;

use crate::{
    attributes::Attributes,
    error::{M3u8Error, M3u8Result},
    playlist::{ByteRange, ExtInf, Key, Map, Playlist, Segment, Variant},
    registry::{TagRegistry, DEFAULT_REGISTRY},
    tags, uri,
};

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?P<tag>[\w-]+)(?::(?P<value>.+))?").unwrap());

const HEADER: &str = "#EXTM3U";

/// The playlist under construction, together with the tag values waiting for
/// the next URI line.
///
/// Tag handlers receive this state mutably.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    pub playlist: Playlist,

    /// The next URI line is a media segment.
    pub expect_segment: bool,
    /// A URI line is a variant stream, unless a segment is expected first.
    pub expect_variant: bool,

    /// Attributes of the last `EXT-X-STREAM-INF`.
    pub stream_info: Option<Attributes>,

    pub extinf: Option<ExtInf>,
    pub byte_range: Option<ByteRange>,
    pub discontinuity: bool,
    pub date: Option<DateTime<FixedOffset>>,

    /// Applies to every following segment until replaced.
    pub key: Option<Key>,
    /// Applies to every following segment until replaced or a discontinuity.
    pub map: Option<Map>,
}

impl ParserState {
    pub fn new(base_uri: Option<Url>) -> Self {
        Self {
            playlist: Playlist::new(base_uri),
            ..Default::default()
        }
    }

    /// Resolves a URI reference against the playlist location.
    pub fn uri(&self, reference: &str) -> String {
        uri::resolve(self.playlist.base_uri.as_ref(), reference)
    }

    /// Handles a single non-empty line following the header.
    pub fn parse_line(&mut self, registry: &TagRegistry, line: &str) {
        if line.starts_with('#') {
            let Some(caps) = TAG_REGEX.captures(line) else {
                return;
            };
            let tag = &caps["tag"];
            let Some(handler) = registry.get(tag) else {
                log::debug!("Ignored unsupported tag: {tag}");
                return;
            };

            let value = caps.name("value").map_or("", |m| m.as_str().trim());
            handler(self, value);
            return;
        }

        if self.expect_segment {
            self.expect_segment = false;
            let uri = self.uri(line);
            let segment = self.take_segment(uri);
            self.playlist.segments.push(segment);
        } else if self.expect_variant {
            self.expect_variant = false;
            let uri = self.uri(line);
            let variant = self.take_variant(uri);
            self.playlist.variants.push(variant);
        } else {
            log::debug!("Ignored unexpected URI line: {line}");
        }
    }

    fn take_segment(&mut self, uri: String) -> Segment {
        let extinf = self.extinf.take().unwrap_or_default();

        Segment {
            uri,
            duration: extinf.duration,
            title: extinf.title,
            key: self.key.clone(),
            discontinuity: std::mem::take(&mut self.discontinuity),
            byte_range: self.byte_range.take(),
            date: self.date.take(),
            map: self.map.clone(),
        }
    }

    fn take_variant(&mut self, uri: String) -> Variant {
        let attributes = self.stream_info.take().unwrap_or_default();

        Variant {
            uri,
            stream_info: tags::stream_info(&attributes),
            media: Vec::new(),
            is_iframe: false,
        }
    }

    /// Links media groups to variants and returns the finished playlist.
    pub fn finish(mut self) -> Playlist {
        associate_media(&mut self.playlist);
        self.playlist
    }
}

/// Appends to each variant every rendition of the audio, video and subtitles
/// groups it refers to, in declaration order.
///
/// A rendition referred to through multiple groups is appended once per group.
pub fn associate_media(playlist: &mut Playlist) {
    let Playlist {
        media, variants, ..
    } = playlist;

    for variant in variants.iter_mut() {
        for group_id in variant.stream_info.group_ids().into_iter().flatten() {
            if group_id.is_empty() {
                continue;
            }
            let renditions: Vec<_> = media
                .iter()
                .filter(|m| m.group_id == group_id)
                .cloned()
                .collect();
            variant.media.extend(renditions);
        }
    }

    playlist.is_master = !playlist.variants.is_empty();
}

/// Feeds lines into a [`ParserState`], checking the header first.
struct LineParser<'a> {
    registry: &'a TagRegistry,
    state: ParserState,
    header_seen: bool,
}

impl<'a> LineParser<'a> {
    fn new(registry: &'a TagRegistry, base_uri: Option<Url>) -> Self {
        Self {
            registry,
            state: ParserState::new(base_uri),
            header_seen: false,
        }
    }

    fn feed(&mut self, line: &str) -> M3u8Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if !self.header_seen {
            if !line.starts_with(HEADER) {
                let line: String = line.chars().take(250).collect();
                log::warn!("Malformed HLS Playlist. Expected {HEADER}, but got {line}");
                return Err(M3u8Error::MissingHeader(line));
            }
            self.header_seen = true;
            return Ok(());
        }

        log::trace!("{line}");
        self.state.parse_line(self.registry, line);
        Ok(())
    }

    fn finish(self) -> Playlist {
        self.state.finish()
    }
}

/// Parser configuration: where relative URIs are resolved against, and which
/// tags are understood.
#[derive(Debug, Clone)]
pub struct M3u8Parser<'a> {
    base_uri: Option<Url>,
    registry: &'a TagRegistry,
}

impl Default for M3u8Parser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl M3u8Parser<'static> {
    pub fn new() -> Self {
        Self {
            base_uri: None,
            registry: &DEFAULT_REGISTRY,
        }
    }
}

impl<'a> M3u8Parser<'a> {
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    pub fn with_registry<'r>(self, registry: &'r TagRegistry) -> M3u8Parser<'r> {
        M3u8Parser {
            base_uri: self.base_uri,
            registry,
        }
    }

    fn line_parser(&self) -> LineParser<'a> {
        LineParser::new(self.registry, self.base_uri.clone())
    }

    pub fn parse_str(&self, data: &str) -> M3u8Result<Playlist> {
        self.parse_lines(data.lines())
    }

    pub fn parse_lines<I, S>(&self, lines: I) -> M3u8Result<Playlist>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parser = self.line_parser();
        for line in lines {
            parser.feed(line.as_ref())?;
        }
        Ok(parser.finish())
    }

    /// Parses lines pulled from a blocking reader. Read errors abort parsing.
    pub fn parse_reader<R>(&self, reader: R) -> M3u8Result<Playlist>
    where
        R: BufRead,
    {
        let mut parser = self.line_parser();
        for line in reader.lines() {
            parser.feed(&line?)?;
        }
        Ok(parser.finish())
    }

    /// Parses lines pulled from an async reader, such as a response body stream.
    #[cfg(feature = "tokio")]
    pub async fn parse_async_reader<R>(&self, reader: R) -> M3u8Result<Playlist>
    where
        R: tokio::io::AsyncBufRead + Unpin,
    {
        use tokio::io::AsyncBufReadExt;

        let mut parser = self.line_parser();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            parser.feed(&line)?;
        }
        Ok(parser.finish())
    }
}
