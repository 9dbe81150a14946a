use std::path::PathBuf;

use clap::Parser;
use iori_m3u8::{M3u8Parser, Playlist, Segment, Variant};
use tokio::io::{AsyncBufRead, BufReader};
use url::Url;

#[derive(Parser, Debug, Clone)]
#[clap(version, author)]
/// Prints a summary of an HLS playlist.
pub struct InspectArgs {
    /// Location of the playlist, used to resolve relative URIs.
    #[clap(long, env = "M3U8_BASE_URI")]
    pub base_uri: Option<Url>,

    /// Debug output
    #[clap(long, alias = "debug")]
    pub verbose: bool,

    /// The playlist file to read. If not specified, the playlist is read from stdin.
    pub input: Option<PathBuf>,
}

impl InspectArgs {
    async fn reader(&self) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin>> {
        Ok(match &self.input {
            Some(input) => Box::new(BufReader::new(tokio::fs::File::open(input).await?)),
            None => Box::new(BufReader::new(tokio::io::stdin())),
        })
    }
}

fn print_header(playlist: &Playlist) {
    let kind = if playlist.is_master { "master" } else { "media" };
    println!("Playlist: {kind}");
    if let Some(base_uri) = &playlist.base_uri {
        println!("  base uri: {base_uri}");
    }
    if let Some(version) = playlist.version {
        println!("  version: {version}");
    }
    if let Some(target_duration) = playlist.target_duration {
        println!("  target duration: {target_duration}");
    }
    if let Some(media_sequence) = playlist.media_sequence {
        println!("  media sequence: {media_sequence}");
    }
    if let Some(discontinuity_sequence) = playlist.discontinuity_sequence {
        println!("  discontinuity sequence: {discontinuity_sequence}");
    }
    if let Some(playlist_type) = &playlist.playlist_type {
        println!("  type: {playlist_type}");
    }
    if let Some(start) = playlist.start {
        println!(
            "  start: {} (precise: {})",
            start.time_offset, start.precise
        );
    }
    if playlist.iframes_only == Some(true) {
        println!("  i-frames only");
    }
    if !playlist.date_ranges.is_empty() {
        println!("  date ranges: {}", playlist.date_ranges.len());
    }
    println!("  endlist: {}", playlist.is_endlist);
}

fn print_variant(index: usize, variant: &Variant) {
    let info = &variant.stream_info;
    let kind = if variant.is_iframe { " (i-frame)" } else { "" };
    println!("#{index}{kind} {}", variant.uri);
    println!("  bandwidth: {}", info.bandwidth());
    if let Some(resolution) = info.resolution() {
        println!("  resolution: {}x{}", resolution.width, resolution.height);
    }
    if !info.codecs().is_empty() {
        println!("  codecs: {}", info.codecs().join(", "));
    }
    for media in &variant.media {
        print!(
            "  media: [{}] {} / {}",
            media.media_type.as_str(),
            media.group_id,
            media.name
        );
        if let Some(language) = &media.language {
            print!(" ({language})");
        }
        match &media.uri {
            Some(uri) => println!(" {uri}"),
            None => println!(),
        }
    }
}

fn print_segment(index: usize, segment: &Segment) {
    let mut flags = Vec::new();
    if segment.discontinuity {
        flags.push("discontinuity".to_string());
    }
    if let Some(key) = &segment.key {
        flags.push(format!("key={}", key.method));
    }
    if let Some(range) = segment.byte_range {
        flags.push(format!("range={}@{}", range.length, range.offset.unwrap_or_default()));
    }

    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    println!("#{index} {:>8.3}s {}{flags}", segment.duration, segment.uri);
}

fn print_playlist(playlist: &Playlist) {
    print_header(playlist);

    if !playlist.variants.is_empty() {
        println!("Variants: {}", playlist.variants.len());
        for (index, variant) in playlist.variants.iter().enumerate() {
            print_variant(index, variant);
        }
    }

    if !playlist.segments.is_empty() {
        println!(
            "Segments: {} ({:.3}s)",
            playlist.segments.len(),
            playlist.total_duration()
        );
        for (index, segment) in playlist.segments.iter().enumerate() {
            print_segment(index, segment);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = InspectArgs::parse();

    pretty_env_logger::formatted_builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let parser = match args.base_uri.clone() {
        Some(base_uri) => M3u8Parser::new().with_base_uri(base_uri),
        None => M3u8Parser::new(),
    };
    let reader = args.reader().await?;
    let playlist = parser.parse_async_reader(reader).await?;
    log::debug!(
        "Parsed {} variants and {} segments",
        playlist.variants.len(),
        playlist.segments.len()
    );

    print_playlist(&playlist);

    Ok(())
}
