use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, TimeDelta};
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub width: u64,
    pub height: u64,
}

/// `EXTINF`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtInf {
    pub duration: f64,
    pub title: Option<String>,
}

/// `EXT-X-BYTERANGE`, or the `BYTERANGE` attribute of `EXT-X-MAP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub length: u64,
    /// `None` means the range starts right after the previous one.
    pub offset: Option<u64>,
}

impl ByteRange {
    /// Exclusive end offset. `fallback_offset` is used when no offset is specified,
    /// usually the end of the previous range of the same resource.
    pub fn end(&self, fallback_offset: u64) -> u64 {
        self.offset
            .unwrap_or(fallback_offset)
            .saturating_add(self.length)
    }

    pub fn to_http_range(&self, fallback_offset: u64) -> String {
        let start = self.offset.unwrap_or(fallback_offset);
        if self.length == 0 {
            format!("bytes={start}-")
        } else {
            format!("bytes={}-{}", start, start.saturating_add(self.length - 1))
        }
    }
}

/// `EXT-X-KEY`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub method: String,
    pub uri: Option<String>,
    pub iv: Option<Vec<u8>>,
    pub key_format: Option<String>,
    pub key_format_versions: Option<String>,
}

/// `EXT-X-MAP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub uri: String,
    pub byte_range: Option<ByteRange>,
}

/// `EXT-X-DATERANGE`
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub id: Option<String>,
    pub class: Option<String>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub duration: Option<TimeDelta>,
    pub planned_duration: Option<TimeDelta>,
    pub end_on_next: bool,
    /// Remaining attributes, keyed by name: `X-<client-attribute>` values and
    /// `SCTE35-*` markers.
    pub client_attributes: HashMap<String, String>,
}

impl DateRange {
    /// `END-DATE` if present, otherwise derived from `DURATION` or `PLANNED-DURATION`.
    pub fn effective_end(&self) -> Option<DateTime<FixedOffset>> {
        if self.end_date.is_some() {
            return self.end_date;
        }

        let start = self.start_date?;
        let duration = self.duration.or(self.planned_duration)?;
        start.checked_add_signed(duration)
    }
}

/// Whether `date` falls into `range`.
///
/// Returns `None` if either `date` or the start of the range is unknown. A range
/// without any end covers everything from its start on.
pub fn is_date_in_date_range(
    date: Option<&DateTime<FixedOffset>>,
    range: &DateRange,
) -> Option<bool> {
    let date = date?;
    let start = range.start_date.as_ref()?;

    Some(match range.effective_end() {
        Some(end) => start <= date && *date < end,
        None => start <= date,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
    Subtitles,
    ClosedCaptions,
    Other(String),
}

impl MediaType {
    pub fn from_type(value: &str) -> Self {
        match value {
            "AUDIO" => Self::Audio,
            "VIDEO" => Self::Video,
            "SUBTITLES" => Self::Subtitles,
            "CLOSED-CAPTIONS" => Self::ClosedCaptions,
            _ => Self::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
            Self::Subtitles => "SUBTITLES",
            Self::ClosedCaptions => "CLOSED-CAPTIONS",
            Self::Other(value) => value.as_str(),
        }
    }
}

/// `EXT-X-MEDIA`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub uri: Option<String>,
    pub media_type: MediaType,
    pub group_id: String,
    pub language: Option<String>,
    pub name: String,
    pub default: bool,
    pub autoselect: bool,
    pub forced: bool,
    pub characteristics: Option<String>,
}

/// `EXT-X-START`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Start {
    /// Seconds from the beginning of the playlist, or from its end if negative.
    pub time_offset: f64,
    pub precise: bool,
}

/// `EXT-X-STREAM-INF`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    pub bandwidth: u64,
    pub program_id: Option<String>,
    pub codecs: Vec<String>,
    pub resolution: Option<Resolution>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
}

/// `EXT-X-I-FRAME-STREAM-INF`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IFrameStreamInfo {
    pub bandwidth: u64,
    pub program_id: Option<String>,
    pub codecs: Vec<String>,
    pub resolution: Option<Resolution>,
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantStreamInfo {
    Stream(StreamInfo),
    IFrame(IFrameStreamInfo),
}

impl VariantStreamInfo {
    pub fn bandwidth(&self) -> u64 {
        match self {
            Self::Stream(info) => info.bandwidth,
            Self::IFrame(info) => info.bandwidth,
        }
    }

    pub fn program_id(&self) -> Option<&str> {
        match self {
            Self::Stream(info) => info.program_id.as_deref(),
            Self::IFrame(info) => info.program_id.as_deref(),
        }
    }

    pub fn codecs(&self) -> &[String] {
        match self {
            Self::Stream(info) => &info.codecs,
            Self::IFrame(info) => &info.codecs,
        }
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match self {
            Self::Stream(info) => info.resolution,
            Self::IFrame(info) => info.resolution,
        }
    }

    /// Audio, video and subtitles group ids, in that order.
    pub fn group_ids(&self) -> [Option<&str>; 3] {
        match self {
            Self::Stream(info) => [
                info.audio.as_deref(),
                info.video.as_deref(),
                info.subtitles.as_deref(),
            ],
            Self::IFrame(info) => [None, info.video.as_deref(), None],
        }
    }
}

/// A variant stream of a master playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub uri: String,
    pub stream_info: VariantStreamInfo,
    /// Renditions of the groups this variant refers to.
    pub media: Vec<Media>,
    pub is_iframe: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub uri: String,
    pub duration: f64,
    pub title: Option<String>,
    /// Key in effect for this segment, which may have been declared by an earlier one.
    pub key: Option<Key>,
    pub discontinuity: bool,
    pub byte_range: Option<ByteRange>,
    /// `EXT-X-PROGRAM-DATE-TIME` attached to this segment.
    pub date: Option<DateTime<FixedOffset>>,
    /// Media initialization section in effect for this segment.
    pub map: Option<Map>,
}

/// A parsed master or media playlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    /// Location relative URIs were resolved against.
    pub base_uri: Option<Url>,

    pub is_endlist: bool,
    /// Whether any variant stream was found.
    pub is_master: bool,

    /// Removed in protocol version 7.
    pub allow_cache: Option<bool>,
    pub discontinuity_sequence: Option<u64>,
    pub iframes_only: Option<bool>,
    pub media_sequence: Option<u64>,
    pub playlist_type: Option<String>,
    pub target_duration: Option<f64>,
    pub start: Option<Start>,
    pub version: Option<u64>,

    pub media: Vec<Media>,
    pub variants: Vec<Variant>,
    pub date_ranges: Vec<DateRange>,
    pub segments: Vec<Segment>,
}

impl Playlist {
    pub fn new(base_uri: Option<Url>) -> Self {
        Self {
            base_uri,
            ..Default::default()
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Regular (non I-frame) variants, highest bandwidth first.
    pub fn variants_by_bandwidth(&self) -> Vec<&Variant> {
        let mut variants: Vec<_> = self.variants.iter().filter(|v| !v.is_iframe).collect();
        variants.sort_by(|a, b| b.stream_info.bandwidth().cmp(&a.stream_info.bandwidth()));
        variants
    }
}
