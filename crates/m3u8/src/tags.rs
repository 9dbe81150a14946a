//! Handlers of the built-in tags.
//!
//! Each handler is a [`TagHandler`](crate::registry::TagHandler), so custom
//! registries may reuse or wrap them.
//!
//! References: https://datatracker.ietf.org/doc/html/rfc8216#section-4.3

use crate::{
    attributes::Attributes,
    decode::{
        parse_bandwidth, parse_bool, parse_byterange, parse_extinf, parse_hex, parse_iso8601,
        parse_number, parse_resolution, parse_timedelta,
    },
    parser::ParserState,
    playlist::{
        DateRange, IFrameStreamInfo, Key, Map, Media, MediaType, Start, StreamInfo, Variant,
        VariantStreamInfo,
    },
};

/// Accepts a tag without doing anything with it.
pub fn ignore(_state: &mut ParserState, _value: &str) {}

fn codecs(attributes: &Attributes) -> Vec<String> {
    attributes
        .get("CODECS")
        .map(|codecs| {
            codecs
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn owned(attributes: &Attributes, key: &str) -> Option<String> {
    attributes.get(key).map(str::to_string)
}

/// Builds the stream info of an `EXT-X-STREAM-INF` variant.
pub fn stream_info(attributes: &Attributes) -> VariantStreamInfo {
    VariantStreamInfo::Stream(StreamInfo {
        bandwidth: parse_bandwidth(attributes.get("BANDWIDTH")),
        program_id: owned(attributes, "PROGRAM-ID"),
        codecs: codecs(attributes),
        resolution: attributes.get_non_empty("RESOLUTION").map(parse_resolution),
        audio: owned(attributes, "AUDIO"),
        video: owned(attributes, "VIDEO"),
        subtitles: owned(attributes, "SUBTITLES"),
    })
}

/// Builds the stream info of an `EXT-X-I-FRAME-STREAM-INF` variant.
pub fn iframe_stream_info(attributes: &Attributes) -> VariantStreamInfo {
    VariantStreamInfo::IFrame(IFrameStreamInfo {
        bandwidth: parse_bandwidth(attributes.get("BANDWIDTH")),
        program_id: owned(attributes, "PROGRAM-ID"),
        codecs: codecs(attributes),
        resolution: attributes.get_non_empty("RESOLUTION").map(parse_resolution),
        video: owned(attributes, "VIDEO"),
    })
}

// 4.3.1 Basic Tags

pub fn ext_x_version(state: &mut ParserState, value: &str) {
    state.playlist.version = parse_number("EXT-X-VERSION", value);
}

// 4.3.2 Media Segment Tags

pub fn extinf(state: &mut ParserState, value: &str) {
    state.expect_segment = true;
    state.extinf = Some(parse_extinf(value));
}

pub fn ext_x_byterange(state: &mut ParserState, value: &str) {
    state.expect_segment = true;
    state.byte_range = parse_byterange(value);
}

pub fn ext_x_discontinuity(state: &mut ParserState, _value: &str) {
    state.discontinuity = true;
    // A media initialization section never spans a discontinuity
    state.map = None;
}

pub fn ext_x_key(state: &mut ParserState, value: &str) {
    let attributes = Attributes::parse(value);
    let Some(method) = attributes.get_non_empty("METHOD") else {
        log::warn!("Discarded EXT-X-KEY without METHOD: {value}");
        return;
    };

    state.key = Some(Key {
        method: method.to_string(),
        uri: attributes.get_non_empty("URI").map(|uri| state.uri(uri)),
        iv: parse_hex(attributes.get("IV")),
        key_format: owned(&attributes, "KEYFORMAT"),
        key_format_versions: owned(&attributes, "KEYFORMATVERSIONS"),
    });
}

pub fn ext_x_map(state: &mut ParserState, value: &str) {
    let attributes = Attributes::parse(value);
    let Some(uri) = attributes.get_non_empty("URI") else {
        log::warn!("Discarded EXT-X-MAP without URI: {value}");
        return;
    };

    state.map = Some(Map {
        uri: state.uri(uri),
        byte_range: parse_byterange(attributes.get("BYTERANGE").unwrap_or_default()),
    });
}

pub fn ext_x_program_date_time(state: &mut ParserState, value: &str) {
    state.date = parse_iso8601(Some(value));
}

pub fn ext_x_daterange(state: &mut ParserState, value: &str) {
    let mut attributes = Attributes::parse(value);

    let date_range = DateRange {
        id: attributes.remove("ID"),
        class: attributes.remove("CLASS"),
        start_date: parse_iso8601(attributes.remove("START-DATE").as_deref()),
        end_date: parse_iso8601(attributes.remove("END-DATE").as_deref()),
        duration: parse_timedelta(attributes.remove("DURATION").as_deref()),
        planned_duration: parse_timedelta(attributes.remove("PLANNED-DURATION").as_deref()),
        end_on_next: parse_bool(attributes.remove("END-ON-NEXT").as_deref()),
        client_attributes: attributes.into_inner(),
    };
    state.playlist.date_ranges.push(date_range);
}

// 4.3.3 Media Playlist Tags

pub fn ext_x_targetduration(state: &mut ParserState, value: &str) {
    state.playlist.target_duration = parse_number("EXT-X-TARGETDURATION", value);
}

pub fn ext_x_media_sequence(state: &mut ParserState, value: &str) {
    state.playlist.media_sequence = parse_number("EXT-X-MEDIA-SEQUENCE", value);
}

pub fn ext_x_discontinuity_sequence(state: &mut ParserState, value: &str) {
    state.playlist.discontinuity_sequence = parse_number("EXT-X-DISCONTINUITY-SEQUENCE", value);
}

pub fn ext_x_endlist(state: &mut ParserState, _value: &str) {
    state.playlist.is_endlist = true;
}

pub fn ext_x_playlist_type(state: &mut ParserState, value: &str) {
    state.playlist.playlist_type = Some(value.to_string());
}

pub fn ext_x_i_frames_only(state: &mut ParserState, _value: &str) {
    state.playlist.iframes_only = Some(true);
}

// 4.3.4 Master Playlist Tags

pub fn ext_x_media(state: &mut ParserState, value: &str) {
    let attributes = Attributes::parse(value);
    let (Some(media_type), Some(group_id), Some(name)) = (
        attributes.get_non_empty("TYPE"),
        attributes.get_non_empty("GROUP-ID"),
        attributes.get_non_empty("NAME"),
    ) else {
        log::warn!("Discarded EXT-X-MEDIA without TYPE, GROUP-ID or NAME: {value}");
        return;
    };

    let media = Media {
        uri: attributes.get_non_empty("URI").map(|uri| state.uri(uri)),
        media_type: MediaType::from_type(media_type),
        group_id: group_id.to_string(),
        language: owned(&attributes, "LANGUAGE"),
        name: name.to_string(),
        default: parse_bool(attributes.get("DEFAULT")),
        autoselect: parse_bool(attributes.get("AUTOSELECT")),
        forced: parse_bool(attributes.get("FORCED")),
        characteristics: owned(&attributes, "CHARACTERISTICS"),
    };
    state.playlist.media.push(media);
}

pub fn ext_x_stream_inf(state: &mut ParserState, value: &str) {
    state.expect_variant = true;
    state.stream_info = Some(Attributes::parse(value));
}

/// Unlike `EXT-X-STREAM-INF`, the URI is an attribute, so the variant is
/// complete as soon as the tag is read.
pub fn ext_x_i_frame_stream_inf(state: &mut ParserState, value: &str) {
    let attributes = Attributes::parse(value);
    // a pending list that was discarded as invalid does not count
    let pending = state.stream_info.take().filter(|a| !a.is_empty());

    let Some(uri) = attributes.get_non_empty("URI") else {
        log::warn!("Discarded EXT-X-I-FRAME-STREAM-INF without URI: {value}");
        return;
    };

    let variant = Variant {
        uri: state.uri(uri),
        stream_info: iframe_stream_info(pending.as_ref().unwrap_or(&attributes)),
        media: Vec::new(),
        is_iframe: true,
    };
    state.playlist.variants.push(variant);
}

// 4.3.5 Media or Master Playlist Tags

pub fn ext_x_start(state: &mut ParserState, value: &str) {
    let attributes = Attributes::parse(value);

    state.playlist.start = Some(Start {
        time_offset: attributes
            .get("TIME-OFFSET")
            .and_then(|offset| parse_number("TIME-OFFSET", offset))
            .unwrap_or_default(),
        precise: parse_bool(attributes.get("PRECISE")),
    });
}

// https://datatracker.ietf.org/doc/html/rfc8216#section-7

pub fn ext_x_allow_cache(state: &mut ParserState, value: &str) {
    state.playlist.allow_cache = Some(parse_bool(Some(value)));
}
