use iori_m3u8::{
    is_date_in_date_range, parse, parse_str, ByteRange, M3u8Error, MediaType, Start,
};

use crate::{hls::parse_with_base, AssertWrapper};

#[test]
fn media_playlist_with_byterange_and_map() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/hls/media-playlist-with-byterange-and-map.m3u8");
    let playlist = parse_with_base(data, "https://cdn.example.com/vod/index.m3u8")?;

    assert!(playlist.is_endlist);
    assert!(!playlist.is_master);
    assert_eq!(playlist.version, Some(7));
    assert_eq!(playlist.target_duration, Some(6.0));
    assert_eq!(playlist.media_sequence, Some(1));
    assert_eq!(playlist.discontinuity_sequence, Some(3));
    assert_eq!(playlist.playlist_type.as_deref(), Some("VOD"));
    assert_eq!(
        playlist.start,
        Some(Start {
            time_offset: -15.5,
            precise: true
        })
    );

    let segments = &playlist.segments;
    assert_eq!(segments.len(), 4);

    let first = &segments[0];
    assert_eq!(first.uri, "https://cdn.example.com/vod/video.mp4");
    assert_eq!(first.title.as_deref(), Some("first"));
    assert_eq!(
        first.byte_range,
        Some(ByteRange {
            length: 75232,
            offset: Some(720)
        })
    );
    assert!(first.date.is_some());
    assert!(!first.discontinuity);

    let key = first.key.as_ref().assert_success();
    assert_eq!(key.method, "SAMPLE-AES");
    assert_eq!(key.uri.as_deref(), Some("skd://key-id"));
    assert_eq!(key.iv, Some(vec![0x01, 0xA2]));
    assert_eq!(
        key.key_format.as_deref(),
        Some("com.apple.streamingkeydelivery")
    );

    let map = first.map.as_ref().assert_success();
    assert_eq!(map.uri, "https://cdn.example.com/vod/init.mp4");
    assert_eq!(
        map.byte_range,
        Some(ByteRange {
            length: 720,
            offset: Some(0)
        })
    );

    // pending values only apply to the next segment
    let second = &segments[1];
    assert_eq!(second.title, None);
    assert_eq!(
        second.byte_range,
        Some(ByteRange {
            length: 82112,
            offset: None
        })
    );
    assert_eq!(second.date, None);
    assert_eq!(second.map, first.map);
    assert_eq!(
        second.byte_range.map(|r| r.to_http_range(75232 + 720)),
        Some("bytes=75952-158063".to_string())
    );

    assert_eq!(segments[2].byte_range, None);

    // the map does not survive a discontinuity, the key does
    let last = &segments[3];
    assert!(last.discontinuity);
    assert_eq!(last.map, None);
    assert_eq!(last.key, first.key);
    assert_eq!(last.duration, 4.5);
    assert_eq!(last.uri, "https://cdn.example.com/other/segment.ts");

    assert_eq!(playlist.total_duration(), 22.5);

    Ok(())
}

#[test]
fn master_playlist_with_daterange() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/hls/master-playlist-with-daterange.m3u8");
    let playlist = parse_with_base(data, "https://example.com/master.m3u8")?;

    assert!(playlist.is_master);
    assert_eq!(playlist.allow_cache, Some(true));
    assert_eq!(playlist.version, Some(6));

    assert_eq!(playlist.date_ranges.len(), 2);
    let splice = &playlist.date_ranges[0];
    assert_eq!(splice.id.as_deref(), Some("splice-6FFFFFF0"));
    assert!(splice.start_date.is_some());
    assert!(splice.planned_duration.is_some());
    assert_eq!(
        splice.client_attributes.get("SCTE35-OUT").map(String::as_str),
        Some("0xFC002F0000000000FF0")
    );

    let inside = chrono::DateTime::parse_from_rfc3339("2014-03-05T11:15:30Z")?;
    let after = chrono::DateTime::parse_from_rfc3339("2014-03-05T11:16:00Z")?;
    assert_eq!(is_date_in_date_range(Some(&inside), splice), Some(true));
    assert_eq!(is_date_in_date_range(Some(&after), splice), Some(false));

    let broken = &playlist.date_ranges[1];
    assert_eq!(broken.start_date, None);
    assert_eq!(
        broken.client_attributes.get("X-AD-ID").map(String::as_str),
        Some("XYZ")
    );
    assert_eq!(is_date_in_date_range(Some(&inside), broken), None);

    // the rendition without NAME is dropped
    assert_eq!(playlist.media.len(), 4);
    assert_eq!(playlist.media[0].media_type, MediaType::Subtitles);
    assert_eq!(
        playlist.media[0].uri.as_deref(),
        Some("https://example.com/subs/en.m3u8")
    );

    let variants = &playlist.variants;
    assert_eq!(variants.len(), 3);

    let hd = &variants[0];
    assert_eq!(hd.uri, "https://example.com/720p.m3u8");
    assert_eq!(hd.stream_info.bandwidth(), 1200000);
    assert_eq!(hd.stream_info.program_id(), Some("1"));
    assert_eq!(
        hd.stream_info.resolution().map(|r| (r.width, r.height)),
        Some((1280, 720))
    );
    assert_eq!(hd.stream_info.codecs(), ["avc1.4d001f", "mp4a.40.2"]);
    let names: Vec<_> = hd.media.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "Commentary", "English"]);

    let full_hd = &variants[1];
    assert_eq!(full_hd.stream_info.bandwidth(), 2300000);
    assert_eq!(full_hd.media.len(), 1);
    assert_eq!(full_hd.media[0].name, "Legacy");

    // an invalid attribute list leaves an empty stream info behind
    let broken = &variants[2];
    assert_eq!(broken.uri, "https://example.com/broken.m3u8");
    assert_eq!(broken.stream_info.bandwidth(), 0);
    assert_eq!(broken.stream_info.resolution(), None);
    assert!(broken.media.is_empty());

    Ok(())
}

#[test]
fn missing_header() {
    crate::init_logger();

    let result = parse_str("#EXT-X-VERSION:3\n#EXTINF:10,\nfoo.ts\n", None);
    assert!(matches!(result, Err(M3u8Error::MissingHeader(_))));

    parse_str("<html></html>", None).assert_error();
}

#[test]
fn master_flag() {
    let media = parse_str("#EXTM3U\n#EXTINF:10,\nfoo.ts\n", None).assert_success();
    assert!(!media.is_master);

    let master = parse_str(
        "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1000\nfoo.m3u8\n",
        None,
    )
    .assert_success();
    assert!(master.is_master);
}

#[test]
fn quoted_attribute_with_comma() -> anyhow::Result<()> {
    let playlist = parse(
        [
            "#EXTM3U",
            r#"#EXT-X-STREAM-INF:BANDWIDTH=1234567,CODECS="avc1.4d001f,mp4a.40.2""#,
            "video.m3u8",
        ],
        None,
    )?;

    let variant = &playlist.variants[0];
    assert_eq!(variant.stream_info.bandwidth(), 1200000);
    assert_eq!(variant.stream_info.codecs().len(), 2);

    Ok(())
}

#[test]
fn discontinuity_clears_map_but_keeps_key() -> anyhow::Result<()> {
    let playlist = parse_str(
        r#"#EXTM3U
#EXT-X-KEY:METHOD=AES-128,URI="key.bin"
#EXT-X-MAP:URI="init.mp4"
#EXT-X-DISCONTINUITY
#EXTINF:4,
segment.ts
"#,
        None,
    )?;

    let segment = &playlist.segments[0];
    assert!(segment.discontinuity);
    assert_eq!(segment.map, None);
    assert_eq!(
        segment.key.as_ref().and_then(|k| k.uri.as_deref()),
        Some("key.bin")
    );

    Ok(())
}

#[test]
fn byterange_does_not_leak() -> anyhow::Result<()> {
    let playlist = parse_str(
        "#EXTM3U\n#EXTINF:4,\n#EXT-X-BYTERANGE:100@0\na.ts\n#EXTINF:4,\nb.ts\n",
        None,
    )?;

    assert_eq!(playlist.segments.len(), 2);
    assert!(playlist.segments[0].byte_range.is_some());
    assert_eq!(playlist.segments[1].byte_range, None);

    Ok(())
}

#[test]
fn byterange_alone_starts_segment() -> anyhow::Result<()> {
    let playlist = parse_str("#EXTM3U\n#EXT-X-BYTERANGE:100\na.ts\n", None)?;

    let segment = &playlist.segments[0];
    assert_eq!(segment.duration, 0.0);
    assert_eq!(segment.byte_range.map(|r| r.length), Some(100));

    Ok(())
}

#[test]
fn association_keeps_declaration_order() -> anyhow::Result<()> {
    let playlist = parse_str(
        r#"#EXTM3U
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="one"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="mp3",NAME="two"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="three"
#EXT-X-STREAM-INF:BANDWIDTH=1000,AUDIO="aac"
video.m3u8
"#,
        None,
    )?;

    let names: Vec<_> = playlist.variants[0]
        .media
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["one", "three"]);

    Ok(())
}

#[test]
fn crlf_line_endings() -> anyhow::Result<()> {
    let playlist = parse_str(
        "#EXTM3U\r\n#EXT-X-TARGETDURATION:10\r\n#EXTINF:10,\r\nfoo.ts\r\n#EXT-X-ENDLIST\r\n",
        None,
    )?;

    assert!(playlist.is_endlist);
    assert_eq!(playlist.segments[0].uri, "foo.ts");

    Ok(())
}

#[test]
fn segment_and_variant_pending_together() -> anyhow::Result<()> {
    let playlist = parse_str(
        "#EXTM3U\n#EXTINF:10,\n#EXT-X-STREAM-INF:BANDWIDTH=1000\na.ts\nb.m3u8\n",
        None,
    )?;

    assert_eq!(playlist.segments.len(), 1);
    assert_eq!(playlist.segments[0].uri, "a.ts");
    assert_eq!(playlist.variants.len(), 1);
    assert_eq!(playlist.variants[0].uri, "b.m3u8");
    assert!(playlist.is_master);

    Ok(())
}

#[test]
fn iframe_variant_after_invalid_stream_inf() -> anyhow::Result<()> {
    let playlist = parse_str(
        "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=abc def\n#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=86000,URI=\"i.m3u8\"\n",
        None,
    )?;

    let variant = playlist.variants.first().assert_success();
    assert!(variant.is_iframe);
    assert_eq!(variant.uri, "i.m3u8");
    assert_eq!(variant.stream_info.bandwidth(), 86000);

    Ok(())
}
