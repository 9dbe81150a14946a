//! Decoders for the scalar values found in tag values and attribute lists.
//!
//! None of these functions fail. Malformed input decodes to `None` or a default
//! value, optionally with a warning.

use std::{str::FromStr, sync::LazyLock, time::Duration};

use chrono::{DateTime, FixedOffset, TimeDelta};
use regex::Regex;

use crate::playlist::{ByteRange, ExtInf, Resolution};

static EXTINF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<duration>\d+(\.\d+)?)(,(?P<title>.+))?").unwrap());
static BYTERANGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<length>\d+)(?:@(?P<offset>\d+))?").unwrap());
static RESOLUTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)").unwrap());

const ISO8601_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y%m%dT%H%M%S%.f%#z",
];

pub fn parse_bool(value: Option<&str>) -> bool {
    value == Some("YES")
}

/// Decodes a `0x`/`0X` prefixed hexadecimal-sequence.
///
/// An odd number of digits is padded with a leading zero nibble, so `0x1A2`
/// decodes to `[0x01, 0xA2]`.
pub fn parse_hex(value: Option<&str>) -> Option<Vec<u8>> {
    let value = value?;

    if let Some(digits) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        let decoded = if digits.len() % 2 == 1 {
            hex::decode(format!("0{digits}"))
        } else {
            hex::decode(digits)
        };
        if let Ok(bytes) = decoded {
            return Some(bytes);
        }
    }

    log::warn!("Discarded invalid hexadecimal-sequence attribute value: {value}");
    None
}

/// Decodes an ISO-8601 date-time with a time zone.
pub fn parse_iso8601(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let value = value?;

    let parsed = DateTime::parse_from_rfc3339(value).or_else(|error| {
        // ISO-8601 also allows `±hhmm` and `±hh` offsets, and the basic format
        ISO8601_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(value, format).ok())
            .ok_or(error)
    });
    match parsed {
        Ok(date) => Some(date),
        Err(_) => {
            log::warn!("Discarded invalid ISO8601 attribute value: {value}");
            None
        }
    }
}

/// Decodes a non-negative decimal number of seconds.
pub fn parse_timedelta(value: Option<&str>) -> Option<TimeDelta> {
    let value = value?;

    let delta = value
        .parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .and_then(|duration| TimeDelta::from_std(duration).ok());
    if delta.is_none() {
        log::warn!("Discarded invalid duration attribute value: {value}");
    }
    delta
}

/// Decodes `<n>[@<o>]`. The offset is left empty when absent; resolving it
/// against the previous range is up to the consumer.
pub fn parse_byterange(value: &str) -> Option<ByteRange> {
    let caps = BYTERANGE_REGEX.captures(value)?;

    Some(ByteRange {
        length: caps["length"].parse().ok()?,
        offset: match caps.name("offset") {
            Some(offset) => Some(offset.as_str().parse().ok()?),
            None => None,
        },
    })
}

pub fn parse_extinf(value: &str) -> ExtInf {
    let Some(caps) = EXTINF_REGEX.captures(value) else {
        return ExtInf::default();
    };

    ExtInf {
        duration: caps["duration"].parse().unwrap_or_default(),
        title: caps.name("title").map(|m| m.as_str().to_string()),
    }
}

pub fn parse_resolution(value: &str) -> Resolution {
    let Some(caps) = RESOLUTION_REGEX.captures(value) else {
        return Resolution::default();
    };

    match (caps[1].parse(), caps[2].parse()) {
        (Ok(width), Ok(height)) => Resolution { width, height },
        _ => Resolution::default(),
    }
}

/// Decodes a `BANDWIDTH` value, rounded to two significant figures.
///
/// Rounding is done on the integer with ties going to the even neighbour, so
/// `1234567` becomes `1200000` and `1250000` becomes `1200000`.
pub fn parse_bandwidth(value: Option<&str>) -> u64 {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return 0;
    };
    let Ok(bandwidth) = value.parse::<u64>() else {
        log::warn!("Discarded invalid bandwidth attribute value: {value}");
        return 0;
    };

    round_significant(bandwidth, 2)
}

fn round_significant(value: u64, figures: u32) -> u64 {
    if value == 0 {
        return 0;
    }

    let digits = value.ilog10() + 1;
    if digits <= figures {
        return value;
    }

    let unit = 10u64.pow(digits - figures);
    let quotient = value / unit;
    let remainder = value % unit;
    let half = unit / 2;

    let quotient = if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    quotient.saturating_mul(unit)
}

/// Decodes a decimal-integer or decimal-floating-point tag value, warning on failure.
pub fn parse_number<T: FromStr>(tag: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            log::warn!("Discarded invalid {tag} value: {value}");
            None
        }
    }
}
