use regex::Regex;
use std::{collections::HashMap, sync::LazyLock};

// https://datatracker.ietf.org/doc/html/rfc8216#section-4.2
//
// Value shapes are tried in order. A quoted string may contain commas, so the
// separator is only consumed after a whole value has been matched. Spaces around
// the separator are tolerated since some encoders emit them.
static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"(?x)
        ^
        (?P<key>[A-Z0-9\-]+)
        =
        (?P<value>
            \d+                             # decimal-integer
            |0[xX][0-9A-Fa-f]+              # hexadecimal-sequence
            |-?\d+\.\d+                     # (signed-)decimal-floating-point
            |"(?P<quoted>[^\r\n"]*)"        # quoted-string
            |[^",\s]+                       # enumerated-string
            |\d+x\d+                        # decimal-resolution
        )
        \s*(?:,\s*|$)
        "##,
    )
    .unwrap()
});

/// Raw attribute values of a single tag, keyed by attribute name.
///
/// Quoted-string values are stored without their quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    /// Parses an attribute list such as `BANDWIDTH=1280000,CODECS="avc1.4d001f"`.
    ///
    /// A single malformed entry makes the position of the following entries
    /// unknown, so the whole list is discarded and an empty map is returned.
    pub fn parse(value: &str) -> Self {
        let mut attributes = HashMap::new();

        let mut rest = value;
        while !rest.is_empty() {
            let Some(caps) = ATTRIBUTE_REGEX.captures(rest) else {
                log::warn!("Discarded invalid attributes list: {value}");
                attributes.clear();
                break;
            };

            let value = caps
                .name("quoted")
                .or_else(|| caps.name("value"))
                .map(|m| m.as_str())
                .unwrap_or_default();
            attributes.insert(caps["key"].to_string(), value.to_string());

            rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
        }

        Self(attributes)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value if present and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}
