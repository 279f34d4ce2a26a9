//! Key/value records extracted from rule table lines.

use std::fmt;

/// One rule extracted from an input line.
///
/// The key is the neighbourhood string the consuming map is indexed by and
/// the value is the next state, kept as written in the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: String,
    value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.value)
    }
}
