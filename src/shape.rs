//! Line shapes: the structural check and field split for each rule encoding.
//!
//! A shape decides whether a trimmed input line is eligible for transcoding
//! and, if it is, splits it into a [`Record`]. Lines that fail the check are
//! skipped by the transcoder without error.

use crate::Record;

/// Structural predicate plus extraction rule for one input encoding.
pub trait LineShape {
    /// Returns true when the trimmed line has this shape.
    fn matches(&self, line: &str) -> bool;

    /// Split a line that [`matches`](LineShape::matches) into key and value.
    fn split(&self, line: &str) -> Record;

    /// Check and split in one step.
    fn extract(&self, line: &str) -> Option<Record> {
        if self.matches(line) {
            Some(self.split(line))
        } else {
            None
        }
    }

    /// Human-readable description of a matching line, used in skip logs.
    fn expected(&self) -> String;

    /// The display name of this shape.
    fn name(&self) -> &str;
}

/// Fixed-width lines: a `key_width`-character key followed by a single
/// value character.
///
/// Width is counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidthShape {
    key_width: usize,
}

impl FixedWidthShape {
    /// Key width of the Langton loop rule table (`CTRBL` neighbourhood).
    pub const LANGTON_KEY_WIDTH: usize = 5;

    pub fn new(key_width: usize) -> Self {
        Self { key_width }
    }

    pub fn line_width(&self) -> usize {
        self.key_width + 1
    }
}

impl Default for FixedWidthShape {
    fn default() -> Self {
        Self::new(Self::LANGTON_KEY_WIDTH)
    }
}

impl LineShape for FixedWidthShape {
    fn matches(&self, line: &str) -> bool {
        line.chars().count() == self.line_width()
    }

    fn split(&self, line: &str) -> Record {
        let at = line
            .char_indices()
            .nth(self.key_width)
            .map_or(line.len(), |(i, _)| i);
        let (key, value) = line.split_at(at);
        Record::new(key, value)
    }

    fn expected(&self) -> String {
        format!("{} characters", self.line_width())
    }

    fn name(&self) -> &str {
        "FIXED-WIDTH"
    }
}

/// Delimited lines: exactly `field_count` fields; all but the last are
/// concatenated into the key and the last is the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedShape {
    delimiter: char,
    field_count: usize,
}

impl DelimitedShape {
    /// Field count of the Petelka rule table: nine neighbourhood states and
    /// the next state.
    pub const PETELKA_FIELD_COUNT: usize = 10;

    pub fn new(delimiter: char, field_count: usize) -> Self {
        Self {
            delimiter,
            field_count,
        }
    }
}

impl Default for DelimitedShape {
    fn default() -> Self {
        Self::new(',', Self::PETELKA_FIELD_COUNT)
    }
}

impl LineShape for DelimitedShape {
    fn matches(&self, line: &str) -> bool {
        line.split(self.delimiter).count() == self.field_count
    }

    fn split(&self, line: &str) -> Record {
        // A single-field shape has no delimiter: the whole line is the value.
        match line.rsplit_once(self.delimiter) {
            Some((key, value)) => {
                Record::new(key.split(self.delimiter).collect::<String>(), value)
            }
            None => Record::new(String::new(), line),
        }
    }

    fn expected(&self) -> String {
        format!("{} '{}'-separated fields", self.field_count, self.delimiter)
    }

    fn name(&self) -> &str {
        "DELIMITED"
    }
}
