//! Output templates: render a record as a map insertion statement.

use crate::Record;

/// Renders records as `<target>.put("<key>", <value>);`.
///
/// The value is written unquoted, as the consuming map holds integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    target: String,
}

impl Template {
    /// Map filled from the Langton loop rule table.
    pub const RULES_MAP: &'static str = "RULES_MAP";
    /// Map filled from the Petelka rule table.
    pub const RULES_MAP_PETELKA: &'static str = "RULES_MAP_PETELKA";

    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn render(&self, record: &Record) -> String {
        format!(
            "{}.put(\"{}\", {});",
            self.target,
            record.key(),
            record.value()
        )
    }
}
