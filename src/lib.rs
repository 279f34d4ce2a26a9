//! # rules-transcoder
//!
//! Turns cellular-automaton rule tables into Java map insertion statements.
//!
//! Rule tables arrive as plain text, one rule per line, in one of two
//! encodings:
//! - **Fixed-width**: six characters, a five-character neighbourhood key and
//!   a one-character next state (Langton's loop).
//! - **Delimited**: ten comma-separated fields, nine neighbourhood states and
//!   the next state (Petelka).
//!
//! Each matching line becomes one `put` statement ready to paste into a
//! static initializer. Lines with any other shape are skipped.
//!
//! ## Example
//!
//! ```
//! use rules_transcoder::{Mode, transcode_str};
//!
//! let input = "123456\n1234\n000012";
//! let statements = transcode_str(input, Mode::FixedWidth);
//!
//! assert_eq!(statements, vec![
//!     r#"RULES_MAP.put("12345", 6);"#,
//!     r#"RULES_MAP.put("00001", 2);"#,
//! ]);
//! ```

pub mod error;
pub mod record;
pub mod shape;
pub mod template;
pub mod transcoder;

pub use error::TranscodeError;
pub use record::Record;
pub use shape::{DelimitedShape, FixedWidthShape, LineShape};
pub use template::Template;
pub use transcoder::{Mode, TranscodeResult, Transcoder, transcode, transcode_file, transcode_str};
