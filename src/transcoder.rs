//! Line transcoder: rule table text in, map insertion statements out.
//!
//! Each input line is trimmed, checked against the configured
//! [`LineShape`], split into a [`Record`] and rendered through a
//! [`Template`]. Lines that do not have the expected shape are skipped.
//! Output order follows input order.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use clap::ValueEnum;
use log::{debug, info, warn};

use crate::error::TranscodeError;
use crate::shape::{DelimitedShape, FixedWidthShape, LineShape};
use crate::template::Template;

/// Input encodings with a built-in transcoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// `CTRBLN`: five-character key, one-character value.
    FixedWidth,
    /// Ten comma-separated fields: nine key fields and the value.
    Delimited,
}

impl Mode {
    /// Conventional input file name for this rule table.
    pub fn default_input(&self) -> &'static str {
        match self {
            Mode::FixedWidth => "LangtonRule.txt",
            Mode::Delimited => "PetelkaRule.txt",
        }
    }

    pub fn transcoder(&self) -> Transcoder {
        match self {
            Mode::FixedWidth => Transcoder::new(
                Box::new(FixedWidthShape::default()),
                Template::new(Template::RULES_MAP),
            ),
            Mode::Delimited => Transcoder::new(
                Box::new(DelimitedShape::default()),
                Template::new(Template::RULES_MAP_PETELKA),
            ),
        }
    }
}

/// Statements produced by one run plus line counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodeResult {
    pub statements: Vec<String>,
    pub lines_read: usize,
    pub skipped: usize,
    /// Statements whose key was already emitted earlier in the run.
    pub duplicates: usize,
}

impl TranscodeResult {
    pub fn emitted(&self) -> usize {
        self.statements.len()
    }

    /// Write each statement on its own line.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for statement in &self.statements {
            writeln!(out, "{statement}")?;
        }
        out.flush()
    }
}

/// A shape check and extraction rule paired with an output template.
pub struct Transcoder {
    shape: Box<dyn LineShape>,
    template: Template,
}

impl Transcoder {
    pub fn new(shape: Box<dyn LineShape>, template: Template) -> Self {
        Self { shape, template }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Transcode a single line, returning `None` if it does not match.
    pub fn transcode_line(&self, line: &str) -> Option<String> {
        self.shape
            .extract(line.trim())
            .map(|record| self.template.render(&record))
    }

    /// Transcode every line of `source`.
    ///
    /// `\n`, `\r\n` and a bare `\r` all end a line. Fails only if reading
    /// from the source fails or a line is not valid UTF-8.
    pub fn run<R: BufRead>(&self, mut source: R) -> Result<TranscodeResult, TranscodeError> {
        let mut run = Run::new(self);
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let read = source
                .read_until(b'\n', &mut buf)
                .map_err(|source| TranscodeError::Read {
                    line: line_no + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            let chunk = std::str::from_utf8(&buf).map_err(|e| TranscodeError::Read {
                line: line_no + 1,
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;
            for line in split_lines(chunk) {
                line_no += 1;
                run.push(line_no, line);
            }
        }
        Ok(run.finish())
    }

    /// Transcode in-memory text, with the same line breaks as [`run`](Transcoder::run).
    pub fn run_str(&self, text: &str) -> TranscodeResult {
        let mut run = Run::new(self);
        for (i, line) in split_lines(text).into_iter().enumerate() {
            run.push(i + 1, line);
        }
        run.finish()
    }
}

/// Split text into lines ending in `\n`, `\r\n` or `\r`.
///
/// A trailing terminator does not start an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut after_cr = false;
    for piece in text.split_inclusive(['\r', '\n']) {
        if piece == "\n" && after_cr {
            after_cr = false;
            continue;
        }
        after_cr = piece.ends_with('\r');
        lines.push(piece.trim_end_matches(['\r', '\n']));
    }
    lines
}

/// Accumulates the output of one transcode run.
struct Run<'a> {
    transcoder: &'a Transcoder,
    seen: HashSet<String>,
    result: TranscodeResult,
}

impl<'a> Run<'a> {
    fn new(transcoder: &'a Transcoder) -> Self {
        Self {
            transcoder,
            seen: HashSet::new(),
            result: TranscodeResult::default(),
        }
    }

    fn push(&mut self, line_no: usize, line: &str) {
        self.result.lines_read += 1;
        let shape = &self.transcoder.shape;
        let trimmed = line.trim();

        let Some(record) = shape.extract(trimmed) else {
            debug!(
                "line {line_no}: skipped {:?}, {} expects {}",
                trimmed,
                shape.name(),
                shape.expected()
            );
            self.result.skipped += 1;
            return;
        };

        if !self.seen.insert(record.key().to_string()) {
            warn!(
                "line {line_no}: {record} repeats a key already emitted for {}; the later value wins",
                self.transcoder.template.target()
            );
            self.result.duplicates += 1;
        }

        self.result
            .statements
            .push(self.transcoder.template.render(&record));
    }

    fn finish(self) -> TranscodeResult {
        info!(
            "{}: {} lines read, {} statements emitted, {} skipped",
            self.transcoder.template.target(),
            self.result.lines_read,
            self.result.emitted(),
            self.result.skipped
        );
        self.result
    }
}

/// Transcode `source` with the built-in configuration for `mode`.
pub fn transcode<R: BufRead>(source: R, mode: Mode) -> Result<Vec<String>, TranscodeError> {
    Ok(mode.transcoder().run(source)?.statements)
}

/// Transcode in-memory text with the built-in configuration for `mode`.
pub fn transcode_str(text: &str, mode: Mode) -> Vec<String> {
    mode.transcoder().run_str(text).statements
}

/// Open `path` and transcode it with the built-in configuration for `mode`.
///
/// A missing or unreadable file is reported as [`TranscodeError::Open`].
pub fn transcode_file(path: &Path, mode: Mode) -> Result<TranscodeResult, TranscodeError> {
    let file = File::open(path).map_err(|source| TranscodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    mode.transcoder().run(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn spec_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("specs").join(name)
    }

    #[test]
    fn test_fixed_width_line() {
        let out = transcode_str("123456", Mode::FixedWidth);
        assert_eq!(out, vec![r#"RULES_MAP.put("12345", 6);"#]);
    }

    #[test]
    fn test_fixed_width_short_line_skipped() {
        assert!(transcode_str("1234", Mode::FixedWidth).is_empty());
    }

    #[test]
    fn test_delimited_line() {
        let out = transcode_str("1,2,3,4,5,6,7,8,9,X", Mode::Delimited);
        assert_eq!(out, vec![r#"RULES_MAP_PETELKA.put("123456789", X);"#]);
    }

    #[test]
    fn test_delimited_wrong_field_count_skipped() {
        assert!(transcode_str("1,2,3", Mode::Delimited).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(transcode_str("", Mode::FixedWidth).is_empty());
        assert!(transcode_str("", Mode::Delimited).is_empty());
    }

    #[test]
    fn test_whitespace_trimmed() {
        let out = transcode_str("  000012\t\r\n", Mode::FixedWidth);
        assert_eq!(out, vec![r#"RULES_MAP.put("00001", 2);"#]);
    }

    #[test]
    fn test_order_preserved_and_malformed_skipped() {
        let input = "000012\nbad\n000107\n\n0002\n000212";
        let result = Mode::FixedWidth.transcoder().run_str(input);
        assert_eq!(
            result.statements,
            vec![
                r#"RULES_MAP.put("00001", 2);"#,
                r#"RULES_MAP.put("00010", 7);"#,
                r#"RULES_MAP.put("00021", 2);"#,
            ]
        );
        assert_eq!(result.lines_read, 6);
        assert_eq!(result.skipped, 3);
        assert_eq!(result.emitted(), 3);
    }

    #[test]
    fn test_modes_do_not_cross_match() {
        assert!(transcode_str("1,2,3,4,5,6,7,8,9,0", Mode::FixedWidth).is_empty());
        assert!(transcode_str("123456", Mode::Delimited).is_empty());
    }

    #[test]
    fn test_bare_carriage_return_ends_line() {
        let out = transcode(Cursor::new("123456\r654321\r"), Mode::FixedWidth).unwrap();
        assert_eq!(
            out,
            vec![r#"RULES_MAP.put("12345", 6);"#, r#"RULES_MAP.put("65432", 1);"#]
        );
        let out = transcode_str("1,2,3,4,5,6,7,8,9,X\r1,2,3", Mode::Delimited);
        assert_eq!(out, vec![r#"RULES_MAP_PETELKA.put("123456789", X);"#]);
    }

    #[test]
    fn test_mixed_line_endings_count_lines() {
        let input = "000012\r\n000107\r\r000212\n\n";
        let result = Mode::FixedWidth.transcoder().run(Cursor::new(input)).unwrap();
        assert_eq!(result.lines_read, 5);
        assert_eq!(result.emitted(), 3);
        assert_eq!(result.skipped, 2);
        assert_eq!(Mode::FixedWidth.transcoder().run_str(input), result);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert_eq!(split_lines("\r\n\r"), vec!["", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_duplicate_keys_still_emitted() {
        let result = Mode::FixedWidth.transcoder().run_str("000012\n000013");
        assert_eq!(result.emitted(), 2);
        assert_eq!(result.duplicates, 1);
    }

    #[test]
    fn test_transcode_reader() {
        let source = Cursor::new("0,1,4,0,0,0,0,0,0,1\n1,2,3\n");
        let out = transcode(source, Mode::Delimited).unwrap();
        assert_eq!(out, vec![r#"RULES_MAP_PETELKA.put("014000000", 1);"#]);
    }

    #[test]
    fn test_read_error_reports_line() {
        let source = Cursor::new(b"000012\n\xff\xfe\n".to_vec());
        let err = transcode(source, Mode::FixedWidth).unwrap_err();
        assert!(matches!(err, TranscodeError::Read { line: 2, .. }));
    }

    #[test]
    fn test_transcode_line() {
        let transcoder = Mode::Delimited.transcoder();
        assert_eq!(
            transcoder.transcode_line(" 3,3,3,3,4,1,0,0,0,0 ").as_deref(),
            Some(r#"RULES_MAP_PETELKA.put("333341000", 0);"#)
        );
        assert_eq!(transcoder.transcode_line("3,3"), None);
    }

    #[test]
    fn test_custom_transcoder() {
        let transcoder = Transcoder::new(Box::new(FixedWidthShape::new(2)), Template::new("M"));
        assert_eq!(transcoder.template().target(), "M");
        let result = transcoder.run_str("ab1\nabc1");
        assert_eq!(result.statements, vec![r#"M.put("ab", 1);"#]);
    }

    #[test]
    fn test_write_to() {
        let result = Mode::FixedWidth.transcoder().run_str("123456\n654321");
        let mut buf = Vec::new();
        result.write_to(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "RULES_MAP.put(\"12345\", 6);\nRULES_MAP.put(\"65432\", 1);\n"
        );
    }

    #[test]
    fn test_default_inputs() {
        assert_eq!(Mode::FixedWidth.default_input(), "LangtonRule.txt");
        assert_eq!(Mode::Delimited.default_input(), "PetelkaRule.txt");
    }

    #[test]
    fn test_langton_fixture() {
        let result = transcode_file(&spec_path("langton-rules.txt"), Mode::FixedWidth).unwrap();
        assert_eq!(result.lines_read, 8);
        assert_eq!(result.emitted(), 5);
        assert_eq!(result.statements[0], r#"RULES_MAP.put("00000", 0);"#);
        assert_eq!(result.statements[4], r#"RULES_MAP.put("00212", 5);"#);
    }

    #[test]
    fn test_petelka_fixture() {
        let result = transcode_file(&spec_path("petelka-rules.txt"), Mode::Delimited).unwrap();
        assert_eq!(result.lines_read, 7);
        assert_eq!(result.emitted(), 4);
        assert_eq!(
            result.statements[3],
            r#"RULES_MAP_PETELKA.put("333200000", 4);"#
        );
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = transcode_file(&spec_path("no-such-rules.txt"), Mode::FixedWidth).unwrap_err();
        assert!(matches!(err, TranscodeError::Open { .. }));
    }
}
