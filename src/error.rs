//! Error types for rule transcoding.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a transcode run.
///
/// Malformed input lines are never errors; they are skipped by the shape
/// check. Only I/O on the input source or output sink can fail.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("cannot open input file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
