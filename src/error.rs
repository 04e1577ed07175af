//! Errors raised while processing files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Per-file failures. Each one makes the run exit with status 1.
#[derive(Debug, Error)]
pub enum FixError {
    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid UTF-8.
    #[error("{} is non-utf8 (not supported)", path.display())]
    NonUtf8 { path: PathBuf },
    /// Writing a report line failed.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}
