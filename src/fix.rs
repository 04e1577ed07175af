//! Glue between the rewrite engine and the file system.
//!
//! [`fix_source`] is the pure text-to-text entry point. [`fix_file`] applies
//! it to one file and reports what happened, and [`run`] folds the per-file
//! results into an exit status.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::{Config, DeclarationPolicy};
use crate::error::FixError;
use crate::locator::{Diagnostic, locate};
use crate::parser::parse_tokens;
use crate::rewriter::rewrite;
use crate::span_utils::LineIndex;
use crate::tokenize_with_trivia;

/// Result of [`fix_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
    /// The rewritten source, or the input when nothing was sorted.
    pub text: String,
    /// Declarations that were found but left unsorted.
    pub diagnostics: Vec<Diagnostic>,
}

/// Sort the export lists of `src`.
///
/// Sources that do not parse are returned unchanged without diagnostics.
///
/// # Examples
///
/// ```rust
/// use sort_all::{config::DeclarationPolicy, fix::fix_source};
///
/// let fixed = fix_source("__all__ = ('b', 'a')\n", DeclarationPolicy::Each);
/// assert_eq!(fixed.text, "__all__ = (\"a\", \"b\")\n");
/// ```
#[must_use]
pub fn fix_source(src: &str, policy: DeclarationPolicy) -> Fixed {
    let tokens = tokenize_with_trivia(src);
    let parsed = parse_tokens(&tokens, src);
    if !parsed.errors().is_empty() {
        debug!("source does not parse, leaving it unchanged: {:?}", parsed.errors());
        return Fixed {
            text: src.to_owned(),
            diagnostics: Vec::new(),
        };
    }
    let located = locate(parsed.root(), src, policy);
    Fixed {
        text: rewrite(src, &tokens, &located.lists),
        diagnostics: located.diagnostics,
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Already sorted, or nothing to sort.
    Unchanged,
    /// Unsorted; reported but not modified (check mode).
    Unsorted,
    /// Rewritten in place.
    Rewritten,
}

impl FileStatus {
    /// Exit status contributed by this file.
    #[must_use]
    pub fn code(self, config: &Config) -> u8 {
        match self {
            Self::Unchanged => 0,
            Self::Unsorted | Self::Rewritten => u8::from(config.error_on_fix),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FixError + '_ {
    move |source| FixError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Sort the export lists of the file at `path`.
///
/// Diagnostics and the `Found unsorted` / `Rewriting` notices are written to
/// `out`.
///
/// # Errors
///
/// Returns [`FixError`] when the file cannot be read, decoded or written, or
/// when writing to `out` fails.
pub fn fix_file(
    path: &Path,
    config: &Config,
    out: &mut impl Write,
) -> Result<FileStatus, FixError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    let src = String::from_utf8(bytes).map_err(|_| FixError::NonUtf8 {
        path: path.to_path_buf(),
    })?;

    let fixed = fix_source(&src, config.policy);
    if !fixed.diagnostics.is_empty() {
        let index = LineIndex::new(&src);
        for diagnostic in &fixed.diagnostics {
            let (line, column) = index.position(&src, diagnostic.span.start);
            writeln!(
                out,
                "{}:{line}:{column}: {}",
                path.display(),
                diagnostic.reason
            )?;
        }
    }

    if fixed.text == src {
        return Ok(FileStatus::Unchanged);
    }
    if config.check {
        writeln!(out, "Found unsorted {}", path.display())?;
        return Ok(FileStatus::Unsorted);
    }
    writeln!(out, "Rewriting {}", path.display())?;
    fs::write(path, fixed.text).map_err(io_error(path))?;
    Ok(FileStatus::Rewritten)
}

/// Process every accepted path and return the combined exit status.
///
/// Paths without a configured extension are skipped. A failure on one file
/// is reported and does not stop the others.
pub fn run(
    config: &Config,
    paths: &[PathBuf],
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    paths
        .iter()
        .filter(|path| {
            let accepted = config.accepts(path);
            if !accepted {
                debug!("skipping {}", path.display());
            }
            accepted
        })
        .fold(0, |status, path| {
            let code = match fix_file(path, config, out) {
                Ok(file_status) => file_status.code(config),
                Err(error) => {
                    let sink: &mut dyn Write = match error {
                        FixError::NonUtf8 { .. } => &mut *out,
                        FixError::Io { .. } | FixError::Output(_) => &mut *err,
                    };
                    if writeln!(sink, "{error}").is_err() {
                        warn!("could not report: {error}");
                    }
                    1
                }
            };
            status | code
        })
}
