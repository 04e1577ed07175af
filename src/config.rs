//! Run configuration and command-line parsing.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

/// What to do when a module declares `__all__` more than once.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum DeclarationPolicy {
    /// Sort every declaration independently.
    #[default]
    Each,
    /// Only sort the last declaration.
    Last,
    /// Leave the file alone when two declarations assign containers.
    Skip,
}

/// File extensions processed by default.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["py", "pyi", "pyx", "pyd"];

/// Options controlling a run over many files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Report unsorted files instead of rewriting them.
    pub check: bool,
    /// Whether a fixed file makes the run fail.
    pub error_on_fix: bool,
    pub policy: DeclarationPolicy,
    /// Extensions, without the dot, of files to process.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check: false,
            error_on_fix: true,
            policy: DeclarationPolicy::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Config {
    /// Whether `path` has one of the configured extensions.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Sort `__all__` records alphabetically.
#[derive(Parser, Debug)]
#[command(name = "sort-all", version)]
pub struct Cli {
    /// Report files that would change without modifying them. Exits with 1
    /// when any file would be rewritten.
    #[arg(long)]
    pub check: bool,
    /// Exit with 0 even when files were, or would be, rewritten.
    #[arg(long = "no-error-on-fix")]
    pub no_error_on_fix: bool,
    /// How to treat modules that declare `__all__` more than once.
    #[arg(long, value_enum, default_value_t = DeclarationPolicy::Each)]
    pub policy: DeclarationPolicy,
    /// Files to process.
    pub filenames: Vec<PathBuf>,
}

impl Cli {
    /// Split the parsed arguments into a [`Config`] and the file list.
    #[must_use]
    pub fn into_parts(self) -> (Config, Vec<PathBuf>) {
        let config = Config {
            check: self.check,
            error_on_fix: !self.no_error_on_fix,
            policy: self.policy,
            ..Config::default()
        };
        (config, self.filenames)
    }
}
