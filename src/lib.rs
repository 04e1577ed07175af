//! Library crate for sort-all.
//!
//! Sorts the string literals of a Python module's `__all__` declaration while
//! leaving every other byte of the source untouched. Exposes the tokenizer,
//! the statement-level parser, the declaration locator and the span rewriter,
//! plus the file-level driver used by the `sort-all` binary.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fix;
pub mod language;
pub mod literal;
pub mod locator;
pub mod parser;
pub mod rewriter;
pub mod span_utils;
pub mod tokenizer;

// Only expose test utilities to tests and opt-in consumers.
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_util;

pub use config::{Config, DeclarationPolicy};
pub use error::FixError;
pub use fix::{FileStatus, Fixed, fix_file, fix_source, run};
pub use language::{PythonLanguage, SyntaxKind};
pub use locator::{Diagnostic, ElementList, Located, SkipReason, locate};
pub use parser::{Parsed, ast, parse};
pub use rewriter::rewrite;
pub use tokenizer::{Span, tokenize_with_trivia, tokenize_without_trivia};
