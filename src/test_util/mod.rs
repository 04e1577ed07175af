//! Helpers for building Python fixtures and asserting over fix results in
//! tests.
//!
//! Fixtures are written as indented raw strings and run through [`dedent`];
//! the assertions wrap [`crate::fix::fix_source`] so tests read as
//! before/after pairs.

mod assertions;
mod source;

pub use assertions::{assert_fixes_to, assert_no_parse_errors, assert_unchanged};
pub use source::dedent;

use crate::{Span, SyntaxKind, tokenize_with_trivia};

/// Tokenize `src` into `(SyntaxKind, Span)` pairs using
/// [`tokenize_with_trivia`].
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "test-support")]
/// # {
/// use sort_all::test_util::tokenize;
/// assert!(tokenize("__all__ = ['a']").len() > 0);
/// # }
/// ```
#[must_use]
pub fn tokenize(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_with_trivia(src)
}
