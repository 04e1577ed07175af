//! Assertion helpers for verifying fix results in tests.

use crate::config::DeclarationPolicy;
use crate::fix::fix_source;

/// Assert that a parser produced no errors.
///
/// # Examples
///
/// ```
/// use sort_all::test_util::assert_no_parse_errors;
/// let errors: Vec<chumsky::error::Simple<sort_all::SyntaxKind>> = Vec::new();
/// assert_no_parse_errors(&errors);
/// ```
///
/// # Panics
/// Panics if `errors` is not empty.
#[track_caller]
pub fn assert_no_parse_errors<E: std::fmt::Debug>(errors: &[E]) {
    assert!(errors.is_empty(), "Parse errors: {errors:?}");
}

/// Assert that fixing `src` with the default policy yields `expected`, and
/// that fixing the result again changes nothing.
///
/// # Examples
///
/// ```
/// use sort_all::test_util::assert_fixes_to;
/// assert_fixes_to("__all__ = ['b', 'a']\n", "__all__ = [\"a\", \"b\"]\n");
/// ```
///
/// # Panics
/// Panics if either rewrite differs from what is expected.
#[track_caller]
pub fn assert_fixes_to(src: &str, expected: &str) {
    let fixed = fix_source(src, DeclarationPolicy::Each);
    assert_eq!(fixed.text, expected, "unexpected rewrite of:\n{src}");
    let again = fix_source(&fixed.text, DeclarationPolicy::Each);
    assert_eq!(again.text, fixed.text, "rewrite is not a fixed point");
}

/// Assert that fixing `src` under `policy` leaves it byte-identical.
///
/// # Panics
/// Panics if the source is modified.
#[track_caller]
pub fn assert_unchanged(src: &str, policy: DeclarationPolicy) {
    assert_eq!(fix_source(src, policy).text, src);
}
