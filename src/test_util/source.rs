//! Fixture text helpers.

/// Remove the common leading whitespace of every non-blank line.
///
/// Blank lines are kept empty and the line terminators are preserved, so a
/// fixture ending in a newline keeps it.
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "test-support")]
/// # {
/// use sort_all::test_util::dedent;
/// assert_eq!(dedent("    a\n      b\n"), "a\n  b\n");
/// # }
/// ```
#[must_use]
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.trim_start_matches([' ', '\t'])
            } else {
                line.get(margin..).unwrap_or(line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("    x = 1\n", "x = 1\n")]
    #[case("    a\n\n      b\n    ", "a\n\n  b\n")]
    #[case("no margin\n  indented\n", "no margin\n  indented\n")]
    fn removes_common_margin(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(dedent(input), expected);
    }
}
