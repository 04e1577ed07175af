//! Span helpers shared by the locator and the rewriter.
//!
//! Tokens carry byte ranges only. Line and column numbers are derived on
//! demand through [`LineIndex`], and neighbouring tokens are found by binary
//! search over the ordered token list.

use crate::{Span, SyntaxKind};

/// Byte offsets of line starts, for mapping offsets to positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `src`. `\n`, `\r\n` and lone `\r` all end a
    /// line.
    #[must_use]
    pub fn new(src: &str) -> Self {
        let bytes = src.as_bytes();
        let mut starts = vec![0];
        for (idx, byte) in bytes.iter().enumerate() {
            let ends_line = match byte {
                b'\n' => true,
                b'\r' => bytes.get(idx + 1) != Some(&b'\n'),
                _ => false,
            };
            if ends_line {
                starts.push(idx + 1);
            }
        }
        Self { starts }
    }

    /// Zero-based line containing `offset`.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Byte offset at which zero-based `line` starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// One-based line and zero-based character column of `offset`.
    ///
    /// Offsets past the end of `src`, or inside a multi-byte character,
    /// are clamped to the nearest preceding character boundary.
    #[must_use]
    pub fn position(&self, src: &str, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let start = self.starts.get(line).copied().unwrap_or(0);
        let column = src
            .get(start..)
            .map_or(0, |rest| {
                rest.char_indices()
                    .take_while(|(idx, _)| start + idx < offset)
                    .count()
            });
        (line + 1, column)
    }

    /// Whether two offsets fall on the same line.
    #[must_use]
    pub fn same_line(&self, a: usize, b: usize) -> bool {
        self.line_of(a) == self.line_of(b)
    }
}

/// Index of the first token starting at or after `offset`.
#[must_use]
pub fn token_index_at(tokens: &[(SyntaxKind, Span)], offset: usize) -> usize {
    tokens.partition_point(|(_, span)| span.start < offset)
}

/// The first non-trivia token starting at or after `offset`.
#[must_use]
pub fn next_significant(
    tokens: &[(SyntaxKind, Span)],
    offset: usize,
) -> Option<&(SyntaxKind, Span)> {
    tokens
        .get(token_index_at(tokens, offset)..)?
        .iter()
        .find(|(kind, _)| !kind.is_trivia())
}

/// Tokens lying entirely within `span`.
#[must_use]
pub fn tokens_within<'a>(
    tokens: &'a [(SyntaxKind, Span)],
    span: &Span,
) -> &'a [(SyntaxKind, Span)] {
    let start = token_index_at(tokens, span.start);
    let end = tokens.partition_point(|(_, s)| s.end <= span.end).max(start);
    tokens.get(start..end).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize_with_trivia;
    use rstest::rstest;

    #[rstest]
    #[case("abc", 0, (1, 0))]
    #[case("abc", 2, (1, 2))]
    #[case("a\nbc", 3, (2, 1))]
    #[case("a\r\nbc", 3, (2, 0))]
    #[case("a\rb", 2, (2, 0))]
    #[case("\u{e9}x", 2, (1, 1))]
    #[case("ab", 10, (1, 2))]
    fn positions(#[case] src: &str, #[case] offset: usize, #[case] expected: (usize, usize)) {
        assert_eq!(LineIndex::new(src).position(src, offset), expected);
    }

    #[test]
    fn same_line_detects_breaks() {
        let src = "[\n  'a',\n  'b']";
        let index = LineIndex::new(src);
        assert!(index.same_line(0, 0));
        assert!(!index.same_line(4, 11));
        assert!(index.same_line(2, 6));
    }

    #[test]
    fn next_significant_skips_trivia() {
        let src = "'a'  # note\n , x";
        let tokens = tokenize_with_trivia(src);
        let found = next_significant(&tokens, 3).map(|(kind, _)| *kind);
        assert_eq!(found, Some(SyntaxKind::T_COMMA));
        assert!(next_significant(&tokens, src.len()).is_none());
    }

    #[test]
    fn tokens_within_respects_bounds() {
        let src = "['a', 'b']";
        let tokens = tokenize_with_trivia(src);
        let inner: Vec<SyntaxKind> = tokens_within(&tokens, &(1..9))
            .iter()
            .map(|(kind, _)| *kind)
            .collect();
        assert_eq!(
            inner,
            vec![
                SyntaxKind::T_STRING,
                SyntaxKind::T_COMMA,
                SyntaxKind::T_WHITESPACE,
                SyntaxKind::T_STRING,
            ]
        );
    }
}
