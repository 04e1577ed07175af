//! Span rewriter.
//!
//! Rebuilds a document from its untouched text and the re-rendered element
//! spans of each export list. Only the bytes between a list's first element
//! start and last element end are replaced, so brackets, surrounding
//! comments and whitespace survive as written.

use log::{debug, warn};

use crate::literal::quote;
use crate::locator::ElementList;
use crate::span_utils::{LineIndex, next_significant, tokens_within};
use crate::{Span, SyntaxKind};

/// How the elements of a list are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Elements joined by `", "` on one line.
    SingleLine,
    /// One element per line, each followed by a comma.
    MultiLine {
        /// Text placed between elements: a line break plus indentation.
        separator: String,
    },
}

fn is_indent(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\x0c'))
}

fn leading_indent(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !matches!(c, ' ' | '\t' | '\x0c'))
        .map_or(line.len(), |(idx, _)| idx);
    line.get(..end).unwrap_or_default()
}

/// Indentation for multi-line output.
///
/// The whitespace that begins the first element's line, or, when the first
/// element shares its line with other code, the indentation of the next line
/// inside the list.
fn indentation<'s>(src: &'s str, index: &LineIndex, span: &Span) -> &'s str {
    let first_line = index.line_of(span.start);
    let line_start = index.line_start(first_line).unwrap_or(span.start);
    let before = src.get(line_start..span.start).unwrap_or_default();
    if is_indent(before) {
        return before;
    }
    index
        .line_start(first_line + 1)
        .filter(|&start| start < span.end)
        .and_then(|start| src.get(start..span.end))
        .map_or("", leading_indent)
}

/// The line ending used inside `span`, defaulting to `\n`.
fn line_ending<'s>(src: &'s str, tokens: &[(SyntaxKind, Span)], span: &Span) -> &'s str {
    tokens_within(tokens, span)
        .iter()
        .find_map(|(kind, token)| {
            let text = src.get(token.clone())?;
            match kind {
                SyntaxKind::T_NEWLINE => Some(text),
                SyntaxKind::T_LINE_CONTINUATION => text.strip_prefix('\\'),
                _ => None,
            }
        })
        .unwrap_or("\n")
}

/// Choose the layout of `list` from its current text.
#[must_use]
pub fn layout(
    src: &str,
    tokens: &[(SyntaxKind, Span)],
    index: &LineIndex,
    list: &ElementList,
) -> Layout {
    let span = list.span();
    if index.same_line(span.start, span.end) {
        return Layout::SingleLine;
    }
    let eol = line_ending(src, tokens, &span);
    let line_break = if list.container.is_bare() {
        format!(" \\{eol}")
    } else {
        eol.to_owned()
    };
    Layout::MultiLine {
        separator: format!("{line_break}{}", indentation(src, index, &span)),
    }
}

/// Render the sorted elements of `list` in `layout`.
///
/// The sort is stable and compares decoded values by code point.
#[must_use]
pub fn render(list: &ElementList, layout: &Layout) -> String {
    let mut values: Vec<&str> = list.elements.iter().map(|e| e.value.as_str()).collect();
    values.sort();
    let quoted = values.iter().map(|value| quote(value));
    match layout {
        Layout::SingleLine => quoted.collect::<Vec<_>>().join(", "),
        Layout::MultiLine { separator } => quoted
            .map(|q| format!("{q},"))
            .collect::<Vec<_>>()
            .join(separator.as_str()),
    }
}

/// Rewrite `src`, replacing the element span of every list in `lists`.
///
/// `tokens` must be the trivia-preserving token stream of `src`. Lists are
/// applied in source order; a list overlapping the previous one is ignored.
///
/// # Examples
///
/// ```rust
/// use sort_all::{parse, tokenize_with_trivia, config::DeclarationPolicy};
/// use sort_all::{locator::locate, rewriter::rewrite};
///
/// let src = "__all__ = ['b', 'a']\n";
/// let lists = locate(&parse(src).root(), src, DeclarationPolicy::Each).lists;
/// let out = rewrite(src, &tokenize_with_trivia(src), &lists);
/// assert_eq!(out, "__all__ = [\"a\", \"b\"]\n");
/// ```
#[must_use]
pub fn rewrite(src: &str, tokens: &[(SyntaxKind, Span)], lists: &[ElementList]) -> String {
    if lists.is_empty() {
        return src.to_owned();
    }
    let index = LineIndex::new(src);
    let mut out = String::with_capacity(src.len());
    let mut cursor = 0;

    for list in lists {
        let span = list.span();
        let Some(prefix) = src
            .get(cursor..span.start)
            .filter(|_| span.end <= src.len())
        else {
            warn!("export list at {span:?} is out of order or out of bounds, ignoring");
            continue;
        };
        out.push_str(prefix);

        let layout = layout(src, tokens, &index, list);
        let mut body = render(list, &layout);
        let next_is_comma = next_significant(tokens, span.end)
            .is_some_and(|(kind, _)| *kind == SyntaxKind::T_COMMA);
        if next_is_comma && body.ends_with(',') {
            body.pop();
        }
        debug!("rewriting export list at {span:?} as {layout:?}");
        out.push_str(&body);
        cursor = span.end;
    }

    out.push_str(src.get(cursor..).unwrap_or_default());
    out
}
