//! Scanner splitting a token stream into logical lines.
//!
//! Python statements end at a newline that is not enclosed by brackets or
//! escaped with a backslash. The scanner walks the token stream once,
//! tracking bracket depth, and records two span lists: simple statements at
//! module top level (split on `;`), and every other logical line (indented
//! block bodies and compound statement headers). Bracket mismatches,
//! unrecognised tokens and simple statements that cannot be valid Python
//! (an assignment missing a side, a dangling operator, an empty statement)
//! are reported as `chumsky` errors so the caller can treat the source as
//! syntactically invalid. Compound statement lines are not checked.

use chumsky::Error as ChumskyError;
use chumsky::error::Simple;

use super::token_stream::TokenStream;
use crate::{Span, SyntaxKind};

/// Spans produced by [`scan_statements`].
#[derive(Debug, Default)]
pub(super) struct ScannedStatements {
    pub(super) simple: Vec<Span>,
    pub(super) blocks: Vec<Span>,
    pub(super) errors: Vec<Simple<SyntaxKind>>,
}

/// Tokens of one `;`-separated statement at bracket depth zero.
///
/// A bracketed group is recorded as its opening and closing delimiters.
#[derive(Debug, Default)]
struct Segment {
    kinds: Vec<SyntaxKind>,
    span: Option<Span>,
}

impl Segment {
    fn extend_span(&mut self, span: &Span) {
        self.span = Some(match self.span.take() {
            Some(prev) => prev.start..span.end,
            None => span.clone(),
        });
    }
}

/// Why a statement cannot be valid Python, if it cannot.
///
/// `last` marks the final statement of a line, which may be empty after a
/// trailing `;`.
fn segment_error(kinds: &[SyntaxKind], last: bool) -> Option<&'static str> {
    let (Some(&first), Some(&end)) = (kinds.first(), kinds.last()) else {
        return (!last).then_some("empty statement");
    };
    let adjacent_assignments = kinds
        .windows(2)
        .any(|pair| matches!(pair, [a, b] if a.is_assignment() && b.is_assignment()));
    if first.is_assignment() || adjacent_assignments {
        return Some("assignment without a target");
    }
    if first == SyntaxKind::K_FROM && !kinds.contains(&SyntaxKind::K_IMPORT) {
        return Some("`from` without `import`");
    }
    let star_import = kinds.ends_with(&[SyntaxKind::K_IMPORT, SyntaxKind::T_STAR]);
    if end.needs_operand() && !star_import {
        return Some("statement ends with an operator");
    }
    None
}

struct Scanner<'a> {
    stream: TokenStream<'a>,
    eoi: usize,
    out: ScannedStatements,
}

/// Convert a delimiter [`SyntaxKind`] to a printable character.
fn token_display(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::T_LPAREN => "(",
        SyntaxKind::T_RPAREN => ")",
        SyntaxKind::T_LBRACE => "{",
        SyntaxKind::T_RBRACE => "}",
        SyntaxKind::T_LBRACKET => "[",
        SyntaxKind::T_RBRACKET => "]",
        _ => "",
    }
}

impl<'a> Scanner<'a> {
    fn new(tokens: &'a [(SyntaxKind, Span)], eoi: usize) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            eoi,
            out: ScannedStatements::default(),
        }
    }

    fn run(mut self) -> ScannedStatements {
        if self.stream.peek_kind() == Some(SyntaxKind::T_BOM) {
            self.stream.advance();
        }
        while !self.stream.is_at_end() {
            self.scan_logical_line();
        }
        self.out
    }

    fn scan_logical_line(&mut self) {
        let indented = self.stream.skip_inline_ws();
        match self.stream.peek_kind() {
            None => {}
            Some(SyntaxKind::T_NEWLINE | SyntaxKind::T_COMMENT) => self.stream.skip_line(),
            Some(first) => {
                let nested = indented || first.starts_compound_statement();
                let checked = !first.starts_compound_statement();
                let pieces = self.collect_line(!nested, checked);
                if nested {
                    self.out.blocks.extend(pieces);
                } else {
                    self.out.simple.extend(pieces);
                }
            }
        }
    }

    /// Consume one logical line and return the spans of its statements.
    ///
    /// Each span runs from the first to the last significant token of a
    /// statement, so surrounding trivia stays outside the node. With
    /// `checked`, every `;`-separated statement is also validated.
    fn collect_line(&mut self, split_on_semicolons: bool, checked: bool) -> Vec<Span> {
        let mut open: Vec<(SyntaxKind, Span)> = Vec::new();
        let mut pieces = Vec::new();
        let mut current: Option<Span> = None;
        let mut segment = Segment::default();

        while let Some((kind, span)) = self.stream.peek().cloned() {
            let outer = open.is_empty();
            match kind {
                SyntaxKind::T_NEWLINE if outer => {
                    self.stream.advance();
                    break;
                }
                SyntaxKind::T_SEMI if outer => {
                    if checked {
                        self.check_segment(&std::mem::take(&mut segment), &span, false);
                    }
                    if split_on_semicolons {
                        self.stream.advance();
                        pieces.extend(current.take());
                        continue;
                    }
                }
                k if k.is_opening_delimiter() => open.push((k, span.clone())),
                k if k.is_closing_delimiter() => self.close_delimiter(&mut open, k, &span),
                SyntaxKind::N_ERROR => self
                    .out
                    .errors
                    .push(Simple::custom(span.clone(), "unrecognised token")),
                _ => {}
            }
            if !kind.is_trivia() {
                if kind != SyntaxKind::T_SEMI {
                    if outer || open.is_empty() {
                        segment.kinds.push(kind);
                    }
                    segment.extend_span(&span);
                }
                current = Some(match current {
                    Some(prev) => prev.start..span.end,
                    None => span,
                });
            }
            self.stream.advance();
        }

        if checked && open.is_empty() {
            let eoi = self.eoi..self.eoi;
            self.check_segment(&segment, &eoi, true);
        }
        for (kind, span) in open {
            let closer = kind.matching_closer().unwrap_or(kind);
            self.out.errors.push(Simple::unclosed_delimiter(
                span,
                kind,
                self.eoi..self.eoi,
                closer,
                None,
            ));
        }
        pieces.extend(current);
        pieces
    }

    /// Record an error when `segment` cannot be a valid statement.
    ///
    /// `fallback` locates errors for empty statements.
    fn check_segment(&mut self, segment: &Segment, fallback: &Span, last: bool) {
        if let Some(message) = segment_error(&segment.kinds, last) {
            let span = segment.span.clone().unwrap_or_else(|| fallback.clone());
            self.out.errors.push(Simple::custom(span, message));
        }
    }

    fn close_delimiter(
        &mut self,
        open: &mut Vec<(SyntaxKind, Span)>,
        kind: SyntaxKind,
        span: &Span,
    ) {
        match open.pop() {
            Some((opener, _)) if opener.matching_closer() == Some(kind) => {}
            Some((opener, open_span)) => {
                let closer = opener.matching_closer().unwrap_or(opener);
                self.out.errors.push(Simple::unclosed_delimiter(
                    open_span,
                    opener,
                    span.clone(),
                    closer,
                    Some(kind),
                ));
            }
            None => self.out.errors.push(Simple::custom(
                span.clone(),
                format!("unexpected '{}'", token_display(kind)),
            )),
        }
    }
}

/// Split `tokens` into top-level simple statements and block lines.
///
/// `eoi` is the source length, used for errors about brackets left open at
/// the end of input.
pub(super) fn scan_statements(tokens: &[(SyntaxKind, Span)], eoi: usize) -> ScannedStatements {
    Scanner::new(tokens, eoi).run()
}
