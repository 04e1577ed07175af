//! Token stream utilities.
//!
//! Provides a cursor-based wrapper around a slice of tokens for safer
//! navigation while the statement scanner walks logical lines.
//!
//! This abstraction removes manual index manipulation and keeps the
//! scanner free of slice indexing.
use crate::{Span, SyntaxKind};

#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    tokens: &'a [(SyntaxKind, Span)],
    cursor: usize,
}

impl<'a> TokenStream<'a> {
    /// Constructs a new `TokenStream` over the provided tokens.
    ///
    /// The stream starts with the cursor at the beginning of the token slice.
    #[must_use]
    pub(crate) fn new(tokens: &'a [(SyntaxKind, Span)]) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Returns the token at the current cursor position, if any.
    ///
    /// Returns `None` if the cursor is at or beyond the end of the token stream.
    #[must_use]
    pub(crate) fn peek(&self) -> Option<&'a (SyntaxKind, Span)> {
        self.tokens.get(self.cursor)
    }

    /// Returns the kind of the token at the cursor, if any.
    #[must_use]
    pub(crate) fn peek_kind(&self) -> Option<SyntaxKind> {
        self.peek().map(|(kind, _)| *kind)
    }

    /// Moves the cursor forward by one token if not already at the end of the token stream.
    pub(crate) fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    /// Returns the token at the cursor and advances past it.
    pub(crate) fn next_token(&mut self) -> Option<&'a (SyntaxKind, Span)> {
        let token = self.peek();
        self.advance();
        token
    }

    /// Whether every token has been consumed.
    #[must_use]
    pub(crate) fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Advances the cursor past inline whitespace.
    ///
    /// Returns `true` when at least one whitespace token was skipped. Newlines,
    /// comments and continuations are left in place.
    pub(crate) fn skip_inline_ws(&mut self) -> bool {
        let start = self.cursor;
        while self.peek_kind() == Some(SyntaxKind::T_WHITESPACE) {
            self.advance();
        }
        self.cursor > start
    }

    /// Advances the cursor up to and including the next newline token.
    pub(crate) fn skip_line(&mut self) {
        while let Some((kind, _)) = self.next_token() {
            if *kind == SyntaxKind::T_NEWLINE {
                break;
            }
        }
    }
}
