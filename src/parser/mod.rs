//! Statement-level parser producing a rowan CST.
//!
//! This module contains the entry point for parsing Python source. The
//! parser does not implement the Python expression grammar. It tokenises
//! the input, splits it into logical lines, marks top-level simple
//! statements and block lines as nodes, and wraps every token into a
//! `rowan::GreenNode` so the tree reproduces the source byte for byte.
//! Statement internals are examined on demand through
//! [`token_tree`] forests.

use log::warn;

use crate::{Span, SyntaxKind, tokenize_with_trivia};

pub mod ast;
mod cst_builder;
mod statement_scanner;
mod token_stream;
pub mod token_tree;

pub use cst_builder::{
    Parsed, SpanListIssue, SpanListValidationError, StatementSpans, StatementSpansBuilder,
};

use cst_builder::build_green_tree;
use statement_scanner::scan_statements;

/// Parse Python source into a CST.
///
/// Scanning errors (unknown tokens, unbalanced brackets, unterminated
/// strings, impossible statements) are collected in [`Parsed::errors`]; a
/// tree is always built.
///
/// # Examples
///
/// ```rust
/// use sort_all::parse;
///
/// let parsed = parse("__all__ = ('b', 'a')\n");
/// assert!(parsed.errors().is_empty());
/// assert_eq!(parsed.root().statements().len(), 1);
/// ```
#[must_use]
pub fn parse(src: &str) -> Parsed {
    let tokens = tokenize_with_trivia(src);
    parse_tokens(&tokens, src)
}

/// Parse an already tokenised source.
///
/// `tokens` must come from [`tokenize_with_trivia`] over `src`.
#[must_use]
pub fn parse_tokens(tokens: &[(SyntaxKind, Span)], src: &str) -> Parsed {
    let scanned = scan_statements(tokens, src.len());
    let mut errors = scanned.errors;

    let spans = StatementSpans::builder()
        .simple(scanned.simple)
        .blocks(scanned.blocks)
        .build()
        .unwrap_or_else(|err| {
            warn!("discarding invalid statement spans: {err}");
            errors.push(chumsky::error::Simple::custom(0..0, err.to_string()));
            StatementSpans::default()
        });

    let green = build_green_tree(tokens, src, &spans);
    Parsed::new(ast::Root::from_green(green), errors)
}
