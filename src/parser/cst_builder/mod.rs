//! CST construction utilities.
//!
//! Provides [`Parsed`], [`StatementSpans`] and [`build_green_tree`].

use chumsky::error::Simple;

use crate::SyntaxKind;

mod spans;
mod tree;

pub use self::spans::{
    SpanListIssue, SpanListValidationError, StatementSpans, StatementSpansBuilder,
};
pub(crate) use self::tree::build_green_tree;

/// Result of a parse operation.
#[derive(Debug)]
pub struct Parsed {
    root: super::ast::Root,
    errors: Vec<Simple<SyntaxKind>>,
}

impl Parsed {
    pub(super) fn new(root: super::ast::Root, errors: Vec<Simple<SyntaxKind>>) -> Self {
        Self { root, errors }
    }

    /// Access the typed AST root.
    #[must_use]
    pub fn root(&self) -> &super::ast::Root {
        &self.root
    }

    /// Access errors collected while scanning statements.
    #[must_use]
    pub fn errors(&self) -> &[Simple<SyntaxKind>] {
        &self.errors
    }
}
