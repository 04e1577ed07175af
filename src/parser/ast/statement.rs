//!
//! AST wrapper for a single logical statement.
//!
//! A [`Statement`] exposes its significant tokens, the token forest built
//! from them, and, when the statement is one, the shape of the assignment it
//! performs. Target and value expressions are returned as token trees, which
//! is enough to recognise names and container literals without a full
//! expression grammar.

use chumsky::error::Simple;

use super::AstNode;
use crate::parser::token_tree::{TokenTree, parse_token_trees};
use crate::{PythonLanguage, Span, SyntaxKind};

/// Typed wrapper for a statement node.
#[derive(Debug, Clone)]
pub struct Statement {
    pub(crate) syntax: rowan::SyntaxNode<PythonLanguage>,
}

/// The assignment forms a statement can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// `a = b = value`. Every target precedes one `=`.
    Assign {
        targets: Vec<Vec<TokenTree>>,
        value: Vec<TokenTree>,
    },
    /// `target op= value`.
    AugAssign {
        target: Vec<TokenTree>,
        value: Vec<TokenTree>,
    },
    /// `target: annotation` with an optional `= value`.
    AnnAssign {
        target: Vec<TokenTree>,
        annotation: Vec<TokenTree>,
        value: Option<Vec<TokenTree>>,
    },
}

impl Statement {
    /// Text content of this statement.
    #[must_use]
    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }

    /// Non-trivia tokens of the statement with their source spans.
    #[must_use]
    pub fn significant_tokens(&self) -> Vec<(SyntaxKind, Span)> {
        self.syntax
            .descendants_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .filter(|t| !t.kind().is_trivia())
            .map(|t| {
                let range = t.text_range();
                (t.kind(), usize::from(range.start())..usize::from(range.end()))
            })
            .collect()
    }

    /// Fold the significant tokens into a bracket-aware forest.
    ///
    /// # Errors
    ///
    /// Returns `chumsky` errors when the statement's brackets do not balance.
    pub fn token_trees(&self) -> Result<Vec<TokenTree>, Vec<Simple<SyntaxKind>>> {
        parse_token_trees(&self.significant_tokens(), self.span().end)
    }

    /// The assignment performed by this statement, if it is one.
    ///
    /// Statements whose tokens do not form a forest yield `None`; the
    /// failure is logged at debug level.
    #[must_use]
    pub fn assignment(&self) -> Option<Assignment> {
        match self.token_trees() {
            Ok(trees) => assignment_from_trees(trees),
            Err(errors) => {
                log::debug!("statement {:?} is not balanced: {errors:?}", self.span());
                None
            }
        }
    }
}

impl_ast_node!(Statement);

fn position_of(trees: &[TokenTree], kind: SyntaxKind) -> Option<usize> {
    trees.iter().position(|tree| tree.is_leaf(kind))
}

/// Classify a statement forest by its top-level `=`, `op=` and `:` leaves.
///
/// The first of these decides the form: an annotation colon or augmented
/// operator only counts when it comes before any plain `=`, which keeps
/// lambdas and defaults inside values from being mistaken for targets.
fn assignment_from_trees(mut trees: Vec<TokenTree>) -> Option<Assignment> {
    let eq = position_of(&trees, SyntaxKind::T_EQ);
    let before_eq = |idx: usize| eq.is_none_or(|eq| idx < eq);

    if let Some(op) = position_of(&trees, SyntaxKind::T_AUG_ASSIGN).filter(|&i| before_eq(i)) {
        let value = trees.split_off(op + 1);
        trees.pop();
        return Some(Assignment::AugAssign {
            target: trees,
            value,
        });
    }

    if let Some(colon) = position_of(&trees, SyntaxKind::T_COLON).filter(|&i| before_eq(i)) {
        let value = eq.map(|eq| {
            let value = trees.split_off(eq + 1);
            trees.pop();
            value
        });
        let annotation = trees.split_off(colon + 1);
        trees.pop();
        return Some(Assignment::AnnAssign {
            target: trees,
            annotation,
            value,
        });
    }

    eq?;
    let mut parts: Vec<Vec<TokenTree>> = trees
        .split(|tree| tree.is_leaf(SyntaxKind::T_EQ))
        .map(<[TokenTree]>::to_vec)
        .collect();
    let value = parts.pop()?;
    Some(Assignment::Assign {
        targets: parts,
        value,
    })
}
