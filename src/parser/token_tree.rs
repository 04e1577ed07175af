//! Bracket-aware token trees built with `chumsky`.
//!
//! A statement's significant tokens are folded into a forest where every
//! bracketed region becomes a [`Group`]. Callers then inspect the shape of a
//! statement (where its `=` sits, whether a value is a single bracketed
//! literal, where the top-level commas are) without re-counting brackets.

use chumsky::Stream;
use chumsky::prelude::*;

use crate::{Span, SyntaxKind};

/// One node of a token forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    /// A single non-delimiter token.
    Leaf(SyntaxKind, Span),
    /// A bracketed group and everything inside it.
    Group(Group),
}

/// A bracketed region such as `[ ... ]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Opening delimiter kind.
    pub open: SyntaxKind,
    /// Span of the opening delimiter.
    pub open_span: Span,
    /// Span of the closing delimiter.
    pub close_span: Span,
    /// Trees between the delimiters.
    pub children: Vec<TokenTree>,
}

impl TokenTree {
    /// Byte range covered by this tree, delimiters included.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Leaf(_, span) => span.clone(),
            Self::Group(group) => group.open_span.start..group.close_span.end,
        }
    }

    /// Whether this tree is a leaf of the given kind.
    #[must_use]
    pub fn is_leaf(&self, kind: SyntaxKind) -> bool {
        matches!(self, Self::Leaf(k, _) if *k == kind)
    }

    /// The leaf kind, or `None` for groups.
    #[must_use]
    pub fn leaf_kind(&self) -> Option<SyntaxKind> {
        match self {
            Self::Leaf(kind, _) => Some(*kind),
            Self::Group(_) => None,
        }
    }
}

/// Byte range covered by a run of trees, or `None` when the run is empty.
#[must_use]
pub fn trees_span(trees: &[TokenTree]) -> Option<Span> {
    let first = trees.first()?;
    let last = trees.last()?;
    Some(first.span().start..last.span().end)
}

/// Split `trees` at every leaf of `kind`.
///
/// Always returns at least one (possibly empty) piece.
#[must_use]
pub fn split_at_leaf(trees: &[TokenTree], kind: SyntaxKind) -> Vec<&[TokenTree]> {
    trees.split(|tree| tree.is_leaf(kind)).collect()
}

/// Whether any tree in `trees` is a leaf of `kind`. Groups are not entered.
#[must_use]
pub fn contains_leaf(trees: &[TokenTree], kind: SyntaxKind) -> bool {
    trees.iter().any(|tree| tree.is_leaf(kind))
}

fn token_forest() -> impl Parser<SyntaxKind, Vec<TokenTree>, Error = Simple<SyntaxKind>> {
    let tree = recursive(|tree| {
        let group = |open: SyntaxKind, close: SyntaxKind| {
            just(open)
                .map_with_span(|_, span: Span| span)
                .then(tree.clone().repeated())
                .then(just(close).map_with_span(|_, span: Span| span))
                .map(move |((open_span, children), close_span)| {
                    TokenTree::Group(Group {
                        open,
                        open_span,
                        close_span,
                        children,
                    })
                })
        };
        let leaf = filter(|kind: &SyntaxKind| {
            !kind.is_opening_delimiter() && !kind.is_closing_delimiter()
        })
        .map_with_span(TokenTree::Leaf);

        choice((
            group(SyntaxKind::T_LPAREN, SyntaxKind::T_RPAREN),
            group(SyntaxKind::T_LBRACKET, SyntaxKind::T_RBRACKET),
            group(SyntaxKind::T_LBRACE, SyntaxKind::T_RBRACE),
            leaf,
        ))
    });
    tree.repeated().then_ignore(end())
}

/// Fold significant tokens into a token forest.
///
/// `eoi` is the offset reported for errors at the end of input.
///
/// # Errors
///
/// Returns the `chumsky` errors when brackets are unbalanced or mismatched.
///
/// # Examples
///
/// ```rust
/// use sort_all::{tokenize_without_trivia, parser::token_tree::{parse_token_trees, TokenTree}};
///
/// let src = "x = [1, (2, 3)]";
/// let trees = parse_token_trees(&tokenize_without_trivia(src), src.len()).unwrap_or_default();
/// assert_eq!(trees.len(), 3);
/// assert!(matches!(trees.last(), Some(TokenTree::Group(_))));
/// ```
pub fn parse_token_trees(
    tokens: &[(SyntaxKind, Span)],
    eoi: usize,
) -> Result<Vec<TokenTree>, Vec<Simple<SyntaxKind>>> {
    let stream = Stream::from_iter(eoi..eoi, tokens.iter().cloned());
    token_forest().parse(stream)
}
