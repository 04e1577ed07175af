//! Declaration locator.
//!
//! Walks the top-level statements of a parsed module and finds assignments
//! to `__all__` whose value is a list, tuple or set of string literals. The
//! search is a fold over the statement sequence: each statement either
//! contributes a [`Declaration`], or nothing, and the configured
//! [`DeclarationPolicy`] then decides which declarations are analysed.
//!
//! A declaration whose container holds anything other than string literals
//! is reported as a [`Diagnostic`] and left alone.

use std::fmt;

use log::debug;

use crate::config::DeclarationPolicy;
use crate::literal::{self, LiteralError, LiteralKind};
use crate::parser::ast::{AstNode, Assignment, Root, Statement};
use crate::parser::token_tree::{Group, TokenTree, contains_leaf, split_at_leaf, trees_span};
use crate::{Span, SyntaxKind};

/// The export-list name.
pub const EXPORT_NAME: &str = "__all__";

/// The assignment form that declares an export list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `__all__ = [...]`
    Assign,
    /// `__all__ += [...]`
    AugAssign,
    /// `__all__: T = [...]`
    AnnAssign,
}

/// The container literal holding the exported names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Tuple,
    Set,
}

/// A container and, unless it is a bare tuple, its opening delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    pub open: Option<Span>,
}

impl Container {
    /// Whether this is a tuple written without parentheses.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.open.is_none()
    }
}

/// One string element of an export list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Source span of the element, implicit concatenations included.
    pub span: Span,
    /// The decoded string value.
    pub value: String,
}

/// A validated export list ready to be sorted.
///
/// Always holds at least one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementList {
    pub declaration: DeclarationKind,
    pub container: Container,
    pub elements: Vec<Element>,
}

impl ElementList {
    /// Span from the first element's start to the last element's end.
    #[must_use]
    pub fn span(&self) -> Span {
        let start = self.elements.first().map_or(0, |e| e.span.start);
        let end = self.elements.last().map_or(start, |e| e.span.end);
        start..end
    }
}

/// Why a declaration was left unsorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// An element that is not a constant, with its source text.
    NonConstant(String),
    /// A constant element that is not a string.
    NonString(String),
    /// A string element whose value cannot be decoded.
    Undecodable(String),
    /// A comment sits between the elements.
    CommentInside,
    /// More than one declaration assigns a container.
    Ambiguous,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonConstant(text) => write!(
                f,
                "{EXPORT_NAME} found but it has non-const element {text}, skip sorting"
            ),
            Self::NonString(text) => write!(
                f,
                "{EXPORT_NAME} found but it has non-string element {text}, skip sorting"
            ),
            Self::Undecodable(text) => write!(
                f,
                "{EXPORT_NAME} found but it has undecodable element {text}, skip sorting"
            ),
            Self::CommentInside => write!(
                f,
                "{EXPORT_NAME} found but it has comments between elements, skip sorting"
            ),
            Self::Ambiguous => f.write_str("ambiguous export-list declaration, skipping"),
        }
    }
}

/// A skipped declaration and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub reason: SkipReason,
}

/// Result of [`locate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    /// Sortable lists in source order.
    pub lists: Vec<ElementList>,
    /// Declarations that were found but skipped.
    pub diagnostics: Vec<Diagnostic>,
}

/// A top-level assignment to `__all__`.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub statement: Statement,
    pub value: Vec<TokenTree>,
}

enum Shape<'a> {
    Container {
        container: Container,
        items: &'a [TokenTree],
    },
    Other,
}

enum ElementCheck {
    Valid(Element),
    Skip(Diagnostic),
    Malformed,
}

fn tree_text<'s>(src: &'s str, span: &Span) -> &'s str {
    src.get(span.clone()).unwrap_or_default()
}

/// Whether `target` is the bare export name, possibly parenthesised.
fn is_export_target(target: &[TokenTree], src: &str) -> bool {
    match target {
        [TokenTree::Leaf(SyntaxKind::T_IDENT, span)] => tree_text(src, span) == EXPORT_NAME,
        [
            TokenTree::Group(Group {
                open: SyntaxKind::T_LPAREN,
                children,
                ..
            }),
        ] => is_export_target(children, src),
        _ => false,
    }
}

/// Match a statement against the three assignment forms.
fn declaration(statement: &Statement, src: &str) -> Option<Declaration> {
    let (kind, value) = match statement.assignment()? {
        Assignment::Assign { targets, value } => targets
            .iter()
            .any(|target| is_export_target(target, src))
            .then_some((DeclarationKind::Assign, value))?,
        Assignment::AugAssign { target, value } => {
            is_export_target(&target, src).then_some((DeclarationKind::AugAssign, value))?
        }
        Assignment::AnnAssign { target, value, .. } => {
            let value = value?;
            is_export_target(&target, src).then_some((DeclarationKind::AnnAssign, value))?
        }
    };
    Some(Declaration {
        kind,
        statement: statement.clone(),
        value,
    })
}

/// Top-level declarations of `__all__` in source order.
#[must_use]
pub fn declarations(root: &Root, src: &str) -> Vec<Declaration> {
    root.statements()
        .iter()
        .filter_map(|statement| declaration(statement, src))
        .collect()
}

fn classify(value: &[TokenTree]) -> Shape<'_> {
    if contains_leaf(value, SyntaxKind::T_COMMA) {
        return Shape::Container {
            container: Container {
                kind: ContainerKind::Tuple,
                open: None,
            },
            items: value,
        };
    }
    let [TokenTree::Group(group)] = value else {
        return Shape::Other;
    };
    let children = group.children.as_slice();
    let bracketed = |kind| Shape::Container {
        container: Container {
            kind,
            open: Some(group.open_span.clone()),
        },
        items: children,
    };
    let is_comprehension = contains_leaf(children, SyntaxKind::K_FOR);
    match group.open {
        SyntaxKind::T_LBRACKET if !is_comprehension => bracketed(ContainerKind::List),
        SyntaxKind::T_LPAREN
            if children.is_empty() || contains_leaf(children, SyntaxKind::T_COMMA) =>
        {
            bracketed(ContainerKind::Tuple)
        }
        SyntaxKind::T_LPAREN if !is_comprehension => classify(children),
        SyntaxKind::T_LBRACE
            if !children.is_empty()
                && !is_comprehension
                && !contains_leaf(children, SyntaxKind::T_COLON)
                && !contains_leaf(children, SyntaxKind::T_DOUBLE_STAR) =>
        {
            bracketed(ContainerKind::Set)
        }
        _ => Shape::Other,
    }
}

fn check_element(piece: &[TokenTree], src: &str) -> ElementCheck {
    let Some(span) = trees_span(piece) else {
        return ElementCheck::Malformed;
    };
    if let [
        TokenTree::Group(Group {
            open: SyntaxKind::T_LPAREN,
            children,
            ..
        }),
    ] = piece
        && !children.is_empty()
        && !contains_leaf(children, SyntaxKind::T_COMMA)
    {
        return match check_element(children, src) {
            ElementCheck::Valid(inner) => ElementCheck::Valid(Element {
                span,
                value: inner.value,
            }),
            other => other,
        };
    }

    let text = tree_text(src, &span).to_owned();
    let skip = |reason| {
        ElementCheck::Skip(Diagnostic {
            span: span.clone(),
            reason,
        })
    };

    if !piece.iter().all(|tree| tree.is_leaf(SyntaxKind::T_STRING)) {
        return match piece {
            [
                TokenTree::Leaf(
                    SyntaxKind::T_NUMBER
                    | SyntaxKind::K_TRUE
                    | SyntaxKind::K_FALSE
                    | SyntaxKind::K_NONE
                    | SyntaxKind::T_ELLIPSIS,
                    _,
                ),
            ] => skip(SkipReason::NonString(text)),
            _ => skip(SkipReason::NonConstant(text)),
        };
    }

    let mut value = String::new();
    for tree in piece {
        match literal::decode(tree_text(src, &tree.span())) {
            Ok(lit) if lit.kind == LiteralKind::Format => {
                return skip(SkipReason::NonConstant(text));
            }
            Ok(lit) if lit.kind == LiteralKind::Bytes => return skip(SkipReason::NonString(text)),
            Ok(lit) => value.push_str(&lit.value),
            Err(LiteralError::NamedEscape) => return skip(SkipReason::Undecodable(text)),
            Err(err) => {
                debug!("element {text} is not a valid literal: {err}");
                return ElementCheck::Malformed;
            }
        }
    }
    ElementCheck::Valid(Element { span, value })
}

fn comment_between(statement: &Statement, span: &Span) -> Option<Span> {
    statement
        .syntax()
        .descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .filter(|token| token.kind() == SyntaxKind::T_COMMENT)
        .map(|token| {
            let range = token.text_range();
            usize::from(range.start())..usize::from(range.end())
        })
        .find(|comment| span.start <= comment.start && comment.end <= span.end)
}

/// Outcome of analysing one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// A sortable, non-empty list.
    Sortable(ElementList),
    /// Found but skipped.
    Skipped(Diagnostic),
    /// Not a container literal, empty, or malformed. Nothing to report.
    Ignored,
}

/// Validate the container assigned by `decl`.
#[must_use]
pub fn analyse(decl: &Declaration, src: &str) -> Analysis {
    let Shape::Container { container, items } = classify(&decl.value) else {
        return Analysis::Ignored;
    };

    let mut pieces = split_at_leaf(items, SyntaxKind::T_COMMA);
    if pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }

    let mut elements = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match check_element(piece, src) {
            ElementCheck::Valid(element) => elements.push(element),
            ElementCheck::Skip(diagnostic) => return Analysis::Skipped(diagnostic),
            ElementCheck::Malformed => {
                debug!("malformed export list at {:?}", decl.statement.span());
                return Analysis::Ignored;
            }
        }
    }
    if elements.is_empty() {
        return Analysis::Ignored;
    }

    let list = ElementList {
        declaration: decl.kind,
        container,
        elements,
    };
    if let Some(comment) = comment_between(&decl.statement, &list.span()) {
        return Analysis::Skipped(Diagnostic {
            span: comment,
            reason: SkipReason::CommentInside,
        });
    }
    Analysis::Sortable(list)
}

fn holds_container(decl: &Declaration) -> bool {
    decl.kind != DeclarationKind::AugAssign
        && matches!(classify(&decl.value), Shape::Container { .. })
}

/// Locate the export lists of a module according to `policy`.
///
/// # Examples
///
/// ```rust
/// use sort_all::{parse, config::DeclarationPolicy, locator::locate};
///
/// let src = "__all__ = ['b', 'a']\n";
/// let located = locate(&parse(src).root(), src, DeclarationPolicy::Each);
/// assert_eq!(located.lists.len(), 1);
/// assert!(located.diagnostics.is_empty());
/// ```
#[must_use]
pub fn locate(root: &Root, src: &str, policy: DeclarationPolicy) -> Located {
    let mut decls = declarations(root, src);
    match policy {
        DeclarationPolicy::Each => {}
        DeclarationPolicy::Last => {
            let keep = decls.len().saturating_sub(1);
            decls.drain(..keep);
        }
        DeclarationPolicy::Skip => {
            if let Some(second) = decls.iter().filter(|d| holds_container(d)).nth(1) {
                debug!("several {EXPORT_NAME} container declarations, skipping");
                return Located {
                    lists: Vec::new(),
                    diagnostics: vec![Diagnostic {
                        span: second.statement.span(),
                        reason: SkipReason::Ambiguous,
                    }],
                };
            }
        }
    }

    decls
        .iter()
        .fold(Located::default(), |mut located, decl| {
            match analyse(decl, src) {
                Analysis::Sortable(list) => located.lists.push(list),
                Analysis::Skipped(diagnostic) => {
                    debug!("skipping declaration: {}", diagnostic.reason);
                    located.diagnostics.push(diagnostic);
                }
                Analysis::Ignored => {}
            }
            located
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use rstest::rstest;

    fn run(src: &str, policy: DeclarationPolicy) -> Located {
        locate(&parse(src).root(), src, policy)
    }

    fn values(list: &ElementList) -> Vec<&str> {
        list.elements.iter().map(|e| e.value.as_str()).collect()
    }

    #[rstest]
    #[case("__all__ = ['b', 'a']", ContainerKind::List, false)]
    #[case("__all__ = ('b', 'a')", ContainerKind::Tuple, false)]
    #[case("__all__ = {'b', 'a'}", ContainerKind::Set, false)]
    #[case("__all__ = 'b', 'a'", ContainerKind::Tuple, true)]
    #[case("__all__ = (['b', 'a'])", ContainerKind::List, false)]
    #[case("(__all__) = ['b', 'a']", ContainerKind::List, false)]
    #[case("x = __all__ = ['b', 'a']", ContainerKind::List, false)]
    fn finds_containers(#[case] src: &str, #[case] kind: ContainerKind, #[case] bare: bool) {
        let located = run(src, DeclarationPolicy::Each);
        let [list] = located.lists.as_slice() else {
            panic!("expected one list, got {located:?}");
        };
        assert_eq!(list.container.kind, kind);
        assert_eq!(list.container.is_bare(), bare);
        assert_eq!(values(list), vec!["b", "a"]);
    }

    #[rstest]
    #[case("__all__ = ['a'] + ['b']")]
    #[case("__all__ = 123")]
    #[case("__all__ = ('name1')")]
    #[case("__all__ = []")]
    #[case("__all__ = ()")]
    #[case("__all__ = [n for n in names]")]
    #[case("__all__ = (n for n in names)")]
    #[case("__all__ = {'a': 1}")]
    #[case("__all__ = {**other}")]
    #[case("__all__ = list(names)")]
    #[case("__all__: list[str]")]
    #[case("all = ['b', 'a']")]
    #[case("__all__.x = ['b', 'a']")]
    #[case("__all__[0] = ['b', 'a']")]
    #[case("def f():\n    __all__ = ['b', 'a']\n")]
    #[case("if True:\n    __all__ = ['b', 'a']\n")]
    #[case("__all__ = ['a',, 'b']")]
    fn ignores_without_diagnostic(#[case] src: &str) {
        assert_eq!(run(src, DeclarationPolicy::Each), Located::default());
    }

    #[rstest]
    #[case("__all__ = (name2, name1)", SkipReason::NonConstant("name2".into()))]
    #[case("__all__ = ['a', f'{b}']", SkipReason::NonConstant("f'{b}'".into()))]
    #[case("__all__ = ['a', *rest]", SkipReason::NonConstant("*rest".into()))]
    #[case("__all__ = ['a', -1]", SkipReason::NonConstant("-1".into()))]
    #[case("__all__ = ['a', 1]", SkipReason::NonString("1".into()))]
    #[case("__all__ = ['a', None]", SkipReason::NonString("None".into()))]
    #[case("__all__ = ['a', b'x']", SkipReason::NonString("b'x'".into()))]
    #[case("__all__ = ['a', ...]", SkipReason::NonString("...".into()))]
    #[case("__all__ = ['\\N{BULLET}']", SkipReason::Undecodable("'\\N{BULLET}'".into()))]
    #[case("__all__ = [\n    'b',  # two\n    'a',\n]", SkipReason::CommentInside)]
    fn reports_skipped(#[case] src: &str, #[case] reason: SkipReason) {
        let located = run(src, DeclarationPolicy::Each);
        assert!(located.lists.is_empty());
        let reasons: Vec<SkipReason> = located
            .diagnostics
            .into_iter()
            .map(|d| d.reason)
            .collect();
        assert_eq!(reasons, vec![reason]);
    }

    #[test]
    fn parenthesised_element_is_a_constant() {
        let src = "__all__ = ['b', ('a')]";
        let located = run(src, DeclarationPolicy::Each);
        let [list] = located.lists.as_slice() else {
            panic!("expected one list");
        };
        assert_eq!(values(list), vec!["b", "a"]);
        assert_eq!(list.span(), 11..21);
    }

    #[test]
    fn comment_after_last_element_is_allowed() {
        let src = "__all__ = [\n    'b',\n    'a',  # last\n]\n";
        assert_eq!(run(src, DeclarationPolicy::Each).lists.len(), 1);
    }

    #[test]
    fn implicit_concatenation_forms_one_element() {
        let src = "__all__ = ['b' 'c', 'a']";
        let located = run(src, DeclarationPolicy::Each);
        let [list] = located.lists.as_slice() else {
            panic!("expected one list");
        };
        assert_eq!(values(list), vec!["bc", "a"]);
        assert_eq!(list.elements.first().map(|e| e.span.clone()), Some(11..18));
    }

    #[test]
    fn element_list_span_excludes_brackets() {
        let src = "__all__ = ['b', 'a',]";
        let located = run(src, DeclarationPolicy::Each);
        assert_eq!(located.lists.first().map(ElementList::span), Some(11..19));
    }

    const TWO_DECLS: &str = "__all__ = ('b', 'a')\n__all__ = ['d', 'c']\n";
    const WITH_AUG: &str = "__all__ = ('b', 'a')\n__all__ += ('d', 'c')\n";

    #[rstest]
    #[case(TWO_DECLS, DeclarationPolicy::Each, vec![vec!["b", "a"], vec!["d", "c"]])]
    #[case(TWO_DECLS, DeclarationPolicy::Last, vec![vec!["d", "c"]])]
    #[case(TWO_DECLS, DeclarationPolicy::Skip, vec![])]
    #[case(WITH_AUG, DeclarationPolicy::Each, vec![vec!["b", "a"], vec!["d", "c"]])]
    #[case(WITH_AUG, DeclarationPolicy::Last, vec![vec!["d", "c"]])]
    #[case(WITH_AUG, DeclarationPolicy::Skip, vec![vec!["b", "a"], vec!["d", "c"]])]
    fn policies(
        #[case] src: &str,
        #[case] policy: DeclarationPolicy,
        #[case] expected: Vec<Vec<&str>>,
    ) {
        let located = run(src, policy);
        let got: Vec<Vec<&str>> = located.lists.iter().map(values).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn skip_policy_reports_ambiguity_at_second_declaration() {
        let located = run(TWO_DECLS, DeclarationPolicy::Skip);
        assert_eq!(
            located.diagnostics,
            vec![Diagnostic {
                span: 21..41,
                reason: SkipReason::Ambiguous,
            }]
        );
    }

    #[test]
    fn declaration_kinds_are_recorded() {
        let src = "__all__: tuple[str, ...] = ('b',)\n__all__ += ['a']\n";
        let kinds: Vec<DeclarationKind> = run(src, DeclarationPolicy::Each)
            .lists
            .iter()
            .map(|l| l.declaration)
            .collect();
        assert_eq!(
            kinds,
            vec![DeclarationKind::AnnAssign, DeclarationKind::AugAssign]
        );
    }
}
