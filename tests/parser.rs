//! Integration tests for the statement-level parser.
//!
//! These tests check that the CST reproduces its input exactly and that only
//! top-level simple statements are exposed as statements.

use rstest::{fixture, rstest};
use sort_all::{
    PythonLanguage, SyntaxKind,
    ast::{AstNode, Assignment},
    parse,
    test_util::{assert_no_parse_errors, dedent},
};

/// Collect the text of a syntax subtree.
///
/// Traverses the tree with an explicit stack so deeply nested inputs do not
/// risk recursion overflow.
fn pretty_print(node: &rowan::SyntaxNode<PythonLanguage>) -> String {
    let mut out = String::new();
    let mut stack = vec![rowan::SyntaxElement::Node(node.clone())];

    while let Some(item) = stack.pop() {
        match item {
            rowan::SyntaxElement::Token(t) => out.push_str(t.text()),
            rowan::SyntaxElement::Node(n) => {
                let children: Vec<rowan::SyntaxElement<PythonLanguage>> =
                    n.children_with_tokens().collect();
                for child in children.into_iter().rev() {
                    stack.push(child);
                }
            }
        }
    }

    out
}

#[fixture]
fn module() -> String {
    dedent(
        r#"
        """Module docstring."""
        import os
        from mod import name1, name2  # re-exported

        __all__ = [
            "name2",
            "name1",
        ]

        @decorator
        def helper(x):
            return x; y = 2

        class A:
            __all__ = ["not", "top", "level"]

        a = 1; b = 2
        "#,
    )
}

#[rstest]
fn round_trip(module: String) {
    let parsed = parse(&module);
    assert_no_parse_errors(parsed.errors());
    assert_eq!(pretty_print(parsed.root().syntax()), module);
}

#[rstest]
fn only_top_level_simple_statements(module: String) {
    let parsed = parse(&module);
    let texts: Vec<String> = parsed
        .root()
        .statements()
        .iter()
        .map(|s| s.text())
        .collect();
    assert_eq!(
        texts,
        vec![
            "\"\"\"Module docstring.\"\"\"",
            "import os",
            "from mod import name1, name2",
            "__all__ = [\n    \"name2\",\n    \"name1\",\n]",
            "a = 1",
            "b = 2",
        ]
    );
}

#[rstest]
fn block_lines_are_set_aside(module: String) {
    let parsed = parse(&module);
    let kinds: Vec<SyntaxKind> = parsed
        .root()
        .syntax()
        .children()
        .map(|n| n.kind())
        .collect();
    assert!(kinds.contains(&SyntaxKind::N_BLOCK_STMT));
    assert!(
        parsed
            .root()
            .block_statements()
            .iter()
            .any(|s| s.text().contains("\"not\""))
    );
}

#[rstest]
#[case("__all__ = ['a']", true)]
#[case("__all__ += ['a']", true)]
#[case("__all__: list = ['a']", true)]
#[case("print(__all__)", false)]
#[case("import os", false)]
fn assignments(#[case] src: &str, #[case] is_assignment: bool) {
    let parsed = parse(src);
    let statement = parsed.root().statements().into_iter().next();
    let assignment: Option<Assignment> = statement.and_then(|s| s.assignment());
    assert_eq!(assignment.is_some(), is_assignment);
}

#[rstest]
#[case("x = (1, 2")]
#[case("x = [1, 2)")]
#[case("x = 1)")]
#[case("x = 'open")]
fn malformed_sources_report_errors(#[case] src: &str) {
    let parsed = parse(src);
    assert!(!parsed.errors().is_empty());
    assert_eq!(parsed.root().text(), src);
}

#[test]
fn statement_spans_exclude_trailing_trivia() {
    let src = "__all__ = ['a']   # trailing\n";
    let parsed = parse(src);
    let spans: Vec<_> = parsed.root().statements().iter().map(AstNode::span).collect();
    assert_eq!(spans, vec![0..15]);
}
