//! Build a `rowan` green tree from tokens and spans.

use log::warn;
use rowan::{GreenNode, GreenNodeBuilder, Language};

use crate::{PythonLanguage, Span, SyntaxKind};

use super::spans::StatementSpans;

struct SpanCursor<'a> {
    iter: std::iter::Peekable<std::slice::Iter<'a, Span>>,
    kind: SyntaxKind,
}

impl<'a> SpanCursor<'a> {
    fn new(spans: &'a [Span], kind: SyntaxKind) -> Self {
        Self {
            iter: spans.iter().peekable(),
            kind,
        }
    }

    fn advance_to(&mut self, pos: usize) {
        while matches!(self.iter.peek(), Some(s) if pos >= s.end) {
            self.iter.next();
        }
    }

    fn start_if(&mut self, builder: &mut GreenNodeBuilder, pos: usize) {
        if matches!(self.iter.peek(), Some(s) if pos == s.start) {
            builder.start_node(PythonLanguage::kind_to_raw(self.kind));
        }
    }

    fn finish_if(&mut self, builder: &mut GreenNodeBuilder, pos: usize) {
        if matches!(self.iter.peek(), Some(s) if pos >= s.end) {
            builder.finish_node();
            self.iter.next();
        }
    }
}

fn build_span_cursors(spans: &StatementSpans) -> [SpanCursor<'_>; 2] {
    [
        SpanCursor::new(spans.simple(), SyntaxKind::N_SIMPLE_STMT),
        SpanCursor::new(spans.blocks(), SyntaxKind::N_BLOCK_STMT),
    ]
}

fn validate_token_span(span: &Span, src_len: usize) -> bool {
    if span.start <= span.end && span.end <= src_len {
        true
    } else {
        #[cfg(debug_assertions)]
        {
            panic!("token span {span:?} out of bounds for source of length {src_len}");
        }

        #[cfg(not(debug_assertions))]
        {
            warn!("token span {span:?} out of bounds for source of length {src_len}");
            false
        }
    }
}

/// Construct the CST from the token stream and recorded statement spans.
///
/// Every token, trivia included, becomes a leaf, so the text of the root
/// equals `src`.
pub(crate) fn build_green_tree(
    tokens: &[(SyntaxKind, Span)],
    src: &str,
    spans: &StatementSpans,
) -> GreenNode {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(PythonLanguage::kind_to_raw(SyntaxKind::N_MODULE));

    let mut cursors = build_span_cursors(spans);

    for &(kind, ref span) in tokens {
        if !validate_token_span(span, src.len()) {
            continue;
        }
        let start = span.start;
        for cursor in &mut cursors {
            cursor.advance_to(start);
            cursor.start_if(&mut builder, start);
        }

        push_token(&mut builder, kind, span.clone(), src);

        let end = span.end;
        for cursor in &mut cursors {
            cursor.finish_if(&mut builder, end);
        }
    }

    builder.finish_node();
    builder.finish()
}

fn push_token(builder: &mut GreenNodeBuilder, kind: SyntaxKind, span: Span, src: &str) {
    let text = src.get(span.clone()).map_or_else(
        || {
            warn!(
                "token span {:?} out of bounds for source of length {}",
                span,
                src.len()
            );
            ""
        },
        |t| t,
    );

    let raw = PythonLanguage::kind_to_raw(kind);
    if kind == SyntaxKind::N_ERROR {
        builder.start_node(raw);
        builder.token(raw, text);
        builder.finish_node();
    } else {
        builder.token(raw, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Root;
    use crate::test_util::tokenize;

    #[expect(clippy::expect_used, reason = "spans are valid by construction")]
    fn spans(simple: Vec<Span>, blocks: Vec<Span>) -> StatementSpans {
        StatementSpans::builder()
            .simple(simple)
            .blocks(blocks)
            .build()
            .expect("valid spans")
    }

    #[test]
    fn build_green_tree_round_trip() {
        let src = "__all__ = ['a']\nif x:\n    pass\n";
        let tokens = tokenize(src);
        let green = build_green_tree(&tokens, src, &spans(vec![0..15], vec![16..21, 26..30]));
        let root = Root::from_green(green);
        assert_eq!(root.text(), src);
        assert_eq!(root.statements().len(), 1);
        assert_eq!(root.block_statements().len(), 2);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "token span")]
    fn build_green_tree_panics_on_oob_token_span() {
        let src = "";
        let tokens = vec![(SyntaxKind::T_IDENT, 0..1)];

        let _ = build_green_tree(&tokens, src, &StatementSpans::default());
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn build_green_tree_skips_oob_token_span_in_release() {
        let src = "x = 1";
        let mut tokens = tokenize(src);
        tokens.push((SyntaxKind::T_IDENT, src.len() + 1..src.len() + 2));
        let green = build_green_tree(&tokens, src, &StatementSpans::default());
        let root = Root::from_green(green);
        assert_eq!(root.text(), src);
    }
}
