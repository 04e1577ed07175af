//!
//! Light-weight AST wrappers built around `rowan` syntax nodes.
//!
//! These wrappers expose typed navigation over the CST produced by the parser.
//! They stay intentionally small: a module root and its statements, plus the
//! assignment shape of a statement.

use crate::PythonLanguage;

/// Common interface for AST wrappers.
pub trait AstNode {
    /// Access the underlying syntax node.
    fn syntax(&self) -> &rowan::SyntaxNode<PythonLanguage>;

    /// Byte range covered by the node.
    fn span(&self) -> crate::Span {
        let range = self.syntax().text_range();
        usize::from(range.start())..usize::from(range.end())
    }
}

macro_rules! impl_ast_node {
    ($ty:ty) => {
        impl AstNode for $ty {
            fn syntax(&self) -> &rowan::SyntaxNode<PythonLanguage> {
                &self.syntax
            }
        }
    };
}

mod root;
mod statement;

pub use root::Root;
pub use statement::{Assignment, Statement};

#[cfg(test)]
mod tests {

    use crate::parse;

    #[test]
    fn root_collects_statements() {
        let src = "import os\n__all__ = ['a']\n";
        let parsed = parse(src);
        assert_eq!(parsed.root().statements().len(), 2);
    }
}
