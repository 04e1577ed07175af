//!
//! Wrapper for the root `MODULE` node.
//!
//! Provides typed accessors for the top-level simple statements and the
//! block lines the scanner set aside.
//!
//! # Examples
//!
//! ```rust
//! use sort_all::parse;
//!
//! let parsed = parse("__all__ = ['a']\ndef f():\n    pass\n");
//! let root = parsed.root();
//! assert_eq!(root.statements().len(), 1);
//! assert_eq!(root.block_statements().len(), 2);
//! ```

use rowan::GreenNode;

use super::Statement;
use crate::{PythonLanguage, SyntaxKind};

/// The root of a parsed Python module.
#[derive(Debug, Clone)]
pub struct Root {
    pub(crate) syntax: rowan::SyntaxNode<PythonLanguage>,
}

impl Root {
    /// Obtain the underlying syntax node.
    #[must_use]
    pub fn syntax(&self) -> &rowan::SyntaxNode<PythonLanguage> {
        &self.syntax
    }

    /// Create a new `Root` from a green node.
    #[must_use]
    pub fn from_green(green: GreenNode) -> Self {
        Self {
            syntax: rowan::SyntaxNode::<PythonLanguage>::new_root(green),
        }
    }

    /// The kind of this root node.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    /// Text content of this root.
    #[must_use]
    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }

    fn collect_children<T>(
        &self,
        kind: SyntaxKind,
        map: impl Fn(rowan::SyntaxNode<PythonLanguage>) -> T,
    ) -> Vec<T> {
        self.syntax
            .children()
            .filter(|n| n.kind() == kind)
            .map(map)
            .collect()
    }

    /// Collect top-level simple statements in source order.
    #[must_use]
    pub fn statements(&self) -> Vec<Statement> {
        self.collect_children(SyntaxKind::N_SIMPLE_STMT, |syntax| Statement { syntax })
    }

    /// Collect block lines: compound statement headers and indented bodies.
    #[must_use]
    pub fn block_statements(&self) -> Vec<Statement> {
        self.collect_children(SyntaxKind::N_BLOCK_STMT, |syntax| Statement { syntax })
    }
}
