//! `rowan` integration and Python syntax kinds.
//!
//! This module defines the `SyntaxKind` enum covering the Python tokens the
//! tokenizer emits and the few non-terminal nodes the statement scanner
//! recognises. The enumeration is used by `rowan` to tag syntax tree
//! elements. The `PythonLanguage` newtype implements `rowan::Language` using
//! conversions provided by `num_derive`.

use num_derive::{FromPrimitive as FromPrimitiveDerive, ToPrimitive as ToPrimitiveDerive};
use num_traits::{FromPrimitive, ToPrimitive};
use rowan::Language as RowanLanguage;
use rowan::SyntaxKind as RowanSyntaxKind;

/// Every possible token or node in the Python syntax tree.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    FromPrimitiveDerive,
    ToPrimitiveDerive,
)]
#[repr(u16)]
#[expect(non_camel_case_types, reason = "token naming mirrors the CST layout")]
pub enum SyntaxKind {
    // Trivia
    T_COMMENT,
    T_WHITESPACE,
    T_NEWLINE,
    T_LINE_CONTINUATION,
    T_BOM,
    // Tokens
    T_IDENT,
    T_STRING,
    T_NUMBER,
    T_LPAREN,
    T_RPAREN,
    T_LBRACE,
    T_RBRACE,
    T_LBRACKET,
    T_RBRACKET,
    T_SEMI,
    T_COMMA,
    T_DOT,
    T_ELLIPSIS,
    T_COLON,
    T_WALRUS,
    T_EQ,
    T_AUG_ASSIGN,
    T_EQEQ,
    T_NEQ,
    T_LT,
    T_GT,
    T_LTE,
    T_GTE,
    T_PLUS,
    T_MINUS,
    T_STAR,
    T_DOUBLE_STAR,
    T_SLASH,
    T_DOUBLE_SLASH,
    T_PERCENT,
    T_AT,
    T_AMP,
    T_PIPE,
    T_CARET,
    T_TILDE,
    T_SHL,
    T_SHR,
    T_ARROW,
    T_BANG,
    // Keywords
    K_FALSE,
    K_NONE,
    K_TRUE,
    K_AND,
    K_AS,
    K_ASSERT,
    K_ASYNC,
    K_AWAIT,
    K_BREAK,
    K_CLASS,
    K_CONTINUE,
    K_DEF,
    K_DEL,
    K_ELIF,
    K_ELSE,
    K_EXCEPT,
    K_FINALLY,
    K_FOR,
    K_FROM,
    K_GLOBAL,
    K_IF,
    K_IMPORT,
    K_IN,
    K_IS,
    K_LAMBDA,
    K_NONLOCAL,
    K_NOT,
    K_OR,
    K_PASS,
    K_RAISE,
    K_RETURN,
    K_TRY,
    K_WHILE,
    K_WITH,
    K_YIELD,
    // Nodes
    N_ERROR,
    N_MODULE,
    N_SIMPLE_STMT,
    N_BLOCK_STMT,
}

impl SyntaxKind {
    /// Whether this kind is layout or a comment rather than code.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::T_WHITESPACE
                | Self::T_NEWLINE
                | Self::T_LINE_CONTINUATION
                | Self::T_BOM
                | Self::T_COMMENT
        )
    }

    /// `=` or an augmented assignment operator.
    #[must_use]
    pub fn is_assignment(self) -> bool {
        matches!(self, Self::T_EQ | Self::T_AUG_ASSIGN)
    }

    /// Operators and keywords that cannot end a simple statement.
    ///
    /// `*` is listed although `from m import *` ends with it; callers check
    /// that form separately. `:` is left out so soft-keyword headers such as
    /// `match x:` are not rejected.
    #[must_use]
    pub fn needs_operand(self) -> bool {
        matches!(
            self,
            Self::T_DOT
                | Self::T_WALRUS
                | Self::T_EQ
                | Self::T_AUG_ASSIGN
                | Self::T_EQEQ
                | Self::T_NEQ
                | Self::T_LT
                | Self::T_GT
                | Self::T_LTE
                | Self::T_GTE
                | Self::T_PLUS
                | Self::T_MINUS
                | Self::T_STAR
                | Self::T_DOUBLE_STAR
                | Self::T_SLASH
                | Self::T_DOUBLE_SLASH
                | Self::T_PERCENT
                | Self::T_AT
                | Self::T_AMP
                | Self::T_PIPE
                | Self::T_CARET
                | Self::T_TILDE
                | Self::T_SHL
                | Self::T_SHR
                | Self::T_ARROW
                | Self::T_BANG
                | Self::K_AND
                | Self::K_OR
                | Self::K_NOT
                | Self::K_IN
                | Self::K_IS
                | Self::K_AS
                | Self::K_IF
                | Self::K_ELSE
                | Self::K_LAMBDA
                | Self::K_AWAIT
                | Self::K_DEL
                | Self::K_ASSERT
                | Self::K_IMPORT
                | Self::K_FROM
                | Self::K_GLOBAL
                | Self::K_NONLOCAL
        )
    }

    /// Whether this kind opens a bracketed group.
    #[must_use]
    pub fn is_opening_delimiter(self) -> bool {
        matches!(self, Self::T_LPAREN | Self::T_LBRACKET | Self::T_LBRACE)
    }

    /// Whether this kind closes a bracketed group.
    #[must_use]
    pub fn is_closing_delimiter(self) -> bool {
        matches!(self, Self::T_RPAREN | Self::T_RBRACKET | Self::T_RBRACE)
    }

    /// The closing delimiter paired with an opening one.
    #[must_use]
    pub fn matching_closer(self) -> Option<Self> {
        match self {
            Self::T_LPAREN => Some(Self::T_RPAREN),
            Self::T_LBRACKET => Some(Self::T_RBRACKET),
            Self::T_LBRACE => Some(Self::T_RBRACE),
            _ => None,
        }
    }

    /// Keywords that introduce a compound statement.
    ///
    /// `@` is included because decorators always precede one.
    #[must_use]
    pub fn starts_compound_statement(self) -> bool {
        matches!(
            self,
            Self::K_IF
                | Self::K_ELIF
                | Self::K_ELSE
                | Self::K_FOR
                | Self::K_WHILE
                | Self::K_TRY
                | Self::K_EXCEPT
                | Self::K_FINALLY
                | Self::K_WITH
                | Self::K_DEF
                | Self::K_CLASS
                | Self::K_ASYNC
                | Self::T_AT
        )
    }
}

/// Newtype wrapper allowing `rowan` to store `SyntaxKind` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonLanguage;

impl RowanLanguage for PythonLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: RowanSyntaxKind) -> Self::Kind {
        SyntaxKind::from_u16(raw.0).unwrap_or(SyntaxKind::N_ERROR)
    }

    fn kind_to_raw(kind: Self::Kind) -> RowanSyntaxKind {
        RowanSyntaxKind(
            kind.to_u16()
                .unwrap_or_else(|| unreachable!("all SyntaxKind variants map to u16")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyntaxKind::T_COMMENT)]
    #[case(SyntaxKind::T_STRING)]
    #[case(SyntaxKind::K_YIELD)]
    #[case(SyntaxKind::N_BLOCK_STMT)]
    fn raw_round_trip(#[case] kind: SyntaxKind) {
        let raw = PythonLanguage::kind_to_raw(kind);
        assert_eq!(PythonLanguage::kind_from_raw(raw), kind);
    }

    #[test]
    fn unknown_raw_maps_to_error() {
        let raw = RowanSyntaxKind(u16::MAX);
        assert_eq!(PythonLanguage::kind_from_raw(raw), SyntaxKind::N_ERROR);
    }

    #[rstest]
    #[case(SyntaxKind::T_LPAREN, Some(SyntaxKind::T_RPAREN))]
    #[case(SyntaxKind::T_LBRACKET, Some(SyntaxKind::T_RBRACKET))]
    #[case(SyntaxKind::T_LBRACE, Some(SyntaxKind::T_RBRACE))]
    #[case(SyntaxKind::T_COMMA, None)]
    fn closers(#[case] open: SyntaxKind, #[case] expected: Option<SyntaxKind>) {
        assert_eq!(open.matching_closer(), expected);
    }

    #[rstest]
    #[case(SyntaxKind::T_PLUS, true)]
    #[case(SyntaxKind::K_IMPORT, true)]
    #[case(SyntaxKind::T_EQ, true)]
    #[case(SyntaxKind::T_COLON, false)]
    #[case(SyntaxKind::T_COMMA, false)]
    #[case(SyntaxKind::K_RETURN, false)]
    #[case(SyntaxKind::T_RBRACKET, false)]
    fn operand_requirements(#[case] kind: SyntaxKind, #[case] expected: bool) {
        assert_eq!(kind.needs_operand(), expected);
    }
}
