//! Lexical analysis for Python source.
//!
//! This module exposes `tokenize_with_trivia` and `tokenize_without_trivia`
//! functions which convert raw source text into a sequence of
//! `(SyntaxKind, Span)` pairs. It uses the `logos` crate to recognise tokens
//! so that the CST can mirror the input exactly. String literals are matched
//! up to their opening quote and finished by a callback, which keeps the
//! triple-quoted forms out of the regex engine.

use logos::{Lexer, Logos};
use phf::phf_map;

use crate::SyntaxKind;

/// Byte range for a token within the source.
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(subpattern id_continue = r"[A-Za-z0-9_\u{80}-\u{FEFE}\u{FF00}-\u{10FFFF}]")]
enum Token {
    #[regex(r"[ \t\x0C]+")]
    Whitespace,
    #[regex(r"\r\n|\r|\n")]
    Newline,
    #[regex(r"\\(\r\n|\r|\n)")]
    LineContinuation,
    #[regex(r"#[^\r\n]*")]
    Comment,
    #[token("\u{feff}")]
    Bom,
    #[regex(r"[A-Za-z_\u{80}-\u{FEFE}\u{FF00}-\u{10FFFF}](?&id_continue)*")]
    Ident,
    #[regex(r"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?['\x22]", lex_string_body)]
    String,
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+")]
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[jJ]?")]
    Number,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token(":")]
    Colon,
    #[token(":=")]
    Walrus,
    #[token("=")]
    Eq,
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("//=")]
    #[token("%=")]
    #[token("@=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token(">>=")]
    #[token("<<=")]
    #[token("**=")]
    AugAssign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Neq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("@")]
    At,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("->")]
    Arrow,
    #[token("!")]
    Bang,
}

/// Finish a string literal whose prefix and opening quote were matched.
///
/// Handles both single-line and triple-quoted forms. Backslashes always
/// escape the following character at the lexical level, raw strings
/// included, so `r'\''` is one token. Returns `false` for unterminated
/// literals, which `logos` reports as an error token.
fn lex_string_body(lex: &mut Lexer<'_, Token>) -> bool {
    let Some(quote) = lex.slice().bytes().last() else {
        return false;
    };
    let rest = lex.remainder().as_bytes();
    let triple = rest.starts_with(&[quote, quote]);
    let mut idx = if triple { 2 } else { 0 };

    while let Some(&byte) = rest.get(idx) {
        match byte {
            b'\\' if rest.get(idx + 1..idx + 3) == Some(&b"\r\n"[..]) => idx += 3,
            b'\\' => idx += 2,
            b'\n' | b'\r' if !triple => return false,
            b if b == quote && !triple => {
                lex.bump(idx + 1);
                return true;
            }
            b if b == quote && rest.get(idx..idx + 3) == Some(&[quote, quote, quote][..]) => {
                lex.bump(idx + 3);
                return true;
            }
            _ => idx += 1,
        }
    }
    false
}

/// Maps identifier strings to their keyword `SyntaxKind`.
///
/// Soft keywords (`match`, `case`, `type`, `_`) stay identifiers since they
/// are valid names outside their statement forms.
static KEYWORDS: phf::Map<&'static str, SyntaxKind> = phf_map! {
    "False" => SyntaxKind::K_FALSE,
    "None" => SyntaxKind::K_NONE,
    "True" => SyntaxKind::K_TRUE,
    "and" => SyntaxKind::K_AND,
    "as" => SyntaxKind::K_AS,
    "assert" => SyntaxKind::K_ASSERT,
    "async" => SyntaxKind::K_ASYNC,
    "await" => SyntaxKind::K_AWAIT,
    "break" => SyntaxKind::K_BREAK,
    "class" => SyntaxKind::K_CLASS,
    "continue" => SyntaxKind::K_CONTINUE,
    "def" => SyntaxKind::K_DEF,
    "del" => SyntaxKind::K_DEL,
    "elif" => SyntaxKind::K_ELIF,
    "else" => SyntaxKind::K_ELSE,
    "except" => SyntaxKind::K_EXCEPT,
    "finally" => SyntaxKind::K_FINALLY,
    "for" => SyntaxKind::K_FOR,
    "from" => SyntaxKind::K_FROM,
    "global" => SyntaxKind::K_GLOBAL,
    "if" => SyntaxKind::K_IF,
    "import" => SyntaxKind::K_IMPORT,
    "in" => SyntaxKind::K_IN,
    "is" => SyntaxKind::K_IS,
    "lambda" => SyntaxKind::K_LAMBDA,
    "nonlocal" => SyntaxKind::K_NONLOCAL,
    "not" => SyntaxKind::K_NOT,
    "or" => SyntaxKind::K_OR,
    "pass" => SyntaxKind::K_PASS,
    "raise" => SyntaxKind::K_RAISE,
    "return" => SyntaxKind::K_RETURN,
    "try" => SyntaxKind::K_TRY,
    "while" => SyntaxKind::K_WHILE,
    "with" => SyntaxKind::K_WITH,
    "yield" => SyntaxKind::K_YIELD,
};

fn keyword_kind(ident: &str) -> Option<SyntaxKind> {
    KEYWORDS.get(ident).copied()
}

#[must_use]
fn tokenize_impl(src: &str) -> Vec<(SyntaxKind, Span)> {
    let mut lexer = Token::lexer(src);
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "rough capacity estimate"
    )]
    let estimated_tokens = src.len() / 4; // roughly four chars per token
    let mut out = Vec::with_capacity(estimated_tokens);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let Ok(token) = result else {
            out.push((SyntaxKind::N_ERROR, span));
            continue;
        };
        let kind = match token {
            Token::Whitespace => SyntaxKind::T_WHITESPACE,
            Token::Newline => SyntaxKind::T_NEWLINE,
            Token::LineContinuation => SyntaxKind::T_LINE_CONTINUATION,
            Token::Comment => SyntaxKind::T_COMMENT,
            // A byte order mark is only allowed as the first character.
            Token::Bom if span.start == 0 => SyntaxKind::T_BOM,
            Token::Bom => SyntaxKind::N_ERROR,
            Token::Ident => src
                .get(span.clone())
                .and_then(keyword_kind)
                .unwrap_or(SyntaxKind::T_IDENT),
            Token::String => SyntaxKind::T_STRING,
            Token::Number => SyntaxKind::T_NUMBER,
            Token::LParen => SyntaxKind::T_LPAREN,
            Token::RParen => SyntaxKind::T_RPAREN,
            Token::LBrace => SyntaxKind::T_LBRACE,
            Token::RBrace => SyntaxKind::T_RBRACE,
            Token::LBracket => SyntaxKind::T_LBRACKET,
            Token::RBracket => SyntaxKind::T_RBRACKET,
            Token::Semi => SyntaxKind::T_SEMI,
            Token::Comma => SyntaxKind::T_COMMA,
            Token::Dot => SyntaxKind::T_DOT,
            Token::Ellipsis => SyntaxKind::T_ELLIPSIS,
            Token::Colon => SyntaxKind::T_COLON,
            Token::Walrus => SyntaxKind::T_WALRUS,
            Token::Eq => SyntaxKind::T_EQ,
            Token::AugAssign => SyntaxKind::T_AUG_ASSIGN,
            Token::EqEq => SyntaxKind::T_EQEQ,
            Token::Neq => SyntaxKind::T_NEQ,
            Token::Lt => SyntaxKind::T_LT,
            Token::Gt => SyntaxKind::T_GT,
            Token::Lte => SyntaxKind::T_LTE,
            Token::Gte => SyntaxKind::T_GTE,
            Token::Plus => SyntaxKind::T_PLUS,
            Token::Minus => SyntaxKind::T_MINUS,
            Token::Star => SyntaxKind::T_STAR,
            Token::DoubleStar => SyntaxKind::T_DOUBLE_STAR,
            Token::Slash => SyntaxKind::T_SLASH,
            Token::DoubleSlash => SyntaxKind::T_DOUBLE_SLASH,
            Token::Percent => SyntaxKind::T_PERCENT,
            Token::At => SyntaxKind::T_AT,
            Token::Amp => SyntaxKind::T_AMP,
            Token::Pipe => SyntaxKind::T_PIPE,
            Token::Caret => SyntaxKind::T_CARET,
            Token::Tilde => SyntaxKind::T_TILDE,
            Token::Shl => SyntaxKind::T_SHL,
            Token::Shr => SyntaxKind::T_SHR,
            Token::Arrow => SyntaxKind::T_ARROW,
            Token::Bang => SyntaxKind::T_BANG,
        };
        out.push((kind, span));
    }
    out
}

/// Tokenise the source, excluding whitespace, newlines and comments.
///
/// # Examples
///
/// ```rust
/// use sort_all::{tokenize_without_trivia, SyntaxKind};
///
/// let tokens = tokenize_without_trivia("__all__ = ['a']  # public\n");
/// assert!(!tokens.iter().any(|(k, _)| k.is_trivia()));
/// ```
#[must_use]
pub fn tokenize_without_trivia(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src)
        .into_iter()
        .filter(|(k, _)| !k.is_trivia())
        .collect()
}

/// Tokenise the provided Python source.
///
/// # Examples
///
/// ```rust
/// use sort_all::{tokenize_with_trivia, SyntaxKind};
///
/// let tokens = tokenize_with_trivia("__all__ = ('a',)");
/// assert_eq!(tokens.len(), 8);
/// assert_eq!(tokens[0].0, SyntaxKind::T_IDENT);
/// ```
///
/// This variant retains whitespace, newline and comment tokens, so the
/// concatenated token texts reproduce the input.
#[must_use]
pub fn tokenize_with_trivia(src: &str) -> Vec<(SyntaxKind, Span)> {
    tokenize_impl(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(src: &str) -> Vec<SyntaxKind> {
        tokenize_with_trivia(src).into_iter().map(|(k, _)| k).collect()
    }

    #[rstest]
    #[case("'abc'")]
    #[case("\"abc\"")]
    #[case("r'\\d'")]
    #[case("b'bytes'")]
    #[case("Rb\"x\"")]
    #[case("f'{x}'")]
    #[case("'it\\'s'")]
    #[case("''")]
    #[case("'''multi\nline'''")]
    #[case("\"\"\"a \"quoted\" word\"\"\"")]
    #[case("'''ends with quote\\''''")]
    fn strings_are_single_tokens(#[case] src: &str) {
        let tokens = tokenize_with_trivia(src);
        assert_eq!(tokens, vec![(SyntaxKind::T_STRING, 0..src.len())]);
    }

    #[test]
    fn empty_string_followed_by_name() {
        assert_eq!(
            kinds("''x"),
            vec![SyntaxKind::T_STRING, SyntaxKind::T_IDENT]
        );
    }

    #[rstest]
    #[case("'open")]
    #[case("'broken\nline'")]
    #[case("'''never closed")]
    fn unterminated_strings_produce_errors(#[case] src: &str) {
        assert!(kinds(src).contains(&SyntaxKind::N_ERROR));
    }

    #[rstest]
    #[case("rb", SyntaxKind::T_IDENT)]
    #[case("print", SyntaxKind::T_IDENT)]
    #[case("match", SyntaxKind::T_IDENT)]
    #[case("None", SyntaxKind::K_NONE)]
    #[case("lambda", SyntaxKind::K_LAMBDA)]
    #[case("42", SyntaxKind::T_NUMBER)]
    #[case("0x_ff", SyntaxKind::T_NUMBER)]
    #[case("1.5e-3j", SyntaxKind::T_NUMBER)]
    #[case(".5", SyntaxKind::T_NUMBER)]
    #[case("...", SyntaxKind::T_ELLIPSIS)]
    #[case("+=", SyntaxKind::T_AUG_ASSIGN)]
    #[case("//=", SyntaxKind::T_AUG_ASSIGN)]
    #[case(":=", SyntaxKind::T_WALRUS)]
    #[case("**", SyntaxKind::T_DOUBLE_STAR)]
    fn single_tokens(#[case] src: &str, #[case] expected: SyntaxKind) {
        assert_eq!(kinds(src), vec![expected]);
    }

    #[test]
    fn trivia_kinds() {
        assert_eq!(
            kinds("x  # note\\\n\r\n"),
            vec![
                SyntaxKind::T_IDENT,
                SyntaxKind::T_WHITESPACE,
                SyntaxKind::T_COMMENT,
                SyntaxKind::T_NEWLINE,
                SyntaxKind::T_NEWLINE,
            ]
        );
        assert_eq!(
            kinds("x \\\ny"),
            vec![
                SyntaxKind::T_IDENT,
                SyntaxKind::T_WHITESPACE,
                SyntaxKind::T_LINE_CONTINUATION,
                SyntaxKind::T_IDENT,
            ]
        );
    }

    #[test]
    fn leading_byte_order_mark_is_trivia() {
        assert_eq!(
            kinds("\u{feff}__all__"),
            vec![SyntaxKind::T_BOM, SyntaxKind::T_IDENT]
        );
        assert_eq!(
            tokenize_without_trivia("\u{feff}x").first().map(|(k, _)| *k),
            Some(SyntaxKind::T_IDENT)
        );
    }

    #[test]
    fn byte_order_mark_after_start_is_an_error() {
        assert_eq!(
            kinds("x\u{feff}"),
            vec![SyntaxKind::T_IDENT, SyntaxKind::N_ERROR]
        );
    }

    #[test]
    fn spans_cover_source_exactly() {
        let src = "__all__: list[str] = [\n    'b',  # second\n    \"a\",\n]\n";
        let rebuilt: String = tokenize_with_trivia(src)
            .into_iter()
            .filter_map(|(_, span)| src.get(span))
            .collect();
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn without_trivia_drops_layout() {
        let tokens = tokenize_without_trivia("a = (\n 1,  # c\n)\n");
        let kinds: Vec<_> = tokens.into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::T_IDENT,
                SyntaxKind::T_EQ,
                SyntaxKind::T_LPAREN,
                SyntaxKind::T_NUMBER,
                SyntaxKind::T_COMMA,
                SyntaxKind::T_RPAREN,
            ]
        );
    }
}
