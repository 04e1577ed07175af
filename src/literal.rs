//! Python string literal decoding and rendering.
//!
//! Export-list elements are sorted by the value a literal denotes, not by its
//! source text, so `'b'` and `"b"` compare equal and `"\x61"` sorts as `a`.
//! [`decode`] turns one literal token into its value and [`quote`] renders a
//! value back as a double-quoted literal.

use std::iter::Peekable;
use std::str::Chars;

/// What kind of object a string literal evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// A plain `str` constant.
    Str,
    /// A `bytes` constant (`b'...'`).
    Bytes,
    /// An f-string, which is evaluated at runtime.
    Format,
}

/// A decoded string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// The literal's kind.
    pub kind: LiteralKind,
    /// The denoted value. For bytes and f-strings this is the raw body.
    pub value: String,
}

/// Reasons a literal cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    /// The token is not delimited by matching quotes.
    #[error("malformed string literal")]
    Malformed,
    /// `\N{...}` needs the Unicode name database.
    #[error("named unicode escapes are not supported")]
    NamedEscape,
    /// A `\x`, `\u` or `\U` escape is truncated or out of range.
    #[error("invalid escape sequence")]
    InvalidEscape,
}

struct Prefix {
    raw: bool,
    kind: LiteralKind,
}

fn read_prefix(prefix: &str) -> Prefix {
    let has = |c: char| prefix.chars().any(|p| p.eq_ignore_ascii_case(&c));
    let kind = if has('b') {
        LiteralKind::Bytes
    } else if has('f') {
        LiteralKind::Format
    } else {
        LiteralKind::Str
    };
    Prefix {
        raw: has('r'),
        kind,
    }
}

/// Decode a single string literal token such as `r'\d'` or `"""doc"""`.
///
/// # Errors
///
/// Returns [`LiteralError`] when the token is malformed or uses an escape
/// that cannot be decoded.
///
/// # Examples
///
/// ```rust
/// use sort_all::literal::{decode, LiteralKind};
///
/// let lit = decode(r#"'it\'s'"#).unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(lit.kind, LiteralKind::Str);
/// assert_eq!(lit.value, "it's");
/// ```
pub fn decode(token: &str) -> Result<StringLiteral, LiteralError> {
    let quote_at = token
        .find(['\'', '"'])
        .ok_or(LiteralError::Malformed)?;
    let (prefix, quoted) = token.split_at(quote_at);
    let single = quoted
        .chars()
        .next()
        .ok_or(LiteralError::Malformed)?
        .to_string();
    let triple = single.repeat(3);
    let delimiter = if quoted.len() >= 6 && quoted.starts_with(&triple) {
        triple
    } else {
        single
    };
    let body = quoted
        .strip_prefix(delimiter.as_str())
        .and_then(|rest| rest.strip_suffix(delimiter.as_str()))
        .ok_or(LiteralError::Malformed)?;

    let Prefix { raw, kind } = read_prefix(prefix);
    let value = if raw || kind != LiteralKind::Str {
        body.to_owned()
    } else {
        unescape(body)?
    };
    Ok(StringLiteral { kind, value })
}

fn take_hex(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Result<char, LiteralError> {
    let mut value = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(LiteralError::InvalidEscape)?;
        value = value * 16 + digit;
    }
    char::from_u32(value).ok_or(LiteralError::InvalidEscape)
}

fn take_octal(chars: &mut Peekable<Chars<'_>>, first: u32) -> u32 {
    let mut value = first;
    for _ in 0..2 {
        match chars.peek().and_then(|c| c.to_digit(8)) {
            Some(digit) => {
                value = value * 8 + digit;
                chars.next();
            }
            None => break,
        }
    }
    value
}

fn unescape(body: &str) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            out.push('\\');
            break;
        };
        let decoded = match esc {
            '\n' => None,
            '\r' => {
                chars.next_if_eq(&'\n');
                None
            }
            '\\' | '\'' | '"' => Some(esc),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            'f' => Some('\x0c'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\x0b'),
            '0'..='7' => {
                let first = esc.to_digit(8).unwrap_or(0);
                char::from_u32(take_octal(&mut chars, first))
            }
            'x' => Some(take_hex(&mut chars, 2)?),
            'u' => Some(take_hex(&mut chars, 4)?),
            'U' => Some(take_hex(&mut chars, 8)?),
            'N' => return Err(LiteralError::NamedEscape),
            other => {
                // Unknown escapes keep their backslash.
                out.push('\\');
                Some(other)
            }
        };
        out.extend(decoded);
    }
    Ok(out)
}

/// Render `value` as a double-quoted Python literal.
///
/// # Examples
///
/// ```rust
/// use sort_all::literal::quote;
///
/// assert_eq!(quote("name"), "\"name\"");
/// assert_eq!(quote("say \"hi\"\n"), r#""say \"hi\"\n""#);
/// ```
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && u32::from(c) < 0x100 => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("'name'", "name")]
    #[case("\"name\"", "name")]
    #[case("'''a\"b'''", "a\"b")]
    #[case("\"\"\"\"\"\"", "")]
    #[case("''", "")]
    #[case("r'\\d+'", "\\d+")]
    #[case("'tab\\there'", "tab\there")]
    #[case("'\\x41\\u00e9\\U0001F600'", "A\u{e9}\u{1F600}")]
    #[case("'\\101\\0'", "A\0")]
    #[case("'keep\\q'", "keep\\q")]
    #[case("'line\\\ncontinued'", "linecontinued")]
    #[case("u'legacy'", "legacy")]
    fn decodes_str_literals(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(
            decode(token),
            Ok(StringLiteral {
                kind: LiteralKind::Str,
                value: expected.to_owned(),
            })
        );
    }

    #[rstest]
    #[case("b'x'", LiteralKind::Bytes)]
    #[case("Rb'x'", LiteralKind::Bytes)]
    #[case("f'{x}'", LiteralKind::Format)]
    #[case("rf'{x}'", LiteralKind::Format)]
    fn reports_non_str_kinds(#[case] token: &str, #[case] kind: LiteralKind) {
        assert_eq!(decode(token).map(|lit| lit.kind), Ok(kind));
    }

    #[rstest]
    #[case("'\\N{BULLET}'", LiteralError::NamedEscape)]
    #[case("'\\x4'", LiteralError::InvalidEscape)]
    #[case("'\\U00110000'", LiteralError::InvalidEscape)]
    #[case("name", LiteralError::Malformed)]
    #[case("'open", LiteralError::Malformed)]
    fn rejects_undecodable(#[case] token: &str, #[case] error: LiteralError) {
        assert_eq!(decode(token), Err(error));
    }

    #[rstest]
    #[case("plain", "\"plain\"")]
    #[case("back\\slash", "\"back\\\\slash\"")]
    #[case("bell\x07", "\"bell\\x07\"")]
    #[case("caf\u{e9}", "\"caf\u{e9}\"")]
    fn quotes_values(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(quote(value), expected);
    }

    #[rstest]
    #[case("'it\\'s'")]
    #[case("'a\\\\b'")]
    #[case("'x\\ty'")]
    fn quoted_values_decode_to_themselves(#[case] token: &str) {
        let Ok(lit) = decode(token) else {
            panic!("decodable literal");
        };
        assert_eq!(decode(&quote(&lit.value)).map(|l| l.value), Ok(lit.value));
    }
}
