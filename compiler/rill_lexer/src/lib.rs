//! Lexer for Rill using logos with string interning.
//!
//! A logos-derived [`RawToken`] scan is cooked into [`Token`]s: identifiers
//! are promoted to keywords by exact match, string/character literals are
//! unescaped here, number literals keep their raw text (the parser converts
//! them to exact values).
//!
//! Grammar notes inherited from the language:
//! - identifiers may contain `-` after the first character, so `a-b` is one
//!   identifier, not a subtraction;
//! - a sign directly followed by a digit starts a signed number literal, so
//!   `1+2` lexes as the two integers `1` and `+2` (write `1 + 2`);
//! - `1.` is the integer `1` followed by `.`, and `1e` is `1` followed by
//!   the identifier `e` (exponents and fractions require digits).

use logos::Logos;
use rill_ir::{Span, StringInterner, Token, TokenKind};

/// Raw token from logos (before cooking).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\x08]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_-]*")]
    Ident,

    // Decimal before integer: both can match the same prefix, the longer
    // match (with the fraction) must win.
    #[regex(r"[+-]?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Decimal,

    #[regex(r"[+-]?[0-9]+([eE][+-]?[0-9]+)?")]
    Integer,

    #[regex(r#""([^"\\\n\r]|\\[bnrt'"\\])*""#)]
    Str,

    #[regex(r#"'([^'\\\n\r]|\\[bnrt'"\\])'"#)]
    Char,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
}

/// Lexing failure: an unrecognized or unterminated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub span: Span,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized token at {}", self.span)
    }
}

impl std::error::Error for LexError {}

/// Lex source text into tokens, ending with an EOF token.
pub fn lex(source: &str, interner: &StringInterner) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut raw = RawToken::lexer(source);

    while let Some(result) = raw.next() {
        let span = Span::from_range(raw.span());
        match result {
            Ok(RawToken::LineComment) => {}
            Ok(token) => {
                let kind = cook(token, raw.slice(), interner);
                tokens.push(Token::new(kind, span));
            }
            Err(()) => return Err(LexError { span }),
        }
    }

    let eof = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("source exceeds {} bytes", u32::MAX));
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));
    Ok(tokens)
}

/// Convert a raw token into a `TokenKind`, interning text payloads.
fn cook(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Ident => {
            TokenKind::keyword(slice).unwrap_or_else(|| TokenKind::Ident(interner.intern(slice)))
        }
        RawToken::Integer => TokenKind::Integer(interner.intern(slice)),
        RawToken::Decimal => TokenKind::Decimal(interner.intern(slice)),
        RawToken::Str => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::Str(interner.intern(&unescape(content)))
        }
        RawToken::Char => {
            let content = &slice[1..slice.len() - 1];
            let unescaped = unescape(content);
            // The token regex admits exactly one (possibly escaped) character.
            TokenKind::Character(unescaped.chars().next().unwrap_or('\0'))
        }
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Assign => TokenKind::Assign,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Le => TokenKind::Le,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Ge => TokenKind::Ge,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LineComment => TokenKind::Eof, // filtered by the caller
    }
}

/// Decode the escape set `\b \n \r \t \' \" \\`.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{0008}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(c @ ('\'' | '"' | '\\')) => out.push(c),
            // Unreachable: the token regexes admit no other escapes.
            _ => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = StringInterner::new();
        lex(source, &interner)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        let interner = StringInterner::new();
        lex(source, &interner)
            .unwrap()
            .into_iter()
            .filter_map(|t| match t.kind {
                TokenKind::Ident(n)
                | TokenKind::Integer(n)
                | TokenKind::Decimal(n)
                | TokenKind::Str(n) => Some(interner.resolve(n).to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        let interner = StringInterner::new();
        let tokens = lex("LET x = NIL;", &interner).unwrap();
        let x = interner.intern("x");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Let,
                TokenKind::Ident(x),
                TokenKind::Assign,
                TokenKind::Nil,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn hyphen_is_an_identifier_character() {
        assert_eq!(texts("first-second"), vec!["first-second"]);
    }

    #[test]
    fn sign_before_digit_starts_a_number() {
        // `1+2` is two integer tokens; `1 + 2` is integer, plus, integer.
        assert_eq!(texts("1+2"), vec!["1", "+2"]);
        assert_eq!(
            kinds("1 + 2"),
            vec![
                TokenKind::Integer(rill_ir::Name::from_raw(1)),
                TokenKind::Plus,
                TokenKind::Integer(rill_ir::Name::from_raw(2)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn trailing_dot_is_not_a_decimal() {
        let interner = StringInterner::new();
        let tokens = lex("1.", &interner).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer(interner.intern("1")));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn bare_exponent_is_not_part_of_a_number() {
        let interner = StringInterner::new();
        let tokens = lex("1e", &interner).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer(interner.intern("1")));
        assert_eq!(tokens[1].kind, TokenKind::Ident(interner.intern("e")));
    }

    #[test]
    fn decimal_with_exponent() {
        assert_eq!(texts("2.75e-2"), vec!["2.75e-2"]);
    }

    #[test]
    fn string_escapes_are_cooked() {
        let interner = StringInterner::new();
        let tokens = lex(r#""a\tb\"c\\""#, &interner).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str(interner.intern("a\tb\"c\\")));
    }

    #[test]
    fn character_literals() {
        assert_eq!(kinds("'a'")[0], TokenKind::Character('a'));
        assert_eq!(kinds(r"'\n'")[0], TokenKind::Character('\n'));
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("// comment\nTRUE // trailing"),
            vec![TokenKind::True, TokenKind::Eof]
        );
    }

    #[test]
    fn comparison_operators_prefer_longest() {
        assert_eq!(
            kinds("< <= == != >= >"),
            vec![
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let interner = StringInterner::new();
        assert!(lex("\"abc", &interner).is_err());
    }

    #[test]
    fn unknown_character_is_an_error() {
        let interner = StringInterner::new();
        let err = lex("LET @;", &interner).unwrap_err();
        assert_eq!(err.span, Span::new(4, 5));
    }

    #[test]
    fn invalid_escape_is_an_error() {
        let interner = StringInterner::new();
        assert!(lex(r#""bad \q escape""#, &interner).is_err());
    }
}
