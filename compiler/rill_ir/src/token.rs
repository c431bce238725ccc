//! Tokens produced by the lexer.

use std::fmt;

use crate::{Name, Span};

/// A single lexed token: kind plus source span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds.
///
/// Number literals carry their raw text (interned); the parser converts them
/// to exact values. String and character literals are already unescaped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Let,
    Def,
    If,
    Else,
    For,
    In,
    Return,
    Do,
    End,
    Object,
    Nil,
    True,
    False,
    And,
    Or,

    // Punctuation
    LParen,
    RParen,
    Comma,
    Semi,
    Dot,
    Colon,
    Assign,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,

    // Literals
    Integer(Name),
    Decimal(Name),
    Character(char),
    Str(Name),

    Ident(Name),

    Eof,
}

impl TokenKind {
    /// Map an identifier to its keyword kind, if it is one.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "LET" => TokenKind::Let,
            "DEF" => TokenKind::Def,
            "IF" => TokenKind::If,
            "ELSE" => TokenKind::Else,
            "FOR" => TokenKind::For,
            "IN" => TokenKind::In,
            "RETURN" => TokenKind::Return,
            "DO" => TokenKind::Do,
            "END" => TokenKind::End,
            "OBJECT" => TokenKind::Object,
            "NIL" => TokenKind::Nil,
            "TRUE" => TokenKind::True,
            "FALSE" => TokenKind::False,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            _ => return None,
        })
    }

    /// Human-readable description for parse errors.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Let => "`LET`",
            TokenKind::Def => "`DEF`",
            TokenKind::If => "`IF`",
            TokenKind::Else => "`ELSE`",
            TokenKind::For => "`FOR`",
            TokenKind::In => "`IN`",
            TokenKind::Return => "`RETURN`",
            TokenKind::Do => "`DO`",
            TokenKind::End => "`END`",
            TokenKind::Object => "`OBJECT`",
            TokenKind::Nil => "`NIL`",
            TokenKind::True => "`TRUE`",
            TokenKind::False => "`FALSE`",
            TokenKind::And => "`AND`",
            TokenKind::Or => "`OR`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Semi => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Colon => "`:`",
            TokenKind::Assign => "`=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Lt => "`<`",
            TokenKind::Le => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::Ge => "`>=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Integer(_) => "integer literal",
            TokenKind::Decimal(_) => "decimal literal",
            TokenKind::Character(_) => "character literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
