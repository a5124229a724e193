//! Token kinds produced by the lexer.
//!
//! Every token carries the literal text it was lexed from; the parser keeps
//! that literal on the AST nodes it produces so diagnostics and round-trip
//! printing can quote the original source.

use strum::Display;

/// The kind of a lexed token.
///
/// The `Display` form is the token's canonical source text (`"=="`, `"let"`,
/// …) for the fixed tokens, and a descriptive name for the open-ended ones
/// (`Ident`, `Int`, `Str`). Parser diagnostics interpolate these forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    /// A character sequence the lexer could not make sense of.
    #[strum(serialize = "Illegal")]
    Illegal,
    /// End of input.
    #[strum(serialize = "Eof")]
    Eof,

    #[strum(serialize = "Ident")]
    Ident,
    #[strum(serialize = "Int")]
    Int,
    #[strum(serialize = "Str")]
    Str,

    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "!")]
    Bang,

    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Lte,
    #[strum(serialize = ">=")]
    Gte,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,

    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ";")]
    Semicolon,
    #[strum(serialize = ":")]
    Colon,
    #[strum(serialize = "(")]
    Lparen,
    #[strum(serialize = ")")]
    Rparen,
    #[strum(serialize = "{{")]
    Lbrace,
    #[strum(serialize = "}}")]
    Rbrace,
    #[strum(serialize = "[")]
    Lbracket,
    #[strum(serialize = "]")]
    Rbracket,

    #[strum(serialize = "fn")]
    Function,
    #[strum(serialize = "let")]
    Let,
    #[strum(serialize = "true")]
    True,
    #[strum(serialize = "false")]
    False,
    #[strum(serialize = "if")]
    If,
    #[strum(serialize = "else")]
    Else,
    #[strum(serialize = "return")]
    Return,
    #[strum(serialize = "macro")]
    Macro,
}

/// A lexed token: its kind plus the literal text it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    /// The end-of-input token.
    #[must_use]
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}

/// Maps an identifier's text to its keyword kind, or `Ident` for plain names.
#[must_use]
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "fn" => TokenKind::Function,
        "let" => TokenKind::Let,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "macro" => TokenKind::Macro,
        _ => TokenKind::Ident,
    }
}
