//! # Lexical tokens
//!
//! This module defines the token record shared by the whole pipeline. It
//! provides:
//!
//! - [`TokenKind`]: the closed set of lexical categories recognized by the
//!   scanner rule table,
//! - [`Token`]: a kind plus the matched source text and the 1-based
//!   [`Position`] where the match started.
//!
//! Tokens are produced by the lexer and consumed once by the symbol mapper;
//! afterwards only the mapped code and, for diagnostics, the position
//! survive.

use crate::error::Position;
use smartstring::alias::String;

/// The closed set of lexical categories.
///
/// Category granularity follows the terminal alphabet of the parsing
/// tables: operators are grouped by precedence tier (`AddOp` vs `MulOp`),
/// all punctuation shares one category (split into distinct codes by the
/// symbol mapper), and the three word-shaped operator spellings `or`,
/// `and`, `not` are their own categories.
///
/// `Whitespace` and `Comment` are recognized by the rule table but
/// discarded by the lexer; they never appear in a yielded token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier (`[A-Za-z_][A-Za-z0-9_]*`, not a reserved word).
    Ident,
    /// Integer literal.
    Int,
    /// Real literal (`digits.digits`).
    Real,
    /// Double-quoted string literal.
    Str,
    /// Type name: `int`, `float`, `string`.
    Type,
    /// Control keyword: `if`, `while`, `return`, `else`.
    Keyword,
    /// Additive operator: `+`, `-`.
    AddOp,
    /// Multiplicative operator: `*`, `/`.
    MulOp,
    /// Relational operator: `<=`, `>=`, `<`, `>`.
    RelOp,
    /// Equality operator: `==`.
    EqOp,
    /// The word operator `or`.
    LogicOr,
    /// The word operator `and`.
    LogicAnd,
    /// The word operator `not`.
    LogicNot,
    /// Assignment: `=`.
    Assign,
    /// Punctuation: `;`, `,`, `(`, `)`, `{`, `}`.
    Symbol,
    /// Runs of blanks, tabs and newlines. Discarded.
    Whitespace,
    /// `//` line comment. Discarded.
    Comment,
    /// End of input. Yielded exactly once, always last.
    Eof,
}

/// One lexical token.
///
/// Immutable once produced. `text` is the exact matched slice of the
/// source (for the synthesized end-of-input token it is empty), and
/// `position` is where the match started.
///
/// # Example
/// ```rust
/// # use tablex::{Position, Token, TokenKind};
/// let tok = Token {
///     kind: TokenKind::Int,
///     text: "10".into(),
///     position: Position::new(1, 9),
/// };
/// assert_eq!(tok.kind, TokenKind::Int);
/// assert_eq!(tok.text, "10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's category.
    pub kind: TokenKind,
    /// The matched source text.
    pub text: String,
    /// 1-based position of the first matched character.
    pub position: Position,
}
