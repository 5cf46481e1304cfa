//! Source positions and the crate-level error type.
//!
//! Every pipeline stage owns a narrow error type next to the code that
//! raises it ([`LexicalError`], [`MapError`], [`GrammarError`],
//! [`ParseError`]). This module defines the shared [`Position`] record those
//! errors attach to, and [`TablexError`], the aggregate the full pipeline
//! and the CLI report through.
//!
//! # Examples
//!
//! ```rust
//! # use tablex::Position;
//! let p = Position::new(3, 7);
//! assert_eq!(p.to_string(), "3:7");
//! ```

use crate::grammar::GrammarError;
use crate::lexer::LexicalError;
use crate::parser::ParseError;
use crate::symbols::MapError;
use std::fmt;
use thiserror::Error;

/// A 1-based line/column position in source text.
///
/// `line` and `column` are 1-based (human-facing); the first character of
/// the input is `1:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    /// Pretty-print for diagnostics (`line:column`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Unified error for the tokenize→map→parse pipeline.
///
/// Each variant wraps one stage's error type, and `#[from]` conversions let
/// pipeline code propagate them with `?` without explicit mapping. The five
/// reportable failure kinds stay distinguishable: lexical failures,
/// unmappable tokens, malformed automaton descriptions, syntax errors, and
/// automaton inconsistencies (the latter two as the two [`ParseError`]
/// variants).
#[derive(Debug, Error)]
pub enum TablexError {
    /// The tokenizer hit a character no rule matches.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),

    /// A token had no symbol code.
    #[error("mapping error: {0}")]
    Map(#[from] MapError),

    /// An automaton description violated the expected line/field structure.
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// The driver rejected the input or detected a corrupt automaton.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Reading a description or source file failed.
    #[error("io error {0:?}")]
    Io(#[from] std::io::Error),
}
