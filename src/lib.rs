//! # tablex
//!
//! A table-driven shift-reduce parsing engine. The tables are data, not
//! code: an [`Automaton`] is loaded from a textual description (produced
//! by whatever generator built the grammar) and driven over a token
//! stream. Nothing here constructs tables, computes item sets, or knows
//! FIRST from FOLLOW; the crate recognizes sentences, it does not build
//! parsers.
//!
//! ## Overview
//!
//! The pipeline has four stages, each its own module:
//!
//! - [`lexer`] — a rule-table scanner that turns source text into
//!   [`Token`] items with 1-based line/column positions. Rules are tried
//!   in declaration order at each offset; whitespace and comments are
//!   discarded; an end-of-input token always comes last.
//! - [`symbols`] — the mapping from tokens to the integer terminal codes
//!   the tables are indexed by, total over everything the scanner yields.
//! - [`grammar`] — the automaton data model and its loader. Serialized
//!   ACTION cells are decoded into tagged [`Action`] values right here,
//!   so the driver never touches the sign encoding.
//! - [`parser`] — the shift-reduce [`Driver`], one table action per
//!   [`Driver::step`], with [`parse`] and [`parse_source`] wrapping the
//!   loop.
//!
//! Every failure mode has its own type ([`LexicalError`], [`MapError`],
//! [`GrammarError`], the two [`ParseError`] kinds), aggregated in
//! [`TablexError`] for whole-pipeline callers.
//!
//! ## Example
//!
//! ```rust
//! use tablex::{parse, Automaton};
//!
//! // S -> E, E -> id '+' id over id=0, '+'=1, '$'=2.
//! let description = "\
//! 2
//! 3 1
//! 4 3
//! 6 3
//! 3 0 0 1 2
//! 0 0 9999 0 0
//! 0 0 -1 0 0
//! 0 4 0 0 0
//! 5 0 0 0 0
//! 0 0 -2 0 0
//! ";
//! let automaton: Automaton = description.parse().unwrap();
//!
//! let stats = parse(&automaton, &[0, 1, 0]).unwrap();
//! assert_eq!(stats.shifts, 3);
//! assert!(parse(&automaton, &[0, 1, 1]).is_err());
//! ```
//!
//! Scanning and mapping work on source text directly:
//!
//! ```rust
//! use tablex::{symbol_code, tokenize, TokenKind};
//!
//! let tokens = tokenize("int x = 10;").unwrap();
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Type,
//!         TokenKind::Ident,
//!         TokenKind::Assign,
//!         TokenKind::Int,
//!         TokenKind::Symbol,
//!         TokenKind::Eof,
//!     ]
//! );
//! let codes: Vec<usize> = tokens.iter().map(|t| symbol_code(t).unwrap()).collect();
//! assert_eq!(codes, [4, 0, 18, 1, 12, 23]);
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] — lexical analysis (tokenization)
//! - [`symbols`] — token-to-terminal-code mapping
//! - [`grammar`] — automaton model and description loader
//! - [`parser`] — the shift-reduce driver
//! - [`token`] — token definitions
//! - [`error`] — positions and the crate-level error
//!
//! ## Re-exports
//!
//! The main entry points are re-exported at the crate root:
//!
//! ```text
//! Token, TokenKind, Lexer, RuleSet, LexRule, tokenize,
//! symbol_code, Automaton, Action, Production, Driver, Step,
//! parse, parse_source, Position, TablexError
//! ```
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod token;

pub use error::{Position, TablexError};
pub use grammar::{Action, Automaton, GrammarError, Production, StateId, SymbolCode};
pub use lexer::{tokenize, LexRule, LexStats, Lexer, LexicalError, RuleSet};
pub use parser::{parse, parse_source, Driver, ParseError, ParseStats, Step};
pub use symbols::{symbol_code, MapError, TERMINAL_COUNT};
pub use token::{Token, TokenKind};
