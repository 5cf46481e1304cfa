//! # Symbol mapper
//!
//! Converts tokens into the fixed integer terminal alphabet the parsing
//! tables are built over. Terminals occupy the contiguous range
//! `0..TERMINAL_COUNT`; nonterminal codes start at [`TERMINAL_COUNT`] and
//! are offset before indexing GOTO columns (see [`crate::grammar`]).
//!
//! Most categories map one-to-one on their kind alone. Punctuation and
//! keywords carry several spellings under one kind, so they dispatch on the
//! literal text; each has a catch-all code, which keeps the mapping total
//! for every token the scanner can yield.

use crate::grammar::SymbolCode;
use crate::token::{Token, TokenKind};
use smartstring::alias::String;
use thiserror::Error;

pub const IDENT: SymbolCode = 0;
pub const INT_LIT: SymbolCode = 1;
pub const REAL_LIT: SymbolCode = 2;
pub const STR_LIT: SymbolCode = 3;
pub const TYPE_NAME: SymbolCode = 4;
pub const ADD_OP: SymbolCode = 5;
pub const MUL_OP: SymbolCode = 6;
pub const REL_OP: SymbolCode = 7;
pub const LOGIC_OR: SymbolCode = 8;
pub const LOGIC_AND: SymbolCode = 9;
pub const LOGIC_NOT: SymbolCode = 10;
pub const EQ_OP: SymbolCode = 11;
pub const SEMI: SymbolCode = 12;
pub const COMMA: SymbolCode = 13;
pub const LPAREN: SymbolCode = 14;
pub const RPAREN: SymbolCode = 15;
pub const LBRACE: SymbolCode = 16;
/// Catch-all for punctuation without its own code (in practice `}`).
pub const RBRACE: SymbolCode = 17;
pub const ASSIGN: SymbolCode = 18;
pub const KW_IF: SymbolCode = 19;
pub const KW_WHILE: SymbolCode = 20;
pub const KW_RETURN: SymbolCode = 21;
/// Catch-all for keywords without their own code (in practice `else`).
pub const KW_ELSE: SymbolCode = 22;
/// End of input; always the last terminal column of the tables.
pub const END: SymbolCode = 23;

/// Width of the terminal alphabet; nonterminal codes start here.
pub const TERMINAL_COUNT: usize = 24;

/// A token with no defined symbol code.
///
/// Whitespace and comments are discarded by the scanner and never reach the
/// mapper through the pipeline; mapping one by hand reports this error
/// rather than inventing a code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no symbol code for {kind:?} token {text:?}")]
pub struct MapError {
    /// The category with no code.
    pub kind: TokenKind,
    /// The token's text, for diagnostics.
    pub text: String,
}

/// Maps a token to its terminal code.
pub fn symbol_code(token: &Token) -> Result<SymbolCode, MapError> {
    let code = match token.kind {
        TokenKind::Ident => IDENT,
        TokenKind::Int => INT_LIT,
        TokenKind::Real => REAL_LIT,
        TokenKind::Str => STR_LIT,
        TokenKind::Type => TYPE_NAME,
        TokenKind::AddOp => ADD_OP,
        TokenKind::MulOp => MUL_OP,
        TokenKind::RelOp => REL_OP,
        TokenKind::EqOp => EQ_OP,
        TokenKind::LogicOr => LOGIC_OR,
        TokenKind::LogicAnd => LOGIC_AND,
        TokenKind::LogicNot => LOGIC_NOT,
        TokenKind::Assign => ASSIGN,
        TokenKind::Symbol => punct_code(token.text.as_str()),
        TokenKind::Keyword => keyword_code(token.text.as_str()),
        TokenKind::Eof => END,
        TokenKind::Whitespace | TokenKind::Comment => {
            return Err(MapError {
                kind: token.kind,
                text: token.text.clone(),
            });
        }
    };
    Ok(code)
}

fn punct_code(text: &str) -> SymbolCode {
    match text {
        ";" => SEMI,
        "," => COMMA,
        "(" => LPAREN,
        ")" => RPAREN,
        "{" => LBRACE,
        _ => RBRACE,
    }
}

fn keyword_code(text: &str) -> SymbolCode {
    match text {
        "if" => KW_IF,
        "while" => KW_WHILE,
        "return" => KW_RETURN,
        _ => KW_ELSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Position;
    use crate::lexer::tokenize;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token {
            kind,
            text: text.into(),
            position: Position::new(1, 1),
        }
    }

    #[test]
    fn single_spelling_kinds_map_directly() {
        assert_eq!(symbol_code(&tok(TokenKind::Ident, "x")).unwrap(), IDENT);
        assert_eq!(symbol_code(&tok(TokenKind::Int, "3")).unwrap(), INT_LIT);
        assert_eq!(symbol_code(&tok(TokenKind::Real, "3.5")).unwrap(), REAL_LIT);
        assert_eq!(
            symbol_code(&tok(TokenKind::Str, "\"a\"")).unwrap(),
            STR_LIT
        );
        assert_eq!(symbol_code(&tok(TokenKind::Type, "int")).unwrap(), TYPE_NAME);
        assert_eq!(symbol_code(&tok(TokenKind::AddOp, "-")).unwrap(), ADD_OP);
        assert_eq!(symbol_code(&tok(TokenKind::MulOp, "*")).unwrap(), MUL_OP);
        assert_eq!(symbol_code(&tok(TokenKind::RelOp, "<=")).unwrap(), REL_OP);
        assert_eq!(symbol_code(&tok(TokenKind::EqOp, "==")).unwrap(), EQ_OP);
        assert_eq!(symbol_code(&tok(TokenKind::LogicOr, "or")).unwrap(), LOGIC_OR);
        assert_eq!(
            symbol_code(&tok(TokenKind::LogicAnd, "and")).unwrap(),
            LOGIC_AND
        );
        assert_eq!(
            symbol_code(&tok(TokenKind::LogicNot, "not")).unwrap(),
            LOGIC_NOT
        );
        assert_eq!(symbol_code(&tok(TokenKind::Assign, "=")).unwrap(), ASSIGN);
        assert_eq!(symbol_code(&tok(TokenKind::Eof, "$")).unwrap(), END);
    }

    #[test]
    fn punctuation_dispatches_on_text_with_catch_all() {
        let expect = [
            (";", SEMI),
            (",", COMMA),
            ("(", LPAREN),
            (")", RPAREN),
            ("{", LBRACE),
            ("}", RBRACE),
        ];
        for (text, code) in expect {
            assert_eq!(
                symbol_code(&tok(TokenKind::Symbol, text)).unwrap(),
                code,
                "punctuation {text:?}"
            );
        }
    }

    #[test]
    fn keywords_dispatch_on_text_with_catch_all() {
        let expect = [
            ("if", KW_IF),
            ("while", KW_WHILE),
            ("return", KW_RETURN),
            ("else", KW_ELSE),
        ];
        for (text, code) in expect {
            assert_eq!(
                symbol_code(&tok(TokenKind::Keyword, text)).unwrap(),
                code,
                "keyword {text:?}"
            );
        }
    }

    #[test]
    fn discarded_categories_have_no_code() {
        let err = symbol_code(&tok(TokenKind::Whitespace, " ")).unwrap_err();
        assert_eq!(err.kind, TokenKind::Whitespace);
        assert!(err.to_string().contains("no symbol code"));
        assert!(symbol_code(&tok(TokenKind::Comment, "// c")).is_err());
    }

    // Every token the built-in rule table can yield has a code inside the
    // terminal alphabet.
    #[test]
    fn mapping_is_total_over_scanner_output() {
        let source = "\
            int float string if while return else or and not \
            nombre 42 6.28 \"texto\" + - * / <= >= < > == = ; , ( ) { } $";
        let tokens = tokenize(source).unwrap();
        for token in &tokens {
            let code = symbol_code(token).unwrap();
            assert!(code < TERMINAL_COUNT, "code {code} for {token:?}");
        }
        assert_eq!(symbol_code(tokens.last().unwrap()).unwrap(), END);
    }
}
