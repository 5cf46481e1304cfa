//! # Tokenizer
//!
//! A data-driven scanner: one [`RuleSet`] holds an ordered list of
//! `(kind, pattern)` rules compiled together into a single anchored,
//! leftmost-first [`regex_automata`] dense DFA. Priority is declaration
//! order, so the first rule whose pattern matches at the current offset
//! wins, exactly as if the patterns were tried one by one.
//!
//! The scanner is lazy ([`Lexer::try_next`]) and fail-fast: the first
//! character no rule matches aborts the scan with a [`LexicalError`]
//! carrying the offending character and its 1-based position. Whitespace
//! and comments are matched and discarded. The end-of-input token is
//! yielded exactly once, always last, even for empty input: either from an
//! explicit `$` in the source (nothing after it is scanned) or synthesized
//! with empty text when the input runs out.
//!
//! Reserved words are scanned by the identifier rule and reclassified
//! afterwards, so `int` is a type name while `interior` stays an
//! identifier.

use crate::error::Position;
use crate::token::{Token, TokenKind};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex_automata::{
    Anchored, Input, MatchKind,
    dfa::{Automaton as _, StartKind, dense},
};
use regex_automata::util::syntax;
use smartstring::alias::String;
use thiserror::Error;

/// Raised when no rule matches at the current offset.
///
/// Scanning halts at the first failure; there is no skip-and-resynchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized character {found:?} at {position}")]
pub struct LexicalError {
    /// The character no rule matched.
    pub found: char,
    /// 1-based position of that character.
    pub position: Position,
}

/// One scanner rule: a category and the pattern recognizing it.
#[derive(Debug, Clone, Copy)]
pub struct LexRule {
    /// Category assigned to the matched text.
    pub kind: TokenKind,
    /// Pattern, compiled with ASCII syntax.
    pub pattern: &'static str,
}

/// The built-in rule table for the source language.
///
/// Order is priority. `Comment` precedes `MulOp` so `//` never scans as two
/// divisions, `EqOp` precedes `Assign` so `==` is never split, and `Real`
/// precedes `Int` so `10.5` scans as one real literal.
pub const DEFAULT_RULES: &[LexRule] = &[
    LexRule { kind: TokenKind::Whitespace, pattern: r"[ \t\r\n]+" },
    LexRule { kind: TokenKind::Comment, pattern: r"//[^\n]*" },
    LexRule { kind: TokenKind::RelOp, pattern: r"<=|>=|<|>" },
    LexRule { kind: TokenKind::EqOp, pattern: r"==" },
    LexRule { kind: TokenKind::AddOp, pattern: r"\+|-" },
    LexRule { kind: TokenKind::MulOp, pattern: r"\*|/" },
    LexRule { kind: TokenKind::Assign, pattern: r"=" },
    LexRule { kind: TokenKind::Symbol, pattern: r"[;,(){}]" },
    LexRule { kind: TokenKind::Real, pattern: r"[0-9]+\.[0-9]+" },
    LexRule { kind: TokenKind::Int, pattern: r"[0-9]+" },
    LexRule { kind: TokenKind::Str, pattern: r#""[^"]*""# },
    LexRule { kind: TokenKind::Ident, pattern: r"[A-Za-z_][A-Za-z0-9_]*" },
    LexRule { kind: TokenKind::Eof, pattern: r"\$" },
];

static DEFAULT_RULE_SET: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::try_new(DEFAULT_RULES).expect("built-in rule table compiles"));

/// The compiled built-in rule table.
pub fn default_rule_set() -> &'static RuleSet {
    &DEFAULT_RULE_SET
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    match text {
        "int" | "float" | "string" => Some(TokenKind::Type),
        "if" | "while" | "return" | "else" => Some(TokenKind::Keyword),
        "or" => Some(TokenKind::LogicOr),
        "and" => Some(TokenKind::LogicAnd),
        "not" => Some(TokenKind::LogicNot),
        _ => None,
    }
}

/// An ordered rule table compiled into one multi-pattern DFA.
///
/// The DFA is anchored and leftmost-first, so the pattern identifier a
/// search reports is the first rule in table order that matches at the
/// searched offset.
pub struct RuleSet {
    kinds: Vec<TokenKind>,
    dfa: dense::DFA<Vec<u32>>,
}

impl RuleSet {
    /// Compiles `rules` in order. Fails if a pattern does not parse.
    pub fn try_new(rules: &[LexRule]) -> Result<Self> {
        let patterns: Vec<&str> = rules.iter().map(|r| r.pattern).collect();
        let dfa = dense::Builder::new()
            .configure(
                dense::Config::new()
                    .match_kind(MatchKind::LeftmostFirst)
                    .start_kind(StartKind::Anchored),
            )
            .syntax(syntax::Config::new().unicode(false).utf8(false))
            .build_many(&patterns)
            .context("building scanner DFA")?;
        Ok(Self {
            kinds: rules.iter().map(|r| r.kind).collect(),
            dfa,
        })
    }

    fn kind(&self, pattern: usize) -> TokenKind {
        self.kinds[pattern]
    }
}

/// Counters accumulated over one scan.
#[derive(Debug, Clone, Default)]
pub struct LexStats {
    /// Rule matches, including discarded categories.
    pub matches: usize,
    /// Whitespace and comment matches dropped from the stream.
    pub discarded: usize,
}

/// A lazy scanner over one source string.
///
/// A fresh lexer re-scans from the start; scans are not restartable. After
/// the end-of-input token has been yielded, [`Lexer::try_next`] returns
/// `Ok(None)`.
pub struct Lexer<'r, 's> {
    rules: &'r RuleSet,
    src: &'s str,
    offset: usize,
    line: usize,
    column: usize,
    done: bool,
    stats: LexStats,
}

impl<'s> Lexer<'static, 's> {
    /// Creates a lexer over `source` using the built-in rule table.
    pub fn new(source: &'s str) -> Self {
        Self::with_rules(default_rule_set(), source)
    }
}

impl<'r, 's> Lexer<'r, 's> {
    /// Creates a lexer over `source` using a caller-supplied rule table.
    pub fn with_rules(rules: &'r RuleSet, source: &'s str) -> Self {
        Self {
            rules,
            src: source,
            offset: 0,
            line: 1,
            column: 1,
            done: false,
            stats: LexStats::default(),
        }
    }

    /// Counters for the scan so far.
    pub fn stats(&self) -> LexStats {
        self.stats.clone()
    }

    /// Yields the next token, or `Ok(None)` once the stream is finished.
    pub fn try_next(&mut self) -> Result<Option<Token>, LexicalError> {
        loop {
            if self.done {
                return Ok(None);
            }
            if self.offset == self.src.len() {
                self.done = true;
                return Ok(Some(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    position: Position::new(self.line, self.column),
                }));
            }

            let input = Input::new(self.src)
                .range(self.offset..)
                .anchored(Anchored::Yes);
            let half = match self.rules.dfa.try_search_fwd(&input) {
                // An empty match cannot make progress; treat it like no match.
                Ok(Some(m)) if m.offset() > self.offset => m,
                _ => return Err(self.unrecognized()),
            };

            let text = &self.src[self.offset..half.offset()];
            let mut kind = self.rules.kind(half.pattern().as_usize());
            if kind == TokenKind::Ident {
                if let Some(reserved) = keyword_kind(text) {
                    kind = reserved;
                }
            }
            let position = Position::new(self.line, self.column);
            self.offset = half.offset();
            self.advance(text);
            self.stats.matches += 1;
            log::trace!("MATCHED: {:?} {:?} at {}", kind, text, position);

            match kind {
                TokenKind::Whitespace | TokenKind::Comment => {
                    self.stats.discarded += 1;
                }
                TokenKind::Eof => {
                    // Explicit `$`: the stream ends here, later text is never scanned.
                    self.done = true;
                    return Ok(Some(Token {
                        kind,
                        text: text.into(),
                        position,
                    }));
                }
                _ => {
                    return Ok(Some(Token {
                        kind,
                        text: text.into(),
                        position,
                    }));
                }
            }
        }
    }

    // Column resets on every newline consumed, including newlines inside
    // whitespace runs and string literals.
    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn unrecognized(&self) -> LexicalError {
        let found = self.src[self.offset..].chars().next().unwrap_or('\0');
        LexicalError {
            found,
            position: Position::new(self.line, self.column),
        }
    }
}

/// Scans `source` to completion with the built-in rule table.
///
/// The final element is always the end-of-input token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.try_next()? {
        tokens.push(token);
    }
    Ok(tokens)
}
