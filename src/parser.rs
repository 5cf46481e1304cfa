//! # Shift-reduce driver
//!
//! Drives a loaded [`Automaton`] over a symbol sequence. The driver owns
//! two index-synchronized stacks: the state stack (which starts holding
//! state 0 and never empties) and the symbol stack (one entry per state
//! above the bottom). Each [`Driver::step`] looks up the ACTION cell for
//! the current state and the lookahead and applies it:
//!
//! - **Shift** pushes the lookahead and the target state; the caller
//!   advances to the next symbol.
//! - **Reduce** pops `rhs_len` entries off both stacks, pushes the
//!   production's left-hand side, and enters the GOTO target of the
//!   exposed state. The lookahead is not consumed.
//! - **Accept** finishes, but only with end-of-input lookahead over the
//!   canonical final stack (`[0, s]` states, a single stacked
//!   nonterminal). Anything else is evidence of a corrupt table and
//!   reported as [`ParseError::Inconsistent`].
//! - **Error** rejects the lookahead as [`ParseError::Syntax`].
//!
//! Stepping one action at a time keeps the loop in the caller's hands, so
//! embedding code can poll for cancellation or log between actions.
//! [`parse`] and [`parse_source`] wrap the loop for the two common cases:
//! a raw code sequence and full source text through the
//! tokenize→map→drive pipeline.

use crate::error::{Position, TablexError};
use crate::grammar::{Action, Automaton, StateId, SymbolCode};
use crate::lexer::Lexer;
use crate::symbols::symbol_code;
use smartstring::alias::String;
use thiserror::Error;

/// Rejection or internal failure while driving the automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is not a sentence: the automaton has no transition for
    /// this symbol in this state. `position` is carried when the symbol
    /// came from scanned source text.
    #[error("syntax error in state {} on symbol {}{}", .state, .symbol, fmt_at(.position))]
    Syntax {
        /// State the driver was in.
        state: StateId,
        /// The offending symbol code.
        symbol: SymbolCode,
        /// Source position of the offending token, when known.
        position: Option<Position>,
    },
    /// The tables sent the driver somewhere impossible: a state outside
    /// the table, a reduce past the production list, a stack underflow,
    /// an undefined GOTO, or an accept over a non-canonical stack.
    #[error("inconsistent automaton in state {state}: {reason}")]
    Inconsistent {
        /// State the driver was in when the inconsistency surfaced.
        state: StateId,
        /// What the tables asked for.
        reason: String,
    },
}

fn fmt_at(position: &Option<Position>) -> std::string::String {
    position.map(|p| format!(" at {p}")).unwrap_or_default()
}

/// What a single [`Driver::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The lookahead was pushed; feed the next symbol.
    Shift,
    /// Reduced by the production at this index; feed the same symbol
    /// again.
    Reduce(usize),
    /// The input was accepted; the driver is finished.
    Accept,
}

/// Driver action counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Steps taken, the accepting one included.
    pub steps: usize,
    /// Symbols shifted.
    pub shifts: usize,
    /// Reductions applied.
    pub reductions: usize,
}

/// The shift-reduce engine for one parse.
///
/// Create one per input with [`Driver::new`], then call [`Driver::step`]
/// with the current lookahead until it returns [`Step::Accept`] or an
/// error. After a shift the caller must advance to the next symbol; after
/// a reduce it must present the same symbol again; past the end of input
/// it presents the automaton's end symbol.
pub struct Driver<'a> {
    automaton: &'a Automaton,
    states: Vec<StateId>,
    symbols: Vec<SymbolCode>,
    stats: ParseStats,
    done: bool,
}

impl<'a> Driver<'a> {
    /// A fresh driver positioned in state 0 with empty stacks.
    pub fn new(automaton: &'a Automaton) -> Self {
        Driver {
            automaton,
            states: vec![0],
            symbols: Vec::new(),
            stats: ParseStats::default(),
            done: false,
        }
    }

    /// The state on top of the state stack.
    pub fn state(&self) -> StateId {
        // The state stack never empties: it starts at [0] and reductions
        // leave at least the bottom entry.
        self.states.last().copied().unwrap_or(0)
    }

    /// Action counters so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Applies one table action for `lookahead`.
    ///
    /// `position` is attached to a [`ParseError::Syntax`] rejection when
    /// the caller knows where the symbol came from.
    pub fn step(
        &mut self,
        lookahead: SymbolCode,
        position: Option<Position>,
    ) -> Result<Step, ParseError> {
        let state = self.state();
        if self.done {
            return Err(ParseError::Inconsistent {
                state,
                reason: "step after accept".into(),
            });
        }
        self.stats.steps += 1;
        if log::log_enabled!(log::Level::Trace) {
            self.dump(lookahead);
        }

        if lookahead >= self.automaton.terminal_count() {
            return Err(ParseError::Syntax {
                state,
                symbol: lookahead,
                position,
            });
        }
        let action = match self.automaton.action(state, lookahead) {
            Some(action) => action,
            None => {
                return Err(ParseError::Inconsistent {
                    state,
                    reason: "state is outside the table".into(),
                });
            }
        };

        match action {
            Action::Shift(target) => {
                self.symbols.push(lookahead);
                self.states.push(target);
                self.stats.shifts += 1;
                log::trace!("Shift {target}");
                Ok(Step::Shift)
            }
            Action::Reduce(index) => {
                let production = match self.automaton.production(index) {
                    Some(production) => production,
                    None => {
                        return Err(ParseError::Inconsistent {
                            state,
                            reason: format!(
                                "reduce by production {index}, table lists {}",
                                self.automaton.productions().len()
                            )
                            .into(),
                        });
                    }
                };
                if production.rhs_len > self.symbols.len() {
                    return Err(ParseError::Inconsistent {
                        state,
                        reason: format!(
                            "reduction pops {} entries, stack holds {}",
                            production.rhs_len,
                            self.symbols.len()
                        )
                        .into(),
                    });
                }
                self.symbols.truncate(self.symbols.len() - production.rhs_len);
                self.states.truncate(self.states.len() - production.rhs_len);
                let exposed = self.state();
                let target = match self.automaton.goto(exposed, production.lhs) {
                    Some(target) => target,
                    None => {
                        return Err(ParseError::Inconsistent {
                            state: exposed,
                            reason: format!("no goto for nonterminal {}", production.lhs).into(),
                        });
                    }
                };
                self.symbols.push(production.lhs);
                self.states.push(target);
                self.stats.reductions += 1;
                log::trace!("Reduce {index}, goto {target}");
                Ok(Step::Reduce(index))
            }
            Action::Accept => {
                self.check_accept(lookahead)?;
                self.done = true;
                log::trace!("Accept");
                Ok(Step::Accept)
            }
            Action::Error => Err(ParseError::Syntax {
                state,
                symbol: lookahead,
                position,
            }),
        }
    }

    // Accept is only legal over the canonical final stack: states [0, s]
    // with exactly one stacked symbol, a nonterminal, on end-of-input
    // lookahead.
    fn check_accept(&self, lookahead: SymbolCode) -> Result<(), ParseError> {
        let canonical = lookahead == self.automaton.end_symbol()
            && self.states.len() == 2
            && self.states[0] == 0
            && self.symbols.len() == 1
            && self.symbols[0] >= self.automaton.terminal_count();
        if canonical {
            Ok(())
        } else {
            Err(ParseError::Inconsistent {
                state: self.state(),
                reason: format!(
                    "accept with {} stacked states and {} symbols on lookahead {lookahead}",
                    self.states.len(),
                    self.symbols.len()
                )
                .into(),
            })
        }
    }

    // One line per step: state/symbol pairs bottom-up, the lookahead
    // paired with the top state.
    fn dump(&self, lookahead: SymbolCode) {
        let mut output = std::string::String::new();
        for (state, symbol) in self
            .states
            .iter()
            .zip(self.symbols.iter().chain(std::iter::once(&lookahead)))
        {
            output.push_str(&format!("<{state}> {symbol}  "));
        }
        log::trace!("{output}");
    }
}

/// Runs a raw symbol sequence through the automaton.
///
/// The automaton's end symbol is presented as lookahead once `input` is
/// exhausted, so the sequence itself need not carry one. Terminates with
/// exactly one outcome for any table out of a conflict-free construction
/// and finite input.
pub fn parse(automaton: &Automaton, input: &[SymbolCode]) -> Result<ParseStats, ParseError> {
    let mut driver = Driver::new(automaton);
    let end = automaton.end_symbol();
    let mut index = 0;
    loop {
        let lookahead = input.get(index).copied().unwrap_or(end);
        match driver.step(lookahead, None)? {
            Step::Shift => index += 1,
            Step::Reduce(_) => {}
            Step::Accept => return Ok(driver.stats()),
        }
    }
}

/// Runs source text through the whole pipeline: scan, map each token to
/// its symbol code, drive the automaton. Token positions ride along and
/// come back inside [`ParseError::Syntax`] rejections.
///
/// The automaton is expected to be built over the mapper's 24-terminal
/// alphabet; symbols past its ACTION columns reject as syntax errors.
pub fn parse_source(automaton: &Automaton, source: &str) -> Result<ParseStats, TablexError> {
    let mut lexer = Lexer::new(source);
    let mut driver = Driver::new(automaton);
    let end = automaton.end_symbol();
    let mut lookahead = next_symbol(&mut lexer, end)?;
    loop {
        let (symbol, position) = lookahead;
        match driver.step(symbol, position)? {
            Step::Shift => lookahead = next_symbol(&mut lexer, end)?,
            Step::Reduce(_) => {}
            Step::Accept => return Ok(driver.stats()),
        }
    }
}

// The end-of-input token maps to the end symbol and the scanner stops
// after it; keep presenting the end symbol for the trailing reductions.
fn next_symbol(
    lexer: &mut Lexer<'_, '_>,
    end: SymbolCode,
) -> Result<(SymbolCode, Option<Position>), TablexError> {
    match lexer.try_next()? {
        Some(token) => {
            let code = symbol_code(&token)?;
            Ok((code, Some(token.position)))
        }
        None => Ok((end, None)),
    }
}
