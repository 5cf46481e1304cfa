//! # Automaton descriptions
//!
//! The parsing tables are consumed, never computed: an [`Automaton`] is
//! loaded from a line-oriented textual description (or built in memory via
//! [`Automaton::try_new`]) and handed to the driver as-is. No grammar
//! analysis of any kind happens here.
//!
//! # Description format
//!
//! Integers separated by spaces or tabs, one record per line; blank lines
//! are ignored:
//!
//! ```text
//! P                    production count
//! lhs rhs_len          P production lines, 0-indexed in listing order
//! S C                  state count, ACTION column (terminal) count
//! a1 .. aC g1 .. gG    S state rows: C ACTION cells then G GOTO cells
//! ```
//!
//! The GOTO width `G` is fixed by the first state row; every row must have
//! the same width. ACTION cells are sign-encoded: `0` is error, a positive
//! value shifts to that state, `-p` reduces by production number `p`
//! (1-based in the file), and the reserved mark [`ACCEPT_MARK`] accepts.
//! GOTO cells hold the target state, with zero (or anything nonpositive)
//! meaning no transition. The encoding is decoded into [`Action`] here, at
//! the load boundary; the rest of the crate never sees raw cell values.
//!
//! Any structural violation loads as a [`GrammarError`] naming the
//! offending line, and no partial automaton is ever returned.

use crate::error::TablexError;
use smartstring::alias::String;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Index of a parser state (a row of the tables).
pub type StateId = usize;

/// Integer code of a grammar symbol.
///
/// Terminals occupy `0..terminal_count`; nonterminals follow from
/// `terminal_count` upward and are offset down before indexing GOTO
/// columns.
pub type SymbolCode = usize;

/// Reserved ACTION cell value marking an accept.
///
/// Shift cells share the positive range with the mark, so descriptions
/// declaring `ACCEPT_MARK` or more states are rejected at load.
pub const ACCEPT_MARK: i64 = 9999;

/// One production, reduced to what the driver needs: the left-hand-side
/// symbol and how many symbols the right-hand side holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// Nonterminal code pushed after the reduction.
    pub lhs: SymbolCode,
    /// Number of stack entries the reduction pops.
    pub rhs_len: usize,
}

/// A decoded ACTION cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Push the lookahead and this state, consume the lookahead.
    Shift(StateId),
    /// Reduce by the production at this (0-based) index.
    Reduce(usize),
    /// The input is a sentence of the grammar.
    Accept,
    /// No transition; the lookahead is not acceptable in this state.
    Error,
}

impl Action {
    /// Decodes a serialized cell value.
    ///
    /// The file form uses 1-based production numbers (`-1` is the first
    /// production); the decoded [`Action::Reduce`] index is 0-based.
    fn decode(cell: i64) -> Self {
        match cell {
            0 => Action::Error,
            ACCEPT_MARK => Action::Accept,
            n if n > 0 => Action::Shift(n as StateId),
            n => Action::Reduce(n.unsigned_abs() as usize - 1),
        }
    }
}

/// A structurally invalid automaton description.
///
/// `line` is the 1-based line in the description text when the violation
/// sits on one line; errors about the description as a whole (truncation,
/// mismatched row collections) carry no line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A specific line violates the format.
    #[error("malformed parsing table at line {line}: {message}")]
    Line {
        /// 1-based offending line.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// The description as a whole violates the format.
    #[error("malformed parsing table: {message}")]
    Shape {
        /// What was wrong with it.
        message: String,
    },
}

impl GrammarError {
    /// Violation on a specific 1-based line.
    pub fn at(line: usize, message: impl Into<String>) -> Self {
        GrammarError::Line {
            line,
            message: message.into(),
        }
    }

    /// Violation of the description as a whole.
    pub fn shape(message: impl Into<String>) -> Self {
        GrammarError::Shape {
            message: message.into(),
        }
    }
}

/// A loaded shift-reduce automaton: the production list, the decoded
/// ACTION table, the GOTO table, and the width of the terminal alphabet.
///
/// The last terminal column (`terminal_count - 1`) is the end-of-input
/// symbol. Rows are indexed by state, ACTION columns by terminal code,
/// GOTO columns by `lhs - terminal_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    productions: Vec<Production>,
    actions: Vec<Vec<Action>>,
    gotos: Vec<Vec<Option<StateId>>>,
    terminals: usize,
}

impl Automaton {
    /// Builds an automaton from in-memory tables, the same shape checks
    /// applied as when loading from text.
    pub fn try_new(
        productions: Vec<Production>,
        actions: Vec<Vec<Action>>,
        gotos: Vec<Vec<Option<StateId>>>,
        terminals: usize,
    ) -> Result<Self, GrammarError> {
        if terminals == 0 {
            return Err(GrammarError::shape("terminal count must be at least 1"));
        }
        if actions.is_empty() {
            return Err(GrammarError::shape("automaton needs at least one state"));
        }
        if actions.len() != gotos.len() {
            return Err(GrammarError::shape(format!(
                "{} action rows but {} goto rows",
                actions.len(),
                gotos.len()
            )));
        }
        if let Some(row) = actions.iter().find(|row| row.len() != terminals) {
            return Err(GrammarError::shape(format!(
                "action row has {} cells, expected {terminals}",
                row.len()
            )));
        }
        let width = gotos[0].len();
        if gotos.iter().any(|row| row.len() != width) {
            return Err(GrammarError::shape("goto rows differ in width"));
        }
        Ok(Automaton {
            productions,
            actions,
            gotos,
            terminals,
        })
    }

    /// Reads and parses a description file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TablexError> {
        let text = fs::read_to_string(path)?;
        Ok(text.parse::<Automaton>()?)
    }

    /// Number of states (table rows).
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    /// Width of the terminal alphabet (ACTION columns).
    pub fn terminal_count(&self) -> usize {
        self.terminals
    }

    /// Number of GOTO columns.
    pub fn nonterminal_count(&self) -> usize {
        self.gotos.first().map_or(0, Vec::len)
    }

    /// The end-of-input symbol, always the last terminal column.
    pub fn end_symbol(&self) -> SymbolCode {
        self.terminals - 1
    }

    /// The production list, in listing order.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// The production at a 0-based index, if there is one.
    pub fn production(&self, index: usize) -> Option<Production> {
        self.productions.get(index).copied()
    }

    /// The ACTION cell for a state and terminal, or `None` when either
    /// index falls outside the table.
    pub fn action(&self, state: StateId, terminal: SymbolCode) -> Option<Action> {
        self.actions.get(state)?.get(terminal).copied()
    }

    /// The GOTO target for a state and nonterminal, or `None` when the
    /// indexes fall outside the table or the cell holds no transition.
    pub fn goto(&self, state: StateId, lhs: SymbolCode) -> Option<StateId> {
        let column = lhs.checked_sub(self.terminals)?;
        *self.gotos.get(state)?.get(column)?
    }
}

impl FromStr for Automaton {
    type Err = GrammarError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (no, line) = next_line(&mut lines, "the production count")?;
        let production_count = parse_single(no, line, "production count")?;

        let mut productions = Vec::with_capacity(production_count);
        for _ in 0..production_count {
            let (no, line) = next_line(&mut lines, "a production")?;
            productions.push(parse_production(no, line)?);
        }

        let (no, line) = next_line(&mut lines, "the state and terminal counts")?;
        let (state_count, terminals) = parse_dims(no, line)?;

        let mut actions = Vec::with_capacity(state_count);
        let mut gotos = Vec::with_capacity(state_count);
        let mut width = None;
        for _ in 0..state_count {
            let (no, line) = next_line(&mut lines, "a state row")?;
            let cells = parse_row(no, line)?;
            match width {
                None => {
                    if cells.len() < terminals {
                        return Err(GrammarError::at(
                            no,
                            format!(
                                "state row has {} cells, fewer than the {terminals} terminals",
                                cells.len()
                            ),
                        ));
                    }
                    width = Some(cells.len());
                }
                Some(expected) if cells.len() != expected => {
                    return Err(GrammarError::at(
                        no,
                        format!("state row has {} cells, expected {expected}", cells.len()),
                    ));
                }
                Some(_) => {}
            }
            let (action_cells, goto_cells) = cells.split_at(terminals);
            actions.push(action_cells.iter().map(|&c| Action::decode(c)).collect());
            gotos.push(goto_cells.iter().map(|&c| decode_goto(c)).collect());
        }

        if let Some((no, _)) = lines.next() {
            return Err(GrammarError::at(no, "unexpected text after the last state row"));
        }

        Automaton::try_new(productions, actions, gotos, terminals)
    }
}

fn decode_goto(cell: i64) -> Option<StateId> {
    (cell > 0).then_some(cell as StateId)
}

fn next_line<'a, I>(lines: &mut I, what: &str) -> Result<(usize, &'a str), GrammarError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    lines.next().ok_or_else(|| {
        GrammarError::shape(format!("unexpected end of description, expected {what}"))
    })
}

fn parse_count(no: usize, field: &str, what: &str) -> Result<usize, GrammarError> {
    field.parse::<usize>().map_err(|_| {
        GrammarError::at(no, format!("{what} {field:?} is not a nonnegative integer"))
    })
}

fn parse_single(no: usize, line: &str, what: &str) -> Result<usize, GrammarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 1 {
        return Err(GrammarError::at(
            no,
            format!("expected 1 field (the {what}), found {}", fields.len()),
        ));
    }
    parse_count(no, fields[0], what)
}

fn parse_production(no: usize, line: &str) -> Result<Production, GrammarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(GrammarError::at(
            no,
            format!(
                "expected 2 fields (lhs and rhs length), found {}",
                fields.len()
            ),
        ));
    }
    let lhs = parse_count(no, fields[0], "production lhs")?;
    let rhs_len = parse_count(no, fields[1], "production rhs length")?;
    Ok(Production { lhs, rhs_len })
}

fn parse_dims(no: usize, line: &str) -> Result<(usize, usize), GrammarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(GrammarError::at(
            no,
            format!(
                "expected 2 fields (state and terminal counts), found {}",
                fields.len()
            ),
        ));
    }
    let states = parse_count(no, fields[0], "state count")?;
    let terminals = parse_count(no, fields[1], "terminal count")?;
    if states == 0 {
        return Err(GrammarError::at(no, "state count must be at least 1"));
    }
    if terminals == 0 {
        return Err(GrammarError::at(no, "terminal count must be at least 1"));
    }
    // Shift cells share the positive range with the accept mark.
    if states >= ACCEPT_MARK as usize {
        return Err(GrammarError::at(
            no,
            format!("state count {states} collides with the accept mark {ACCEPT_MARK}"),
        ));
    }
    Ok((states, terminals))
}

fn parse_row(no: usize, line: &str) -> Result<Vec<i64>, GrammarError> {
    line.split_whitespace()
        .map(|field| {
            field.parse::<i64>().map_err(|_| {
                GrammarError::at(no, format!("table cell {field:?} is not an integer"))
            })
        })
        .collect()
}

impl fmt::Display for Automaton {
    /// One-line shape summary for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "automaton: {} states, {} terminals, {} nonterminals, {} productions",
            self.state_count(),
            self.terminal_count(),
            self.nonterminal_count(),
            self.productions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // S -> E, E -> id '+' id over id=0 '+'=1 '$'=2, S=3, E=4.
    const TOY: &str = "\
2
3 1
4 3
6 3
3 0 0 1 2
0 0 9999 0 0
0 0 -1 0 0
0 4 0 0 0
5 0 0 0 0
0 0 -2 0 0
";

    #[test]
    fn loads_the_toy_description() {
        let automaton: Automaton = TOY.parse().unwrap();
        assert_eq!(automaton.state_count(), 6);
        assert_eq!(automaton.terminal_count(), 3);
        assert_eq!(automaton.nonterminal_count(), 2);
        assert_eq!(automaton.end_symbol(), 2);
        assert_eq!(
            automaton.productions(),
            &[
                Production { lhs: 3, rhs_len: 1 },
                Production { lhs: 4, rhs_len: 3 },
            ]
        );
        assert_eq!(automaton.action(0, 0), Some(Action::Shift(3)));
        assert_eq!(automaton.action(0, 1), Some(Action::Error));
        assert_eq!(automaton.action(1, 2), Some(Action::Accept));
        assert_eq!(automaton.action(2, 2), Some(Action::Reduce(0)));
        assert_eq!(automaton.action(5, 2), Some(Action::Reduce(1)));
        assert_eq!(automaton.goto(0, 3), Some(1));
        assert_eq!(automaton.goto(0, 4), Some(2));
        assert_eq!(automaton.goto(1, 3), None);
    }

    #[test]
    fn lookups_outside_the_table_are_none() {
        let automaton: Automaton = TOY.parse().unwrap();
        assert_eq!(automaton.action(6, 0), None);
        assert_eq!(automaton.action(0, 3), None);
        assert_eq!(automaton.goto(0, 2), None, "terminal code has no goto column");
        assert_eq!(automaton.goto(0, 5), None);
        assert_eq!(automaton.goto(7, 3), None);
    }

    #[test]
    fn loading_is_deterministic_and_blank_lines_are_skipped() {
        let spaced = TOY.replace("6 3\n", "\n6 3\n\n");
        let padded = format!("\n{spaced}\n\n");
        let a: Automaton = TOY.parse().unwrap();
        let b: Automaton = padded.parse().unwrap();
        let c: Automaton = TOY.parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn decode_covers_the_cell_encoding() {
        assert_eq!(Action::decode(0), Action::Error);
        assert_eq!(Action::decode(ACCEPT_MARK), Action::Accept);
        assert_eq!(Action::decode(7), Action::Shift(7));
        assert_eq!(Action::decode(-1), Action::Reduce(0));
        assert_eq!(Action::decode(-12), Action::Reduce(11));
    }

    #[test]
    fn goto_cells_at_or_below_zero_are_empty() {
        assert_eq!(decode_goto(4), Some(4));
        assert_eq!(decode_goto(0), None);
        assert_eq!(decode_goto(-3), None);
    }

    // A production-count shortfall makes the dims line parse as a
    // production, so the violation surfaces on a later line. Either way
    // nothing loads.
    #[test]
    fn missing_production_line_fails_downstream() {
        let text = "\
2
3 1
6 3
3 0 0 1 2
0 0 9999 0 0
";
        let err = text.parse::<Automaton>().unwrap_err();
        assert!(matches!(err, GrammarError::Line { line: 4, .. }), "{err}");
        assert!(err.to_string().contains("expected 2 fields"));
    }

    #[test]
    fn truncated_description_fails() {
        let err = "2\n3 1\n".parse::<Automaton>().unwrap_err();
        assert!(err.to_string().contains("unexpected end"), "{err}");

        let err = "2\n3 1\n4 3\n6 3\n3 0 0 1 2\n".parse::<Automaton>().unwrap_err();
        assert!(err.to_string().contains("expected a state row"), "{err}");

        let err = "".parse::<Automaton>().unwrap_err();
        assert!(matches!(err, GrammarError::Shape { .. }));
    }

    #[test]
    fn non_integer_fields_fail_with_the_line() {
        let err = "1\n3 x\n1 1\n0\n".parse::<Automaton>().unwrap_err();
        assert!(matches!(err, GrammarError::Line { line: 2, .. }), "{err}");
        assert!(err.to_string().contains("\"x\""));

        let err = "0\n1 1\n0.5\n".parse::<Automaton>().unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn negative_counts_fail() {
        let err = "-1\n".parse::<Automaton>().unwrap_err();
        assert!(err.to_string().contains("not a nonnegative integer"), "{err}");
    }

    #[test]
    fn row_width_must_match_the_first_row() {
        let err = "\
2
3 1
4 3
6 3
3 0 0 1 2
0 0 9999 0
"
        .parse::<Automaton>()
        .unwrap_err();
        assert!(matches!(err, GrammarError::Line { line: 6, .. }), "{err}");
        assert!(err.to_string().contains("expected 5"));
    }

    #[test]
    fn rows_narrower_than_the_terminal_count_fail() {
        let err = "0\n1 3\n1 2\n".parse::<Automaton>().unwrap_err();
        assert!(err.to_string().contains("fewer than the 3 terminals"), "{err}");
    }

    #[test]
    fn trailing_rows_fail() {
        let text = format!("{TOY}0 0 0 0 0\n");
        let err = text.parse::<Automaton>().unwrap_err();
        assert!(matches!(err, GrammarError::Line { line: 11, .. }), "{err}");
        assert!(err.to_string().contains("after the last state row"));
    }

    #[test]
    fn state_counts_colliding_with_the_accept_mark_fail() {
        let err = "0\n9999 1\n".parse::<Automaton>().unwrap_err();
        assert!(err.to_string().contains("accept mark"), "{err}");
    }

    #[test]
    fn try_new_matches_the_loader() {
        let parsed: Automaton = "0\n1 1\n-1 2\n".parse().unwrap();
        let built = Automaton::try_new(
            Vec::new(),
            vec![vec![Action::Reduce(0)]],
            vec![vec![Some(2)]],
            1,
        )
        .unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn try_new_rejects_ragged_tables() {
        let err = Automaton::try_new(
            Vec::new(),
            vec![vec![Action::Error], vec![Action::Error, Action::Error]],
            vec![vec![None], vec![None]],
            1,
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::Shape { .. }), "{err}");

        let err = Automaton::try_new(Vec::new(), vec![vec![Action::Error]], Vec::new(), 1)
            .unwrap_err();
        assert!(err.to_string().contains("goto rows"), "{err}");
    }

    #[test]
    fn from_path_round_trips_through_a_file() {
        let path = std::env::temp_dir().join("tablex-toy-automaton.txt");
        std::fs::write(&path, TOY).unwrap();
        let from_file = Automaton::from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(from_file, TOY.parse().unwrap());
    }

    #[test]
    fn from_path_reports_missing_files() {
        let err = Automaton::from_path("no-such-description.lr").unwrap_err();
        assert!(matches!(err, TablexError::Io(_)));
    }

    #[test]
    fn display_summarizes_the_shape() {
        let automaton: Automaton = TOY.parse().unwrap();
        assert_eq!(
            automaton.to_string(),
            "automaton: 6 states, 3 terminals, 2 nonterminals, 2 productions"
        );
    }
}
