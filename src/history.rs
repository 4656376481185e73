// Session history of computed requests

use crate::algebra::format_number;
use crate::interpreter::constants::DEFAULT_HISTORY_LIMIT;
use crate::interpreter::engine::evaluate;
use crate::interpreter::errors::{ComputeError, Error};
use crate::interpreter::linear::solve_linear_system;
use crate::matrix::{matrix_op, MatrixRequest};
use crate::parser::parse;
use crate::sets::{format_set, SetRequest};
use std::collections::VecDeque;
use std::fmt;

/// Kind of request an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Expression,
    System,
    Matrix,
    Set,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Expression, Mode::System, Mode::Matrix, Mode::Set];

    /// The mode after this one, wrapping around
    pub fn next(self) -> Mode {
        match self {
            Mode::Expression => Mode::System,
            Mode::System => Mode::Matrix,
            Mode::Matrix => Mode::Set,
            Mode::Set => Mode::Expression,
        }
    }

    pub fn previous(self) -> Mode {
        match self {
            Mode::Expression => Mode::Set,
            Mode::System => Mode::Expression,
            Mode::Matrix => Mode::System,
            Mode::Set => Mode::Matrix,
        }
    }

    /// Example input shown in an empty input box
    pub fn placeholder(self) -> &'static str {
        match self {
            Mode::Expression => "2x+4=10",
            Mode::System => "x+y=3; x-y=1",
            Mode::Matrix => "2*I[1,2;3,4] + T[1,0;0,1]",
            Mode::Set => "{1,2,3} union {2,3,4}",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Expression => "Expression",
            Mode::System => "System",
            Mode::Matrix => "Matrix",
            Mode::Set => "Set",
        })
    }
}

/// One computed request with everything needed to replay it
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub mode: Mode,
    pub input: String,
    pub steps: Vec<String>,
    /// Final answer text, or the error that stopped the computation
    pub outcome: Result<String, Error>,
}

impl HistoryEntry {
    /// Run `input` as a request of the given mode.
    ///
    /// Expressions keep their symbolic last step as the answer when it has no
    /// numeric value. System input holds `;`-separated equations.
    pub fn compute(mode: Mode, input: &str) -> Self {
        let input = input.trim().to_string();
        log::debug!("computing {} request '{}'", mode, input);
        let (steps, outcome) = match mode {
            Mode::Expression => compute_expression(&input),
            Mode::System => {
                let equations: Vec<&str> = input
                    .split(|c: char| c == ';' || c == '\n')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .collect();
                match solve_linear_system(&equations) {
                    Ok(lines) => {
                        let answer = lines.join("; ");
                        (lines, Ok(answer))
                    }
                    Err(err) => (Vec::new(), Err(err)),
                }
            }
            Mode::Matrix => match input
                .parse::<MatrixRequest>()
                .and_then(|request| matrix_op(&request))
            {
                Ok(result) => {
                    let answer = result.to_string();
                    (vec![input.clone(), answer.clone()], Ok(answer))
                }
                Err(err) => (Vec::new(), Err(err.into())),
            },
            Mode::Set => match input.parse::<SetRequest>() {
                Ok(request) => {
                    let answer = format!("{{{}}}", format_set(&request.apply()));
                    (vec![input.clone(), answer.clone()], Ok(answer))
                }
                Err(err) => (Vec::new(), Err(err.into())),
            },
        };
        HistoryEntry {
            mode,
            input,
            steps,
            outcome,
        }
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }

    /// One-line summary for list views
    pub fn summary(&self) -> String {
        match &self.outcome {
            Ok(answer) => format!("{} => {}", self.input, answer),
            Err(err) => format!("{} => {}", self.input, err.category()),
        }
    }
}

fn compute_expression(input: &str) -> (Vec<String>, Result<String, Error>) {
    let mut ast = match parse(input) {
        Ok(ast) => ast,
        Err(err) => return (Vec::new(), Err(err.into())),
    };
    let evaluation = evaluate(&mut ast);
    let outcome = match evaluation.value {
        Ok(value) => Ok(format_number(value)),
        Err(Error::Compute(ComputeError::NonNumericResult { line })) => Ok(line),
        Err(err) => Err(err),
    };
    (evaluation.steps, outcome)
}

/// Bounded history; the oldest entry is evicted once the limit is reached
#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        History {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Add an entry, evicting the oldest when full
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.limit {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("history full, evicting '{}'", evicted.input);
            }
        }
        self.entries.push_back(entry);
    }

    /// Get an entry by index, oldest first
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(input: &str) -> HistoryEntry {
        HistoryEntry {
            mode: Mode::Expression,
            input: input.to_string(),
            steps: vec![format!("Expression: {}", input)],
            outcome: Ok(input.to_string()),
        }
    }

    #[test]
    fn test_oldest_entry_is_evicted() {
        let mut history = History::new(2);
        history.push(entry("1"));
        history.push(entry("2"));
        history.push(entry("3"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).map(|e| e.input.as_str()), Some("2"));
        assert_eq!(history.latest().map(|e| e.input.as_str()), Some("3"));
    }

    #[test]
    fn test_zero_limit_keeps_one_entry() {
        let mut history = History::new(0);
        history.push(entry("1"));
        history.push(entry("2"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_summary() {
        let mut e = entry("1+1");
        e.outcome = Ok("2".to_string());
        assert_eq!(e.summary(), "1+1 => 2");
        e.outcome = Err(ComputeError::ZeroDenominator.into());
        assert!(e.is_error());
        assert_eq!(e.summary(), "1+1 => Compute error");
    }

    #[test]
    fn test_compute_each_mode() {
        let e = HistoryEntry::compute(Mode::Expression, "2+3*4");
        assert_eq!(e.outcome, Ok("14".to_string()));
        assert_eq!(e.steps.first().map(String::as_str), Some("Expression: 2+3*4"));

        let e = HistoryEntry::compute(Mode::Expression, "(x+1)^2");
        assert_eq!(e.outcome, Ok("x^2+2x+1".to_string()));

        let e = HistoryEntry::compute(Mode::System, "x+y=3; x-y=1");
        assert_eq!(e.steps, vec!["x = 2", "y = 1"]);

        let e = HistoryEntry::compute(Mode::Matrix, "D[1,2;3,4]");
        assert_eq!(e.outcome, Ok("[-2]".to_string()));

        let e = HistoryEntry::compute(Mode::Set, "{1,2,3} n {2,3,4}");
        assert_eq!(e.outcome, Ok("{2, 3}".to_string()));
    }

    #[test]
    fn test_compute_errors() {
        assert!(HistoryEntry::compute(Mode::Expression, "2+").is_error());
        assert!(HistoryEntry::compute(Mode::System, "").is_error());
        assert!(HistoryEntry::compute(Mode::Matrix, "I[1,2;2,4]").is_error());
        assert!(HistoryEntry::compute(Mode::Set, "{1} xor {2}").is_error());
    }

    #[test]
    fn test_mode_cycle() {
        for mode in Mode::ALL {
            assert_eq!(mode.next().previous(), mode);
        }
        assert_eq!(Mode::Set.next(), Mode::Expression);
    }
}
