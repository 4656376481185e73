//! # Introduction
//!
//! calctty is a step-by-step symbolic calculator. Expressions and equations
//! are reduced one operator at a time and every distinct intermediate
//! rendering is kept, so a result can be replayed in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Text → Lexer → Parser → AST → Interpreter → Steps → TUI
//! ```
//!
//! 1. [`parser`]: tokenises the input and builds an arena AST.
//! 2. [`algebra`]: the values attached to nodes (constants, polynomials,
//!    trig and log terms, exact fractions) and how they combine.
//! 3. [`interpreter`]: reduces the tree step by step, isolates single
//!    variables and solves linear systems.
//! 4. [`matrix`]: dense matrices, determinants, inverses and RREF.
//! 5. [`sets`]: union, intersection and difference of number sets.
//! 6. [`history`]: the session's computed requests.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let mut ast = calctty::parse("2x+4=10").expect("valid input");
//! let evaluation = calctty::evaluate(&mut ast);
//! assert_eq!(evaluation.steps.last().map(String::as_str), Some("x = 3"));
//! assert_eq!(evaluation.value, Ok(3.0));
//! ```

pub mod algebra;
pub mod history;
pub mod interpreter;
pub mod matrix;
pub mod parser;
pub mod sets;
pub mod ui;

pub use interpreter::engine::{evaluate, Evaluation};
pub use interpreter::errors::{ComputeError, Error};
pub use interpreter::linear::solve_linear_system;
pub use matrix::{matrix_op, Matrix, MatrixRequest};
pub use parser::parse;
pub use sets::{format_set, set_op, SetOp};
