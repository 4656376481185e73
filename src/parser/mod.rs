//! Calculator input parser
//!
//! This module transforms input text into an arena Abstract Syntax Tree:
//! - [`lexer`]: Tokenization and implicit-product normalization (text → tokens)
//! - [`parse`]: Tree climbing (tokens → AST)
//! - [`ast`]: Node arena, rendering and structural equality
//!
//! # Input Grammar
//!
//! - Numbers with at most one decimal point, `n!` factorials
//! - Single lowercase letters as variables; `3x^2` is an implicit product
//! - Operators `= + - * / ^` and parentheses
//! - Functions `sin cos tan log sqrt diff`, each followed by a bracketed argument
//!
//! # Parser Implementation
//!
//! Hand-written tree climbing over a fixed precedence ranking. No external
//! parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;

pub use parse::parse;
