//! Calculator reduction engine
//!
//! This module provides the computation logic on top of the parsed tree:
//! - [`engine`]: Step-by-step reduction of expressions and equations
//! - [`equation`]: One-rewrite-per-step isolation of a single variable
//! - [`linear`]: Coefficient extraction and solving of linear systems
//! - [`errors`]: Computation error types
//! - [`constants`]: Limits and fixed messages
//!
//! # Execution Model
//!
//! The engine repeatedly picks the deepest pending operator, reduces it and
//! records the rendered tree whenever it changes. The recorded renderings
//! form the step list shown to the user.

pub mod constants;
pub mod engine;
pub mod equation;
pub mod errors;
pub mod linear;
