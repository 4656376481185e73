//! Error types for the computation layer
//!
//! This module defines [`ComputeError`], which represents every failure that can
//! occur after input has been parsed successfully (reduction, matrix algebra,
//! linear systems, sets), and [`Error`], the single categorized error returned
//! at the library boundary.
//!
//! All errors are fatal for the call that raised them: nothing is retried, and
//! the caller decides how to present the message.

use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use thiserror::Error;

/// Failures raised while computing a result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    /// Operands of a matrix operation have incompatible shapes
    #[error("Cannot {operation} a {left_rows}x{left_cols} matrix and a {right_rows}x{right_cols} matrix")]
    DimensionMismatch {
        operation: String,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Operation requires a square matrix
    #[error("{operation} requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        operation: String,
        rows: usize,
        cols: usize,
    },

    /// Operation requires a larger matrix
    #[error("{operation} requires at least a {minimum}x{minimum} matrix, got {size}x{size}")]
    MatrixTooSmall {
        operation: String,
        size: usize,
        minimum: usize,
    },

    /// 1-based entry position outside the matrix
    #[error("Entry ({row}, {col}) is outside a {size}x{size} matrix")]
    IndexOutOfRange { row: usize, col: usize, size: usize },

    /// Inverse of a matrix whose determinant is zero
    #[error("Matrix is singular (determinant is 0), no inverse exists")]
    SingularMatrix,

    /// Factorial of a negative or fractional number
    #[error("Factorial is only defined for whole numbers >= 0, got {value}")]
    FactorialDomain { value: f64 },

    /// Factorial argument above the supported limit
    #[error("Factorial of {value} is too large (limit is {limit})")]
    FactorialTooLarge { value: f64, limit: u64 },

    /// Fraction whose denominator is zero
    #[error("Denominator cannot be 0")]
    ZeroDenominator,

    /// Arithmetic produced infinity or NaN
    #[error("Result of {operation} is undefined")]
    NonFinite { operation: String },

    /// Equation term that does not fit a linear system
    #[error("'{term}' is not a linear term")]
    NonLinear { term: String },

    /// Matrix combined with a plain number in an unsupported way
    #[error("Cannot {operation} matrix to number")]
    MixedOperands { operation: String },

    /// The final step is not a number
    #[error("'{line}' does not evaluate to a number")]
    NonNumericResult { line: String },

    /// Linear system without any equation
    #[error("No equations were given")]
    EmptySystem,

    /// Set operator name not recognized
    #[error("Unknown set operator '{name}'")]
    UnknownSetOperator { name: String },

    /// Matrix operator name not recognized
    #[error("Unknown matrix operator '{name}'")]
    UnknownMatrixOperator { name: String },

    /// Matrix or set literal that could not be read
    #[error("Malformed {kind} '{text}'")]
    MalformedLiteral { kind: String, text: String },
}

/// Any error the library can return
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compute(#[from] ComputeError),
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Parse(ParseError::Lex(err))
    }
}

impl Error {
    /// Short category label for display.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Parse(ParseError::Lex(_)) => "Lex error",
            Error::Parse(_) => "Parse error",
            Error::Compute(_) => "Compute error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ComputeError::ZeroDenominator.to_string(),
            "Denominator cannot be 0"
        );
        assert_eq!(
            ComputeError::MixedOperands {
                operation: "add".to_string()
            }
            .to_string(),
            "Cannot add matrix to number"
        );
    }

    #[test]
    fn test_categories() {
        let lex: Error = LexError::InvalidCharacter {
            character: '#',
            position: 0,
        }
        .into();
        assert_eq!(lex.category(), "Lex error");
        assert_eq!(
            Error::from(ParseError::UnclosedBracket).category(),
            "Parse error"
        );
        assert_eq!(
            Error::from(ComputeError::SingularMatrix).category(),
            "Compute error"
        );
    }
}
