//! Algebraic values attached to tree nodes
//!
//! A [`Function`] is what a reduced node *means*: a number, a single-variable
//! polynomial, a trig or log term, or a fraction of two functions. Pairwise
//! operations (see [`ops`]) either combine two functions into one or report
//! [`Combination::Deferred`] when the operands are not compatible yet, which is
//! not an error: the interpreter leaves such nodes as they are.
//!
//! - [`number`]: formatting, exact fractions, factorials
//! - [`polynomial`]: coefficient-vector polynomials
//! - [`transcendental`]: trig and log terms with numeric or symbolic arguments
//! - [`fraction`]: fractions and their simplification
//! - [`ops`]: add/subtract/multiply/divide/pow dispatch

pub mod fraction;
pub mod number;
pub mod ops;
pub mod polynomial;
pub mod transcendental;

pub use fraction::Fraction;
pub use number::format_number;
pub use polynomial::Polynomial;
pub use transcendental::{Argument, Log, Trig, TrigKind};

use crate::interpreter::errors::ComputeError;
use crate::parser::ast::Precedence;
use crate::parser::lexer::{Token, TokenKind};
use std::fmt;

/// Value carried by a reduced node
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Constant(f64),
    Polynomial(Polynomial),
    Trig(Trig),
    Log(Log),
    Fraction(Fraction),
}

/// Outcome of a pairwise operation that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Combination {
    Combined(Function),
    /// Operands are not structurally compatible yet
    Deferred,
}

impl Combination {
    pub fn combined(self) -> Option<Function> {
        match self {
            Combination::Combined(function) => Some(function),
            Combination::Deferred => None,
        }
    }
}

impl Function {
    /// A number, rejecting infinities and NaN.
    pub fn number(value: f64, operation: &str) -> Result<Function, ComputeError> {
        if value.is_finite() {
            Ok(Function::Constant(value))
        } else {
            Err(ComputeError::NonFinite {
                operation: operation.to_string(),
            })
        }
    }

    pub fn is_constant(&self) -> bool {
        match self {
            Function::Constant(_) => true,
            Function::Polynomial(p) => p.degree() == 0,
            Function::Trig(t) => matches!(t.argument, Argument::Numeric(_)),
            Function::Log(l) => matches!(l.argument, Argument::Numeric(_)),
            Function::Fraction(f) => f.is_constant(),
        }
    }

    /// Numeric value, `None` when the function still depends on a variable.
    pub fn value(&self) -> Option<f64> {
        match self {
            Function::Constant(v) => Some(*v),
            Function::Polynomial(p) if p.degree() == 0 => Some(p.coefficient(0)),
            Function::Polynomial(_) => None,
            Function::Trig(t) => t.value(),
            Function::Log(l) => l.value(),
            Function::Fraction(f) => f.value(),
        }
    }

    pub fn coef(&self) -> f64 {
        match self {
            Function::Constant(v) => *v,
            Function::Polynomial(p) => p.lowest_coefficient(),
            Function::Trig(t) => t.coef,
            Function::Log(l) => l.coef,
            Function::Fraction(f) => f.numerator().coef() / f.denominator().coef(),
        }
    }

    pub fn power(&self) -> f64 {
        match self {
            Function::Polynomial(p) => p.lowest_power() as f64,
            Function::Trig(t) => t.power,
            Function::Log(l) => l.power,
            Function::Constant(_) | Function::Fraction(_) => 0.0,
        }
    }

    /// Apply `op` to every coefficient.
    pub fn map_coefficients(&self, op: &dyn Fn(f64) -> f64) -> Function {
        match self {
            Function::Constant(v) => Function::Constant(op(*v)),
            Function::Polynomial(p) => Function::Polynomial(Polynomial::new(
                p.coefficients().iter().map(|c| op(*c)).collect(),
                p.variable(),
            )),
            Function::Trig(t) => Function::Trig(Trig {
                coef: op(t.coef),
                ..t.clone()
            }),
            Function::Log(l) => Function::Log(Log {
                coef: op(l.coef),
                ..l.clone()
            }),
            Function::Fraction(f) => Function::Fraction(f.map_numerator(op)),
        }
    }

    pub fn scale(&self, factor: f64) -> Function {
        self.map_coefficients(&|c| c * factor)
    }

    /// Divide every coefficient by `divisor`.
    pub fn shrink(&self, divisor: f64) -> Function {
        self.map_coefficients(&|c| c / divisor)
    }

    /// Largest whole number dividing every coefficient.
    pub fn integer_content(&self) -> Option<i128> {
        match self {
            Function::Constant(v) => fraction::content_of(*v),
            Function::Polynomial(p) => p.integer_content(),
            Function::Trig(t) => fraction::content_of(t.coef),
            Function::Log(l) => fraction::content_of(l.coef),
            Function::Fraction(_) => None,
        }
    }

    /// Collapse degenerate shapes: constant polynomials, whole fractions and
    /// trig/log terms with a zero coefficient or power.
    pub fn normalized(self) -> Function {
        match self {
            Function::Polynomial(p) if p.degree() == 0 => Function::Constant(p.coefficient(0)),
            Function::Trig(t) if t.coef == 0.0 => Function::Constant(0.0),
            Function::Trig(t) if t.power == 0.0 => Function::Constant(t.coef),
            Function::Log(l) if l.coef == 0.0 => Function::Constant(0.0),
            Function::Log(l) if l.power == 0.0 => Function::Constant(l.coef),
            Function::Fraction(f) => {
                if f.numerator().to_string() == "0" {
                    Function::Constant(0.0)
                } else if f.denominator().to_string() == "1" {
                    f.numerator().clone().normalized()
                } else {
                    Function::Fraction(f)
                }
            }
            other => other,
        }
    }

    /// Derivative with respect to the polynomial's variable.
    pub fn differentiate(&self) -> Combination {
        match self {
            Function::Polynomial(p) => {
                Combination::Combined(Function::Polynomial(p.derivative()).normalized())
            }
            f if f.is_constant() => Combination::Combined(Function::Constant(0.0)),
            _ => Combination::Deferred,
        }
    }

    pub fn has_numeric_argument(&self) -> bool {
        match self {
            Function::Trig(t) => matches!(t.argument, Argument::Numeric(_)),
            Function::Log(l) => matches!(l.argument, Argument::Numeric(_)),
            _ => false,
        }
    }

    /// Render a trig/log term around an externally rendered argument.
    pub fn render_with_argument(&self, argument: &str) -> String {
        match self {
            Function::Trig(t) => t.render_with(argument),
            Function::Log(l) => l.render_with(argument),
            other => other.to_string(),
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Function::Constant(v) if *v < 0.0 => Precedence::Sum,
            Function::Constant(_) => Precedence::Atom,
            Function::Polynomial(p) => {
                let coef = p.lowest_coefficient();
                if p.term_count() > 1 || coef < 0.0 {
                    Precedence::Sum
                } else if coef != 1.0 {
                    Precedence::Product
                } else if p.lowest_power() > 1 {
                    Precedence::Power
                } else {
                    Precedence::Atom
                }
            }
            Function::Trig(Trig { coef, power, .. }) | Function::Log(Log { coef, power, .. }) => {
                if *coef < 0.0 {
                    Precedence::Sum
                } else if *coef != 1.0 {
                    Precedence::Product
                } else if *power != 1.0 {
                    Precedence::Power
                } else {
                    Precedence::Atom
                }
            }
            Function::Fraction(f) => f.precedence(),
        }
    }

    /// Token standing for this value on a reduced leaf.
    pub fn to_token(&self) -> Token {
        let kind = match self {
            Function::Constant(_) | Function::Fraction(_) => TokenKind::Number,
            Function::Polynomial(_) => TokenKind::Polynomial,
            Function::Trig(_) => TokenKind::Trig,
            Function::Log(_) => TokenKind::Log,
        };
        Token::synthetic(kind, self.to_string())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Constant(v) => f.write_str(&format_number(*v)),
            Function::Polynomial(p) => write!(f, "{}", p),
            Function::Trig(t) => write!(f, "{}", t),
            Function::Log(l) => write!(f, "{}", l),
            Function::Fraction(fr) => write!(f, "{}", fr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_collapses() {
        let p = Function::Polynomial(Polynomial::new(vec![4.0], 'x'));
        assert_eq!(p.normalized(), Function::Constant(4.0));

        let mut t = Trig::new(TrigKind::Sin, Argument::Numeric(10.0));
        t.power = 0.0;
        t.coef = 2.0;
        assert_eq!(Function::Trig(t).normalized(), Function::Constant(2.0));
    }

    #[test]
    fn test_precedence_of_rendered_values() {
        assert_eq!(Function::Constant(-1.0).precedence(), Precedence::Sum);
        assert_eq!(
            Function::Polynomial(Polynomial::monomial(2.0, 1, 'x')).precedence(),
            Precedence::Product
        );
        assert_eq!(
            Function::Polynomial(Polynomial::monomial(1.0, 2, 'x')).precedence(),
            Precedence::Power
        );
        assert_eq!(
            Function::Polynomial(Polynomial::new(vec![1.0, 1.0], 'x')).precedence(),
            Precedence::Sum
        );
    }

    #[test]
    fn test_differentiate() {
        let p = Function::Polynomial(Polynomial::new(vec![1.0, 3.0, 1.0], 'x'));
        assert_eq!(p.differentiate().combined().map(|f| f.to_string()), Some("2x+3".to_string()));
        assert_eq!(
            Function::Constant(7.0).differentiate(),
            Combination::Combined(Function::Constant(0.0))
        );
        let t = Function::Trig(Trig::new(
            TrigKind::Sin,
            Argument::Symbolic(crate::parser::ast::Ast::leaf(Token::synthetic(
                TokenKind::Polynomial,
                "x",
            ))),
        ));
        assert_eq!(t.differentiate(), Combination::Deferred);
    }

    #[test]
    fn test_token_kind_follows_category() {
        assert_eq!(Function::Constant(3.0).to_token().kind, TokenKind::Number);
        assert_eq!(
            Function::Polynomial(Polynomial::monomial(1.0, 1, 'y')).to_token().text,
            "y"
        );
    }
}
