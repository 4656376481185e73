//! Fractions of two functions, kept in lowest terms where possible.

use super::number::{as_integer, Rational};
use super::Function;
use crate::interpreter::errors::ComputeError;
use crate::parser::ast::Precedence;
use std::fmt;

/// `numerator / denominator`
///
/// The denominator never renders as `0`. When both sides are numbers the sign
/// lives on the numerator.
#[derive(Debug, Clone, PartialEq)]
pub struct Fraction {
    numerator: Box<Function>,
    denominator: Box<Function>,
}

impl Fraction {
    pub fn new(numerator: Function, denominator: Function) -> Result<Self, ComputeError> {
        if denominator.to_string() == "0" {
            return Err(ComputeError::ZeroDenominator);
        }
        let (numerator, denominator) = match (numerator.value(), denominator.value()) {
            (Some(_), Some(d)) if d < 0.0 => (numerator.scale(-1.0), denominator.scale(-1.0)),
            _ => (numerator, denominator),
        };
        Ok(Fraction {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        })
    }

    pub fn numerator(&self) -> &Function {
        &self.numerator
    }

    pub fn denominator(&self) -> &Function {
        &self.denominator
    }

    pub fn is_constant(&self) -> bool {
        self.numerator.is_constant() && self.denominator.is_constant()
    }

    pub fn value(&self) -> Option<f64> {
        Some(self.numerator.value()? / self.denominator.value()?)
    }

    pub fn reciprocal(&self) -> Result<Fraction, ComputeError> {
        Fraction::new((*self.denominator).clone(), (*self.numerator).clone())
    }

    /// Apply `op` to the numerator's coefficients.
    pub fn map_numerator(&self, op: &dyn Fn(f64) -> f64) -> Fraction {
        Fraction {
            numerator: Box::new(self.numerator.map_coefficients(op)),
            denominator: self.denominator.clone(),
        }
    }

    /// Reduce to lowest terms and collapse to a simpler function when the
    /// denominator disappears.
    pub fn simplify(self) -> Result<Function, ComputeError> {
        let numerator = self.numerator.normalized();
        let denominator = self.denominator.normalized();

        if let (Some(n), Some(d)) = (numerator.value(), denominator.value()) {
            return reduce_numbers(n, d);
        }

        let (numerator, denominator) = cancel_content(numerator, denominator);
        let (numerator, denominator) = cancel_powers(numerator, denominator);
        let (numerator, denominator) = (numerator.normalized(), denominator.normalized());

        if let (Some(n), Some(d)) = (numerator.value(), denominator.value()) {
            return reduce_numbers(n, d);
        }
        Ok(Function::Fraction(Fraction::new(numerator, denominator)?).normalized())
    }

    pub fn precedence(&self) -> Precedence {
        if self.is_whole() {
            return self.numerator.precedence();
        }
        match *self.numerator {
            Function::Constant(n) if n < 0.0 => Precedence::Sum,
            _ => Precedence::Product,
        }
    }

    /// Renders as its numerator alone.
    fn is_whole(&self) -> bool {
        self.denominator.to_string() == "1" || self.numerator.to_string() == "0"
    }
}

/// Exact `n/d` for two numbers.
fn reduce_numbers(n: f64, d: f64) -> Result<Function, ComputeError> {
    if d == 0.0 {
        return Err(ComputeError::ZeroDenominator);
    }
    let exact = Rational::from_f64(n)
        .zip(Rational::from_f64(d))
        .and_then(|(n, d)| n.checked_div(d));
    match exact {
        Some(r) if r.den == 1 => Ok(Function::Constant(r.num as f64)),
        Some(r) => Ok(Function::Fraction(Fraction::new(
            Function::Constant(r.num as f64),
            Function::Constant(r.den as f64),
        )?)),
        None => Function::number(n / d, "division"),
    }
}

/// Divide out the largest whole number shared by both sides.
fn cancel_content(numerator: Function, denominator: Function) -> (Function, Function) {
    match (numerator.integer_content(), denominator.integer_content()) {
        (Some(a), Some(b)) => {
            let g = num_integer::gcd(a, b);
            if g > 1 {
                let divisor = g as f64;
                (numerator.shrink(divisor), denominator.shrink(divisor))
            } else {
                (numerator, denominator)
            }
        }
        _ => (numerator, denominator),
    }
}

/// Cancel the smallest shared power of a common variable or function term.
fn cancel_powers(numerator: Function, denominator: Function) -> (Function, Function) {
    match (numerator, denominator) {
        (Function::Polynomial(p), Function::Polynomial(q)) if p.variable() == q.variable() => {
            let shared = p.lowest_power().min(q.lowest_power());
            (
                Function::Polynomial(p.shift_down(shared)),
                Function::Polynomial(q.shift_down(shared)),
            )
        }
        (Function::Trig(mut a), Function::Trig(mut b)) if a.like(&b) => {
            let shared = a.power.min(b.power);
            a.power -= shared;
            b.power -= shared;
            (Function::Trig(a), Function::Trig(b))
        }
        (Function::Log(mut a), Function::Log(mut b)) if a.like(&b) => {
            let shared = a.power.min(b.power);
            a.power -= shared;
            b.power -= shared;
            (Function::Log(a), Function::Log(b))
        }
        other => other,
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numerator = self.numerator.to_string();
        if self.is_whole() {
            return f.write_str(&numerator);
        }
        let numerator = if self.numerator.precedence() < Precedence::Product
            && !matches!(*self.numerator, Function::Constant(_))
        {
            format!("({})", numerator)
        } else {
            numerator
        };
        let denominator = if self.denominator.precedence() < Precedence::Power {
            format!("({})", self.denominator)
        } else {
            self.denominator.to_string()
        };
        write!(f, "{}/{}", numerator, denominator)
    }
}

/// Whole numbers of a function's integer content, used by the GCF search.
pub(crate) fn content_of(value: f64) -> Option<i128> {
    as_integer(value).map(i128::abs).filter(|v| *v != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Polynomial;

    fn constant_fraction(n: f64, d: f64) -> Fraction {
        Fraction::new(Function::Constant(n), Function::Constant(d)).expect("nonzero")
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert_eq!(
            Fraction::new(Function::Constant(1.0), Function::Constant(0.0)),
            Err(ComputeError::ZeroDenominator)
        );
    }

    #[test]
    fn test_sign_moves_to_numerator() {
        let f = constant_fraction(1.0, -2.0);
        assert_eq!(f.to_string(), "-1/2");
    }

    #[test]
    fn test_simplify_numbers() {
        assert_eq!(
            constant_fraction(6.0, 2.0).simplify(),
            Ok(Function::Constant(3.0))
        );
        assert_eq!(
            constant_fraction(2.0, 4.0)
                .simplify()
                .expect("simplifies")
                .to_string(),
            "1/2"
        );
        assert_eq!(
            constant_fraction(0.5, 3.0)
                .simplify()
                .expect("simplifies")
                .to_string(),
            "1/6"
        );
    }

    #[test]
    fn test_simplify_huge_numbers_divides_floats() {
        let quotient = constant_fraction(1e20, 3.0).simplify().expect("finite");
        assert_eq!(quotient, Function::Constant(1e20 / 3.0));
    }

    #[test]
    fn test_simplify_polynomials() {
        let numerator = Function::Polynomial(Polynomial::monomial(2.0, 2, 'x'));
        let denominator = Function::Polynomial(Polynomial::monomial(4.0, 1, 'x'));
        let result = Fraction::new(numerator, denominator)
            .expect("nonzero")
            .simplify()
            .expect("simplifies");
        assert_eq!(result.to_string(), "x/2");
    }

    #[test]
    fn test_simplify_collapses_to_polynomial() {
        let numerator = Function::Polynomial(Polynomial::monomial(6.0, 2, 'x'));
        let result = Fraction::new(numerator, Function::Constant(3.0))
            .expect("nonzero")
            .simplify()
            .expect("simplifies");
        assert_eq!(result, Function::Polynomial(Polynomial::monomial(2.0, 2, 'x')));
    }
}
