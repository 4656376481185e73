//! Pairwise operations between functions.
//!
//! Every operation returns `Ok(Combined(..))`, `Ok(Deferred)` when the operands
//! are not compatible (different variables, different trig arguments, ...),
//! or an error for genuinely invalid arithmetic.

use super::number::Rational;
use super::{Combination, Fraction, Function};
use crate::interpreter::constants::MAX_POLYNOMIAL_POWER;
use crate::interpreter::errors::ComputeError;
use crate::parser::lexer::TokenKind;

pub type Outcome = Result<Combination, ComputeError>;

/// Binary operators understood by [`Function::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Operation::Add),
            TokenKind::Minus => Some(Operation::Subtract),
            TokenKind::Mul => Some(Operation::Multiply),
            TokenKind::Div => Some(Operation::Divide),
            TokenKind::Power => Some(Operation::Power),
            _ => None,
        }
    }
}

fn combined(function: Function) -> Outcome {
    Ok(Combination::Combined(function.normalized()))
}

fn number(value: f64, operation: &str) -> Outcome {
    Ok(Combination::Combined(Function::number(value, operation)?))
}

/// `other` as a fraction: exact for numbers, `other/1` otherwise.
fn as_fraction(other: &Function) -> Result<Fraction, ComputeError> {
    match other {
        Function::Fraction(f) => Ok(f.clone()),
        f => match f.value().map(|v| (v, Rational::from_f64(v))) {
            Some((_, Some(r))) => {
                Fraction::new(Function::Constant(r.num as f64), Function::Constant(r.den as f64))
            }
            // Too large for an exact numerator
            Some((v, None)) => {
                Fraction::new(Function::number(v, "fraction")?, Function::Constant(1.0))
            }
            None => Fraction::new(f.clone(), Function::Constant(1.0)),
        },
    }
}

impl Function {
    pub fn apply(&self, operation: Operation, other: &Function) -> Outcome {
        match operation {
            Operation::Add => self.add(other),
            Operation::Subtract => self.subtract(other),
            Operation::Multiply => self.multiply(other),
            Operation::Divide => self.divide(other),
            Operation::Power => self.pow(other),
        }
    }

    pub fn add(&self, other: &Function) -> Outcome {
        use Function::*;

        if matches!(self, Fraction(_)) || matches!(other, Fraction(_)) {
            return fraction_sum(self, other);
        }
        if let (Some(a), Some(b)) = (self.value(), other.value()) {
            return number(a + b, "addition");
        }

        match (self, other) {
            (Polynomial(p), Polynomial(q)) => match p.add(q) {
                Some(sum) => combined(Polynomial(sum)),
                None => Ok(Combination::Deferred),
            },
            (Polynomial(p), c) if c.is_constant() => {
                combined(Polynomial(p.add_constant(c.value().unwrap_or(0.0))))
            }
            (c, Polynomial(p)) if c.is_constant() => {
                combined(Polynomial(p.add_constant(c.value().unwrap_or(0.0))))
            }
            (Trig(a), Trig(b)) if a.like(b) && a.power == b.power => {
                let mut sum = a.clone();
                sum.coef += b.coef;
                combined(Trig(sum))
            }
            (Log(a), Log(b)) if a.like(b) && a.power == b.power => {
                let mut sum = a.clone();
                sum.coef += b.coef;
                combined(Log(sum))
            }
            _ => Ok(Combination::Deferred),
        }
    }

    pub fn subtract(&self, other: &Function) -> Outcome {
        self.add(&other.scale(-1.0))
    }

    pub fn multiply(&self, other: &Function) -> Outcome {
        use Function::*;

        if matches!(self, Fraction(_)) || matches!(other, Fraction(_)) {
            return fraction_product(self, other);
        }
        if let (Some(a), Some(b)) = (self.value(), other.value()) {
            return number(a * b, "multiplication");
        }

        match (self, other) {
            (Polynomial(p), Polynomial(q)) => match p.multiply(q) {
                Some(product) => combined(Polynomial(product)),
                None => Ok(Combination::Deferred),
            },
            (Polynomial(_) | Trig(_) | Log(_), c) if c.is_constant() => {
                combined(self.scale(c.value().unwrap_or(1.0)))
            }
            (c, Polynomial(_) | Trig(_) | Log(_)) if c.is_constant() => {
                combined(other.scale(c.value().unwrap_or(1.0)))
            }
            (Trig(a), Trig(b)) if a.like(b) => {
                let mut product = a.clone();
                product.coef *= b.coef;
                product.power += b.power;
                combined(Trig(product))
            }
            (Log(a), Log(b)) if a.like(b) => {
                let mut product = a.clone();
                product.coef *= b.coef;
                product.power += b.power;
                combined(Log(product))
            }
            _ => Ok(Combination::Deferred),
        }
    }

    /// Division always produces a simplified fraction.
    pub fn divide(&self, other: &Function) -> Outcome {
        match (self, other) {
            (_, Function::Fraction(f)) => self.multiply(&Function::Fraction(f.reciprocal()?)),
            (Function::Fraction(_), _) => {
                let reciprocal = Fraction::new(Function::Constant(1.0), other.clone())?;
                self.multiply(&Function::Fraction(reciprocal))
            }
            _ => combined(Fraction::new(self.clone(), other.clone())?.simplify()?),
        }
    }

    pub fn pow(&self, other: &Function) -> Outcome {
        use Function::*;

        let exponent = match other.value() {
            Some(e) => e,
            None => return Ok(Combination::Deferred),
        };

        match self {
            Fraction(f) if f.is_constant() => {
                let value = f.value().unwrap_or(f64::NAN).powf(exponent);
                let fraction = as_fraction(&Function::number(value, "power")?)?;
                combined(fraction.simplify()?)
            }
            base if base.is_constant() => {
                number(base.value().unwrap_or(f64::NAN).powf(exponent), "power")
            }
            Polynomial(p) => {
                if exponent >= 0.0
                    && exponent.fract() == 0.0
                    && exponent <= MAX_POLYNOMIAL_POWER as f64
                {
                    combined(Polynomial(p.pow(exponent as u32)))
                } else {
                    Ok(Combination::Deferred)
                }
            }
            Trig(t) => {
                let mut raised = t.clone();
                raised.coef = t.coef.powf(exponent);
                raised.power *= exponent;
                combined(Trig(raised))
            }
            Log(l) => {
                let mut raised = l.clone();
                raised.coef = l.coef.powf(exponent);
                raised.power *= exponent;
                combined(Log(raised))
            }
            _ => Ok(Combination::Deferred),
        }
    }
}

/// `a/b + c/d = (a*d + c*b) / (b*d)`
fn fraction_sum(left: &Function, right: &Function) -> Outcome {
    let (l, r) = (as_fraction(left)?, as_fraction(right)?);

    let Some(ad) = l.numerator().multiply(r.denominator())?.combined() else {
        return Ok(Combination::Deferred);
    };
    let Some(cb) = r.numerator().multiply(l.denominator())?.combined() else {
        return Ok(Combination::Deferred);
    };
    let Some(numerator) = ad.add(&cb)?.combined() else {
        return Ok(Combination::Deferred);
    };
    let Some(denominator) = l.denominator().multiply(r.denominator())?.combined() else {
        return Ok(Combination::Deferred);
    };
    combined(Fraction::new(numerator, denominator)?.simplify()?)
}

/// `a/b * c/d = (a*c) / (b*d)`
fn fraction_product(left: &Function, right: &Function) -> Outcome {
    let (l, r) = (as_fraction(left)?, as_fraction(right)?);

    let Some(numerator) = l.numerator().multiply(r.numerator())?.combined() else {
        return Ok(Combination::Deferred);
    };
    let Some(denominator) = l.denominator().multiply(r.denominator())?.combined() else {
        return Ok(Combination::Deferred);
    };
    combined(Fraction::new(numerator, denominator)?.simplify()?)
}
