//! Numeric helpers shared by the function algebra: display formatting, exact
//! rational approximation and factorials.

use crate::interpreter::constants::{FACTORIAL_LIMIT, FRACTION_PRECISION};
use crate::interpreter::errors::ComputeError;

/// Six-decimal fixed formatting with trailing zeros and the dot trimmed.
pub fn format_number(value: f64) -> String {
    let mut text = format!("{:.6}", value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// An exact fraction `num/den` with `den > 0`, always in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: i128,
    pub den: i128,
}

impl Rational {
    pub fn new(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = num_integer::gcd(num, den);
        let (mut num, mut den) = if g == 0 { (num, den) } else { (num / g, den / g) };
        if den < 0 {
            num = -num;
            den = -den;
        }
        Some(Rational { num, den })
    }

    /// Approximate `value` with a denominator of at most the fixed precision.
    ///
    /// `None` when the value is not finite or too large for an exact `i128`
    /// numerator; callers then work with the plain float.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut whole = value.floor();
        let mut part = ((value - whole) * FRACTION_PRECISION).round() as i128;
        let precision = FRACTION_PRECISION as i128;
        if part == precision {
            whole += 1.0;
            part = 0;
        }
        if whole.abs() >= 1e18 {
            return None;
        }
        let g = num_integer::gcd(part, precision);
        let (part, den) = (part / g, precision / g);
        Some(Rational {
            num: whole as i128 * den + part,
            den,
        })
    }

    pub fn checked_div(self, other: Rational) -> Option<Rational> {
        let num = self.num.checked_mul(other.den)?;
        let den = self.den.checked_mul(other.num)?;
        Rational::new(num, den)
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// `n!` for a whole `n` in `0..=12`.
pub fn factorial(n: f64) -> Result<f64, ComputeError> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(ComputeError::FactorialDomain { value: n });
    }
    if n > FACTORIAL_LIMIT as f64 {
        return Err(ComputeError::FactorialTooLarge {
            value: n,
            limit: FACTORIAL_LIMIT,
        });
    }
    Ok((1..=n as u64).product::<u64>() as f64)
}

/// Whole-number check used before integer GCD searches.
pub fn as_integer(value: f64) -> Option<i128> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e18 {
        Some(value as i128)
    } else {
        None
    }
}
