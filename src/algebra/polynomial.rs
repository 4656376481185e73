//! Single-variable polynomials stored as coefficient vectors.

use super::number::format_number;
use std::fmt;

/// `coefficients[i]` is the coefficient of `variable^i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    variable: char,
}

impl Polynomial {
    /// Build a polynomial, trimming trailing zero coefficients.
    pub fn new(mut coefficients: Vec<f64>, variable: char) -> Self {
        while coefficients.len() > 1 && coefficients.last() == Some(&0.0) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            coefficients.push(0.0);
        }
        Polynomial {
            coefficients,
            variable,
        }
    }

    /// `coef * variable^power`
    pub fn monomial(coef: f64, power: usize, variable: char) -> Self {
        let mut coefficients = vec![0.0; power + 1];
        coefficients[power] = coef;
        Polynomial::new(coefficients, variable)
    }

    pub fn variable(&self) -> char {
        self.variable
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficient(&self, power: usize) -> f64 {
        self.coefficients.get(power).copied().unwrap_or(0.0)
    }

    /// Exponent of the lowest nonzero term.
    pub fn lowest_power(&self) -> usize {
        self.coefficients
            .iter()
            .position(|c| *c != 0.0)
            .unwrap_or(0)
    }

    /// Coefficient of the lowest nonzero term.
    pub fn lowest_coefficient(&self) -> f64 {
        self.coefficient(self.lowest_power())
    }

    pub fn term_count(&self) -> usize {
        self.coefficients.iter().filter(|c| **c != 0.0).count()
    }

    pub fn add(&self, other: &Polynomial) -> Option<Polynomial> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Polynomial) -> Option<Polynomial> {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with(&self, other: &Polynomial, op: impl Fn(f64, f64) -> f64) -> Option<Polynomial> {
        if self.variable != other.variable {
            return None;
        }
        let len = self.coefficients.len().max(other.coefficients.len());
        let coefficients = (0..len)
            .map(|i| op(self.coefficient(i), other.coefficient(i)))
            .collect();
        Some(Polynomial::new(coefficients, self.variable))
    }

    pub fn multiply(&self, other: &Polynomial) -> Option<Polynomial> {
        if self.variable != other.variable {
            return None;
        }
        let mut coefficients = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Some(Polynomial::new(coefficients, self.variable))
    }

    pub fn add_constant(&self, value: f64) -> Polynomial {
        let mut coefficients = self.coefficients.clone();
        coefficients[0] += value;
        Polynomial::new(coefficients, self.variable)
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(
            self.coefficients.iter().map(|c| c * factor).collect(),
            self.variable,
        )
    }

    pub fn pow(&self, exponent: u32) -> Polynomial {
        let mut result = Polynomial::new(vec![1.0], self.variable);
        for _ in 0..exponent {
            // Same variable on both sides, so this always combines.
            if let Some(next) = result.multiply(self) {
                result = next;
            }
        }
        result
    }

    /// Divide by `variable^by`; terms below that power must already be zero.
    pub fn shift_down(&self, by: usize) -> Polynomial {
        Polynomial::new(
            self.coefficients.iter().skip(by).copied().collect(),
            self.variable,
        )
    }

    pub fn derivative(&self) -> Polynomial {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| c * power as f64)
            .collect();
        Polynomial::new(coefficients, self.variable)
    }

    /// Largest whole number dividing every coefficient, if they are all whole.
    pub fn integer_content(&self) -> Option<i128> {
        let mut content: i128 = 0;
        for c in self.coefficients.iter().filter(|c| **c != 0.0) {
            let whole = super::number::as_integer(*c)?;
            content = num_integer::gcd(content, whole);
        }
        (content != 0).then_some(content)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for power in (0..self.coefficients.len()).rev() {
            let coef = self.coefficients[power];
            if coef == 0.0 {
                continue;
            }
            if first {
                if coef < 0.0 {
                    f.write_str("-")?;
                }
            } else {
                f.write_str(if coef < 0.0 { "-" } else { "+" })?;
            }
            first = false;

            let magnitude = coef.abs();
            if power == 0 {
                f.write_str(&format_number(magnitude))?;
                continue;
            }
            if magnitude != 1.0 {
                f.write_str(&format_number(magnitude))?;
            }
            write!(f, "{}", self.variable)?;
            if power > 1 {
                write!(f, "^{}", power)?;
            }
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coefficients: &[f64]) -> Polynomial {
        Polynomial::new(coefficients.to_vec(), 'x')
    }

    #[test]
    fn test_display() {
        assert_eq!(poly(&[-3.0, 1.0, 2.0]).to_string(), "2x^2+x-3");
        assert_eq!(poly(&[0.0, -1.0]).to_string(), "-x");
        assert_eq!(poly(&[4.0, 0.0, 0.0]).to_string(), "4");
        assert_eq!(poly(&[0.0]).to_string(), "0");
        assert_eq!(poly(&[0.0, 0.5]).to_string(), "0.5x");
    }

    #[test]
    fn test_degree_is_trimmed() {
        let p = poly(&[1.0, 1.0]).subtract(&poly(&[0.0, 1.0])).expect("same variable");
        assert_eq!(p.degree(), 0);
        assert_eq!(p.coefficient(0), 1.0);
    }

    #[test]
    fn test_different_variables_do_not_combine() {
        let x = Polynomial::monomial(1.0, 1, 'x');
        let y = Polynomial::monomial(1.0, 1, 'y');
        assert!(x.add(&y).is_none());
        assert!(x.multiply(&y).is_none());
    }

    #[test]
    fn test_multiply_and_pow() {
        let p = poly(&[1.0, 1.0]);
        assert_eq!(p.pow(2), poly(&[1.0, 2.0, 1.0]));
        assert_eq!(p.pow(0), poly(&[1.0]));
        assert_eq!(
            p.multiply(&poly(&[-1.0, 1.0])).expect("same variable"),
            poly(&[-1.0, 0.0, 1.0])
        );
    }

    #[test]
    fn test_derivative() {
        assert_eq!(poly(&[1.0, 1.0, 2.0]).derivative(), poly(&[1.0, 4.0]));
        assert_eq!(poly(&[5.0]).derivative(), poly(&[0.0]));
    }

    #[test]
    fn test_lowest_term_and_content() {
        let p = poly(&[0.0, 4.0, 6.0]);
        assert_eq!(p.lowest_power(), 1);
        assert_eq!(p.lowest_coefficient(), 4.0);
        assert_eq!(p.integer_content(), Some(2));
        assert_eq!(poly(&[0.5, 1.0]).integer_content(), None);
        assert_eq!(p.shift_down(1), poly(&[4.0, 6.0]));
    }
}
