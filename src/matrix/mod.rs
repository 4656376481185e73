//! Dense `f64` matrices
//!
//! - [`Matrix`]: storage, element-wise algebra, determinant, cofactors, inverse
//! - [`rref`]: row operations, reduced row-echelon form, general solutions of
//!   augmented systems
//! - [`request`]: the matrix tab's request format and [`matrix_op`]
//!
//! Shapes are checked per operation; a matrix itself may be any
//! `rows x cols`.

pub mod request;
pub mod rref;

pub use request::{matrix_op, BinaryOp, MatrixRequest, Operand, UnaryOp};

use crate::algebra::format_number;
use crate::interpreter::errors::ComputeError;
use std::fmt;
use std::str::FromStr;

/// Row-major dense matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Matrix {
    /// Build from nested rows. Rows of unequal length are rejected.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ComputeError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return Err(ComputeError::MalformedLiteral {
                kind: "matrix".to_string(),
                text: format!("{:?}", rows),
            });
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// A 1x1 matrix holding `value`.
    pub fn scalar(value: f64) -> Self {
        Matrix {
            rows: 1,
            cols: 1,
            data: vec![value],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    fn require_square(&self, operation: &str) -> Result<(), ComputeError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(ComputeError::NotSquare {
                operation: operation.to_string(),
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn mismatch(&self, other: &Matrix, operation: &str) -> ComputeError {
        ComputeError::DimensionMismatch {
            operation: operation.to_string(),
            left_rows: self.rows,
            left_cols: self.cols,
            right_rows: other.rows,
            right_cols: other.cols,
        }
    }

    fn zip_with(
        &self,
        other: &Matrix,
        operation: &str,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Matrix, ComputeError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(self.mismatch(other, operation));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| op(*a, *b))
                .collect(),
        })
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix, ComputeError> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix, ComputeError> {
        self.zip_with(other, "subtract", |a, b| a - b)
    }

    /// `self (m x n) * other (n x p)`
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, ComputeError> {
        if self.cols != other.rows {
            return Err(self.mismatch(other, "multiply"));
        }
        let mut result = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let sum: f64 = (0..self.cols).map(|k| self.get(i, k) * other.get(k, j)).sum();
                result.set(i, j, sum);
            }
        }
        Ok(result)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }

    /// Transpose of a square matrix.
    pub fn transpose(&self) -> Result<Matrix, ComputeError> {
        self.require_square("transpose")?;
        let mut result = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.set(j, i, self.get(i, j));
            }
        }
        Ok(result)
    }

    /// Remove row `row` and column `col` (0-based).
    fn minor(&self, row: usize, col: usize) -> Matrix {
        let mut data = Vec::with_capacity((self.rows - 1) * (self.cols - 1));
        for r in (0..self.rows).filter(|r| *r != row) {
            for c in (0..self.cols).filter(|c| *c != col) {
                data.push(self.get(r, c));
            }
        }
        Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            data,
        }
    }

    /// Cofactor of entry (`row`, `col`), both 1-based.
    pub fn cofactor(&self, row: usize, col: usize) -> Result<f64, ComputeError> {
        self.require_square("cofactor")?;
        if self.rows < 3 {
            return Err(ComputeError::MatrixTooSmall {
                operation: "cofactor".to_string(),
                size: self.rows,
                minimum: 3,
            });
        }
        let size = self.rows;
        if !(1..=size).contains(&row) || !(1..=size).contains(&col) {
            return Err(ComputeError::IndexOutOfRange { row, col, size });
        }
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        Ok(sign * self.minor(row - 1, col - 1).determinant()?)
    }

    /// Determinant by expansion along the first row.
    pub fn determinant(&self) -> Result<f64, ComputeError> {
        self.require_square("determinant")?;
        match self.rows {
            0 => Ok(1.0),
            1 => Ok(self.data[0]),
            2 => Ok(self.get(0, 0) * self.get(1, 1) - self.get(0, 1) * self.get(1, 0)),
            n => (1..=n).try_fold(0.0, |sum, col| {
                Ok(sum + self.get(0, col - 1) * self.cofactor(1, col)?)
            }),
        }
    }

    /// Transposed cofactor matrix.
    fn adjugate(&self) -> Result<Matrix, ComputeError> {
        let n = self.rows;
        let mut result = Matrix::zeros(n, n);
        for i in 1..=n {
            for j in 1..=n {
                result.set(j - 1, i - 1, self.cofactor(i, j)?);
            }
        }
        Ok(result)
    }

    pub fn inverse(&self) -> Result<Matrix, ComputeError> {
        self.require_square("inverse")?;
        let det = self.determinant()?;
        if det == 0.0 {
            return Err(ComputeError::SingularMatrix);
        }
        match self.rows {
            1 => Ok(Matrix::scalar(1.0 / det)),
            2 => {
                let (a, b, c, d) = (self.get(0, 0), self.get(0, 1), self.get(1, 0), self.get(1, 1));
                Ok(Matrix {
                    rows: 2,
                    cols: 2,
                    data: vec![d, -b, -c, a],
                }
                .scale(1.0 / det))
            }
            _ => Ok(self.adjugate()?.scale(1.0 / det)),
        }
    }
}

/// `[a,b;c,d]`: rows separated by `;`, entries by `,` or whitespace.
impl FromStr for Matrix {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ComputeError::MalformedLiteral {
            kind: "matrix".to_string(),
            text: s.to_string(),
        };
        let body = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(malformed)?;

        let rows = body
            .split(';')
            .map(|row| {
                row.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|entry| !entry.is_empty())
                    .map(|entry| entry.parse::<f64>().map_err(|_| malformed()))
                    .collect::<Result<Vec<f64>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Matrix::from_rows(rows).map_err(|_| malformed())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..self.rows)
            .map(|r| {
                self.row(r)
                    .iter()
                    .map(|v| format_number(*v))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        write!(f, "[{}]", rows.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(text: &str) -> Matrix {
        text.parse().expect("valid matrix")
    }

    #[test]
    fn test_parse_and_display() {
        let a = m("[1,2;3,4]");
        assert_eq!((a.rows, a.cols), (2, 2));
        assert_eq!(a.get(1, 0), 3.0);
        assert_eq!(a.to_string(), "[1,2;3,4]");
        assert_eq!(m("[1 2 3]").cols, 3);
        assert!("[1,2;3]".parse::<Matrix>().is_err());
        assert!("1,2".parse::<Matrix>().is_err());
        assert!("[a]".parse::<Matrix>().is_err());
    }

    #[test]
    fn test_add_requires_same_shape() {
        assert_eq!(m("[1,2;3,4]").add(&m("[1,1;1,1]")), Ok(m("[2,3;4,5]")));
        assert!(matches!(
            m("[1,2]").add(&m("[1;2]")),
            Err(ComputeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_multiply_checks_inner_dimension() {
        let product = m("[1,2,3]").multiply(&m("[1;1;1]")).expect("1x3 * 3x1");
        assert_eq!(product, Matrix::scalar(6.0));
        assert!(m("[1,2]").multiply(&m("[1,2]")).is_err());
    }

    #[test]
    fn test_transpose_is_square_only() {
        assert_eq!(m("[1,2;3,4]").transpose(), Ok(m("[1,3;2,4]")));
        assert!(matches!(
            m("[1,2,3]").transpose(),
            Err(ComputeError::NotSquare { .. })
        ));
    }

    #[test]
    fn test_determinant() {
        assert_eq!(m("[1,2;3,4]").determinant(), Ok(-2.0));
        assert_eq!(m("[5]").determinant(), Ok(5.0));
        assert_eq!(m("[2,0,1;1,3,2;1,1,2]").determinant(), Ok(6.0));
        assert!(m("[1,2,3]").determinant().is_err());
    }

    #[test]
    fn test_cofactor_needs_three_by_three() {
        assert!(matches!(
            m("[1,2;3,4]").cofactor(1, 1),
            Err(ComputeError::MatrixTooSmall { .. })
        ));
        assert_eq!(m("[1,2,3;4,5,6;7,8,10]").cofactor(1, 2), Ok(-(40.0 - 42.0)));
    }

    #[test]
    fn test_cofactor_rejects_entries_outside_the_matrix() {
        let a = m("[1,2,3;4,5,6;7,8,10]");
        for (row, col) in [(0, 1), (1, 0), (4, 1), (1, 4)] {
            assert_eq!(
                a.cofactor(row, col),
                Err(ComputeError::IndexOutOfRange { row, col, size: 3 })
            );
        }
        assert_eq!(a.cofactor(3, 3), Ok(5.0 - 8.0));
    }

    #[test]
    fn test_inverse() {
        let inverse = m("[1,2;3,4]").inverse().expect("invertible");
        let expected = [-2.0, 1.0, 1.5, -0.5];
        for (actual, expected) in inverse.data.iter().zip(expected) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-12);
        }

        let a = m("[2,0,1;1,3,2;1,1,2]");
        let product = a.multiply(&a.inverse().expect("invertible")).expect("square");
        for (actual, expected) in product.data.iter().zip(Matrix::identity(3).data) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-9);
        }

        assert_eq!(m("[1,2;2,4]").inverse(), Err(ComputeError::SingularMatrix));
    }
}
