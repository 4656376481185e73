//! Matrix tab requests.
//!
//! A request names one or two operands, each with an optional unary operation
//! and a scalar multiplier, and an optional binary operation between them:
//!
//! ```text
//! D[1,2;3,4]
//! 2*I[1,2;3,4] + T[1,0;0,1]
//! [1,2;3,4] * [5;6]
//! ```
//!
//! Opcodes: `I` inverse, `T` transpose, `D` determinant; `+`, `-`, `*`.

use super::Matrix;
use crate::interpreter::errors::ComputeError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Inverse,
    Transpose,
    Determinant,
}

impl FromStr for UnaryOp {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "I" | "inv" | "inverse" => Ok(UnaryOp::Inverse),
            "T" | "transpose" => Ok(UnaryOp::Transpose),
            "D" | "det" | "determinant" => Ok(UnaryOp::Determinant),
            other => Err(ComputeError::UnknownMatrixOperator {
                name: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
}

impl BinaryOp {
    fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
        }
    }
}

impl FromStr for BinaryOp {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "add" => Ok(BinaryOp::Add),
            "-" | "sub" | "subtract" => Ok(BinaryOp::Subtract),
            "*" | "mul" | "multiply" => Ok(BinaryOp::Multiply),
            other => Err(ComputeError::UnknownMatrixOperator {
                name: other.to_string(),
            }),
        }
    }
}

/// A matrix with the unary operation and multiplier applied to it
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub matrix: Matrix,
    pub unary: Option<UnaryOp>,
    pub scalar: f64,
}

impl Operand {
    pub fn new(matrix: Matrix) -> Self {
        Operand {
            matrix,
            unary: None,
            scalar: 1.0,
        }
    }

    fn evaluate(&self) -> Result<Value, ComputeError> {
        let value = match self.unary {
            None => Value::Matrix(self.matrix.clone()),
            Some(UnaryOp::Inverse) => Value::Matrix(self.matrix.inverse()?),
            Some(UnaryOp::Transpose) => Value::Matrix(self.matrix.transpose()?),
            Some(UnaryOp::Determinant) => Value::Scalar(self.matrix.determinant()?),
        };
        Ok(match value {
            Value::Matrix(m) if self.scalar != 1.0 => Value::Matrix(m.scale(self.scalar)),
            Value::Scalar(v) => Value::Scalar(v * self.scalar),
            other => other,
        })
    }
}

/// `[<scalar>*][I|T|D]<matrix>`
impl FromStr for Operand {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ComputeError::MalformedLiteral {
            kind: "matrix operand".to_string(),
            text: s.to_string(),
        };
        let open = s.find('[').ok_or_else(malformed)?;
        let (prefix, literal) = s.split_at(open);

        let (scalar, opcode) = match prefix.split_once('*') {
            Some((scalar, opcode)) => (
                scalar.trim().parse::<f64>().map_err(|_| malformed())?,
                opcode.trim(),
            ),
            None => (1.0, prefix.trim()),
        };
        let unary = if opcode.is_empty() {
            None
        } else {
            Some(opcode.parse()?)
        };

        Ok(Operand {
            matrix: literal.parse()?,
            unary,
            scalar,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRequest {
    pub first: Operand,
    pub second: Option<(BinaryOp, Operand)>,
}

impl MatrixRequest {
    /// Build a request from the three opcode slots
    /// `[unary on first, binary, unary on second]`; empty or `N` slots mean
    /// no operation.
    pub fn from_opcodes(
        first: Matrix,
        second: Option<Matrix>,
        opcodes: [&str; 3],
        scalars: [f64; 2],
    ) -> Result<Self, ComputeError> {
        let unary = |code: &str| -> Result<Option<UnaryOp>, ComputeError> {
            match code.trim() {
                "" | "N" => Ok(None),
                other => other.parse().map(Some),
            }
        };

        let first = Operand {
            matrix: first,
            unary: unary(opcodes[0])?,
            scalar: scalars[0],
        };
        let second = match second {
            Some(matrix) => Some((
                opcodes[1].parse()?,
                Operand {
                    matrix,
                    unary: unary(opcodes[2])?,
                    scalar: scalars[1],
                },
            )),
            None => None,
        };
        Ok(MatrixRequest { first, second })
    }
}

impl FromStr for MatrixRequest {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let close = text.find(']').ok_or_else(|| ComputeError::MalformedLiteral {
            kind: "matrix request".to_string(),
            text: text.to_string(),
        })?;
        let (first, rest) = text.split_at(close + 1);
        let first: Operand = first.parse()?;

        let rest = rest.trim();
        let mut chars = rest.chars();
        let second = match chars.next() {
            None => None,
            Some(op) => Some((op.to_string().parse()?, chars.as_str().parse()?)),
        };
        Ok(MatrixRequest { first, second })
    }
}

enum Value {
    Matrix(Matrix),
    Scalar(f64),
}

/// Apply a request; scalar results come back as a 1x1 matrix.
pub fn matrix_op(request: &MatrixRequest) -> Result<Matrix, ComputeError> {
    let first = request.first.evaluate()?;
    let Some((op, second)) = &request.second else {
        return Ok(into_matrix(first));
    };
    let second = second.evaluate()?;

    let result = match (first, second) {
        (Value::Matrix(a), Value::Matrix(b)) => match op {
            BinaryOp::Add => a.add(&b)?,
            BinaryOp::Subtract => a.subtract(&b)?,
            BinaryOp::Multiply => a.multiply(&b)?,
        },
        (Value::Scalar(a), Value::Scalar(b)) => Matrix::scalar(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
        }),
        (Value::Scalar(k), Value::Matrix(m)) | (Value::Matrix(m), Value::Scalar(k)) => match op {
            BinaryOp::Multiply => m.scale(k),
            _ => {
                return Err(ComputeError::MixedOperands {
                    operation: op.name().to_string(),
                })
            }
        },
    };
    log::debug!("matrix result {}x{}", result.rows, result.cols);
    Ok(result)
}

fn into_matrix(value: Value) -> Matrix {
    match value {
        Value::Matrix(m) => m,
        Value::Scalar(v) => Matrix::scalar(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn run(text: &str) -> Result<Matrix, ComputeError> {
        matrix_op(&text.parse().expect("valid request"))
    }

    #[test]
    fn test_parse_request() {
        let request: MatrixRequest = "2*I[1,2;3,4] + T[1,0;0,1]".parse().expect("valid");
        assert_eq!(request.first.scalar, 2.0);
        assert_eq!(request.first.unary, Some(UnaryOp::Inverse));
        let (op, second) = request.second.expect("second operand");
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(second.unary, Some(UnaryOp::Transpose));
    }

    #[test]
    fn test_unknown_operator() {
        assert!(matches!(
            "X[1]".parse::<MatrixRequest>(),
            Err(ComputeError::UnknownMatrixOperator { .. })
        ));
        assert!(matches!(
            "[1] % [2]".parse::<MatrixRequest>(),
            Err(ComputeError::UnknownMatrixOperator { .. })
        ));
    }

    #[test]
    fn test_determinant_gives_scalar() {
        assert_eq!(run("D[1,2;3,4]"), Ok(Matrix::scalar(-2.0)));
        assert_eq!(run("D[1,2;3,4] * D[2,0;0,2]"), Ok(Matrix::scalar(-8.0)));
    }

    #[test]
    fn test_inverse_request() {
        let inverse = run("I[1,2;3,4]").expect("invertible");
        for (actual, expected) in inverse.data.iter().zip([-2.0, 1.0, 1.5, -0.5]) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transpose_opcode_transposes() {
        assert_eq!(run("T[1,2;3,4]"), "[1,3;2,4]".parse());
    }

    #[test]
    fn test_scalar_and_matrix() {
        assert_eq!(run("D[2] * [1,2;3,4]"), "[2,4;6,8]".parse());
        assert_eq!(
            run("D[2] + [1,2;3,4]"),
            Err(ComputeError::MixedOperands {
                operation: "add".to_string()
            })
        );
    }

    #[test]
    fn test_from_opcodes() {
        let first: Matrix = "[1,2;3,4]".parse().expect("valid");
        let second: Matrix = "[1,1;1,1]".parse().expect("valid");
        let request =
            MatrixRequest::from_opcodes(first, Some(second), ["", "-", "N"], [1.0, 2.0])
                .expect("valid opcodes");
        assert_eq!(matrix_op(&request), "[-1,0;1,2]".parse());
    }
}
