//! Linear-system assembly.
//!
//! Each equation is parsed and prepared like an expression, then its terms are
//! collected into a coefficient table keyed by variable letter plus a
//! constant column. The table becomes an augmented matrix whose reduced
//! row-echelon form yields one solution line per variable.

use crate::algebra::Function;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::{ComputeError, Error};
use crate::matrix::Matrix;
use crate::parser::ast::{Ast, NodeId};
use crate::parser::lexer::TokenKind;
use crate::parser::parse;
use rustc_hash::FxHashMap;

/// Column of the coefficient table. Variables sort before the constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoefficientKey {
    Variable(char),
    Constant,
}

/// Per-key coefficient lists, one entry per equation.
#[derive(Debug, Default)]
pub struct CoefficientTable {
    columns: FxHashMap<CoefficientKey, Vec<f64>>,
    equations: usize,
}

impl CoefficientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one equation's terms. Keys missing from either side get an
    /// explicit `0`.
    pub fn push_equation(&mut self, terms: FxHashMap<CoefficientKey, f64>) {
        for key in terms.keys() {
            self.columns
                .entry(*key)
                .or_insert_with(|| vec![0.0; self.equations]);
        }
        for (key, column) in self.columns.iter_mut() {
            column.push(terms.get(key).copied().unwrap_or(0.0));
        }
        self.equations += 1;
    }

    /// Variables in column order.
    pub fn variables(&self) -> Vec<char> {
        let mut variables: Vec<char> = self
            .columns
            .keys()
            .filter_map(|key| match key {
                CoefficientKey::Variable(v) => Some(*v),
                CoefficientKey::Constant => None,
            })
            .collect();
        variables.sort_unstable();
        variables
    }

    pub fn column(&self, key: CoefficientKey) -> Option<&[f64]> {
        self.columns.get(&key).map(Vec::as_slice)
    }

    /// Augmented matrix `[A | b]`.
    pub fn to_matrix(&self) -> Result<Matrix, ComputeError> {
        let mut keys: Vec<CoefficientKey> = self
            .variables()
            .into_iter()
            .map(CoefficientKey::Variable)
            .collect();
        keys.push(CoefficientKey::Constant);

        let rows = (0..self.equations)
            .map(|row| {
                keys.iter()
                    .map(|key| self.column(*key).map_or(0.0, |column| column[row]))
                    .collect()
            })
            .collect();
        Matrix::from_rows(rows)
    }
}

/// Signed coefficients of one prepared equation tree.
///
/// Terms on the right of `=` or of a `-` are negated, and constants move to
/// the right-hand side.
pub fn collect_terms(ast: &Ast) -> Result<FxHashMap<CoefficientKey, f64>, ComputeError> {
    let mut terms: FxHashMap<CoefficientKey, f64> = FxHashMap::default();
    let mut stack: Vec<(NodeId, f64)> = vec![(ast.root(), 1.0)];

    while let Some((id, sign)) = stack.pop() {
        let node = ast.node(id);
        let non_linear = || ComputeError::NonLinear {
            term: ast.render_node(id).0,
        };

        if node.is_leaf() {
            match &node.function {
                Some(Function::Polynomial(p)) if p.degree() <= 1 => {
                    *terms
                        .entry(CoefficientKey::Variable(p.variable()))
                        .or_insert(0.0) += sign * p.coefficient(1);
                    *terms.entry(CoefficientKey::Constant).or_insert(0.0) -=
                        sign * p.coefficient(0);
                }
                Some(f) if f.is_constant() && node.special.is_none() => {
                    *terms.entry(CoefficientKey::Constant).or_insert(0.0) -=
                        sign * f.value().unwrap_or(0.0);
                }
                _ => return Err(non_linear()),
            }
            continue;
        }

        if node.token.kind == TokenKind::LParen && node.special.is_none() {
            if let Some(inner) = node.left {
                stack.push((inner, sign));
                continue;
            }
        }

        let (Some(left), Some(right)) = (node.left, node.right) else {
            return Err(non_linear());
        };
        let constant = |child: NodeId| {
            let child = ast.node(child);
            match (&child.function, child.is_leaf(), &child.special) {
                (Some(f), true, None) => f.value(),
                _ => None,
            }
        };

        // Pushed left first so the right side is visited first
        match node.token.kind {
            TokenKind::Equal => {
                stack.push((left, sign));
                stack.push((right, -sign));
            }
            TokenKind::Plus => {
                stack.push((left, sign));
                stack.push((right, sign));
            }
            TokenKind::Minus => {
                stack.push((left, sign));
                stack.push((right, -sign));
            }
            TokenKind::Mul => match (constant(left), constant(right)) {
                (Some(k), _) => stack.push((right, sign * k)),
                (None, Some(k)) => stack.push((left, sign * k)),
                _ => return Err(non_linear()),
            },
            TokenKind::Div => match constant(right) {
                Some(k) if k != 0.0 => stack.push((left, sign / k)),
                Some(_) => return Err(ComputeError::ZeroDenominator),
                None => return Err(non_linear()),
            },
            _ => return Err(non_linear()),
        }
    }

    Ok(terms)
}

/// Solve a system of linear equations given as text.
pub fn solve_linear_system<S: AsRef<str>>(equations: &[S]) -> Result<Vec<String>, Error> {
    if equations.is_empty() {
        return Err(ComputeError::EmptySystem.into());
    }

    let mut table = CoefficientTable::new();
    for equation in equations {
        let mut ast = parse(equation.as_ref())?;
        Interpreter::new(&mut ast).prepare()?;
        table.push_equation(collect_terms(&ast)?);
    }

    let variables = table.variables();
    let augmented = table.to_matrix()?;
    log::debug!(
        "system of {} equations in {:?}: {}",
        equations.len(),
        variables,
        augmented
    );
    Ok(augmented.reduce_to_rref().general_solution(&variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::NO_SOLUTION_MESSAGE;

    fn terms(source: &str) -> FxHashMap<CoefficientKey, f64> {
        let mut ast = parse(source).expect("parse failed");
        Interpreter::new(&mut ast).prepare().expect("prepare failed");
        collect_terms(&ast).expect("linear")
    }

    #[test]
    fn test_signs_follow_sides() {
        let t = terms("2x-3y=6");
        assert_eq!(t[&CoefficientKey::Variable('x')], 2.0);
        assert_eq!(t[&CoefficientKey::Variable('y')], -3.0);
        assert_eq!(t[&CoefficientKey::Constant], 6.0);

        let t = terms("x+4=y");
        assert_eq!(t[&CoefficientKey::Variable('y')], -1.0);
        assert_eq!(t[&CoefficientKey::Constant], -4.0);
    }

    #[test]
    fn test_scaled_terms() {
        let t = terms("2*(x+y)=4");
        assert_eq!(t[&CoefficientKey::Variable('x')], 2.0);
        assert_eq!(t[&CoefficientKey::Variable('y')], 2.0);
        let t = terms("x/2=1");
        assert_eq!(t[&CoefficientKey::Variable('x')], 0.5);
    }

    #[test]
    fn test_missing_variables_get_zero() {
        let mut table = CoefficientTable::new();
        table.push_equation(terms("x=1"));
        table.push_equation(terms("y=2"));
        assert_eq!(table.variables(), vec!['x', 'y']);
        assert_eq!(
            table.to_matrix().expect("rectangular"),
            "[1,0,1;0,1,2]".parse().expect("valid")
        );
    }

    #[test]
    fn test_unique_solution() {
        let lines = solve_linear_system(&["x+y=3", "x-y=1"]).expect("solvable");
        assert_eq!(lines, vec!["x = 2", "y = 1"]);
    }

    #[test]
    fn test_inconsistent_system() {
        let lines = solve_linear_system(&["x+y=1", "x+y=2"]).expect("valid system");
        assert_eq!(lines, vec![NO_SOLUTION_MESSAGE]);
    }

    #[test]
    fn test_non_linear_terms() {
        assert!(matches!(
            solve_linear_system(&["x^2+y=1"]),
            Err(Error::Compute(ComputeError::NonLinear { .. }))
        ));
        assert!(matches!(
            solve_linear_system(&["x*y=1"]),
            Err(Error::Compute(ComputeError::NonLinear { .. }))
        ));
    }

    #[test]
    fn test_empty_system() {
        let none: [&str; 0] = [];
        assert_eq!(
            solve_linear_system(&none),
            Err(Error::Compute(ComputeError::EmptySystem))
        );
    }
}
