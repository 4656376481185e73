//! Row operations and reduced row-echelon form.
//!
//! Every row operation snaps entries whose magnitude falls below
//! [`ROW_EPSILON`] to exactly zero.

use super::Matrix;
use crate::algebra::format_number;
use crate::interpreter::constants::{NO_SOLUTION_MESSAGE, ROW_EPSILON};

impl Matrix {
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
        log::trace!("R{} <-> R{}", a + 1, b + 1);
    }

    pub fn scale_row(&mut self, row: usize, factor: f64) {
        for col in 0..self.cols {
            let value = self.get(row, col) * factor;
            self.set(row, col, value);
        }
        self.snap_row(row);
        log::trace!("R{} <- {} * R{}", row + 1, format_number(factor), row + 1);
    }

    /// `target += factor * source`
    pub fn add_row_multiple(&mut self, target: usize, source: usize, factor: f64) {
        for col in 0..self.cols {
            let value = self.get(target, col) + factor * self.get(source, col);
            self.set(target, col, value);
        }
        self.snap_row(target);
        log::trace!(
            "R{} <- R{} + {} * R{}",
            target + 1,
            target + 1,
            format_number(factor),
            source + 1
        );
    }

    fn snap_row(&mut self, row: usize) {
        for col in 0..self.cols {
            if self.get(row, col).abs() < ROW_EPSILON {
                self.set(row, col, 0.0);
            }
        }
    }

    /// Reduced row-echelon form by partial pivoting.
    pub fn reduce_to_rref(&self) -> Matrix {
        let mut m = self.clone();
        let mut pivots: Vec<(usize, usize)> = Vec::new();
        let mut pivot_row = 0;

        for col in 0..m.cols {
            if pivot_row >= m.rows {
                break;
            }
            let best = (pivot_row..m.rows)
                .max_by(|a, b| m.get(*a, col).abs().total_cmp(&m.get(*b, col).abs()))
                .unwrap_or(pivot_row);
            if m.get(best, col) == 0.0 {
                continue;
            }
            m.swap_rows(pivot_row, best);
            for row in pivot_row + 1..m.rows {
                let factor = -m.get(row, col) / m.get(pivot_row, col);
                if factor != 0.0 {
                    m.add_row_multiple(row, pivot_row, factor);
                }
            }
            pivots.push((pivot_row, col));
            pivot_row += 1;
        }

        for &(row, col) in &pivots {
            let lead = m.get(row, col);
            if lead != 1.0 {
                m.scale_row(row, 1.0 / lead);
            }
        }

        for &(row, col) in pivots.iter().rev() {
            for above in 0..row {
                let factor = -m.get(above, col);
                if factor != 0.0 {
                    m.add_row_multiple(above, row, factor);
                }
            }
        }

        for value in &mut m.data {
            if *value == 0.0 {
                // Drop the sign of negative zero
                *value = 0.0;
            }
        }
        m
    }

    /// Solution lines for an augmented matrix already in RREF, one per
    /// variable, whose last column holds the constants.
    ///
    /// Free variables get a parameter letter not used by any variable.
    pub fn general_solution(&self, variables: &[char]) -> Vec<String> {
        let n = variables.len().min(self.cols.saturating_sub(1));
        let constant = |row: usize| self.get(row, self.cols - 1);

        let inconsistent = (0..self.rows)
            .any(|row| self.row(row)[..n].iter().all(|v| *v == 0.0) && constant(row) != 0.0);
        if inconsistent {
            return vec![NO_SOLUTION_MESSAGE.to_string()];
        }

        let mut basic: Vec<Option<usize>> = vec![None; n];
        for row in 0..self.rows {
            if let Some(col) = self.row(row)[..n].iter().position(|v| *v != 0.0) {
                basic[col] = Some(row);
            }
        }

        let mut available: Vec<char> = ('a'..='z').filter(|c| !variables.contains(c)).collect();
        let parameters: Vec<Option<String>> = (0..n)
            .map(|col| match basic[col] {
                Some(_) => None,
                None => Some(
                    available
                        .pop()
                        .map(String::from)
                        .unwrap_or_else(|| format!("t{}", col + 1)),
                ),
            })
            .collect();

        (0..n)
            .map(|col| match (&parameters[col], basic[col]) {
                (Some(parameter), _) => format!("{} = {}", variables[col], parameter),
                (None, Some(row)) => {
                    let mut terms: Vec<String> = (0..n)
                        .filter_map(|free| {
                            let parameter = parameters[free].as_ref()?;
                            let entry = self.get(row, free);
                            (entry != 0.0).then(|| parameter_term(-entry, parameter))
                        })
                        .collect();
                    if constant(row) != 0.0 {
                        terms.push(format_number(constant(row)));
                    }
                    if terms.is_empty() {
                        terms.push("0".to_string());
                    }
                    format!("{} = {}", variables[col], terms.join(" + "))
                }
                (None, None) => format!("{} = 0", variables[col]),
            })
            .collect()
    }
}

fn parameter_term(coef: f64, parameter: &str) -> String {
    if coef == 1.0 {
        parameter.to_string()
    } else if coef == -1.0 {
        format!("-{}", parameter)
    } else {
        format!("{}{}", format_number(coef), parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(text: &str) -> Matrix {
        text.parse().expect("valid matrix")
    }

    #[test]
    fn test_row_operations_snap_noise() {
        let mut a = m("[1,2;3,4]");
        a.add_row_multiple(1, 0, -3.00001);
        assert_eq!(a.get(1, 0), 0.0);
        a.swap_rows(0, 1);
        assert_eq!(a.get(1, 0), 1.0);
        a.scale_row(1, 0.5);
        assert_eq!(a.row(1), &[0.5, 1.0]);
    }

    #[test]
    fn test_rref_unique_solution() {
        // x + y = 3, x - y = 1
        let r = m("[1,1,3;1,-1,1]").reduce_to_rref();
        assert_eq!(r, m("[1,0,2;0,1,1]"));
        assert_eq!(r.general_solution(&['x', 'y']), vec!["x = 2", "y = 1"]);
    }

    #[test]
    fn test_rref_skips_zero_columns() {
        let r = m("[0,2,4;0,1,2]").reduce_to_rref();
        assert_eq!(r, m("[0,1,2;0,0,0]"));
    }

    #[test]
    fn test_inconsistent_system() {
        let r = m("[1,1,1;1,1,2]").reduce_to_rref();
        assert_eq!(
            r.general_solution(&['x', 'y']),
            vec![NO_SOLUTION_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_free_parameter_comes_from_the_end_of_the_alphabet() {
        // x + y = 2
        let r = m("[1,1,2]").reduce_to_rref();
        assert_eq!(r.general_solution(&['x', 'y']), vec!["x = -z + 2", "y = z"]);

        // x + 2y - z = 0
        let r = m("[1,2,-1,0]").reduce_to_rref();
        assert_eq!(
            r.general_solution(&['x', 'y', 'z']),
            vec!["x = -2w + v", "y = w", "z = v"]
        );
    }
}
