//! Ordered finite sets of numbers.
//!
//! Sets are plain slices; element order is preserved as described on each
//! operation, and duplicates within one input are kept once.

use crate::algebra::format_number;
use crate::interpreter::errors::ComputeError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    Intersection,
    Difference,
}

impl FromStr for SetOp {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" | "u" | "∪" => Ok(SetOp::Union),
            "intersection" | "n" | "∩" => Ok(SetOp::Intersection),
            "difference" | "-" => Ok(SetOp::Difference),
            other => Err(ComputeError::UnknownSetOperator {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetOp::Union => "union",
            SetOp::Intersection => "intersection",
            SetOp::Difference => "difference",
        })
    }
}

fn push_unique(out: &mut Vec<f64>, value: f64) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// - union: `a`, then the elements of `b` not in `a`
/// - intersection: elements of `b` also in `a`, in `b`'s order
/// - difference: elements of `a` not in `b`
pub fn set_op(a: &[f64], b: &[f64], op: SetOp) -> Vec<f64> {
    let mut out = Vec::new();
    match op {
        SetOp::Union => {
            for &v in a.iter().chain(b) {
                push_unique(&mut out, v);
            }
        }
        SetOp::Intersection => {
            for &v in b.iter().filter(|v| a.contains(*v)) {
                push_unique(&mut out, v);
            }
        }
        SetOp::Difference => {
            for &v in a.iter().filter(|v| !b.contains(*v)) {
                push_unique(&mut out, v);
            }
        }
    }
    out
}

/// Elements joined by `", "`.
pub fn format_set(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a `{1,2,3}` literal; an empty `{}` is the empty set.
pub fn parse_set(text: &str) -> Result<Vec<f64>, ComputeError> {
    let malformed = || ComputeError::MalformedLiteral {
        kind: "set".to_string(),
        text: text.to_string(),
    };
    let body = text
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(malformed)?;
    body.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.parse::<f64>().map_err(|_| malformed()))
        .collect()
}

/// A textual request such as `{1,2,3} union {2,3,4}`
#[derive(Debug, Clone, PartialEq)]
pub struct SetRequest {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub op: SetOp,
}

impl SetRequest {
    pub fn apply(&self) -> Vec<f64> {
        set_op(&self.left, &self.right, self.op)
    }
}

impl FromStr for SetRequest {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ComputeError::MalformedLiteral {
            kind: "set request".to_string(),
            text: s.to_string(),
        };
        let close = s.find('}').ok_or_else(malformed)?;
        let open = s.rfind('{').ok_or_else(malformed)?;
        if open <= close {
            return Err(malformed());
        }
        Ok(SetRequest {
            left: parse_set(&s[..=close])?,
            op: s[close + 1..open].parse()?,
            right: parse_set(&s[open..])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 3] = [1.0, 2.0, 3.0];
    const B: [f64; 3] = [2.0, 3.0, 4.0];

    #[test]
    fn test_operations() {
        assert_eq!(set_op(&A, &B, SetOp::Union), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(set_op(&A, &B, SetOp::Intersection), vec![2.0, 3.0]);
        assert_eq!(set_op(&A, &B, SetOp::Difference), vec![1.0]);
    }

    #[test]
    fn test_intersection_follows_second_order() {
        assert_eq!(
            set_op(&[1.0, 2.0, 3.0], &[3.0, 1.0], SetOp::Intersection),
            vec![3.0, 1.0]
        );
    }

    #[test]
    fn test_operator_names() {
        assert_eq!("u".parse::<SetOp>(), Ok(SetOp::Union));
        assert_eq!("Intersection".parse::<SetOp>(), Ok(SetOp::Intersection));
        assert_eq!("-".parse::<SetOp>(), Ok(SetOp::Difference));
        assert_eq!("∪".parse::<SetOp>(), Ok(SetOp::Union));
        assert_eq!(" ∩ ".parse::<SetOp>(), Ok(SetOp::Intersection));
        assert!(matches!(
            "xor".parse::<SetOp>(),
            Err(ComputeError::UnknownSetOperator { .. })
        ));
    }

    #[test]
    fn test_format_set() {
        assert_eq!(format_set(&[1.0, 2.5, -3.0]), "1, 2.5, -3");
        assert_eq!(format_set(&[]), "");
    }

    #[test]
    fn test_parse_request() {
        let request: SetRequest = "{1, 2, 3} union {2,3,4}".parse().expect("valid request");
        assert_eq!(request.op, SetOp::Union);
        assert_eq!(format_set(&request.apply()), "1, 2, 3, 4");
        assert_eq!(parse_set("{}"), Ok(vec![]));
        assert!("{1,2} union".parse::<SetRequest>().is_err());
        assert!(parse_set("{1,a}").is_err());
    }
}
