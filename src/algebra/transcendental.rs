//! Trigonometric and logarithmic terms of the form `coef * f(argument)^power`.

use super::number::format_number;
use crate::parser::ast::Ast;
use std::fmt;

/// Function argument: a plain number or an unreduced expression.
#[derive(Debug, Clone)]
pub enum Argument {
    Numeric(f64),
    Symbolic(Ast),
}

impl Argument {
    /// Numbers compare by value, expressions by shape.
    pub fn same_as(&self, other: &Argument) -> bool {
        match (self, other) {
            (Argument::Numeric(a), Argument::Numeric(b)) => a == b,
            (Argument::Symbolic(a), Argument::Symbolic(b)) => a.same_shape(a.root(), b, b.root()),
            _ => false,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Argument::Numeric(value) => format_number(*value),
            Argument::Symbolic(ast) => ast.render(),
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigKind {
    Sin,
    Cos,
    Tan,
}

impl TrigKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(TrigKind::Sin),
            "cos" => Some(TrigKind::Cos),
            "tan" => Some(TrigKind::Tan),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrigKind::Sin => "sin",
            TrigKind::Cos => "cos",
            TrigKind::Tan => "tan",
        }
    }

    fn apply(self, degrees: f64) -> f64 {
        let radians = degrees.to_radians();
        match self {
            TrigKind::Sin => radians.sin(),
            TrigKind::Cos => radians.cos(),
            TrigKind::Tan => radians.tan(),
        }
    }
}

/// `coef * sin(argument)^power` with the argument in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Trig {
    pub kind: TrigKind,
    pub argument: Argument,
    pub coef: f64,
    pub power: f64,
}

impl Trig {
    pub fn new(kind: TrigKind, argument: Argument) -> Self {
        Trig {
            kind,
            argument,
            coef: 1.0,
            power: 1.0,
        }
    }

    /// Same kind over structurally equal arguments.
    pub fn like(&self, other: &Trig) -> bool {
        self.kind == other.kind && self.argument.same_as(&other.argument)
    }

    pub fn value(&self) -> Option<f64> {
        match self.argument {
            Argument::Numeric(degrees) => {
                Some(self.coef * self.kind.apply(degrees).powf(self.power))
            }
            Argument::Symbolic(_) => None,
        }
    }

    pub fn render_with(&self, argument: &str) -> String {
        render_call(self.coef, self.kind.name(), argument, self.power)
    }
}

impl fmt::Display for Trig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&self.argument.render()))
    }
}

/// `coef * log_base(argument)^power`
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    pub base: f64,
    pub argument: Argument,
    pub coef: f64,
    pub power: f64,
}

impl Log {
    pub fn new(argument: Argument) -> Self {
        Log {
            base: 10.0,
            argument,
            coef: 1.0,
            power: 1.0,
        }
    }

    pub fn like(&self, other: &Log) -> bool {
        self.base == other.base && self.argument.same_as(&other.argument)
    }

    pub fn value(&self) -> Option<f64> {
        match self.argument {
            Argument::Numeric(x) => {
                let log = if self.base == 10.0 {
                    x.log10()
                } else {
                    x.ln() / self.base.ln()
                };
                Some(self.coef * log.powf(self.power))
            }
            Argument::Symbolic(_) => None,
        }
    }

    pub fn render_with(&self, argument: &str) -> String {
        render_call(self.coef, "log", argument, self.power)
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&self.argument.render()))
    }
}

fn render_call(coef: f64, name: &str, argument: &str, power: f64) -> String {
    let prefix = if coef == 1.0 {
        String::new()
    } else if coef == -1.0 {
        "-".to_string()
    } else {
        format!("{}*", format_number(coef))
    };
    let suffix = if power == 1.0 {
        String::new()
    } else {
        format!("^{}", format_number(power))
    };
    format!("{}{}({}){}", prefix, name, argument, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_trig_in_degrees() {
        let sin = Trig::new(TrigKind::Sin, Argument::Numeric(30.0));
        assert_abs_diff_eq!(sin.value().expect("numeric"), 0.5, epsilon = 1e-12);
        let cos = Trig::new(TrigKind::Cos, Argument::Numeric(60.0));
        assert_abs_diff_eq!(cos.value().expect("numeric"), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_coef_and_power_apply() {
        let mut sin = Trig::new(TrigKind::Sin, Argument::Numeric(90.0));
        sin.coef = 3.0;
        sin.power = 2.0;
        assert_abs_diff_eq!(sin.value().expect("numeric"), 3.0, epsilon = 1e-12);
        assert_eq!(sin.to_string(), "3*sin(90)^2");
    }

    #[test]
    fn test_log_base_ten() {
        let log = Log::new(Argument::Numeric(1000.0));
        assert_abs_diff_eq!(log.value().expect("numeric"), 3.0, epsilon = 1e-12);
        assert_eq!(log.to_string(), "log(1000)");
    }

    #[test]
    fn test_render_negative_unit_coef() {
        let mut tan = Trig::new(TrigKind::Tan, Argument::Numeric(45.0));
        tan.coef = -1.0;
        assert_eq!(tan.to_string(), "-tan(45)");
    }

    #[test]
    fn test_kind_names() {
        for name in ["sin", "cos", "tan"] {
            assert_eq!(TrigKind::from_name(name).map(TrigKind::name), Some(name));
        }
        assert_eq!(TrigKind::from_name("log"), None);
    }
}
