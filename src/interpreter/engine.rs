// Step-by-step reduction engine for calculator expressions

use crate::algebra::number::factorial;
use crate::algebra::ops::Operation;
use crate::algebra::{Argument, Combination, Function, Log, Polynomial, Trig, TrigKind};
use crate::interpreter::constants::MAX_POLYNOMIAL_POWER;
use crate::interpreter::equation::{self, Isolation};
use crate::interpreter::errors::{ComputeError, Error};
use crate::parser::ast::{Ast, NodeId};
use crate::parser::lexer::TokenKind;

/// Prefix of the first step of every trace
pub const EXPRESSION_PREFIX: &str = "Expression: ";

/// Trace and final value of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// `Expression: ...` followed by each distinct rendering
    pub steps: Vec<String>,
    pub value: Result<f64, Error>,
}

/// Reduces a tree one node at a time, recording each distinct rendering.
pub struct Interpreter<'a> {
    /// Tree being reduced in place
    ast: &'a mut Ast,

    /// Recorded steps, step 0 carries [`EXPRESSION_PREFIX`]
    steps: Vec<String>,

    /// Rendering after the last pass, without the prefix
    last: String,
}

impl<'a> Interpreter<'a> {
    pub fn new(ast: &'a mut Ast) -> Self {
        Interpreter {
            ast,
            steps: Vec::new(),
            last: String::new(),
        }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<String> {
        self.steps
    }

    // ===== Pre-passes =====

    /// Fold factorials, recognize polynomial terms and attach functions.
    pub fn prepare(&mut self) -> Result<(), ComputeError> {
        self.fold_factorials()?;
        self.recognize_polynomials();
        self.attach_functions();
        log::debug!("prepared tree: {}", self.ast.render());
        Ok(())
    }

    fn fold_factorials(&mut self) -> Result<(), ComputeError> {
        for id in self.ast.preorder(self.ast.root()) {
            let node = self.ast.node(id);
            if node.token.kind != TokenKind::Factorial {
                continue;
            }
            let n: f64 = node
                .token
                .text
                .parse()
                .map_err(|_| ComputeError::FactorialDomain { value: f64::NAN })?;
            let value = factorial(n)?;
            self.ast.collapse(id, Function::Constant(value));
        }
        Ok(())
    }

    /// Collapse `n * (v ^ k)` groups and bare variables into polynomial leaves.
    fn recognize_polynomials(&mut self) {
        let mut stack = vec![self.ast.root()];
        while let Some(id) = stack.pop() {
            if let Some(term) = self.polynomial_term(id) {
                self.ast.collapse(id, term);
                continue;
            }
            let node = self.ast.node(id);
            if node.is_leaf() {
                if node.token.kind == TokenKind::Variable {
                    if let Some(variable) = node.token.text.chars().next() {
                        let term = Function::Polynomial(Polynomial::monomial(1.0, 1, variable));
                        self.ast.collapse(id, term);
                    }
                }
                continue;
            }
            stack.extend(node.right);
            stack.extend(node.left);
        }
    }

    fn polynomial_term(&self, id: NodeId) -> Option<Function> {
        let node = self.ast.node(id);
        if node.token.kind != TokenKind::Mul || node.function.is_some() {
            return None;
        }
        let coefficient = self.number_leaf(node.left?)?;
        let power = self.ast.node(node.right?);
        if power.token.kind != TokenKind::Power {
            return None;
        }
        let base = self.ast.node(power.left?);
        if base.token.kind != TokenKind::Variable || !base.is_leaf() || base.special.is_some() {
            return None;
        }
        let exponent = self.number_leaf(power.right?)?;
        if exponent < 0.0 || exponent.fract() != 0.0 || exponent > MAX_POLYNOMIAL_POWER as f64 {
            return None;
        }
        let variable = base.token.text.chars().next()?;
        Some(
            Function::Polynomial(Polynomial::monomial(coefficient, exponent as usize, variable))
                .normalized(),
        )
    }

    fn number_leaf(&self, id: NodeId) -> Option<f64> {
        let node = self.ast.node(id);
        if node.token.kind == TokenKind::Number && node.is_leaf() && node.special.is_none() {
            node.token.text.parse().ok()
        } else {
            None
        }
    }

    fn attach_functions(&mut self) {
        for id in self.ast.preorder(self.ast.root()) {
            let node = self.ast.node(id);
            let special = node.special.as_ref().map(|t| (t.kind, t.text.clone()));

            if node.is_leaf() && node.function.is_none() && node.token.kind == TokenKind::Number {
                if let Ok(value) = node.token.text.parse::<f64>() {
                    self.ast.collapse(id, Function::Constant(value));
                }
            }

            match special {
                Some((TokenKind::Trig | TokenKind::Log, name)) => {
                    let already = matches!(
                        self.ast.node(id).function,
                        Some(Function::Trig(_) | Function::Log(_))
                    );
                    if !already {
                        let function = self.wrap_special(id, &name, None);
                        let node = self.ast.node_mut(id);
                        node.function = Some(function);
                        node.reduced = node.is_leaf();
                    }
                }
                Some((TokenKind::Diff, _)) => {
                    // Differentiated on its own pass
                    self.ast.node_mut(id).reduced = false;
                }
                _ => {}
            }
        }
    }

    /// Trig/Log function for the special node `id`, keeping the coefficient
    /// and power of `previous` when given.
    fn wrap_special(&self, id: NodeId, name: &str, previous: Option<&Function>) -> Function {
        let node = self.ast.node(id);
        let argument = match (node.is_leaf(), node.function.as_ref().and_then(Function::value)) {
            (true, Some(value)) => Argument::Numeric(value),
            _ => Argument::Symbolic(self.ast.extract(id)),
        };
        let (coef, power) = match previous {
            Some(f @ (Function::Trig(_) | Function::Log(_))) => (f.coef(), f.power()),
            _ => (1.0, 1.0),
        };
        match TrigKind::from_name(name) {
            Some(kind) => Function::Trig(Trig {
                coef,
                power,
                ..Trig::new(kind, argument)
            }),
            None => Function::Log(Log {
                coef,
                power,
                ..Log::new(argument)
            }),
        }
    }

    // ===== Reduction loop =====

    /// Reduce the tree to its final form, recording steps along the way.
    ///
    /// Steps recorded before a failure stay available through [`steps`].
    ///
    /// [`steps`]: Interpreter::steps
    pub fn get_steps(&mut self) -> Result<(), ComputeError> {
        let prepared = self.prepare();
        self.last = self.ast.render();
        self.steps.push(format!("{}{}", EXPRESSION_PREFIX, self.last));
        prepared?;

        while self.is_pending(self.ast.root()) {
            let Some(id) = self.deepest_pending() else {
                break;
            };
            self.reduce(id)?;
            self.record();
        }

        let simplified = self.simplify();
        self.record();
        simplified?;
        if self.steps.len() == 1 {
            self.steps.push(self.last.clone());
        }
        Ok(())
    }

    fn record(&mut self) {
        let rendering = self.ast.render();
        if rendering != self.last {
            log::trace!("step {}: {}", self.steps.len(), rendering);
            self.steps.push(rendering.clone());
            self.last = rendering;
        }
    }

    /// Operator nodes and undifferentiated `diff` leaves that are neither
    /// reduced nor deferred.
    fn is_pending(&self, id: NodeId) -> bool {
        let node = self.ast.node(id);
        if node.is_settled() {
            return false;
        }
        !node.is_leaf() || self.is_diff(id)
    }

    fn is_diff(&self, id: NodeId) -> bool {
        self.ast
            .node(id)
            .special
            .as_ref()
            .is_some_and(|t| t.kind == TokenKind::Diff)
    }

    /// In-order walk keeping the deepest pending node; later nodes win ties.
    fn deepest_pending(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, usize)> = None;
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        let mut current = Some((self.ast.root(), 0));

        loop {
            while let Some((id, depth)) = current {
                stack.push((id, depth));
                current = self.ast.node(id).left.map(|l| (l, depth + 1));
            }
            let Some((id, depth)) = stack.pop() else {
                break;
            };
            if self.is_pending(id) && best.map_or(true, |(_, deepest)| depth >= deepest) {
                best = Some((id, depth));
            }
            current = self.ast.node(id).right.map(|r| (r, depth + 1));
        }

        best.map(|(id, _)| id)
    }

    fn reduce(&mut self, id: NodeId) -> Result<(), ComputeError> {
        let node = self.ast.node(id);

        if node.is_leaf() {
            // Only pending leaves are `diff` markers
            return self.differentiate(id);
        }

        if node.token.kind == TokenKind::Equal {
            if equation::isolate(&mut *self.ast, id) == Isolation::Rewritten {
                log::trace!("isolation rewrite: {}", self.ast.render());
            }
            return Ok(());
        }

        let outcome = match node.token.kind {
            // Group around a nested call passes its content through
            TokenKind::LParen => match node.left.and_then(|l| self.ast.node(l).function.clone()) {
                Some(function) => Combination::Combined(function),
                None => Combination::Deferred,
            },
            kind => {
                let left = node.left.and_then(|l| self.ast.node(l).function.as_ref());
                let right = node.right.and_then(|r| self.ast.node(r).function.as_ref());
                match (Operation::from_token(kind), left, right) {
                    (Some(operation), Some(left), Some(right)) => left.apply(operation, right)?,
                    _ => Combination::Deferred,
                }
            }
        };

        match outcome {
            Combination::Combined(value) => self.settle(id, value),
            Combination::Deferred => {
                log::trace!("deferred: {}", self.ast.render_node(id).0);
                self.ast.node_mut(id).deferred = true;
            }
        }
        Ok(())
    }

    /// Collapse `id` to `value`, re-wrapping trig/log specials around the new
    /// argument.
    fn settle(&mut self, id: NodeId, value: Function) {
        let special = self.ast.node(id).special.as_ref().map(|t| (t.kind, t.text.clone()));
        let previous = self.ast.node(id).function.clone();
        self.ast.collapse(id, value);

        match special {
            Some((TokenKind::Trig | TokenKind::Log, name)) => {
                let wrapped = self.wrap_special(id, &name, previous.as_ref());
                self.ast.node_mut(id).function = Some(wrapped);
            }
            Some((TokenKind::Diff, _)) => {
                self.ast.node_mut(id).reduced = false;
            }
            _ => {}
        }
    }

    fn differentiate(&mut self, id: NodeId) -> Result<(), ComputeError> {
        let derivative = match &self.ast.node(id).function {
            Some(function) => function.differentiate(),
            None => Combination::Deferred,
        };
        match derivative {
            Combination::Combined(value) => {
                self.ast.node_mut(id).special = None;
                self.ast.collapse(id, value);
            }
            Combination::Deferred => self.ast.node_mut(id).deferred = true,
        }
        Ok(())
    }

    // ===== Results =====

    /// Fold a root leaf whose trig/log function has become a plain number.
    ///
    /// Infinite or NaN values such as `log(0)` are rejected.
    pub fn simplify(&mut self) -> Result<(), ComputeError> {
        let root = self.ast.root();
        let node = self.ast.node(root);
        if !node.is_leaf() || node.special.is_none() {
            return Ok(());
        }
        let folded = match &node.function {
            Some(Function::Trig(t)) => t.value().map(|v| (v, t.kind.name())),
            Some(Function::Log(l)) => l.value().map(|v| (v, "log")),
            _ => None,
        };
        if let Some((value, name)) = folded {
            let constant = Function::number(value, name)?;
            self.ast.node_mut(root).special = None;
            self.ast.collapse(root, constant);
        }
        Ok(())
    }

    /// Reduce the tree and read the final step as a number.
    pub fn solve(&mut self) -> Result<f64, Error> {
        self.get_steps()?;
        let line = self.steps.last().map(String::as_str).unwrap_or_default();
        Ok(value_of_line(line)?)
    }
}

/// Number shown on a final line: `a/b`, a decimal, or the right side of
/// `v = value`.
pub fn value_of_line(line: &str) -> Result<f64, ComputeError> {
    let non_numeric = || ComputeError::NonNumericResult {
        line: line.to_string(),
    };
    let text = match line.split_once(" = ") {
        Some((lhs, rhs)) => {
            let mut chars = lhs.chars();
            match (chars.next(), chars.next()) {
                (Some(v), None) if v.is_ascii_lowercase() => rhs,
                _ => return Err(non_numeric()),
            }
        }
        None => line,
    };

    let value = match text.split_once('/') {
        Some((n, d)) => {
            let n: f64 = n.trim().parse().map_err(|_| non_numeric())?;
            let d: f64 = d
                .trim()
                .trim_matches(&['(', ')'][..])
                .parse()
                .map_err(|_| non_numeric())?;
            if d == 0.0 {
                return Err(ComputeError::ZeroDenominator);
            }
            n / d
        }
        None => text.trim().parse().map_err(|_| non_numeric())?,
    };
    Ok(value)
}

/// Reduce `ast` in place and return the trace with the final value.
pub fn evaluate(ast: &mut Ast) -> Evaluation {
    let mut interpreter = Interpreter::new(ast);
    let value = interpreter.solve();
    if let Err(err) = &value {
        log::debug!("evaluation stopped: {}", err);
    }
    Evaluation {
        steps: interpreter.into_steps(),
        value,
    }
}
