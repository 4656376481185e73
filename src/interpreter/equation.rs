//! Isolation of the variable in single-variable equations.
//!
//! Each call performs at most one rewrite of an `=` node whose children are
//! already settled, so every rewrite shows up as its own step:
//!
//! ```text
//! 2x+4 = 10  ->  2x = 10-4  ->  2x = 6  ->  x = 6/2  ->  x = 3
//! ```
//!
//! A right side that is not a number is first moved over: `l = r` becomes
//! `(l-r) = 0`.

use crate::algebra::{Function, Polynomial};
use crate::parser::ast::{Ast, NodeId};
use crate::parser::lexer::{Token, TokenKind};

/// What [`isolate`] did to the equation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isolation {
    /// New pending children were attached
    Rewritten,
    /// Nothing left to isolate; the node is now reduced
    Settled,
}

pub fn isolate(ast: &mut Ast, id: NodeId) -> Isolation {
    let node = ast.node(id);
    let (Some(left), Some(right)) = (node.left, node.right) else {
        return settle(ast, id);
    };

    let rhs_is_number = ast
        .node(right)
        .function
        .as_ref()
        .is_some_and(Function::is_constant);

    if !rhs_is_number {
        let difference = ast.push_binary(Token::synthetic(TokenKind::Minus, "-"), left, right);
        let zero = ast.push_value(Function::Constant(0.0));
        ast.replace_children(id, difference, zero);
        log::trace!("moved right side over: {}", ast.render());
        return Isolation::Rewritten;
    }

    let linear = match &ast.node(left).function {
        Some(Function::Polynomial(p)) if p.degree() == 1 => p.clone(),
        _ => return settle(ast, id),
    };
    let variable = linear.variable();
    let (offset, slope) = (linear.coefficient(0), linear.coefficient(1));

    if offset != 0.0 {
        // a*v + b = r  ->  a*v = r - b
        let term = ast.push_value(Function::Polynomial(Polynomial::monomial(slope, 1, variable)));
        let (kind, text, amount) = if offset < 0.0 {
            (TokenKind::Plus, "+", -offset)
        } else {
            (TokenKind::Minus, "-", offset)
        };
        let amount = ast.push_value(Function::Constant(amount));
        let moved = ast.push_binary(Token::synthetic(kind, text), right, amount);
        ast.replace_children(id, term, moved);
        Isolation::Rewritten
    } else if slope != 1.0 {
        // a*v = r  ->  v = r / a
        let bare = ast.push_value(Function::Polynomial(Polynomial::monomial(1.0, 1, variable)));
        let divisor = ast.push_value(Function::Constant(slope));
        let quotient = ast.push_binary(Token::synthetic(TokenKind::Div, "/"), right, divisor);
        ast.replace_children(id, bare, quotient);
        Isolation::Rewritten
    } else {
        settle(ast, id)
    }
}

fn settle(ast: &mut Ast, id: NodeId) -> Isolation {
    let node = ast.node_mut(id);
    node.reduced = true;
    node.deferred = false;
    Isolation::Settled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(ast: &mut Ast, function: Function) -> NodeId {
        ast.push_value(function)
    }

    fn equation(left: Function, right: Function) -> (Ast, NodeId) {
        let mut ast = Ast::leaf(Token::synthetic(TokenKind::Number, "0"));
        let l = leaf(&mut ast, left);
        let r = leaf(&mut ast, right);
        let eq = ast.push_binary(Token::synthetic(TokenKind::Equal, "="), l, r);
        ast.set_root(eq);
        (ast, eq)
    }

    fn poly(coefficients: &[f64]) -> Function {
        Function::Polynomial(Polynomial::new(coefficients.to_vec(), 'x'))
    }

    #[test]
    fn test_offset_moves_right() {
        let (mut ast, eq) = equation(poly(&[4.0, 2.0]), Function::Constant(10.0));
        assert_eq!(isolate(&mut ast, eq), Isolation::Rewritten);
        assert_eq!(ast.render(), "2x = 10-4");
    }

    #[test]
    fn test_negative_offset_adds() {
        let (mut ast, eq) = equation(poly(&[-4.0, 2.0]), Function::Constant(10.0));
        isolate(&mut ast, eq);
        assert_eq!(ast.render(), "2x = 10+4");
    }

    #[test]
    fn test_slope_divides() {
        let (mut ast, eq) = equation(poly(&[0.0, 2.0]), Function::Constant(6.0));
        assert_eq!(isolate(&mut ast, eq), Isolation::Rewritten);
        assert_eq!(ast.render(), "x = 6/2");
    }

    #[test]
    fn test_isolated_variable_settles() {
        let (mut ast, eq) = equation(poly(&[0.0, 1.0]), Function::Constant(3.0));
        assert_eq!(isolate(&mut ast, eq), Isolation::Settled);
        assert!(ast.node(eq).reduced);
    }

    #[test]
    fn test_symbolic_right_side_moves_over() {
        let (mut ast, eq) = equation(poly(&[0.0, 1.0]), poly(&[3.0, 2.0]));
        assert_eq!(isolate(&mut ast, eq), Isolation::Rewritten);
        assert_eq!(ast.render(), "x-(2x+3) = 0");
    }

    #[test]
    fn test_quadratic_is_left_alone() {
        let (mut ast, eq) = equation(poly(&[0.0, 0.0, 1.0]), Function::Constant(4.0));
        assert_eq!(isolate(&mut ast, eq), Isolation::Settled);
        assert_eq!(ast.render(), "x^2 = 4");
    }
}
