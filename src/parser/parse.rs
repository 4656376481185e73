//! Main parser
//!
//! This module provides the [`Parser`] struct which turns the normalized token
//! stream into an arena [`Ast`].
//!
//! # Tree climbing
//!
//! Operands and operators are placed one at a time. An incoming operator walks
//! up from the last operand while its precedence tier is looser than the
//! parent's (or equal, for the left-grouping tiers), then takes the subtree
//! found there as its left child. Tokens synthesized by the lexer never climb,
//! which keeps the lexer's implicit-product groups intact. `=` always becomes
//! the root of the current tree.
//!
//! Every bracket pair is parsed by a fresh recursive call, so climbing never
//! escapes a group.

use crate::interpreter::constants::{FACTORIAL_LIMIT, MAX_NESTING_DEPTH};
use crate::parser::ast::{Ast, Node, NodeId};
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Closing Bracket is Missing")]
    UnclosedBracket,

    #[error("Invalid Expression: {message}")]
    InvalidExpression {
        message: String,
        position: Option<usize>,
    },

    #[error("Brackets are nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Insertion state for one bracket level.
struct Group {
    root: Option<NodeId>,
    /// Last placed node; new operators climb from here.
    current: Option<NodeId>,
    expect_operand: bool,
}

impl Group {
    fn new() -> Self {
        Group {
            root: None,
            current: None,
            expect_operand: true,
        }
    }
}

/// Tree-climbing parser for calculator input
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    nodes: Vec<Node>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            nodes: Vec::new(),
        })
    }

    /// Parse the whole token stream into a tree.
    pub fn parse(&mut self) -> Result<Ast, ParseError> {
        let root = self.parse_group(0)?;
        log::debug!("parsed {} nodes", self.nodes.len());
        Ok(Ast::from_parts(std::mem::take(&mut self.nodes), root))
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        // The stream always ends with Eoi, which is never consumed.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eoi {
            self.position += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn invalid(message: impl Into<String>, token: &Token) -> ParseError {
        ParseError::InvalidExpression {
            message: message.into(),
            position: token.position,
        }
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn push_leaf(&mut self, token: Token) -> NodeId {
        self.push_node(Node::new(token))
    }

    fn push_binary(&mut self, token: Token, left: NodeId, right: NodeId) -> NodeId {
        let mut node = Node::new(token);
        node.left = Some(left);
        node.right = Some(right);
        let id = self.push_node(node);
        self.nodes[left].parent = Some(id);
        self.nodes[right].parent = Some(id);
        id
    }

    // ===== Groups =====

    /// Parse tokens up to the `)` closing this level (or end of input at the
    /// top level) and return the subtree root.
    fn parse_group(&mut self, depth: usize) -> Result<NodeId, ParseError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }

        let mut group = Group::new();
        let mut pending_special: Option<Token> = None;

        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eoi => {
                    if depth > 0 {
                        return Err(ParseError::UnclosedBracket);
                    }
                    break;
                }
                TokenKind::RParen => {
                    if depth == 0 {
                        return Err(Self::invalid("unexpected ')'", &token));
                    }
                    break;
                }
                TokenKind::Trig | TokenKind::Log | TokenKind::Sqrt | TokenKind::Diff => {
                    if !group.expect_operand {
                        return Err(Self::invalid(
                            format!("operator expected before '{}'", token.text),
                            &token,
                        ));
                    }
                    if !self.check(TokenKind::LParen) {
                        return Err(Self::invalid(
                            format!("'(' expected after '{}'", token.text),
                            &token,
                        ));
                    }
                    pending_special = Some(token);
                }
                TokenKind::LParen => {
                    if !group.expect_operand {
                        return Err(Self::invalid("operator expected before '('", &token));
                    }
                    let mut subtree = self.parse_group(depth + 1)?;
                    if let Some(special) = pending_special.take() {
                        subtree = self.apply_special(subtree, special);
                    }
                    self.place_operand(&mut group, subtree);
                }
                TokenKind::Number | TokenKind::Variable | TokenKind::Polynomial => {
                    if !group.expect_operand {
                        return Err(Self::invalid(
                            format!("operator expected before '{}'", token.text),
                            &token,
                        ));
                    }
                    let leaf = self.push_leaf(token);
                    self.place_operand(&mut group, leaf);
                }
                TokenKind::Factorial => {
                    if !group.expect_operand {
                        return Err(Self::invalid(
                            format!("operator expected before '{}!'", token.text),
                            &token,
                        ));
                    }
                    let chain = self.expand_factorial(token);
                    self.place_operand(&mut group, chain);
                }
                kind if kind.is_operator() => {
                    if group.expect_operand {
                        if kind == TokenKind::Minus && self.negative_literal_follows() {
                            let leaf = self.negative_literal(token);
                            self.place_operand(&mut group, leaf);
                        } else if matches!(kind, TokenKind::Plus | TokenKind::Minus) {
                            self.place_unary(&mut group, token);
                        } else {
                            return Err(Self::invalid(
                                format!("operand expected before '{}'", token.text),
                                &token,
                            ));
                        }
                    } else {
                        self.place_operator(&mut group, token);
                    }
                }
                _ => return Err(Self::invalid("unexpected token", &token)),
            }
        }

        match group.root {
            Some(root) if !group.expect_operand => Ok(root),
            _ => Err(ParseError::InvalidExpression {
                message: "operand expected".to_string(),
                position: self.peek().position,
            }),
        }
    }

    /// Attach an operand as the right child of the pending operator.
    fn place_operand(&mut self, group: &mut Group, id: NodeId) {
        match group.current {
            Some(op) => {
                self.nodes[op].right = Some(id);
                self.nodes[id].parent = Some(op);
            }
            None => group.root = Some(id),
        }
        group.current = Some(id);
        group.expect_operand = false;
    }

    /// A `-` directly in front of a number that no product or power binds
    /// to: `-3` and `-3+1` fold, `-3*2` and `-2^2` keep the sign outside.
    fn negative_literal_follows(&self) -> bool {
        let after = self.tokens.get(self.position + 1).map(|t| t.kind);
        self.check(TokenKind::Number)
            && !matches!(
                after,
                Some(TokenKind::Mul | TokenKind::Div | TokenKind::Power)
            )
    }

    /// Fold the sign and the following number into one negative leaf.
    fn negative_literal(&mut self, sign: Token) -> NodeId {
        let number = self.advance();
        self.push_leaf(Token {
            kind: TokenKind::Number,
            text: format!("-{}", number.text),
            position: sign.position,
        })
    }

    /// A sign with no left operand gets a synthetic `0` on its left.
    fn place_unary(&mut self, group: &mut Group, token: Token) {
        let zero = self.push_leaf(Token::synthetic(TokenKind::Number, "0"));
        let mut node = Node::new(token);
        node.left = Some(zero);
        node.unary = true;
        let id = self.push_node(node);
        self.nodes[zero].parent = Some(id);

        match group.current {
            Some(op) => {
                self.nodes[op].right = Some(id);
                self.nodes[id].parent = Some(op);
            }
            None => group.root = Some(id),
        }
        group.current = Some(id);
        group.expect_operand = true;
    }

    fn place_operator(&mut self, group: &mut Group, token: Token) {
        let (Some(root), Some(current)) = (group.root, group.current) else {
            return;
        };

        let anchor = if token.kind == TokenKind::Equal {
            root
        } else if token.is_synthetic() {
            current
        } else {
            self.climb(current, token.kind)
        };

        let parent = self.nodes[anchor].parent;
        let mut node = Node::new(token);
        node.left = Some(anchor);
        node.parent = parent;
        let id = self.push_node(node);
        self.nodes[anchor].parent = Some(id);

        match parent {
            Some(p) => self.nodes[p].right = Some(id),
            None => group.root = Some(id),
        }
        group.current = Some(id);
        group.expect_operand = true;
    }

    /// Walk up from `start` while `incoming` binds looser than the parent.
    ///
    /// Same-tier operators group left (`8-2-1` is `(8-2)-1`); only `^`
    /// groups right.
    fn climb(&self, start: NodeId, incoming: TokenKind) -> NodeId {
        let mut anchor = start;
        while let Some(parent) = self.nodes[anchor].parent {
            let parent_kind = self.nodes[parent].token.kind;
            if parent_kind == TokenKind::Equal {
                break;
            }
            let (incoming_rank, parent_rank) = (incoming.rank(), parent_kind.rank());
            let looser = incoming_rank < parent_rank;
            let same_tier = incoming_rank == parent_rank && incoming != TokenKind::Power;
            if looser || same_tier {
                anchor = parent;
            } else {
                break;
            }
        }
        anchor
    }

    // ===== Special operators =====

    fn apply_special(&mut self, subtree: NodeId, special: Token) -> NodeId {
        if special.kind == TokenKind::Sqrt {
            // sqrt(a) is a^(1/2)
            let one = self.push_leaf(Token::synthetic(TokenKind::Number, "1"));
            let two = self.push_leaf(Token::synthetic(TokenKind::Number, "2"));
            let half = self.push_binary(Token::synthetic(TokenKind::Div, "/"), one, two);
            return self.push_binary(Token::synthetic(TokenKind::Power, "^"), subtree, half);
        }

        let target = if self.nodes[subtree].special.is_some() {
            // Nested call such as sin(cos(x)): wrap the inner call in a group.
            let mut group = Node::new(Token::synthetic(TokenKind::LParen, "("));
            group.left = Some(subtree);
            let id = self.push_node(group);
            self.nodes[subtree].parent = Some(id);
            id
        } else {
            subtree
        };
        self.nodes[target].special = Some(special);
        target
    }

    /// Expand `n!` into `n * ((n-1) * (... * 1))` when `n` is a small whole
    /// number. Anything else stays a factorial leaf for the interpreter.
    fn expand_factorial(&mut self, token: Token) -> NodeId {
        let n = match token.text.parse::<f64>() {
            Ok(n) if n.fract() == 0.0 && (0.0..=FACTORIAL_LIMIT as f64).contains(&n) => n as u64,
            _ => return self.push_leaf(token),
        };

        let mut chain = self.push_leaf(Token::synthetic(TokenKind::Number, "1"));
        for k in 2..=n {
            let factor = self.push_leaf(Token::synthetic(TokenKind::Number, k.to_string()));
            chain = self.push_binary(Token::synthetic(TokenKind::Mul, "*"), factor, chain);
        }
        chain
    }
}

/// Parse `source` into a tree.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    Parser::new(source)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(source: &str) -> String {
        parse(source).expect("parse failed").render()
    }

    #[test]
    fn test_precedence() {
        let ast = parse("2+3*4").expect("parse failed");
        let root = ast.node(ast.root());
        assert_eq!(root.token.kind, TokenKind::Plus);
        let right = ast.node(root.right.expect("right child"));
        assert_eq!(right.token.kind, TokenKind::Mul);
    }

    #[test]
    fn test_same_tier_groups_left() {
        assert_eq!(shape("8-2-1"), "8-2-1");
        let ast = parse("8-2-1").expect("parse failed");
        let root = ast.node(ast.root());
        assert_eq!(ast.node(root.right.expect("right")).token.text, "1");

        let ast = parse("8/4*2").expect("parse failed");
        let root = ast.node(ast.root());
        assert_eq!(root.token.kind, TokenKind::Mul);
    }

    #[test]
    fn test_power_groups_right() {
        let ast = parse("2^3^2").expect("parse failed");
        let root = ast.node(ast.root());
        assert_eq!(ast.node(root.left.expect("left")).token.text, "2");
        assert_eq!(
            ast.node(root.right.expect("right")).token.kind,
            TokenKind::Power
        );
    }

    #[test]
    fn test_equal_is_root() {
        let ast = parse("2x+4=10").expect("parse failed");
        assert_eq!(ast.node(ast.root()).token.kind, TokenKind::Equal);
    }

    #[test]
    fn test_negative_literal_is_one_leaf() {
        let ast = parse("-3").expect("parse failed");
        let root = ast.node(ast.root());
        assert!(root.is_leaf());
        assert_eq!(root.token.text, "-3");
        assert_eq!(shape("2*-3"), "2*(-3)");
        assert_eq!(shape("2^-1"), "2^(-1)");
    }

    #[test]
    fn test_unary_sign_keeps_synthetic_zero() {
        let ast = parse("-(1+2)").expect("parse failed");
        let root = ast.node(ast.root());
        assert!(root.unary);
        assert_eq!(root.token.kind, TokenKind::Minus);
        let zero = ast.node(root.left.expect("left"));
        assert!(zero.token.is_synthetic());
        assert_eq!(zero.token.text, "0");
        assert_eq!(shape("-(1+2)"), "-(1+2)");
    }

    #[test]
    fn test_sign_stays_outside_products_and_powers() {
        let ast = parse("-2^2").expect("parse failed");
        let root = ast.node(ast.root());
        assert!(root.unary);
        assert_eq!(
            ast.node(root.right.expect("right")).token.kind,
            TokenKind::Power
        );
        assert_eq!(shape("-5*4"), "-5*4");
        assert_eq!(shape("(-5)*4"), "(-5)*4");
    }

    #[test]
    fn test_special_operators() {
        let ast = parse("sin(30)").expect("parse failed");
        let root = ast.node(ast.root());
        assert_eq!(root.special.as_ref().map(|t| t.text.as_str()), Some("sin"));
        assert_eq!(shape("sqrt(9)"), "9^(1/2)");
        assert_eq!(shape("sin(cos(0))"), "sin(cos(0))");
    }

    #[test]
    fn test_factorial_expansion() {
        assert_eq!(shape("3!"), "3*(2*1)");
        assert_eq!(shape("0!"), "1");
        assert_eq!(shape("13!"), "13!");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("(1+2"), Err(ParseError::UnclosedBracket));
        assert!(matches!(
            parse("1+"),
            Err(ParseError::InvalidExpression { .. })
        ));
        assert!(matches!(
            parse("*2"),
            Err(ParseError::InvalidExpression { .. })
        ));
        assert!(matches!(
            parse("1)"),
            Err(ParseError::InvalidExpression { .. })
        ));
        assert!(matches!(
            parse(""),
            Err(ParseError::InvalidExpression { .. })
        ));
        assert!(matches!(
            parse("sin 30"),
            Err(ParseError::InvalidExpression { .. })
        ));
        assert!(matches!(parse("2 $"), Err(ParseError::Lex(_))));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!(
            "{}1{}",
            "(".repeat(MAX_NESTING_DEPTH + 2),
            ")".repeat(MAX_NESTING_DEPTH + 2)
        );
        assert!(matches!(
            parse(&deep),
            Err(ParseError::NestingTooDeep { .. })
        ));
    }
}
