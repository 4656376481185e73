// AST (Abstract Syntax Tree) definitions for calculator expressions

use crate::algebra::Function;
use crate::parser::lexer::{Token, TokenKind};

/// Index of a node inside an [`Ast`] arena
pub type NodeId = usize;

/// Binding strength of a rendered fragment, loosest first.
///
/// Used to decide where parentheses are needed when a tree is turned back
/// into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Equation,
    Sum,
    Product,
    Power,
    Atom,
}

/// A single tree node.
///
/// `left`/`right` own their subtrees; `parent` is only meaningful while the
/// parser is still building the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub token: Token,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
    /// Trig/Log/Sqrt/Diff marker scoping this subtree as a function argument
    pub special: Option<Token>,
    pub function: Option<Function>,
    /// The subtree has been pruned to its final value
    pub reduced: bool,
    /// The operation could not combine its operands; skipped by the reducer
    pub deferred: bool,
    /// A sign with no written left operand, such as `-x`; the left child is a
    /// synthetic `0`
    pub unary: bool,
}

impl Node {
    pub fn new(token: Token) -> Self {
        Node {
            token,
            left: None,
            right: None,
            parent: None,
            special: None,
            function: None,
            reduced: false,
            deferred: false,
            unary: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Reduced or deferred nodes are never picked for reduction again.
    pub fn is_settled(&self) -> bool {
        self.reduced || self.deferred
    }
}

/// Arena-backed expression tree.
///
/// Nodes detached during reduction stay in the arena but are no longer
/// reachable from [`Ast::root`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        Ast { nodes, root }
    }

    /// A single-node tree.
    pub fn leaf(token: Token) -> Self {
        Ast {
            nodes: vec![Node::new(token)],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = id;
        self.nodes[id].parent = None;
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Number of nodes in the arena, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Add a leaf holding `function`, already reduced.
    pub fn push_value(&mut self, function: Function) -> NodeId {
        let mut node = Node::new(function.to_token());
        node.function = Some(function);
        node.reduced = true;
        self.push(node)
    }

    /// Add an operator node over two existing subtrees.
    pub fn push_binary(&mut self, token: Token, left: NodeId, right: NodeId) -> NodeId {
        let mut node = Node::new(token);
        node.left = Some(left);
        node.right = Some(right);
        let id = self.push(node);
        self.nodes[left].parent = Some(id);
        self.nodes[right].parent = Some(id);
        id
    }

    /// Point `id` at new children.
    pub fn replace_children(&mut self, id: NodeId, left: NodeId, right: NodeId) {
        self.nodes[id].left = Some(left);
        self.nodes[id].right = Some(right);
        self.nodes[left].parent = Some(id);
        self.nodes[right].parent = Some(id);
    }

    /// Turn `id` into a leaf holding `function`.
    pub fn collapse(&mut self, id: NodeId, function: Function) {
        let node = &mut self.nodes[id];
        node.token = function.to_token();
        node.left = None;
        node.right = None;
        node.function = Some(function);
        node.reduced = true;
        node.deferred = false;
        node.unary = false;
    }

    /// Node ids of the subtree at `id` in prefix order.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            let node = &self.nodes[current];
            if let Some(right) = node.right {
                stack.push(right);
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
        }
        order
    }

    /// Recursive structural equality: same token text and special text at
    /// every corresponding position.
    pub fn same_shape(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let mut stack = vec![(Some(a), Some(b))];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(x), Some(y)) => {
                    let (nx, ny) = (&self.nodes[x], &other.nodes[y]);
                    if nx.token.text != ny.token.text {
                        return false;
                    }
                    let sx = nx.special.as_ref().map(|t| t.text.as_str());
                    let sy = ny.special.as_ref().map(|t| t.text.as_str());
                    if sx != sy {
                        return false;
                    }
                    stack.push((nx.left, ny.left));
                    stack.push((nx.right, ny.right));
                }
                _ => return false,
            }
        }
        true
    }

    /// Copy the subtree at `id` into a fresh tree, keeping tokens and special
    /// markers only. The special marker of the copied root is dropped.
    pub fn extract(&self, id: NodeId) -> Ast {
        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<(NodeId, Option<NodeId>, bool)> = vec![(id, None, false)];

        while let Some((source, parent, is_left)) = stack.pop() {
            let original = &self.nodes[source];
            let copy_id = nodes.len();
            let mut copy = Node::new(original.token.clone());
            copy.parent = parent;
            copy.special = original.special.clone();
            copy.reduced = original.reduced;
            copy.unary = original.unary;
            nodes.push(copy);

            if let Some(p) = parent {
                if is_left {
                    nodes[p].left = Some(copy_id);
                } else {
                    nodes[p].right = Some(copy_id);
                }
            }
            if let Some(right) = original.right {
                stack.push((right, Some(copy_id), false));
            }
            if let Some(left) = original.left {
                stack.push((left, Some(copy_id), true));
            }
        }

        nodes[0].special = None;
        Ast { nodes, root: 0 }
    }

    /// Render the whole tree as text.
    pub fn render(&self) -> String {
        self.render_node(self.root).0
    }

    /// Render the subtree at `id` together with its binding strength.
    ///
    /// Operands are rendered bottom-up from an explicit stack, so the depth of
    /// the tree is not limited by the call stack.
    pub fn render_node(&self, id: NodeId) -> (String, Precedence) {
        let mut stack = vec![Visit::Enter(id)];
        let mut rendered: Vec<(String, Precedence)> = Vec::new();

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(current) => {
                    if !self.needs_operands(current) {
                        rendered.push(self.compose(current, None, None));
                        continue;
                    }
                    let node = &self.nodes[current];
                    stack.push(Visit::Exit(current));
                    stack.extend(node.right.map(Visit::Enter));
                    stack.extend(node.left.map(Visit::Enter));
                }
                Visit::Exit(current) => {
                    let node = &self.nodes[current];
                    let right = node.right.and_then(|_| rendered.pop());
                    let left = node.left.and_then(|_| rendered.pop());
                    rendered.push(self.compose(current, left, right));
                }
            }
        }

        rendered.pop().unwrap_or((String::new(), Precedence::Atom))
    }

    /// Whether rendering `id` uses the renderings of its children.
    fn needs_operands(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if node.is_leaf() {
            return false;
        }
        let numeric_call = matches!(
            node.special.as_ref().map(|t| t.kind),
            Some(TokenKind::Trig | TokenKind::Log)
        ) && node
            .function
            .as_ref()
            .is_some_and(Function::has_numeric_argument);
        !numeric_call
    }

    fn compose(&self, id: NodeId, left: Option<Rendered>, right: Option<Rendered>) -> Rendered {
        let node = &self.nodes[id];
        match &node.special {
            Some(special) => self.compose_special(id, special, left, right),
            None if node.is_leaf() => match &node.function {
                Some(function) => (function.to_string(), function.precedence()),
                None => render_token(&node.token),
            },
            None => self.compose_operator(id, left, right),
        }
    }

    fn compose_special(
        &self,
        id: NodeId,
        special: &Token,
        left: Option<Rendered>,
        right: Option<Rendered>,
    ) -> Rendered {
        let node = &self.nodes[id];
        match (special.kind, &node.function) {
            (TokenKind::Trig | TokenKind::Log, Some(function)) => {
                if function.has_numeric_argument() {
                    (function.to_string(), function.precedence())
                } else {
                    let argument = self.compose_argument(id, left, right);
                    (
                        function.render_with_argument(&argument),
                        function.precedence(),
                    )
                }
            }
            (TokenKind::Diff, Some(function)) if node.is_leaf() => {
                (format!("diff({})", function), Precedence::Atom)
            }
            _ => (
                format!("{}({})", special.text, self.compose_argument(id, left, right)),
                Precedence::Atom,
            ),
        }
    }

    /// A special node's own subtree, ignoring the marker and the function
    /// attached on top of it.
    fn compose_argument(
        &self,
        id: NodeId,
        left: Option<Rendered>,
        right: Option<Rendered>,
    ) -> String {
        let node = &self.nodes[id];
        if node.is_leaf() {
            node.token.text.clone()
        } else {
            self.compose_operator(id, left, right).0
        }
    }

    fn compose_operator(
        &self,
        id: NodeId,
        left: Option<Rendered>,
        right: Option<Rendered>,
    ) -> Rendered {
        let node = &self.nodes[id];
        let (left, left_prec) = left.unwrap_or((String::new(), Precedence::Atom));
        let (right, right_prec) = right.unwrap_or((String::new(), Precedence::Atom));

        if node.unary {
            return (
                format!("{}{}", node.token.text, wrap(right, right_prec, Precedence::Product)),
                Precedence::Sum,
            );
        }
        if self.is_unit_coefficient(id) {
            return (right, right_prec);
        }

        let own = match node.token.kind {
            TokenKind::Equal => return (format!("{} = {}", left, right), Precedence::Equation),
            // Grouping node around a nested function call
            TokenKind::LParen => return (left, left_prec),
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Mul | TokenKind::Div => Precedence::Product,
            TokenKind::Power => Precedence::Power,
            _ => Precedence::Atom,
        };

        // Left-grouping tiers need a strictly tighter right operand; power
        // groups right, so its base must be atomic instead.
        let (left_min, right_min) = match own {
            Precedence::Power => (Precedence::Atom, Precedence::Power),
            Precedence::Sum => (Precedence::Sum, Precedence::Product),
            Precedence::Product => (Precedence::Product, Precedence::Power),
            _ => (Precedence::Equation, Precedence::Equation),
        };

        (
            format!(
                "{}{}{}",
                wrap(left, left_prec, left_min),
                node.token.text,
                wrap(right, right_prec, right_min)
            ),
            own,
        )
    }

    /// The lexer's `1 *` in front of a coefficient-less variable term.
    fn is_unit_coefficient(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if node.token.kind != TokenKind::Mul || !node.token.is_synthetic() {
            return false;
        }
        node.left.is_some_and(|l| {
            let left = &self.nodes[l];
            left.is_leaf() && left.special.is_none() && left.token.text == "1"
        })
    }
}

type Rendered = (String, Precedence);

/// Post-order rendering work item.
enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

fn wrap(text: String, actual: Precedence, required: Precedence) -> String {
    if actual < required {
        format!("({})", text)
    } else {
        text
    }
}

fn render_token(token: &Token) -> (String, Precedence) {
    match token.kind {
        TokenKind::Factorial => (format!("{}!", token.text), Precedence::Atom),
        TokenKind::Number if token.text.starts_with('-') => (token.text.clone(), Precedence::Sum),
        _ => (token.text.clone(), Precedence::Atom),
    }
}
