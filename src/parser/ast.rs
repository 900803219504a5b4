// AST (Abstract Syntax Tree) definitions for arithmetic expressions

use rustc_hash::FxHashMap;
use std::fmt;

/// Identifier for AST nodes, assigned in pre-order (root is 0, then the
/// left subtree, then the right subtree)
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Char index into the source
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expression tree node
///
/// Parentheses are not materialized: grouping lives only in the shape of
/// the tree. An operator chain folds into a tree as deep as the chain is
/// long, so walks over the tree keep their own stack rather than recursing.
#[derive(Debug)]
pub enum Expr {
    Literal {
        value: i64,
        location: SourceLocation,
        /// Lexeme length in chars
        width: usize,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        /// Location of the operator
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Literal { location, .. } | Expr::BinaryOp { location, .. } => *location,
        }
    }

    /// Half-open char range `(start, end)` of the source this node covers.
    pub fn span(&self) -> (usize, usize) {
        let mut first = self;
        while let Expr::BinaryOp { left, .. } = first {
            first = &**left;
        }
        let mut last = self;
        while let Expr::BinaryOp { right, .. } = last {
            last = &**right;
        }
        (first.location().offset, last.location().offset + last.width())
    }

    /// Chars covered by the node's own token
    fn width(&self) -> usize {
        match self {
            Expr::Literal { width, .. } => *width,
            Expr::BinaryOp { .. } => 1,
        }
    }

    /// Pre-order walk over this subtree; the n-th node yielded has `NodeId` n.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of `BinaryOp` nodes in this subtree.
    pub fn operation_count(&self) -> usize {
        self.nodes()
            .filter(|node| matches!(node, Expr::BinaryOp { .. }))
            .count()
    }

    /// Render the expression with every node in `resolved` replaced by its
    /// value.
    ///
    /// Uses the minimal parentheses needed to keep the tree shape: a left
    /// operand is wrapped when it binds looser than its parent, a right
    /// operand when it binds no tighter.
    pub fn render_with(&self, resolved: &FxHashMap<NodeId, i64>) -> String {
        let index = TreeIndex::new(self);
        let mut out = String::new();
        let mut pending = vec![Piece::Node(0)];

        while let Some(piece) = pending.pop() {
            let id = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Operator(op) => {
                    out.push(' ');
                    out.push(op.symbol());
                    out.push(' ');
                    continue;
                }
                Piece::Node(id) => id,
            };

            if let Some(value) = resolved.get(&id) {
                push_value(*value, &mut out);
                continue;
            }

            match index.node(id) {
                Expr::Literal { value, .. } => push_value(*value, &mut out),
                Expr::BinaryOp { op, .. } => {
                    let (left, right) = index.operands(id);
                    let wrap_left = index
                        .node(left)
                        .binding(left, resolved)
                        .is_some_and(|p| p < op.precedence());
                    let wrap_right = index
                        .node(right)
                        .binding(right, resolved)
                        .is_some_and(|p| p <= op.precedence());

                    // Popped last-in first-out, so pushed right to left
                    push_operand(&mut pending, right, wrap_right);
                    pending.push(Piece::Operator(*op));
                    push_operand(&mut pending, left, wrap_left);
                }
            }
        }

        out
    }

    /// Precedence of this node as it will be rendered, or `None` for atoms.
    fn binding(&self, id: NodeId, resolved: &FxHashMap<NodeId, i64>) -> Option<u8> {
        if resolved.contains_key(&id) {
            return None;
        }
        match self {
            Expr::Literal { .. } => None,
            Expr::BinaryOp { op, .. } => Some(op.precedence()),
        }
    }
}

// The derived drop glue recurses once per level; unlink nested operations
// onto a worklist instead so chains of any length can be freed.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        detach_operands(self, &mut detached);
        while let Some(mut expr) = detached.pop() {
            detach_operands(&mut expr, &mut detached);
        }
    }
}

fn detach_operands(expr: &mut Expr, detached: &mut Vec<Expr>) {
    if let Expr::BinaryOp { left, right, .. } = expr {
        for operand in [left, right] {
            if matches!(**operand, Expr::BinaryOp { .. }) {
                let stub = Expr::Literal {
                    value: 0,
                    location: operand.location(),
                    width: 0,
                };
                detached.push(std::mem::replace(&mut **operand, stub));
            }
        }
    }
}

/// Pre-order iterator returned by [`Expr::nodes`]
pub struct Nodes<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<&'a Expr> {
        let expr = self.stack.pop()?;
        if let Expr::BinaryOp { left, right, .. } = expr {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(expr)
    }
}

/// Flat pre-order view of a tree, indexed by `NodeId`
///
/// Subtree sizes, spans and depths are computed once up front, so looking
/// up a node's operands or source range is constant time.
pub struct TreeIndex<'a> {
    nodes: Vec<&'a Expr>,
    sizes: Vec<usize>,
    spans: Vec<(usize, usize)>,
    depths: Vec<usize>,
}

impl<'a> TreeIndex<'a> {
    pub fn new(root: &'a Expr) -> Self {
        let nodes: Vec<&'a Expr> = root.nodes().collect();
        let count = nodes.len();

        // Operands always carry larger ids than their operator
        let mut sizes = vec![1; count];
        let mut spans = vec![(0, 0); count];
        for id in (0..count).rev() {
            match nodes[id] {
                Expr::Literal {
                    location, width, ..
                } => spans[id] = (location.offset, location.offset + width),
                Expr::BinaryOp { .. } => {
                    let left = id + 1;
                    let right = left + sizes[left];
                    sizes[id] = 1 + sizes[left] + sizes[right];
                    spans[id] = (spans[left].0, spans[right].1);
                }
            }
        }

        let mut depths = vec![0; count];
        for id in 0..count {
            if let Expr::BinaryOp { .. } = nodes[id] {
                let left = id + 1;
                let right = left + sizes[left];
                depths[left] = depths[id] + 1;
                depths[right] = depths[id] + 1;
            }
        }

        TreeIndex {
            nodes,
            sizes,
            spans,
            depths,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &'a Expr {
        self.nodes[id]
    }

    /// Ids of the left and right operands of the `BinaryOp` at `id`
    pub fn operands(&self, id: NodeId) -> (NodeId, NodeId) {
        let left = id + 1;
        (left, left + self.sizes[left])
    }

    pub fn span(&self, id: NodeId) -> (usize, usize) {
        self.spans[id]
    }

    /// Distance from the root
    pub fn depth(&self, id: NodeId) -> usize {
        self.depths[id]
    }

    /// Ids in evaluation order: both operands, left first, before their
    /// operator.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded || matches!(self.nodes[id], Expr::Literal { .. }) {
                order.push(id);
                continue;
            }
            let (left, right) = self.operands(id);
            stack.push((id, true));
            stack.push((right, false));
            stack.push((left, false));
        }

        order
    }
}

enum Piece {
    Node(NodeId),
    Operator(BinOp),
    Text(&'static str),
}

fn push_operand(pending: &mut Vec<Piece>, id: NodeId, wrap: bool) {
    if wrap {
        pending.push(Piece::Text(")"));
        pending.push(Piece::Node(id));
        pending.push(Piece::Text("("));
    } else {
        pending.push(Piece::Node(id));
    }
}

// Negative values only arise from reductions; parenthesize them so the
// rendered text stays parseable.
fn push_value(value: i64, out: &mut String) {
    if value < 0 {
        out.push_str(&format!("({})", value));
    } else {
        out.push_str(&value.to_string());
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&FxHashMap::default()))
    }
}
