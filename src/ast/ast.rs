use std::{
    any::Any,
    collections::HashMap,
    fmt::{Debug, Display},
    ops::Deref,
};

use lazy_static::lazy_static;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    Span,
};

use super::{
    expressions::{
        BinaryExpr, BoolLiteral, CommaExpr, IdentifierLiteral, NegativeExpr, NullLiteral,
        NumberLiteral, StringLiteral,
    },
    statements::{BlockStmt, BreakStmt, EmptyStmt, ForStmt, IfStmt, ImportStmt, WhileStmt},
};

/// Node Types
///
/// The tags a grammar attaches to its rules. Each tag names one node shape
/// and one constructor in `NODE_LOOKUP`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum NodeType {
    Number,
    Identifier,
    String,
    Bool,
    Null,
    Negative,
    Binary,
    Comma,
    Import,
    Block,
    If,
    While,
    For,
    Break,
    Empty,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Node Trait
///
/// Defines the behavior of every AST node. `Display` renders the node as an
/// s-expression.
pub trait Node: Debug + Display {
    /// Returns the tag the node was built from.
    fn get_node_type(&self) -> NodeType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Clones the node into a NodeWrapper.
    /// Clone cannot be derived for trait objects, so this method is necessary.
    fn clone_wrapper(&self) -> NodeWrapper;
    /// Returns the span of the node.
    fn get_span(&self) -> &Span;
}

/// Node Wrapper
///
/// A wrapper that allows for any node kind to be stored with helper methods
#[derive(Debug)]
pub struct NodeWrapper(Box<dyn Node>);

impl NodeWrapper {
    pub fn new<T: Node + 'static>(node: T) -> Self {
        NodeWrapper(Box::new(node))
    }

    pub fn downcast_ref<T: Node + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Deref for NodeWrapper {
    type Target = Box<dyn Node>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Node for NodeWrapper {
    fn get_node_type(&self) -> NodeType {
        self.0.get_node_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &Span {
        self.0.get_span()
    }
}

impl Display for NodeWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Clone for NodeWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

/// A value captured while matching a rule.
///
/// Node constructors receive these in the order the rule declared them.
#[derive(Debug, Clone)]
pub enum Value {
    /// A consumed token (terminal literal or binary operator)
    Token(Token),
    Node(NodeWrapper),
    /// An `option` whose rule did not match
    Absent,
    /// The matches of a `repeat`, possibly empty
    List(Vec<Value>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn into_node(self) -> Option<NodeWrapper> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Collects every node in the value, flattening lists and dropping
    /// absent markers.
    pub fn collect_nodes(self, nodes: &mut Vec<NodeWrapper>) {
        match self {
            Value::Node(node) => nodes.push(node),
            Value::List(values) => values.into_iter().for_each(|value| value.collect_nodes(nodes)),
            Value::Token(_) | Value::Absent => {}
        }
    }
}

pub type NodeConstructor = fn(Vec<Value>, Span) -> Result<NodeWrapper, Error>;

lazy_static! {
    pub static ref NODE_LOOKUP: HashMap<NodeType, NodeConstructor> = {
        let mut map: HashMap<NodeType, NodeConstructor> = HashMap::new();
        map.insert(NodeType::Number, NumberLiteral::construct);
        map.insert(NodeType::Identifier, IdentifierLiteral::construct);
        map.insert(NodeType::String, StringLiteral::construct);
        map.insert(NodeType::Bool, BoolLiteral::construct);
        map.insert(NodeType::Null, NullLiteral::construct);
        map.insert(NodeType::Negative, NegativeExpr::construct);
        map.insert(NodeType::Binary, BinaryExpr::construct);
        map.insert(NodeType::Comma, CommaExpr::construct);
        map.insert(NodeType::Import, ImportStmt::construct);
        map.insert(NodeType::Block, BlockStmt::construct);
        map.insert(NodeType::If, IfStmt::construct);
        map.insert(NodeType::While, WhileStmt::construct);
        map.insert(NodeType::For, ForStmt::construct);
        map.insert(NodeType::Break, BreakStmt::construct);
        map.insert(NodeType::Empty, EmptyStmt::construct);
        map
    };
}

/// Builds the node named by `tag` from the values a rule captured.
pub fn construct(tag: NodeType, values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
    match NODE_LOOKUP.get(&tag) {
        Some(constructor) => constructor(values, span),
        None => Err(malformed(tag, "no constructor registered", &span)),
    }
}

pub fn malformed(tag: NodeType, message: &str, span: &Span) -> Error {
    Error::new(
        ErrorImpl::MalformedNode {
            node: tag.to_string(),
            message: message.to_string(),
        },
        span.start.clone(),
    )
}

/// Takes exactly `N` values or reports a malformed node.
pub fn take_values<const N: usize>(
    tag: NodeType,
    values: Vec<Value>,
    span: &Span,
) -> Result<[Value; N], Error> {
    let found = values.len();
    values
        .try_into()
        .map_err(|_| malformed(tag, &format!("expected {} values, found {}", N, found), span))
}

pub fn expect_node(tag: NodeType, value: Value, span: &Span) -> Result<NodeWrapper, Error> {
    value
        .into_node()
        .ok_or_else(|| malformed(tag, "expected a node value", span))
}

pub fn expect_token(tag: NodeType, value: Value, span: &Span) -> Result<Token, Error> {
    match value {
        Value::Token(token) => Ok(token),
        _ => Err(malformed(tag, "expected a token value", span)),
    }
}
