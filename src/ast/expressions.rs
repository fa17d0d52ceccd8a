use std::{any::Any, fmt::Display};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::ast::{
    expect_node, expect_token, malformed, take_values, Node, NodeType, NodeWrapper, Value,
};

// LITERALS

/// Number Literal
/// Holds the parsed value and the source text it came from.
#[derive(Debug, Clone)]
pub struct NumberLiteral {
    pub value: f64,
    pub text: String,
    pub span: Span,
}

impl NumberLiteral {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [token] = take_values::<1>(NodeType::Number, values, &span)?;
        let token = expect_token(NodeType::Number, token, &span)?;

        let value = token.value.parse().map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                span.start.clone(),
            )
        })?;

        Ok(NodeWrapper::new(NumberLiteral {
            value,
            text: token.value,
            span,
        }))
    }
}

impl Node for NumberLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::Number
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Clone)]
pub struct IdentifierLiteral {
    pub name: String,
    pub span: Span,
}

impl IdentifierLiteral {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [token] = take_values::<1>(NodeType::Identifier, values, &span)?;
        let token = expect_token(NodeType::Identifier, token, &span)?;

        Ok(NodeWrapper::new(IdentifierLiteral {
            name: token.value,
            span,
        }))
    }
}

impl Node for IdentifierLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::Identifier
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for IdentifierLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

impl StringLiteral {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [token] = take_values::<1>(NodeType::String, values, &span)?;
        let token = expect_token(NodeType::String, token, &span)?;

        Ok(NodeWrapper::new(StringLiteral {
            value: token.value,
            span,
        }))
    }
}

impl Node for StringLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::String
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

#[derive(Debug, Clone)]
pub struct BoolLiteral {
    pub value: bool,
    pub span: Span,
}

impl BoolLiteral {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [token] = take_values::<1>(NodeType::Bool, values, &span)?;
        let token = expect_token(NodeType::Bool, token, &span)?;

        Ok(NodeWrapper::new(BoolLiteral {
            value: token.kind == TokenKind::True,
            span,
        }))
    }
}

impl Node for BoolLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::Bool
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for BoolLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone)]
pub struct NullLiteral {
    pub span: Span,
}

impl NullLiteral {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [token] = take_values::<1>(NodeType::Null, values, &span)?;
        expect_token(NodeType::Null, token, &span)?;

        Ok(NodeWrapper::new(NullLiteral { span }))
    }
}

impl Node for NullLiteral {
    fn get_node_type(&self) -> NodeType {
        NodeType::Null
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for NullLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "null")
    }
}

// OPERATORS

/// Negative Expression
/// A prefix minus applied to a single operand.
#[derive(Debug, Clone)]
pub struct NegativeExpr {
    pub operand: NodeWrapper,
    pub span: Span,
}

impl NegativeExpr {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [operand] = take_values::<1>(NodeType::Negative, values, &span)?;

        Ok(NodeWrapper::new(NegativeExpr {
            operand: expect_node(NodeType::Negative, operand, &span)?,
            span,
        }))
    }
}

impl Node for NegativeExpr {
    fn get_node_type(&self) -> NodeType {
        NodeType::Negative
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for NegativeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(- {})", self.operand)
    }
}

/// Binary Expression
/// Built by expression rules from `[left, operator, right]`.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: NodeWrapper,
    pub operator: Token,
    pub right: NodeWrapper,
    pub span: Span,
}

impl BinaryExpr {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [left, operator, right] = take_values::<3>(NodeType::Binary, values, &span)?;

        Ok(NodeWrapper::new(BinaryExpr {
            left: expect_node(NodeType::Binary, left, &span)?,
            operator: expect_token(NodeType::Binary, operator, &span)?,
            right: expect_node(NodeType::Binary, right, &span)?,
            span,
        }))
    }
}

impl Node for BinaryExpr {
    fn get_node_type(&self) -> NodeType {
        NodeType::Binary
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.operator.value, self.left, self.right)
    }
}

/// Comma Expression
/// A comma separated expression list, as found in `for` headers. A list of
/// one collapses to the expression itself.
#[derive(Debug, Clone)]
pub struct CommaExpr {
    pub expressions: Vec<NodeWrapper>,
    pub span: Span,
}

impl CommaExpr {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let mut expressions = Vec::new();
        values
            .into_iter()
            .for_each(|value| value.collect_nodes(&mut expressions));

        match expressions.len() {
            0 => Err(malformed(NodeType::Comma, "expected at least one expression", &span)),
            1 => Ok(expressions.remove(0)),
            _ => Ok(NodeWrapper::new(CommaExpr { expressions, span })),
        }
    }
}

impl Node for CommaExpr {
    fn get_node_type(&self) -> NodeType {
        NodeType::Comma
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> NodeWrapper {
        NodeWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

impl Display for CommaExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(,")?;
        for expression in &self.expressions {
            write!(f, " {}", expression)?;
        }
        write!(f, ")")
    }
}
