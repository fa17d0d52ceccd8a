use std::{any::Any, fmt::Display, slice::Iter};

use crate::{errors::errors::Error, Span};

use super::{
    ast::{expect_node, malformed, take_values, Node, NodeType, NodeWrapper, Value},
    expressions::StringLiteral,
};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<NodeWrapper>,
    pub span: Span,
}

impl BlockStmt {
    /// Statements are collected in source order; absent slots left by empty
    /// statements between terminators are dropped.
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let mut body = Vec::new();
        values
            .into_iter()
            .for_each(|value| value.collect_nodes(&mut body));

        Ok(NodeWrapper::new(BlockStmt { body, span }))
    }

    pub fn iter(&self) -> Iter<'_, NodeWrapper> {
        self.body.iter()
    }
}

impl Node for BlockStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::Block
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

impl Display for BlockStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(block")?;
        for stmt in self.iter() {
            write!(f, " {}", stmt)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub path: String,
    pub span: Span,
}

impl ImportStmt {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [path] = take_values::<1>(NodeType::Import, values, &span)?;
        let path = expect_node(NodeType::Import, path, &span)?;

        let Some(literal) = path.downcast_ref::<StringLiteral>() else {
            return Err(malformed(NodeType::Import, "expected a string path", &span));
        };

        Ok(NodeWrapper::new(ImportStmt {
            path: literal.value.clone(),
            span,
        }))
    }
}

impl Node for ImportStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::Import
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

impl Display for ImportStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(import {:?})", self.path)
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: NodeWrapper,
    pub then_body: NodeWrapper,
    pub else_body: Option<NodeWrapper>,
    pub span: Span,
}

impl IfStmt {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [condition, then_body, else_body] = take_values::<3>(NodeType::If, values, &span)?;

        let else_body = if else_body.is_absent() {
            None
        } else {
            Some(expect_node(NodeType::If, else_body, &span)?)
        };

        Ok(NodeWrapper::new(IfStmt {
            condition: expect_node(NodeType::If, condition, &span)?,
            then_body: expect_node(NodeType::If, then_body, &span)?,
            else_body,
            span,
        }))
    }
}

impl Node for IfStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::If
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

impl Display for IfStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(if {} {}", self.condition, self.then_body)?;
        if let Some(else_body) = &self.else_body {
            write!(f, " {}", else_body)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: NodeWrapper,
    pub body: NodeWrapper,
    pub span: Span,
}

impl WhileStmt {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [condition, body] = take_values::<2>(NodeType::While, values, &span)?;

        Ok(NodeWrapper::new(WhileStmt {
            condition: expect_node(NodeType::While, condition, &span)?,
            body: expect_node(NodeType::While, body, &span)?,
            span,
        }))
    }
}

impl Node for WhileStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::While
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

impl Display for WhileStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(while {} {})", self.condition, self.body)
    }
}

/// For Statement
/// Any header clause may be an `EmptyStmt`.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub initializer: NodeWrapper,
    pub condition: NodeWrapper,
    pub step: NodeWrapper,
    pub body: NodeWrapper,
    pub span: Span,
}

impl ForStmt {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        let [initializer, condition, step, body] = take_values::<4>(NodeType::For, values, &span)?;

        Ok(NodeWrapper::new(ForStmt {
            initializer: expect_node(NodeType::For, initializer, &span)?,
            condition: expect_node(NodeType::For, condition, &span)?,
            step: expect_node(NodeType::For, step, &span)?,
            body: expect_node(NodeType::For, body, &span)?,
            span,
        }))
    }
}

impl Node for ForStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::For
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

impl Display for ForStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(for {} {} {} {})",
            self.initializer, self.condition, self.step, self.body
        )
    }
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

impl BreakStmt {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        take_values::<0>(NodeType::Break, values, &span)?;

        Ok(NodeWrapper::new(BreakStmt { span }))
    }
}

impl Node for BreakStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::Break
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

impl Display for BreakStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(break)")
    }
}

/// Empty Statement
/// The sentinel for a bare terminator or an omitted `for` clause.
#[derive(Debug, Clone)]
pub struct EmptyStmt {
    pub span: Span,
}

impl EmptyStmt {
    pub fn construct(values: Vec<Value>, span: Span) -> Result<NodeWrapper, Error> {
        take_values::<0>(NodeType::Empty, values, &span)?;

        Ok(NodeWrapper::new(EmptyStmt { span }))
    }
}

impl Node for EmptyStmt {
    fn get_node_type(&self) -> NodeType {
        NodeType::Empty
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

impl Display for EmptyStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(empty)")
    }
}
