//! The sample scripting language, declared on top of the grammar engine.
//!
//! A program is a sequence of units, each a statement (or nothing) followed
//! by `;` or a line end. Statements are `if`, `while`, `for`, `break`,
//! `import` and bare expressions; blocks hold statements separated the same
//! way.

use log::debug;

use crate::{
    ast::ast::{Node, NodeType, NodeWrapper},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind, RESERVED_LOOKUP},
};

use super::{
    grammar::{Grammar, GrammarBuilder, RuleId},
    lookups::create_operator_table,
    source::{TokenSource, TokenStream},
};

/// A compiled grammar for the sample language.
///
/// Building the grammar is the expensive part; one `ScriptParser` can parse
/// any number of token sources.
///
/// Evaluation is recursive, one native stack frame chain per nesting level
/// of the input. Deeply nested input (a few hundred parentheses on a default
/// test thread) can exhaust the stack.
#[derive(Debug)]
pub struct ScriptParser {
    grammar: Grammar,
    /// One terminated statement
    program: RuleId,
    expression: RuleId,
}

impl ScriptParser {
    pub fn new() -> Result<Self, Error> {
        let mut g = GrammarBuilder::new();
        for word in RESERVED_LOOKUP.keys() {
            g.reserve(word);
        }

        let expr = g.declare();
        let statement = g.declare();

        // Expressions
        let paren = g
            .rule()
            .sep(&[TokenKind::OpenParen])
            .ast(expr)
            .sep(&[TokenKind::CloseParen])
            .id();
        let number = g.rule().number(NodeType::Number).id();
        let identifier = g.rule().identifier(NodeType::Identifier).id();
        let string = g.rule().string(NodeType::String).id();
        let boolean = g.rule().bool(NodeType::Bool).id();
        let null = g.rule().null(NodeType::Null).id();
        let primary = g
            .rule()
            .or(&[paren, number, identifier, string, boolean, null])
            .id();

        let negative = g
            .rule_with(NodeType::Negative)
            .sep(&[TokenKind::Dash])
            .ast(primary)
            .id();
        let factor = g.rule().or(&[negative, primary]).id();

        g.define(expr)
            .expression(NodeType::Binary, factor, create_operator_table()?);

        // Statements
        let empty = g.rule_with(NodeType::Empty).id();
        let import = g
            .rule_with(NodeType::Import)
            .sep(&[TokenKind::Import])
            .ast(string)
            .id();
        let simple = g.rule().or(&[expr, import]).id();

        let separated = g
            .rule()
            .sep(&[TokenKind::Semicolon, TokenKind::EOL])
            .option(statement)
            .id();
        let block = g
            .rule_with(NodeType::Block)
            .sep(&[TokenKind::OpenCurly])
            .option(statement)
            .repeat(separated)
            .sep(&[TokenKind::CloseCurly])
            .id();

        let else_branch = g.rule().sep(&[TokenKind::Else]).ast(block).id();
        let if_stmt = g
            .rule_with(NodeType::If)
            .sep(&[TokenKind::If])
            .sep(&[TokenKind::OpenParen])
            .ast(expr)
            .sep(&[TokenKind::CloseParen])
            .ast(block)
            .option(else_branch)
            .id();

        let while_stmt = g
            .rule_with(NodeType::While)
            .sep(&[TokenKind::While])
            .sep(&[TokenKind::OpenParen])
            .ast(expr)
            .sep(&[TokenKind::CloseParen])
            .ast(block)
            .id();

        let next_clause = g.rule().sep(&[TokenKind::Comma]).ast(expr).id();
        let clauses = g
            .rule_with(NodeType::Comma)
            .ast(expr)
            .repeat(next_clause)
            .id();
        let for_stmt = g
            .rule_with(NodeType::For)
            .sep(&[TokenKind::For])
            .sep(&[TokenKind::OpenParen])
            .or(&[clauses, empty])
            .sep(&[TokenKind::Semicolon])
            .or(&[expr, empty])
            .sep(&[TokenKind::Semicolon])
            .or(&[clauses, empty])
            .sep(&[TokenKind::CloseParen])
            .ast(block)
            .id();

        let break_stmt = g
            .rule_with(NodeType::Break)
            .sep(&[TokenKind::Break])
            .id();

        g.define(statement)
            .or(&[if_stmt, while_stmt, for_stmt, break_stmt, simple]);

        // Both branches consume their own terminator
        let terminated = g
            .rule()
            .ast(statement)
            .sep(&[TokenKind::Semicolon, TokenKind::EOL])
            .id();
        let blank = g
            .rule_with(NodeType::Empty)
            .sep(&[TokenKind::Semicolon, TokenKind::EOL])
            .id();
        let program = g.rule().or(&[terminated, blank]).id();

        Ok(ScriptParser {
            grammar: g.build()?,
            program,
            expression: expr,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parses one terminated statement. A bare terminator yields an
    /// `Empty` node.
    pub fn parse_statement<S: TokenSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<NodeWrapper, Error> {
        self.parse_node(self.program, source)
    }

    /// Parses a single expression, leaving whatever follows it unconsumed.
    pub fn parse_expression<S: TokenSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<NodeWrapper, Error> {
        self.parse_node(self.expression, source)
    }

    fn parse_node<S: TokenSource + ?Sized>(
        &self,
        rule: RuleId,
        source: &mut S,
    ) -> Result<NodeWrapper, Error> {
        let position = source.peek(0).span.start.clone();
        let value = self.grammar.parse(rule, source)?;

        value.into_node().ok_or_else(|| {
            Error::new(
                ErrorImpl::MalformedNode {
                    node: format!("rule #{}", rule.index()),
                    message: String::from("matched without producing a node"),
                },
                position,
            )
        })
    }
}

/// Parses a whole token stream into its statements.
///
/// Every statement, the last one included, must be followed by `;` or
/// `EOL`. `tokenize` appends a final `EOL`; hand-built token lists ending
/// in a bare statement fail at `EOF`.
///
/// Empty statements left by blank lines and stray terminators are dropped.
/// Parsing stops at the first statement that fails to match.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<NodeWrapper>, Error> {
    let parser = ScriptParser::new()?;
    let mut stream = TokenStream::new(tokens);
    let mut body = vec![];

    while stream.has_tokens() {
        let stmt = parser.parse_statement(&mut stream)?;
        if stmt.get_node_type() != NodeType::Empty {
            debug!("parsed statement {}", stmt);
            body.push(stmt);
        }
    }

    Ok(body)
}
