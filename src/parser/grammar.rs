//! Grammar graphs and the fluent API used to declare them.
//!
//! Rules live in an arena and refer to each other through `RuleId` handles,
//! so a rule may reference itself or a rule declared after it. Forward
//! references are made with `declare()` and filled in later with `define()`:
//!
//! ```ignore
//! let mut grammar = GrammarBuilder::new();
//! let expr = grammar.declare();
//! let number = grammar.rule().number(NodeType::Number).id();
//! let paren = grammar.rule().sep(&[OpenParen]).ast(expr).sep(&[CloseParen]).id();
//! let primary = grammar.rule().or(&[paren, number]).id();
//! grammar.define(expr).expression(NodeType::Binary, primary, operators);
//! let grammar = grammar.build()?;
//! ```

use std::collections::HashSet;

use log::debug;

use crate::{
    ast::ast::{NodeType, Value},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{engine, lookups::OperatorTable, source::TokenSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One step of a rule's sequence.
#[derive(Debug, Clone)]
pub enum Combinator {
    /// Consumes one token of the given kinds and captures nothing
    Delimiter(Vec<TokenKind>),
    /// Consumes one token and wraps it in a single-value node
    Terminal {
        kinds: Vec<TokenKind>,
        tag: NodeType,
        reject_reserved: bool,
    },
    Capture(RuleId),
    Optional(RuleId),
    Repetition(RuleId),
    Alternation(Vec<RuleId>),
    /// Precedence climbing over `operand` separated by table operators
    Expression {
        tag: NodeType,
        operand: RuleId,
        operators: OperatorTable,
    },
}

impl Combinator {
    fn captures(&self) -> bool {
        !matches!(self, Combinator::Delimiter(_))
    }

    fn references(&self) -> Vec<RuleId> {
        match self {
            Combinator::Delimiter(_) | Combinator::Terminal { .. } => vec![],
            Combinator::Capture(rule)
            | Combinator::Optional(rule)
            | Combinator::Repetition(rule) => vec![*rule],
            Combinator::Alternation(alternatives) => alternatives.clone(),
            Combinator::Expression { operand, .. } => vec![*operand],
        }
    }
}

/// A sequence of combinators, optionally tagged with the node it builds.
///
/// An untagged rule passes its single captured value through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub tag: Option<NodeType>,
    pub sequence: Vec<Combinator>,
    defined: bool,
}

/// Collects rules and grammar configuration until `build()` freezes them.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
    reserved: HashSet<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder::default()
    }

    fn push(&mut self, rule: Rule) -> RuleId {
        self.rules.push(rule);
        RuleId(self.rules.len() - 1)
    }

    /// Declares a placeholder rule to be filled in with `define()`.
    pub fn declare(&mut self) -> RuleId {
        self.push(Rule::default())
    }

    /// Opens a declared rule for definition.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different builder and lies outside
    /// this builder's arena.
    pub fn define(&mut self, id: RuleId) -> RuleBuilder<'_> {
        self.rules[id.0].defined = true;
        RuleBuilder { grammar: self, id }
    }

    pub fn rule(&mut self) -> RuleBuilder<'_> {
        let id = self.push(Rule {
            defined: true,
            ..Rule::default()
        });
        RuleBuilder { grammar: self, id }
    }

    pub fn rule_with(&mut self, tag: NodeType) -> RuleBuilder<'_> {
        let id = self.push(Rule {
            tag: Some(tag),
            sequence: vec![],
            defined: true,
        });
        RuleBuilder { grammar: self, id }
    }

    /// Adds a word identifier terminals must reject.
    pub fn reserve(&mut self, word: &str) {
        self.reserved.insert(word.to_string());
    }

    /// Validates the rule graph and freezes it for parsing.
    ///
    /// # Returns
    ///
    /// An error if a declared rule was never defined, a rule refers to an
    /// unknown rule, an alternation has no branches, or an untagged rule
    /// captures more than one value.
    pub fn build(self) -> Result<Grammar, Error> {
        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.defined {
                return Err(Error::structural(ErrorImpl::UndefinedRule { rule: index }));
            }

            for combinator in &rule.sequence {
                if let Combinator::Alternation(alternatives) = combinator {
                    if alternatives.is_empty() {
                        return Err(Error::structural(ErrorImpl::EmptyAlternation { rule: index }));
                    }
                }

                if let Some(missing) = combinator
                    .references()
                    .into_iter()
                    .find(|reference| reference.0 >= self.rules.len())
                {
                    return Err(Error::structural(ErrorImpl::UndefinedRule { rule: missing.0 }));
                }
            }

            let captures = rule.sequence.iter().filter(|c| c.captures()).count();
            if rule.tag.is_none() && captures > 1 {
                return Err(Error::structural(ErrorImpl::UntaggedSequence {
                    rule: index,
                    captures,
                }));
            }
        }

        debug!(
            "built grammar with {} rules and {} reserved words",
            self.rules.len(),
            self.reserved.len()
        );

        Ok(Grammar {
            rules: self.rules,
            reserved: self.reserved,
        })
    }
}

/// Appends combinators to one rule, in declaration order.
pub struct RuleBuilder<'g> {
    grammar: &'g mut GrammarBuilder,
    id: RuleId,
}

impl RuleBuilder<'_> {
    fn push(self, combinator: Combinator) -> Self {
        self.grammar.rules[self.id.0].sequence.push(combinator);
        self
    }

    fn terminal(self, kinds: &[TokenKind], tag: NodeType, reject_reserved: bool) -> Self {
        self.push(Combinator::Terminal {
            kinds: kinds.to_vec(),
            tag,
            reject_reserved,
        })
    }

    /// Sets the node tag, for rules opened with `define()`.
    pub fn tag(self, tag: NodeType) -> Self {
        self.grammar.rules[self.id.0].tag = Some(tag);
        self
    }

    pub fn sep(self, kinds: &[TokenKind]) -> Self {
        self.push(Combinator::Delimiter(kinds.to_vec()))
    }

    pub fn ast(self, rule: RuleId) -> Self {
        self.push(Combinator::Capture(rule))
    }

    pub fn option(self, rule: RuleId) -> Self {
        self.push(Combinator::Optional(rule))
    }

    pub fn repeat(self, rule: RuleId) -> Self {
        self.push(Combinator::Repetition(rule))
    }

    pub fn or(self, alternatives: &[RuleId]) -> Self {
        self.push(Combinator::Alternation(alternatives.to_vec()))
    }

    pub fn number(self, tag: NodeType) -> Self {
        self.terminal(&[TokenKind::Number], tag, false)
    }

    /// Matches an identifier whose text is not a reserved word.
    pub fn identifier(self, tag: NodeType) -> Self {
        self.terminal(&[TokenKind::Identifier], tag, true)
    }

    pub fn string(self, tag: NodeType) -> Self {
        self.terminal(&[TokenKind::String], tag, false)
    }

    pub fn bool(self, tag: NodeType) -> Self {
        self.terminal(&[TokenKind::True, TokenKind::False], tag, false)
    }

    pub fn null(self, tag: NodeType) -> Self {
        self.terminal(&[TokenKind::Null], tag, false)
    }

    pub fn expression(self, tag: NodeType, operand: RuleId, operators: OperatorTable) -> Self {
        self.push(Combinator::Expression {
            tag,
            operand,
            operators,
        })
    }

    pub fn id(self) -> RuleId {
        self.id
    }
}

/// A validated, read-only rule graph.
///
/// Parsing never mutates the grammar, so one instance can serve any number
/// of token sources.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    reserved: HashSet<String>,
}

impl Grammar {
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    pub fn is_reserved(&self, text: &str) -> bool {
        self.reserved.contains(text)
    }

    /// Matches `root` at the current position of `source`.
    ///
    /// On failure the source is left where it was before the call.
    ///
    /// Evaluation recurses once per nested rule match, so deeply nested
    /// input can exhaust the thread's stack.
    ///
    /// # Panics
    ///
    /// Panics if `root` was issued by a different builder and lies outside
    /// this grammar's arena.
    pub fn parse<S: TokenSource + ?Sized>(&self, root: RuleId, source: &mut S) -> Result<Value, Error> {
        engine::parse(self, root, source)
    }
}
