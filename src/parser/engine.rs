//! The grammar evaluator.
//!
//! Every combinator is matched by the same recursive walk over the rule
//! graph. A match either returns the captured value or an error describing
//! the mismatch; on error the cursor is always back where that match began,
//! so callers can try something else from the same spot.

use log::{debug, trace};

use crate::{
    ast::ast::{construct, Value},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    expr::parse_expression,
    grammar::{Combinator, Grammar, RuleId},
    source::{Mark, TokenSource},
};

/// Reads tokens for the evaluator and remembers where the last consumed
/// token ended, so node spans can be closed without looking back.
pub struct Cursor<'s, S: TokenSource + ?Sized> {
    source: &'s mut S,
    last_end: Option<Position>,
}

/// A saved cursor state. Restores must follow a stack discipline: the most
/// recent checkpoint is the first one restored or dropped.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    mark: Mark,
    last_end: Option<Position>,
}

impl<'s, S: TokenSource + ?Sized> Cursor<'s, S> {
    pub fn new(source: &'s mut S) -> Self {
        Cursor {
            source,
            last_end: None,
        }
    }

    pub fn current_token(&self) -> &Token {
        self.source.peek(0)
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    pub fn advance(&mut self) -> Token {
        let token = self.source.next();
        self.last_end = Some(token.span.end.clone());
        token
    }

    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    pub fn save(&self) -> Checkpoint {
        Checkpoint {
            mark: self.source.mark(),
            last_end: self.last_end.clone(),
        }
    }

    pub fn restore(&mut self, checkpoint: &Checkpoint) {
        self.source.reset(checkpoint.mark);
        self.last_end = checkpoint.last_end.clone();
    }

    /// Whether any token was consumed since `checkpoint`.
    pub fn moved_since(&self, checkpoint: &Checkpoint) -> bool {
        self.source.mark() != checkpoint.mark
    }

    /// The span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let end = self.last_end.clone().unwrap_or_else(|| start.clone());
        Span { start, end }
    }

    /// Like `span_from`, but zero width at `start` when nothing was
    /// consumed since `checkpoint`.
    pub fn span_since(&self, checkpoint: &Checkpoint, start: Position) -> Span {
        if self.moved_since(checkpoint) {
            self.span_from(start)
        } else {
            Span {
                start: start.clone(),
                end: start,
            }
        }
    }
}

pub fn parse<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    root: RuleId,
    source: &mut S,
) -> Result<Value, Error> {
    let mut cursor = Cursor::new(source);
    debug!(
        "matching rule #{} at {}",
        root.index(),
        cursor.current_token()
    );

    parse_rule(grammar, &mut cursor, root)
}

/// Matches every combinator of a rule in order, then builds the rule's node
/// from the captured values.
pub fn parse_rule<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    id: RuleId,
) -> Result<Value, Error> {
    let rule = grammar.rule(id);
    let checkpoint = cursor.save();
    let start = cursor.get_position();
    let mut values = Vec::with_capacity(rule.sequence.len());

    for combinator in &rule.sequence {
        match parse_combinator(grammar, cursor, combinator) {
            Ok(Some(value)) => values.push(value),
            Ok(None) => {}
            Err(error) => {
                trace!("rule #{} failed: {}", id.index(), error);
                cursor.restore(&checkpoint);
                return Err(error);
            }
        }
    }

    match rule.tag {
        Some(tag) => {
            let span = cursor.span_since(&checkpoint, start);
            match construct(tag, values, span) {
                Ok(node) => Ok(Value::Node(node)),
                Err(error) => {
                    cursor.restore(&checkpoint);
                    Err(error)
                }
            }
        }
        None if values.len() <= 1 => Ok(values.pop().unwrap_or(Value::Absent)),
        // Only reachable for grammars that skipped validation
        None => Ok(Value::List(values)),
    }
}

fn parse_combinator<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    combinator: &Combinator,
) -> Result<Option<Value>, Error> {
    match combinator {
        Combinator::Delimiter(kinds) => parse_terminal(grammar, cursor, kinds, false).map(|_| None),
        Combinator::Terminal {
            kinds,
            tag,
            reject_reserved,
        } => {
            let token = parse_terminal(grammar, cursor, kinds, *reject_reserved)?;
            let span = token.span.clone();
            construct(*tag, vec![Value::Token(token)], span).map(|node| Some(Value::Node(node)))
        }
        Combinator::Capture(rule) => parse_rule(grammar, cursor, *rule).map(Some),
        Combinator::Optional(rule) => Ok(Some(parse_optional(grammar, cursor, *rule))),
        Combinator::Repetition(rule) => Ok(Some(parse_repetition(grammar, cursor, *rule))),
        Combinator::Alternation(alternatives) => {
            parse_alternation(grammar, cursor, alternatives).map(Some)
        }
        Combinator::Expression {
            tag,
            operand,
            operators,
        } => parse_expression(grammar, cursor, *tag, *operand, operators).map(Some),
    }
}

/// Consumes the current token if it is one of `kinds`.
///
/// With `reject_reserved`, a token whose text is a reserved word never
/// matches.
pub fn parse_terminal<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    kinds: &[TokenKind],
    reject_reserved: bool,
) -> Result<Token, Error> {
    let token = cursor.current_token();
    let reserved = reject_reserved && grammar.is_reserved(&token.value);

    if token.is_one_of(kinds) && !reserved {
        return Ok(cursor.advance());
    }

    Err(Error::new(
        ErrorImpl::UnexpectedToken {
            token: token.value.clone(),
            expected: kinds.to_vec(),
        },
        token.span.start.clone(),
    ))
}

/// Matches `rule` once if possible. Never fails.
pub fn parse_optional<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    rule: RuleId,
) -> Value {
    match parse_rule(grammar, cursor, rule) {
        Ok(value) => value,
        Err(error) => {
            trace!("optional rule #{} absent: {}", rule.index(), error);
            Value::Absent
        }
    }
}

/// Matches `rule` as many times as possible. Never fails.
pub fn parse_repetition<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    rule: RuleId,
) -> Value {
    let mut values = vec![];

    loop {
        let checkpoint = cursor.save();
        match parse_rule(grammar, cursor, rule) {
            Ok(value) => {
                values.push(value);
                // A match that consumed nothing would match forever
                if !cursor.moved_since(&checkpoint) {
                    break;
                }
            }
            Err(error) => {
                trace!(
                    "repetition of rule #{} stopped after {} matches: {}",
                    rule.index(),
                    values.len(),
                    error
                );
                break;
            }
        }
    }

    Value::List(values)
}

/// Tries each alternative in declaration order and commits to the first
/// match.
///
/// When every alternative mismatches, the error carries the last
/// alternative's position and token together with every token kind any
/// alternative would have accepted.
pub fn parse_alternation<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    alternatives: &[RuleId],
) -> Result<Value, Error> {
    let mut expected: Vec<TokenKind> = vec![];
    let mut last_failure: Option<Error> = None;

    for &alternative in alternatives {
        match parse_rule(grammar, cursor, alternative) {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_mismatch() => return Err(error),
            Err(error) => {
                for kind in error.expected() {
                    if !expected.contains(kind) {
                        expected.push(*kind);
                    }
                }
                last_failure = Some(error);
            }
        }
    }

    let (token, position) = match &last_failure {
        Some(error) => (
            error.found_token().unwrap_or_default().to_string(),
            error.get_position().clone(),
        ),
        None => (cursor.current_token().value.clone(), cursor.get_position()),
    };

    Err(Error::new(
        ErrorImpl::AlternativesExhausted { token, expected },
        position,
    ))
}
