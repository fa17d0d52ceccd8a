use log::trace;

use crate::{
    ast::ast::{construct, NodeType, Value},
    errors::errors::Error,
    Position,
};

use super::{
    engine::{parse_rule, Cursor},
    grammar::{Grammar, RuleId},
    lookups::{Operator, OperatorTable},
    source::TokenSource,
};

/// Parses `operand` separated by binary operators from `operators`,
/// folding the operands into `tag` nodes by precedence climbing.
///
/// A token that is not in the table ends the expression unconsumed.
pub fn parse_expression<S: TokenSource + ?Sized>(
    grammar: &Grammar,
    cursor: &mut Cursor<'_, S>,
    tag: NodeType,
    operand: RuleId,
    operators: &OperatorTable,
) -> Result<Value, Error> {
    let checkpoint = cursor.save();
    let start = cursor.get_position();
    let left = parse_rule(grammar, cursor, operand)?;

    let climber = Climber {
        grammar,
        tag,
        operand,
        operators,
    };

    match climber.climb(cursor, left, start, None) {
        Ok(value) => Ok(value),
        Err(error) => {
            cursor.restore(&checkpoint);
            Err(error)
        }
    }
}

struct Climber<'g> {
    grammar: &'g Grammar,
    tag: NodeType,
    operand: RuleId,
    operators: &'g OperatorTable,
}

impl Climber<'_> {
    /// Folds operators into `left` while they bind tighter than `limit`.
    /// Without a limit every operator in the table is folded.
    fn climb<S: TokenSource + ?Sized>(
        &self,
        cursor: &mut Cursor<'_, S>,
        mut left: Value,
        start: Position,
        limit: Option<u32>,
    ) -> Result<Value, Error> {
        while let Some(operator) = self.operators.get(cursor.current_token_kind()) {
            if let Some(limit) = limit {
                if !operator.folds_into(limit) {
                    break;
                }
            }

            left = self.shift(cursor, left, start.clone(), operator)?;
        }

        Ok(left)
    }

    /// Consumes one operator and its right-hand side, then builds the node.
    fn shift<S: TokenSource + ?Sized>(
        &self,
        cursor: &mut Cursor<'_, S>,
        left: Value,
        start: Position,
        operator: Operator,
    ) -> Result<Value, Error> {
        let token = cursor.advance();
        trace!("shifting {} at precedence {}", token, operator.precedence);

        let right_start = cursor.get_position();
        let right = parse_rule(self.grammar, cursor, self.operand)?;
        let right = self.climb(cursor, right, right_start, Some(operator.precedence))?;

        let span = cursor.span_from(start);
        let node = construct(self.tag, vec![left, Value::Token(token), right], span)?;

        Ok(Value::Node(node))
    }
}
