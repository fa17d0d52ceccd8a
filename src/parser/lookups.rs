use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Associativity {
    Left,
    Right,
}

/// An operator's binding. Lower precedence numbers bind tighter.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Operator {
    pub precedence: u32,
    pub associativity: Associativity,
}

impl Operator {
    /// Whether this operator, following an operator of `precedence`, belongs
    /// to that operator's right-hand operand.
    pub fn folds_into(&self, precedence: u32) -> bool {
        match self.associativity {
            Associativity::Left => self.precedence < precedence,
            Associativity::Right => self.precedence <= precedence,
        }
    }
}

/// Binary operators an expression rule climbs over.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    operators: HashMap<TokenKind, Operator>,
}

impl OperatorTable {
    pub fn new() -> Self {
        OperatorTable::default()
    }

    /// Registers an operator.
    ///
    /// # Returns
    ///
    /// Returns a `DuplicateOperator` error if `kind` is already registered.
    pub fn add(
        &mut self,
        kind: TokenKind,
        precedence: u32,
        associativity: Associativity,
    ) -> Result<(), Error> {
        if self.operators.contains_key(&kind) {
            return Err(Error::structural(ErrorImpl::DuplicateOperator { operator: kind }));
        }

        self.operators.insert(
            kind,
            Operator {
                precedence,
                associativity,
            },
        );
        Ok(())
    }

    pub fn get(&self, kind: TokenKind) -> Option<Operator> {
        self.operators.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// The binary operators of the sample language, tightest first.
pub fn create_operator_table() -> Result<OperatorTable, Error> {
    let mut table = OperatorTable::new();

    // Multiplicative
    table.add(TokenKind::Star, 3, Associativity::Left)?;
    table.add(TokenKind::Slash, 3, Associativity::Left)?;
    table.add(TokenKind::Percent, 3, Associativity::Left)?;

    // Additive
    table.add(TokenKind::Plus, 4, Associativity::Left)?;
    table.add(TokenKind::Dash, 4, Associativity::Left)?;

    // Relational
    table.add(TokenKind::Less, 6, Associativity::Left)?;
    table.add(TokenKind::LessEquals, 6, Associativity::Left)?;
    table.add(TokenKind::Greater, 6, Associativity::Left)?;
    table.add(TokenKind::GreaterEquals, 6, Associativity::Left)?;
    table.add(TokenKind::Equals, 7, Associativity::Left)?;
    table.add(TokenKind::NotEquals, 7, Associativity::Left)?;

    // Logical
    table.add(TokenKind::And, 11, Associativity::Left)?;
    table.add(TokenKind::Or, 12, Associativity::Left)?;

    table.add(TokenKind::Assignment, 14, Associativity::Right)?;

    Ok(table)
}
