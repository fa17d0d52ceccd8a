//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! Grammars are declared as graphs of combinator rules and matched against
//! a token source by a single backtracking evaluator:
//!
//! - grammar: rule arena, fluent builder and validation
//! - engine: the evaluator for sequences, alternation, optional and
//!   repeated matches, and terminals
//! - expr: precedence climbing for binary operator expressions
//! - lookups: operator tables
//! - source: the token source contract and a buffered implementation
//! - parser: the sample scripting language built with all of the above

pub mod engine;
pub mod expr;
pub mod grammar;
pub mod lookups;
pub mod parser;
pub mod source;

#[cfg(test)]
mod tests;
