//! Error types for lexing, grammar construction and parsing.
//!
//! - Error structures with source position information
//! - Variants for input mismatches and grammar-construction faults
//! - Error formatting and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
