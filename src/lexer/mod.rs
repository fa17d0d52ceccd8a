//! Lexical analysis for the sample language.
//!
//! Converts source text into the token stream the grammar engine consumes:
//!
//! - Recognition of keywords, identifiers, literals and operators
//! - Line ends become `EOL` tokens (they terminate statements)
//! - Token position tracking for error reporting
//! - Comments and inline whitespace are skipped

pub mod lexer;
pub mod tokens;
