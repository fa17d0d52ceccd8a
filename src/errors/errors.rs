use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Errors raised while building a grammar carry no source position.
    pub fn structural(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Token kinds that would have been accepted where the failure happened.
    pub fn expected(&self) -> &[TokenKind] {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { expected, .. }
            | ErrorImpl::AlternativesExhausted { expected, .. } => expected,
            _ => &[],
        }
    }

    /// The offending token text, for errors raised on a token.
    pub fn found_token(&self) -> Option<&str> {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { token }
            | ErrorImpl::UnexpectedToken { token, .. }
            | ErrorImpl::AlternativesExhausted { token, .. }
            | ErrorImpl::NumberParseError { token } => Some(token),
            _ => None,
        }
    }

    /// Whether this is an input mismatch that backtracking may recover from.
    ///
    /// Everything else is a grammar or construction fault and must escape
    /// every alternation unchanged.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::UnexpectedToken { .. } | ErrorImpl::AlternativesExhausted { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::AlternativesExhausted { .. } => "AlternativesExhausted",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::MalformedNode { .. } => "MalformedNode",
            ErrorImpl::UndefinedRule { .. } => "UndefinedRule",
            ErrorImpl::UntaggedSequence { .. } => "UntaggedSequence",
            ErrorImpl::EmptyAlternation { .. } => "EmptyAlternation",
            ErrorImpl::DuplicateOperator { .. } => "DuplicateOperator",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token, expected } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected {}",
                token,
                format_kinds(expected)
            )),
            ErrorImpl::AlternativesExhausted { token, expected } => {
                ErrorTip::Suggestion(format!(
                    "No alternative matched at `{}`, expected {}",
                    token,
                    format_kinds(expected)
                ))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::MalformedNode { node, message } => {
                ErrorTip::Suggestion(format!("Cannot build `{}` node: {}", node, message))
            }
            ErrorImpl::UndefinedRule { rule } => ErrorTip::Suggestion(format!(
                "Rule #{} was declared but never defined",
                rule
            )),
            ErrorImpl::UntaggedSequence { rule, captures } => ErrorTip::Suggestion(format!(
                "Rule #{} captures {} values but has no node tag",
                rule, captures
            )),
            ErrorImpl::EmptyAlternation { rule } => {
                ErrorTip::Suggestion(format!("Rule #{} has an alternation with no branches", rule))
            }
            ErrorImpl::DuplicateOperator { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` is registered twice",
                operator
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

pub fn format_kinds(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => String::from("nothing"),
        [kind] => kind.to_string(),
        _ => {
            let names: Vec<String> = kinds.iter().map(|kind| kind.to_string()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token {token:?}, expected {}", format_kinds(.expected))]
    UnexpectedToken {
        token: String,
        expected: Vec<TokenKind>,
    },
    #[error("no alternative matched at {token:?}, expected {}", format_kinds(.expected))]
    AlternativesExhausted {
        token: String,
        expected: Vec<TokenKind>,
    },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("malformed {node} node: {message}")]
    MalformedNode { node: String, message: String },
    #[error("rule #{rule} declared but never defined")]
    UndefinedRule { rule: usize },
    #[error("rule #{rule} captures {captures} values without a node tag")]
    UntaggedSequence { rule: usize, captures: usize },
    #[error("rule #{rule} has an empty alternation")]
    EmptyAlternation { rule: usize },
    #[error("operator {operator} registered twice")]
    DuplicateOperator { operator: TokenKind },
}
