//! Unit tests for error handling.

use crate::errors::errors::{format_kinds, Error, ErrorImpl, ErrorTip};
use crate::lexer::tokens::TokenKind;
use crate::Position;
use std::rc::Rc;

fn position(offset: u32) -> Position {
    Position(offset, Rc::new("test.hobby".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_unexpected_token_expected_kinds() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
            expected: vec![TokenKind::Semicolon, TokenKind::EOL],
        },
        position(3),
    );

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.expected(), &[TokenKind::Semicolon, TokenKind::EOL]);
    assert!(error.is_mismatch());
}

#[test]
fn test_alternatives_exhausted_is_mismatch() {
    let error = Error::new(
        ErrorImpl::AlternativesExhausted {
            token: "EOF".to_string(),
            expected: vec![TokenKind::Number],
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "AlternativesExhausted");
    assert!(error.is_mismatch());
}

#[test]
fn test_structural_errors_are_not_mismatches() {
    let error = Error::structural(ErrorImpl::UntaggedSequence { rule: 4, captures: 2 });

    assert_eq!(error.get_error_name(), "UntaggedSequence");
    assert!(!error.is_mismatch());
    assert!(error.expected().is_empty());
    assert_eq!(*error.get_position(), Position::null());
}

#[test]
fn test_malformed_node_error() {
    let error = Error::new(
        ErrorImpl::MalformedNode {
            node: "Binary".to_string(),
            message: "expected 3 children".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "MalformedNode");
    assert!(!error.is_mismatch());
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
            expected: vec![TokenKind::CloseParen],
        },
        position(0),
    );

    assert_eq!(
        error.get_tip().to_string(),
        "Unexpected token: `}`, expected CloseParen"
    );
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "+".to_string(),
            expected: vec![TokenKind::Number, TokenKind::Identifier],
        },
        position(7),
    );

    assert_eq!(
        error.to_string(),
        "unexpected token \"+\", expected one of Number, Identifier at test.hobby:7"
    );
}

#[test]
fn test_format_kinds() {
    assert_eq!(format_kinds(&[]), "nothing");
    assert_eq!(format_kinds(&[TokenKind::Comma]), "Comma");
    assert_eq!(
        format_kinds(&[TokenKind::Comma, TokenKind::Semicolon]),
        "one of Comma, Semicolon"
    );
}

#[test]
fn test_duplicate_operator_error() {
    let error = Error::structural(ErrorImpl::DuplicateOperator {
        operator: TokenKind::Plus,
    });

    assert_eq!(error.get_error_name(), "DuplicateOperator");
    assert_eq!(error.get_internal().to_string(), "operator Plus registered twice");
}

#[test]
fn test_found_token() {
    let error = Error::new(
        ErrorImpl::NumberParseError {
            token: "1.2.3".to_string(),
        },
        position(0),
    );
    assert_eq!(error.found_token(), Some("1.2.3"));

    let error = Error::structural(ErrorImpl::EmptyAlternation { rule: 0 });
    assert_eq!(error.found_token(), None);
}
