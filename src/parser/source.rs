//! Token sources the grammar engine reads from.
//!
//! The engine only needs four operations: look ahead, consume, and save or
//! restore a position. All of them must be cheap, since backtracking may
//! revisit the same position once per alternative.

use std::rc::Rc;

use crate::{
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

/// A saved position in a token source. Implementations choose what the
/// index means; the engine only hands marks back to the source that made
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

impl Mark {
    pub fn new(index: usize) -> Self {
        Mark(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

pub trait TokenSource {
    /// Returns the token `offset` places ahead without consuming anything.
    /// Looking past the end yields the `EOF` token.
    fn peek(&self, offset: usize) -> &Token;
    /// Consumes and returns the current token. `EOF` is never consumed past.
    fn next(&mut self) -> Token;
    fn mark(&self) -> Mark;
    fn reset(&mut self, mark: Mark);
}

/// A fully buffered token source.
#[derive(Debug, Clone)]
pub struct TokenStream {
    /// Never empty, always ends with `EOF`
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    /// Wraps `tokens`, appending an `EOF` token when the input lacks one.
    ///
    /// No `EOL` is added. Grammars that end statements with a terminator
    /// need the token list to carry one before `EOF`.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::EOF, .. })) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::new(String::from("shell"))));

            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span {
                    start: end.clone(),
                    end
                }
            ));
        }

        TokenStream { tokens, pos: 0 }
    }

    /// Checks if there are tokens left before `EOF`.
    pub fn has_tokens(&self) -> bool {
        self.peek(0).kind != TokenKind::EOF
    }
}

impl TokenSource for TokenStream {
    fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek(0).clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn mark(&self) -> Mark {
        Mark::new(self.pos)
    }

    fn reset(&mut self, mark: Mark) {
        self.pos = mark.index().min(self.tokens.len() - 1);
    }
}
