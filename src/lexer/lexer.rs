use std::rc::Rc;

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(&format!("^(?:{})", regex)).unwrap(),
        handler,
    }
}

lazy_static! {
    // Order matters: longer operators must come before their prefixes
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("\\r?\\n", eol_handler),
        pattern("[ \\t\\r]+", skip_handler),
        pattern("\"([^\"\\\\\\n]|\\\\.)*\"", string_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span covering the next `len` bytes of input.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn ends_with_eol(&self) -> bool {
        matches!(self.tokens.last(), Some(Token { kind: TokenKind::EOL, .. }))
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.to_string(), lexer.span_of(matched.len())));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn eol_handler(lexer: &mut Lexer, matched: &str) {
    lexer.push(MK_TOKEN!(TokenKind::EOL, String::from("EOL"), lexer.span_of(matched.len())));
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span_of(matched.len());
    let literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            Some(other) => {
                // Unknown escape, keep it verbatim
                result.push('\\');
                result.push(*other);
            }
            None => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, matched.to_string(), lexer.span_of(matched.len())));
    lexer.advance_n(matched.len());
}

/// Tokenizes `source` into a stream ending with `EOL` and `EOF`.
///
/// Every non-empty source ends with an `EOL` token even when the text has no
/// trailing newline, so the last statement is always terminated.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .filter(|found| found.end() > 0)
                .map(|found| (pattern.handler, found.end()))
        });

        let Some((handler, end)) = found else {
            let token = lex.remainder().chars().next().unwrap_or_default().to_string();
            return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, lex.position()));
        };

        let matched = lex.remainder()[..end].to_string();
        handler(&mut lex, &matched);
    }

    if !lex.tokens.is_empty() && !lex.ends_with_eol() {
        lex.push(MK_TOKEN!(TokenKind::EOL, String::from("EOL"), lex.span_of(0)));
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), lex.span_of(0)));
    trace!("tokenized {} into {} tokens", lex.file, lex.tokens.len());

    Ok(lex.tokens)
}
