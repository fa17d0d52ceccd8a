//! Unit tests for the parser module.
//!
//! - Grammar construction and validation
//! - Backtracking, optional and repeated matches
//! - Operator precedence and associativity
//! - Statements of the sample language

use std::rc::Rc;

use crate::{
    ast::ast::{Node, NodeType, Value},
    errors::errors::ErrorImpl,
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span, MK_TOKEN,
};

use super::{
    grammar::GrammarBuilder,
    lookups::{Associativity, OperatorTable},
    parser::{parse, ScriptParser},
    source::{TokenSource, TokenStream},
};

fn token(kind: TokenKind, value: &str, offset: u32) -> Token {
    let file = Rc::new(String::from("test.hobby"));
    MK_TOKEN!(
        kind,
        value.to_string(),
        Span {
            start: Position(offset, Rc::clone(&file)),
            end: Position(offset + value.len() as u32, file),
        }
    )
}

/// Tokens separated by single spaces, identifiers and numbers only.
fn stream(words: &[&str]) -> TokenStream {
    let mut offset = 0;
    let tokens = words
        .iter()
        .map(|word| {
            let kind = match *word {
                "," => TokenKind::Comma,
                "+" => TokenKind::Plus,
                "*" => TokenKind::Star,
                "=" => TokenKind::Assignment,
                w if w.chars().all(|c| c.is_ascii_digit()) => TokenKind::Number,
                _ => TokenKind::Identifier,
            };
            let token = token(kind, word, offset);
            offset += word.len() as u32 + 1;
            token
        })
        .collect();

    TokenStream::new(tokens)
}

fn render(value: &Value) -> String {
    match value {
        Value::Node(node) => node.to_string(),
        other => format!("{:?}", other),
    }
}

fn parse_source(source: &str) -> Vec<String> {
    let tokens = tokenize(source.to_string(), Some("test.hobby".to_string())).unwrap();
    parse(tokens)
        .unwrap()
        .iter()
        .map(|stmt| stmt.to_string())
        .collect()
}

fn parse_expr(source: &str) -> String {
    parse_source(source).remove(0)
}

// GRAMMAR CONSTRUCTION

#[test]
fn test_undefined_rule_is_rejected() {
    let mut g = GrammarBuilder::new();
    let missing = g.declare();
    g.rule().ast(missing).id();

    let error = g.build().unwrap_err();
    assert_eq!(error.get_internal(), &ErrorImpl::UndefinedRule { rule: 0 });
}

#[test]
fn test_untagged_sequence_is_rejected() {
    let mut g = GrammarBuilder::new();
    let id = g.rule().identifier(NodeType::Identifier).id();
    g.rule().ast(id).sep(&[TokenKind::Comma]).ast(id).id();

    let error = g.build().unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::UntaggedSequence {
            rule: 1,
            captures: 2
        }
    );
}

#[test]
fn test_empty_alternation_is_rejected() {
    let mut g = GrammarBuilder::new();
    g.rule().or(&[]).id();

    let error = g.build().unwrap_err();
    assert_eq!(error.get_internal(), &ErrorImpl::EmptyAlternation { rule: 0 });
}

#[test]
fn test_duplicate_operator_is_rejected() {
    let mut table = OperatorTable::new();
    table.add(TokenKind::Plus, 4, Associativity::Left).unwrap();

    let error = table
        .add(TokenKind::Plus, 2, Associativity::Right)
        .unwrap_err();
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::DuplicateOperator {
            operator: TokenKind::Plus
        }
    );
    assert_eq!(table.len(), 1);
}

#[test]
fn test_forward_declaration_allows_recursion() {
    // nested = "(" nested ")" | identifier
    let mut g = GrammarBuilder::new();
    let nested = g.declare();
    let id = g.rule().identifier(NodeType::Identifier).id();
    let paren = g
        .rule()
        .sep(&[TokenKind::OpenParen])
        .ast(nested)
        .sep(&[TokenKind::CloseParen])
        .id();
    g.define(nested).or(&[paren, id]);
    let grammar = g.build().unwrap();

    let tokens = vec![
        token(TokenKind::OpenParen, "(", 0),
        token(TokenKind::OpenParen, "(", 1),
        token(TokenKind::Identifier, "x", 2),
        token(TokenKind::CloseParen, ")", 3),
        token(TokenKind::CloseParen, ")", 4),
    ];
    let mut source = TokenStream::new(tokens);

    let value = grammar.parse(nested, &mut source).unwrap();
    assert_eq!(render(&value), "x");
    assert!(!source.has_tokens());
}

// ENGINE

#[test]
fn test_failed_sequence_restores_position() {
    let mut g = GrammarBuilder::new();
    let id = g.rule().identifier(NodeType::Identifier).id();
    let num = g.rule().number(NodeType::Number).id();
    let pair = g
        .rule_with(NodeType::Comma)
        .ast(id)
        .sep(&[TokenKind::Comma])
        .ast(num)
        .id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["x", ",", "y"]);
    let error = grammar.parse(pair, &mut source).unwrap_err();

    assert_eq!(source.mark().index(), 0);
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::UnexpectedToken {
            token: String::from("y"),
            expected: vec![TokenKind::Number]
        }
    );
    assert_eq!(error.get_position().0, 4);
}

#[test]
fn test_alternation_backtracks_to_later_alternative() {
    let mut g = GrammarBuilder::new();
    let id = g.rule().identifier(NodeType::Identifier).id();
    let num = g.rule().number(NodeType::Number).id();
    let pair = g
        .rule_with(NodeType::Comma)
        .ast(id)
        .sep(&[TokenKind::Comma])
        .ast(num)
        .id();
    let either = g.rule().or(&[pair, id]).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["x", ",", "y"]);
    let value = grammar.parse(either, &mut source).unwrap();

    assert_eq!(render(&value), "x");
    assert_eq!(source.mark().index(), 1);
}

#[test]
fn test_alternation_commits_to_first_match() {
    let mut g = GrammarBuilder::new();
    let id = g.rule().identifier(NodeType::Identifier).id();
    let num = g.rule().number(NodeType::Number).id();
    let pair = g
        .rule_with(NodeType::Comma)
        .ast(id)
        .sep(&[TokenKind::Comma])
        .ast(num)
        .id();
    let either = g.rule().or(&[id, pair]).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["x", ",", "1"]);
    let value = grammar.parse(either, &mut source).unwrap();

    // The shorter alternative wins because it is tried first
    assert_eq!(render(&value), "x");
    assert_eq!(source.mark().index(), 1);
}

#[test]
fn test_alternation_failure_reports_union_of_expected() {
    let mut g = GrammarBuilder::new();
    let num = g.rule().number(NodeType::Number).id();
    let id = g.rule().identifier(NodeType::Identifier).id();
    let either = g.rule().or(&[num, id]).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["+"]);
    let error = grammar.parse(either, &mut source).unwrap_err();

    assert_eq!(
        error.get_internal(),
        &ErrorImpl::AlternativesExhausted {
            token: String::from("+"),
            expected: vec![TokenKind::Number, TokenKind::Identifier]
        }
    );
    assert_eq!(source.mark().index(), 0);
}

#[test]
fn test_reserved_word_is_not_an_identifier() {
    let mut g = GrammarBuilder::new();
    g.reserve("if");
    let id = g.rule().identifier(NodeType::Identifier).id();
    let grammar = g.build().unwrap();

    let mut source = TokenStream::new(vec![token(TokenKind::Identifier, "if", 0)]);
    let error = grammar.parse(id, &mut source).unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(source.mark().index(), 0);

    let mut source = TokenStream::new(vec![token(TokenKind::Identifier, "iffy", 0)]);
    let value = grammar.parse(id, &mut source).unwrap();
    assert_eq!(render(&value), "iffy");
}

#[test]
fn test_optional_never_fails() {
    let mut g = GrammarBuilder::new();
    let num = g.rule().number(NodeType::Number).id();
    let maybe = g.rule_with(NodeType::Block).option(num).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["x"]);
    let value = grammar.parse(maybe, &mut source).unwrap();
    assert_eq!(render(&value), "(block)");
    assert_eq!(source.mark().index(), 0);

    let mut source = stream(&["1"]);
    let value = grammar.parse(maybe, &mut source).unwrap();
    assert_eq!(render(&value), "(block 1)");
    assert_eq!(source.mark().index(), 1);
}

#[test]
fn test_repetition_collects_until_mismatch() {
    let mut g = GrammarBuilder::new();
    let id = g.rule().identifier(NodeType::Identifier).id();
    let many = g.rule_with(NodeType::Block).repeat(id).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["a", "b", "c", "1"]);
    let value = grammar.parse(many, &mut source).unwrap();
    assert_eq!(render(&value), "(block a b c)");
    assert_eq!(source.mark().index(), 3);

    let mut source = stream(&["1"]);
    let value = grammar.parse(many, &mut source).unwrap();
    assert_eq!(render(&value), "(block)");
    assert_eq!(source.mark().index(), 0);
}

#[test]
fn test_repetition_stops_on_empty_match() {
    let mut g = GrammarBuilder::new();
    let num = g.rule().number(NodeType::Number).id();
    let maybe = g.rule().option(num).id();
    let many = g.rule_with(NodeType::Block).repeat(maybe).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["1", "2", "x"]);
    let value = grammar.parse(many, &mut source).unwrap();
    assert_eq!(render(&value), "(block 1 2)");
    assert_eq!(source.mark().index(), 2);
}

#[test]
fn test_empty_rule_has_zero_width_span() {
    let mut g = GrammarBuilder::new();
    let empty = g.rule_with(NodeType::Empty).id();
    let grammar = g.build().unwrap();

    let mut source = stream(&["x"]);
    let node = grammar.parse(empty, &mut source).unwrap().into_node().unwrap();
    assert_eq!(node.get_node_type(), NodeType::Empty);
    assert_eq!(node.get_span().start, node.get_span().end);
    assert_eq!(source.mark().index(), 0);
}

// EXPRESSIONS

fn arithmetic(table: OperatorTable) -> (super::grammar::Grammar, super::grammar::RuleId) {
    let mut g = GrammarBuilder::new();
    let operand = g.rule().identifier(NodeType::Identifier).id();
    let expr = g
        .rule()
        .expression(NodeType::Binary, operand, table)
        .id();
    (g.build().unwrap(), expr)
}

#[test]
fn test_operator_outside_table_ends_expression() {
    let mut table = OperatorTable::new();
    table.add(TokenKind::Plus, 4, Associativity::Left).unwrap();
    let (grammar, expr) = arithmetic(table);

    let mut source = stream(&["a", "+", "b", "*", "c"]);
    let value = grammar.parse(expr, &mut source).unwrap();
    assert_eq!(render(&value), "(+ a b)");
    assert_eq!(source.peek(0).kind, TokenKind::Star);
}

#[test]
fn test_missing_right_operand_fails_whole_expression() {
    let mut table = OperatorTable::new();
    table.add(TokenKind::Plus, 4, Associativity::Left).unwrap();
    let (grammar, expr) = arithmetic(table);

    let mut source = stream(&["a", "+", "1"]);
    let error = grammar.parse(expr, &mut source).unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(source.mark().index(), 0);
}

#[test]
fn test_associativity_follows_table() {
    let mut table = OperatorTable::new();
    table.add(TokenKind::Plus, 4, Associativity::Left).unwrap();
    table.add(TokenKind::Assignment, 14, Associativity::Right).unwrap();
    let (grammar, expr) = arithmetic(table);

    let mut source = stream(&["a", "+", "b", "+", "c"]);
    let value = grammar.parse(expr, &mut source).unwrap();
    assert_eq!(render(&value), "(+ (+ a b) c)");

    let mut source = stream(&["a", "=", "b", "=", "c"]);
    let value = grammar.parse(expr, &mut source).unwrap();
    assert_eq!(render(&value), "(= a (= b c))");
}

#[test]
fn test_binary_span_covers_operands() {
    let mut table = OperatorTable::new();
    table.add(TokenKind::Plus, 4, Associativity::Left).unwrap();
    let (grammar, expr) = arithmetic(table);

    let mut source = stream(&["abc", "+", "d"]);
    let node = grammar.parse(expr, &mut source).unwrap().into_node().unwrap();
    assert_eq!(node.get_span().start.0, 0);
    assert_eq!(node.get_span().end.0, 7);
}

#[test]
fn test_sample_precedence() {
    assert_eq!(parse_expr("a + b * c"), "(+ a (* b c))");
    assert_eq!(parse_expr("a * b + c"), "(+ (* a b) c)");
    assert_eq!(parse_expr("(a + b) * c"), "(* (+ a b) c)");
    assert_eq!(parse_expr("a - b - c"), "(- (- a b) c)");
    assert_eq!(parse_expr("a = b = c"), "(= a (= b c))");
    assert_eq!(parse_expr("x = a < b + 1 && c"), "(= x (&& (< a (+ b 1)) c))");
    assert_eq!(parse_expr("a || b && c == d"), "(|| a (&& b (== c d)))");
}

#[test]
fn test_sample_negation_and_literals() {
    assert_eq!(parse_expr("-x * y"), "(* (- x) y)");
    assert_eq!(parse_expr("a - -1"), "(- a (- 1))");
    assert_eq!(parse_expr("x = \"hi\""), "(= x \"hi\")");
    assert_eq!(parse_expr("true != null"), "(!= true null)");
}

#[test]
fn test_parse_expression_stops_at_terminator() {
    let parser = ScriptParser::new().unwrap();
    let tokens = tokenize("a + b; c".to_string(), None).unwrap();
    let mut source = TokenStream::new(tokens);

    let node = parser.parse_expression(&mut source).unwrap();
    assert_eq!(node.to_string(), "(+ a b)");
    assert_eq!(source.peek(0).kind, TokenKind::Semicolon);
}

// STATEMENTS

#[test]
fn test_parse_if_statement() {
    assert_eq!(
        parse_source("if (x > 0) { y = 1 }"),
        vec!["(if (> x 0) (block (= y 1)))"]
    );
}

#[test]
fn test_parse_if_else_statement() {
    assert_eq!(
        parse_source("if (x) { a } else { b; c }"),
        vec!["(if x (block a) (block b c))"]
    );
}

#[test]
fn test_parse_while_loop() {
    let source = "while (i < 10) {\n  i = i + 1\n  if (i == 5) { break }\n}\n";
    assert_eq!(
        parse_source(source),
        vec!["(while (< i 10) (block (= i (+ i 1)) (if (== i 5) (block (break)))))"]
    );
}

#[test]
fn test_parse_for_loop() {
    assert_eq!(
        parse_source("for (;;) {}"),
        vec!["(for (empty) (empty) (empty) (block))"]
    );
    assert_eq!(
        parse_source("for (i = 0, j = 9; i < j; i = i + 1) { break }"),
        vec!["(for (, (= i 0) (= j 9)) (< i j) (= i (+ i 1)) (block (break)))"]
    );
}

#[test]
fn test_parse_import() {
    assert_eq!(parse_source("import \"lib.hobby\""), vec!["(import \"lib.hobby\")"]);
}

#[test]
fn test_parse_drops_empty_statements() {
    assert_eq!(parse_source("\n\n;a;;\nb\n"), vec!["a", "b"]);
    assert!(parse_source("").is_empty());
}

#[test]
fn test_parse_block_separators() {
    assert_eq!(parse_source("while (x) { a; b; }"), vec!["(while x (block a b))"]);
    assert_eq!(
        parse_source("while (x) {\n a\n\n b\n}"),
        vec!["(while x (block a b))"]
    );
    assert_eq!(parse_source("while (x) {}"), vec!["(while x (block))"]);
}

#[test]
fn test_parse_keyword_as_operand_fails() {
    let tokens = tokenize("x = while".to_string(), None).unwrap();
    assert!(parse(tokens).is_err());
}

#[test]
fn test_parse_unterminated_block_fails() {
    let tokens = tokenize("while (x) { a".to_string(), Some("test.hobby".to_string())).unwrap();
    let error = parse(tokens).unwrap_err();
    assert!(error.is_mismatch());
}

#[test]
fn test_parse_is_deterministic() {
    let source = "for (i = 0; i < 3; i = i + 1) { if (i) { a } else { b } }";
    assert_eq!(parse_source(source), parse_source(source));
}

#[test]
fn test_parse_failed_statement_reports_alternatives() {
    let tokens = tokenize(")".to_string(), None).unwrap();
    let error = parse(tokens).unwrap_err();

    match error.get_internal() {
        ErrorImpl::AlternativesExhausted { token, expected } => {
            assert_eq!(token, ")");
            assert!(expected.contains(&TokenKind::If));
            assert!(expected.contains(&TokenKind::Identifier));
            assert!(expected.contains(&TokenKind::Semicolon));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_parse_unclosed_group_is_not_a_terminator_error() {
    let tokens = tokenize("x = (a\n+ b)".to_string(), None).unwrap();
    let error = parse(tokens).unwrap_err();

    assert_eq!(error.get_error_name(), "AlternativesExhausted");
    assert!(error.expected().contains(&TokenKind::OpenParen));
}

#[test]
fn test_parse_requires_final_terminator() {
    let error = parse(vec![token(TokenKind::Identifier, "a", 0)]).unwrap_err();
    assert_eq!(error.found_token(), Some("a"));

    let body = parse(vec![
        token(TokenKind::Identifier, "a", 0),
        token(TokenKind::EOL, "EOL", 1),
    ])
    .unwrap();
    assert_eq!(body.len(), 1);
}

#[test]
fn test_sample_grammar_reserves_keywords() {
    let parser = ScriptParser::new().unwrap();

    assert!(parser.grammar().is_reserved("while"));
    assert!(parser.grammar().is_reserved("null"));
    assert!(!parser.grammar().is_reserved("whilst"));
}

#[test]
#[should_panic]
fn test_define_rejects_rule_from_another_builder() {
    let mut other = GrammarBuilder::new();
    other.declare();
    let foreign = other.declare();

    let mut g = GrammarBuilder::new();
    g.define(foreign);
}
