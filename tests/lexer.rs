use lince::lexer::{Token, TokenIter, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    TokenIter::new(source).map(|t| t.kind).collect()
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("1 2.5 .5 2. 1e3 1.5e-3 2E+8"),
        vec![TokenKind::Number; 7]
    );
}

#[test]
fn number_stops_at_second_dot() {
    let tokens: Vec<Token> = TokenIter::new("1.2.3").collect();
    assert_eq!(
        tokens
            .iter()
            .map(|t| (t.kind.clone(), t.span.clone()))
            .collect::<Vec<_>>(),
        vec![(TokenKind::Number, 0..3), (TokenKind::Number, 3..5)]
    );
}

#[test]
fn sign_is_only_part_of_an_exponent() {
    assert_eq!(
        kinds("1+3"),
        vec![TokenKind::Number, TokenKind::Add, TokenKind::Number]
    );
    assert_eq!(kinds("1e+3"), vec![TokenKind::Number]);
    assert_eq!(
        kinds("2e2+1"),
        vec![TokenKind::Number, TokenKind::Add, TokenKind::Number]
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("if iffy then thenceforth else x1"),
        vec![
            TokenKind::If,
            TokenKind::Ident,
            TokenKind::Then,
            TokenKind::Ident,
            TokenKind::Else,
            TokenKind::Ident,
        ]
    );
    assert_eq!(
        kinds("while do true false nil"),
        vec![
            TokenKind::While,
            TokenKind::Do,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Nil,
        ]
    );
}

#[test]
fn punctuation() {
    assert_eq!(
        kinds("( ) + - * / ^ = ,"),
        vec![
            TokenKind::ParenL,
            TokenKind::ParenR,
            TokenKind::Add,
            TokenKind::Sub,
            TokenKind::Mul,
            TokenKind::Div,
            TokenKind::Caret,
            TokenKind::Assign,
            TokenKind::Comma,
        ]
    );
}

#[test]
fn string_literal() {
    let tokens: Vec<Token> = TokenIter::new(r#""hello world""#).collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].span, 0..13);
}

#[test]
fn unknown_byte_is_an_error_token() {
    assert_eq!(kinds("$"), vec![TokenKind::Error]);
}

#[test]
fn whitespace_only_is_empty() {
    assert_eq!(kinds("   \t  "), Vec::<TokenKind>::new());
}
