use logos::{Lexer, Logos};

pub type Span = logos::Span;

#[derive(Logos, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,

    #[regex("[a-zA-Z][a-zA-Z0-9]*")]
    Ident,

    // One dot at most; a sign is only part of the number right after the
    // exponent marker. Maximal munch makes `1.2.3` lex as two numbers.
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""[^"]*""#)]
    String,

    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("^")]
    Caret,
    #[token("=")]
    Assign,
    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,
    #[token(",")]
    Comma,

    #[error]
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub struct TokenIter<'a> {
    lexer: Lexer<'a, TokenKind>,
}

impl<'a> TokenIter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: TokenKind::lexer(source),
        }
    }
}

impl<'a> From<Lexer<'a, TokenKind>> for TokenIter<'a> {
    fn from(lexer: Lexer<'a, TokenKind>) -> Self {
        Self { lexer }
    }
}

impl Iterator for TokenIter<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let kind = self.lexer.next()?;
        Some(Token {
            kind,
            span: self.lexer.span(),
        })
    }
}
