use crate::ast::Expr;
use crate::lexer::{Span, Token, TokenIter, TokenKind};
use crate::value::Value;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("unexpected token (expected {expected:?}, found {found:?})")]
    UnexpectedToken {
        expected: TokenKind,
        found: Option<TokenKind>,
        span: Option<Span>,
    },
    #[error("expected expression, found {found:?}")]
    ExpectedExpr {
        found: Option<TokenKind>,
        span: Option<Span>,
    },

    #[error("invalid number")]
    InvalidNumber { span: Span },

    #[error("expected EOF, found {found:?}")]
    ExpectedEof { found: TokenKind, span: Span },
}

fn precedence(op: char) -> u8 {
    match op {
        '=' => 10,
        '+' | '-' => 20,
        '*' | '/' => 30,
        '^' => 40,
        _ => 0,
    }
}

fn right_associative(op: char) -> bool {
    matches!(op, '^' | '=')
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: TokenIter<'a>,
    current_token: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: TokenIter<'a>, source: &'a str) -> Self {
        let mut parser = Self {
            source,
            tokens: lexer,
            current_token: None,
        };

        parser.advance();

        parser
    }

    #[inline]
    fn advance(&mut self) {
        self.current_token = self.tokens.next();
    }

    #[inline]
    pub fn current(&self) -> Option<&Token> {
        self.current_token.as_ref()
    }

    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_token
            .as_ref()
            .is_some_and(|token| &token.kind == kind)
    }

    pub fn check_consume(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check(kind) {
            let token = self.current_token.take();
            self.advance();
            token
        } else {
            None
        }
    }

    pub fn consume(&mut self) -> Option<Token> {
        let token = self.current_token.take();
        self.advance();
        token
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current_token.is_none()
    }

    #[inline]
    fn token_kind(&self) -> Option<&TokenKind> {
        self.current_token.as_ref().map(|t| &t.kind)
    }

    #[inline]
    fn token_span(&self) -> Option<Span> {
        self.current_token.as_ref().map(|t| t.span.clone())
    }

    fn binary_op(&self) -> Option<char> {
        match self.token_kind() {
            Some(TokenKind::Assign) => Some('='),
            Some(TokenKind::Add) => Some('+'),
            Some(TokenKind::Sub) => Some('-'),
            Some(TokenKind::Mul) => Some('*'),
            Some(TokenKind::Div) => Some('/'),
            Some(TokenKind::Caret) => Some('^'),
            _ => None,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        match self.check_consume(&kind) {
            Some(token) => Ok(token),
            None => Err(Error::UnexpectedToken {
                expected: kind,
                found: self.token_kind().cloned(),
                span: self.token_span(),
            }),
        }
    }

    fn number(&mut self) -> Result<Expr, Error> {
        let token = self.consume().unwrap();
        let span = token.span;
        let lexeme = &self.source[span.start..span.end];

        // A plain digit run is an Int literal; anything with a dot or an
        // exponent is a Double. Ints too big for i64 fall back to Double.
        let value = if lexeme.contains(['.', 'e', 'E']) {
            Value::Double(
                lexeme
                    .parse()
                    .map_err(|_| Error::InvalidNumber { span: span.clone() })?,
            )
        } else {
            match lexeme.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Double(
                    lexeme
                        .parse()
                        .map_err(|_| Error::InvalidNumber { span: span.clone() })?,
                ),
            }
        };
        Ok(Expr::Const(value))
    }

    fn string(&mut self) -> Result<Expr, Error> {
        let token = self.consume().unwrap();
        let span = token.span;
        let lexeme = &self.source[span.start..span.end];

        // remove quotes
        let content = &lexeme[1..lexeme.len() - 1];
        Ok(Expr::Const(Value::string(content)))
    }

    fn ident_name(&mut self) -> Result<String, Error> {
        if let Some(TokenKind::Ident) = self.token_kind() {
            let token = self.consume().unwrap();
            let span = token.span;
            Ok(self.source[span.start..span.end].to_string())
        } else {
            Err(Error::UnexpectedToken {
                expected: TokenKind::Ident,
                found: self.token_kind().cloned(),
                span: self.token_span(),
            })
        }
    }

    fn expect_eof(&mut self) -> Result<(), Error> {
        if self.is_eof() {
            Ok(())
        } else {
            let token = self.current_token.as_ref().unwrap();
            Err(Error::ExpectedEof {
                found: token.kind.clone(),
                span: token.span.clone(),
            })
        }
    }

    fn primary(&mut self) -> Result<Expr, Error> {
        match self.token_kind() {
            Some(TokenKind::Number) => self.number(),
            Some(TokenKind::String) => self.string(),
            Some(TokenKind::True) => {
                self.consume();
                Ok(Expr::Const(Value::Bool(true)))
            }
            Some(TokenKind::False) => {
                self.consume();
                Ok(Expr::Const(Value::Bool(false)))
            }
            Some(TokenKind::Nil) => {
                self.consume();
                Ok(Expr::Const(Value::Nil))
            }
            Some(TokenKind::Ident) => {
                let name = self.ident_name()?;
                if self.check_consume(&TokenKind::ParenL).is_some() {
                    let args = self.arg_list()?;
                    self.expect(TokenKind::ParenR)?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Some(TokenKind::ParenL) => {
                self.consume();
                let expr = self.expr()?;
                self.expect(TokenKind::ParenR)?;
                Ok(expr)
            }
            _ => Err(Error::ExpectedExpr {
                found: self.token_kind().cloned(),
                span: self.token_span(),
            }),
        }
    }

    fn arg_list(&mut self) -> Result<Vec<Expr>, Error> {
        let mut args = Vec::new();
        if self.check(&TokenKind::ParenR) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.check_consume(&TokenKind::Comma).is_none() {
                return Ok(args);
            }
        }
    }

    fn unary_expr(&mut self) -> Result<Expr, Error> {
        if self.check_consume(&TokenKind::Sub).is_some() {
            let operand = self.primary()?;
            return Ok(Expr::Unary {
                op: '-',
                operand: Box::new(operand),
            });
        }

        self.primary()
    }

    /// Precedence climbing. Consumes operators of precedence at least
    /// `min_prec`; when the operator after the right-hand side binds
    /// tighter, the right-hand side is extended recursively with
    /// `prec(op) + 1`, or `prec(op)` for a right-associative follower.
    fn binary_rhs(&mut self, mut lhs: Expr, min_prec: u8) -> Result<Expr, Error> {
        loop {
            let op = match self.binary_op() {
                Some(op) if precedence(op) >= min_prec => op,
                _ => return Ok(lhs),
            };
            self.consume();

            let mut rhs = self.unary_expr()?;
            if let Some(next) = self.binary_op() {
                if precedence(next) > min_prec {
                    let bump = if right_associative(next) { 0 } else { 1 };
                    rhs = self.binary_rhs(rhs, precedence(op) + bump)?;
                }
            }

            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn if_expr(&mut self) -> Result<Expr, Error> {
        self.expect(TokenKind::If)?;
        let cond = self.expr()?;
        self.expect(TokenKind::Then)?;
        let then_branch = self.expr()?;

        let else_branch = if self.check_consume(&TokenKind::Else).is_some() {
            Some(Box::new(self.expr()?))
        } else {
            None
        };

        Ok(Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch,
        })
    }

    fn while_expr(&mut self) -> Result<Expr, Error> {
        self.expect(TokenKind::While)?;
        let cond = self.expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.expr()?;

        Ok(Expr::While {
            cond: Box::new(cond),
            body: Box::new(body),
        })
    }

    pub fn expr(&mut self) -> Result<Expr, Error> {
        if self.check(&TokenKind::If) {
            return self.if_expr();
        }
        if self.check(&TokenKind::While) {
            return self.while_expr();
        }
        let lhs = self.unary_expr()?;
        self.binary_rhs(lhs, 0)
    }

    /// Parses one REPL line: `None` for empty input, otherwise a single
    /// expression with nothing trailing.
    pub fn parse_line(&mut self) -> Result<Option<Expr>, Error> {
        if self.is_eof() {
            return Ok(None);
        }
        let expr = self.expr()?;
        self.expect_eof()?;
        Ok(Some(expr))
    }
}
