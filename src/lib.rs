use logos::Logos;

use crate::lexer::{TokenIter, TokenKind};
use crate::parser::Parser;

pub mod ast;
pub mod env;
pub mod interpreter;
pub mod lexer;
pub mod module;
pub mod parser;
pub mod value;

pub use interpreter::Interpreter;
pub use module::Module;
pub use value::{Function, TypeId, Value};

/// Parses one source line into its expression, or `None` for empty input.
pub fn parse(source: &str) -> Result<Option<ast::Expr>, parser::Error> {
    let lexer = TokenKind::lexer(source);
    Parser::new(TokenIter::from(lexer), source).parse_line()
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] parser::Error),
    #[error(transparent)]
    Eval(#[from] interpreter::EvalError),
}
