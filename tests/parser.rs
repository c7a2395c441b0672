use lince::ast::Expr;
use lince::parser::Error;
use lince::value::Value;
use lince::parse;

fn int(n: i64) -> Expr {
    Expr::Const(Value::Int(n))
}

fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

fn unary(op: char, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

fn bin(op: char, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn parsed(source: &str) -> Expr {
    parse(source).unwrap().unwrap()
}

#[test]
fn empty_line() {
    assert_eq!(parse(""), Ok(None));
    assert_eq!(parse("   "), Ok(None));
}

#[test]
fn addition() {
    assert_eq!(parsed("1+1"), bin('+', int(1), int(1)));
}

#[test]
fn left_associativity() {
    assert_eq!(parsed("8-3-2"), bin('-', bin('-', int(8), int(3)), int(2)));
    assert_eq!(parsed("8/4/2"), bin('/', bin('/', int(8), int(4)), int(2)));
}

#[test]
fn right_associativity() {
    assert_eq!(parsed("2^3^2"), bin('^', int(2), bin('^', int(3), int(2))));
    assert_eq!(
        parsed("a = b = c"),
        bin('=', ident("a"), bin('=', ident("b"), ident("c")))
    );
}

#[test]
fn precedence() {
    assert_eq!(parsed("1+2*3"), bin('+', int(1), bin('*', int(2), int(3))));
    assert_eq!(parsed("2*3^2"), bin('*', int(2), bin('^', int(3), int(2))));
    assert_eq!(
        parsed("x = 1+2"),
        bin('=', ident("x"), bin('+', int(1), int(2)))
    );
}

#[test]
fn grouping() {
    assert_eq!(parsed("(1+2)*3"), bin('*', bin('+', int(1), int(2)), int(3)));
}

#[test]
fn unary_minus() {
    assert_eq!(parsed("-x"), unary('-', ident("x")));
    assert_eq!(parsed("a - b"), bin('-', ident("a"), ident("b")));
    // The operand of unary minus is a primary, so `-2^2` is `(-2)^2`.
    assert_eq!(parsed("-2^2"), bin('^', unary('-', int(2)), int(2)));
}

#[test]
fn number_literals() {
    assert_eq!(parsed("2"), int(2));
    assert_eq!(parsed("2.0"), Expr::Const(Value::Double(2.0)));
    assert_eq!(parsed("2."), Expr::Const(Value::Double(2.0)));
    assert_eq!(parsed(".5"), Expr::Const(Value::Double(0.5)));
    assert_eq!(parsed("1e3"), Expr::Const(Value::Double(1000.0)));
}

#[test]
fn constants() {
    assert_eq!(parsed("true"), Expr::Const(Value::Bool(true)));
    assert_eq!(parsed("false"), Expr::Const(Value::Bool(false)));
    assert_eq!(parsed("nil"), Expr::Const(Value::Nil));
    assert_eq!(parsed(r#""ab""#), Expr::Const(Value::string("ab")));
}

#[test]
fn calls() {
    assert_eq!(
        parsed("f(1, x)"),
        Expr::Call {
            name: "f".to_string(),
            args: vec![int(1), ident("x")],
        }
    );
    assert_eq!(
        parsed("f()"),
        Expr::Call {
            name: "f".to_string(),
            args: vec![],
        }
    );
}

#[test]
fn function_definition_shape() {
    assert_eq!(
        parsed("f(x) = x"),
        bin(
            '=',
            Expr::Call {
                name: "f".to_string(),
                args: vec![ident("x")],
            },
            ident("x")
        )
    );
}

#[test]
fn if_expression() {
    assert_eq!(
        parsed("if 1 then 2 else 3"),
        Expr::If {
            cond: Box::new(int(1)),
            then_branch: Box::new(int(2)),
            else_branch: Some(Box::new(int(3))),
        }
    );
    assert_eq!(
        parsed("if 1 then 2"),
        Expr::If {
            cond: Box::new(int(1)),
            then_branch: Box::new(int(2)),
            else_branch: None,
        }
    );
}

#[test]
fn while_expression() {
    assert_eq!(
        parsed("while n do n = n - 1"),
        Expr::While {
            cond: Box::new(ident("n")),
            body: Box::new(bin('=', ident("n"), bin('-', ident("n"), int(1)))),
        }
    );
}

#[test]
fn trailing_tokens_are_rejected() {
    assert!(matches!(parse("1 2"), Err(Error::ExpectedEof { .. })));
    assert!(matches!(parse("1.2.3"), Err(Error::ExpectedEof { .. })));
}

#[test]
fn missing_closing_paren() {
    assert!(matches!(parse("(1+2"), Err(Error::UnexpectedToken { .. })));
    assert!(matches!(parse("f(1"), Err(Error::UnexpectedToken { .. })));
}

#[test]
fn dangling_operator() {
    assert!(matches!(parse("1 +"), Err(Error::ExpectedExpr { .. })));
    assert!(matches!(parse("*"), Err(Error::ExpectedExpr { .. })));
}
