use pretty_assertions::assert_eq;
use crate::interpreter::lexer::TokenPos;
use super::*;

fn op(token_type: TokenType, lexeme: &str) -> Token {
    Token::new(token_type, lexeme.to_owned(), None, TokenPos::new(1, 1))
}

fn number(value: f64) -> Value {
    Value::Number(value)
}

fn string(value: &str) -> Value {
    Value::String(value.to_owned())
}

fn plus() -> Token { op(TokenType::Plus, "+") }
fn minus() -> Token { op(TokenType::Minus, "-") }
fn times() -> Token { op(TokenType::Multiply, "*") }
fn slash() -> Token { op(TokenType::Divide, "/") }

#[test]
fn addition() {
    assert_eq!(binary(&plus(), number(1.0), number(2.5)), Ok(number(3.5)));
    assert_eq!(binary(&plus(), string("foo"), string("bar")), Ok(string("foobar")));
    assert_eq!(binary(&plus(), string("5"), number(3.0)), Ok(string("53")));
    assert_eq!(binary(&plus(), number(3.0), string("5")), Ok(string("35")));
    assert_eq!(binary(&plus(), number(0.5), string("x")), Ok(string("0.5x")));

    assert_eq!(binary(&plus(), Value::Boolean(true), number(1.0)), Err(RuntimeErrorKind::InvalidOperands {
        operator: String::from("+"),
        expected: "numbers or strings",
    }));
    assert!(binary(&plus(), Value::Null, string("a")).is_err());
}

#[test]
fn subtraction() {
    assert_eq!(binary(&minus(), number(5.0), number(7.0)), Ok(number(-2.0)));
    assert_eq!(binary(&minus(), string("hello"), string("l")), Ok(string("helo")));
    assert_eq!(binary(&minus(), string("hello"), string("xyz")), Ok(string("hello")));
    assert_eq!(binary(&minus(), string("hello"), number(2.0)), Ok(string("hel")));
    assert_eq!(binary(&minus(), string("hello"), number(5.0)), Ok(string("")));

    assert_eq!(binary(&minus(), string("hello"), number(10.0)),
               Err(RuntimeErrorKind::SubstringTooLong { count: 10.0, length: 5 }));
    assert!(binary(&minus(), string("hello"), number(-1.0)).is_err());
    assert!(binary(&minus(), number(1.0), string("hello")).is_err());
}

#[test]
fn multiplication() {
    assert_eq!(binary(&times(), number(4.0), number(2.5)), Ok(number(10.0)));
    assert_eq!(binary(&times(), string("ab"), number(3.0)), Ok(string("ababab")));
    assert_eq!(binary(&times(), string("ab"), number(2.9)), Ok(string("abab")));
    assert_eq!(binary(&times(), string("ab"), number(-1.0)), Ok(string("")));

    assert!(binary(&times(), string("ab"), string("cd")).is_err());
    assert!(binary(&times(), number(3.0), string("ab")).is_err());
}

#[test]
fn oversized_repetition_is_an_error() {
    assert_eq!(binary(&times(), string("ab"), number(1e19)),
               Err(RuntimeErrorKind::RepeatTooLarge { count: 1e19, length: 2 }));
    assert_eq!(binary(&times(), string("x"), number((MAX_REPEAT_BYTES + 1) as f64)),
               Err(RuntimeErrorKind::RepeatTooLarge { count: (MAX_REPEAT_BYTES + 1) as f64, length: 1 }));
    assert_eq!(binary(&times(), string(""), number(1e19)), Ok(string("")));
    assert_eq!(binary(&times(), string("é"), number(2.0)), Ok(string("éé")));
}

#[test]
fn division() {
    assert_eq!(binary(&slash(), number(6.0), number(2.0)), Ok(number(3.0)));
    assert_eq!(binary(&slash(), string("hello"), number(5.0)), Ok(string("h")));
    assert_eq!(binary(&slash(), string("hello"), number(2.0)), Ok(string("hel")));
    assert_eq!(binary(&slash(), string("hello"), number(0.5)), Ok(string("hello")));

    assert_eq!(binary(&slash(), number(1.0), number(0.0)), Err(RuntimeErrorKind::DivisionByZero));
    assert_eq!(binary(&slash(), string("hello"), number(0.0)), Err(RuntimeErrorKind::DivisionByZero));
    assert_eq!(binary(&slash(), string("hi"), number(5.0)), Err(RuntimeErrorKind::InvalidSlice(0.0)));
    assert!(binary(&slash(), string("hi"), string("h")).is_err());
}

#[test]
fn comparisons() {
    let greater = op(TokenType::Greater, ">");
    let less = op(TokenType::Less, "<");
    let less_equal = op(TokenType::LessEqual, "<=");
    let greater_equal = op(TokenType::GreaterEqual, ">=");

    assert_eq!(binary(&greater, number(2.0), number(1.0)), Ok(Value::Boolean(true)));
    assert_eq!(binary(&less, number(2.0), number(1.0)), Ok(Value::Boolean(false)));
    assert_eq!(binary(&less, number(1.0), number(1.0)), Ok(Value::Boolean(false)));
    assert_eq!(binary(&less_equal, number(1.0), number(1.0)), Ok(Value::Boolean(true)));
    assert_eq!(binary(&greater_equal, number(0.0), number(1.0)), Ok(Value::Boolean(false)));

    // by length
    assert_eq!(binary(&greater, string("abc"), string("zz")), Ok(Value::Boolean(true)));
    assert_eq!(binary(&less, string("abc"), number(4.0)), Ok(Value::Boolean(true)));
    assert_eq!(binary(&greater_equal, number(3.0), string("abc")), Ok(Value::Boolean(true)));

    assert!(binary(&less, Value::Null, number(1.0)).is_err());
}

#[test]
fn equality() {
    let equal = op(TokenType::Equal, "==");
    let not_equal = op(TokenType::NotEqual, "!=");

    assert_eq!(binary(&equal, Value::Null, Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(binary(&equal, number(1.0), number(1.0)), Ok(Value::Boolean(true)));
    assert_eq!(binary(&equal, number(1.0), string("1")), Ok(Value::Boolean(false)));
    assert_eq!(binary(&equal, Value::Null, Value::Boolean(false)), Ok(Value::Boolean(false)));
    assert_eq!(binary(&not_equal, string("a"), string("b")), Ok(Value::Boolean(true)));
}

#[test]
fn unary_operators() {
    let not = op(TokenType::Not, "!");

    assert_eq!(unary(&minus(), number(3.0)), Ok(number(-3.0)));
    assert_eq!(unary(&minus(), string("3")), Err(RuntimeErrorKind::NumberOperand(String::from("-"))));

    assert_eq!(unary(&not, Value::Null), Ok(Value::Boolean(true)));
    assert_eq!(unary(&not, number(0.0)), Ok(Value::Boolean(false)));
    assert_eq!(unary(&not, string("")), Ok(Value::Boolean(false)));
}
