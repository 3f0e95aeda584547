use crate::interpreter::error::RuntimeErrorKind;
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::value::Value;

#[cfg(test)]
mod tests;

type OperatorResult = Result<Value, RuntimeErrorKind>;

/// Longest string, in bytes, that `*` may build.
pub const MAX_REPEAT_BYTES: usize = 1 << 28;

pub fn unary(operator: &Token, operand: Value) -> OperatorResult {
    match operator.token_type() {
        TokenType::Minus => match operand {
            Value::Number(value) => Ok(Value::Number(-value)),
            _ => Err(RuntimeErrorKind::NumberOperand(operator.lexeme().to_owned())),
        },
        TokenType::Not => Ok(Value::Boolean(!operand.is_truthy())),
        _ => Err(invalid_operands(operator, "a valid unary operand")),
    }
}

pub fn binary(operator: &Token, left: Value, right: Value) -> OperatorResult {
    match operator.token_type() {
        TokenType::Plus => add(operator, left, right),
        TokenType::Minus => subtract(operator, left, right),
        TokenType::Multiply => multiply(operator, left, right),
        TokenType::Divide => divide(operator, left, right),

        TokenType::Greater => compare(operator, left, right, |left, right| left > right),
        TokenType::GreaterEqual => compare(operator, left, right, |left, right| left >= right),
        TokenType::Less => compare(operator, left, right, |left, right| left < right),
        TokenType::LessEqual => compare(operator, left, right, |left, right| left <= right),

        TokenType::Equal => Ok(Value::Boolean(left == right)),
        TokenType::NotEqual => Ok(Value::Boolean(left != right)),

        _ => Err(invalid_operands(operator, "valid binary operands")),
    }
}

fn add(operator: &Token, left: Value, right: Value) -> OperatorResult {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
        (Value::String(left), Value::String(right)) => Ok(Value::String(left + &right)),
        (left @ Value::String(_), right @ Value::Number(_))
        | (left @ Value::Number(_), right @ Value::String(_)) => Ok(Value::String(format!("{}{}", left, right))),
        _ => Err(invalid_operands(operator, "numbers or strings")),
    }
}

fn subtract(operator: &Token, left: Value, right: Value) -> OperatorResult {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left - right)),
        (Value::String(left), Value::String(right)) => Ok(Value::String(left.replacen(&right, "", 1))),
        (Value::String(left), Value::Number(count)) => {
            let length = left.chars().count();

            if count < 0.0 || count > length as f64 {
                return Err(RuntimeErrorKind::SubstringTooLong { count, length });
            }

            Ok(Value::String(left.chars().take(length - count.trunc() as usize).collect()))
        },
        _ => Err(invalid_operands(operator, "two numbers, two strings, or a string and a number")),
    }
}

fn multiply(operator: &Token, left: Value, right: Value) -> OperatorResult {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left * right)),
        (Value::String(left), Value::Number(count)) => {
            // negative and NaN counts saturate to zero
            let times = count.trunc() as usize;

            match left.len().checked_mul(times) {
                Some(bytes) if bytes <= MAX_REPEAT_BYTES => Ok(Value::String(left.repeat(times))),
                _ => Err(RuntimeErrorKind::RepeatTooLarge { count, length: left.chars().count() }),
            }
        },
        _ => Err(invalid_operands(operator, "two numbers or a string and a number")),
    }
}

fn divide(operator: &Token, left: Value, right: Value) -> OperatorResult {
    match (left, right) {
        (Value::Number(_), Value::Number(right)) | (Value::String(_), Value::Number(right)) if right == 0.0 =>
            Err(RuntimeErrorKind::DivisionByZero),
        (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left / right)),
        (Value::String(left), Value::Number(right)) => {
            let length = left.chars().count();
            let rounded = (length as f64 / right + 0.5).floor();

            if rounded <= 0.0 {
                return Err(RuntimeErrorKind::InvalidSlice(rounded));
            }

            let count = (rounded as usize).min(length);
            Ok(Value::String(left.chars().take(count).collect()))
        },
        _ => Err(invalid_operands(operator, "two numbers or a string and a number")),
    }
}

/// Strings compare by their length, both against other strings and against numbers.
fn compare(operator: &Token, left: Value, right: Value, comparison: fn(f64, f64) -> bool) -> OperatorResult {
    let (left, right) = match (&left, &right) {
        (Value::Number(left), Value::Number(right)) => (*left, *right),
        (Value::String(left), Value::String(right)) => (string_length(left), string_length(right)),
        (Value::String(left), Value::Number(right)) => (string_length(left), *right),
        (Value::Number(left), Value::String(right)) => (*left, string_length(right)),
        _ => return Err(invalid_operands(operator, "numbers or strings")),
    };

    Ok(Value::Boolean(comparison(left, right)))
}

fn string_length(value: &str) -> f64 {
    value.chars().count() as f64
}

fn invalid_operands(operator: &Token, expected: &'static str) -> RuntimeErrorKind {
    RuntimeErrorKind::InvalidOperands {
        operator: operator.lexeme().to_owned(),
        expected,
    }
}
