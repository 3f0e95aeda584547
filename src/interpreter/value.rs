use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::Constant;
use crate::interpreter::callable::Callable;
use crate::util;

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Callable(Rc<Callable>),
}

impl Value {
    /// `null` and `false` are falsy, every other value is truthy (including `0` and `""`).
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(value) => *value,
            _ => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Callable(left), Value::Callable(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl From<&Constant> for Value {
    fn from(constant: &Constant) -> Self {
        match constant {
            Constant::Null => Value::Null,
            Constant::Boolean(value) => Value::Boolean(*value),
            Constant::Number(value) => Value::Number(*value),
            Constant::String(value) => Value::String(value.clone()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Number(value) => f.write_str(&util::format_number(*value)),
            Value::String(value) => f.write_str(value),
            Value::Callable(callable) => write!(f, "{}", callable),
        }
    }
}
