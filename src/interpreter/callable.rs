use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use crate::interpreter::ast::FunctionDecl;
use crate::interpreter::environment::{Environment, EnvironmentRef};
use crate::interpreter::error::{RuntimeError, RuntimeErrorKind, RuntimeResult};
use crate::interpreter::evaluator::{Evaluator, Flow};
use crate::interpreter::lexer::Token;
use crate::interpreter::output::Output;
use crate::interpreter::value::Value;

pub type NativeFunction = fn(&[Value]) -> Result<Value, RuntimeErrorKind>;

pub enum Callable {
    /// A `func` declaration together with the frame it was declared in.
    Function {
        declaration: Rc<FunctionDecl>,
        closure: EnvironmentRef,
    },
    Native {
        name: &'static str,
        arity: usize,
        function: NativeFunction,
    },
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Function { declaration, .. } => declaration.params.len(),
            Callable::Native { arity, .. } => *arity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Function { declaration, .. } => declaration.name.lexeme(),
            Callable::Native { name, .. } => *name,
        }
    }

    /// Runs the callable. The argument count has already been checked against
    /// [`Callable::arity`].
    pub fn call<O: Output>(&self, evaluator: &mut Evaluator<O>, args: Vec<Value>, paren: &Token) -> RuntimeResult<Value> {
        match self {
            Callable::Function { declaration, closure } => {
                let environment = Environment::new_with_parent(Rc::clone(closure));

                {
                    let mut frame = environment.borrow_mut();

                    for (param, arg) in declaration.params.iter().zip(args) {
                        frame.define(param.lexeme(), arg).map_err(|kind| RuntimeError::at(param, kind))?;
                    }
                }

                match evaluator.execute_block(&declaration.body, environment)? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal | Flow::Break => Ok(Value::Null),
                }
            },
            Callable::Native { function, .. } => function(&args).map_err(|kind| RuntimeError::at(paren, kind)),
        }
    }
}

impl Display for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Function { declaration, .. } => write!(f, "<func {}>", declaration.name.lexeme()),
            Callable::Native { .. } => write!(f, "<native func>"),
        }
    }
}

// The closure frame can hold this callable again, so it is left out
impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Function { declaration, .. } => f.debug_struct("Function")
                .field("name", &declaration.name.lexeme())
                .field("arity", &declaration.params.len())
                .finish_non_exhaustive(),
            Callable::Native { name, arity, .. } => f.debug_struct("Native")
                .field("name", name)
                .field("arity", arity)
                .finish_non_exhaustive(),
        }
    }
}

pub mod natives {
    use super::*;

    /// Seconds since the Unix epoch.
    pub fn clock(_args: &[Value]) -> Result<Value, RuntimeErrorKind> {
        SystemTime::now().duration_since(UNIX_EPOCH)
            .map(|duration| Value::Number(duration.as_secs_f64()))
            .map_err(|err| RuntimeErrorKind::Native(err.to_string()))
    }
}
