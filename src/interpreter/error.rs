use std::fmt::{Display, Formatter};
use thiserror::Error;
use crate::interpreter::lexer::{LexerError, Token, TokenPos, TokenType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Parser,
    Resolver,
    Runtime,
}

/// A reportable error from any pass, always attached to a source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub pos: TokenPos,
    pub location: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(phase: Phase, pos: TokenPos, location: String, message: String) -> Diagnostic {
        Diagnostic { phase, pos, location, message }
    }

    pub fn at_token(phase: Phase, token: &Token, message: &str) -> Diagnostic {
        let location = if token.token_type() == TokenType::Eof {
            String::from(" at end")
        } else {
            format!(" at '{}'", token.lexeme())
        };

        Diagnostic::new(phase, *token.start(), location, message.to_owned())
    }
}

impl From<&LexerError> for Diagnostic {
    fn from(error: &LexerError) -> Self {
        Diagnostic::new(Phase::Lexer, error.get_pos().unwrap_or_else(TokenPos::begin), String::new(), error.message())
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(error: &RuntimeError) -> Self {
        Diagnostic::new(Phase::Runtime, TokenPos::new(error.line, 1), String::new(), error.kind.to_string())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = match self.phase {
            Phase::Runtime => "Runtime error",
            _ => "Error",
        };

        write!(f, "[line {}] {}{}: {}", self.pos.line, kind, self.location, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("Cannot redefine variable '{0}' in the same scope")]
    AlreadyDefined(String),
    #[error("Expected {expected} arguments but got {got}")]
    ArityMismatch {
        expected: usize,
        got: usize,
    },
    #[error("Can only call functions")]
    NotCallable,
    #[error("Operand of '{0}' must be a number")]
    NumberOperand(String),
    #[error("Operands of '{operator}' must be {expected}")]
    InvalidOperands {
        operator: String,
        expected: &'static str,
    },
    #[error("Cannot divide by zero")]
    DivisionByZero,
    #[error("Cannot remove {count} characters from a string of length {length}")]
    SubstringTooLong {
        count: f64,
        length: usize,
    },
    #[error("Cannot repeat a string of length {length} {count} times")]
    RepeatTooLarge {
        count: f64,
        length: usize,
    },
    #[error("Cannot slice a string to {0} characters")]
    InvalidSlice(f64),
    #[error("Cannot break outside of a loop")]
    BreakOutsideLoop,
    #[error("Maximum call depth of {depth} exceeded")]
    StackOverflow {
        depth: usize,
    },
    #[error("Native function failed: {0}")]
    Native(String),
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("[line {line}] Runtime error: {kind}")]
pub struct RuntimeError {
    pub line: i32,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(line: i32, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError { line, kind }
    }

    pub fn at(token: &Token, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError::new(token.line(), kind)
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
