pub mod ast;
pub mod callable;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod operators;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod session;
pub mod value;
