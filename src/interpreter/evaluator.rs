use std::rc::Rc;
use crate::interpreter::ast::{Expr, ExprId, Stmt};
use crate::interpreter::callable::{natives, Callable, NativeFunction};
use crate::interpreter::environment::{Environment, EnvironmentRef};
use crate::interpreter::error::{Diagnostic, RuntimeError, RuntimeErrorKind, RuntimeResult};
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::operators;
use crate::interpreter::output::Output;
use crate::interpreter::resolver::Resolution;
use crate::interpreter::value::Value;


/// Nested calls allowed before a call fails with a stack overflow error.
pub const MAX_CALL_DEPTH: usize = 4096;

// Minimum stack left before a call, and how much to grow by when there is less
const RED_ZONE: usize = 128 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// How a statement finished. `Return` and `Break` unwind to the nearest
/// function call or loop respectively.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
    Break,
}

pub struct Evaluator<O: Output> {
    globals: EnvironmentRef,
    environment: EnvironmentRef,
    locals: Resolution,

    // loops entered since the innermost function call
    loop_depth: usize,
    call_depth: usize,

    output: O,
}

impl<O: Output> Evaluator<O> {
    pub fn new(output: O) -> Evaluator<O> {
        let globals = Environment::new_global();

        let mut evaluator = Evaluator {
            environment: Rc::clone(&globals),
            globals,
            locals: Resolution::new(),
            loop_depth: 0,
            call_depth: 0,
            output,
        };

        // fresh global frame, cannot collide
        let _ = evaluator.define_native("clock", 0, natives::clock);
        evaluator
    }

    pub fn globals(&self) -> &EnvironmentRef {
        &self.globals
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn define_native(&mut self, name: &'static str, arity: usize, function: NativeFunction) -> Result<(), RuntimeErrorKind> {
        let native = Value::Callable(Rc::new(Callable::Native { name, arity, function }));
        self.globals.borrow_mut().define(name, native)
    }

    /// Adds scope distances for a newly resolved program. Ids never repeat
    /// within a session, so earlier entries stay valid for functions declared
    /// by earlier programs.
    pub fn resolve(&mut self, locals: Resolution) {
        self.locals.extend(locals);
    }

    /// Executes top-level statements in order. The first runtime error is
    /// reported to the output and stops the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        for stmt in statements {
            if let Err(error) = self.execute(stmt) {
                tracing::debug!(line = error.line, "runtime error: {}", error.kind);
                self.output.report(&Diagnostic::from(&error));
                return Err(error);
            }
        }

        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            },
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.output.print(&value.to_string());
                Ok(Flow::Normal)
            },
            Stmt::Let { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Null,
                };

                self.environment.borrow_mut().define(name.lexeme(), value)
                    .map_err(|kind| RuntimeError::at(name, kind))?;
                Ok(Flow::Normal)
            },
            Stmt::Block(statements) => {
                let environment = Environment::new_with_parent(Rc::clone(&self.environment));
                self.execute_block(statements, environment)
            },
            Stmt::If { condition, then, otherwise } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then)
                } else if let Some(otherwise) = otherwise {
                    self.execute(otherwise)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Stmt::While { condition, body } => {
                self.loop_depth += 1;
                let result = self.execute_loop(condition, body);
                self.loop_depth -= 1;

                result
            },
            Stmt::Break(keyword) => {
                if self.loop_depth == 0 {
                    return Err(RuntimeError::at(keyword, RuntimeErrorKind::BreakOutsideLoop));
                }

                Ok(Flow::Break)
            },
            Stmt::Function(declaration) => {
                let function = Value::Callable(Rc::new(Callable::Function {
                    declaration: Rc::clone(declaration),
                    closure: Rc::clone(&self.environment),
                }));

                self.environment.borrow_mut().define(declaration.name.lexeme(), function)
                    .map_err(|kind| RuntimeError::at(&declaration.name, kind))?;
                Ok(Flow::Normal)
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Null,
                };

                Ok(Flow::Return(value))
            },
        }
    }

    fn execute_loop(&mut self, condition: &Expr, body: &Stmt) -> RuntimeResult<Flow> {
        while self.evaluate(condition)?.is_truthy() {
            match self.execute(body)? {
                Flow::Normal => {},
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    /// Runs `statements` inside `environment`, then switches back to the
    /// previous environment however the block was left.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvironmentRef) -> RuntimeResult<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.execute_statements(statements);
        self.environment = previous;

        result
    }

    fn execute_statements(&mut self, statements: &[Stmt]) -> RuntimeResult<Flow> {
        for stmt in statements {
            match self.execute(stmt)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal(constant) => Ok(Value::from(constant)),
            Expr::Grouping(expr) => self.evaluate(expr),
            Expr::Unary { operator, expr } => {
                let operand = self.evaluate(expr)?;
                operators::unary(operator, operand).map_err(|kind| RuntimeError::at(operator, kind))
            },
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                operators::binary(operator, left, right).map_err(|kind| RuntimeError::at(operator, kind))
            },
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                let short_circuit = match operator.token_type() {
                    TokenType::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            },
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
            Expr::Assignment { id, name, value } => {
                let value = self.evaluate(value)?;

                let assigned = match self.locals.get(id) {
                    Some(distance) => Environment::assign_at(&self.environment, *distance, name.lexeme(), value),
                    None => self.environment.borrow_mut().assign(name.lexeme(), value),
                };

                assigned.map_err(|kind| RuntimeError::at(name, kind))?;

                Ok(Value::Null)
            },
            Expr::Call { callee, paren, args } => {
                let callee = self.evaluate(callee)?;

                let mut values = Vec::with_capacity(args.len());

                for arg in args {
                    values.push(self.evaluate(arg)?);
                }

                match callee {
                    Value::Callable(callable) => self.call(&callable, values, paren),
                    _ => Err(RuntimeError::at(paren, RuntimeErrorKind::NotCallable)),
                }
            },
        }
    }

    fn call(&mut self, callable: &Callable, args: Vec<Value>, paren: &Token) -> RuntimeResult<Value> {
        if args.len() != callable.arity() {
            return Err(RuntimeError::at(paren, RuntimeErrorKind::ArityMismatch {
                expected: callable.arity(),
                got: args.len(),
            }));
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::at(paren, RuntimeErrorKind::StackOverflow { depth: MAX_CALL_DEPTH }));
        }

        tracing::trace!(function = callable.name(), args = args.len(), depth = self.call_depth, "call");

        // a break in the body cannot target the caller's loop
        let enclosing_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.call_depth += 1;

        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || callable.call(self, args, paren));

        self.call_depth -= 1;
        self.loop_depth = enclosing_loop_depth;

        result
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> RuntimeResult<Value> {
        let value = match self.locals.get(&id) {
            Some(distance) => Environment::get_at(&self.environment, *distance, name.lexeme()),
            None => self.environment.borrow().get(name.lexeme()),
        };

        value.map_err(|kind| RuntimeError::at(name, kind))
    }
}
