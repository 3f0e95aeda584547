use std::collections::HashMap;
use crate::interpreter::ast::{Expr, ExprId, FunctionDecl, Stmt};
use crate::interpreter::error::{Diagnostic, Phase};
use crate::interpreter::lexer::Token;

#[cfg(test)]
mod tests;

/// Scope distance of every variable reference that refers to a local binding.
/// References without an entry are looked up dynamically from the global scope.
pub type Resolution = HashMap<ExprId, usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
}

pub struct Resolver {
    // name -> defined (false while only declared)
    scopes: Vec<HashMap<String, bool>>,
    locals: Resolution,

    current_function: FunctionType,
    loop_depth: usize,

    diagnostics: Vec<Diagnostic>,
}

impl Resolver {
    pub fn new() -> Resolver {
        Resolver {
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_function: FunctionType::None,
            loop_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> (Resolution, Vec<Diagnostic>) {
        self.resolve_statements(statements);

        tracing::debug!(locals = self.locals.len(), errors = self.diagnostics.len(), "resolved program");
        (self.locals, self.diagnostics)
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_statement(stmt);
        }
    }

    fn resolve_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Let { name, initializer } => {
                self.declare(name);

                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }

                self.define(name);
            },
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            },
            Stmt::If { condition, then, otherwise } => {
                self.resolve_expr(condition);
                self.resolve_statement(then);

                if let Some(otherwise) = otherwise {
                    self.resolve_statement(otherwise);
                }
            },
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);

                self.loop_depth += 1;
                self.resolve_statement(body);
                self.loop_depth -= 1;
            },
            Stmt::Break(keyword) => {
                if self.loop_depth == 0 {
                    self.error_at(keyword, "Cannot break outside of a loop");
                }
            },
            Stmt::Function(function) => {
                // Defined before the body so the function can call itself
                self.declare(&function.name);
                self.define(&function.name);

                self.resolve_function(function);
            },
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error_at(keyword, "Cannot return from top-level code");
                }

                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            },
        }
    }

    fn resolve_function(&mut self, function: &FunctionDecl) {
        let enclosing_function = std::mem::replace(&mut self.current_function, FunctionType::Function);
        let enclosing_loop_depth = std::mem::replace(&mut self.loop_depth, 0);

        self.begin_scope();

        for param in &function.params {
            self.declare(param);
            self.define(param);
        }

        self.resolve_statements(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
        self.loop_depth = enclosing_loop_depth;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {},
            Expr::Grouping(expr) | Expr::Unary { expr, .. } => self.resolve_expr(expr),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },
            Expr::Variable { id, name } => {
                let declared_only = self.scopes.last()
                    .and_then(|scope| scope.get(name.lexeme()))
                    .map_or(false, |defined| !*defined);

                if declared_only {
                    self.error_at(name, &format!("Variable '{}' cannot be read in its own initializer", name.lexeme()));
                }

                self.resolve_local(*id, name);
            },
            Expr::Assignment { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            },
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);

                for arg in args {
                    self.resolve_expr(arg);
                }
            },
        }
    }

    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        let distance = self.scopes.iter().rev()
            .position(|scope| scope.contains_key(name.lexeme()));

        if let Some(distance) = distance {
            self.locals.insert(id, distance);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme().to_owned(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme().to_owned(), true);
        }
    }

    // Error handling

    fn error_at(&mut self, token: &Token, message: &str) {
        self.diagnostics.push(Diagnostic::at_token(Phase::Resolver, token, message));
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}
