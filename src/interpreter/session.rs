use crate::interpreter::ast::{ExprId, Stmt};
use crate::interpreter::error::Diagnostic;
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::output::Output;
use crate::interpreter::parser::Parser;
use crate::interpreter::resolver::{Resolution, Resolver};

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    /// Lexing, parsing or resolving reported something; nothing was evaluated.
    StaticError,
    RuntimeError,
}

impl RunStatus {
    pub fn is_ok(self) -> bool {
        self == RunStatus::Ok
    }
}

/// A parsed and resolved program, along with everything the static passes reported.
pub struct Program {
    pub statements: Vec<Stmt>,
    pub locals: Resolution,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs successive programs against the same global environment, as a script
/// file or as the lines typed at the prompt.
pub struct Session<O: Output> {
    evaluator: Evaluator<O>,
    next_id: ExprId,
}

impl<O: Output> Session<O> {
    pub fn new(output: O) -> Session<O> {
        Session {
            evaluator: Evaluator::new(output),
            next_id: ExprId(0),
        }
    }

    pub fn output(&self) -> &O {
        self.evaluator.output()
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.evaluator.output_mut()
    }

    pub fn into_output(self) -> O {
        self.evaluator.into_output()
    }

    /// Lexes, parses and resolves `source` without running it.
    pub fn compile(&mut self, source: &str) -> Program {
        let (tokens, lexer_errors) = Lexer::new(source).scan_tokens();
        let mut diagnostics: Vec<Diagnostic> = lexer_errors.iter().map(Diagnostic::from).collect();

        let mut parser = Parser::starting_at(tokens, self.next_id);
        let statements = parser.parse();
        self.next_id = parser.next_id();
        diagnostics.extend_from_slice(parser.diagnostics());

        let (locals, resolver_errors) = Resolver::new().resolve(&statements);
        diagnostics.extend(resolver_errors);

        tracing::debug!(statements = statements.len(), errors = diagnostics.len(), "compiled source");

        Program { statements, locals, diagnostics }
    }

    pub fn run(&mut self, source: &str) -> RunStatus {
        let program = self.compile(source);
        self.execute(program)
    }

    /// Like [`Session::run`], but a line that starts with a bare expression
    /// prints its value.
    pub fn run_prompt_line(&mut self, source: &str) -> RunStatus {
        let mut program = self.compile(source);

        if let Some(first) = program.statements.first_mut() {
            if let Stmt::Expression(expr) = first {
                *first = Stmt::Print(expr.clone());
            }
        }

        self.execute(program)
    }

    /// Prints the prefix form of every statement instead of running them.
    pub fn print_ast(&mut self, source: &str) -> RunStatus {
        let program = self.compile(source);

        if !self.report(&program.diagnostics) {
            return RunStatus::StaticError;
        }

        let output = self.evaluator.output_mut();

        for stmt in &program.statements {
            output.print(&format!("{:?}", stmt));
        }

        RunStatus::Ok
    }

    fn execute(&mut self, program: Program) -> RunStatus {
        if !self.report(&program.diagnostics) {
            return RunStatus::StaticError;
        }

        self.evaluator.resolve(program.locals);

        match self.evaluator.interpret(&program.statements) {
            Ok(()) => RunStatus::Ok,
            Err(_) => RunStatus::RuntimeError,
        }
    }

    // Returns true if there was nothing to report
    fn report(&mut self, diagnostics: &[Diagnostic]) -> bool {
        let output = self.evaluator.output_mut();

        for diagnostic in diagnostics {
            output.report(diagnostic);
        }

        diagnostics.is_empty()
    }
}
