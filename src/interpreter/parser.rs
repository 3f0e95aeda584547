use std::rc::Rc;
use crate::interpreter::ast::{Constant, Expr, ExprId, FunctionDecl, Stmt};
use crate::interpreter::error::{Diagnostic, Phase};
use crate::interpreter::lexer::{Literal, Token, TokenPos, TokenType};


const MAX_ARGUMENTS: usize = 255;

/// Marker for a statement that could not be parsed. The diagnostic has already been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError;

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    previous: Token, current: Token,
    position: usize,

    next_id: usize,

    diagnostics: Vec<Diagnostic>,
    had_error: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser::starting_at(tokens, ExprId(0))
    }

    /// Creates a parser whose variable references are numbered from `first_id` on,
    /// so that several programs can share one resolution table.
    pub fn starting_at(tokens: Vec<Token>, first_id: ExprId) -> Parser {
        Parser {
            tokens: tokens.into_iter(),
            previous: Token::empty(), current: Token::empty(),
            position: 0,
            next_id: first_id.0,
            diagnostics: Vec::new(),
            had_error: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The first id that has not been handed out yet.
    pub fn next_id(&self) -> ExprId {
        ExprId(self.next_id)
    }

    // Declaration parsing

    pub fn parse(&mut self) -> Vec<Stmt> {
        self.consume();

        let mut statements = Vec::new();

        while !self.is_eof() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        tracing::debug!(statements = statements.len(), errors = self.diagnostics.len(), "parsed program");
        statements
    }

    fn parse_declaration(&mut self) -> Option<Stmt> {
        let start = self.position;

        let stmt = if self.matches(TokenType::Function) {
            self.parse_function_declaration()
        } else if self.matches(TokenType::Let) {
            self.parse_let_declaration()
        } else {
            self.parse_statement()
        };

        match stmt {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                // Always make progress, even when the very first token was rejected
                if self.position == start {
                    self.consume();
                }

                self.synchronize();
                None
            },
        }
    }

    fn parse_function_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenType::Identifier, "Expected function name after 'func'")?;
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after function name")?;

        let mut params = Vec::new();

        if !self.check(TokenType::ParenthesisRight) {
            params.push(self.expect(TokenType::Identifier, "Expected parameter name")?);

            while self.matches(TokenType::Comma) {
                if params.len() >= MAX_ARGUMENTS {
                    self.error_at_current(&format!("Can't have more than {} parameters", MAX_ARGUMENTS));
                }

                params.push(self.expect(TokenType::Identifier, "Expected parameter name")?);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after parameters")?;
        self.expect(TokenType::BracketLeft, "Expected '{' before function body")?;

        let body = self.parse_block()?;
        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    fn parse_let_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenType::Identifier, "Expected variable name after 'let'")?;

        let initializer = if self.matches(TokenType::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenType::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::Let { name, initializer })
    }

    // Statement parsing

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenType::Break) {
            return self.parse_break_statement();
        } else if self.matches(TokenType::For) {
            return self.parse_for_statement();
        } else if self.matches(TokenType::If) {
            return self.parse_if_statement();
        } else if self.matches(TokenType::Print) {
            return self.parse_print_statement();
        } else if self.matches(TokenType::Return) {
            return self.parse_return_statement();
        } else if self.matches(TokenType::While) {
            return self.parse_while_statement();
        } else if self.matches(TokenType::BracketLeft) {
            return Ok(Stmt::Block(self.parse_block()?));
        }

        self.parse_expression_statement()
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        self.expect(TokenType::BracketRight, "Expected '}' after block")?;
        Ok(statements)
    }

    fn parse_break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();
        self.expect(TokenType::Semicolon, "Expected ';' after 'break'")?;

        Ok(Stmt::Break(keyword))
    }

    /// `for (init; cond; incr) body` becomes `{ init; while (cond) { body; incr; } }`.
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'for'")?;

        let initializer = if self.matches(TokenType::Semicolon) {
            None
        } else if self.matches(TokenType::Let) {
            Some(self.parse_let_declaration()?)
        } else {
            Some(self.parse_expression_statement()?)
        };

        let condition = if !self.check(TokenType::Semicolon) {
            self.parse_expression()?
        } else {
            Expr::Literal(Constant::Boolean(true))
        };
        self.expect(TokenType::Semicolon, "Expected ';' after loop condition")?;

        let increment = if !self.check(TokenType::ParenthesisRight) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenType::ParenthesisRight, "Expected ')' after for clauses")?;

        let mut body = self.parse_statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        body = Stmt::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after 'if' condition")?;

        let then = self.parse_statement()?;
        let otherwise = if self.matches(TokenType::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then: Box::new(then), otherwise })
    }

    fn parse_print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        self.expect(TokenType::Semicolon, "Expected ';' after value")?;

        Ok(Stmt::Print(expr))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();

        let value = if !self.check(TokenType::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenType::Semicolon, "Expected ';' after return value")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after 'while' condition")?;

        let body = self.parse_statement()?;
        Ok(Stmt::While { condition, body: Box::new(body) })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        self.expect(TokenType::Semicolon, "Expected ';' after expression")?;

        Ok(Stmt::Expression(expr))
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_or()?;

        if self.matches(TokenType::Assign) {
            let equals = self.previous.clone();
            let value = self.parse_assignment()?;

            if let Expr::Variable { name, .. } = expr {
                return Ok(Expr::Assignment { id: self.make_id(), name, value: Box::new(value) });
            }

            // Not fatal: the right-hand side is kept as the expression
            self.error_at(&equals, "Invalid assignment target");
            return Ok(value);
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;

        while self.matches(TokenType::Or) {
            let operator = self.previous.clone();
            let right = self.parse_and()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_equality()?;

        while self.matches(TokenType::And) {
            let operator = self.previous.clone();
            let right = self.parse_equality()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;

        while self.matches_any(&[TokenType::Equal, TokenType::NotEqual]) {
            let operator = self.previous.clone();
            let right = self.parse_comparison()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;

        while self.matches_any(&[TokenType::Less, TokenType::LessEqual, TokenType::Greater, TokenType::GreaterEqual]) {
            let operator = self.previous.clone();
            let right = self.parse_term()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_factor()?;

        while self.matches_any(&[TokenType::Plus, TokenType::Minus]) {
            let operator = self.previous.clone();
            let right = self.parse_factor()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;

        while self.matches_any(&[TokenType::Multiply, TokenType::Divide]) {
            let operator = self.previous.clone();
            let right = self.parse_unary()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.matches_any(&[TokenType::Minus, TokenType::Not]) {
            let operator = self.previous.clone();
            let right = self.parse_unary()?;

            return Ok(Expr::Unary { operator, expr: Box::new(right) });
        }

        self.parse_call()
    }

    fn parse_call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.matches(TokenType::ParenthesisLeft) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            args.push(self.parse_expression()?);

            while self.matches(TokenType::Comma) {
                if args.len() >= MAX_ARGUMENTS {
                    self.error_at_current(&format!("Can't have more than {} arguments", MAX_ARGUMENTS));
                }

                args.push(self.parse_expression()?);
            }
        }

        let paren = self.expect(TokenType::ParenthesisRight, "Expected ')' after function call arguments")?;
        Ok(Expr::Call { callee: Box::new(callee), paren, args })
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::False) {
            return Ok(Expr::Literal(Constant::Boolean(false)));
        } else if self.matches(TokenType::True) {
            return Ok(Expr::Literal(Constant::Boolean(true)));
        } else if self.matches(TokenType::Null) {
            return Ok(Expr::Literal(Constant::Null));
        } else if self.matches_any(&[TokenType::Number, TokenType::String]) {
            return self.literal_constant();
        } else if self.matches(TokenType::Identifier) {
            return Ok(Expr::Variable { id: self.make_id(), name: self.previous.clone() });
        } else if self.matches(TokenType::ParenthesisLeft) {
            let expr = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(self.error_at_current("Expected expression"))
    }

    fn literal_constant(&mut self) -> ParseResult<Expr> {
        match self.previous.literal() {
            Some(Literal::Number(value)) => Ok(Expr::Literal(Constant::Number(*value))),
            Some(Literal::String(value)) => Ok(Expr::Literal(Constant::String(value.clone()))),
            None => Err(self.error("Literal token without a value")),
        }
    }

    fn make_id(&mut self) -> ExprId {
        let id = ExprId(self.next_id);
        self.next_id += 1;
        id
    }

    // Token handling

    fn consume(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current); // self.previous = self.current; self.current gets replaced below
        self.position += 1;

        self.current = match self.tokens.next() {
            Some(token) => token,
            None => {
                let pos = if self.previous.token_type() == TokenType::None { TokenPos::begin() } else { *self.previous.start() };
                Token::new(TokenType::Eof, String::new(), None, pos)
            },
        };
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> ParseResult<Token> {
        if self.current.token_type() == token_type {
            self.consume();
            return Ok(self.previous.clone());
        }

        Err(self.error_at_current(message))
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    fn matches_any(&mut self, token_types: &[TokenType]) -> bool {
        for token_type in token_types {
            if self.check(*token_type) {
                self.consume();
                return true;
            }
        }

        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }

    // Error handling

    /// Skips tokens until the end of the current statement, so one malformed statement
    /// does not produce errors for all the following ones.
    fn synchronize(&mut self) {
        while self.current.token_type() != TokenType::Eof {
            if self.previous.token_type() == TokenType::Semicolon {
                return;
            }

            match self.current.token_type() {
                TokenType::Function
                | TokenType::Let
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return
                | TokenType::Break => return,
                _ => {},
            };

            self.consume();
        }
    }

    fn error_at_current(&mut self, message: &str) -> ParseError {
        let token = self.current.clone();
        self.error_at(&token, message)
    }

    fn error(&mut self, message: &str) -> ParseError {
        let token = self.previous.clone();
        self.error_at(&token, message)
    }

    fn error_at(&mut self, token: &Token, message: &str) -> ParseError {
        let diagnostic = Diagnostic::at_token(Phase::Parser, token, message);
        tracing::debug!(line = token.line(), "{}", diagnostic);

        self.diagnostics.push(diagnostic);
        self.had_error = true;
        ParseError
    }
}
