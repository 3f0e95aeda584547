use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    None,

    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    Dot, Comma, Semicolon,

    Assign, Equal,
    Not, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide,

    Identifier,
    Number,
    String,

    // Keywords
    And, Or,
    If, Else,
    True, False, Null,
    Let, Function, Return,
    For, While, Break,
    Print,

    // EOF
    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("and", TokenType::And),
        ("or", TokenType::Or),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("true", TokenType::True),
        ("false", TokenType::False),
        ("null", TokenType::Null),
        ("let", TokenType::Let),
        ("func", TokenType::Function),
        ("ret", TokenType::Return),
        ("for", TokenType::For),
        ("while", TokenType::While),
        ("break", TokenType::Break),
        ("print", TokenType::Print),
    ]);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    token_type: TokenType,
    lexeme: String,
    literal: Option<Literal>,
    start: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, literal: Option<Literal>, start: TokenPos) -> Token {
        Token {
            token_type, lexeme,
            literal, start,
        }
    }

    pub fn empty() -> Token {
        Token {
            token_type: TokenType::None,
            lexeme: String::from(""),
            literal: None,
            start: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn lexeme(&self) -> &str { &self.lexeme }
    pub fn literal(&self) -> Option<&Literal> { self.literal.as_ref() }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn line(&self) -> i32 { self.start.line }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::None => f.write_str("None"),
            TokenType::Eof => f.write_str("Eof"),
            _ => write!(f, "`{}`", self.lexeme),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexerError {
    UnexpectedEof,

    UnexpectedCharacter(TokenPos, char),
    UnterminatedString {
        pos: TokenPos,
    },

    OtherError(TokenPos, String)
}

impl LexerError {
    pub fn get_pos(&self) -> Option<TokenPos> {
        match self {
            LexerError::UnexpectedCharacter(pos, _) => Some(*pos),
            LexerError::UnterminatedString { pos, .. } => Some(*pos),
            LexerError::OtherError(pos, _) => Some(*pos),
            LexerError::UnexpectedEof => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LexerError::UnexpectedEof => String::from("Unexpected EOF"),
            LexerError::UnexpectedCharacter(_, c) => format!("Unexpected character '{}'", c),
            LexerError::UnterminatedString { .. } => String::from("Unterminated string"),
            LexerError::OtherError(_, message) => message.clone(),
        }
    }
}

impl Display for LexerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.get_pos() {
            Some(pos) => write!(f, "{} {}", pos, self.message()),
            None => f.write_str(&self.message()),
        }
    }
}

type LexerResult<T> = Result<T, LexerError>;

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,
    peek_2: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,
            peek_2: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Scans the whole input. The token list always ends with an `Eof` token;
    /// characters that fail to scan are reported and skipped.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            match self.scan_token() {
                Ok(token) => {
                    let eof = token.token_type() == TokenType::Eof;
                    tokens.push(token);

                    if eof {
                        break;
                    }
                },
                Err(LexerError::UnexpectedEof) => {
                    tokens.push(Token::new(TokenType::Eof, String::new(), None, self.current_pos));
                    break;
                },
                Err(err) => errors.push(err),
            }
        }

        tracing::trace!(tokens = tokens.len(), errors = errors.len(), "scanned source");
        (tokens, errors)
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            if self.is_eof() {
                return Ok(self.make_token(TokenType::Eof));
            }

            let c = self.consume()?;

            return match c {
                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenType::BracketLeft)),
                '}' => Ok(self.make_token(TokenType::BracketRight)),
                '.' => Ok(self.make_token(TokenType::Dot)),
                ',' => Ok(self.make_token(TokenType::Comma)),
                ';' => Ok(self.make_token(TokenType::Semicolon)),
                '+' => Ok(self.make_token(TokenType::Plus)),
                '-' => Ok(self.make_token(TokenType::Minus)),
                '*' => Ok(self.make_token(TokenType::Multiply)),

                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                }),
                '!' => Ok(if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                    self.make_token(TokenType::Not)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),
                '/' => if self.expect('/') {
                    self.skip_line();
                    continue;
                } else {
                    Ok(self.make_token(TokenType::Divide))
                },

                '"' | '\'' => self.scan_string(c),
                c if util::is_numeric(c) => self.scan_number(),
                c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
            };
        }
    }

    fn scan_string(&mut self, delimiter: char) -> LexerResult<Token> {
        while let Ok(c) = self.peek() {
            if c == delimiter {
                break;
            }

            let _ = self.consume();
        }

        if self.is_eof() {
            Err(LexerError::UnterminatedString { pos: self.start_pos })
        } else {
            let _ = self.consume(); // the closing delimiter

            // The literal value excludes both delimiters, which are always one byte wide
            let value = self.input[(self.start_index + 1)..(self.current_index - 1)].to_owned();
            Ok(self.make_literal_token(TokenType::String, Literal::String(value)))
        }
    }

    fn scan_number(&mut self) -> LexerResult<Token> {
        while let Ok('0'..='9') = self.peek() {
            let _ = self.consume();
        }

        if let Ok('.') = self.peek() {
            if let Ok('0'..='9') = self.peek_next() {
                let _ = self.consume();

                while let Ok('0'..='9') = self.peek() {
                    let _ = self.consume();
                }
            }
        }

        let text = &self.input[self.start_index..self.current_index];

        match text.parse::<f64>() {
            Ok(value) => Ok(self.make_literal_token(TokenType::Number, Literal::Number(value))),
            Err(err) => Err(LexerError::OtherError(self.start_pos, format!("Invalid number literal '{}': {}", text, err))),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        while let Ok(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            let _ = self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            lexeme: self.input[self.start_index..self.current_index].to_owned(),
            literal: None,
            start: self.start_pos,
        }
    }

    fn make_literal_token(&self, token_type: TokenType, literal: Literal) -> Token {
        Token {
            literal: Some(literal),
            ..self.make_token(token_type)
        }
    }

    fn consume(&mut self) -> LexerResult<char> {
        (if let Some(c) = self.peek_1.take() {
            self.peek_1 = self.peek_2.take();
            Ok(c)
        } else {
            self.chars.next().ok_or(LexerError::UnexpectedEof)
        }).map(|c| {
            self.current_index += c.len_utf8();

            if c == '\n' {
                self.current_pos.line += 1;
                self.current_pos.column = 1;
            } else {
                self.current_pos.column += 1;
            }

            c
        })
    }

    fn peek(&mut self) -> LexerResult<char> {
        if let Some(c) = self.peek_1 {
            Ok(c)
        } else if let Some(c) = self.chars.next() {
            self.peek_1 = Some(c);
            Ok(c)
        } else {
            Err(LexerError::UnexpectedEof)
        }
    }

    fn peek_next(&mut self) -> LexerResult<char> {
        if let Some(c) = self.peek_2 {
            Ok(c)
        } else if self.peek_1.is_some() {
            if let Some(c) = self.chars.next() {
                self.peek_2 = Some(c);
                Ok(c)
            } else {
                Err(LexerError::UnexpectedEof)
            }
        } else if let Some(peek_1) = self.chars.next() {
            self.peek_1 = Some(peek_1);

            if let Some(c) = self.chars.next() {
                self.peek_2 = Some(c);
                Ok(c)
            } else {
                Err(LexerError::UnexpectedEof)
            }
        } else {
            Err(LexerError::UnexpectedEof)
        }
    }

    fn expect(&mut self, expected: char) -> bool {
        match self.peek() {
            Ok(actual) if actual == expected => self.consume().is_ok(),
            _ => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Ok(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            let _ = self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Ok(c) = self.peek() {
            if c == '\n' {
                return;
            }

            let _ = self.consume();
        }
    }

    fn is_eof(&self) -> bool {
        self.current_index >= self.input.len()
    }
}
