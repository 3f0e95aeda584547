use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::Token;
use crate::util;

/// Identity of a variable reference, distinct for every `Variable` and `Assignment`
/// node even when the names agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

#[derive(Clone, PartialEq)]
pub enum Constant {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Debug for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Boolean(value) => write!(f, "{}", value),
            Constant::Number(value) => write!(f, "{}", util::format_number(*value)),
            Constant::String(value) => write!(f, "\"{}\"", value),
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Expr {
    Literal(Constant),
    Grouping(Box<Expr>),

    Unary {
        operator: Token,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Variable {
        id: ExprId,
        name: Token,
    },
    Assignment {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        paren: Token,
        args: Vec<Expr>,
    },
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{:?}", value),
            Expr::Grouping(expr) => write!(f, "(group {:?})", expr),
            Expr::Unary { operator, expr } => write!(f, "({} {:?})", operator.lexeme(), expr),
            Expr::Binary { left, operator, right }
            | Expr::Logical { left, operator, right } => write!(f, "({} {:?} {:?})", operator.lexeme(), left, right),
            Expr::Variable { name, .. } => write!(f, "{}", name.lexeme()),
            Expr::Assignment { name, value, .. } => write!(f, "(= {} {:?})", name.lexeme(), value),
            Expr::Call { callee, args, .. } => {
                write!(f, "(call {:?}", callee)?;

                for arg in args {
                    write!(f, " {:?}", arg)?;
                }

                write!(f, ")")
            },
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),

    Let {
        name: Token,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Break(Token),

    Function(Rc<FunctionDecl>),
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
}

fn join_statements(statements: &[Stmt]) -> String {
    statements.iter().map(|stmt| format!(" {:?}", stmt)).collect::<Vec<String>>().join("")
}

impl Debug for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "(expression {:?})", expr),
            Stmt::Print(expr) => write!(f, "(print {:?})", expr),
            Stmt::Let { name, initializer: Some(initializer) } => write!(f, "(let {} {:?})", name.lexeme(), initializer),
            Stmt::Let { name, initializer: None } => write!(f, "(let {})", name.lexeme()),
            Stmt::Block(statements) => write!(f, "(block{})", join_statements(statements)),
            Stmt::If { condition, then, otherwise: Some(otherwise) } =>
                write!(f, "(if {:?} {:?} {:?})", condition, then, otherwise),
            Stmt::If { condition, then, otherwise: None } => write!(f, "(if {:?} {:?})", condition, then),
            Stmt::While { condition, body } => write!(f, "(while {:?} {:?})", condition, body),
            Stmt::Break(_) => write!(f, "(break)"),
            Stmt::Function(function) => write!(f, "(func {} ({}){})", function.name.lexeme(),
                                              function.params.iter().map(|param| param.lexeme().to_owned())
                                                  .collect::<Vec<String>>().join(" "),
                                              join_statements(&function.body)),
            Stmt::Return { value: Some(value), .. } => write!(f, "(ret {:?})", value),
            Stmt::Return { value: None, .. } => write!(f, "(ret)"),
        }
    }
}
