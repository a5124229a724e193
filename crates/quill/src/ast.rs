//! The abstract syntax tree produced by the parser.
//!
//! Nodes are plain sum types with exhaustive matching everywhere they are
//! consumed (evaluator, macro expander, compiler). Every node keeps the
//! token it was parsed from so its source literal is available for
//! diagnostics, and every node implements `Display` with a fully
//! parenthesized round-trip form, which the macro tests rely on.

use std::fmt;

use strum::Display;

use crate::token::Token;

/// A parsed program: the root of the AST.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    /// The source literal of the token that produced the first statement.
    #[must_use]
    pub fn token_literal(&self) -> &str {
        self.statements.first().map_or("", Statement::token_literal)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl Statement {
    #[must_use]
    pub fn token_literal(&self) -> &str {
        match self {
            Self::Let(s) => &s.token.literal,
            Self::Return(s) => &s.token.literal,
            Self::Expression(s) => &s.token.literal,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let(s) => write!(f, "let {} = {};", s.name, s.value),
            Self::Return(s) => write!(f, "return {};", s.value),
            Self::Expression(s) => write!(f, "{}", s.expression),
        }
    }
}

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

/// `return <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

/// A bare expression used as a statement; its value is the REPL result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

/// `{ <statements> }`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Int(IntegerLiteral),
    Bool(BooleanLiteral),
    Str(StringLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    Array(ArrayLiteral),
    Hash(HashLiteral),
    Index(IndexExpression),
    Macro(MacroLiteral),
}

impl Expression {
    #[must_use]
    pub fn token_literal(&self) -> &str {
        match self {
            Self::Identifier(e) => &e.token.literal,
            Self::Int(e) => &e.token.literal,
            Self::Bool(e) => &e.token.literal,
            Self::Str(e) => &e.token.literal,
            Self::Prefix(e) => &e.token.literal,
            Self::Infix(e) => &e.token.literal,
            Self::If(e) => &e.token.literal,
            Self::Function(e) => &e.token.literal,
            Self::Call(e) => &e.token.literal,
            Self::Array(e) => &e.token.literal,
            Self::Hash(e) => &e.token.literal,
            Self::Index(e) => &e.token.literal,
            Self::Macro(e) => &e.token.literal,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(e) => write!(f, "{e}"),
            Self::Int(e) => write!(f, "{}", e.token.literal),
            Self::Bool(e) => write!(f, "{}", e.value),
            Self::Str(e) => write!(f, "{}", e.value),
            Self::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Self::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Self::If(e) => {
                write!(f, "if{} {}", e.condition, e.consequence)?;
                if let Some(alternative) = &e.alternative {
                    write!(f, "else {alternative}")?;
                }
                Ok(())
            }
            Self::Function(e) => {
                write!(f, "{}(", e.token.literal)?;
                write_joined(f, &e.parameters)?;
                write!(f, ") {}", e.body)
            }
            Self::Macro(e) => {
                write!(f, "{}(", e.token.literal)?;
                write_joined(f, &e.parameters)?;
                write!(f, ") {}", e.body)
            }
            Self::Call(e) => {
                write!(f, "{}(", e.function)?;
                write_joined(f, &e.arguments)?;
                write!(f, ")")
            }
            Self::Array(e) => {
                write!(f, "[")?;
                write_joined(f, &e.elements)?;
                write!(f, "]")
            }
            Self::Hash(e) => {
                write!(f, "{{")?;
                for (i, (key, value)) in e.pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                write!(f, "}}")
            }
            Self::Index(e) => write!(f, "({}[{}])", e.left, e.index),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A name in source: a binding reference, parameter, or `let` target.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PrefixOperator {
    #[strum(serialize = "!")]
    Bang,
    #[strum(serialize = "-")]
    Minus,
}

/// Binary operators, in source spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InfixOperator {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Lte,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Gte,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: Token,
    pub operator: InfixOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// `if (<condition>) { <consequence> } else { <alternative> }`
///
/// `if` is an expression: a taken branch yields its last value, a missing
/// alternative yields null.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// `fn(<parameters>) { <body> }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

/// `macro(<parameters>) { <body> }`
#[derive(Debug, Clone, PartialEq)]
pub struct MacroLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

/// `{k: v, …}` — pairs keep source order, which is also the order the
/// compiler emits them in.
#[derive(Debug, Clone, PartialEq)]
pub struct HashLiteral {
    pub token: Token,
    pub pairs: Vec<(Expression, Expression)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}
