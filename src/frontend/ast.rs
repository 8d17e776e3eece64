//! Abstract Syntax Tree definitions for Pascalette

use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// A complete program: `PROGRAM name; block.`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub name: Ident,
    pub block: Block,
    pub span: Span,
}

/// Identifier with its position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Declarations followed by a compound statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub declarations: Vec<Decl>,
    pub compound: Compound,
    pub span: Span,
}

/// Declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decl {
    Var(VarDecl),
    Procedure(ProcDecl),
}

/// `name : type`, one per declared name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: TypeSpec,
    pub span: Span,
}

/// Type name as written in a declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSpec {
    pub name: String,
    pub span: Span,
}

/// Procedure declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeSpec,
    pub span: Span,
}

/// `BEGIN statement_list END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compound {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement. Empty statements are dropped by the parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Compound(Compound),
    Assign(Assignment),
}

/// `target := value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: Variable,
    pub value: Expr,
    pub span: Span,
}

/// Variable reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Numeric literal
    Literal(Literal),
    /// Variable reference
    Variable(Variable),
    /// Binary operation
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        span: Span,
    },
    /// Unary operation
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span,
            Expr::Variable(var) => var.span,
            Expr::Binary { span, .. } | Expr::Unary { span, .. } => *span,
        }
    }
}

/// Numeric literal, text kept as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    Integer,
    Real,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// DIV
    IntDiv,
    /// /
    RealDiv,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnOp {
    Plus,
    Neg,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::IntDiv => "DIV",
            BinOp::RealDiv => "/",
        };
        f.write_str(s)
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnOp::Plus => f.write_str("+"),
            UnOp::Neg => f.write_str("-"),
        }
    }
}

impl Block {
    /// Number of statements in this block, counting nested compounds and procedure bodies
    pub fn statement_count(&self) -> usize {
        let procs: usize = self
            .declarations
            .iter()
            .map(|decl| match decl {
                Decl::Procedure(proc) => proc.body.statement_count(),
                Decl::Var(_) => 0,
            })
            .sum();
        procs + self.compound.statement_count()
    }

    /// Number of declarations in this block, including nested procedure blocks
    pub fn declaration_count(&self) -> usize {
        self.declarations
            .iter()
            .map(|decl| match decl {
                Decl::Procedure(proc) => 1 + proc.params.len() + proc.body.declaration_count(),
                Decl::Var(_) => 1,
            })
            .sum()
    }
}

impl Compound {
    pub fn statement_count(&self) -> usize {
        self.statements
            .iter()
            .map(|stmt| match stmt {
                Stmt::Compound(inner) => inner.statement_count(),
                Stmt::Assign(_) => 1,
            })
            .sum()
    }
}
