//! Token definitions for Pascalette

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text, verbatim (keywords keep their original spelling)
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self { kind, lexeme: lexeme.into(), span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, lexeme: String::new(), span }
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // ============ Keywords ============
    /// PROGRAM
    Program,
    /// VAR
    Var,
    /// BEGIN
    Begin,
    /// END
    End,
    /// PROCEDURE
    Procedure,
    /// DIV (integer division)
    Div,
    /// INTEGER (type name)
    Integer,
    /// REAL (type name)
    Real,

    // ============ Identifiers and Literals ============
    /// Identifier
    Id,
    /// Integer literal
    IntegerConst,
    /// Real literal (digits '.' digits)
    RealConst,

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Mul,
    /// / (real division)
    FloatDiv,
    /// :=
    Assign,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// ;
    Semi,
    /// .
    Dot,
    /// ,
    Comma,
    /// :
    Colon,

    // ============ Special ============
    /// End of file
    Eof,
}

impl TokenKind {

    /// Try to convert an identifier to a keyword (case-insensitive)
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s.to_ascii_uppercase().as_str() {
            "PROGRAM" => Some(TokenKind::Program),
            "VAR" => Some(TokenKind::Var),
            "BEGIN" => Some(TokenKind::Begin),
            "END" => Some(TokenKind::End),
            "PROCEDURE" => Some(TokenKind::Procedure),
            "DIV" => Some(TokenKind::Div),
            "INTEGER" => Some(TokenKind::Integer),
            "REAL" => Some(TokenKind::Real),
            _ => None,
        }
    }

    /// Name used in diagnostics and token dumps
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Program => "PROGRAM",
            TokenKind::Var => "VAR",
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Div => "INTEGER_DIV",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::Id => "ID",
            TokenKind::IntegerConst => "INTEGER_CONST",
            TokenKind::RealConst => "REAL_CONST",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mul => "MUL",
            TokenKind::FloatDiv => "FLOAT_DIV",
            TokenKind::Assign => "ASSIGN",
            TokenKind::LParen => "LPAR",
            TokenKind::RParen => "RPAR",
            TokenKind::Semi => "SEMI",
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Eof => "EOF",
        }
    }

    /// Single-character punctuation and operators
    pub fn from_char(c: char) -> Option<TokenKind> {
        match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Mul),
            '/' => Some(TokenKind::FloatDiv),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ';' => Some(TokenKind::Semi),
            '.' => Some(TokenKind::Dot),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
