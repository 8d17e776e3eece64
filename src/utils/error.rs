//! Error handling for Pascalette

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Interpreter error. The first one raised terminates the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Lexer Errors ====================

    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },

    // ==================== Parser Errors ====================

    #[error("unexpected token {found} '{lexeme}', expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        lexeme: String,
        span: Span,
    },

    // ==================== Semantic Errors ====================

    #[error("unknown type: {name}")]
    UnknownType { name: String, span: Span },

    #[error("{name} already declared")]
    DuplicateDefinition { name: String, span: Span },

    #[error("{name} undeclared")]
    UndeclaredVariable { name: String, span: Span },

    #[error("{name} is not a variable")]
    NotAVariable { name: String, span: Span },

    // ==================== Runtime Errors ====================

    #[error("{name} undeclared or unassigned")]
    UnassignedVariable { name: String, span: Span },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("integer overflow")]
    IntegerOverflow { span: Span },

    #[error("invalid numeric literal: {text}")]
    InvalidLiteral { text: String, span: Span },
}

/// Error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    LexError,
    SyntaxError,
    SemanticError,
    RuntimeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LexError => "Lexer",
            Self::SyntaxError => "Syntax",
            Self::SemanticError => "Semantic",
            Self::RuntimeError => "Runtime",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::UnknownType { span, .. }
            | Self::DuplicateDefinition { span, .. }
            | Self::UndeclaredVariable { span, .. }
            | Self::NotAVariable { span, .. }
            | Self::UnassignedVariable { span, .. }
            | Self::DivisionByZero { span }
            | Self::IntegerOverflow { span }
            | Self::InvalidLiteral { span, .. } => *span,
        }
    }

    /// Which pipeline stage raised this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedChar { .. } => ErrorKind::LexError,
            Self::UnexpectedToken { .. } => ErrorKind::SyntaxError,
            Self::UnknownType { .. }
            | Self::DuplicateDefinition { .. }
            | Self::UndeclaredVariable { .. }
            | Self::NotAVariable { .. } => ErrorKind::SemanticError,
            Self::UnassignedVariable { .. }
            | Self::DivisionByZero { .. }
            | Self::IntegerOverflow { .. }
            | Self::InvalidLiteral { .. } => ErrorKind::RuntimeError,
        }
    }

    /// One-line rendering used by the command line: `Semantic error at 3:5: x undeclared`
    pub fn report(&self) -> String {
        format!("{} error at {}: {}", self.kind(), self.span(), self)
    }
}
