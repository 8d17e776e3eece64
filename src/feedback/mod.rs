//! Structured Feedback Module
//!
//! Machine-readable run reports:
//! - JSON diagnostics with error codes and positions
//! - Final bindings
//! - Run statistics

use serde::{Deserialize, Serialize};

use crate::frontend::ast::Program;
use crate::utils::{Error, ErrorKind};
use crate::{Binding, RunOutput};

// ==================== Diagnostics ====================

/// A diagnostic built from an interpreter error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code (e.g., "E0201")
    pub code: String,

    pub kind: ErrorKind,

    /// Human-readable message
    pub message: String,

    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn from_error(error: &Error) -> Self {
        Self {
            code: error_code(error).to_string(),
            kind: error.kind(),
            message: error.to_string(),
            location: Location {
                line: error.span().line,
                column: error.span().column,
            },
        }
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        Error::UnexpectedChar { .. } => "E0001",
        Error::UnexpectedToken { .. } => "E0100",
        Error::UnknownType { .. } => "E0200",
        Error::DuplicateDefinition { .. } => "E0201",
        Error::UndeclaredVariable { .. } => "E0202",
        Error::NotAVariable { .. } => "E0203",
        Error::UnassignedVariable { .. } => "E0300",
        Error::DivisionByZero { .. } => "E0301",
        Error::IntegerOverflow { .. } => "E0302",
        Error::InvalidLiteral { .. } => "E0303",
    }
}

// ==================== Run Report ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub token_count: usize,
    pub declaration_count: usize,
    pub statement_count: usize,
}

impl RunStats {
    pub fn from_program(program: &Program, token_count: usize) -> Self {
        Self {
            token_count,
            declaration_count: program.block.declaration_count(),
            statement_count: program.block.statement_count(),
        }
    }
}

/// Complete report of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub success: bool,

    pub source_file: String,

    pub bindings: Vec<Binding>,

    /// At most one entry: the first error ends the run
    pub diagnostics: Vec<Diagnostic>,

    pub stats: RunStats,
}

impl RunReport {
    pub fn success(source_file: String, output: &RunOutput, token_count: usize) -> Self {
        Self {
            success: true,
            source_file,
            bindings: output.bindings.clone(),
            diagnostics: vec![],
            stats: RunStats::from_program(&output.program, token_count),
        }
    }

    pub fn failure(source_file: String, error: &Error, token_count: usize) -> Self {
        Self {
            success: false,
            source_file,
            bindings: vec![],
            diagnostics: vec![Diagnostic::from_error(error)],
            stats: RunStats {
                token_count,
                ..RunStats::default()
            },
        }
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_from_error() {
        let err = Error::UndeclaredVariable {
            name: "x".into(),
            span: Span::new(20, 21, 1, 21),
        };
        let diag = Diagnostic::from_error(&err);
        assert_eq!(
            diag,
            Diagnostic {
                code: "E0202".into(),
                kind: ErrorKind::SemanticError,
                message: "x undeclared".into(),
                location: Location { line: 1, column: 21 },
            }
        );
    }

    #[test]
    fn test_success_report_json() {
        let source = "PROGRAM T; VAR a : INTEGER; r : REAL; BEGIN a := 2; r := a / 4 END.";
        let output = crate::run(source).unwrap();
        let report = RunReport::success("t.pas".into(), &output, 19);
        assert_eq!(report.stats.declaration_count, 2);
        assert_eq!(report.stats.statement_count, 2);

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["bindings"][0]["name"], "a");
        assert_eq!(json["bindings"][0]["ty"], "Integer");
        assert_eq!(json["bindings"][0]["value"], 2);
        assert_eq!(json["bindings"][1]["value"], 0.5);
    }

    #[test]
    fn test_failure_report_json() {
        let err = Error::UnexpectedChar {
            ch: '#',
            span: Span::new(27, 28, 1, 28),
        };
        let report = RunReport::failure("t.pas".into(), &err, 0);
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["diagnostics"][0]["code"], "E0001");
        assert_eq!(json["diagnostics"][0]["kind"], "LexError");
        assert_eq!(json["diagnostics"][0]["location"]["column"], 28);
    }
}
