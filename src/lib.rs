//! Pascalette
//!
//! An interpreter for a small Pascal subset: `PROGRAM`, `VAR` declarations of
//! `INTEGER` and `REAL` variables, nested `PROCEDURE` declarations, compound
//! statements, assignments and arithmetic.
//!
//! Pipeline: source -> [`frontend::lexer`] -> [`frontend::parser`] ->
//! [`frontend::semantic`] -> [`interp::evaluator`]. Every stage fails fast:
//! the first error ends the run.

pub mod frontend;
pub mod interp;
pub mod types;
pub mod utils;
pub mod feedback;

use serde::Serialize;

use frontend::ast::Program;
use frontend::lexer::Lexer;
use frontend::parser::Parser;
use frontend::scope::Scope;
use frontend::semantic::SemanticAnalyzer;
use frontend::token::Token;
use interp::{Evaluator, Number, RuntimeStore};
use types::BuiltinType;

pub use utils::{Error, ErrorKind, Result, Span};

/// A final variable binding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub name: String,
    /// Declared type, when the name is a global variable
    pub ty: Option<BuiltinType>,
    pub value: Number,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub program: Program,
    /// Final runtime store, sorted by name, spelled as declared
    pub bindings: Vec<Binding>,
    /// Global scope after analysis
    pub globals: Scope,
}

impl RunOutput {
    /// Final value of a variable, looked up case-insensitively
    pub fn get(&self, name: &str) -> Option<Number> {
        self.bindings
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .map(|b| b.value)
    }
}

/// Lex the source
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Lex and parse the source
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(Lexer::new(source))?.parse_program()
}

/// Lex, parse and analyze the source without evaluating it
pub fn check(source: &str) -> Result<(Program, Scope)> {
    let program = parse(source)?;
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&program)?;
    Ok((program, analyzer.into_global_scope()))
}

/// Run the whole pipeline
pub fn run(source: &str) -> Result<RunOutput> {
    let (program, globals) = check(source)?;

    let mut store = RuntimeStore::new();
    Evaluator::new(&mut store).run(&program)?;

    let bindings = store
        .iter()
        .map(|(key, value)| {
            let symbol = globals.get(key);
            Binding {
                name: symbol.map_or_else(|| key.to_string(), |s| s.name.clone()),
                ty: symbol.and_then(|s| s.var_type()),
                value,
            }
        })
        .collect();

    Ok(RunOutput {
        program,
        bindings,
        globals,
    })
}
