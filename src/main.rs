//! Pascalette command line
//!
//! Reads a source file and runs it through the interpreter.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pascalette::feedback::RunReport;
use pascalette::frontend::scope::Scope;
use pascalette::Error;

/// Pascalette interpreter
#[derive(Parser, Debug)]
#[command(name = "pasc")]
#[command(version = "0.1.0")]
#[command(about = "Pascalette - interpreter for a small Pascal subset")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input source file (.pas)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Also print the global symbol table after a run
    #[arg(long, global = true)]
    symbols: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a source file
    Run {
        /// Input source file
        input: PathBuf,
    },
    /// Check a source file for errors without running it
    Check {
        /// Input source file
        input: PathBuf,
    },
    /// Print the token stream of a source file
    Tokens {
        /// Input source file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Run { input }) => run_file(input, &cli),
        Some(Commands::Check { input }) => check_file(input, &cli),
        Some(Commands::Tokens { input }) => dump_tokens(input, &cli),
        None => match &cli.input {
            Some(input) => run_file(input, &cli),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: pasc <FILE> or pasc run <FILE>");
                process::exit(1);
            }
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn read_source(input: &Path) -> anyhow::Result<String> {
    fs::read_to_string(input).with_context(|| format!("could not read {}", input.display()))
}

fn report_error(err: &Error) {
    eprintln!("{}", err.report());
}

fn print_scope(scope: &Scope) {
    print!("{}", scope);
}

/// Run a source file. Returns whether the run succeeded.
fn run_file(input: &Path, cli: &Cli) -> anyhow::Result<bool> {
    let source = read_source(input)?;
    let source_file = input.display().to_string();
    let token_count = pascalette::tokenize(&source).map(|t| t.len()).unwrap_or(0);

    match pascalette::run(&source) {
        Ok(output) => {
            if cli.json {
                println!("{}", RunReport::success(source_file, &output, token_count).to_json());
                return Ok(true);
            }
            for binding in &output.bindings {
                match binding.ty {
                    Some(ty) => println!("{} ({}) = {}", binding.name, ty, binding.value),
                    None => println!("{} = {}", binding.name, binding.value),
                }
            }
            if cli.symbols {
                print_scope(&output.globals);
            }
            Ok(true)
        }
        Err(err) => {
            if cli.json {
                println!("{}", RunReport::failure(source_file, &err, token_count).to_json());
            } else {
                report_error(&err);
            }
            Ok(false)
        }
    }
}

/// Check a source file without evaluating it
fn check_file(input: &Path, cli: &Cli) -> anyhow::Result<bool> {
    let source = read_source(input)?;

    match pascalette::check(&source) {
        Ok((program, globals)) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&program)?);
            } else {
                print_scope(&globals);
                println!("No errors found in {}", program.name.name);
            }
            Ok(true)
        }
        Err(err) => {
            if cli.json {
                let report = RunReport::failure(input.display().to_string(), &err, 0);
                println!("{}", report.to_json());
            } else {
                report_error(&err);
            }
            Ok(false)
        }
    }
}

/// Print every token with its position
fn dump_tokens(input: &Path, cli: &Cli) -> anyhow::Result<bool> {
    let source = read_source(input)?;

    match pascalette::tokenize(&source) {
        Ok(tokens) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for (i, token) in tokens.iter().enumerate() {
                    println!("Token[{}] := {{{}}} '{}' at {}", i, token.kind, token.lexeme, token.span);
                }
            }
            Ok(true)
        }
        Err(err) => {
            report_error(&err);
            Ok(false)
        }
    }
}
