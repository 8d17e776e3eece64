//! Tree-walking evaluator
//!
//! Runs after semantic analysis succeeded. Statements are executed for their
//! effect on the runtime store; expressions evaluate left operand, then right,
//! then combine.

use crate::frontend::ast::*;
use crate::interp::store::RuntimeStore;
use crate::interp::value::Number;
use crate::utils::{Error, Result};

pub struct Evaluator<'a> {
    store: &'a mut RuntimeStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a mut RuntimeStore) -> Self {
        Self { store }
    }

    /// Execute the program's main block
    pub fn run(&mut self, program: &Program) -> Result<()> {
        log::debug!("evaluating program {}", program.name.name);
        self.exec_block(&program.block)
    }

    fn exec_block(&mut self, block: &Block) -> Result<()> {
        for decl in &block.declarations {
            match decl {
                // Declarations only shape the scopes; nothing to do at runtime.
                Decl::Var(_) => {}
                Decl::Procedure(proc) => {
                    log::trace!("skipping body of procedure {}", proc.name.name);
                }
            }
        }
        self.exec_compound(&block.compound)
    }

    fn exec_compound(&mut self, compound: &Compound) -> Result<()> {
        for stmt in &compound.statements {
            match stmt {
                Stmt::Compound(inner) => self.exec_compound(inner)?,
                Stmt::Assign(assign) => self.exec_assign(assign)?,
            }
        }
        Ok(())
    }

    fn exec_assign(&mut self, assign: &Assignment) -> Result<()> {
        let value = self.eval_expr(&assign.value)?;
        log::trace!("{} := {}", assign.target.name, value);
        self.store.set(&assign.target.name, value);
        Ok(())
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Number> {
        match expr {
            Expr::Literal(lit) => eval_literal(lit),
            Expr::Variable(var) => self.store.get(&var.name).ok_or_else(|| Error::UnassignedVariable {
                name: var.name.clone(),
                span: var.span,
            }),
            Expr::Binary { left, op, right, span } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                match op {
                    BinOp::Add => left.add(right, *span),
                    BinOp::Sub => left.sub(right, *span),
                    BinOp::Mul => left.mul(right, *span),
                    BinOp::IntDiv => left.int_div(right, *span),
                    BinOp::RealDiv => left.real_div(right, *span),
                }
            }
            Expr::Unary { op, operand, span } => {
                let value = self.eval_expr(operand)?;
                match op {
                    UnOp::Plus => Ok(value),
                    UnOp::Neg => value.neg(*span),
                }
            }
        }
    }
}

fn eval_literal(lit: &Literal) -> Result<Number> {
    let invalid = || Error::InvalidLiteral {
        text: lit.text.clone(),
        span: lit.span,
    };
    match lit.kind {
        LiteralKind::Integer => lit.text.parse().map(Number::Integer).map_err(|_| invalid()),
        LiteralKind::Real => lit.text.parse().map(Number::Real).map_err(|_| invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;
    use crate::utils::Span;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Result<RuntimeStore> {
        let program = Parser::new(Lexer::new(source))?.parse_program()?;
        let mut store = RuntimeStore::new();
        Evaluator::new(&mut store).run(&program)?;
        Ok(store)
    }

    fn eval(source: &str) -> Result<Number> {
        let expr = Parser::new(Lexer::new(source))?.parse_expr()?;
        let mut store = RuntimeStore::new();
        Evaluator::new(&mut store).eval_expr(&expr)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), Number::Integer(14));
        assert_eq!(eval("(2 + 3) * 4").unwrap(), Number::Integer(20));
        assert_eq!(eval("10 - 2 - 3").unwrap(), Number::Integer(5));
        assert_eq!(eval("7 DIV 2").unwrap(), Number::Integer(3));
        assert_eq!(eval("(0 - 7) DIV 2").unwrap(), Number::Integer(-3));
        assert_eq!(eval("7 / 2").unwrap(), Number::Real(3.5));
        assert_eq!(eval("1.5 * 2").unwrap(), Number::Real(3.0));
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("-3").unwrap(), Number::Integer(-3));
        assert_eq!(eval("--3").unwrap(), Number::Integer(3));
        assert_eq!(eval("5 - - - 2").unwrap(), Number::Integer(3));
        assert_eq!(eval("+(-2.5)").unwrap(), Number::Real(-2.5));
    }

    #[test]
    fn test_assignments_in_order() {
        let store = run("PROGRAM T; BEGIN a := 2; b := a + 3 * 2; BEGIN a := b DIV 3 END END.").unwrap();
        assert_eq!(store.get("a"), Some(Number::Integer(2)));
        assert_eq!(store.get("b"), Some(Number::Integer(8)));
    }

    #[test]
    fn test_empty_compound_has_no_effect() {
        let store = run("PROGRAM T; BEGIN END.").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_procedure_bodies_do_not_run() {
        let store = run("PROGRAM T; PROCEDURE P; BEGIN hidden := 1 END; BEGIN shown := 2 END.").unwrap();
        assert_eq!(store.get("hidden"), None);
        assert_eq!(store.get("shown"), Some(Number::Integer(2)));
    }

    #[test]
    fn test_unassigned_read() {
        let err = run("PROGRAM T; BEGIN a := b END.").unwrap_err();
        assert_eq!(
            err,
            Error::UnassignedVariable {
                name: "b".into(),
                span: Span::new(22, 23, 1, 23),
            }
        );
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval("1 DIV (2 - 2)").unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { .. }));
    }

    #[test]
    fn test_literal_out_of_range() {
        let err = eval("99999999999999999999").unwrap_err();
        assert!(matches!(err, Error::InvalidLiteral { ref text, .. } if text == "99999999999999999999"));
    }
}
