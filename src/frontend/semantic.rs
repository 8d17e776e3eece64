//! Semantic Analysis for Pascalette
//!
//! A single walk over the AST, before evaluation, that checks:
//! - declared types resolve to builtin types
//! - no name is declared twice in one scope
//! - every variable used is declared in the current or an enclosing scope

use crate::frontend::ast::*;
use crate::frontend::scope::{Scope, ScopeManager, Symbol, SymbolKind};
use crate::types::BuiltinType;
use crate::utils::{Error, Result};

/// Semantic analyzer
#[derive(Debug)]
pub struct SemanticAnalyzer {
    pub scopes: ScopeManager,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeManager::new(),
        }
    }

    /// Analyze a whole program. The first error aborts the walk.
    pub fn analyze(&mut self, program: &Program) -> Result<()> {
        log::debug!("analyzing program {}", program.name.name);
        self.check_block(&program.block)
    }

    /// The global scope, holding the program's top-level declarations
    pub fn global_scope(&self) -> &Scope {
        self.scopes.global()
    }

    pub fn into_global_scope(self) -> Scope {
        self.scopes.into_global()
    }

    fn check_block(&mut self, block: &Block) -> Result<()> {
        for decl in &block.declarations {
            match decl {
                Decl::Var(var) => self.check_var_decl(var)?,
                Decl::Procedure(proc) => self.check_procedure(proc)?,
            }
        }
        self.check_compound(&block.compound)
    }

    /// Resolve a type name to a builtin type visible from the current scope
    fn resolve_type(&self, ty: &TypeSpec) -> Result<BuiltinType> {
        match self.scopes.lookup(&ty.name, false).map(|s| &s.kind) {
            Some(SymbolKind::BuiltinType(builtin)) => Ok(*builtin),
            _ => Err(Error::UnknownType {
                name: ty.name.clone(),
                span: ty.span,
            }),
        }
    }

    fn check_var_decl(&mut self, var: &VarDecl) -> Result<()> {
        let ty = self.resolve_type(&var.ty)?;
        if self.scopes.lookup(&var.name.name, true).is_some() {
            return Err(Error::DuplicateDefinition {
                name: var.name.name.clone(),
                span: var.name.span,
            });
        }
        self.scopes
            .define(Symbol::variable(var.name.name.clone(), ty, var.name.span))
    }

    fn check_procedure(&mut self, proc: &ProcDecl) -> Result<()> {
        let params = proc
            .params
            .iter()
            .map(|param| self.resolve_type(&param.ty).map(|ty| (param.name.name.clone(), ty)))
            .collect::<Result<Vec<_>>>()?;

        self.scopes.define(Symbol::procedure(
            proc.name.name.clone(),
            params.clone(),
            proc.name.span,
        ))?;

        self.scopes.enter_scope(&proc.name.name);
        let result = self.check_procedure_scope(proc, params);
        self.scopes.leave_scope();
        result
    }

    fn check_procedure_scope(&mut self, proc: &ProcDecl, params: Vec<(String, BuiltinType)>) -> Result<()> {
        for (param, (name, ty)) in proc.params.iter().zip(params) {
            self.scopes.define(Symbol::variable(name, ty, param.name.span))?;
        }
        self.check_block(&proc.body)
    }

    fn check_compound(&mut self, compound: &Compound) -> Result<()> {
        for stmt in &compound.statements {
            match stmt {
                Stmt::Compound(inner) => self.check_compound(inner)?,
                Stmt::Assign(assign) => {
                    self.check_variable(&assign.target)?;
                    self.check_expr(&assign.value)?;
                }
            }
        }
        Ok(())
    }

    fn check_variable(&self, var: &Variable) -> Result<()> {
        match self.scopes.lookup(&var.name, false) {
            Some(symbol) if matches!(symbol.kind, SymbolKind::Variable { .. }) => Ok(()),
            Some(_) => Err(Error::NotAVariable {
                name: var.name.clone(),
                span: var.span,
            }),
            None => Err(Error::UndeclaredVariable {
                name: var.name.clone(),
                span: var.span,
            }),
        }
    }

    fn check_expr(&self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Variable(var) => self.check_variable(var),
            Expr::Binary { left, right, .. } => {
                self.check_expr(left)?;
                self.check_expr(right)
            }
            Expr::Unary { operand, .. } => self.check_expr(operand),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
