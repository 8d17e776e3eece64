//! Scoped symbol table
//!
//! Scopes live in an arena and refer to their enclosing scope by index. They
//! are entered and left strictly in LIFO order, so the arena doubles as the
//! scope stack: the current scope is always the last one.
//!
//! Names are case-insensitive: symbols are keyed by their upper-cased name and
//! keep the spelling of their declaration for display.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::types::BuiltinType;
use crate::utils::{Error, Result, Span};

/// Index of a scope in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(usize);

/// Symbol information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SymbolKind {
    BuiltinType(BuiltinType),
    Variable { ty: BuiltinType },
    Procedure { params: Vec<(String, BuiltinType)> },
}

impl Symbol {
    pub fn builtin(ty: BuiltinType) -> Self {
        Self {
            name: ty.name().to_string(),
            kind: SymbolKind::BuiltinType(ty),
            span: Span::default(),
        }
    }

    pub fn variable(name: impl Into<String>, ty: BuiltinType, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable { ty },
            span,
        }
    }

    pub fn procedure(name: impl Into<String>, params: Vec<(String, BuiltinType)>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Procedure { params },
            span,
        }
    }

    /// Declared type, for variables
    pub fn var_type(&self) -> Option<BuiltinType> {
        match self.kind {
            SymbolKind::Variable { ty } => Some(ty),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::BuiltinType(_) => write!(f, "{}", self.name),
            SymbolKind::Variable { ty } => write!(f, "{}: <{}>", self.name, ty),
            SymbolKind::Procedure { params } => {
                let params: Vec<String> = params
                    .iter()
                    .map(|(name, ty)| format!("{}: <{}>", name, ty))
                    .collect();
                write!(f, "{}: <{}>", self.name, params.join(", "))
            }
        }
    }
}

/// A named scope containing symbols
#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub level: usize,
    pub enclosing: Option<ScopeId>,
    /// Keyed by upper-cased name
    symbols: HashMap<String, Symbol>,
    /// Definition order, for deterministic dumps
    order: Vec<String>,
}

impl Scope {
    fn new(name: impl Into<String>, level: usize, enclosing: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            level,
            enclosing,
            symbols: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(&name.to_ascii_uppercase())
    }

    fn insert(&mut self, symbol: Symbol) -> Result<()> {
        let key = symbol.name.to_ascii_uppercase();
        if self.symbols.contains_key(&key) {
            return Err(Error::DuplicateDefinition {
                name: symbol.name,
                span: symbol.span,
            });
        }
        self.order.push(key.clone());
        self.symbols.insert(key, symbol);
        Ok(())
    }

    /// Symbols in definition order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().filter_map(|name| self.symbols.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SymbolTable := {} at scope {}", self.name, self.level)?;
        for symbol in self.symbols() {
            writeln!(f, "    {}", symbol)?;
        }
        Ok(())
    }
}

/// Symbol table with nested scopes
#[derive(Debug)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
}

impl ScopeManager {
    /// Create the global scope, seeded with the builtin types
    pub fn new() -> Self {
        let mut global = Scope::new("global", 0, None);
        for ty in BuiltinType::ALL {
            global.symbols.insert(ty.name().to_string(), Symbol::builtin(ty));
            global.order.push(ty.name().to_string());
        }
        Self { scopes: vec![global] }
    }

    fn current_id(&self) -> ScopeId {
        ScopeId(self.scopes.len() - 1)
    }

    /// The innermost scope
    pub fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn level(&self) -> usize {
        self.current().level
    }

    /// Enter a new scope nested in the current one
    pub fn enter_scope(&mut self, name: &str) -> ScopeId {
        let enclosing = self.current_id();
        let level = self.level() + 1;
        self.scopes.push(Scope::new(name, level, Some(enclosing)));
        log::debug!("ENTER scope: {} (level {})", name, level);
        self.current_id()
    }

    /// Leave the current scope and hand it back. The global scope is never left.
    pub fn leave_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() == 1 {
            return None;
        }
        let scope = self.scopes.pop()?;
        log::debug!("LEAVE scope: {}\n{}", scope.name, scope);
        Some(scope)
    }

    /// Define a symbol in the current scope
    pub fn define(&mut self, symbol: Symbol) -> Result<()> {
        let last = self.scopes.len() - 1;
        self.scopes[last].insert(symbol)
    }

    /// Look up a symbol in the current scope, then (unless `current_scope_only`)
    /// through the chain of enclosing scopes
    pub fn lookup(&self, name: &str, current_scope_only: bool) -> Option<&Symbol> {
        let mut scope_id = Some(self.current_id());
        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0];
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
            if current_scope_only {
                break;
            }
            scope_id = scope.enclosing;
        }
        None
    }

    /// Consume the manager, returning the global scope
    pub fn into_global(mut self) -> Scope {
        self.scopes.swap_remove(0)
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}
