//! Type System for Pascalette

use serde::{Deserialize, Serialize};
use std::fmt;

/// Builtin scalar types, seeded into the global scope before any user declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinType {
    Integer,
    Real,
}

impl BuiltinType {
    /// All builtin types, in the order they are seeded
    pub const ALL: [BuiltinType; 2] = [BuiltinType::Integer, BuiltinType::Real];

    /// Name under which the type symbol is registered
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
