//! Types known to the interpreter

pub mod type_system;

pub use type_system::BuiltinType;
