//! Interpreter module - runtime values, store and evaluator

pub mod value;
pub mod store;
pub mod evaluator;

pub use evaluator::Evaluator;
pub use store::RuntimeStore;
pub use value::Number;
