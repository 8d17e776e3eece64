//! Flat runtime store: variable name to current value, for one run
//!
//! Names are case-insensitive and stored upper-cased.

use std::collections::BTreeMap;

use crate::interp::value::Number;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeStore {
    values: BTreeMap<String, Number>,
}

impl RuntimeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Number> {
        self.values.get(&name.to_ascii_uppercase()).copied()
    }

    /// Store a value, overwriting any previous one
    pub fn set(&mut self, name: &str, value: Number) {
        self.values.insert(name.to_ascii_uppercase(), value);
    }

    /// Bindings sorted by upper-cased name
    pub fn iter(&self) -> impl Iterator<Item = (&str, Number)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut store = RuntimeStore::new();
        store.set("b", Number::Integer(1));
        store.set("a", Number::Real(2.5));
        store.set("B", Number::Integer(3));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b"), Some(Number::Integer(3)));
        let names: Vec<&str> = store.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(store.get("c"), None);
    }
}
