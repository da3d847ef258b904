//! Value types for the keyspace

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// The type of a stored key, as reported by TYPE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    List,
    Set,
}

impl KeyType {
    /// Get the type name as the server spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::List => "list",
            KeyType::Set => "set",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the different types of values that can be stored
///
/// The variant is the key's type, so a key can never have a type without a
/// value of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Ordered list of elements
    List(VecDeque<String>),

    /// Set of unique members, kept sorted
    Set(BTreeSet<String>),
}

impl Value {
    /// Create an empty list
    pub fn empty_list() -> Self {
        Value::List(VecDeque::new())
    }

    /// Create an empty set
    pub fn empty_set() -> Self {
        Value::Set(BTreeSet::new())
    }

    /// The type tag of this value
    pub fn key_type(&self) -> KeyType {
        match self {
            Value::List(_) => KeyType::List,
            Value::Set(_) => KeyType::Set,
        }
    }

    /// Number of elements or members
    pub fn len(&self) -> usize {
        match self {
            Value::List(list) => list.len(),
            Value::Set(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Try to get as list reference
    pub fn as_list(&self) -> Option<&VecDeque<String>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut VecDeque<String>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as set reference
    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as mutable set
    pub fn as_set_mut(&mut self) -> Option<&mut BTreeSet<String>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::empty_list().key_type().as_str(), "list");
        assert_eq!(Value::empty_set().key_type().to_string(), "set");
    }

    #[test]
    fn test_accessors_respect_type() {
        let mut list = Value::empty_list();
        assert!(list.as_set().is_none());
        list.as_list_mut().unwrap().push_back("a".into());
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
    }
}
