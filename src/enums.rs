//! Enumeration tables for enumerated integers and named textual conventions.
//!
//! A table is either owned by the object that declared it inline, or shared
//! through the [`TcRegistry`](crate::tc::TcRegistry) and referenced by id.

use crate::tc::{TcId, TcRegistry};

/// Ordered `(value, label)` pairs.
///
/// Insertion order is preserved and lookups return the first match, so a
/// table with a repeated value or label keeps its first definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTable {
    entries: Vec<(i32, Box<str>)>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn push(&mut self, value: i32, label: impl Into<Box<str>>) {
        self.entries.push((value, label.into()));
    }

    /// Label for a value.
    pub fn label(&self, value: i32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| &**label)
    }

    /// Value for a label (exact, case-sensitive).
    pub fn value(&self, label: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(_, l)| &**l == label)
            .map(|(v, _)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries.iter().map(|(v, l)| (*v, &**l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<Box<str>>> FromIterator<(i32, S)> for EnumTable {
    fn from_iter<T: IntoIterator<Item = (i32, S)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(v, l)| (v, l.into())).collect(),
        }
    }
}

/// Where an object's enumeration lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumRef {
    /// Declared inline with the object; dropped with it.
    Owned(EnumTable),
    /// Named convention owned by the registry.
    Shared(TcId),
}

impl EnumRef {
    /// Resolve to the table, looking shared ids up in `registry`.
    pub fn resolve<'a>(&'a self, registry: &'a TcRegistry) -> Option<&'a EnumTable> {
        match self {
            EnumRef::Owned(table) => Some(table),
            EnumRef::Shared(id) => registry.get(*id).and_then(|def| def.enums.as_ref()),
        }
    }
}
