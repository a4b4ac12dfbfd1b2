//! Structured tree model
//!
//! The in-memory form of a parsed configuration document. A tree is one of
//! four kinds: Mapping, Sequence, Scalar or Null. Mappings keep the order in
//! which keys were declared; that order is carried to output but ignored by
//! equality.
//!
//! Compound payloads sit behind `Arc`, so a tree is immutable once built and
//! cloning an unchanged sub-tree shares it instead of copying it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Structural category of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Mapping,
    Sequence,
    Scalar,
    Null,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Mapping => "mapping",
            Kind::Sequence => "sequence",
            Kind::Scalar => "scalar",
            Kind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A leaf value.
///
/// Equality is type-sensitive: `Str("1")` is not `Int(1)` and `Int(1)` is
/// not `Float(1.0)`. NaN compares equal to NaN so that every tree is equal
/// to itself.
#[derive(Debug, Clone)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    /// Only for integers above `i64::MAX`; use `Scalar::from(u64)` to get
    /// the canonical variant.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::UInt(a), Scalar::UInt(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(signed) => Scalar::Int(signed),
            Err(_) => Scalar::UInt(value),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// Ordered mapping with unique string keys.
///
/// Re-inserting an existing key replaces its value in place; the key keeps
/// the position of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: IndexMap<String, Tree>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a key, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tree>) -> Option<Tree> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tree)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Tree>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// A parsed structured document.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Mapping(Arc<Mapping>),
    Sequence(Arc<Vec<Tree>>),
    Scalar(Scalar),
    Null,
}

impl Tree {
    /// An empty mapping, the shape of an empty document
    pub fn empty_mapping() -> Self {
        Tree::Mapping(Arc::new(Mapping::new()))
    }

    pub fn sequence(items: Vec<Tree>) -> Self {
        Tree::Sequence(Arc::new(items))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Tree::Mapping(_) => Kind::Mapping,
            Tree::Sequence(_) => Kind::Sequence,
            Tree::Scalar(_) => Kind::Scalar,
            Tree::Null => Kind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Tree::Mapping(mapping) => Some(mapping.as_ref()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Tree]> {
        match self {
            Tree::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Tree::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up a key; `None` when absent or when this node is not a mapping
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }

    /// Mapping keys in declaration order; empty for every other kind
    pub fn keys(&self) -> Vec<&str> {
        self.as_mapping()
            .map(|mapping| mapping.keys().collect())
            .unwrap_or_default()
    }

    /// Dotted paths of every leaf, in declaration order.
    ///
    /// Sequences and empty mappings count as leaves. A tree that is itself a
    /// leaf reports the single path `.`.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(self, None, &mut paths);
        if paths.is_empty() {
            paths.push(".".to_string());
        }
        paths
    }
}

fn collect_leaf_paths(tree: &Tree, prefix: Option<&str>, paths: &mut Vec<String>) {
    match tree {
        Tree::Mapping(mapping) if !mapping.is_empty() => {
            for (key, value) in mapping.iter() {
                let path = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.to_string(),
                };
                collect_leaf_paths(value, Some(&path), paths);
            }
        }
        _ => {
            if let Some(path) = prefix {
                paths.push(path.to_string());
            }
        }
    }
}

impl From<Mapping> for Tree {
    fn from(mapping: Mapping) -> Self {
        Tree::Mapping(Arc::new(mapping))
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::sequence(items)
    }
}

impl From<Scalar> for Tree {
    fn from(scalar: Scalar) -> Self {
        Tree::Scalar(scalar)
    }
}

impl From<bool> for Tree {
    fn from(value: bool) -> Self {
        Tree::Scalar(value.into())
    }
}

impl From<i64> for Tree {
    fn from(value: i64) -> Self {
        Tree::Scalar(value.into())
    }
}

impl From<u64> for Tree {
    fn from(value: u64) -> Self {
        Tree::Scalar(value.into())
    }
}

impl From<f64> for Tree {
    fn from(value: f64) -> Self {
        Tree::Scalar(value.into())
    }
}

impl From<&str> for Tree {
    fn from(value: &str) -> Self {
        Tree::Scalar(value.into())
    }
}

impl From<String> for Tree {
    fn from(value: String) -> Self {
        Tree::Scalar(value.into())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::UInt(u) => serializer.serialize_u64(*u),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Mapping(mapping) => mapping.serialize(serializer),
            Tree::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Scalar(scalar) => scalar.serialize(serializer),
            Tree::Null => serializer.serialize_unit(),
        }
    }
}
