//! # Record Accessors
//!
//! Grids and forms bind to records by name. Instead of runtime reflection,
//! every record type registers a table of named getters once:
//!
//! ```text
//! Accessors::new()
//!     .property("capacity", |c: &Channel| Value::Int(c.capacity))   // stored data
//!     .derived("node", |c: &Channel| Value::Text(c.display_name())) // computed projection
//! ```
//!
//! Lookup checks properties first, then derived accessors. A name that
//! resolves to neither yields `None`, which callers render as a blank cell.

use std::fmt;

/// A value read out of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
    Bool(bool),
    /// Unix timestamp in seconds.
    Timestamp(i64),
    List(Vec<String>),
}

impl Value {
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) | Value::Timestamp(i) => *i != 0,
            Value::Text(s) => matches!(s.as_str(), "true" | "1" | "X"),
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) | Value::Timestamp(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => s.trim().parse().ok(),
            Value::List(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(i) | Value::Timestamp(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

type Getter<R> = fn(&R) -> Value;

/// Named getters for one record type, built once and shared.
pub struct Accessors<R> {
    properties: Vec<(&'static str, Getter<R>)>,
    derived: Vec<(&'static str, Getter<R>)>,
}

impl<R> Default for Accessors<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Accessors<R> {
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            derived: Vec::new(),
        }
    }

    /// Register a stored field.
    pub fn property(mut self, name: &'static str, getter: Getter<R>) -> Self {
        self.properties.push((name, getter));
        self
    }

    /// Register a computed accessor. Consulted only when no property matches.
    pub fn derived(mut self, name: &'static str, getter: Getter<R>) -> Self {
        self.derived.push((name, getter));
        self
    }

    pub fn resolve(&self, record: &R, name: &str) -> Option<Value> {
        self.properties
            .iter()
            .chain(self.derived.iter())
            .find(|(n, _)| *n == name)
            .map(|(_, getter)| getter(record))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties
            .iter()
            .chain(self.derived.iter())
            .any(|(n, _)| *n == name)
    }
}

/// A type that can be displayed in a grid.
pub trait Record: Sized + Send + 'static {
    fn accessors() -> &'static Accessors<Self>;
}

/// Resolve `name` on `record`; `None` means neither a property nor a derived accessor exists.
pub fn resolve<R: Record>(record: &R, name: &str) -> Option<Value> {
    R::accessors().resolve(record, name)
}
