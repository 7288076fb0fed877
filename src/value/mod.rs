// Value module - dynamic payloads carried by expectation results
// Expected/actual values can be arbitrary graphs: shared, cyclic, or opaque host handles.

pub mod stringify;

pub use stringify::{render_text, stringify};

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, interior-mutable handle. Identity is the allocation, not the contents.
pub type Shared<T> = Rc<RefCell<T>>;

/// Opaque handles owned by the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// A document node
    Node,
    /// The global window object
    Window,
}

/// An arbitrary value produced by a test
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Callable value, optionally named
    Function(Option<String>),
    Host(HostKind),
    Array(Shared<Vec<Value>>),
    Object(Shared<Object>),
}

/// Object with insertion-ordered properties
#[derive(Debug, Clone, Default)]
pub struct Object {
    properties: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an existing one in place
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Value {
    /// Build a fresh object from key/value pairs
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut object = Object::new();
        for (key, value) in entries {
            object.set(key, value);
        }
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Build a fresh array
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Some(name.into()))
    }

    /// Set a property on an object value. No-op for anything else.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        if let Value::Object(object) = self {
            object.borrow_mut().set(key, value);
        }
    }

    /// Falsiness as the test environment sees it
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Function(_) | Value::Host(_) | Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Graph values need serialization; scalars pass through
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// Address of the shared allocation, used as identity for cycle detection
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
