// Safe stringifier - turns any value graph into text a string-only channel can carry
//
// Opaque host handles and callables become fixed labels, array-like objects are
// normalized to arrays, and a revisited object becomes a circular marker naming
// the key it was first seen under. Nesting past MAX_DEPTH is cut off with a
// fixed label so the walk and the JSON it builds stay within the stack.

use super::{HostKind, Object, Value};
use serde_json::{Map, Number};
use std::collections::HashMap;

pub const NODE_PLACEHOLDER: &str = "[ Node ]";
pub const WINDOW_PLACEHOLDER: &str = "[ Window ]";
pub const FUNCTION_PLACEHOLDER: &str = "[ Function ]";
pub const DEPTH_PLACEHOLDER: &str = "[ Depth limit ]";

/// Deepest array/object nesting written out before `DEPTH_PLACEHOLDER`
pub const MAX_DEPTH: usize = 512;

/// Stringify a value for transport.
///
/// Scalars come back unchanged as their JSON equivalent (`Undefined` becomes
/// `None` so the owning field is omitted). Every graph value, including a bare
/// host handle or callable, comes back as a JSON string holding its serialized
/// text. Never fails and always terminates.
pub fn stringify(value: &Value) -> Option<serde_json::Value> {
    if value.is_scalar() {
        return scalar_to_json(value);
    }

    let mut walker = Walker::default();
    let json = walker.walk("", value).unwrap_or(serde_json::Value::Null);
    Some(serde_json::Value::String(json.to_string()))
}

/// Display form of a value: strings raw, everything else stringified
pub fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => match stringify(other) {
            Some(serde_json::Value::String(s)) => s,
            Some(json) => json.to_string(),
            None => "undefined".to_string(),
        },
    }
}

#[derive(Default)]
struct Walker {
    /// identity -> key the value was first reached under
    seen: HashMap<usize, String>,
    depth: usize,
}

impl Walker {
    fn walk(&mut self, key: &str, value: &Value) -> Option<serde_json::Value> {
        // Falsy values serialize as themselves
        if !value.is_truthy() {
            return scalar_to_json(value);
        }

        match value {
            Value::Host(HostKind::Node) => Some(NODE_PLACEHOLDER.into()),
            Value::Host(HostKind::Window) => Some(WINDOW_PLACEHOLDER.into()),
            Value::Function(_) => Some(FUNCTION_PLACEHOLDER.into()),
            Value::Array(_) | Value::Object(_) => Some(self.walk_graph(key, value)),
            scalar => scalar_to_json(scalar),
        }
    }

    fn walk_graph(&mut self, key: &str, value: &Value) -> serde_json::Value {
        if self.depth >= MAX_DEPTH {
            return DEPTH_PLACEHOLDER.into();
        }
        if let Some(identity) = value.identity() {
            if let Some(first_key) = self.seen.get(&identity) {
                let path = if first_key.is_empty() {
                    "root"
                } else {
                    first_key.as_str()
                };
                return serde_json::Value::String(format!("[ Circular {{{}}} ]", path));
            }
            self.seen.insert(identity, key.to_string());
        }

        self.depth += 1;
        let json = match value {
            Value::Array(items) => self.walk_elements(&items.borrow()),
            Value::Object(object) => {
                let object = object.borrow();
                match array_like(&object) {
                    Some(elements) => self.walk_elements(&elements),
                    None => self.walk_properties(&object),
                }
            }
            _ => serde_json::Value::Null,
        };
        self.depth -= 1;
        json
    }

    fn walk_elements(&mut self, items: &[Value]) -> serde_json::Value {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            out.push(
                self.walk(&index.to_string(), item)
                    .unwrap_or(serde_json::Value::Null),
            );
        }
        serde_json::Value::Array(out)
    }

    fn walk_properties(&mut self, object: &Object) -> serde_json::Value {
        let mut out = Map::new();
        for (key, item) in object.iter() {
            if let Some(json) = self.walk(key, item) {
                out.insert(key.to_string(), json);
            }
        }
        serde_json::Value::Object(out)
    }
}

/// Elements of an object with a positive integer `length` and every index below it
fn array_like(object: &Object) -> Option<Vec<Value>> {
    let Some(Value::Number(length)) = object.get("length") else {
        return None;
    };
    if *length < 1.0 || length.fract() != 0.0 || *length >= object.len() as f64 {
        return None;
    }

    (0..*length as usize)
        .map(|index| object.get(&index.to_string()).cloned())
        .collect()
}

fn scalar_to_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::Undefined => None,
        Value::Null => Some(serde_json::Value::Null),
        Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
        Value::Number(n) => Some(number_to_json(*n)),
        Value::String(s) => Some(serde_json::Value::String(s.clone())),
        _ => None,
    }
}

/// Integral values print without a fraction; non-finite values become null
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
