//! Order-independent serialization of formatter options into cache keys.
//!
//! `OptionValue` models the loosely-typed option bags a UI hands to a number
//! formatter, including values plain JSON cannot carry (undefined, functions,
//! symbols, bigints) and objects shared by reference, which may form cycles.
//! `stable_stringify` is total over all of them. Sentinels are written as bare
//! tokens, never quoted, so no string value can produce the same key.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use serde_json::{Map, Number, Value};

pub const UNDEFINED_SENTINEL: &str = "__undefined__";
pub const FUNCTION_SENTINEL: &str = "__function__";
pub const SYMBOL_SENTINEL: &str = "__symbol__";
pub const BIGINT_SENTINEL: &str = "__bigint__";
pub const CIRCULAR_SENTINEL: &str = "__circular__";
pub const NAN_SENTINEL: &str = "__nan__";
pub const INFINITY_SENTINEL: &str = "__infinity__";
pub const NEG_INFINITY_SENTINEL: &str = "__-infinity__";

pub type ObjectRef = Rc<RefCell<Vec<(String, OptionValue)>>>;

#[derive(Clone, Debug)]
pub enum OptionValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    BigInt(i128),
    Symbol(Option<String>),
    Function,
    Array(Vec<OptionValue>),
    Object(ObjectRef),
}

impl OptionValue {
    /// Builds an object keeping insertion order; later duplicates replace earlier ones.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: Into<String>,
    {
        let value = Self::Object(Rc::new(RefCell::new(Vec::new())));
        for (key, entry) in entries {
            value.set(key, entry);
        }
        value
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Sets a property on an object value; no-op for non-objects.
    pub fn set(&self, key: impl Into<String>, value: OptionValue) {
        let Self::Object(entries) = self else {
            return;
        };
        let key = key.into();
        let mut entries = entries.borrow_mut();
        match entries.iter().position(|(existing, _)| *existing == key) {
            Some(pos) => entries[pos].1 = value,
            None => entries.push((key, value)),
        }
    }

    /// JSON projection with `JSON.stringify` semantics: undefined, functions,
    /// symbols and back-references are dropped; bigints become numbers when they fit.
    pub fn to_json(&self) -> Option<Value> {
        let mut visiting = HashSet::new();
        to_json_inner(self, &mut visiting)
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::object(map.into_iter().map(|(k, v)| (k, Self::from(v)))),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

pub fn stable_stringify(value: &OptionValue) -> String {
    let mut out = String::new();
    let mut visiting = HashSet::new();
    write_value(value, &mut out, &mut visiting);
    out
}

fn write_value(value: &OptionValue, out: &mut String, visiting: &mut HashSet<usize>) {
    match value {
        OptionValue::Undefined => out.push_str(UNDEFINED_SENTINEL),
        OptionValue::Null => out.push_str("null"),
        OptionValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        OptionValue::Number(n) => write_number(*n, out),
        OptionValue::String(s) => write_str(s, out),
        OptionValue::BigInt(n) => out.push_str(&format!("{BIGINT_SENTINEL}:{n}")),
        OptionValue::Symbol(description) => {
            out.push_str(SYMBOL_SENTINEL);
            out.push(':');
            write_str(description.as_deref().unwrap_or(""), out);
        }
        OptionValue::Function => out.push_str(FUNCTION_SENTINEL),
        OptionValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out, visiting);
            }
            out.push(']');
        }
        OptionValue::Object(entries) => {
            let id = Rc::as_ptr(entries) as usize;
            if !visiting.insert(id) {
                out.push_str(CIRCULAR_SENTINEL);
                return;
            }
            let entries = entries.borrow();
            let mut sorted: Vec<&(String, OptionValue)> = entries.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));

            out.push('{');
            for (i, (key, entry)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_str(key, out);
                out.push(':');
                write_value(entry, out, visiting);
            }
            out.push('}');
            visiting.remove(&id);
        }
    }
}

fn write_number(n: f64, out: &mut String) {
    if n.is_nan() {
        out.push_str(NAN_SENTINEL);
    } else if n == f64::INFINITY {
        out.push_str(INFINITY_SENTINEL);
    } else if n == f64::NEG_INFINITY {
        out.push_str(NEG_INFINITY_SENTINEL);
    } else if n == 0.0 {
        out.push('0');
    } else {
        out.push_str(&n.to_string());
    }
}

fn write_str(s: &str, out: &mut String) {
    out.push_str(&Value::String(s.to_string()).to_string());
}

// Integral floats become JSON integers so they deserialize into integer fields.
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Value::Number((n as i64).into());
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn to_json_inner(value: &OptionValue, visiting: &mut HashSet<usize>) -> Option<Value> {
    match value {
        OptionValue::Undefined | OptionValue::Function | OptionValue::Symbol(_) => None,
        OptionValue::Null => Some(Value::Null),
        OptionValue::Bool(b) => Some(Value::Bool(*b)),
        OptionValue::Number(n) => Some(number_to_json(*n)),
        OptionValue::String(s) => Some(Value::String(s.clone())),
        OptionValue::BigInt(n) => Some(
            i64::try_from(*n)
                .map(|v| Value::Number(v.into()))
                .unwrap_or_else(|_| Value::String(n.to_string())),
        ),
        OptionValue::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| to_json_inner(item, visiting).unwrap_or(Value::Null))
                .collect(),
        )),
        OptionValue::Object(entries) => {
            let id = Rc::as_ptr(entries) as usize;
            if !visiting.insert(id) {
                return None;
            }
            let mut map = Map::new();
            for (key, entry) in entries.borrow().iter() {
                if let Some(json) = to_json_inner(entry, visiting) {
                    map.insert(key.clone(), json);
                }
            }
            visiting.remove(&id);
            Some(Value::Object(map))
        }
    }
}
