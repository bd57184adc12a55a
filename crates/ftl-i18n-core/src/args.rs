use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::FluentValue;

/// Named arguments handed to FTL functions.
pub type NamedArgs = BTreeMap<String, FluentValue>;

/// A caller-supplied variable. `Bool` and `Any` can be stored but have no FTL
/// representation; referencing them records an unsupported-type error.
#[derive(Debug)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    DateTime(i64),
    Typed(FluentValue),
    Any(Box<dyn core::any::Any>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::DateTime(_) => "datetime",
            Value::Typed(_) => "fluent",
            Value::Any(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<FluentValue> for Value {
    fn from(value: FluentValue) -> Self {
        Value::Typed(value)
    }
}

#[derive(Debug, Default)]
pub struct Args {
    values: BTreeMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
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
    use super::{Args, Value};
    use crate::FluentValue;

    #[test]
    fn args_insert_and_get() {
        let mut args = Args::new();
        args.insert("name", "Nova");
        let value = args.get("name").expect("value should exist");
        match value {
            Value::Str(value) => assert_eq!(value, "Nova"),
            _ => panic!("unexpected value type"),
        }
    }

    #[test]
    fn builder_collects_values() {
        let args = Args::new()
            .with("count", 3.0)
            .with("flag", true)
            .with("typed", FluentValue::from("x"));
        assert_eq!(args.len(), 3);
        assert_eq!(args.get("count").map(Value::kind), Some("number"));
        assert_eq!(args.get("flag").map(Value::kind), Some("boolean"));
        assert_eq!(args.get("typed").map(Value::kind), Some("fluent"));
        let names: alloc::vec::Vec<&str> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["count", "flag", "typed"]);
    }
}
