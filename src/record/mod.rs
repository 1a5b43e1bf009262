//! Record access for the query engine
//!
//! The engine does not know the schema of the rows it queries. Anything that
//! can answer "what is the value of field X" is a record.
//!
//! # Value model
//!
//! - Null and missing fields are the same thing: `field()` returns `None`
//! - Strings, booleans, numbers and dates are the only scalar kinds
//! - Arrays and objects are exposed as their JSON text

mod value;

pub use value::FieldValue;

use std::borrow::Cow;

use serde_json::{Map, Value};

/// A row with named fields
pub trait Record {
    /// Returns the value of `name`, or `None` when the field is missing or null
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.get(name).and_then(FieldValue::from_json)
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match self {
            Value::Object(map) => map.field(name),
            _ => None,
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for std::sync::Arc<R> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }
}

impl FieldValue<'_> {
    fn from_json(value: &Value) -> Option<FieldValue<'_>> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => Some(FieldValue::Text(Cow::Borrowed(s))),
            Value::Array(_) | Value::Object(_) => {
                Some(FieldValue::Text(Cow::Owned(value.to_string())))
            }
        }
    }
}
