//! # Free-form log payloads.
//!
//! [`Payload`] is an ordered sequence of arbitrary JSON values. Record
//! logging methods accept `impl Into<Payload>`, so plain strings, single
//! values and value vectors all work at call sites:
//!
//! ```
//! use gulog::Payload;
//! use serde_json::json;
//!
//! let p: Payload = "starting...".into();
//! assert_eq!(p.render(), "starting...");
//!
//! let p: Payload = vec![json!("user"), json!({"id": 7})].into();
//! assert_eq!(p.render(), r#"user {"id":7}"#);
//! ```

use serde_json::Value;

/// Ordered sequence of arbitrary caller values attached to one log event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload(Vec<Value>);

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends one value, returning the payload for chaining.
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.0.push(value.into());
        self
    }

    /// Returns the underlying values in order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Wire form: a single value is sent unwrapped, anything else as an
    /// array (the shape collectors expect from existing clients).
    pub fn to_wire(&self) -> Value {
        match self.0.as_slice() {
            [single] => single.clone(),
            _ => Value::Array(self.0.clone()),
        }
    }

    /// Console form: strings are rendered bare, other values as compact
    /// JSON, joined by single spaces.
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        parts.join(" ")
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(vec![Value::String(s.to_string())])
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(vec![Value::String(s)])
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Self(vec![v])
    }
}

impl From<Vec<Value>> for Payload {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Payload {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_value_unwrapped_on_wire() {
        let p = Payload::from("x");
        assert_eq!(p.to_wire(), json!("x"));
    }

    #[test]
    fn multiple_values_sent_as_array() {
        let p = Payload::new().with("a").with(2);
        assert_eq!(p.to_wire(), json!(["a", 2]));
    }

    #[test]
    fn empty_payload_is_empty_array() {
        assert_eq!(Payload::new().to_wire(), json!([]));
        assert_eq!(Payload::new().render(), "");
    }

    #[test]
    fn render_strips_quotes_from_strings_only() {
        let p = Payload::new().with("done").with(json!({"rows": 3}));
        assert_eq!(p.render(), r#"done {"rows":3}"#);
    }
}
