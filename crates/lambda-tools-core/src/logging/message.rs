//! Log message types
//!
//! Callers pick the message shape explicitly: a plain text message, an error,
//! or a structured record of fields. Field order is insertion order.

use serde_json::Value;

use super::error::LogError;

/// Value of a single structured field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Rendered as a quoted, escaped string
    Text(String),
    /// Rendered as compact inline JSON (objects and arrays)
    Nested(Value),
}

impl FieldValue {
    /// Text value from anything displayable, e.g. an error
    pub fn display(value: impl std::fmt::Display) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Text(value.to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i16, u16, i32, u32, i64, u64, isize, usize, f32, f64);

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Object(_) | Value::Array(_) => FieldValue::Nested(value),
            // null, numbers and booleans use their JSON spelling
            other => FieldValue::Text(other.to_string()),
        }
    }
}

/// An ordered structured record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field; an existing key keeps its position and gets the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a field by key
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<serde_json::Map<String, Value>> for Fields {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().fold(Fields::new(), |fields, (k, v)| fields.with(k, v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Fields::new(), |fields, (k, v)| fields.with(k, v))
    }
}

/// A single thing to log
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Rendered as one `msg` field
    Text(String),
    /// Rendered as one `msg` field holding the error's display form
    Error(String),
    /// Rendered as one field per entry
    Fields(Fields),
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text(text.into())
    }

    pub fn error(err: &dyn std::error::Error) -> Self {
        Message::Error(err.to_string())
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Text(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Text(value)
    }
}

impl From<Fields> for Message {
    fn from(value: Fields) -> Self {
        Message::Fields(value)
    }
}

impl TryFrom<Value> for Message {
    type Error = LogError;

    /// Objects become records, scalars become text; arrays are rejected.
    fn try_from(value: Value) -> Result<Self, LogError> {
        match value {
            Value::Object(map) => Ok(Message::Fields(map.into())),
            Value::Array(_) => Err(LogError::UnsupportedMessageType("array".to_string())),
            Value::String(s) => Ok(Message::Text(s)),
            other => Ok(Message::Text(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(FieldValue::from(json!("x")), FieldValue::Text("x".to_string()));
        assert_eq!(FieldValue::from(json!(42)), FieldValue::Text("42".to_string()));
        assert_eq!(FieldValue::from(json!(true)), FieldValue::Text("true".to_string()));
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Text("null".to_string()));
        assert_eq!(
            FieldValue::from(json!({"a": 1})),
            FieldValue::Nested(json!({"a": 1}))
        );
        assert_eq!(FieldValue::from(json!([1, 2])), FieldValue::Nested(json!([1, 2])));
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields = Fields::new()
            .with("msg", "started")
            .with("pid", 42)
            .with("alpha", "a");

        let keys: Vec<&str> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["msg", "pid", "alpha"]);
    }

    #[test]
    fn test_numeric_field_values() {
        let items = vec!["a", "b", "c"];
        let fields = Fields::new()
            .with("count", items.len())
            .with("port", 8080u16)
            .with("ratio", 0.5f32)
            .with("delta", -3i16);

        assert_eq!(fields.get("count"), Some(&FieldValue::Text("3".to_string())));
        assert_eq!(fields.get("port"), Some(&FieldValue::Text("8080".to_string())));
        assert_eq!(fields.get("ratio"), Some(&FieldValue::Text("0.5".to_string())));
        assert_eq!(fields.get("delta"), Some(&FieldValue::Text("-3".to_string())));
    }

    #[test]
    fn test_fields_insert_replaces_in_place() {
        let mut fields = Fields::new().with("a", "1").with("b", "2");
        fields.insert("a", "3");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.iter().next(), Some(("a", &FieldValue::Text("3".to_string()))));
    }

    #[test]
    fn test_message_from_json() {
        let msg = Message::try_from(json!({"msg": "hi", "pid": 7})).unwrap();
        match msg {
            Message::Fields(fields) => {
                assert_eq!(fields.get("pid"), Some(&FieldValue::Text("7".to_string())));
            }
            other => panic!("expected fields, got {:?}", other),
        }

        assert_eq!(Message::try_from(json!("plain")).unwrap(), Message::text("plain"));
        assert_eq!(Message::try_from(json!(null)).unwrap(), Message::text("null"));
        assert!(matches!(
            Message::try_from(json!([])),
            Err(LogError::UnsupportedMessageType(_))
        ));
    }

    #[test]
    fn test_message_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        assert_eq!(Message::error(&err), Message::Error("disk on fire".to_string()));
    }
}
