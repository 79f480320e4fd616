//! Caller-owned configuration objects

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ConfigError, ConfigResult};

/// Reserved key holding base64 ciphertext entries
pub const KMS_KEY: &str = "kms";

/// A configuration object as written by the caller
///
/// Arbitrary keys and values; the optional `kms` key maps names to
/// base64-encoded ciphertext strings. Key order is preserved.
///
/// # Example
///
/// ```
/// use lambda_tools_core::config::RawConfig;
///
/// let raw = RawConfig::from_json_str(r#"{"foo": "bar", "kms": {"secret": "b2xsZWg="}}"#).unwrap();
/// assert_eq!(raw.get("foo").and_then(|v| v.as_str()), Some("bar"));
/// assert!(raw.has_kms_entries());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(Map<String, Value>);

impl RawConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConfigError::NotAnObject(json_type_name(&other))),
        }
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Self::from_value(serde_yaml::from_str(yaml)?)
    }

    /// Get a top-level value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a top-level value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// The `kms` sub-object, if present
    pub fn kms(&self) -> Option<&Value> {
        self.0.get(KMS_KEY)
    }

    /// Whether there is at least one ciphertext entry to resolve
    pub fn has_kms_entries(&self) -> bool {
        matches!(self.kms(), Some(Value::Object(entries)) if !entries.is_empty())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for RawConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RawConfig {
    type Error = ConfigError;

    fn try_from(value: Value) -> ConfigResult<Self> {
        Self::from_value(value)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
