//! Fully decrypted configuration

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::ConfigResult;
use super::raw::KMS_KEY;

/// A configuration whose `kms` entries all hold plaintext
///
/// Immutable and cheap to clone: every clone shares one payload, so repeated
/// cache hits hand out the same object. Use `to_map` for an owned copy that
/// can be changed freely.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    inner: Arc<Map<String, Value>>,
}

impl ResolvedConfig {
    pub(crate) fn new(map: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(map),
        }
    }

    /// Get a top-level value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Decrypted plaintext of one `kms` entry
    pub fn kms_value(&self, key: &str) -> Option<&str> {
        self.inner.get(KMS_KEY)?.get(key)?.as_str()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    /// Owned deep copy of the configuration
    pub fn to_map(&self) -> Map<String, Value> {
        (*self.inner).clone()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Take the configuration as a JSON value
    ///
    /// Moves the payload out when this is the last handle, copies it otherwise.
    pub fn into_value(self) -> Value {
        let map = Arc::try_unwrap(self.inner).unwrap_or_else(|shared| (*shared).clone());
        Value::Object(map)
    }

    /// Deserialize into an application config type
    pub fn deserialize<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// Whether both handles share the same payload
    pub fn ptr_eq(&self, other: &ResolvedConfig) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_map().serialize(serializer)
    }
}
