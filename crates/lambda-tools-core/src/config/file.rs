//! Loading raw configuration files (JSON or YAML)

use std::fs;
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::raw::RawConfig;

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`json`, `yaml`, `yml`)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl RawConfig {
    /// Parse a document in the given format
    pub fn from_str_as(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        match format {
            ConfigFormat::Json => Self::from_json_str(content),
            ConfigFormat::Yaml => Self::from_yaml_str(content),
        }
    }

    /// Load a configuration file, choosing the parser by extension
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let content = fs::read_to_string(path)?;
        Self::from_str_as(&content, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("conf.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("conf.YML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("conf.yaml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("conf.toml")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("conf")), None);
    }

    #[test]
    fn test_from_str_as_by_format_name() {
        let yaml = ConfigFormat::from_path(Path::new("conf.yml")).unwrap();
        assert_eq!(yaml.as_str(), "yaml");
        assert_eq!(ConfigFormat::Json.as_str(), "json");

        let raw = RawConfig::from_str_as("retries: 3\n", yaml).unwrap();
        assert_eq!(raw.get("retries"), Some(&json!(3)));
        assert!(RawConfig::from_str_as("retries: 3\n", ConfigFormat::Json).is_err());
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"foo": "bar", "kms": {"secret": "b2xsZWg="}}"#).unwrap();

        let raw = RawConfig::from_path(&path).unwrap();
        assert_eq!(raw.get("foo"), Some(&json!("bar")));
        assert_eq!(raw.kms(), Some(&json!({"secret": "b2xsZWg="})));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "foo: bar\nretries: 3\n").unwrap();

        let raw = RawConfig::from_path(&path).unwrap();
        assert_eq!(raw.get("retries"), Some(&json!(3)));
        assert!(!raw.has_kms_entries());
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            RawConfig::from_path(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            RawConfig::from_path(dir.path().join("config.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
