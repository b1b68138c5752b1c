//! Service configuration
//!
//! A single [`ServiceConfig`] describes the one REST service pagefeed talks to:
//! where it lives, which listing resource is paged, and the defaults every
//! request carries. It can be built in code or loaded from a YAML (or JSON) file.

use crate::error::{Error, Result, ResultExt};
use crate::types::{JsonValue, StringMap, ValueMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://api.stackexchange.com";

/// Default listing resource, relative to the base URL
pub const DEFAULT_RESOURCE_PATH: &str = "/questions";

/// Configuration for the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service root every descriptor path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the paged listing resource
    #[serde(default = "default_resource_path")]
    pub resource_path: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameters sent with every page request
    #[serde(default = "default_query")]
    pub query: ValueMap,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Transport timeout in seconds (unset = wait indefinitely)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_resource_path() -> String {
    DEFAULT_RESOURCE_PATH.to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_query() -> ValueMap {
    let mut query = ValueMap::new();
    query.insert("order".to_string(), JsonValue::from("desc"));
    query.insert("sort".to_string(), JsonValue::from("activity"));
    query.insert("site".to_string(), JsonValue::from("stackoverflow"));
    query
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource_path: default_resource_path(),
            page_param: default_page_param(),
            query: default_query(),
            headers: StringMap::new(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Create a new config builder
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Load a config from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config can produce requests
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "base_url",
                format!("'{}' cannot carry a path", self.base_url),
            ));
        }
        if self.page_param.trim().is_empty() {
            return Err(Error::invalid_value("page_param", "must not be empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Transport timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Render the config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Builder for service config
#[derive(Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the listing resource path
    pub fn resource_path(mut self, path: impl Into<String>) -> Self {
        self.config.resource_path = path.into();
        self
    }

    /// Set the page query parameter name
    pub fn page_param(mut self, name: impl Into<String>) -> Self {
        self.config.page_param = name.into();
        self
    }

    /// Add or replace a default query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.config.query.insert(key.into(), value.into());
        self
    }

    /// Drop all default query parameters
    pub fn clear_query(mut self) -> Self {
        self.config.query.clear();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the transport timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    /// Build the config
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.base_url, "https://api.stackexchange.com");
        assert_eq!(config.resource_path, "/questions");
        assert_eq!(config.page_param, "page");
        assert_eq!(config.query.get("site"), Some(&JsonValue::from("stackoverflow")));
        assert!(config.timeout().is_none());
        assert!(config.user_agent.starts_with("pagefeed/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_service_config_builder() {
        let config = ServiceConfig::builder()
            .base_url("http://localhost:8080/api")
            .resource_path("/items")
            .page_param("p")
            .clear_query()
            .query("pagesize", 50)
            .header("X-Custom", "value")
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.resource_path, "/items");
        assert_eq!(config.page_param, "p");
        assert_eq!(config.query.len(), 1);
        assert_eq!(config.query.get("pagesize"), Some(&JsonValue::from(50)));
        assert_eq!(config.headers.get("X-Custom"), Some(&"value".to_string()));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_from_yaml_fills_defaults() {
        let config = ServiceConfig::from_yaml_str(
            r"
base_url: https://api.example.com/v2
query:
  site: superuser
",
        )
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v2");
        assert_eq!(config.resource_path, "/questions");
        assert_eq!(config.query.len(), 1);
        assert_eq!(config.query.get("site"), Some(&JsonValue::from("superuser")));
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_from_yaml_accepts_json() {
        let config =
            ServiceConfig::from_yaml_str(r#"{"resource_path": "/answers", "timeout_secs": 10}"#)
                .unwrap();
        assert_eq!(config.resource_path, "/answers");
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let err = ServiceConfig::from_yaml_str("base_url: not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "base_url"));

        let config = ServiceConfig::builder().base_url("mailto:someone@example.com").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_page_param() {
        let config = ServiceConfig::builder().page_param("  ").build();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "page_param"
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resource_path: /tags").unwrap();
        writeln!(file, "headers:").unwrap();
        writeln!(file, "  Accept: application/json").unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.resource_path, "/tags");
        assert_eq!(
            config.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_unreadable_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceConfig::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert!(err
            .to_string()
            .contains(&format!("Failed to read config {}", dir.path().display())));
    }

    #[test]
    fn test_default_user_agent() {
        assert_eq!(
            ServiceConfig::default().user_agent,
            format!("{}/{}", crate::NAME, crate::VERSION)
        );
        assert!(ServiceConfig::default().user_agent.starts_with("pagefeed/"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ServiceConfig::builder().query("pagesize", 25).build();
        let yaml = config.to_yaml().unwrap();
        let parsed = ServiceConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
