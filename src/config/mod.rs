//! Configuration loading and management

use crate::core::ClientError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_base_url() -> String {
    "http://localhost:1337/api".to_string()
}

fn default_collection() -> String {
    "invoices".to_string()
}

fn default_event_capacity() -> usize {
    64
}

/// Where the invoice collection lives and how the client talks to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:1337/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection path segment under `base_url`
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Per-request timeout; the HTTP client default applies when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Buffer size of the store view's change notification channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration pointing at a backend on localhost
    pub fn default_config() -> Self {
        Self {
            base_url: default_base_url(),
            collection: default_collection(),
            request_timeout_secs: None,
            event_capacity: default_event_capacity(),
        }
    }

    /// Same configuration, different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ClientError::Config("base_url must not be empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                base
            )));
        }

        let collection = self.collection.trim_matches('/');
        if collection.is_empty() || collection.contains('/') {
            return Err(ClientError::Config(format!(
                "collection must be a single path segment, got '{}'",
                self.collection
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `{base_url}/{collection}`
    pub fn collection_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            self.collection.trim_matches('/')
        )
    }

    /// `{base_url}/{collection}/{document_id}`
    pub fn item_url(&self, document_id: &str) -> String {
        format!("{}/{}", self.collection_url(), document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default_config();

        assert_eq!(config.collection_url(), "http://localhost:1337/api/invoices");
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ClientConfig::default_config().with_base_url("https://billing.test/api/");
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = ClientConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.item_url("abc"), "https://billing.test/api/invoices/abc");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ClientConfig::from_yaml_str("request_timeout_secs: 5\n").unwrap();

        assert_eq!(config.base_url, "http://localhost:1337/api");
        assert_eq!(config.collection, "invoices");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ClientConfig::from_yaml_str("base_url: ''\n").is_err());
        assert!(ClientConfig::from_yaml_str("base_url: ftp://host\n").is_err());
        assert!(ClientConfig::from_yaml_str("collection: a/b\n").is_err());
    }
}
