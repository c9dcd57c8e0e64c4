use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the voice services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Root URL both endpoints are resolved against.
    pub base_url: String,

    /// Per-request timeout. Synthesis can take minutes on CPU.
    pub timeout_secs: u64,

    /// Ask the upload service not to extract a speaker embedding.
    pub skip_embedding: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout_secs: 120,
            skip_embedding: false,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base url '{}': {}", self.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("unsupported url scheme '{}'", url.scheme()));
        }
        if self.timeout_secs == 0 {
            return Err("timeout must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(!config.skip_embedding);
    }

    #[test]
    fn rejects_bad_urls() {
        let config = ServiceConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            base_url: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ServiceConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: ServiceConfig = serde_json::from_str(r#"{"base_url": "https://voice.example.com"}"#).unwrap();
        assert_eq!(config.base_url, "https://voice.example.com");
        assert_eq!(config.timeout_secs, 120);
        assert!(!config.skip_embedding);
    }
}
