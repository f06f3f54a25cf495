//! Editor settings, read from the environment

use crate::gallery::{Base64Decoder, DEFAULT_MAX_FILE_SIZE};
use catalog_client::{ClientConfig, ClientResult, HttpClient};

/// Editor configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CATALOG_API_URL | http://localhost:8080 | Catalog REST API base URL |
/// | CATALOG_API_TOKEN | (unset) | Bearer token for the API |
/// | REQUEST_TIMEOUT_SECS | 30 | Request timeout (seconds) |
/// | MAX_IMAGE_FILE_SIZE | 5242880 | Largest accepted image file (bytes) |
/// | LOG_LEVEL | info | Default log filter |
///
/// # Example
///
/// ```ignore
/// CATALOG_API_URL=https://admin.example.com LOG_LEVEL=debug cargo run --example edit_product
/// ```
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub max_image_file_size: usize,
    pub log_level: String,
}

impl EditorConfig {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("CATALOG_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            api_token: std::env::var("CATALOG_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_image_file_size: std::env::var("MAX_IMAGE_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_FILE_SIZE),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Read `.env` (if present) and then the environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Override the API endpoint
    ///
    /// Mostly for tests
    pub fn with_overrides(api_url: impl Into<String>, api_token: Option<String>) -> Self {
        let mut config = Self::from_env();
        config.api_url = api_url.into();
        config.api_token = api_token;
        config
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url).with_timeout(self.request_timeout_secs);
        match &self.api_token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    pub fn http_client(&self) -> ClientResult<HttpClient> {
        HttpClient::new(&self.client_config())
    }

    /// Image decoder honouring the configured size limit
    pub fn decoder(&self) -> Base64Decoder {
        Base64Decoder::new(self.max_image_file_size)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_reach_client_config() {
        let config = EditorConfig::with_overrides("http://catalog.test", Some("secret".into()));
        let client = config.client_config();
        assert_eq!(client.base_url, "http://catalog.test");
        assert_eq!(client.token.as_deref(), Some("secret"));
        assert_eq!(client.timeout, config.request_timeout_secs);

        let anonymous = EditorConfig::with_overrides("http://catalog.test", None).client_config();
        assert!(anonymous.token.is_none());
    }

    #[test]
    fn test_decoder_uses_size_limit() {
        let mut config = EditorConfig::with_overrides("http://catalog.test", None);
        config.max_image_file_size = 1024;
        assert_eq!(config.decoder().max_file_size(), 1024);
        assert!(config.http_client().is_ok());
    }
}
