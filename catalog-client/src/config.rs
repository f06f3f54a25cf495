//! Connection settings for the catalog REST API

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port; paths are appended as `/api/...`
    pub base_url: String,

    /// Bearer token attached to every request
    pub token: Option<String>,

    /// Whole-request timeout, seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Unauthenticated config with a 30 second timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
