//! アプリケーション設定
//!
//! 値は CLI フラグ（環境変数フォールバック付き）から渡される

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DESCRIBE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_RECREATE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_EXTRACT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,

    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Request timeout must be greater than 0 seconds")]
    InvalidTimeout,
}

/// リモートデザインサービスの設定
#[derive(Clone)]
pub struct RemoteServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub describe_model: String,
    pub recreate_model: String,
    pub extract_model: String,
    pub timeout_secs: u64,
}

impl RemoteServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            describe_model: DEFAULT_DESCRIBE_MODEL.to_string(),
            recreate_model: DEFAULT_RECREATE_MODEL.to_string(),
            extract_model: DEFAULT_EXTRACT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RemoteServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteServiceConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("describe_model", &self.describe_model)
            .field("recreate_model", &self.recreate_model)
            .field("extract_model", &self.extract_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Webサーバーの設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// アップロードサイズの上限（バイト）
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit: 25 * 1024 * 1024,
        }
    }
}

/// アプリケーション全体の設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub remote: RemoteServiceConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new(remote: RemoteServiceConfig) -> Self {
        Self {
            remote,
            server: ServerConfig::default(),
        }
    }

    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server.host = host.into();
        self.server.port = port;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.remote.validate()
    }
}
