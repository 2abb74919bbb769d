//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use tally_platform::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use tally_platform::PlatformClient;
use tally_types::NetworkId;
use tally_utils::LogFormat;

use crate::custody::CustodyMode;
use crate::error::WalletError;

/// Configuration for talking to the platform.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: String,

    /// Network addresses are assumed to live on.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Delegate signing and broadcast to the platform's server signer.
    #[serde(default)]
    pub use_server_signer: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Page size for list endpoints.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "https://api.cdp.coinbase.com/platform".to_string()
}

fn default_network() -> NetworkId {
    NetworkId::BaseSepolia
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn custody_mode(&self) -> CustodyMode {
        CustodyMode::from_server_signer_flag(self.use_server_signer)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(WalletError::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(WalletError::Config("api_key is required".to_string()));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(WalletError::Config("timeouts must be non-zero".to_string()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(WalletError::Config(format!(
                "page_size must be within 1..={MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Validate and build the REST client.
    pub fn platform_client(&self) -> Result<PlatformClient, WalletError> {
        self.validate()?;
        let client = PlatformClient::with_timeouts(
            self.api_url.as_str(),
            self.api_key.as_str(),
            Duration::from_secs(self.request_timeout_secs),
            Duration::from_secs(self.connect_timeout_secs),
        )?;
        Ok(client.with_page_size(self.page_size))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            network: default_network(),
            use_server_signer: false,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            page_size: default_page_size(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &tally_utils::redact(&self.api_key))
            .field("network", &self.network)
            .field("use_server_signer", &self.use_server_signer)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("page_size", &self.page_size)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .finish()
    }
}
