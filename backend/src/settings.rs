//! Service settings loaded via OrthoConfig.
//!
//! Every value except the lookup timeout is optional; accessors fall back to
//! defaults that reach the public ViaCEP and Nominatim services from
//! `0.0.0.0:8080`.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DIRECTORY_BASE_URL: &str = "https://viacep.com.br/";
const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_USER_AGENT: &str = concat!("intake/", env!("CARGO_PKG_VERSION"));

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid {setting} URL {value}: {message}")]
    BaseUrl {
        setting: &'static str,
        value: String,
        message: String,
    },
    #[error("lookup timeout must be positive")]
    ZeroTimeout,
}

/// Configuration for the intake service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INTAKE")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Base URL of the postal code directory.
    pub directory_base_url: Option<String>,
    /// Base URL of the geocoder.
    pub geocoder_base_url: Option<String>,
    /// Upper bound on each directory or geocoder request, in milliseconds.
    #[ortho_config(default = 5000)]
    pub lookup_timeout_ms: u64,
    /// `User-Agent` sent to both lookup services.
    pub user_agent: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            directory_base_url: None,
            geocoder_base_url: None,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            user_agent: None,
        }
    }
}

impl AppSettings {
    /// Return the listener address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: error.to_string(),
        })
    }

    /// Return the postal code directory base URL.
    pub fn directory_base_url(&self) -> Result<Url, SettingsError> {
        parse_base_url(
            "directory",
            self.directory_base_url
                .as_deref()
                .unwrap_or(DEFAULT_DIRECTORY_BASE_URL),
        )
    }

    /// Return the geocoder base URL.
    pub fn geocoder_base_url(&self) -> Result<Url, SettingsError> {
        parse_base_url(
            "geocoder",
            self.geocoder_base_url
                .as_deref()
                .unwrap_or(DEFAULT_GEOCODER_BASE_URL),
        )
    }

    /// Return the per-lookup timeout.
    pub fn lookup_timeout(&self) -> Result<Duration, SettingsError> {
        match self.lookup_timeout_ms {
            0 => Err(SettingsError::ZeroTimeout),
            millis => Ok(Duration::from_millis(millis)),
        }
    }

    /// Return the configured user agent, falling back to `intake/<version>`.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

fn parse_base_url(setting: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|error| SettingsError::BaseUrl {
        setting,
        value: value.to_owned(),
        message: error.to_string(),
    })
}
