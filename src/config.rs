//! Deployment settings: gateway location, timeouts and wire field names.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{ProviderCode, ValidationError};

/// Public gateway used unless a custom one is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://cabbagetexter.com/send.php";
/// Public gateway host that serves Vodafone accounts.
pub const DEFAULT_VODAFONE_GATEWAY_URL: &str = "http://cabbage.powermyphone.com/send.php";
/// Budget for connecting and reading the whole reply.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no gateway url configured")]
    MissingGatewayUrl,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Form parameter names understood by a gateway deployment.
pub struct FormFields {
    pub username: String,
    pub password: String,
    pub recipients: String,
    pub text: String,
    pub sender: String,
    pub provider: String,
    pub balance_flag: String,
    pub balance_flag_value: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            username: "u".to_owned(),
            password: "p".to_owned(),
            recipients: "d".to_owned(),
            text: "m".to_owned(),
            sender: "name".to_owned(),
            provider: "s".to_owned(),
            balance_flag: "c".to_owned(),
            balance_flag_value: "1".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Settings shared by every account.
///
/// ```rust
/// let settings = cabbage::GatewaySettings::from_json_str(
///     r#"{ "use_default_url": false, "custom_url": "https://sms.example.org/send.php" }"#,
/// )
/// .unwrap();
/// assert_eq!(settings.timeout_ms, cabbage::config::DEFAULT_TIMEOUT_MS);
/// ```
pub struct GatewaySettings {
    /// Switched on by the user; a disabled connector never reports ready.
    pub enabled: bool,
    /// Use the public gateway hosts instead of `custom_url`.
    pub use_default_url: bool,
    pub custom_url: Option<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub fields: FormFields,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            use_default_url: true,
            custom_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            fields: FormFields::default(),
        }
    }
}

impl GatewaySettings {
    /// Load settings from JSON; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the gateway URLs for one operation.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        if self.use_default_url {
            return Ok(Endpoints::Public {
                standard: parse_url(DEFAULT_GATEWAY_URL)?,
                vodafone: parse_url(DEFAULT_VODAFONE_GATEWAY_URL)?,
            });
        }

        let custom = self
            .custom_url
            .as_deref()
            .map(str::trim)
            .filter(|it| !it.is_empty())
            .ok_or(ConfigError::MissingGatewayUrl)?;
        Ok(Endpoints::Custom(parse_url(custom)?))
    }

    /// Whether the engine can serve requests with `account_count` configured accounts.
    pub fn readiness(&self, account_count: usize) -> Readiness {
        if !self.enabled {
            return Readiness::Inactive(InactiveReason::Disabled);
        }
        if account_count == 0 {
            return Readiness::Inactive(InactiveReason::NoAccounts);
        }
        match self.endpoints() {
            Ok(_) => Readiness::Ready,
            Err(ConfigError::MissingGatewayUrl) => {
                Readiness::Inactive(InactiveReason::MissingGatewayUrl)
            }
            Err(ConfigError::Validation(_)) => {
                Readiness::Inactive(InactiveReason::InvalidGatewayUrl)
            }
        }
    }
}

fn parse_url(value: &str) -> Result<Url, ValidationError> {
    Url::parse(value).map_err(|_| ValidationError::InvalidUrl {
        input: value.to_owned(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Gateway URLs resolved once per outer operation and passed down to each request.
pub enum Endpoints {
    Public { standard: Url, vodafone: Url },
    Custom(Url),
}

impl Endpoints {
    /// URL serving accounts routed through `provider`.
    pub fn for_provider(&self, provider: &ProviderCode) -> &Url {
        match self {
            Self::Public { vodafone, .. } if provider.is_vodafone() => vodafone,
            Self::Public { standard, .. } => standard,
            Self::Custom(url) => url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Inactive(InactiveReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveReason {
    Disabled,
    NoAccounts,
    MissingGatewayUrl,
    InvalidGatewayUrl,
}
