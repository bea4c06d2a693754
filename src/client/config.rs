//! Environment configuration for [`CdekClientBuilder`].

use url::Url;

use super::CdekClientBuilder;
use super::auth::Credentials;
use crate::domain::ValidationError;

/// Production integration endpoint.
pub const DEFAULT_BASE_URL: &str = "http://integration.cdek.ru";
/// Educational (sandbox) integration endpoint.
pub const EDUCATIONAL_BASE_URL: &str = "http://integration.edu.cdek.ru";
pub const DEFAULT_CALCULATOR_URL: &str = "http://api.cdek.ru/calculator/calculate_price_by_json.php";

pub const ACCOUNT_VAR: &str = "CDEK_ACCOUNT";
pub const SECURE_PASSWORD_VAR: &str = "CDEK_SECURE_PASSWORD";
pub const API_URL_VAR: &str = "CDEK_API_URL";
pub const TEST_VAR: &str = "CDEK_TEST";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("invalid boolean for {name}: {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("invalid credentials: {0}")]
    Credentials(#[from] ValidationError),
}

impl CdekClientBuilder {
    /// Load a builder from environment variables.
    ///
    /// Variables:
    /// - `CDEK_ACCOUNT` (required)
    /// - `CDEK_SECURE_PASSWORD` (required)
    /// - `CDEK_API_URL` (default: [`DEFAULT_BASE_URL`])
    /// - `CDEK_TEST` (`true`/`false`/`1`/`0`, default: `false`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let account = lookup(ACCOUNT_VAR).ok_or(ConfigError::MissingVar(ACCOUNT_VAR))?;
        let password =
            lookup(SECURE_PASSWORD_VAR).ok_or(ConfigError::MissingVar(SECURE_PASSWORD_VAR))?;

        let mut builder = Self::new(Credentials::from_parts(account, password)?);
        if let Some(base_url) = lookup(API_URL_VAR) {
            validate_url(API_URL_VAR, &base_url)?;
            builder = builder.base_url(base_url);
        }
        if let Some(value) = lookup(TEST_VAR) {
            builder = builder.test_mode(parse_flag(TEST_VAR, &value)?);
        }
        Ok(builder)
    }
}

pub(crate) fn validate_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
        name,
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            name,
            reason: "URL cannot be used as a base".to_owned(),
        });
    }
    Ok(url)
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_owned(),
        }),
    }
}
