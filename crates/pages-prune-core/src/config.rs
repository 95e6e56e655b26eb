//! Run configuration.
//!
//! `RawConfig` holds the unvalidated inputs (environment variables or CLI flags);
//! `RawConfig::resolve` turns them into an `AppConfig` or a `ConfigError`.
//! The API token never appears in `Debug` output or in the logging-safe copy.

use pages_api::{ClientConfig, Environment};
use serde::Serialize;
use tracing::warn;

use crate::error::ConfigError;

/// Age threshold used when `CF_EXPIRATION_HOURS` is absent or unusable.
pub const DEFAULT_EXPIRATION_HOURS: f64 = 6.0;

/// Replacement text for credentials in diagnostics.
pub const REDACTED: &str = "*****";

/// Unvalidated configuration inputs.
#[derive(Default, Clone)]
pub struct RawConfig {
    pub api_token: Option<String>,
    pub account_id: Option<String>,
    pub project_name: Option<String>,
    pub expiration_hours: Option<String>,
    pub environment: Option<String>,
}

impl RawConfig {
    /// Validate and apply defaults.
    ///
    /// Every missing required field is reported in one error.
    pub fn resolve(self) -> Result<AppConfig, ConfigError> {
        let api_token = non_empty(self.api_token);
        let account_id = non_empty(self.account_id);
        let project_name = non_empty(self.project_name);

        let mut missing = Vec::new();
        if api_token.is_none() {
            missing.push("API token");
        }
        if account_id.is_none() {
            missing.push("account ID");
        }
        if project_name.is_none() {
            missing.push("project name");
        }

        let (Some(api_token), Some(account_id), Some(project_name)) =
            (api_token, account_id, project_name)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let environment = match non_empty(self.environment) {
            Some(raw) => raw
                .parse::<Environment>()
                .map_err(|e| ConfigError::InvalidEnvironment(e.0))?,
            None => Environment::default(),
        };

        Ok(AppConfig {
            api_token,
            account_id,
            project_name,
            retention: RetentionConfig {
                expiration_hours: parse_expiration_hours(self.expiration_hours.as_deref()),
                environment,
            },
        })
    }
}

impl std::fmt::Debug for RawConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
            .field("account_id", &self.account_id)
            .field("project_name", &self.project_name)
            .field("expiration_hours", &self.expiration_hours)
            .field("environment", &self.environment)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an hour threshold, falling back to [`DEFAULT_EXPIRATION_HOURS`] when the
/// input is absent, not a number, not finite, or negative.
pub fn parse_expiration_hours(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_EXPIRATION_HOURS;
    };

    match raw.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => hours,
        _ => {
            warn!(
                value = raw,
                default = DEFAULT_EXPIRATION_HOURS,
                "Unusable expiration hours, using default"
            );
            DEFAULT_EXPIRATION_HOURS
        }
    }
}

/// Retention parameters consumed by the classifier and fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetentionConfig {
    /// Age in hours beyond which a non-exempt deployment may be deleted.
    pub expiration_hours: f64,
    pub environment: Environment,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            environment: Environment::default(),
        }
    }
}

/// Validated configuration for one run.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub api_token: String,
    pub account_id: String,
    pub project_name: String,
    pub retention: RetentionConfig,
}

impl AppConfig {
    /// Copy suitable for logging, with the token replaced.
    pub fn to_logging_safe(&self) -> LoggingSafeConfig<'_> {
        LoggingSafeConfig {
            api_token: REDACTED,
            account_id: &self.account_id,
            project_name: &self.project_name,
            expiration_hours: self.retention.expiration_hours,
            environment: self.retention.environment,
        }
    }

    /// Connection settings for the Cloudflare client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_token, &self.account_id, &self.project_name)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.to_logging_safe(), f)
    }
}

/// Serializable view of [`AppConfig`] without credentials.
#[derive(Debug, Clone, Serialize)]
pub struct LoggingSafeConfig<'a> {
    pub api_token: &'static str,
    pub account_id: &'a str,
    pub project_name: &'a str,
    pub expiration_hours: f64,
    pub environment: Environment,
}

impl std::fmt::Display for LoggingSafeConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}
