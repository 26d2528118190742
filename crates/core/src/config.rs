//! Immutable startup configuration for the widget servers.
//!
//! Settings are resolved once at process start with priority:
//! `AC_`-prefixed env var > unprefixed env var > default. Credentials
//! have no defaults on purpose: shipping functioning fallback secrets
//! in source is a deployment hazard, so a missing credential fails
//! startup with a message naming every absent variable.

use std::path::Path;

use thiserror::Error;
use url::Url;

/// Fixed base URL of the Airbyte API used for both exchange calls.
pub const DEFAULT_API_BASE: &str = "https://api.airbyte.ai/api/v1";

/// Origin allowed to embed the widget when none is configured.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Port for the HTTP transport when `MCP_PORT` is unset.
pub const DEFAULT_MCP_PORT: u16 = 3000;

const ENV_FILE_VAR: &str = "AIRBYTE_WIDGET_MCP_ENV_FILE";

/// Static API credentials exchanged for a short-lived application token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// Workspace identity sent as `workspace_name` in the widget-token call.
    pub external_user_id: String,
}

/// Process-lifetime configuration, constructed once and passed to every
/// component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub allowed_origin: String,
    pub mcp_port: u16,
    pub api_base: Url,
}

/// Errors raised while resolving configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", missing.join(", "))]
    MissingCredentials { missing: Vec<String> },

    #[error("invalid {name} value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to load env file '{path}': {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Loads the env file named by `AIRBYTE_WIDGET_MCP_ENV_FILE` (errors
    /// are fatal when the variable is set), otherwise `./.env` if present.
    /// Neither overwrites variables already set in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(ENV_FILE_VAR) {
            dotenvy::from_path(Path::new(&path)).map_err(|source| ConfigError::EnvFile {
                path: path.clone(),
                source,
            })?;
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::resolve()
    }

    fn resolve() -> Result<Self, ConfigError> {
        let client_id = prefixed_env("AIRBYTE_CLIENT_ID");
        let client_secret = prefixed_env("AIRBYTE_CLIENT_SECRET");
        let external_user_id = prefixed_env("EXTERNAL_USER_ID");

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("AC_AIRBYTE_CLIENT_ID/AIRBYTE_CLIENT_ID".to_string());
        }
        if client_secret.is_none() {
            missing.push("AC_AIRBYTE_CLIENT_SECRET/AIRBYTE_CLIENT_SECRET".to_string());
        }
        if external_user_id.is_none() {
            missing.push("AC_EXTERNAL_USER_ID/EXTERNAL_USER_ID".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials { missing });
        }

        let allowed_origin =
            non_empty_env("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        let mcp_port = match non_empty_env("MCP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|error| ConfigError::InvalidValue {
                name: "MCP_PORT",
                value: raw.clone(),
                reason: error.to_string(),
            })?,
            None => DEFAULT_MCP_PORT,
        };

        let api_base = Url::parse(DEFAULT_API_BASE).map_err(|error| ConfigError::InvalidValue {
            name: "api_base",
            value: DEFAULT_API_BASE.to_string(),
            reason: error.to_string(),
        })?;

        Ok(Self {
            credentials: Credentials {
                client_id: client_id.unwrap_or_default(),
                client_secret: client_secret.unwrap_or_default(),
                external_user_id: external_user_id.unwrap_or_default(),
            },
            allowed_origin,
            mcp_port,
            api_base,
        })
    }

    /// Build a config directly, bypassing the environment. Intended for
    /// tests and embedding hosts that resolve settings themselves.
    pub fn with_values(credentials: Credentials, allowed_origin: String, mcp_port: u16, api_base: Url) -> Self {
        Self {
            credentials,
            allowed_origin,
            mcp_port,
            api_base,
        }
    }
}

/// Read `AC_<name>` falling back to `<name>`; empty values count as unset.
fn prefixed_env(name: &str) -> Option<String> {
    non_empty_env(&format!("AC_{name}")).or_else(|| non_empty_env(name))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 9] = [
        "AC_AIRBYTE_CLIENT_ID",
        "AIRBYTE_CLIENT_ID",
        "AC_AIRBYTE_CLIENT_SECRET",
        "AIRBYTE_CLIENT_SECRET",
        "AC_EXTERNAL_USER_ID",
        "EXTERNAL_USER_ID",
        "ALLOWED_ORIGIN",
        "MCP_PORT",
        "AIRBYTE_WIDGET_MCP_ENV_FILE",
    ];

    fn with_env<const N: usize>(vars: [(&str, Option<&str>); N], test: impl Fn()) {
        let mut all: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|name| (*name, None)).collect();
        for (name, value) in vars {
            if let Some(slot) = all.iter_mut().find(|(existing, _)| *existing == name) {
                slot.1 = value;
            }
        }
        temp_env::with_vars(all, test);
    }

    #[test]
    fn prefixed_variables_win_over_unprefixed() {
        with_env(
            [
                ("AC_AIRBYTE_CLIENT_ID", Some("prefixed-id")),
                ("AIRBYTE_CLIENT_ID", Some("plain-id")),
                ("AIRBYTE_CLIENT_SECRET", Some("secret")),
                ("EXTERNAL_USER_ID", Some("user-1")),
            ],
            || {
                let config = AppConfig::resolve().expect("config resolves");
                assert_eq!(config.credentials.client_id, "prefixed-id");
                assert_eq!(config.credentials.client_secret, "secret");
                assert_eq!(config.credentials.external_user_id, "user-1");
            },
        );
    }

    #[test]
    fn missing_credentials_name_every_absent_variable() {
        with_env([("AIRBYTE_CLIENT_ID", Some("id-only"))], || {
            let error = AppConfig::resolve().expect_err("credentials are required");
            let message = error.to_string();
            assert!(message.contains("AC_AIRBYTE_CLIENT_SECRET/AIRBYTE_CLIENT_SECRET"));
            assert!(message.contains("AC_EXTERNAL_USER_ID/EXTERNAL_USER_ID"));
            assert!(!message.contains("AC_AIRBYTE_CLIENT_ID/AIRBYTE_CLIENT_ID"));
        });
    }

    #[test]
    fn defaults_apply_when_optional_vars_unset() {
        with_env(
            [
                ("AIRBYTE_CLIENT_ID", Some("id")),
                ("AIRBYTE_CLIENT_SECRET", Some("secret")),
                ("EXTERNAL_USER_ID", Some("user")),
            ],
            || {
                let config = AppConfig::resolve().expect("config resolves");
                assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
                assert_eq!(config.mcp_port, DEFAULT_MCP_PORT);
                assert_eq!(config.api_base.as_str(), "https://api.airbyte.ai/api/v1");
            },
        );
    }

    #[test]
    fn invalid_port_is_rejected_with_context() {
        with_env(
            [
                ("AIRBYTE_CLIENT_ID", Some("id")),
                ("AIRBYTE_CLIENT_SECRET", Some("secret")),
                ("EXTERNAL_USER_ID", Some("user")),
                ("MCP_PORT", Some("not-a-port")),
            ],
            || {
                let error = AppConfig::resolve().expect_err("port must parse");
                assert!(error.to_string().contains("MCP_PORT"));
                assert!(error.to_string().contains("not-a-port"));
            },
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        with_env(
            [
                ("AC_AIRBYTE_CLIENT_ID", Some("")),
                ("AIRBYTE_CLIENT_ID", Some("fallback-id")),
                ("AIRBYTE_CLIENT_SECRET", Some("secret")),
                ("EXTERNAL_USER_ID", Some("user")),
            ],
            || {
                let config = AppConfig::resolve().expect("config resolves");
                assert_eq!(config.credentials.client_id, "fallback-id");
            },
        );
    }
}
