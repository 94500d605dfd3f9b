//! Engine configuration.
//!
//! Defaults are the production behaviour. Override via environment
//! variables, a scenario file (serde), or explicit construction in tests.

use serde::{Deserialize, Serialize};

use mdauth_core::PartyType;

/// Tunables for an [`Authorizer`](crate::Authorizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Role that automated accounts, and only automated accounts, may hold.
    /// Default: `PROVENANCE`.
    pub automated_role: PartyType,
    /// Memoize automated-account classification in the request context.
    /// Default: `true`.
    pub cache_automated_lookups: bool,
    /// When checking an existing value owner's delegation, ignore grantees
    /// that are automated accounts. Default: `true`.
    pub exclude_automated_value_owner_grantees: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            automated_role: PartyType::Provenance,
            cache_automated_lookups: true,
            exclude_automated_value_owner_grantees: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `MDAUTH_AUTOMATED_ROLE` (default: `PROVENANCE`)
    /// - `MDAUTH_CACHE_AUTOMATED` (default: `true`)
    /// - `MDAUTH_EXCLUDE_AUTOMATED_GRANTEES` (default: `true`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let automated_role = match lookup("MDAUTH_AUTOMATED_ROLE") {
            Some(raw) => raw.parse().map_err(|e: mdauth_core::CoreError| {
                ConfigError::InvalidValue {
                    var: "MDAUTH_AUTOMATED_ROLE".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.automated_role,
        };

        Ok(Self {
            automated_role,
            cache_automated_lookups: env_bool(
                &lookup,
                "MDAUTH_CACHE_AUTOMATED",
                defaults.cache_automated_lookups,
            )?,
            exclude_automated_value_owner_grantees: env_bool(
                &lookup,
                "MDAUTH_EXCLUDE_AUTOMATED_GRANTEES",
                defaults.exclude_automated_value_owner_grantees,
            )?,
        })
    }
}

fn env_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}
