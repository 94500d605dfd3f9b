//! # Scenario Files
//!
//! A scenario seeds the in-memory registries and names one check to run.
//!
//! ```yaml
//! block_time: "2026-01-01T00:00:00Z"
//! accounts:
//!   - kind: base
//!     address: "0x0101010101010101010101010101010101010101"
//!     sequence: 3
//!     pub_key: "02ab"
//! grants:
//!   - grantee: "0x0909090909090909090909090909090909090909"
//!     granter: "0x0101010101010101010101010101010101010101"
//!     authorization: { kind: count, msg_type: "/provenance.metadata.v1.MsgWriteScopeRequest", allowed: 1 }
//! message:
//!   type: "/provenance.metadata.v1.MsgWriteScopeRequest"
//!   signers: ["0x0909090909090909090909090909090909090909"]
//! check:
//!   kind: without_roles
//!   required: ["0x0101010101010101010101010101010101010101"]
//! ```
//!
//! Files ending in `.json` are read as JSON, anything else as YAML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use mdauth_core::{Address, PartyRequirement, PartyType, SignedMsg, Timestamp};
use mdauth_engine::EngineConfig;
use mdauth_registry::{Account, Authorization, MemoryAccounts, MemoryDelegations};

/// A parsed scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Accounts known to the account registry.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Grants held by the delegation registry.
    #[serde(default)]
    pub grants: Vec<GrantEntry>,
    /// The signed request under check.
    pub message: SignedMsg,
    /// Engine settings. Taken from the environment when absent.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Block time used to expire grants. No grant expires when absent.
    #[serde(default)]
    pub block_time: Option<Timestamp>,
    /// The check to run.
    pub check: Check,
}

/// One delegation grant.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantEntry {
    pub grantee: Address,
    pub granter: Address,
    pub authorization: Authorization,
    #[serde(default)]
    pub expiration: Option<Timestamp>,
}

/// The engine entry point a scenario exercises.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Parties with roles, plus the roles that must be filled.
    WithRoles {
        #[serde(default)]
        required: Vec<PartyRequirement>,
        #[serde(default)]
        available: Vec<PartyRequirement>,
        #[serde(default)]
        roles: Vec<PartyType>,
    },
    /// A flat list of addresses that must sign.
    WithoutRoles {
        #[serde(default)]
        required: Vec<String>,
    },
    /// A single value-owner change. Empty strings mean "no owner".
    ValueOwner {
        #[serde(default)]
        existing: String,
        #[serde(default)]
        proposed: String,
    },
    /// Several existing value owners replaced by one.
    ValueOwners {
        existing_owners: Vec<Address>,
        #[serde(default)]
        proposed: String,
    },
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let scenario = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON scenario: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML scenario: {}", path.display()))?
        };
        Ok(scenario)
    }

    /// Build registries holding the scenario's accounts and grants.
    pub fn registries(&self) -> (MemoryAccounts, MemoryDelegations) {
        let accounts: MemoryAccounts = self.accounts.iter().cloned().collect();
        let delegations = MemoryDelegations::new();
        if let Some(at) = self.block_time {
            delegations.set_block_time(at);
        }
        for entry in &self.grants {
            delegations.grant(
                &entry.grantee,
                &entry.granter,
                entry.authorization.clone(),
                entry.expiration,
            );
        }
        tracing::debug!(
            accounts = accounts.len(),
            grants = delegations.len(),
            "registries seeded"
        );
        (accounts, delegations)
    }

    /// The configured engine settings, falling back to the environment.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => EngineConfig::from_env().context("invalid engine configuration in environment"),
        }
    }
}
