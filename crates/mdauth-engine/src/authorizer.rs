//! The engine handle.
//!
//! [`Authorizer`] owns the registries and configuration. Its operations are
//! split across modules by concern (`delegation`, `roles`, `contract`,
//! `resolver`, `value_owner`), each adding an `impl` block. All per-request
//! state lives in the [`RequestContext`](crate::RequestContext) passed to
//! each call, so one `Authorizer` serves any number of requests.

use mdauth_registry::{AccountRegistry, DelegationRegistry};

use crate::config::EngineConfig;

/// Signer authorization engine over an account and a delegation registry.
#[derive(Debug, Clone)]
pub struct Authorizer<A, D> {
    pub(crate) accounts: A,
    pub(crate) delegations: D,
    pub(crate) config: EngineConfig,
}

impl<A: AccountRegistry, D: DelegationRegistry> Authorizer<A, D> {
    /// An engine with the default configuration.
    pub fn new(accounts: A, delegations: D) -> Self {
        Self::with_config(accounts, delegations, EngineConfig::default())
    }

    pub fn with_config(accounts: A, delegations: D, config: EngineConfig) -> Self {
        Self {
            accounts,
            delegations,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn delegations(&self) -> &D {
        &self.delegations
    }
}
