//! # In-Memory Registries
//!
//! Thread-safe, cloneable registries backed by `parking_lot::RwLock` maps.
//! Clones share the same underlying map, so a test can hand one clone to
//! the engine and inspect the other afterwards.
//!
//! `parking_lot` locks are non-poisoning and every operation here is
//! synchronous, so no guard ever outlives the method that took it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use mdauth_core::{Address, Timestamp};

use crate::account::{Account, AccountRegistry};
use crate::error::RegistryError;
use crate::grant::{Authorization, DelegationRegistry, StoredGrant};

// ─── Accounts ───────────────────────────────────────────────────────

/// An account registry held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccounts {
    data: Arc<RwLock<HashMap<Address, Account>>>,
}

impl MemoryAccounts {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account under its own address, returning any account it
    /// replaced.
    pub fn insert(&self, account: Account) -> Option<Account> {
        let address = account.address().clone();
        self.data.write().insert(address, account)
    }

    /// Remove the account at `address`.
    pub fn remove(&self, address: &Address) -> Option<Account> {
        self.data.write().remove(address)
    }

    /// Number of accounts held.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether no accounts are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Account> for MemoryAccounts {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        let registry = Self::new();
        for account in iter {
            registry.insert(account);
        }
        registry
    }
}

impl AccountRegistry for MemoryAccounts {
    fn account(&self, address: &Address) -> Option<Account> {
        self.data.read().get(address).cloned()
    }
}

// ─── Delegations ────────────────────────────────────────────────────

type GrantKey = (Address, Address, String);

fn grant_key(grantee: &Address, granter: &Address, msg_type: &str) -> GrantKey {
    (grantee.clone(), granter.clone(), msg_type.to_string())
}

/// A delegation registry held in memory.
///
/// Grants whose expiration is at or before the registry's block time are
/// invisible to [`DelegationRegistry::find_grant`]. Without a block time,
/// nothing expires.
#[derive(Debug, Clone, Default)]
pub struct MemoryDelegations {
    grants: Arc<RwLock<HashMap<GrantKey, StoredGrant>>>,
    block_time: Arc<RwLock<Option<Timestamp>>>,
}

impl MemoryDelegations {
    /// Create an empty registry with no block time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time against which expirations are compared.
    pub fn set_block_time(&self, at: Timestamp) {
        *self.block_time.write() = Some(at);
    }

    /// Store a grant without any expiry check, replacing any existing one.
    pub fn grant(
        &self,
        grantee: &Address,
        granter: &Address,
        authorization: Authorization,
        expiration: Option<Timestamp>,
    ) {
        let key = grant_key(grantee, granter, authorization.msg_type());
        self.grants.write().insert(
            key,
            StoredGrant {
                authorization,
                expiration,
            },
        );
    }

    /// The stored grant under this key, expired or not.
    pub fn get(&self, grantee: &Address, granter: &Address, msg_type: &str) -> Option<StoredGrant> {
        self.grants
            .read()
            .get(&grant_key(grantee, granter, msg_type))
            .cloned()
    }

    /// Number of stored grants, including expired ones.
    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    /// Whether no grants are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, expiration: Option<Timestamp>) -> bool {
        match (expiration, *self.block_time.read()) {
            (Some(exp), Some(now)) => exp <= now,
            _ => false,
        }
    }
}

impl DelegationRegistry for MemoryDelegations {
    fn find_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type: &str,
    ) -> Option<StoredGrant> {
        let grant = self.get(grantee, granter, msg_type)?;
        if self.is_expired(grant.expiration) {
            tracing::trace!(%grantee, %granter, msg_type, "ignoring expired grant");
            return None;
        }
        Some(grant)
    }

    fn delete_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type: &str,
    ) -> Result<(), RegistryError> {
        match self.grants.write().remove(&grant_key(grantee, granter, msg_type)) {
            Some(_) => {
                tracing::debug!(%grantee, %granter, msg_type, "grant deleted");
                Ok(())
            }
            None => Err(RegistryError::GrantNotFound {
                grantee: grantee.to_string(),
                granter: granter.to_string(),
                msg_type: msg_type.to_string(),
            }),
        }
    }

    fn save_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        authorization: Authorization,
        expiration: Option<Timestamp>,
    ) -> Result<(), RegistryError> {
        if self.is_expired(expiration) {
            return Err(RegistryError::Rejected(format!(
                "expiration {} is not after the current block time",
                expiration.map(|t| t.to_string()).unwrap_or_default()
            )));
        }
        tracing::debug!(%grantee, %granter, msg_type = authorization.msg_type(), "grant saved");
        self.grant(grantee, granter, authorization, expiration);
        Ok(())
    }
}
