//! Shared fixtures for unit tests.

use mdauth_core::{Address, Timestamp};
use mdauth_registry::{
    Access, AccessGrant, Account, AssetAccount, Authorization, BaseAccount, DelegationRegistry,
    MemoryAccounts, MemoryDelegations, RegistryError, StoredGrant,
};

use crate::authorizer::Authorizer;
use crate::config::EngineConfig;

pub fn addr(seed: u8) -> Address {
    Address::from_bytes(&[seed; 20]).unwrap()
}

pub fn s(seed: u8) -> String {
    addr(seed).to_string()
}

#[derive(Default)]
pub struct TestEnv {
    pub accounts: MemoryAccounts,
    pub delegations: MemoryDelegations,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authorizer(&self) -> Authorizer<MemoryAccounts, MemoryDelegations> {
        Authorizer::new(self.accounts.clone(), self.delegations.clone())
    }

    pub fn authorizer_with(
        &self,
        config: EngineConfig,
    ) -> Authorizer<MemoryAccounts, MemoryDelegations> {
        Authorizer::with_config(self.accounts.clone(), self.delegations.clone(), config)
    }

    pub fn grant(&self, grantee: Address, granter: Address, authorization: Authorization) {
        self.delegations.grant(&grantee, &granter, authorization, None);
    }

    pub fn user(&self, address: Address) {
        self.accounts
            .insert(Account::Base(BaseAccount::with_key(address, "02aa", 4)));
    }

    pub fn contract(&self, address: Address) {
        self.accounts
            .insert(Account::Base(BaseAccount::keyless(address)));
    }

    pub fn asset(&self, address: Address, denom: &str, acl: Vec<(Address, Vec<Access>)>) {
        self.accounts.insert(Account::Asset(AssetAccount {
            address,
            denom: denom.to_string(),
            access_control: acl
                .into_iter()
                .map(|(holder, perms)| AccessGrant::new(holder.to_string(), perms))
                .collect(),
        }));
    }
}

/// Wraps a delegation registry and fails every mutation.
pub struct FailingSaves(pub MemoryDelegations);

impl DelegationRegistry for FailingSaves {
    fn find_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type: &str,
    ) -> Option<StoredGrant> {
        self.0.find_grant(grantee, granter, msg_type)
    }

    fn delete_grant(
        &self,
        _grantee: &Address,
        _granter: &Address,
        _msg_type: &str,
    ) -> Result<(), RegistryError> {
        Err(RegistryError::Storage("delete refused".to_string()))
    }

    fn save_grant(
        &self,
        _grantee: &Address,
        _granter: &Address,
        _authorization: Authorization,
        _expiration: Option<Timestamp>,
    ) -> Result<(), RegistryError> {
        Err(RegistryError::Storage("save refused".to_string()))
    }
}
