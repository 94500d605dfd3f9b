//! # Value-Owner Transfers
//!
//! Moving the value owner of a record away from one account and to another
//! needs authorization on both sides.
//!
//! | Side | Asset account | Any other account |
//! |------|---------------|-------------------|
//! | removal from existing | a signer holds `Withdraw` | the owner signed, a resolved party already bound it, or it delegated to a signer |
//! | addition to proposed | a signer holds `Deposit` | nothing required |
//!
//! Each check reports the signer addresses it relied on, merged into one
//! [`UsedAddressSet`], so a later guard can tell which signatures were
//! already spent.

use mdauth_core::{Address, AuthzMsg};
use mdauth_registry::{Access, AccountRegistry, AssetAccount, DelegationRegistry};

use crate::authorizer::Authorizer;
use crate::cache::RequestContext;
use crate::error::AuthzError;
use crate::party::PartyRecord;
use crate::signers::SignerSet;
use crate::used::UsedAddressSet;

impl<A: AccountRegistry, D: DelegationRegistry> Authorizer<A, D> {
    /// The asset account at `address`, if it is one, and whether any of
    /// `signers` holds `access` on it.
    pub fn find_asset_and_check_authority(
        &self,
        address: &str,
        signers: &[String],
        access: Access,
    ) -> (Option<AssetAccount>, bool) {
        match self.asset_authority(address, signers, access) {
            Some((asset, holder)) => (Some(asset), holder.is_some()),
            None => (None, false),
        }
    }

    /// The asset account at `address` and the first signer holding `access`
    /// on it. `None` if `address` is not an asset account.
    fn asset_authority(
        &self,
        address: &str,
        signers: &[String],
        access: Access,
    ) -> Option<(AssetAccount, Option<String>)> {
        let parsed = Address::parse(address).ok()?;
        let asset = self.accounts.account(&parsed)?.as_asset()?.clone();
        let holder = signers
            .iter()
            .find(|signer| asset.has_access(signer, access))
            .cloned();
        Some((asset, holder))
    }

    /// Authorize changing a value owner from `existing` to `proposed`.
    ///
    /// `resolved` holds party records already bound earlier in the same
    /// request. A binding found there is reused instead of consuming a
    /// second delegation. Empty strings mean "no owner".
    ///
    /// # Errors
    ///
    /// [`AuthzError::MissingAssetPermission`] when an asset side lacks a
    /// permitted signer, [`AuthzError::MissingValueOwnerSignature`] when a
    /// plain existing owner is not represented, and
    /// [`AuthzError::ValueOwnerDelegation`] if consuming its grant failed.
    #[tracing::instrument(
        skip_all,
        fields(msg_type = msg.type_url(), existing = existing, proposed = proposed)
    )]
    pub fn resolve_transfer(
        &self,
        ctx: &mut RequestContext,
        existing: &str,
        proposed: &str,
        resolved: &[PartyRecord],
        msg: &dyn AuthzMsg,
    ) -> Result<UsedAddressSet, AuthzError> {
        let mut used = UsedAddressSet::new();
        if existing == proposed {
            return Ok(used);
        }
        let signers = SignerSet::from_msg(msg);

        if !existing.is_empty() {
            used.also_use(&self.authorize_removal(ctx, existing, resolved, &signers, msg)?);
        }
        if !proposed.is_empty() {
            if let Some((asset, holder)) =
                self.asset_authority(proposed, signers.strings(), Access::Deposit)
            {
                let holder = holder.ok_or_else(|| {
                    rejected(AuthzError::MissingAssetPermission {
                        address: proposed.to_string(),
                        denom: asset.denom.clone(),
                        permission: Access::Deposit,
                    })
                })?;
                used.use_address(holder);
            }
        }
        Ok(used)
    }

    fn authorize_removal(
        &self,
        ctx: &mut RequestContext,
        existing: &str,
        resolved: &[PartyRecord],
        signers: &SignerSet,
        msg: &dyn AuthzMsg,
    ) -> Result<UsedAddressSet, AuthzError> {
        let mut used = UsedAddressSet::new();

        if let Some((asset, holder)) =
            self.asset_authority(existing, signers.strings(), Access::Withdraw)
        {
            let holder = holder.ok_or_else(|| {
                rejected(AuthzError::MissingAssetPermission {
                    address: existing.to_string(),
                    denom: asset.denom.clone(),
                    permission: Access::Withdraw,
                })
            })?;
            used.use_address(holder);
            return Ok(used);
        }

        if signers.contains(existing) {
            used.use_address(existing);
            return Ok(used);
        }

        let prior = resolved
            .iter()
            .filter(|r| r.address() == existing)
            .find_map(PartyRecord::bound_signer);
        if let Some(signer) = prior {
            used.use_address(signer);
            return Ok(used);
        }

        // An owner string that is not an address cannot have delegated.
        if let Ok(granter) = Address::parse(existing) {
            let grantees: Vec<Address> = signers
                .accounts()
                .iter()
                .filter(|signer| {
                    !self.config.exclude_automated_value_owner_grantees
                        || !self.is_automated_account(ctx, signer)
                })
                .cloned()
                .collect();
            let grantee = self
                .find_delegate(ctx, &granter, &grantees, msg)
                .map_err(|source| AuthzError::ValueOwnerDelegation {
                    address: existing.to_string(),
                    source,
                })?;
            if let Some(grantee) = grantee {
                used.use_address(grantee.to_string());
                return Ok(used);
            }
        }

        Err(rejected(AuthzError::MissingValueOwnerSignature(
            existing.to_string(),
        )))
    }

    /// Authorize replacing several existing value owners with `proposed`.
    ///
    /// If the first signer is an automated account, it alone is considered.
    /// Owners equal to `proposed` and asset-account owners are skipped; the
    /// latter are checked by the asset layer when value moves. Every other
    /// owner must be a considered signer or have delegated to one.
    ///
    /// Returns the considered signers (the transfer agents) and the
    /// signers used.
    ///
    /// # Errors
    ///
    /// [`AuthzError::InvalidSigner`] if a considered signer does not parse,
    /// plus the errors of [`resolve_transfer`](Self::resolve_transfer) for
    /// plain owners.
    #[tracing::instrument(
        skip_all,
        fields(msg_type = msg.type_url(), owners = existing_owners.len())
    )]
    pub fn resolve_value_owners_signers(
        &self,
        ctx: &mut RequestContext,
        existing_owners: &[Address],
        proposed: &str,
        msg: &dyn AuthzMsg,
    ) -> Result<(Vec<Address>, UsedAddressSet), AuthzError> {
        let mut used = UsedAddressSet::new();
        if let [only] = existing_owners {
            if only.to_string() == proposed {
                return Ok((Vec::new(), used));
            }
        }

        let agents = self.transfer_agents(ctx, msg)?;

        for owner in existing_owners {
            let owner_str = owner.to_string();
            if owner_str == proposed {
                continue;
            }
            if agents.contains(owner) {
                used.use_address(owner_str);
                continue;
            }
            if self
                .accounts
                .account(owner)
                .is_some_and(|account| account.as_asset().is_some())
            {
                continue;
            }

            let grantee = self
                .find_delegate(ctx, owner, &agents, msg)
                .map_err(|source| AuthzError::ValueOwnerDelegation {
                    address: owner_str.clone(),
                    source,
                })?;
            match grantee {
                Some(grantee) => {
                    used.use_address(grantee.to_string());
                }
                None => return Err(rejected(AuthzError::MissingValueOwnerSignature(owner_str))),
            }
        }

        Ok((agents, used))
    }

    fn transfer_agents(
        &self,
        ctx: &mut RequestContext,
        msg: &dyn AuthzMsg,
    ) -> Result<Vec<Address>, AuthzError> {
        let parse = |index: usize, raw: &String| {
            Address::parse(raw).map_err(|err| AuthzError::InvalidSigner {
                index,
                address: raw.clone(),
                reason: err.to_string(),
            })
        };

        let Some(first) = msg.signers().first() else {
            return Ok(Vec::new());
        };
        let first = parse(0, first)?;
        if self.is_automated_account(ctx, &first) {
            return Ok(vec![first]);
        }

        let mut agents = vec![first];
        for (index, raw) in msg.signers().iter().enumerate().skip(1) {
            agents.push(parse(index, raw)?);
        }
        Ok(agents)
    }
}

fn rejected(err: AuthzError) -> AuthzError {
    tracing::debug!(error = %err, "value owner change not authorized");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::testutil::*;
    use mdauth_core::msg::types::{UPDATE_VALUE_OWNERS, WRITE_SCOPE};
    use mdauth_core::{PartyRequirement, PartyType, SignedMsg};
    use mdauth_registry::{Authorization, RegistryError};

    #[test]
    fn test_same_owner_is_noop() {
        let env = TestEnv::new();
        let msg = SignedMsg::new(WRITE_SCOPE, Vec::<String>::new());
        let used = env
            .authorizer()
            .resolve_transfer(&mut RequestContext::new(), &s(1), &s(1), &[], &msg)
            .unwrap();
        assert!(used.is_empty());
    }

    #[test]
    fn test_asset_deposit_and_withdraw() {
        let env = TestEnv::new();
        let asset = addr(7);
        env.user(addr(1));
        env.asset(asset.clone(), "gold", vec![(addr(1), vec![Access::Deposit])]);
        let authorizer = env.authorizer();
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1)]);

        let used = authorizer
            .resolve_transfer(&mut RequestContext::new(), "", &asset.to_string(), &[], &msg)
            .unwrap();
        assert!(used.is_used(&s(1)));

        let err = authorizer
            .resolve_transfer(&mut RequestContext::new(), &asset.to_string(), &s(1), &[], &msg)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "missing signature for {} (gold) with authority to withdraw/remove it as scope value owner",
                asset
            )
        );
    }

    #[test]
    fn test_deposit_missing_on_proposed_asset() {
        let env = TestEnv::new();
        env.asset(addr(7), "gold", vec![(addr(2), vec![Access::Deposit])]);
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1)]);
        let err = env
            .authorizer()
            .resolve_transfer(&mut RequestContext::new(), &s(1), &s(7), &[], &msg)
            .unwrap_err();
        assert!(matches!(
            err,
            AuthzError::MissingAssetPermission { permission: Access::Deposit, .. }
        ));
    }

    #[test]
    fn test_existing_owner_signed_directly() {
        let env = TestEnv::new();
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1)]);
        let used = env
            .authorizer()
            .resolve_transfer(&mut RequestContext::new(), &s(1), &s(2), &[], &msg)
            .unwrap();
        assert_eq!(used.iter().collect::<Vec<_>>(), vec![s(1).as_str()]);
    }

    #[test]
    fn test_resolved_party_binding_is_reused() {
        let env = TestEnv::new();
        // A single-use grant already consumed by party resolution.
        env.grant(addr(9), addr(1), Authorization::count(WRITE_SCOPE, 1));
        let authorizer = env.authorizer();
        let msg = SignedMsg::new(WRITE_SCOPE, [s(9)]);
        let mut ctx = RequestContext::new();
        let records = authorizer
            .resolve_with_roles(
                &mut ctx,
                &[PartyRequirement::required(s(1), PartyType::Owner)],
                &[],
                &[],
                &msg,
            )
            .unwrap();
        assert!(env.delegations.is_empty());

        let used = authorizer
            .resolve_transfer(&mut ctx, &s(1), &s(2), &records, &msg)
            .unwrap();
        assert!(used.is_used(&s(9)));
    }

    #[test]
    fn test_existing_owner_delegated() {
        let env = TestEnv::new();
        env.user(addr(9));
        env.grant(addr(9), addr(1), Authorization::generic(WRITE_SCOPE));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(9)]);
        let used = env
            .authorizer()
            .resolve_transfer(&mut RequestContext::new(), &s(1), "", &[], &msg)
            .unwrap();
        assert!(used.is_used(&s(9)));
    }

    #[test]
    fn test_automated_grantee_is_not_used_for_removal() {
        let env = TestEnv::new();
        env.contract(addr(9));
        env.grant(addr(9), addr(1), Authorization::generic(WRITE_SCOPE));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(9)]);

        let err = env
            .authorizer()
            .resolve_transfer(&mut RequestContext::new(), &s(1), &s(2), &[], &msg)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("missing signature from existing value owner {}", s(1))
        );

        let permissive = env.authorizer_with(EngineConfig {
            exclude_automated_value_owner_grantees: false,
            ..EngineConfig::default()
        });
        assert!(permissive
            .resolve_transfer(&mut RequestContext::new(), &s(1), &s(2), &[], &msg)
            .is_ok());
    }

    #[test]
    fn test_removal_registry_error_is_wrapped() {
        let env = TestEnv::new();
        env.grant(addr(9), addr(1), Authorization::count(WRITE_SCOPE, 5));
        let authorizer = Authorizer::new(env.accounts.clone(), FailingSaves(env.delegations.clone()));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(9)]);
        let err = authorizer
            .resolve_transfer(&mut RequestContext::new(), &s(1), &s(2), &[], &msg)
            .unwrap_err();
        assert_eq!(
            err,
            AuthzError::ValueOwnerDelegation {
                address: s(1),
                source: RegistryError::Storage("save refused".into()),
            }
        );
    }

    #[test]
    fn test_find_asset_and_check_authority() {
        let env = TestEnv::new();
        env.asset(addr(7), "gold", vec![(addr(1), vec![Access::Withdraw])]);
        let authorizer = env.authorizer();
        let (asset, ok) = authorizer.find_asset_and_check_authority(&s(7), &[s(1)], Access::Withdraw);
        assert_eq!(asset.map(|a| a.denom), Some("gold".to_string()));
        assert!(ok);
        let (_, ok) = authorizer.find_asset_and_check_authority(&s(7), &[s(1)], Access::Deposit);
        assert!(!ok);
        let (asset, ok) = authorizer.find_asset_and_check_authority("junk", &[s(1)], Access::Deposit);
        assert!(asset.is_none() && !ok);
    }

    #[test]
    fn test_multi_owner_single_match_is_noop() {
        let env = TestEnv::new();
        let msg = SignedMsg::new(UPDATE_VALUE_OWNERS, ["junk"]);
        let (agents, used) = env
            .authorizer()
            .resolve_value_owners_signers(&mut RequestContext::new(), &[addr(1)], &s(1), &msg)
            .unwrap();
        assert!(agents.is_empty());
        assert!(used.is_empty());
    }

    #[test]
    fn test_multi_owner_mixed_sources() {
        let env = TestEnv::new();
        env.user(addr(1));
        env.user(addr(9));
        env.asset(addr(7), "gold", vec![]);
        env.grant(addr(9), addr(2), Authorization::generic(UPDATE_VALUE_OWNERS));
        let msg = SignedMsg::new(UPDATE_VALUE_OWNERS, [s(1), s(9)]);
        let (agents, used) = env
            .authorizer()
            .resolve_value_owners_signers(
                &mut RequestContext::new(),
                &[addr(1), addr(2), addr(7), addr(3)],
                &s(3),
                &msg,
            )
            .unwrap();
        assert_eq!(agents, vec![addr(1), addr(9)]);
        assert_eq!(used.iter().collect::<Vec<_>>().len(), 2);
        assert!(used.is_used(&s(1)));
        assert!(used.is_used(&s(9)));
    }

    #[test]
    fn test_multi_owner_automated_first_signer_stands_alone() {
        let env = TestEnv::new();
        env.contract(addr(5));
        env.user(addr(1));
        let msg = SignedMsg::new(UPDATE_VALUE_OWNERS, [s(5), s(1)]);
        let err = env
            .authorizer()
            .resolve_value_owners_signers(&mut RequestContext::new(), &[addr(1)], &s(2), &msg)
            .unwrap_err();
        assert_eq!(err, AuthzError::MissingValueOwnerSignature(s(1)));
    }

    #[test]
    fn test_multi_owner_requires_parsable_signers() {
        let env = TestEnv::new();
        env.user(addr(1));
        let msg = SignedMsg::new(UPDATE_VALUE_OWNERS, [s(1), "bogus".to_string()]);
        let err = env
            .authorizer()
            .resolve_value_owners_signers(&mut RequestContext::new(), &[addr(1)], &s(2), &msg)
            .unwrap_err();
        assert!(matches!(err, AuthzError::InvalidSigner { index: 1, .. }));
    }
}
