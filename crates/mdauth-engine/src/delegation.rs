//! # Delegation Resolution
//!
//! Finds a signer that a party has delegated to, consuming the grant that
//! allows it.
//!
//! ## Lookup order
//!
//! For each candidate grantee in order, and for each grant type the request
//! may be covered by (its own type, then its parent type):
//!
//! 1. A cached acceptance for the triple wins immediately.
//! 2. Otherwise the registry's grant, if any, is asked to accept the
//!    request. A grant that errors is skipped.
//! 3. An accepted grant's effect (delete, or replace with an updated grant
//!    under the same expiration) is applied to the registry. A registry
//!    failure aborts the lookup.
//! 4. The acceptance is cached and the grantee returned.
//!
//! Finding nothing is not an error.

use mdauth_core::{resolve_grant_type_candidates, Address, AuthzMsg};
use mdauth_registry::{AccountRegistry, DelegationRegistry, RegistryError};

use crate::authorizer::Authorizer;
use crate::cache::RequestContext;
use crate::party::PartyRecord;
use crate::signers::SignerSet;

impl<A: AccountRegistry, D: DelegationRegistry> Authorizer<A, D> {
    /// The first of `grantees` that `granter` has authorized for `msg`.
    ///
    /// # Errors
    ///
    /// Returns the registry's error if applying an accepted grant's effect
    /// fails.
    pub fn find_delegate(
        &self,
        ctx: &mut RequestContext,
        granter: &Address,
        grantees: &[Address],
        msg: &dyn AuthzMsg,
    ) -> Result<Option<Address>, RegistryError> {
        if grantees.is_empty() {
            return Ok(None);
        }
        let msg_types = resolve_grant_type_candidates(msg.type_url());

        for grantee in grantees {
            for msg_type in &msg_types {
                if ctx
                    .cache()
                    .get_acceptable(grantee, granter, msg_type)
                    .is_some()
                {
                    tracing::trace!(%grantee, %granter, msg_type, "cached grant acceptance");
                    return Ok(Some(grantee.clone()));
                }

                let Some(stored) = self.delegations.find_grant(grantee, granter, msg_type) else {
                    continue;
                };
                let response = match stored.authorization.accept(msg) {
                    Ok(response) => response,
                    Err(err) => {
                        tracing::warn!(%grantee, %granter, msg_type, error = %err, "skipping unusable grant");
                        continue;
                    }
                };
                if !response.accept {
                    continue;
                }

                if response.delete {
                    self.delegations.delete_grant(grantee, granter, msg_type)?;
                } else if let Some(updated) = response.updated {
                    self.delegations
                        .save_grant(grantee, granter, updated, stored.expiration)?;
                }
                tracing::debug!(
                    %grantee,
                    %granter,
                    msg_type,
                    deleted = response.delete,
                    "delegation grant consumed"
                );

                ctx.cache_mut().set_acceptable(
                    grantee.clone(),
                    granter.clone(),
                    msg_type.as_str(),
                    stored.authorization,
                );
                return Ok(Some(grantee.clone()));
            }
        }
        Ok(None)
    }

    /// Bind every unbound record to a signer it has delegated to.
    ///
    /// Each record's resolved address is the granter and the signer
    /// accounts are the candidate grantees. Records whose address does
    /// not parse are skipped.
    pub fn associate_authorizations<'r>(
        &self,
        ctx: &mut RequestContext,
        records: impl IntoIterator<Item = &'r mut PartyRecord>,
        signers: &SignerSet,
        msg: &dyn AuthzMsg,
    ) -> Result<(), RegistryError> {
        self.associate_authorizations_with(ctx, records, signers, msg, |_| false)
    }

    /// Like [`associate_authorizations`](Self::associate_authorizations),
    /// calling `on_bind` after each binding. Iteration stops as soon as
    /// `on_bind` returns `true`.
    pub fn associate_authorizations_with<'r>(
        &self,
        ctx: &mut RequestContext,
        records: impl IntoIterator<Item = &'r mut PartyRecord>,
        signers: &SignerSet,
        msg: &dyn AuthzMsg,
        mut on_bind: impl FnMut(&mut PartyRecord) -> bool,
    ) -> Result<(), RegistryError> {
        for record in records {
            if record.has_signer() {
                continue;
            }
            let Some(granter) = record.resolved_account() else {
                continue;
            };
            if let Some(grantee) = self.find_delegate(ctx, granter, signers.accounts(), msg)? {
                record.set_signer_account(grantee);
                if on_bind(record) {
                    break;
                }
            }
        }
        Ok(())
    }
}
