//! # Automated-Account Guards
//!
//! Automated (smart contract) accounts have no key of their own, so they
//! are recognised heuristically: a plain account that exists, has a zero
//! sequence, and has no public key.
//!
//! Two rules apply to them:
//!
//! - **Role binding.** Among parties that may fill roles, an automated
//!   account must be declared in the reserved automated role, and only an
//!   automated account may be.
//! - **Position.** Automated signers come first in the signer list. An
//!   automated signer whose signature was not already used by a party must
//!   be authorized by every signer after it, and so cannot be last.

use mdauth_core::{Address, AuthzMsg};
use mdauth_registry::{AccountRegistry, DelegationRegistry};

use crate::authorizer::Authorizer;
use crate::cache::RequestContext;
use crate::error::AuthzError;
use crate::party::PartyRecord;
use crate::signers::SignerSet;
use crate::used::UsedAddressSet;

impl<A: AccountRegistry, D: DelegationRegistry> Authorizer<A, D> {
    /// Whether `address` is an automated account. `false` if no account
    /// exists there.
    pub fn is_automated_account(&self, ctx: &mut RequestContext, address: &Address) -> bool {
        if self.config.cache_automated_lookups {
            if let Some(known) = ctx.cache().automated(address) {
                return known;
            }
        }
        let automated = self
            .accounts
            .account(address)
            .is_some_and(|account| account.is_keyless_base());
        if self.config.cache_automated_lookups {
            ctx.cache_mut().set_automated(address.clone(), automated);
        }
        automated
    }

    /// Check that automated accounts, and only they, hold the automated
    /// role among records eligible for role fulfillment.
    ///
    /// The party's own address is checked, not its signer's.
    pub fn validate_role_binding(
        &self,
        ctx: &mut RequestContext,
        records: &[PartyRecord],
    ) -> Result<(), AuthzError> {
        let reserved = self.config.automated_role;
        for record in records.iter().filter(|r| r.is_eligible_for_role_fulfillment()) {
            let Some(account) = record.resolved_account() else {
                continue;
            };
            let automated = self.is_automated_account(ctx, account);
            let has_role = record.role() == reserved;
            if automated && !has_role {
                return Err(AuthzError::SmartContractWithoutRole {
                    address: record.address().to_string(),
                    role: reserved,
                });
            }
            if !automated && has_role {
                return Err(AuthzError::RoleWithoutSmartContract {
                    address: record.address().to_string(),
                    role: reserved,
                });
            }
        }
        Ok(())
    }

    /// Enforce signer ordering for automated signers.
    ///
    /// Automated signers must precede every other signer. One already in
    /// `used` is accounted for. Any other must not be last, and every
    /// signer after it must have authorized it by delegation. Signers that
    /// do not parse are not considered.
    pub fn validate_positional_authorization(
        &self,
        ctx: &mut RequestContext,
        used: &UsedAddressSet,
        msg: &dyn AuthzMsg,
    ) -> Result<(), AuthzError> {
        let signers = SignerSet::from_msg(msg);
        let accounts = signers.accounts();
        let mut may_be_automated = true;

        for (i, signer) in accounts.iter().enumerate() {
            let automated = self.is_automated_account(ctx, signer);
            if automated && !may_be_automated {
                return Err(failure(AuthzError::SmartContractFollowsNonContract(
                    signer.to_string(),
                )));
            }
            if !automated {
                may_be_automated = false;
                continue;
            }
            if used.is_used(&signer.to_string()) {
                continue;
            }

            let later = &accounts[i + 1..];
            if later.is_empty() {
                return Err(failure(AuthzError::SmartContractLastSigner(signer.to_string())));
            }
            for granter in later {
                let grantee =
                    self.find_delegate(ctx, granter, std::slice::from_ref(signer), msg)?;
                if grantee.as_ref() != Some(signer) {
                    return Err(failure(AuthzError::SmartContractNotAuthorized(
                        signer.to_string(),
                    )));
                }
            }
        }
        Ok(())
    }
}

fn failure(err: AuthzError) -> AuthzError {
    tracing::debug!(error = %err, "positional authorization failed");
    err
}
