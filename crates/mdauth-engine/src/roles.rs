//! # Role Fulfillment
//!
//! A required role is filled by a party record that is eligible for role
//! fulfillment, declared in that role, not yet consumed, and bound to a
//! signer. Each record fills at most one role slot.
//!
//! Direct signatures are matched first ([`associate_required_roles`]).
//! Roles still open are then offered to unbound eligible records through
//! delegation, one record per role.

use std::collections::BTreeMap;

use mdauth_core::{AuthzMsg, PartyType};
use mdauth_registry::{AccountRegistry, DelegationRegistry, RegistryError};

use crate::authorizer::Authorizer;
use crate::cache::RequestContext;
use crate::party::PartyRecord;
use crate::signers::SignerSet;

/// Consume one signed, eligible record per required role. Returns the
/// roles left unfilled, in the order given.
pub fn associate_required_roles(
    records: &mut [PartyRecord],
    required_roles: &[PartyType],
) -> Vec<PartyType> {
    let mut unfilled = Vec::new();
    for &role in required_roles {
        match records
            .iter_mut()
            .find(|r| r.is_still_eligible_for(role) && r.has_signer())
        {
            Some(record) => record.mark_consumed(),
            None => unfilled.push(role),
        }
    }
    unfilled
}

/// Per role, `"ROLE need N have M"` for every role with fewer consumed
/// records than required, joined by `", "`. Roles appear in ascending
/// numeric order.
pub fn missing_roles_summary(records: &[PartyRecord], required_roles: &[PartyType]) -> String {
    let mut need: BTreeMap<PartyType, usize> = BTreeMap::new();
    for &role in required_roles {
        *need.entry(role).or_default() += 1;
    }

    let mut have: BTreeMap<PartyType, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_consumed()) {
        *have.entry(record.role()).or_default() += 1;
    }

    need.into_iter()
        .filter_map(|(role, needed)| {
            let had = have.get(&role).copied().unwrap_or(0);
            (needed > had).then(|| format!("{role} need {needed} have {had}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl<A: AccountRegistry, D: DelegationRegistry> Authorizer<A, D> {
    /// Try to fill each of `roles` through delegation from an eligible,
    /// unbound record. Returns `true` if any role stays unfilled.
    ///
    /// Every role is attempted even after one fails, so that the consumed
    /// counts used for the error summary are complete.
    pub fn associate_authorizations_for_roles(
        &self,
        ctx: &mut RequestContext,
        roles: &[PartyType],
        records: &mut [PartyRecord],
        signers: &SignerSet,
        msg: &dyn AuthzMsg,
    ) -> Result<bool, RegistryError> {
        let mut any_missing = false;
        for &role in roles {
            let mut filled = false;
            let candidates = records
                .iter_mut()
                .filter(|r| r.is_still_eligible_for(role) && !r.has_signer());
            self.associate_authorizations_with(ctx, candidates, signers, msg, |record| {
                record.mark_consumed();
                filled = true;
                true
            })?;
            if !filled {
                tracing::debug!(%role, "no delegated signer for required role");
                any_missing = true;
            }
        }
        Ok(any_missing)
    }
}
