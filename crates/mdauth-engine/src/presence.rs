//! Presence-only checks.
//!
//! These compare declared parties against requirements without looking at
//! signers at all: a role is present if some party holds it, a party is
//! present if an identical address and role is declared.

use mdauth_core::{PartyRequirement, PartyType};

use crate::difference::find_missing_parties;
use crate::error::AuthzError;
use crate::party::build_party_records;
use crate::roles::missing_roles_summary;

/// Check that `parties` hold every role in `required_roles`, one party per
/// role slot.
pub fn validate_roles_present(
    parties: &[PartyRequirement],
    required_roles: &[PartyType],
) -> Result<(), AuthzError> {
    let mut records = build_party_records(&[], parties);
    let mut role_missing = false;
    for &role in required_roles {
        match records.iter_mut().find(|r| r.is_still_eligible_for(role)) {
            Some(record) => record.mark_consumed(),
            None => role_missing = true,
        }
    }
    if role_missing {
        return Err(AuthzError::MissingRoles(missing_roles_summary(
            &records,
            required_roles,
        )));
    }
    Ok(())
}

/// Check that every party in `required` appears in `available`, matching on
/// address and role.
pub fn validate_parties_present(
    required: &[PartyRequirement],
    available: &[PartyRequirement],
) -> Result<(), AuthzError> {
    let missing = find_missing_parties(required, available);
    if missing.is_empty() {
        return Ok(());
    }
    Err(AuthzError::MissingParties(
        missing.iter().map(ToString::to_string).collect(),
    ))
}
