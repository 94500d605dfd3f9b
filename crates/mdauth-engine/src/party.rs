//! # Party Records
//!
//! A [`PartyRecord`] is the mutable, per-call resolution state of one
//! declared party. Records are built from two lists of
//! [`PartyRequirement`]s:
//!
//! | Source | Must sign | May fill a role |
//! |--------|-----------|-----------------|
//! | required list only (`optional = false`) | yes | no |
//! | available list only | no | yes |
//! | both (same address and role) | yes | yes |
//!
//! Required entries marked optional add nothing. Records are matched on
//! address *and* role, so an address declared in two roles yields two
//! records.
//!
//! ## Invariants
//!
//! - A record has a signer binding iff it has a signer string or a signer
//!   account. The two setters keep them consistent.
//! - Only a record eligible for role fulfillment can be consumed, and a
//!   consumed record never fills a second role.

use std::cell::OnceCell;

use mdauth_core::{Address, PartyRequirement, PartyType};

/// Resolution state of one party.
#[derive(Debug, Clone)]
pub struct PartyRecord {
    address: String,
    resolved: OnceCell<Option<Address>>,
    role: PartyType,
    optional: bool,
    signer: Option<String>,
    signer_account: Option<Address>,
    eligible_for_role: bool,
    consumed_by_role: bool,
}

impl PartyRecord {
    fn wrap(address: String, role: PartyType, optional: bool, eligible_for_role: bool) -> Self {
        Self {
            address,
            resolved: OnceCell::new(),
            role,
            optional,
            signer: None,
            signer_account: None,
            eligible_for_role,
            consumed_by_role: false,
        }
    }

    /// A record for an entry of the required list. It cannot fill a role.
    pub fn required(party: &PartyRequirement) -> Self {
        Self::wrap(party.address.clone(), party.role, party.optional, false)
    }

    /// A record for an entry of the available list. It is optional unless
    /// later made required, and may fill a role.
    pub fn available(party: &PartyRequirement) -> Self {
        Self::wrap(party.address.clone(), party.role, true, true)
    }

    /// A required, role-less record for a bare address.
    pub fn required_address(address: impl Into<String>) -> Self {
        Self::wrap(address.into(), PartyType::Unspecified, false, false)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The parsed address, computed on first call. `None` if the address
    /// string does not parse.
    pub fn resolved_account(&self) -> Option<&Address> {
        self.resolved
            .get_or_init(|| Address::parse(&self.address).ok())
            .as_ref()
    }

    pub fn role(&self) -> PartyType {
        self.role
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }

    pub fn make_required(&mut self) {
        self.optional = false;
    }

    /// The raw signer string, if bound by direct signature.
    pub fn signer(&self) -> Option<&str> {
        self.signer.as_deref()
    }

    /// The grantee account, if bound by delegation.
    pub fn signer_account(&self) -> Option<&Address> {
        self.signer_account.as_ref()
    }

    /// Bind to a signer string. Clears any differing signer account.
    pub fn set_signer(&mut self, signer: impl Into<String>) {
        let signer = signer.into();
        if self.signer.as_deref() != Some(signer.as_str()) {
            self.signer_account = None;
        }
        self.signer = Some(signer);
    }

    /// Bind to a signer account. Clears any differing signer string.
    pub fn set_signer_account(&mut self, account: Address) {
        if self.signer_account.as_ref() != Some(&account) {
            self.signer = None;
        }
        self.signer_account = Some(account);
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some() || self.signer_account.is_some()
    }

    /// The bound signer as an address string, whichever way it was bound.
    pub fn bound_signer(&self) -> Option<String> {
        match (&self.signer, &self.signer_account) {
            (Some(signer), _) => Some(signer.clone()),
            (None, Some(account)) => Some(account.to_string()),
            (None, None) => None,
        }
    }

    pub fn is_eligible_for_role_fulfillment(&self) -> bool {
        self.eligible_for_role
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_by_role
    }

    /// Eligible, not yet consumed, and declared in `role`.
    pub fn is_still_eligible_for(&self, role: PartyType) -> bool {
        self.eligible_for_role && !self.consumed_by_role && self.role == role
    }

    /// Record that this party has filled a role slot. No effect on a
    /// record that cannot fill roles.
    pub fn mark_consumed(&mut self) {
        if self.eligible_for_role {
            self.consumed_by_role = true;
        }
    }

    fn is_same_as(&self, party: &PartyRequirement) -> bool {
        party.is_same_as(&self.address, self.role)
    }
}

/// Merge the required and available party lists into records.
///
/// Available parties come first, deduplicated, in list order. Each
/// non-optional required party then either marks its available
/// counterpart required or is appended.
pub fn build_party_records(
    required: &[PartyRequirement],
    available: &[PartyRequirement],
) -> Vec<PartyRecord> {
    let mut records: Vec<PartyRecord> = Vec::with_capacity(available.len());

    for party in available {
        if !records.iter().any(|known| known.is_same_as(party)) {
            records.push(PartyRecord::available(party));
        }
    }

    for party in required.iter().filter(|p| !p.optional) {
        match records.iter_mut().find(|known| known.is_same_as(party)) {
            Some(known) => known.make_required(),
            None => records.push(PartyRecord::required(party)),
        }
    }

    records
}

/// Every required record without a signer binding, in order.
pub fn find_unsigned_required(records: &mut [PartyRecord]) -> Vec<&mut PartyRecord> {
    records
        .iter_mut()
        .filter(|r| r.is_required() && !r.has_signer())
        .collect()
}
