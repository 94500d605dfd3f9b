//! Addresses already spent during a resolution pass.
//!
//! Independent validation calls on one request merge their sets with
//! [`UsedAddressSet::also_use`], so a later guard sees what an earlier call
//! consumed.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::party::PartyRecord;

/// A set of address strings marked as used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsedAddressSet(BTreeSet<String>);

impl UsedAddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bound signer of `records`.
    pub fn from_records(records: &[PartyRecord]) -> Self {
        records.iter().filter_map(PartyRecord::bound_signer).collect()
    }

    /// Mark `address` as used.
    pub fn use_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.0.insert(address.into());
        self
    }

    pub fn is_used(&self, address: &str) -> bool {
        self.0.contains(address)
    }

    /// Add every address of `other`.
    pub fn also_use(&mut self, other: &UsedAddressSet) -> &mut Self {
        self.0.extend(other.0.iter().cloned());
        self
    }

    /// Used addresses in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UsedAddressSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
