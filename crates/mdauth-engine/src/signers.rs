//! # Signer Sets
//!
//! A request's signers arrive as strings. Delegation lookups need resolved
//! [`Address`] values, so [`SignerSet`] resolves them once, on first use.
//! Strings that fail to parse are absent from the resolved view but kept in
//! the string view.

use std::cell::OnceCell;

use mdauth_core::{Address, AuthzMsg};

use crate::party::PartyRecord;

/// The ordered signers of one request.
#[derive(Debug, Clone, Default)]
pub struct SignerSet {
    strings: Vec<String>,
    accounts: OnceCell<Vec<Address>>,
}

impl SignerSet {
    /// Wrap raw signer strings.
    pub fn new(signers: Vec<String>) -> Self {
        Self {
            strings: signers,
            accounts: OnceCell::new(),
        }
    }

    /// The signers of `msg`.
    pub fn from_msg(msg: &dyn AuthzMsg) -> Self {
        Self::new(msg.signers().to_vec())
    }

    /// The raw signer strings, in signing order.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// The signers that parse as addresses, in signing order.
    pub fn accounts(&self) -> &[Address] {
        self.accounts.get_or_init(|| Address::parse_lossy(&self.strings))
    }

    /// Whether `address` is one of the raw signer strings.
    pub fn contains(&self, address: &str) -> bool {
        self.strings.iter().any(|s| s == address)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Bind each unbound record to the first signer string equal to its address.
///
/// Records with a binding, or with no matching signer, are left alone.
pub fn associate_signers(records: &mut [PartyRecord], signers: &SignerSet) {
    for record in records.iter_mut().filter(|r| !r.has_signer()) {
        if let Some(signer) = signers.strings().iter().find(|s| *s == record.address()) {
            record.set_signer(signer.clone());
        }
    }
}
