//! # Account Addresses
//!
//! `Address` is the resolved, byte-level form of an account identifier.
//! Requests carry signers as strings; the engine converts them to
//! `Address` values lazily and tolerates strings that do not convert.
//!
//! ## Canonical Form
//!
//! `0x` followed by lowercase hex of a 20- or 32-byte payload. Upper-case
//! hex is rejected rather than normalized: two strings that name the same
//! account must be byte-identical, otherwise string-keyed bookkeeping
//! (used-signer sets, signer matching) would disagree with byte-keyed
//! bookkeeping (delegation lookups).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Textual prefix of every address.
pub const ADDRESS_PREFIX: &str = "0x";

/// Payload length of a key-derived account address.
pub const SHORT_ADDRESS_LEN: usize = 20;

/// Payload length of a module- or contract-derived account address.
pub const LONG_ADDRESS_LEN: usize = 32;

/// A validated account address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(Vec<u8>);

impl Address {
    /// Parse an address from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAddress`] if the prefix is missing, the
    /// body is not lowercase hex, or the payload length is not 20 or 32.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let body = input
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        if body.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(invalid("hex must be lowercase"));
        }
        let bytes = hex::decode(body).map_err(|e| invalid(&e.to_string()))?;
        Self::from_bytes(&bytes).map_err(|_| invalid("payload must be 20 or 32 bytes"))
    }

    /// Build an address from raw payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAddress`] if the payload length is not
    /// 20 or 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        match bytes.len() {
            SHORT_ADDRESS_LEN | LONG_ADDRESS_LEN => Ok(Self(bytes.to_vec())),
            n => Err(CoreError::InvalidAddress {
                input: hex::encode(bytes),
                reason: format!("payload must be 20 or 32 bytes, got {n}"),
            }),
        }
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse every string that is a valid address, silently skipping the rest.
    pub fn parse_lossy<S: AsRef<str>>(inputs: &[S]) -> Vec<Address> {
        inputs
            .iter()
            .filter_map(|s| Address::parse(s.as_ref()).ok())
            .collect()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ADDRESS_PREFIX}{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}
