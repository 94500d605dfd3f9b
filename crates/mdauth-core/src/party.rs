//! # Parties and Roles
//!
//! A party is an address acting in a role. Governing specifications declare
//! which parties must sign a request and which roles must be filled; the
//! engine checks those declarations against the request's signers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The role a party plays.
///
/// Discriminants match the wire enumeration. The derived `Ord` follows the
/// discriminants, which is the ordering used whenever roles are reported.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum PartyType {
    /// No role given.
    #[default]
    Unspecified = 0,
    /// Originator of the asset.
    Originator = 1,
    /// Servicer of the asset.
    Servicer = 2,
    /// Investor in the asset.
    Investor = 3,
    /// Custodian holding the asset.
    Custodian = 4,
    /// Owner of the asset.
    Owner = 5,
    /// Affiliate of the owner.
    Affiliate = 6,
    /// Omnibus account.
    Omnibus = 7,
    /// Reserved for automated (smart contract) participants.
    Provenance = 8,
    /// Controller of the asset.
    Controller = 10,
    /// Validator of the asset.
    Validator = 11,
}

impl PartyType {
    /// Every party type, in ascending numeric order.
    pub const ALL: [PartyType; 11] = [
        Self::Unspecified,
        Self::Originator,
        Self::Servicer,
        Self::Investor,
        Self::Custodian,
        Self::Owner,
        Self::Affiliate,
        Self::Omnibus,
        Self::Provenance,
        Self::Controller,
        Self::Validator,
    ];

    /// The numeric wire value.
    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// The short upper-case name, e.g. `OWNER`.
    pub fn simple_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Originator => "ORIGINATOR",
            Self::Servicer => "SERVICER",
            Self::Investor => "INVESTOR",
            Self::Custodian => "CUSTODIAN",
            Self::Owner => "OWNER",
            Self::Affiliate => "AFFILIATE",
            Self::Omnibus => "OMNIBUS",
            Self::Provenance => "PROVENANCE",
            Self::Controller => "CONTROLLER",
            Self::Validator => "VALIDATOR",
        }
    }
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_str())
    }
}

impl FromStr for PartyType {
    type Err = CoreError;

    /// Accepts `OWNER`, `owner`, or `PARTY_TYPE_OWNER`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("PARTY_TYPE_").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|role| role.simple_str() == name)
            .ok_or_else(|| CoreError::UnknownPartyType(s.to_string()))
    }
}

/// A declared party: an address, the role it plays, and whether its
/// signature is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyRequirement {
    /// Address string of the party.
    pub address: String,
    /// Role the party plays.
    pub role: PartyType,
    /// `true` if the party does not have to sign.
    #[serde(default)]
    pub optional: bool,
}

impl PartyRequirement {
    /// A party whose signature is required.
    pub fn required(address: impl Into<String>, role: PartyType) -> Self {
        Self {
            address: address.into(),
            role,
            optional: false,
        }
    }

    /// A party whose signature is optional.
    pub fn optional(address: impl Into<String>, role: PartyType) -> Self {
        Self {
            address: address.into(),
            role,
            optional: true,
        }
    }

    /// Whether this names `address` acting as `role`. Optionality is ignored.
    pub fn is_same_as(&self, address: &str, role: PartyType) -> bool {
        self.address == address && self.role == role
    }
}

impl fmt::Display for PartyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.role)
    }
}
