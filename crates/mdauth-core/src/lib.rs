//! # mdauth-core: Foundational Types for Signer Authorization
//!
//! This crate is the leaf of the mdauth workspace. It defines the value
//! types that every other crate exchanges: account addresses, party roles,
//! party requirements, request-type identifiers, and timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Validated address newtype.** `Address` can only be built through
//!    `Address::parse()` or `Address::from_bytes()`. Its string form is
//!    canonical, so string equality and byte equality always agree.
//!
//! 2. **Single `PartyType` enum.** Numeric discriminants match the wire
//!    enumeration, and the derived ordering is the numeric ordering. Any
//!    output that iterates roles does so in that order.
//!
//! 3. **Requests are opaque.** The authorization engine only needs a request's
//!    type identifier and its signer list, expressed by the `AuthzMsg` trait.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mdauth-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod msg;
pub mod party;
pub mod plural;
pub mod temporal;

pub use address::Address;
pub use error::CoreError;
pub use msg::{resolve_grant_type_candidates, AuthzMsg, SignedMsg};
pub use party::{PartyRequirement, PartyType};
pub use plural::{plural_ending, pluralize};
pub use temporal::Timestamp;
