//! # mdauth-engine: Signer Authorization Resolution
//!
//! Decides whether the signers of one request satisfy its authorization
//! requirements, consulting an account registry and a delegation registry.
//!
//! ## Components
//!
//! - **Set difference** (`difference.rs`): comparator-driven subtraction,
//!   also behind the presence-only checks (`presence.rs`).
//!
//! - **Resolution state** (`signers.rs`, `party.rs`, `cache.rs`, `used.rs`):
//!   signer sets with lazily resolved addresses, per-party records, the
//!   request-scoped authorization cache, and the set of spent signatures.
//!
//! - **Delegation** (`delegation.rs`): finds and consumes grants. Grant
//!   decisions are pure values; the engine applies their effects to the
//!   registry.
//!
//! - **Roles** (`roles.rs`): direct and delegated role fulfillment.
//!
//! - **Automated accounts** (`contract.rs`): classification, role binding,
//!   and signer-position rules.
//!
//! - **Entry points** (`resolver.rs`, `value_owner.rs`):
//!   [`Authorizer::resolve_with_roles`], [`Authorizer::resolve_without_roles`],
//!   [`Authorizer::resolve_transfer`], and
//!   [`Authorizer::resolve_value_owners_signers`].
//!
//! ## Request Lifetime
//!
//! All mutable state of a pass lives in the [`RequestContext`] the caller
//! passes in and in the returned records. Create one context per request,
//! share it across every check on that request, and never carry it over
//! to another request.
//!
//! ## Determinism
//!
//! Direct signer bindings, per-role consumption counts, and missing-role
//! summaries do not depend on the order of the input lists.

pub mod authorizer;
pub mod cache;
pub mod config;
pub mod contract;
pub mod delegation;
pub mod difference;
pub mod error;
pub mod party;
pub mod presence;
pub mod resolver;
pub mod roles;
pub mod signers;
pub mod used;
pub mod value_owner;

#[cfg(test)]
pub(crate) mod testutil;

// ─── Engine ─────────────────────────────────────────────────────────

pub use authorizer::Authorizer;
pub use cache::{AuthorizationCache, RequestContext};
pub use config::{ConfigError, EngineConfig};
pub use error::AuthzError;

// ─── Resolution state ───────────────────────────────────────────────

pub use party::{build_party_records, find_unsigned_required, PartyRecord};
pub use signers::{associate_signers, SignerSet};
pub use used::UsedAddressSet;

// ─── Utilities ──────────────────────────────────────────────────────

pub use difference::{difference, find_missing, find_missing_parties};
pub use presence::{validate_parties_present, validate_roles_present};
pub use roles::{associate_required_roles, missing_roles_summary};
