//! # mdauth-cli: Scenario Runner
//!
//! Loads a scenario file describing accounts, delegation grants, one signed
//! request and one check, runs the check through the authorization engine,
//! and reports the outcome.
//!
//! ## Subcommands
//!
//! - `check`: run one scenario file (YAML or JSON)
//!
//! ## Exit codes
//!
//! - `0`: the signers are authorized; bindings are printed as JSON
//! - `1`: resolution failed; the error is printed
//! - `2`: the scenario could not be loaded or is malformed

pub mod check;
pub mod scenario;
