//! # Check Subcommand
//!
//! Runs a scenario's check and prints the outcome.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mdauth_core::{Address, PartyType};
use mdauth_engine::{AuthzError, Authorizer, PartyRecord, RequestContext, UsedAddressSet};

use crate::scenario::{Check, Scenario};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Scenario file (YAML, or JSON with a `.json` extension).
    pub scenario: PathBuf,

    /// Pretty-print the JSON outcome.
    #[arg(long)]
    pub pretty: bool,
}

/// A party record as reported after a successful check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<PartyType>,
    pub signer: Option<String>,
    pub fills_role: bool,
}

/// What a successful check established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Party bindings and the signatures they spent.
    Parties {
        bindings: Vec<Binding>,
        used: UsedAddressSet,
    },
    /// Signatures spent authorizing a value-owner change.
    Transfer { used: UsedAddressSet },
    /// The signers considered as transfer agents, and those spent.
    Owners {
        agents: Vec<Address>,
        used: UsedAddressSet,
    },
}

/// Load the scenario, run its check, and print the outcome.
///
/// Returns exit code 0 when authorized and 1 when resolution fails.
/// Loading failures are returned as errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let scenario = Scenario::load(&args.scenario)?;
    match evaluate(&scenario)? {
        Ok(outcome) => {
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string(&outcome)?
            };
            println!("{rendered}");
            Ok(0)
        }
        Err(err) => {
            println!("NOT AUTHORIZED: {err}");
            Ok(1)
        }
    }
}

/// Run the scenario's check against fresh registries in a single request
/// context.
///
/// The outer error is operational (bad configuration); the inner one is
/// the engine's verdict.
pub fn evaluate(scenario: &Scenario) -> Result<Result<Outcome, AuthzError>> {
    let config = scenario.engine_config()?;
    let (accounts, delegations) = scenario.registries();
    let authorizer = Authorizer::with_config(accounts, delegations, config);
    let mut ctx = RequestContext::new();
    let msg = &scenario.message;

    let verdict = match &scenario.check {
        Check::WithRoles {
            required,
            available,
            roles,
        } => authorizer
            .resolve_with_roles(&mut ctx, required, available, roles, msg)
            .map(|records| parties(&records, true)),
        Check::WithoutRoles { required } => authorizer
            .resolve_without_roles(&mut ctx, required, msg)
            .map(|records| parties(&records, false)),
        Check::ValueOwner { existing, proposed } => authorizer
            .resolve_transfer(&mut ctx, existing, proposed, &[], msg)
            .map(|used| Outcome::Transfer { used }),
        Check::ValueOwners {
            existing_owners,
            proposed,
        } => authorizer
            .resolve_value_owners_signers(&mut ctx, existing_owners, proposed, msg)
            .map(|(agents, used)| Outcome::Owners { agents, used }),
    };

    match &verdict {
        Ok(_) => tracing::info!(msg_type = %msg.type_url, "authorized"),
        Err(err) => tracing::info!(msg_type = %msg.type_url, error = %err, "not authorized"),
    }
    Ok(verdict)
}

fn parties(records: &[PartyRecord], with_roles: bool) -> Outcome {
    let bindings = records
        .iter()
        .map(|record| Binding {
            address: record.address().to_string(),
            role: with_roles.then_some(record.role()),
            signer: record.bound_signer(),
            fills_role: record.is_consumed(),
        })
        .collect();
    Outcome::Parties {
        bindings,
        used: UsedAddressSet::from_records(records),
    }
}
