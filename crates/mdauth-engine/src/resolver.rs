//! # Requirement Resolution
//!
//! The two top-level entry points for checking a request's signers.
//!
//! ## With roles
//!
//! 1. Build party records from the required and available lists.
//! 2. Bind records to direct signers, then bind unsigned required records
//!    through delegation.
//! 3. Fail if any required record is still unsigned.
//! 4. Fill required roles from signed eligible records, then through
//!    delegation. Fail if any role is still open.
//! 5. Check automated-account role binding and signer positions.
//!
//! ## Without roles
//!
//! Steps 2, 3 and the positional check, over a flat list of addresses.

use mdauth_core::{AuthzMsg, PartyRequirement, PartyType};
use mdauth_registry::{AccountRegistry, DelegationRegistry};

use crate::authorizer::Authorizer;
use crate::cache::RequestContext;
use crate::error::AuthzError;
use crate::party::{build_party_records, find_unsigned_required, PartyRecord};
use crate::roles::{associate_required_roles, missing_roles_summary};
use crate::signers::{associate_signers, SignerSet};
use crate::used::UsedAddressSet;

impl<A: AccountRegistry, D: DelegationRegistry> Authorizer<A, D> {
    /// Check that every required party signed or delegated, that every
    /// required role is filled by a signing party, and that automated
    /// accounts follow their rules.
    ///
    /// Available parties are the ones that may fill roles. A party listed
    /// in both lists must sign unless both entries are optional.
    ///
    /// # Errors
    ///
    /// [`AuthzError::MissingRequiredSignatures`],
    /// [`AuthzError::MissingRoleSigners`], an automated-account error, or
    /// [`AuthzError::Registry`] if consuming a grant failed.
    #[tracing::instrument(
        skip_all,
        fields(msg_type = msg.type_url(), signers = msg.signers().len())
    )]
    pub fn resolve_with_roles(
        &self,
        ctx: &mut RequestContext,
        required: &[PartyRequirement],
        available: &[PartyRequirement],
        required_roles: &[PartyType],
        msg: &dyn AuthzMsg,
    ) -> Result<Vec<PartyRecord>, AuthzError> {
        let mut records = build_party_records(required, available);
        let signers = SignerSet::from_msg(msg);

        associate_signers(&mut records, &signers);
        self.associate_authorizations(ctx, find_unsigned_required(&mut records), &signers, msg)?;
        let missing: Vec<String> = find_unsigned_required(&mut records)
            .into_iter()
            .map(|r| format!("{} ({})", r.address(), r.role()))
            .collect();
        if !missing.is_empty() {
            return Err(rejected(AuthzError::MissingRequiredSignatures(missing)));
        }

        let open_roles = associate_required_roles(&mut records, required_roles);
        let roles_missing = self.associate_authorizations_for_roles(
            ctx,
            &open_roles,
            &mut records,
            &signers,
            msg,
        )?;
        if roles_missing {
            return Err(rejected(AuthzError::MissingRoleSigners(
                missing_roles_summary(&records, required_roles),
            )));
        }

        self.validate_role_binding(ctx, &records)
            .map_err(rejected)?;
        self.validate_positional_authorization(ctx, &UsedAddressSet::from_records(&records), msg)?;

        tracing::debug!(parties = records.len(), "signers authorized");
        Ok(records)
    }

    /// Check that every address in `required` signed or delegated, and that
    /// automated signers are positioned correctly.
    ///
    /// # Errors
    ///
    /// [`AuthzError::MissingSignatures`], a positional error, or
    /// [`AuthzError::Registry`] if consuming a grant failed.
    #[tracing::instrument(
        skip_all,
        fields(msg_type = msg.type_url(), signers = msg.signers().len())
    )]
    pub fn resolve_without_roles(
        &self,
        ctx: &mut RequestContext,
        required: &[String],
        msg: &dyn AuthzMsg,
    ) -> Result<Vec<PartyRecord>, AuthzError> {
        let mut records: Vec<PartyRecord> = required
            .iter()
            .map(|address| PartyRecord::required_address(address.as_str()))
            .collect();
        let signers = SignerSet::from_msg(msg);

        associate_signers(&mut records, &signers);
        let unsigned = find_unsigned_required(&mut records);
        if !unsigned.is_empty() {
            self.associate_authorizations(ctx, unsigned, &signers, msg)?;
        }
        let missing: Vec<String> = find_unsigned_required(&mut records)
            .into_iter()
            .map(|r| r.address().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(rejected(AuthzError::MissingSignatures(missing)));
        }

        self.validate_positional_authorization(ctx, &UsedAddressSet::from_records(&records), msg)?;

        tracing::debug!(parties = records.len(), "signers authorized");
        Ok(records)
    }
}

fn rejected(err: AuthzError) -> AuthzError {
    tracing::debug!(error = %err, "signers not authorized");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use mdauth_core::msg::types::{WRITE_RECORD, WRITE_SCOPE, WRITE_SESSION};
    use mdauth_core::SignedMsg;
    use mdauth_registry::{Authorization, RegistryError};

    fn bindings(records: &[PartyRecord]) -> Vec<(String, Option<String>)> {
        records
            .iter()
            .map(|r| (r.address().to_string(), r.bound_signer()))
            .collect()
    }

    #[test]
    fn test_without_roles_missing_one() {
        let env = TestEnv::new();
        let msg = SignedMsg::new(WRITE_SCOPE, ["B"]);
        let err = env
            .authorizer()
            .resolve_without_roles(&mut RequestContext::new(), &["A".into(), "B".into()], &msg)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing signature: A");
    }

    #[test]
    fn test_without_roles_missing_several() {
        let env = TestEnv::new();
        let msg = SignedMsg::new(WRITE_SCOPE, ["C"]);
        let err = env
            .authorizer()
            .resolve_without_roles(&mut RequestContext::new(), &["A".into(), "B".into()], &msg)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing signatures: A, B");
    }

    #[test]
    fn test_without_roles_signer_order_is_irrelevant() {
        let env = TestEnv::new();
        env.user(addr(1));
        env.user(addr(2));
        let authorizer = env.authorizer();
        let required = vec![s(1), s(2)];

        let forward = authorizer
            .resolve_without_roles(
                &mut RequestContext::new(),
                &required,
                &SignedMsg::new(WRITE_SCOPE, [s(1), s(2)]),
            )
            .unwrap();
        let reversed = authorizer
            .resolve_without_roles(
                &mut RequestContext::new(),
                &required,
                &SignedMsg::new(WRITE_SCOPE, [s(2), s(1)]),
            )
            .unwrap();
        assert_eq!(bindings(&forward), bindings(&reversed));
    }

    #[test]
    fn test_without_roles_uses_parent_type_delegation() {
        let env = TestEnv::new();
        env.user(addr(9));
        env.grant(addr(9), addr(1), Authorization::generic(WRITE_SESSION));
        let msg = SignedMsg::new(WRITE_RECORD, [s(9)]);
        let records = env
            .authorizer()
            .resolve_without_roles(&mut RequestContext::new(), &[s(1)], &msg)
            .unwrap();
        assert_eq!(records[0].signer_account(), Some(&addr(9)));
    }

    #[test]
    fn test_with_roles_reports_required_parties() {
        let env = TestEnv::new();
        let msg = SignedMsg::new(WRITE_SCOPE, [s(3)]);
        let err = env
            .authorizer()
            .resolve_with_roles(
                &mut RequestContext::new(),
                &[
                    PartyRequirement::required(s(1), PartyType::Owner),
                    PartyRequirement::optional(s(2), PartyType::Owner),
                ],
                &[],
                &[],
                &msg,
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("missing required signature: {} (OWNER)", s(1))
        );
    }

    #[test]
    fn test_with_roles_reports_role_counts() {
        let env = TestEnv::new();
        env.user(addr(1));
        env.user(addr(2));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1)]);
        let err = env
            .authorizer()
            .resolve_with_roles(
                &mut RequestContext::new(),
                &[],
                &[
                    PartyRequirement::optional(s(1), PartyType::Owner),
                    PartyRequirement::optional(s(2), PartyType::Servicer),
                ],
                &[PartyType::Servicer, PartyType::Owner, PartyType::Owner],
                &msg,
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing signers for roles required by spec: SERVICER need 1 have 0, OWNER need 2 have 1"
        );
    }

    #[test]
    fn test_with_roles_success_binds_direct_and_delegated() {
        let env = TestEnv::new();
        env.user(addr(1));
        env.user(addr(2));
        env.user(addr(5));
        env.grant(addr(5), addr(2), Authorization::generic(WRITE_SCOPE));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1), s(5)]);
        let records = env
            .authorizer()
            .resolve_with_roles(
                &mut RequestContext::new(),
                &[PartyRequirement::required(s(1), PartyType::Owner)],
                &[
                    PartyRequirement::optional(s(1), PartyType::Owner),
                    PartyRequirement::optional(s(2), PartyType::Servicer),
                ],
                &[PartyType::Owner, PartyType::Servicer],
                &msg,
            )
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].signer(), Some(s(1).as_str()));
        assert!(records[0].is_consumed());
        assert_eq!(records[1].signer_account(), Some(&addr(5)));
        assert!(records[1].is_consumed());
    }

    #[test]
    fn test_with_roles_contract_party_checks() {
        let env = TestEnv::new();
        env.contract(addr(1));
        env.user(addr(2));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1), s(2)]);
        let err = env
            .authorizer()
            .resolve_with_roles(
                &mut RequestContext::new(),
                &[],
                &[PartyRequirement::optional(s(1), PartyType::Owner)],
                &[PartyType::Owner],
                &msg,
            )
            .unwrap_err();
        assert!(matches!(err, AuthzError::SmartContractWithoutRole { .. }));
    }

    #[test]
    fn test_with_roles_contract_party_is_positionally_accounted_for() {
        let env = TestEnv::new();
        env.contract(addr(1));
        env.user(addr(2));
        // The contract signs last but is a bound party, so it is accounted for.
        let msg = SignedMsg::new(WRITE_SCOPE, [s(1)]);
        let records = env
            .authorizer()
            .resolve_with_roles(
                &mut RequestContext::new(),
                &[],
                &[PartyRequirement::optional(s(1), PartyType::Provenance)],
                &[PartyType::Provenance],
                &msg,
            )
            .unwrap();
        assert!(records[0].is_consumed());
    }

    #[test]
    fn test_registry_errors_abort() {
        let env = TestEnv::new();
        env.grant(addr(9), addr(1), Authorization::count(WRITE_SCOPE, 2));
        let authorizer = Authorizer::new(env.accounts.clone(), FailingSaves(env.delegations.clone()));
        let msg = SignedMsg::new(WRITE_SCOPE, [s(9)]);
        let err = authorizer
            .resolve_without_roles(&mut RequestContext::new(), &[s(1)], &msg)
            .unwrap_err();
        assert_eq!(err, AuthzError::Registry(RegistryError::Storage("save refused".into())));
    }
}
