//! # Resolution Errors
//!
//! Two classes of failure leave the engine:
//!
//! - **Resolution failures**: the request's signers do not satisfy its
//!   requirements. Each variant renders a precise, address-bearing message.
//! - **Registry failures**: a delegation mutation failed. These are wrapped
//!   in [`AuthzError::Registry`] without alteration and abort the pass.

use thiserror::Error;

use mdauth_core::{plural_ending, pluralize, PartyType};
use mdauth_registry::{Access, RegistryError};

/// Why a request's signers are not authorized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Required parties neither signed nor delegated. Entries read `addr (ROLE)`.
    #[error("missing required signature{}: {}", plural_ending(.0.len()), .0.join(", "))]
    MissingRequiredSignatures(Vec<String>),

    /// Required addresses neither signed nor delegated.
    #[error("missing signature{}: {}", plural_ending(.0.len()), .0.join(", "))]
    MissingSignatures(Vec<String>),

    /// Required roles lack a signing party. Carries the per-role summary.
    #[error("missing signers for roles required by spec: {0}")]
    MissingRoleSigners(String),

    /// Required roles are absent from the declared parties.
    #[error("missing roles required by spec: {0}")]
    MissingRoles(String),

    /// Required parties are absent from the declared parties.
    #[error("missing {}: {}", pluralize(.0.len(), "party", "parties"), .0.join(", "))]
    MissingParties(Vec<String>),

    /// An automated account is declared in a role other than the reserved one.
    #[error("account {address:?} is a smart contract but does not have the {role} role")]
    SmartContractWithoutRole {
        /// Party address.
        address: String,
        /// The reserved role it should have.
        role: PartyType,
    },

    /// A non-automated account is declared in the reserved role.
    #[error("account {address:?} has role {role} but is not a smart contract")]
    RoleWithoutSmartContract {
        /// Party address.
        address: String,
        /// The reserved role.
        role: PartyType,
    },

    #[error("smart contract signer {0} cannot follow non-smart-contract signer")]
    SmartContractFollowsNonContract(String),

    #[error("smart contract signer {0} cannot be the last signer")]
    SmartContractLastSigner(String),

    #[error("smart contract signer {0} is not authorized")]
    SmartContractNotAuthorized(String),

    /// No signer holds the permission an asset account requires for a
    /// value-owner change.
    #[error(
        "missing signature for {address} ({denom}) with authority to {} it as scope value owner",
        transfer_action(.permission)
    )]
    MissingAssetPermission {
        /// Asset account address.
        address: String,
        /// Asset denomination.
        denom: String,
        /// Permission that was required.
        permission: Access,
    },

    /// The existing value owner neither signed nor delegated.
    #[error("missing signature from existing value owner {0}")]
    MissingValueOwnerSignature(String),

    /// Consuming the existing value owner's grant failed.
    #[error("authz error with existing value owner {address:?}: {source}")]
    ValueOwnerDelegation {
        /// Existing value owner.
        address: String,
        /// Underlying registry failure.
        source: RegistryError,
    },

    /// A signer string could not be parsed where every signer must parse.
    #[error("invalid signer[{index}] {address:?}: {reason}")]
    InvalidSigner {
        /// Position in the signer list.
        index: usize,
        /// The raw signer string.
        address: String,
        /// Parse failure.
        reason: String,
    },

    /// A delegation registry mutation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn transfer_action(permission: &Access) -> &'static str {
    match permission {
        Access::Withdraw => "withdraw/remove",
        Access::Deposit => "deposit/add",
        _ => "transfer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_messages_pluralize() {
        let one = AuthzError::MissingSignatures(vec!["A".into()]);
        assert_eq!(one.to_string(), "missing signature: A");
        let two = AuthzError::MissingRequiredSignatures(vec!["A (OWNER)".into(), "B (OWNER)".into()]);
        assert_eq!(
            two.to_string(),
            "missing required signatures: A (OWNER), B (OWNER)"
        );
    }

    #[test]
    fn test_parties_message_pluralizes() {
        let one = AuthzError::MissingParties(vec!["A (OWNER)".into()]);
        assert_eq!(one.to_string(), "missing party: A (OWNER)");
        let two = AuthzError::MissingParties(vec!["A (OWNER)".into(), "B (SERVICER)".into()]);
        assert_eq!(two.to_string(), "missing parties: A (OWNER), B (SERVICER)");
    }

    #[test]
    fn test_role_binding_messages() {
        let err = AuthzError::SmartContractWithoutRole {
            address: "sc".into(),
            role: PartyType::Provenance,
        };
        assert_eq!(
            err.to_string(),
            "account \"sc\" is a smart contract but does not have the PROVENANCE role"
        );
        let err = AuthzError::RoleWithoutSmartContract {
            address: "u".into(),
            role: PartyType::Provenance,
        };
        assert_eq!(
            err.to_string(),
            "account \"u\" has role PROVENANCE but is not a smart contract"
        );
    }

    #[test]
    fn test_asset_permission_wording() {
        let withdraw = AuthzError::MissingAssetPermission {
            address: "m".into(),
            denom: "gold".into(),
            permission: Access::Withdraw,
        };
        assert_eq!(
            withdraw.to_string(),
            "missing signature for m (gold) with authority to withdraw/remove it as scope value owner"
        );
        let deposit = AuthzError::MissingAssetPermission {
            address: "m".into(),
            denom: "gold".into(),
            permission: Access::Deposit,
        };
        assert!(deposit.to_string().contains("deposit/add"));
    }

    #[test]
    fn test_registry_error_is_transparent() {
        let inner = RegistryError::Storage("disk full".into());
        let err: AuthzError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
    }
}
