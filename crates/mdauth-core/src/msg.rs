//! # Requests and Request Types
//!
//! The engine never inspects a request's payload. It needs the request's
//! type identifier (to find delegation grants) and the ordered list of
//! addresses that signed it.
//!
//! ## Type Hierarchy
//!
//! Some narrow request types are covered by a grant issued for a broader
//! type. A grant for writing a scope, for example, also covers adding a
//! data-access address to that scope. [`resolve_grant_type_candidates`]
//! lists the types a grant may be stored under for a given request type.

use serde::{Deserialize, Serialize};

/// Request type identifiers.
pub mod types {
    pub const WRITE_SCOPE: &str = "/provenance.metadata.v1.MsgWriteScopeRequest";
    pub const DELETE_SCOPE: &str = "/provenance.metadata.v1.MsgDeleteScopeRequest";
    pub const ADD_SCOPE_DATA_ACCESS: &str = "/provenance.metadata.v1.MsgAddScopeDataAccessRequest";
    pub const DELETE_SCOPE_DATA_ACCESS: &str =
        "/provenance.metadata.v1.MsgDeleteScopeDataAccessRequest";
    pub const ADD_SCOPE_OWNER: &str = "/provenance.metadata.v1.MsgAddScopeOwnerRequest";
    pub const DELETE_SCOPE_OWNER: &str = "/provenance.metadata.v1.MsgDeleteScopeOwnerRequest";
    pub const UPDATE_VALUE_OWNERS: &str = "/provenance.metadata.v1.MsgUpdateValueOwnersRequest";
    pub const WRITE_SESSION: &str = "/provenance.metadata.v1.MsgWriteSessionRequest";
    pub const WRITE_RECORD: &str = "/provenance.metadata.v1.MsgWriteRecordRequest";
    pub const DELETE_RECORD: &str = "/provenance.metadata.v1.MsgDeleteRecordRequest";
    pub const WRITE_SCOPE_SPECIFICATION: &str =
        "/provenance.metadata.v1.MsgWriteScopeSpecificationRequest";
    pub const ADD_CONTRACT_SPEC_TO_SCOPE_SPEC: &str =
        "/provenance.metadata.v1.MsgAddContractSpecToScopeSpecRequest";
    pub const DELETE_CONTRACT_SPEC_FROM_SCOPE_SPEC: &str =
        "/provenance.metadata.v1.MsgDeleteContractSpecFromScopeSpecRequest";
    pub const WRITE_CONTRACT_SPECIFICATION: &str =
        "/provenance.metadata.v1.MsgWriteContractSpecificationRequest";
    pub const DELETE_CONTRACT_SPECIFICATION: &str =
        "/provenance.metadata.v1.MsgDeleteContractSpecificationRequest";
    pub const WRITE_RECORD_SPECIFICATION: &str =
        "/provenance.metadata.v1.MsgWriteRecordSpecificationRequest";
    pub const DELETE_RECORD_SPECIFICATION: &str =
        "/provenance.metadata.v1.MsgDeleteRecordSpecificationRequest";
}

/// The parent type whose grants also cover `type_url`, if any.
pub fn parent_grant_type(type_url: &str) -> Option<&'static str> {
    use types::*;
    match type_url {
        ADD_SCOPE_DATA_ACCESS | DELETE_SCOPE_DATA_ACCESS | ADD_SCOPE_OWNER | DELETE_SCOPE_OWNER => {
            Some(WRITE_SCOPE)
        }
        WRITE_RECORD => Some(WRITE_SESSION),
        ADD_CONTRACT_SPEC_TO_SCOPE_SPEC | DELETE_CONTRACT_SPEC_FROM_SCOPE_SPEC => {
            Some(WRITE_SCOPE_SPECIFICATION)
        }
        WRITE_RECORD_SPECIFICATION => Some(WRITE_CONTRACT_SPECIFICATION),
        DELETE_RECORD_SPECIFICATION => Some(DELETE_CONTRACT_SPECIFICATION),
        _ => None,
    }
}

/// Every type a usable grant for `type_url` may be stored under: the type
/// itself (if non-empty), followed by its parent type (if any).
pub fn resolve_grant_type_candidates(type_url: &str) -> Vec<String> {
    let mut candidates = Vec::with_capacity(2);
    if !type_url.is_empty() {
        candidates.push(type_url.to_string());
    }
    if let Some(parent) = parent_grant_type(type_url) {
        candidates.push(parent.to_string());
    }
    candidates
}

/// A signed request as seen by the authorization engine.
pub trait AuthzMsg {
    /// The request's type identifier.
    fn type_url(&self) -> &str;

    /// The addresses that signed the request, in signing order.
    ///
    /// Signature verification has already happened upstream.
    fn signers(&self) -> &[String];
}

/// A plain request carrying only what the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMsg {
    /// Request type identifier.
    #[serde(alias = "type")]
    pub type_url: String,
    /// Signer address strings, in signing order.
    #[serde(default)]
    pub signers: Vec<String>,
}

impl SignedMsg {
    /// Build a request of `type_url` signed by `signers`.
    pub fn new<S: Into<String>>(
        type_url: impl Into<String>,
        signers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            type_url: type_url.into(),
            signers: signers.into_iter().map(Into::into).collect(),
        }
    }
}

impl AuthzMsg for SignedMsg {
    fn type_url(&self) -> &str {
        &self.type_url
    }

    fn signers(&self) -> &[String] {
        &self.signers
    }
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;

    #[test]
    fn test_candidates_for_unrelated_type() {
        assert_eq!(resolve_grant_type_candidates(WRITE_SCOPE), vec![WRITE_SCOPE]);
        assert_eq!(resolve_grant_type_candidates("/some.Other"), vec!["/some.Other"]);
    }

    #[test]
    fn test_candidates_for_empty_type() {
        assert!(resolve_grant_type_candidates("").is_empty());
    }

    #[test]
    fn test_scope_children_use_write_scope() {
        for child in [
            ADD_SCOPE_DATA_ACCESS,
            DELETE_SCOPE_DATA_ACCESS,
            ADD_SCOPE_OWNER,
            DELETE_SCOPE_OWNER,
        ] {
            assert_eq!(resolve_grant_type_candidates(child), vec![child, WRITE_SCOPE]);
        }
    }

    #[test]
    fn test_other_hierarchy_entries() {
        assert_eq!(
            resolve_grant_type_candidates(WRITE_RECORD),
            vec![WRITE_RECORD, WRITE_SESSION]
        );
        assert_eq!(
            resolve_grant_type_candidates(ADD_CONTRACT_SPEC_TO_SCOPE_SPEC),
            vec![ADD_CONTRACT_SPEC_TO_SCOPE_SPEC, WRITE_SCOPE_SPECIFICATION]
        );
        assert_eq!(
            resolve_grant_type_candidates(DELETE_CONTRACT_SPEC_FROM_SCOPE_SPEC),
            vec![DELETE_CONTRACT_SPEC_FROM_SCOPE_SPEC, WRITE_SCOPE_SPECIFICATION]
        );
        assert_eq!(
            resolve_grant_type_candidates(WRITE_RECORD_SPECIFICATION),
            vec![WRITE_RECORD_SPECIFICATION, WRITE_CONTRACT_SPECIFICATION]
        );
        assert_eq!(
            resolve_grant_type_candidates(DELETE_RECORD_SPECIFICATION),
            vec![DELETE_RECORD_SPECIFICATION, DELETE_CONTRACT_SPECIFICATION]
        );
    }

    #[test]
    fn test_signed_msg_accessors() {
        let msg = SignedMsg::new(WRITE_SCOPE, ["a", "b"]);
        assert_eq!(msg.type_url(), WRITE_SCOPE);
        assert_eq!(msg.signers().to_vec(), vec!["a", "b"]);
    }
}
