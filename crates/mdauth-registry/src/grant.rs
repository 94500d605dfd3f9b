//! # Delegation Grants
//!
//! A grant lets a grantee sign for a granter on requests of one type. It is
//! keyed by `(grantee, granter, msg_type)`.
//!
//! ## Accepting
//!
//! [`Authorization::accept`] is pure: it returns an [`AcceptResponse`]
//! describing whether the request is accepted and what must happen to the
//! stored grant (nothing, delete it, or replace it). Whoever consumes the
//! grant applies that effect through [`DelegationRegistry`].
//!
//! | Kind | Accept behaviour |
//! |------|------------------|
//! | `Generic` | always accepts, grant unchanged |
//! | `Count` (allowed ≤ 0) | rejects, grant marked for deletion |
//! | `Count` (allowed = 1) | accepts, grant deleted |
//! | `Count` (allowed > 1) | accepts, grant replaced with `allowed - 1` |

use serde::{Deserialize, Serialize};

use mdauth_core::msg::parent_grant_type;
use mdauth_core::{Address, AuthzMsg, Timestamp};

use crate::error::{GrantError, RegistryError};

/// A delegation grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Authorization {
    /// Unlimited use for one request type.
    Generic {
        /// Request type covered.
        msg_type: String,
    },
    /// A limited number of uses for one request type.
    Count {
        /// Request type covered.
        msg_type: String,
        /// Remaining uses.
        allowed: i32,
    },
}

/// Outcome of checking a grant against a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcceptResponse {
    /// The grant authorizes the request.
    pub accept: bool,
    /// The stored grant must be deleted.
    pub delete: bool,
    /// The stored grant must be replaced with this one.
    pub updated: Option<Authorization>,
}

impl AcceptResponse {
    fn accepted() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }
}

impl Authorization {
    /// A generic grant for `msg_type`.
    pub fn generic(msg_type: impl Into<String>) -> Self {
        Self::Generic {
            msg_type: msg_type.into(),
        }
    }

    /// A grant for `msg_type` usable `allowed` times.
    pub fn count(msg_type: impl Into<String>, allowed: i32) -> Self {
        Self::Count {
            msg_type: msg_type.into(),
            allowed,
        }
    }

    /// The request type this grant is stored under.
    pub fn msg_type(&self) -> &str {
        match self {
            Self::Generic { msg_type } | Self::Count { msg_type, .. } => msg_type,
        }
    }

    /// Decide whether this grant authorizes `msg`.
    ///
    /// A grant covers a request if it was issued for the request's type or
    /// for that type's parent.
    ///
    /// # Errors
    ///
    /// Returns [`GrantError::TypeMismatch`] if the grant does not cover the
    /// request's type. A count grant with no allowance left is rejected and
    /// marked for deletion rather than treated as an error.
    pub fn accept(&self, msg: &dyn AuthzMsg) -> Result<AcceptResponse, GrantError> {
        let requested = msg.type_url();
        let granted = self.msg_type();
        if granted != requested && parent_grant_type(requested) != Some(granted) {
            return Err(GrantError::TypeMismatch {
                granted: granted.to_string(),
                requested: requested.to_string(),
            });
        }

        match self {
            Self::Generic { .. } => Ok(AcceptResponse::accepted()),
            Self::Count { allowed, .. } if *allowed <= 0 => Ok(AcceptResponse {
                accept: false,
                delete: true,
                updated: None,
            }),
            Self::Count { allowed: 1, .. } => Ok(AcceptResponse {
                accept: true,
                delete: true,
                updated: None,
            }),
            Self::Count { msg_type, allowed } => Ok(AcceptResponse {
                accept: true,
                delete: false,
                updated: Some(Self::Count {
                    msg_type: msg_type.clone(),
                    allowed: allowed - 1,
                }),
            }),
        }
    }
}

/// A grant as held by a registry, with its optional expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGrant {
    /// The grant.
    pub authorization: Authorization,
    /// When the grant stops being usable.
    #[serde(default)]
    pub expiration: Option<Timestamp>,
}

/// Stores and mutates delegation grants.
pub trait DelegationRegistry: Send + Sync {
    /// The live grant from `granter` to `grantee` for `msg_type`, if any.
    ///
    /// Expired grants are not returned.
    fn find_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type: &str,
    ) -> Option<StoredGrant>;

    /// Delete the grant from `granter` to `grantee` for `msg_type`.
    fn delete_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type: &str,
    ) -> Result<(), RegistryError>;

    /// Store `authorization` from `granter` to `grantee`, under the
    /// authorization's own request type, replacing any existing grant.
    fn save_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        authorization: Authorization,
        expiration: Option<Timestamp>,
    ) -> Result<(), RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdauth_core::msg::types::{ADD_SCOPE_OWNER, WRITE_RECORD, WRITE_SCOPE};
    use mdauth_core::SignedMsg;

    fn msg(type_url: &str) -> SignedMsg {
        SignedMsg::new(type_url, Vec::<String>::new())
    }

    #[test]
    fn test_generic_always_accepts() {
        let resp = Authorization::generic(WRITE_SCOPE).accept(&msg(WRITE_SCOPE)).unwrap();
        assert_eq!(resp, AcceptResponse::accepted());
    }

    #[test]
    fn test_parent_grant_covers_child_request() {
        let resp = Authorization::generic(WRITE_SCOPE)
            .accept(&msg(ADD_SCOPE_OWNER))
            .unwrap();
        assert!(resp.accept);
    }

    #[test]
    fn test_unrelated_type_is_an_error() {
        let err = Authorization::generic(WRITE_SCOPE)
            .accept(&msg(WRITE_RECORD))
            .unwrap_err();
        assert!(matches!(err, GrantError::TypeMismatch { .. }));
    }

    #[test]
    fn test_count_last_use_deletes() {
        let resp = Authorization::count(WRITE_SCOPE, 1).accept(&msg(WRITE_SCOPE)).unwrap();
        assert!(resp.accept);
        assert!(resp.delete);
        assert!(resp.updated.is_none());
    }

    #[test]
    fn test_count_decrements() {
        let resp = Authorization::count(WRITE_SCOPE, 5).accept(&msg(WRITE_SCOPE)).unwrap();
        assert!(resp.accept);
        assert!(!resp.delete);
        assert_eq!(resp.updated, Some(Authorization::count(WRITE_SCOPE, 4)));
    }

    #[test]
    fn test_count_exhausted_rejects() {
        let resp = Authorization::count(WRITE_SCOPE, 0).accept(&msg(WRITE_SCOPE)).unwrap();
        assert!(!resp.accept);
        assert!(resp.delete);
    }

    #[test]
    fn test_count_negative_rejects_and_deletes() {
        let resp = Authorization::count(WRITE_SCOPE, -1).accept(&msg(WRITE_SCOPE)).unwrap();
        assert_eq!(
            resp,
            AcceptResponse {
                accept: false,
                delete: true,
                updated: None,
            }
        );
    }

    #[test]
    fn test_serde_tagged_form() {
        let json = serde_json::to_string(&Authorization::count(WRITE_SCOPE, 2)).unwrap();
        assert!(json.contains("\"kind\":\"count\""));
        let back: Authorization = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Authorization::count(WRITE_SCOPE, 2));
    }
}
