//! Registry and grant errors.

use thiserror::Error;

/// A registry mutation failed.
///
/// The engine propagates these verbatim and aborts the resolution pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No grant exists under the given key.
    #[error("no grant found for grantee {grantee} from granter {granter} for {msg_type}")]
    GrantNotFound {
        /// Grantee address.
        grantee: String,
        /// Granter address.
        granter: String,
        /// Request type the grant was stored under.
        msg_type: String,
    },

    /// The backing store rejected the write.
    #[error("registry storage error: {0}")]
    Storage(String),

    /// The grant itself is not storable (e.g. already expired).
    #[error("grant rejected: {0}")]
    Rejected(String),
}

/// A grant could not evaluate a request.
///
/// The engine treats this as "grant not usable" and keeps searching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrantError {
    /// The grant does not cover the request's type.
    #[error("authorization for {granted} cannot be used for {requested}")]
    TypeMismatch {
        /// Type the grant covers.
        granted: String,
        /// Type of the request.
        requested: String,
    },
}
