//! # Request-Scoped Authorization Cache
//!
//! Consuming a delegation grant can delete or rewrite it. A second lookup
//! of the same `(grantee, granter, msg_type)` within the same request must
//! still see the grant as usable, so the first acceptance is recorded here
//! and later lookups short-circuit on it.
//!
//! The cache lives inside a [`RequestContext`], which the caller creates
//! for one request and threads through every validation call on that
//! request. Registry state may change between requests, so a context must
//! never be reused for another request without [`RequestContext::reset`].

use std::collections::HashMap;

use mdauth_core::Address;
use mdauth_registry::Authorization;

type AcceptableKey = (Address, Address, String);

/// Memo of accepted grants and automated-account classifications.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationCache {
    acceptable: HashMap<AcceptableKey, Authorization>,
    automated: HashMap<Address, bool>,
}

impl AuthorizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grant previously accepted for this key, if any.
    pub fn get_acceptable(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type: &str,
    ) -> Option<&Authorization> {
        self.acceptable
            .get(&(grantee.clone(), granter.clone(), msg_type.to_string()))
    }

    /// Record that `authorization` was accepted for this key.
    pub fn set_acceptable(
        &mut self,
        grantee: Address,
        granter: Address,
        msg_type: impl Into<String>,
        authorization: Authorization,
    ) {
        self.acceptable
            .insert((grantee, granter, msg_type.into()), authorization);
    }

    /// The memoized classification of `address`, if known.
    pub fn automated(&self, address: &Address) -> Option<bool> {
        self.automated.get(address).copied()
    }

    pub fn set_automated(&mut self, address: Address, automated: bool) {
        self.automated.insert(address, automated);
    }

    /// Number of accepted grants recorded.
    pub fn acceptable_len(&self) -> usize {
        self.acceptable.len()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.acceptable.clear();
        self.automated.clear();
    }
}

/// Per-request processing state shared by every validation call on one
/// request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cache: AuthorizationCache,
}

impl RequestContext {
    /// A context with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare this context for a new request by clearing its cache.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &AuthorizationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut AuthorizationCache {
        &mut self.cache
    }
}
