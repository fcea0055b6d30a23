//! Tenant Context
//!
//! Authentication itself lives in the upstream gateway; by the time a
//! request reaches this server the gateway has verified the session and
//! injected identity headers. This module is the trust boundary: it reads
//! those headers into a [`TenantContext`] and everything below it only
//! ever sees an explicit `restaurant_id`.

mod extractor;

/// Request-scoped tenant identity
///
/// Passed explicitly into every core operation — no ambient tenant state.
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// The restaurant the caller is authorized to act on
    pub restaurant_id: String,
    /// Acting staff user (owner or staff role)
    pub user_id: String,
}

impl TenantContext {
    pub fn new(restaurant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Header carrying the verified restaurant id
pub const RESTAURANT_ID_HEADER: &str = "x-restaurant-id";
/// Header carrying the verified user id
pub const USER_ID_HEADER: &str = "x-user-id";
