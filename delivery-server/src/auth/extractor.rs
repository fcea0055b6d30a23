//! Tenant Context Extractor
//!
//! Custom extractor pulling the gateway-verified identity headers into a
//! [`TenantContext`]. Handlers that take `TenantContext` as an argument
//! reject requests without tenant identity before any store access.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{RESTAURANT_ID_HEADER, TenantContext, USER_ID_HEADER};
use crate::utils::AppError;

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted on this request
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(ctx.clone());
        }

        let header = |name: &str| -> Option<String> {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let Some(restaurant_id) = header(RESTAURANT_ID_HEADER) else {
            tracing::warn!(uri = %parts.uri, "Request without tenant identity");
            return Err(AppError::Unauthorized);
        };
        let Some(user_id) = header(USER_ID_HEADER) else {
            tracing::warn!(uri = %parts.uri, "Request without user identity");
            return Err(AppError::Unauthorized);
        };

        let ctx = TenantContext::new(restaurant_id, user_id);

        // Store in extensions for potential reuse
        parts.extensions.insert(ctx.clone());

        Ok(ctx)
    }
}
