use crate::auth::Role;
use crate::database::models::{Collector, Household};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Fail with 403 unless the caller holds one of `allowed`
pub fn require_role(caller: &AuthUser, allowed: &[Role], message: &str) -> Result<(), ApiError> {
    if allowed.contains(&caller.role) {
        Ok(())
    } else {
        tracing::debug!("Subject {} with role {} denied: {}", caller.subject, caller.role, message);
        Err(ApiError::forbidden(message))
    }
}

/// Household profile linked to the caller's subject
pub async fn caller_household(store: &dyn Store, caller: &AuthUser) -> Result<Household, ApiError> {
    store.household_by_user(caller.subject).await?.ok_or_else(|| {
        tracing::warn!("No household linked to subject {}", caller.subject);
        ApiError::forbidden("No household profile is linked to this account")
    })
}

/// Collector profile linked to the caller's subject
pub async fn caller_collector(store: &dyn Store, caller: &AuthUser) -> Result<Collector, ApiError> {
    store.collector_by_user(caller.subject).await?.ok_or_else(|| {
        tracing::warn!("No collector linked to subject {}", caller.subject);
        ApiError::forbidden("No collector profile is linked to this account")
    })
}
