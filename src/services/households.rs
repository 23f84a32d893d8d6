use crate::auth::Role;
use crate::database::models::{Household, NewHousehold};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::identity::require_role;

const ADMIN_REQUIRED: &str = "Admin privileges required to access resources";
const NOT_FOUND: &str = "Household not found";

pub async fn list(store: &dyn Store, caller: &AuthUser) -> Result<Vec<Household>, ApiError> {
    require_role(caller, &[Role::Admin], ADMIN_REQUIRED)?;
    Ok(store.list_households().await?)
}

/// Admins may register any account; a household may only register itself.
pub async fn create(store: &dyn Store, caller: &AuthUser, input: NewHousehold) -> Result<Household, ApiError> {
    match caller.role {
        Role::Admin => {}
        Role::Household if input.user_id == caller.subject => {}
        Role::Household => {
            return Err(ApiError::forbidden("Households may only register their own account"));
        }
        Role::Collector => {
            return Err(ApiError::forbidden("Admin or household privileges required"));
        }
    }

    let household = store.create_household(input).await?;
    tracing::info!("Household {} created for user {}", household.id, household.user_id);
    Ok(household)
}

pub async fn get(store: &dyn Store, caller: &AuthUser, id: i64) -> Result<Household, ApiError> {
    require_role(caller, &[Role::Admin, Role::Household], "Admin or household privileges required")?;
    let household = store.household(id).await?;

    match caller.role {
        Role::Admin => Ok(household),
        _ if household.user_id == caller.subject => Ok(household),
        _ => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// Deleting a household also removes every collection request it owns
pub async fn delete(store: &dyn Store, caller: &AuthUser, id: i64) -> Result<(), ApiError> {
    require_role(caller, &[Role::Admin], ADMIN_REQUIRED)?;
    store.delete_household(id).await?;

    tracing::info!("Household {} deleted", id);
    Ok(())
}
