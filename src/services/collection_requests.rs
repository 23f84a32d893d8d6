use crate::auth::Role;
use crate::database::models::{
    CollectionRequest, CreateCollectionRequest, NewCollectionRequest, UpdateCollectionRequest,
};
use crate::database::{RequestFilter, Store};
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::identity::{caller_collector, caller_household, require_role};

const CREATE_REQUIRES_HOUSEHOLD: &str = "Household privileges required to access resources";
const MUTATE_REQUIRES_HOUSEHOLD: &str = "Household privilege required to do this action";
const NOT_FOUND: &str = "Collection request not found";

/// Which requests the caller may see
pub async fn visibility(store: &dyn Store, caller: &AuthUser) -> Result<RequestFilter, ApiError> {
    let filter = match caller.role {
        Role::Admin => RequestFilter::All,
        Role::Household => RequestFilter::Household(caller_household(store, caller).await?.id),
        Role::Collector => {
            let collector = caller_collector(store, caller).await?;
            let dates = store.collection_dates_for(collector.id).await?;
            RequestFilter::CollectionDates(dates.into_iter().map(|d| d.id).collect())
        }
    };
    Ok(filter)
}

pub async fn list(store: &dyn Store, caller: &AuthUser) -> Result<Vec<CollectionRequest>, ApiError> {
    let filter = visibility(store, caller).await?;
    Ok(store.list_requests(filter).await?)
}

/// New requests always belong to the calling household and start out pending
pub async fn create(
    store: &dyn Store,
    caller: &AuthUser,
    input: CreateCollectionRequest,
) -> Result<CollectionRequest, ApiError> {
    require_role(caller, &[Role::Household], CREATE_REQUIRES_HOUSEHOLD)?;
    let household = caller_household(store, caller).await?;

    if let Some(claimed) = &input.household_id {
        tracing::debug!(
            "Ignoring client household_id {} for household {}",
            claimed,
            household.id
        );
    }

    let request = store
        .create_request(NewCollectionRequest {
            household_id: household.id,
            collection_date_id: input.collection_date_id,
        })
        .await?;

    tracing::info!(
        "Household {} requested collection {} on date {}",
        household.id,
        request.id,
        request.collection_date_id
    );
    Ok(request)
}

/// Single-record read, scoped exactly like `list`. Records outside the
/// caller's scope are reported as missing.
pub async fn get(store: &dyn Store, caller: &AuthUser, id: i64) -> Result<CollectionRequest, ApiError> {
    let filter = visibility(store, caller).await?;
    let request = store.request(id).await?;

    if filter.matches(&request) {
        Ok(request)
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}

pub async fn update_status(
    store: &dyn Store,
    caller: &AuthUser,
    id: i64,
    input: UpdateCollectionRequest,
) -> Result<CollectionRequest, ApiError> {
    require_role(caller, &[Role::Household], MUTATE_REQUIRES_HOUSEHOLD)?;
    let status = input
        .parsed_status()
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;

    let request = owned_request(store, caller, id).await?;
    let updated = store.update_request_status(request.id, status).await?;

    tracing::info!("Collection request {} marked {}", updated.id, updated.status.as_str());
    Ok(updated)
}

pub async fn delete(store: &dyn Store, caller: &AuthUser, id: i64) -> Result<(), ApiError> {
    require_role(caller, &[Role::Household], MUTATE_REQUIRES_HOUSEHOLD)?;

    let request = owned_request(store, caller, id).await?;
    store.delete_request(request.id).await?;

    tracing::info!("Collection request {} deleted by household {}", request.id, request.household_id);
    Ok(())
}

async fn owned_request(store: &dyn Store, caller: &AuthUser, id: i64) -> Result<CollectionRequest, ApiError> {
    let household = caller_household(store, caller).await?;
    let request = store.request(id).await?;

    if request.household_id != household.id {
        tracing::warn!(
            "Household {} attempted to modify collection request {} owned by household {}",
            household.id,
            request.id,
            request.household_id
        );
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(request)
}
