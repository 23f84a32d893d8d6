use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{CollectionRequest, CreateCollectionRequest, UpdateCollectionRequest};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::services::collection_requests;

/// GET /collection_requests - requests visible to the caller's role
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<CollectionRequest>> {
    let requests = collection_requests::list(state.store(), &user).await?;
    Ok(ApiResponse::success(requests))
}

/// POST /collection_requests - household books a pickup on a collection date
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> ApiResult<CollectionRequest> {
    let Json(input) = payload?;
    let request = collection_requests::create(state.store(), &user, input).await?;
    Ok(ApiResponse::created(request))
}

/// GET /collection_requests/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<CollectionRequest> {
    let Path(id) = id?;
    let request = collection_requests::get(state.store(), &user, id).await?;
    Ok(ApiResponse::success(request))
}

/// PATCH /collection_requests/:id - owning household changes the status
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCollectionRequest>, JsonRejection>,
) -> ApiResult<CollectionRequest> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let request = collection_requests::update_status(state.store(), &user, id, input).await?;
    Ok(ApiResponse::success(request))
}

/// DELETE /collection_requests/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Message> {
    let Path(id) = id?;
    collection_requests::delete(state.store(), &user, id).await?;
    Ok(ApiResponse::success(Message::new("Collection request deleted successfully.")))
}
