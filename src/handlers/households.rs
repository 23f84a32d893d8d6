use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{Household, NewHousehold};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::services::households;

/// GET /households
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Household>> {
    Ok(ApiResponse::success(households::list(state.store(), &user).await?))
}

/// POST /households
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewHousehold>, JsonRejection>,
) -> ApiResult<Household> {
    let Json(input) = payload?;
    let household = households::create(state.store(), &user, input).await?;
    Ok(ApiResponse::created(household))
}

/// GET /households/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Household> {
    let Path(id) = id?;
    Ok(ApiResponse::success(households::get(state.store(), &user, id).await?))
}

/// DELETE /households/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Message> {
    let Path(id) = id?;
    households::delete(state.store(), &user, id).await?;
    Ok(ApiResponse::success(Message::new("Household deleted")))
}
