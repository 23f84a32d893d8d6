use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, Claims, Role};
use crate::error::ApiError;

/// Authenticated caller extracted from the JWT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub subject: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn new(subject: i64, role: Role) -> Self {
        Self { subject, role }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let subject = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::unauthorized("Token subject must be a numeric user id"))?;
        let role = claims.role.parse::<Role>().map_err(|_| {
            tracing::warn!("Rejected token for subject {} with role '{}'", subject, claims.role);
            ApiError::forbidden("Unrecognized role")
        })?;

        Ok(Self { subject, role })
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, &state.security().jwt_secret).map_err(|e| {
        tracing::debug!("JWT rejected: {}", e);
        ApiError::unauthorized(e.to_string())
    })?;

    let auth_user = AuthUser::try_from(claims)?;
    tracing::debug!("Authenticated subject {} as {}", auth_user.subject, auth_user.role);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
