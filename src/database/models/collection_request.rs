use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Lifecycle of a collection request. Backed by the `request_status` enum type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "completed" => Ok(RequestStatus::Completed),
            other => Err(format!("invalid status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CollectionRequest {
    pub id: i64,
    pub household_id: i64,
    pub collection_date_id: i64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /collection_requests body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    pub collection_date_id: i64,
    /// Accepted for compatibility but never trusted; the owner is always the caller.
    #[serde(default)]
    pub household_id: Option<Value>,
}

/// PATCH /collection_requests/:id body. `status` is kept loosely typed so that
/// any unexpected value is reported as an invalid status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollectionRequest {
    #[serde(default)]
    pub status: Option<Value>,
}

impl UpdateCollectionRequest {
    pub fn parsed_status(&self) -> Option<RequestStatus> {
        self.status.as_ref()?.as_str()?.parse().ok()
    }
}

/// Insert payload handed to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollectionRequest {
    pub household_id: i64,
    pub collection_date_id: i64,
}
