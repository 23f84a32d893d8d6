use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A pickup customer account, linked to one auth subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Household {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHousehold {
    pub user_id: i64,
}
