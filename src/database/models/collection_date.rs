use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled pickup slot owned by a collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CollectionDate {
    pub id: i64,
    pub collector_id: i64,
    pub scheduled_for: NaiveDate,
    pub created_at: DateTime<Utc>,
}
