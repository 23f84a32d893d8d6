use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    CollectionDate, CollectionRequest, Collector, Household, NewCollectionRequest, NewHousehold,
    RequestStatus,
};

/// Predicate for listing collection requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFilter {
    All,
    Household(i64),
    /// Requests targeting any of these collection dates. An empty set matches nothing.
    CollectionDates(Vec<i64>),
}

impl RequestFilter {
    pub fn matches(&self, request: &CollectionRequest) -> bool {
        match self {
            RequestFilter::All => true,
            RequestFilter::Household(id) => request.household_id == *id,
            RequestFilter::CollectionDates(ids) => ids.contains(&request.collection_date_id),
        }
    }
}

/// Persistence contract used by the resources. Every mutation runs as its
/// own transaction; rejected writes come back as `DatabaseError::Conflict`
/// carrying the store's message, missing rows as `DatabaseError::NotFound`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_households(&self) -> Result<Vec<Household>, DatabaseError>;

    async fn create_household(&self, new: NewHousehold) -> Result<Household, DatabaseError>;

    async fn household(&self, id: i64) -> Result<Household, DatabaseError>;

    async fn household_by_user(&self, user_id: i64) -> Result<Option<Household>, DatabaseError>;

    /// Removes the household and, with it, every request it owns
    async fn delete_household(&self, id: i64) -> Result<(), DatabaseError>;

    async fn collector_by_user(&self, user_id: i64) -> Result<Option<Collector>, DatabaseError>;

    async fn collection_dates_for(&self, collector_id: i64) -> Result<Vec<CollectionDate>, DatabaseError>;

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<CollectionRequest>, DatabaseError>;

    async fn create_request(&self, new: NewCollectionRequest) -> Result<CollectionRequest, DatabaseError>;

    async fn request(&self, id: i64) -> Result<CollectionRequest, DatabaseError>;

    async fn update_request_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<CollectionRequest, DatabaseError>;

    async fn delete_request(&self, id: i64) -> Result<(), DatabaseError>;

    /// Connectivity probe for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;
}
