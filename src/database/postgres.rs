use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    CollectionDate, CollectionRequest, Collector, Household, NewCollectionRequest, NewHousehold,
    RequestStatus,
};
use crate::database::repository::{commit_or_rollback, Repository};
use crate::database::store::{RequestFilter, Store};

const HOUSEHOLDS: &str = "households";
const COLLECTORS: &str = "collectors";
const COLLECTION_DATES: &str = "collection_dates";
const COLLECTION_REQUESTS: &str = "collection_requests";

/// `Store` backed by PostgreSQL through a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn households(&self) -> Repository<Household> {
        Repository::new(HOUSEHOLDS, "Household", self.pool.clone())
    }

    fn collectors(&self) -> Repository<Collector> {
        Repository::new(COLLECTORS, "Collector", self.pool.clone())
    }

    fn collection_dates(&self) -> Repository<CollectionDate> {
        Repository::new(COLLECTION_DATES, "Collection date", self.pool.clone())
    }

    fn requests(&self) -> Repository<CollectionRequest> {
        Repository::new(COLLECTION_REQUESTS, "Collection request", self.pool.clone())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_households(&self) -> Result<Vec<Household>, DatabaseError> {
        self.households().select_all().await
    }

    async fn create_household(&self, new: NewHousehold) -> Result<Household, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_as::<_, Household>(
            "INSERT INTO households (user_id) VALUES ($1) RETURNING *",
        )
        .bind(new.user_id)
        .fetch_one(&mut *tx)
        .await;

        commit_or_rollback(tx, result).await
    }

    async fn household(&self, id: i64) -> Result<Household, DatabaseError> {
        self.households().select_404(id).await
    }

    async fn household_by_user(&self, user_id: i64) -> Result<Option<Household>, DatabaseError> {
        self.households().select_one("user_id", user_id).await
    }

    async fn delete_household(&self, id: i64) -> Result<(), DatabaseError> {
        self.households().delete_404(id).await
    }

    async fn collector_by_user(&self, user_id: i64) -> Result<Option<Collector>, DatabaseError> {
        self.collectors().select_one("user_id", user_id).await
    }

    async fn collection_dates_for(&self, collector_id: i64) -> Result<Vec<CollectionDate>, DatabaseError> {
        self.collection_dates().select_where("collector_id", collector_id).await
    }

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<CollectionRequest>, DatabaseError> {
        let requests = self.requests();
        match filter {
            RequestFilter::All => requests.select_all().await,
            RequestFilter::Household(household_id) => requests.select_where("household_id", household_id).await,
            RequestFilter::CollectionDates(ids) => requests.select_in("collection_date_id", &ids).await,
        }
    }

    async fn create_request(&self, new: NewCollectionRequest) -> Result<CollectionRequest, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_as::<_, CollectionRequest>(
            "INSERT INTO collection_requests (household_id, collection_date_id, status) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(new.household_id)
        .bind(new.collection_date_id)
        .bind(RequestStatus::Pending)
        .fetch_one(&mut *tx)
        .await;

        commit_or_rollback(tx, result).await
    }

    async fn request(&self, id: i64) -> Result<CollectionRequest, DatabaseError> {
        self.requests().select_404(id).await
    }

    async fn update_request_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<CollectionRequest, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_as::<_, CollectionRequest>(
            "UPDATE collection_requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await;

        commit_or_rollback(tx, result)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Collection request not found".to_string()))
    }

    async fn delete_request(&self, id: i64) -> Result<(), DatabaseError> {
        self.requests().delete_404(id).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
