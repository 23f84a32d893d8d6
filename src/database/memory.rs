use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    CollectionDate, CollectionRequest, Collector, Household, NewCollectionRequest, NewHousehold,
    RequestStatus,
};
use crate::database::store::{RequestFilter, Store};

#[derive(Default)]
struct Tables {
    households: BTreeMap<i64, Household>,
    collectors: BTreeMap<i64, Collector>,
    collection_dates: BTreeMap<i64, CollectionDate>,
    requests: BTreeMap<i64, CollectionRequest>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process `Store` with the same constraints as the SQL schema:
/// unique `user_id`s, foreign keys, cascade from households and collectors,
/// restrict on collection dates still referenced by requests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated for local runs: one collector (user 100) with two
    /// upcoming dates, and one household (user 1).
    pub async fn demo() -> Result<Self, DatabaseError> {
        let store = Self::new();
        let collector = store.add_collector(100).await?;
        let today = Utc::now().date_naive();
        for offset in [7, 14] {
            store
                .add_collection_date(collector.id, today + chrono::Duration::days(offset))
                .await?;
        }
        store.create_household(NewHousehold { user_id: 1 }).await?;
        Ok(store)
    }

    /// Collectors have no HTTP surface; this is how they enter the store
    pub async fn add_collector(&self, user_id: i64) -> Result<Collector, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.collectors.values().any(|c| c.user_id == user_id) {
            return Err(unique_violation("collectors_user_id_key"));
        }
        let collector = Collector {
            id: tables.next_id(),
            user_id,
            created_at: Utc::now(),
        };
        tables.collectors.insert(collector.id, collector.clone());
        Ok(collector)
    }

    pub async fn add_collection_date(
        &self,
        collector_id: i64,
        scheduled_for: NaiveDate,
    ) -> Result<CollectionDate, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.collectors.contains_key(&collector_id) {
            return Err(foreign_key_violation("collection_dates", "collection_dates_collector_id_fkey"));
        }
        let date = CollectionDate {
            id: tables.next_id(),
            collector_id,
            scheduled_for,
            created_at: Utc::now(),
        };
        tables.collection_dates.insert(date.id, date.clone());
        Ok(date)
    }

    /// Mirrors the RESTRICT on requests' collection date reference
    #[cfg(test)]
    pub async fn delete_collection_date(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.requests.values().any(|r| r.collection_date_id == id) {
            return Err(restrict_violation(
                "collection_dates",
                "collection_requests_collection_date_id_fkey",
            ));
        }
        tables
            .collection_dates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound("Collection date not found".to_string()))
    }

    #[cfg(test)]
    pub async fn delete_collector(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let date_ids: Vec<i64> = tables
            .collection_dates
            .values()
            .filter(|d| d.collector_id == id)
            .map(|d| d.id)
            .collect();
        if tables.requests.values().any(|r| date_ids.contains(&r.collection_date_id)) {
            return Err(restrict_violation(
                "collection_dates",
                "collection_requests_collection_date_id_fkey",
            ));
        }
        tables
            .collectors
            .remove(&id)
            .ok_or_else(|| DatabaseError::NotFound("Collector not found".to_string()))?;
        tables.collection_dates.retain(|_, d| d.collector_id != id);
        Ok(())
    }
}

fn unique_violation(constraint: &str) -> DatabaseError {
    DatabaseError::Conflict(format!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    ))
}

fn foreign_key_violation(table: &str, constraint: &str) -> DatabaseError {
    DatabaseError::Conflict(format!(
        "insert or update on table \"{}\" violates foreign key constraint \"{}\"",
        table, constraint
    ))
}

#[cfg(test)]
fn restrict_violation(table: &str, constraint: &str) -> DatabaseError {
    DatabaseError::Conflict(format!(
        "update or delete on table \"{}\" violates foreign key constraint \"{}\"",
        table, constraint
    ))
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_households(&self) -> Result<Vec<Household>, DatabaseError> {
        Ok(self.tables.read().await.households.values().cloned().collect())
    }

    async fn create_household(&self, new: NewHousehold) -> Result<Household, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.households.values().any(|h| h.user_id == new.user_id) {
            return Err(unique_violation("households_user_id_key"));
        }
        let household = Household {
            id: tables.next_id(),
            user_id: new.user_id,
            created_at: Utc::now(),
        };
        tables.households.insert(household.id, household.clone());
        Ok(household)
    }

    async fn household(&self, id: i64) -> Result<Household, DatabaseError> {
        self.tables
            .read()
            .await
            .households
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound("Household not found".to_string()))
    }

    async fn household_by_user(&self, user_id: i64) -> Result<Option<Household>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .households
            .values()
            .find(|h| h.user_id == user_id)
            .cloned())
    }

    async fn delete_household(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables
            .households
            .remove(&id)
            .ok_or_else(|| DatabaseError::NotFound("Household not found".to_string()))?;
        tables.requests.retain(|_, r| r.household_id != id);
        Ok(())
    }

    async fn collector_by_user(&self, user_id: i64) -> Result<Option<Collector>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .collectors
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn collection_dates_for(&self, collector_id: i64) -> Result<Vec<CollectionDate>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .collection_dates
            .values()
            .filter(|d| d.collector_id == collector_id)
            .cloned()
            .collect())
    }

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<CollectionRequest>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .requests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn create_request(&self, new: NewCollectionRequest) -> Result<CollectionRequest, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.households.contains_key(&new.household_id) {
            return Err(foreign_key_violation(
                "collection_requests",
                "collection_requests_household_id_fkey",
            ));
        }
        if !tables.collection_dates.contains_key(&new.collection_date_id) {
            return Err(foreign_key_violation(
                "collection_requests",
                "collection_requests_collection_date_id_fkey",
            ));
        }
        let now = Utc::now();
        let request = CollectionRequest {
            id: tables.next_id(),
            household_id: new.household_id,
            collection_date_id: new.collection_date_id,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn request(&self, id: i64) -> Result<CollectionRequest, DatabaseError> {
        self.tables
            .read()
            .await
            .requests
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound("Collection request not found".to_string()))
    }

    async fn update_request_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<CollectionRequest, DatabaseError> {
        let mut tables = self.tables.write().await;
        let request = tables
            .requests
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound("Collection request not found".to_string()))?;
        request.status = status;
        request.updated_at = Utc::now();
        Ok(request.clone())
    }

    async fn delete_request(&self, id: i64) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .requests
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound("Collection request not found".to_string()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
