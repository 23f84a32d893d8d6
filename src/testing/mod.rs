use chrono::NaiveDate;

use crate::auth::Role;
use crate::database::models::NewHousehold;
use crate::database::{MemoryStore, Store};
use crate::middleware::AuthUser;

/// Seeded in-memory store plus one caller per interesting identity:
///
/// - collector one (user 100) owns `date_one` and `date_two`
/// - collector two (user 200) owns `date_three`
/// - the idle collector (user 300) owns no dates
/// - households A (user 1) and B (user 2) have profiles, user 3 does not
pub struct Fixture {
    pub store: MemoryStore,
    pub admin: AuthUser,
    pub household_a: AuthUser,
    pub household_b: AuthUser,
    pub unlinked_household: AuthUser,
    pub collector_one: AuthUser,
    pub collector_two: AuthUser,
    pub idle_collector: AuthUser,
    pub household_a_id: i64,
    pub household_b_id: i64,
    pub date_one: i64,
    pub date_two: i64,
    pub date_three: i64,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryStore::new();

        let collector_one = store.add_collector(100).await.expect("seed collector one");
        let collector_two = store.add_collector(200).await.expect("seed collector two");
        store.add_collector(300).await.expect("seed idle collector");

        let date_one = store
            .add_collection_date(collector_one.id, day(4))
            .await
            .expect("seed date one");
        let date_two = store
            .add_collection_date(collector_one.id, day(11))
            .await
            .expect("seed date two");
        let date_three = store
            .add_collection_date(collector_two.id, day(5))
            .await
            .expect("seed date three");

        let household_a = store
            .create_household(NewHousehold { user_id: 1 })
            .await
            .expect("seed household A");
        let household_b = store
            .create_household(NewHousehold { user_id: 2 })
            .await
            .expect("seed household B");

        Self {
            store,
            admin: AuthUser::new(999, Role::Admin),
            household_a: AuthUser::new(1, Role::Household),
            household_b: AuthUser::new(2, Role::Household),
            unlinked_household: AuthUser::new(3, Role::Household),
            collector_one: AuthUser::new(100, Role::Collector),
            collector_two: AuthUser::new(200, Role::Collector),
            idle_collector: AuthUser::new(300, Role::Collector),
            household_a_id: household_a.id,
            household_b_id: household_b.id,
            date_one: date_one.id,
            date_two: date_two.id,
            date_three: date_three.id,
        }
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).expect("valid test date")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_seeds_distinct_identities() {
        let fx = Fixture::new().await;

        assert_ne!(fx.household_a_id, fx.household_b_id);
        assert_eq!(fx.store.list_households().await.unwrap().len(), 2);
        assert!(fx.store.household_by_user(fx.unlinked_household.subject).await.unwrap().is_none());
    }
}
