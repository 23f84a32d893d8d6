//! `PgStore` against a real database. Every test returns early when
//! `DATABASE_URL` is unset, so the suite still passes without Postgres.

use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use waste_collection_api::config::DatabaseConfig;
use waste_collection_api::database::models::{NewCollectionRequest, NewHousehold, RequestStatus};
use waste_collection_api::database::{DatabaseError, DatabaseManager, PgStore, RequestFilter, Store};

static NEXT_USER: AtomicI64 = AtomicI64::new(0);

/// User ids unique across test runs sharing one database
fn user_id() -> i64 {
    let base = (chrono::Utc::now().timestamp_micros() % 1_000_000_000_000) * 1_000;
    base + NEXT_USER.fetch_add(1, Ordering::SeqCst)
}

async fn connect() -> Result<Option<(PgStore, PgPool)>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return Ok(None);
    };

    let pool = DatabaseManager::connect(&DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 10,
        run_migrations: true,
    })?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some((PgStore::new(pool.clone()), pool)))
}

/// Collectors and dates have no `Store` write path; seed them directly
async fn seed_date(pool: &PgPool, day: u32) -> Result<(i64, i64)> {
    let collector_id: i64 =
        sqlx::query_scalar("INSERT INTO collectors (user_id) VALUES ($1) RETURNING id")
            .bind(user_id())
            .fetch_one(pool)
            .await?;
    let date_id: i64 = sqlx::query_scalar(
        "INSERT INTO collection_dates (collector_id, scheduled_for) VALUES ($1, $2) RETURNING id",
    )
    .bind(collector_id)
    .bind(NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date"))
    .fetch_one(pool)
    .await?;
    Ok((collector_id, date_id))
}

#[tokio::test]
async fn duplicate_household_user_is_conflict_with_store_text() -> Result<()> {
    let Some((store, _pool)) = connect().await? else { return Ok(()) };
    let user = user_id();

    let household = store.create_household(NewHousehold { user_id: user }).await?;
    assert_eq!(store.household_by_user(user).await?, Some(household.clone()));

    let err = store.create_household(NewHousehold { user_id: user }).await.unwrap_err();
    match err {
        DatabaseError::Conflict(msg) => {
            assert!(msg.contains("households_user_id_key"), "{}", msg);
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn unknown_collection_date_is_conflict() -> Result<()> {
    let Some((store, _pool)) = connect().await? else { return Ok(()) };
    let household = store.create_household(NewHousehold { user_id: user_id() }).await?;

    let err = store
        .create_request(NewCollectionRequest { household_id: household.id, collection_date_id: -1 })
        .await
        .unwrap_err();
    match err {
        DatabaseError::Conflict(msg) => assert!(msg.contains("foreign key constraint"), "{}", msg),
        other => panic!("expected conflict, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn request_filters_select_the_right_rows() -> Result<()> {
    let Some((store, pool)) = connect().await? else { return Ok(()) };
    let (collector_one, date_one) = seed_date(&pool, 4).await?;
    let (_, date_two) = seed_date(&pool, 5).await?;
    let household_a = store.create_household(NewHousehold { user_id: user_id() }).await?;
    let household_b = store.create_household(NewHousehold { user_id: user_id() }).await?;

    let a = store
        .create_request(NewCollectionRequest { household_id: household_a.id, collection_date_id: date_one })
        .await?;
    let b = store
        .create_request(NewCollectionRequest { household_id: household_b.id, collection_date_id: date_two })
        .await?;
    assert_eq!(a.status, RequestStatus::Pending);

    let all = store.list_requests(RequestFilter::All).await?;
    assert!(all.contains(&a) && all.contains(&b));

    assert_eq!(store.list_requests(RequestFilter::Household(household_a.id)).await?, vec![a.clone()]);

    let dates: Vec<i64> = store
        .collection_dates_for(collector_one)
        .await?
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(dates, vec![date_one]);
    assert_eq!(store.list_requests(RequestFilter::CollectionDates(dates)).await?, vec![a]);

    assert!(store.list_requests(RequestFilter::CollectionDates(vec![])).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn status_update_persists_and_missing_request_is_not_found() -> Result<()> {
    let Some((store, pool)) = connect().await? else { return Ok(()) };
    let (_, date) = seed_date(&pool, 6).await?;
    let household = store.create_household(NewHousehold { user_id: user_id() }).await?;
    let request = store
        .create_request(NewCollectionRequest { household_id: household.id, collection_date_id: date })
        .await?;

    let updated = store.update_request_status(request.id, RequestStatus::Completed).await?;
    assert_eq!(updated.status, RequestStatus::Completed);
    assert!(updated.updated_at >= request.updated_at);
    assert_eq!(store.request(request.id).await?.status, RequestStatus::Completed);

    assert!(matches!(
        store.update_request_status(-1, RequestStatus::Pending).await,
        Err(DatabaseError::NotFound(_))
    ));
    assert!(matches!(store.request(-1).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_household_cascades_to_requests() -> Result<()> {
    let Some((store, pool)) = connect().await? else { return Ok(()) };
    let (_, date) = seed_date(&pool, 7).await?;
    let household = store.create_household(NewHousehold { user_id: user_id() }).await?;
    let request = store
        .create_request(NewCollectionRequest { household_id: household.id, collection_date_id: date })
        .await?;

    store.delete_household(household.id).await?;

    assert!(matches!(store.household(household.id).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.request(request.id).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.delete_household(household.id).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn request_delete_reports_missing_rows() -> Result<()> {
    let Some((store, pool)) = connect().await? else { return Ok(()) };
    let (_, date) = seed_date(&pool, 8).await?;
    let household = store.create_household(NewHousehold { user_id: user_id() }).await?;
    let request = store
        .create_request(NewCollectionRequest { household_id: household.id, collection_date_id: date })
        .await?;

    store.delete_request(request.id).await?;
    assert!(matches!(store.delete_request(request.id).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn referenced_collection_date_is_restricted() -> Result<()> {
    let Some((store, pool)) = connect().await? else { return Ok(()) };
    let (collector, date) = seed_date(&pool, 9).await?;
    let household = store.create_household(NewHousehold { user_id: user_id() }).await?;
    store
        .create_request(NewCollectionRequest { household_id: household.id, collection_date_id: date })
        .await?;

    let blocked = sqlx::query("DELETE FROM collection_dates WHERE id = $1")
        .bind(date)
        .execute(&pool)
        .await;
    assert!(blocked.is_err());

    let blocked = sqlx::query("DELETE FROM collectors WHERE id = $1")
        .bind(collector)
        .execute(&pool)
        .await;
    assert!(blocked.is_err());

    store.delete_household(household.id).await?;
    sqlx::query("DELETE FROM collectors WHERE id = $1")
        .bind(collector)
        .execute(&pool)
        .await?;
    assert!(store.collection_dates_for(collector).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn ping_reaches_the_database() -> Result<()> {
    let Some((store, _pool)) = connect().await? else { return Ok(()) };
    store.ping().await?;
    Ok(())
}
