#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use waste_collection_api::app::{app, AppState};
use waste_collection_api::auth::{generate_jwt, Claims, Role};
use waste_collection_api::config::{AppConfig, StoreKind, DEVELOPMENT_JWT_SECRET};
use waste_collection_api::database::models::NewHousehold;
use waste_collection_api::database::{MemoryStore, Store};

/// In-process server backed by a freshly seeded memory store:
///
/// - collector user 100 owns `date_one` and `date_two`
/// - collector user 200 owns `date_three`
/// - household users 1 and 2 have profiles
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub household_a_id: i64,
    pub household_b_id: i64,
    pub date_one: i64,
    pub date_two: i64,
    pub date_three: i64,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let store = MemoryStore::new();
        let collector_one = store.add_collector(100).await?;
        let collector_two = store.add_collector(200).await?;
        let date_one = store.add_collection_date(collector_one.id, day(4)).await?;
        let date_two = store.add_collection_date(collector_one.id, day(11)).await?;
        let date_three = store.add_collection_date(collector_two.id, day(5)).await?;
        let household_a = store.create_household(NewHousehold { user_id: 1 }).await?;
        let household_b = store.create_household(NewHousehold { user_id: 2 }).await?;

        let mut config = AppConfig::development();
        config.api.store = StoreKind::Memory;
        config.api.enable_request_logging = false;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        let router = app(AppState::new(store, config));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
            household_a_id: household_a.id,
            household_b_id: household_b.id,
            date_one: date_one.id,
            date_two: date_two.id,
            date_three: date_three.id,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    pub fn patch(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.patch(self.url(path)).bearer_auth(token)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }
}

pub fn token(subject: i64, role: Role) -> String {
    raw_token(&subject.to_string(), role.as_str())
}

/// Token with arbitrary claim strings, for exercising rejection paths
pub fn raw_token(sub: &str, role: &str) -> String {
    let mut claims = Claims::new(0, Role::Admin, 1).expect("build test claims");
    claims.sub = sub.to_string();
    claims.role = role.to_string();
    generate_jwt(&claims, DEVELOPMENT_JWT_SECRET).expect("sign test token")
}

pub fn admin() -> String {
    token(999, Role::Admin)
}

pub fn household_a() -> String {
    token(1, Role::Household)
}

pub fn household_b() -> String {
    token(2, Role::Household)
}

pub fn collector_one() -> String {
    token(100, Role::Collector)
}

pub fn collector_two() -> String {
    token(200, Role::Collector)
}

/// Status plus decoded body
pub async fn send(request: RequestBuilder) -> Result<(StatusCode, Value)> {
    let resp = request.send().await?;
    let status = resp.status();
    let body = resp.json::<Value>().await?;
    Ok((status, body))
}

pub fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).expect("valid test date")
}
