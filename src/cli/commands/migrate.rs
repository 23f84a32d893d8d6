use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;
    let pool = DatabaseManager::connect(database)?;
    DatabaseManager::migrate(&pool).await?;

    let target = database
        .url
        .as_deref()
        .map(DatabaseManager::redacted_url)
        .unwrap_or_default();

    output_format.success("Migrations applied", json!({ "database": target }))
}
