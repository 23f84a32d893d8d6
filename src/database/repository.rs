use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, Transaction};

use crate::database::manager::DatabaseError;

/// Generic single-table reads and deletes keyed by a BIGINT `id`.
/// Table and column names come from code, never from request input.
pub struct Repository<T> {
    table_name: &'static str,
    entity: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, entity: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            entity,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" ORDER BY id", self.table_name);
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE id = $1", self.table_name);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| self.not_found())
    }

    pub async fn select_where(&self, column: &'static str, value: i64) -> Result<Vec<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM \"{}\" WHERE \"{}\" = $1 ORDER BY id",
            self.table_name, column
        );
        Ok(sqlx::query_as::<_, T>(&sql).bind(value).fetch_all(&self.pool).await?)
    }

    pub async fn select_one(&self, column: &'static str, value: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE \"{}\" = $1 LIMIT 1", self.table_name, column);
        Ok(sqlx::query_as::<_, T>(&sql).bind(value).fetch_optional(&self.pool).await?)
    }

    pub async fn select_in(&self, column: &'static str, values: &[i64]) -> Result<Vec<T>, DatabaseError> {
        if values.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT * FROM \"{}\" WHERE \"{}\" = ANY($1) ORDER BY id",
            self.table_name, column
        );
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(values.to_vec())
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn delete_404(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table_name);
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await;
        let done = commit_or_rollback(tx, result).await?;

        if done.rows_affected() == 0 {
            return Err(self.not_found());
        }
        Ok(())
    }

    fn not_found(&self) -> DatabaseError {
        DatabaseError::NotFound(format!("{} not found", self.entity))
    }
}

/// Close a single-statement transaction. Failures roll back before the
/// error is surfaced as a write error.
pub async fn commit_or_rollback<T>(
    tx: Transaction<'static, Postgres>,
    result: Result<T, sqlx::Error>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(DatabaseError::from_write)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback failed: {}", rollback_err);
            }
            Err(DatabaseError::from_write(err))
        }
    }
}
