use crate::database::error::DatabaseError;
use crate::database::TableNames;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

/// Repository for the flat `option_name` / `option_value` table
#[derive(Clone)]
pub struct OptionRepository {
    pool: PgPool,
    table: String,
}

impl OptionRepository {
    pub fn new(pool: PgPool, tables: &TableNames) -> Self {
        Self {
            pool,
            table: tables.options.clone(),
        }
    }

    /// Read several options in one round trip. A NULL value reads as the
    /// empty string.
    pub async fn get_options(&self, keys: &[&str]) -> Result<HashMap<String, String>, DatabaseError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT option_name, option_value FROM {} WHERE option_name = ANY($1)",
            self.table
        );
        let names: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();

        let rows = sqlx::query_as::<_, (String, Option<String>)>(&sql)
            .bind(names)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(name, value)| (name, value.unwrap_or_default()))
            .collect())
    }

    /// Insert or overwrite one option inside an open transaction
    pub async fn upsert_in_tx(
        &self,
        conn: &mut PgConnection,
        key: &str,
        value: &str,
    ) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (option_name, option_value) VALUES ($1, $2) \
             ON CONFLICT (option_name) DO UPDATE SET option_value = EXCLUDED.option_value",
            self.table
        );

        sqlx::query(&sql)
            .bind(key)
            .bind(value)
            .execute(conn)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(())
    }
}
