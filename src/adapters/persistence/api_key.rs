use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::api_key::KeyStore,
    domain::entities::api_key::ApiKey,
};

pub(crate) fn row_to_api_key(row: &sqlx::postgres::PgRow) -> ApiKey {
    ApiKey {
        id: row.get("id"),
        value: row.get("key_value"),
        created_at: row.get("created_at"),
        revoked: row.get("revoked"),
        owner_id: row.get("owner_id"),
    }
}

#[async_trait]
impl KeyStore for PostgresPersistence {
    async fn insert(&self, value: &str, owner_id: Option<Uuid>) -> AppResult<ApiKey> {
        let row = sqlx::query(
            r#"
            INSERT INTO api_keys (key_value, owner_id)
            VALUES ($1, $2)
            RETURNING id, key_value, created_at, revoked, owner_id
            "#,
        )
        .bind(value)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_api_key(&row))
    }

    async fn get_by_value(&self, value: &str) -> AppResult<Option<ApiKey>> {
        let row = sqlx::query(
            r#"
            SELECT id, key_value, created_at, revoked, owner_id
            FROM api_keys
            WHERE key_value = $1
            "#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.as_ref().map(row_to_api_key))
    }

    async fn list(&self) -> AppResult<Vec<ApiKey>> {
        let rows = sqlx::query(
            r#"
            SELECT id, key_value, created_at, revoked, owner_id
            FROM api_keys
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.iter().map(row_to_api_key).collect())
    }

    async fn revoke(&self, value: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE api_keys SET revoked = TRUE WHERE key_value = $1")
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
