use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, api_key::row_to_api_key},
    app_error::{AppError, AppResult},
    domain::entities::{
        api_key::ApiKey,
        user::{User, UserWithKey},
    },
    use_cases::user::{NewUser, UserRepo},
};

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        api_key_id: row.get("api_key_id"),
    }
}

fn row_to_user_with_key(row: sqlx::postgres::PgRow) -> UserWithKey {
    UserWithKey {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        api_key: row.get("api_key"),
        created_at: row.get("created_at"),
        revoked: row.get("revoked"),
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create_with_key(&self, user: &NewUser, key_value: &str) -> AppResult<(User, ApiKey)> {
        let user_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let key_row = sqlx::query(
            r#"
            INSERT INTO api_keys (key_value, owner_id)
            VALUES ($1, $2)
            RETURNING id, key_value, created_at, revoked, owner_id
            "#,
        )
        .bind(key_value)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;
        let key = row_to_api_key(&key_row);

        let user_row = sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, api_key_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, api_key_id
            "#,
        )
        .bind(user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(key.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        // Dropping `tx` on any error above rolls back the key insert.
        tx.commit().await.map_err(AppError::from)?;

        Ok((row_to_user(&user_row), key))
    }

    async fn list_with_keys(&self) -> AppResult<Vec<UserWithKey>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.email,
                   k.key_value AS api_key, k.created_at, k.revoked
            FROM users u
            JOIN api_keys k ON k.id = u.api_key_id
            ORDER BY k.created_at DESC, u.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_user_with_key).collect())
    }
}
