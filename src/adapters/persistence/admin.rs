use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::admin::Admin,
    use_cases::admin::AdminRepo,
};

fn row_to_admin(row: sqlx::postgres::PgRow) -> Admin {
    Admin {
        email: row.get("email"),
        password: row.get("password"),
    }
}

#[async_trait]
impl AdminRepo for PostgresPersistence {
    async fn create(&self, email: &str, password: &str) -> AppResult<Admin> {
        let row = sqlx::query(
            r#"
            INSERT INTO admin (email, password)
            VALUES ($1, $2)
            RETURNING email, password
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_admin(row))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let row = sqlx::query("SELECT email, password FROM admin WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(row_to_admin))
    }
}
