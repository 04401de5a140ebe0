use sqlx::PgPool;

use crate::app_error::{AppError, DuplicateField};

pub mod admin;
pub mod api_key;
pub mod file;
pub mod user;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }
}

/// Maps a violated unique constraint to the value that collided.
fn duplicate_field(constraint: Option<&str>) -> DuplicateField {
    match constraint {
        Some(name) if name.contains("email") => DuplicateField::Email,
        Some(name) if name.contains("key_value") => DuplicateField::ApiKey,
        _ => DuplicateField::Record,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Duplicate(duplicate_field(db_err.constraint()))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::InvalidInput("Referenced record not found".into())
            }
            _ => {
                // Log the actual error for debugging, but don't expose details
                tracing::error!(error = %err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
