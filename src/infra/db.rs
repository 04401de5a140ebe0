use secrecy::ExposeSecret;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::infra::{config::DatabaseConfig, error::InfraError};

pub async fn init_db(config: &DatabaseConfig) -> Result<PgPool, InfraError> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.password.expose_secret())
        .database(&config.name);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(InfraError::DatabaseConnection)?;

    info!(host = %config.host, database = %config.name, "Connected to database!");

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(InfraError::Migration)?;
        info!("Database migrations applied");
    }

    Ok(pool)
}
