use std::{net::SocketAddr, path::PathBuf};

use env_helpers::get_env_default;
use secrecy::SecretString;
use strum::{Display, EnumString};

use crate::infra::password::PasswordScheme;

/// Where keys, users and admins are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    File,
    Postgres,
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub keys_file: PathBuf,
    pub database: DatabaseConfig,
    /// How many freshly generated values to try when a key collides.
    pub key_issue_attempts: u32,
    pub password_scheme: PasswordScheme,
    /// Guards key listing, revocation and the dashboard when set.
    /// SECURITY: unset leaves those endpoints open to anyone who can reach the API.
    pub operator_token: Option<SecretString>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 3000)),
        );
        let store_backend: StoreBackend = get_env_default("KEY_STORE_BACKEND", StoreBackend::File);
        let keys_file: String = get_env_default("KEYS_FILE", "keys.json".to_string());

        let database = DatabaseConfig {
            host: get_env_default("DB_HOST", "localhost".to_string()),
            port: get_env_default("DB_PORT", 5432),
            user: get_env_default("DB_USER", "postgres".to_string()),
            password: SecretString::new(get_env_default("DB_PASSWORD", String::new()).into()),
            name: get_env_default("DB_NAME", "apikey".to_string()),
            max_connections: get_env_default("DB_MAX_CONNECTIONS", 5),
            run_migrations: get_env_default("RUN_MIGRATIONS", true),
        };

        let key_issue_attempts: u32 = get_env_default("KEY_ISSUE_ATTEMPTS", 3);
        let password_scheme: PasswordScheme =
            get_env_default("ADMIN_PASSWORD_SCHEME", PasswordScheme::Argon2);

        let operator_token = std::env::var("OPERATOR_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|t| SecretString::new(t.into()));

        // An empty LOG_FILE disables the JSON file sink.
        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());
        let log_file = (!log_file.trim().is_empty()).then(|| PathBuf::from(log_file));

        Self {
            bind_addr,
            store_backend,
            keys_file: PathBuf::from(keys_file),
            database,
            key_issue_attempts,
            password_scheme,
            operator_token,
            log_file,
        }
    }
}
