use std::{fs::File, path::Path, sync::Arc};

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        http::app_state::AppState,
        persistence::{PostgresPersistence, file::FilePersistence},
    },
    application::use_cases::{
        admin::{AdminRepo, AdminUseCases},
        api_key::{ApiKeyUseCases, KeyGenerator, KeyStore},
        user::{UserRepo, UserUseCases},
    },
    infra::{
        config::{AppConfig, StoreBackend},
        db::init_db,
        error::InfraError,
        key_generator::RandomKeyGenerator,
        password::PasswordScheme,
    },
};

pub async fn init_app_state(config: AppConfig) -> Result<AppState, InfraError> {
    if config.operator_token.is_none() {
        tracing::warn!(
            "OPERATOR_TOKEN is not set; /api/keys, /api/revoke-key and /dashboard are open to every caller"
        );
    }
    if config.password_scheme == PasswordScheme::Plaintext {
        tracing::warn!("ADMIN_PASSWORD_SCHEME=plaintext stores admin passwords unhashed");
    }

    let generator: Arc<dyn KeyGenerator> = Arc::new(RandomKeyGenerator);

    match config.store_backend {
        StoreBackend::File => {
            let store = Arc::new(FilePersistence::open(&config.keys_file).await?);
            Ok(assemble_app_state(config, store, generator))
        }
        StoreBackend::Postgres => {
            let pool = init_db(&config.database).await?;
            let store = Arc::new(PostgresPersistence::new(pool));
            tracing::info!(
                host = %config.database.host,
                database = %config.database.name,
                "Using Postgres key store"
            );
            Ok(assemble_app_state(config, store, generator))
        }
    }
}

/// Wires the use cases over one store that backs every repository.
pub fn assemble_app_state<S>(
    config: AppConfig,
    store: Arc<S>,
    generator: Arc<dyn KeyGenerator>,
) -> AppState
where
    S: KeyStore + UserRepo + AdminRepo + 'static,
{
    let key_store = store.clone() as Arc<dyn KeyStore>;
    let user_repo = store.clone() as Arc<dyn UserRepo>;
    let admin_repo = store as Arc<dyn AdminRepo>;

    let api_key_use_cases =
        ApiKeyUseCases::new(key_store, generator.clone(), config.key_issue_attempts);
    let user_use_cases = UserUseCases::new(user_repo, generator, config.key_issue_attempts);
    let admin_use_cases = AdminUseCases::new(admin_repo, config.password_scheme.hasher());

    AppState {
        config: Arc::new(config),
        api_key_use_cases: Arc::new(api_key_use_cases),
        user_use_cases: Arc::new(user_use_cases),
        admin_use_cases: Arc::new(admin_use_cases),
    }
}

/// Pretty console logs, plus structured JSON into `log_file` when one is set.
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "apikey=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let json_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| InfraError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
