//! Builds an `AppState` backed by in-memory mocks for HTTP-level tests.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::api_key::KeyGenerator,
    infra::{
        config::{AppConfig, DatabaseConfig, StoreBackend},
        key_generator::RandomKeyGenerator,
        password::PasswordScheme,
        setup::assemble_app_state,
    },
    test_utils::InMemoryPersistence,
};

pub struct TestAppStateBuilder {
    store: Arc<InMemoryPersistence>,
    generator: Arc<dyn KeyGenerator>,
    password_scheme: PasswordScheme,
    operator_token: Option<String>,
    key_issue_attempts: u32,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryPersistence::new()),
            generator: Arc::new(RandomKeyGenerator),
            password_scheme: PasswordScheme::Argon2,
            operator_token: None,
            key_issue_attempts: 3,
        }
    }

    /// Shared handle to the backing store, for seeding and assertions.
    pub fn store(&self) -> Arc<InMemoryPersistence> {
        self.store.clone()
    }

    pub fn with_operator_token(mut self, token: &str) -> Self {
        self.operator_token = Some(token.to_string());
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn KeyGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_password_scheme(mut self, scheme: PasswordScheme) -> Self {
        self.password_scheme = scheme;
        self
    }

    pub fn with_key_issue_attempts(mut self, attempts: u32) -> Self {
        self.key_issue_attempts = attempts;
        self
    }

    pub fn build(self) -> AppState {
        let config = test_config(
            self.operator_token,
            self.password_scheme,
            self.key_issue_attempts,
        );
        assemble_app_state(config, self.store, self.generator)
    }
}

fn test_config(
    operator_token: Option<String>,
    password_scheme: PasswordScheme,
    key_issue_attempts: u32,
) -> AppConfig {
    AppConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        store_backend: StoreBackend::File,
        keys_file: PathBuf::from("keys.json"),
        database: DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: SecretString::new("test".into()),
            name: "apikey_test".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        key_issue_attempts,
        password_scheme,
        operator_token: operator_token.map(|t| SecretString::new(t.into())),
        log_file: None,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;
    use crate::test_utils::ScriptedKeyGenerator;

    #[tokio::test]
    async fn scripted_collisions_surface_through_http() {
        let taken = format!("sk_{}", "a".repeat(64));
        let builder = TestAppStateBuilder::new()
            .with_generator(Arc::new(ScriptedKeyGenerator::new(vec![taken.clone(); 2])))
            .with_key_issue_attempts(2);
        builder.store().seed_key(&taken, false, None);
        let app_state = builder.build();
        let server = TestServer::new(
            crate::adapters::http::routes::router(app_state.clone()).with_state(app_state),
        )
        .unwrap();

        let response = server.post("/api/generate-key").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!("DUPLICATE_ENTITY"));
    }
}
