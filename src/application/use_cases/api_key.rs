use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult, DuplicateField};
use crate::domain::entities::api_key::ApiKey;

// ============================================================================
// Ports
// ============================================================================

/// Storage for issued keys. Implemented by every persistence backend.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Persists a new active key. A value collision must surface as
    /// `AppError::Duplicate(DuplicateField::ApiKey)`.
    async fn insert(&self, value: &str, owner_id: Option<Uuid>) -> AppResult<ApiKey>;

    async fn get_by_value(&self, value: &str) -> AppResult<Option<ApiKey>>;

    /// All keys, newest first.
    async fn list(&self) -> AppResult<Vec<ApiKey>>;

    /// Marks the key revoked. Returns false if no such key exists.
    async fn revoke(&self, value: &str) -> AppResult<bool>;
}

pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidation {
    Valid(ApiKey),
    /// Unknown and revoked keys are deliberately indistinguishable here.
    Invalid,
}

impl KeyValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, KeyValidation::Valid(_))
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ApiKeyUseCases {
    store: Arc<dyn KeyStore>,
    generator: Arc<dyn KeyGenerator>,
    issue_attempts: u32,
}

impl ApiKeyUseCases {
    pub fn new(
        store: Arc<dyn KeyStore>,
        generator: Arc<dyn KeyGenerator>,
        issue_attempts: u32,
    ) -> Self {
        Self {
            store,
            generator,
            issue_attempts: issue_attempts.max(1),
        }
    }

    /// Issue a fresh active key, optionally linked to an owner.
    #[instrument(skip(self))]
    pub async fn issue(&self, owner_id: Option<Uuid>) -> AppResult<ApiKey> {
        let store = self.store.clone();
        let key = with_fresh_key(self.generator.as_ref(), self.issue_attempts, |value| {
            let store = store.clone();
            async move { store.insert(&value, owner_id).await }
        })
        .await?;

        tracing::info!(key_id = %key.id, owner_id = ?owner_id, "API key issued");
        Ok(key)
    }

    /// Judge a candidate token. Only storage failures are errors.
    #[instrument(skip_all)]
    pub async fn validate(&self, candidate: &str) -> AppResult<KeyValidation> {
        let Some(key) = self.store.get_by_value(candidate).await? else {
            tracing::debug!("API key rejected: unknown");
            return Ok(KeyValidation::Invalid);
        };

        if !key.is_active() {
            tracing::debug!(key_id = %key.id, "API key rejected: revoked");
            return Ok(KeyValidation::Invalid);
        }

        Ok(KeyValidation::Valid(key))
    }

    pub async fn list(&self) -> AppResult<Vec<ApiKey>> {
        self.store.list().await
    }

    /// Revoke a key. Revoking twice is harmless; unknown keys are `NotFound`.
    #[instrument(skip_all)]
    pub async fn revoke(&self, value: &str) -> AppResult<()> {
        if !self.store.revoke(value).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("API key revoked");
        Ok(())
    }
}

/// Runs `attempt` with freshly generated key values until it stops failing
/// with a key collision, at most `attempts` times.
pub(crate) async fn with_fresh_key<T, F, Fut>(
    generator: &dyn KeyGenerator,
    attempts: u32,
    mut attempt: F,
) -> AppResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let attempts = attempts.max(1);
    let mut tried = 0;
    loop {
        tried += 1;
        match attempt(generator.generate()).await {
            Err(AppError::Duplicate(DuplicateField::ApiKey)) if tried < attempts => {
                tracing::warn!(attempt = tried, "Generated API key collided, retrying");
            }
            other => return other,
        }
    }
}
