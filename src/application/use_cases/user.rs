use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    app_error::AppResult,
    application::{
        use_cases::api_key::{KeyGenerator, with_fresh_key},
        validators::{normalize_email, require_name},
    },
    domain::entities::{
        api_key::ApiKey,
        user::{User, UserWithKey},
    },
};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Creates the key and the user that owns it in one atomic step.
    /// Nothing is persisted when either insert fails.
    async fn create_with_key(&self, user: &NewUser, key_value: &str) -> AppResult<(User, ApiKey)>;

    async fn list_with_keys(&self) -> AppResult<Vec<UserWithKey>>;
}

#[derive(Clone)]
pub struct UserUseCases {
    repo: Arc<dyn UserRepo>,
    generator: Arc<dyn KeyGenerator>,
    issue_attempts: u32,
}

impl UserUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        generator: Arc<dyn KeyGenerator>,
        issue_attempts: u32,
    ) -> Self {
        Self {
            repo,
            generator,
            issue_attempts,
        }
    }

    #[instrument(skip(self))]
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> AppResult<(User, ApiKey)> {
        let new_user = NewUser {
            first_name: require_name(first_name, "first_name")?,
            last_name: require_name(last_name, "last_name")?,
            email: normalize_email(email)?,
        };

        let repo = self.repo.clone();
        let (user, key) = with_fresh_key(self.generator.as_ref(), self.issue_attempts, |value| {
            let repo = repo.clone();
            let new_user = new_user.clone();
            async move { repo.create_with_key(&new_user, &value).await }
        })
        .await?;

        tracing::info!(user_id = %user.id, key_id = %key.id, "User registered");
        Ok((user, key))
    }

    pub async fn dashboard(&self) -> AppResult<Vec<UserWithKey>> {
        self.repo.list_with_keys().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_error::{AppError, DuplicateField};
    use crate::application::use_cases::api_key::{ApiKeyUseCases, KeyValidation};
    use crate::infra::key_generator::RandomKeyGenerator;
    use crate::test_utils::{InMemoryPersistence, ScriptedKeyGenerator};

    fn use_cases(store: Arc<InMemoryPersistence>) -> UserUseCases {
        UserUseCases::new(store, Arc::new(RandomKeyGenerator), 3)
    }

    #[tokio::test]
    async fn register_links_a_valid_key_to_the_user() {
        let store = Arc::new(InMemoryPersistence::new());
        let uc = use_cases(store.clone());

        let (user, key) = uc.register("Ada", "Lovelace", "Ada@Example.com").await.unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.api_key_id, key.id);
        assert_eq!(key.owner_id, Some(user.id));

        let keys = ApiKeyUseCases::new(store, Arc::new(RandomKeyGenerator), 3);
        let KeyValidation::Valid(found) = keys.validate(&key.value).await.unwrap() else {
            panic!("expected a valid key");
        };
        assert_eq!(found.owner_id, Some(user.id));
    }

    #[tokio::test]
    async fn duplicate_email_leaves_no_orphan_key() {
        let store = Arc::new(InMemoryPersistence::new());
        let uc = use_cases(store.clone());

        uc.register("Ada", "Lovelace", "ada@example.com").await.unwrap();
        let result = uc.register("Other", "Person", "ADA@example.com").await;

        assert!(matches!(
            result,
            Err(AppError::Duplicate(DuplicateField::Email))
        ));
        assert_eq!(store.key_count(), 1);
        assert_eq!(uc.dashboard().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_retries_key_collision() {
        let store = Arc::new(InMemoryPersistence::new());
        let taken = format!("sk_{}", "4".repeat(64));
        let fresh = format!("sk_{}", "5".repeat(64));
        store.seed_key(&taken, false, None);

        let generator = Arc::new(ScriptedKeyGenerator::new([taken, fresh.clone()]));
        let uc = UserUseCases::new(store, generator, 3);

        let (_, key) = uc.register("Ada", "Lovelace", "ada@example.com").await.unwrap();
        assert_eq!(key.value, fresh);
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let uc = use_cases(Arc::new(InMemoryPersistence::new()));

        assert!(matches!(
            uc.register("", "Lovelace", "ada@example.com").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            uc.register("Ada", "Lovelace", "not-an-email").await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn dashboard_joins_users_with_their_keys() {
        let store = Arc::new(InMemoryPersistence::new());
        let uc = use_cases(store);

        let (user, key) = uc.register("Ada", "Lovelace", "ada@example.com").await.unwrap();

        let rows = uc.dashboard().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, user.id);
        assert_eq!(rows[0].api_key, key.value);
        assert!(!rows[0].revoked);
    }
}
