use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::normalize_email,
    domain::entities::admin::Admin,
};

#[async_trait]
pub trait AdminRepo: Send + Sync {
    /// Fails with `Duplicate(Email)` when the email is taken.
    async fn create(&self, email: &str, password: &str) -> AppResult<Admin>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>>;
}

/// Turns a password into what gets stored, and checks it back.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> AppResult<String>;

    fn verify(&self, password: &str, stored: &str) -> bool;
}

#[derive(Clone)]
pub struct AdminUseCases {
    repo: Arc<dyn AdminRepo>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AdminUseCases {
    pub fn new(repo: Arc<dyn AdminRepo>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> AppResult<Admin> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".into()));
        }

        let stored = self.hasher.hash(password)?;
        let admin = self.repo.create(&email, &stored).await?;

        tracing::info!(email = %admin.email, "Admin registered");
        Ok(admin)
    }

    /// Unknown email and wrong password fail the same way.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<()> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required".into(),
            ));
        }

        let email = email.trim().to_lowercase();
        let Some(admin) = self.repo.get_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &admin.password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(())
    }
}
