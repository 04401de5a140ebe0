use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use strum::{Display, EnumString};
use subtle::ConstantTimeEq;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::admin::PasswordHasher,
};

/// How admin passwords are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PasswordScheme {
    Argon2,
    /// Raw passwords, compared as-is. Only for rows written by older
    /// deployments that never hashed them.
    Plaintext,
}

impl PasswordScheme {
    pub fn hasher(self) -> Arc<dyn PasswordHasher> {
        match self {
            PasswordScheme::Argon2 => Arc::new(Argon2Hasher),
            PasswordScheme::Plaintext => Arc::new(PlaintextPasswords),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPasswords;

impl PasswordHasher for PlaintextPasswords {
    fn hash(&self, password: &str) -> AppResult<String> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password.as_bytes().ct_eq(stored.as_bytes()).into()
    }
}
