//! In-memory stand-ins for the persistence backends.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult, DuplicateField},
    application::use_cases::{
        admin::AdminRepo,
        api_key::{KeyGenerator, KeyStore},
        user::{NewUser, UserRepo},
    },
    domain::entities::{
        admin::Admin,
        api_key::ApiKey,
        user::{User, UserWithKey},
    },
    infra::key_generator::RandomKeyGenerator,
};

#[derive(Default)]
struct State {
    keys: Vec<ApiKey>,
    users: Vec<User>,
    admins: Vec<Admin>,
}

/// One in-memory store implementing every persistence trait, like the
/// real backends do.
#[derive(Default)]
pub struct InMemoryPersistence {
    state: Mutex<State>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key directly, bypassing generation.
    pub fn seed_key(&self, value: &str, revoked: bool, owner_id: Option<Uuid>) -> ApiKey {
        let key = ApiKey {
            id: Uuid::new_v4(),
            value: value.to_string(),
            created_at: Utc::now(),
            revoked,
            owner_id,
        };
        self.state.lock().unwrap().keys.push(key.clone());
        key
    }

    pub fn key_count(&self) -> usize {
        self.state.lock().unwrap().keys.len()
    }

    pub fn admin_count(&self) -> usize {
        self.state.lock().unwrap().admins.len()
    }
}

fn push_key(state: &mut State, value: &str, owner_id: Option<Uuid>) -> AppResult<ApiKey> {
    if state.keys.iter().any(|k| k.value == value) {
        return Err(AppError::Duplicate(DuplicateField::ApiKey));
    }
    let key = ApiKey {
        id: Uuid::new_v4(),
        value: value.to_string(),
        created_at: Utc::now(),
        revoked: false,
        owner_id,
    };
    state.keys.push(key.clone());
    Ok(key)
}

#[async_trait]
impl KeyStore for InMemoryPersistence {
    async fn insert(&self, value: &str, owner_id: Option<Uuid>) -> AppResult<ApiKey> {
        push_key(&mut self.state.lock().unwrap(), value, owner_id)
    }

    async fn get_by_value(&self, value: &str) -> AppResult<Option<ApiKey>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .keys
            .iter()
            .find(|k| k.value == value)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<ApiKey>> {
        Ok(self.state.lock().unwrap().keys.iter().rev().cloned().collect())
    }

    async fn revoke(&self, value: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.keys.iter_mut().find(|k| k.value == value) {
            Some(key) => {
                key.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryPersistence {
    async fn create_with_key(&self, user: &NewUser, key_value: &str) -> AppResult<(User, ApiKey)> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Duplicate(DuplicateField::Email));
        }

        let user_id = Uuid::new_v4();
        let key = push_key(&mut state, key_value, Some(user_id))?;
        let created = User {
            id: user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            api_key_id: key.id,
        };
        state.users.push(created.clone());
        Ok((created, key))
    }

    async fn list_with_keys(&self) -> AppResult<Vec<UserWithKey>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .rev()
            .filter_map(|u| {
                let key = state.keys.iter().find(|k| k.id == u.api_key_id)?;
                Some(UserWithKey {
                    id: u.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                    api_key: key.value.clone(),
                    created_at: key.created_at,
                    revoked: key.revoked,
                })
            })
            .collect())
    }
}

#[async_trait]
impl AdminRepo for InMemoryPersistence {
    async fn create(&self, email: &str, password: &str) -> AppResult<Admin> {
        let mut state = self.state.lock().unwrap();
        if state.admins.iter().any(|a| a.email == email) {
            return Err(AppError::Duplicate(DuplicateField::Email));
        }
        let admin = Admin {
            email: email.to_string(),
            password: password.to_string(),
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .admins
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }
}

/// Hands out queued values first, then random keys.
#[derive(Default)]
pub struct ScriptedKeyGenerator {
    queued: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedKeyGenerator {
    pub fn new(values: impl IntoIterator<Item = String>) -> Self {
        Self {
            queued: Mutex::new(values.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for ScriptedKeyGenerator {
    fn generate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RandomKeyGenerator.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_keys_are_visible() {
        let store = InMemoryPersistence::new();
        let key = store.seed_key("sk_seeded", true, None);

        let found = store.get_by_value("sk_seeded").await.unwrap().unwrap();
        assert_eq!(found, key);
        assert!(found.revoked);
    }

    #[test]
    fn scripted_generator_falls_back_to_random() {
        let generator = ScriptedKeyGenerator::new(["sk_first".to_string()]);
        assert_eq!(generator.generate(), "sk_first");
        assert!(generator.generate().starts_with("sk_"));
        assert_eq!(generator.calls(), 2);
    }
}
