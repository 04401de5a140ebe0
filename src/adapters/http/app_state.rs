use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{admin::AdminUseCases, api_key::ApiKeyUseCases, user::UserUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api_key_use_cases: Arc<ApiKeyUseCases>,
    pub user_use_cases: Arc<UserUseCases>,
    pub admin_use_cases: Arc<AdminUseCases>,
}
