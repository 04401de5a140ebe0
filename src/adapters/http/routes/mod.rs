pub mod admin;
pub mod api_key;
pub mod user;

use axum::Router;

use crate::adapters::http::app_state::AppState;

/// The operator gate is attached per module, so the state is needed here.
pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api", api_key::router(app_state.clone()))
        .merge(admin::router())
        .merge(user::router(app_state))
}
