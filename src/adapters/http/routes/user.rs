use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState, json_body::JsonBody, middleware::require_operator_token,
    },
    app_error::AppResult,
    domain::entities::user::UserWithKey,
};

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            require_operator_token,
        ))
        .route("/user-register", post(user_register))
}

#[derive(Deserialize)]
struct UserRegisterPayload {
    #[serde(default, alias = "firstName")]
    first_name: String,
    #[serde(default, alias = "lastName")]
    last_name: String,
    #[serde(default)]
    email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRegisterResponse {
    success: bool,
    api_key: String,
}

#[derive(Serialize)]
struct DashboardRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    api_key: String,
    created_at: DateTime<Utc>,
    revoked: bool,
}

impl From<UserWithKey> for DashboardRow {
    fn from(row: UserWithKey) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            api_key: row.api_key,
            created_at: row.created_at,
            revoked: row.revoked,
        }
    }
}

/// POST /user-register
async fn user_register(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<UserRegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let (_, key) = app_state
        .user_use_cases
        .register(&payload.first_name, &payload.last_name, &payload.email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserRegisterResponse {
            success: true,
            api_key: key.value,
        }),
    ))
}

/// GET /dashboard
async fn dashboard(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows: Vec<DashboardRow> = app_state
        .user_use_cases
        .dashboard()
        .await?
        .into_iter()
        .map(DashboardRow::from)
        .collect();

    Ok(Json(rows))
}
