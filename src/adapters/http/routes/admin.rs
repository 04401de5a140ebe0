use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, json_body::JsonBody},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

// Missing fields deserialize as empty and are rejected by the use case,
// so the caller sees the usual `{success, code, message}` body.
#[derive(Deserialize)]
struct AdminCredentialsPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

/// POST /register
async fn register(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<AdminCredentialsPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .admin_use_cases
        .register(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            success: true,
            message: "Admin registered successfully",
        }),
    ))
}

/// POST /login
async fn login(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<AdminCredentialsPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .admin_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Login successful",
    }))
}
