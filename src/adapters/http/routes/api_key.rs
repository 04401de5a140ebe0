use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    adapters::http::{
        app_state::AppState,
        credentials::{CredentialBody, extract_api_key},
        middleware::require_operator_token,
    },
    app_error::{AppError, AppResult},
    application::use_cases::api_key::KeyValidation,
    domain::entities::api_key::ApiKey,
};

/// Key endpoints, mounted under `/api`.
pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        // Debug enumeration and revocation sit behind the operator gate.
        .route("/keys", get(list_keys))
        .route("/revoke-key", post(revoke_key))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            require_operator_token,
        ))
        .route("/generate-key", post(generate_key))
        .route("/validate-key", post(validate_key))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateKeyResponse {
    success: bool,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateKeyResponse {
    success: bool,
    valid: bool,
    api_key: String,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ListKeysResponse {
    success: bool,
    keys: Vec<ApiKey>,
}

#[derive(Serialize)]
struct RevokeKeyResponse {
    success: bool,
    revoked: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/generate-key
async fn generate_key(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let key = app_state.api_key_use_cases.issue(None).await?;

    Ok(Json(GenerateKeyResponse {
        success: true,
        api_key: key.value,
    }))
}

/// POST /api/validate-key
/// Key from `Authorization: Bearer`, `x-api-key`, or body `apiKey`, in that order.
async fn validate_key(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let candidate = extract_api_key(&headers, &CredentialBody::from_bytes(&body))?;

    match app_state.api_key_use_cases.validate(&candidate).await? {
        KeyValidation::Valid(key) => Ok(Json(ValidateKeyResponse {
            success: true,
            valid: true,
            api_key: key.value,
            created_at: key.created_at,
        })),
        KeyValidation::Invalid => Err(AppError::InvalidApiKey),
    }
}

/// GET /api/keys
async fn list_keys(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let keys = app_state.api_key_use_cases.list().await?;

    Ok(Json(ListKeysResponse {
        success: true,
        keys,
    }))
}

/// POST /api/revoke-key
async fn revoke_key(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let target = extract_api_key(&headers, &CredentialBody::from_bytes(&body))?;
    app_state.api_key_use_cases.revoke(&target).await?;

    Ok(Json(RevokeKeyResponse {
        success: true,
        revoked: true,
    }))
}
