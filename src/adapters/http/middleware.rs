use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

pub const OPERATOR_TOKEN_HEADER: &str = "x-operator-token";

/// Guards key listing, revocation and the dashboard.
///
/// SECURITY: without a configured `OPERATOR_TOKEN` every request passes.
/// Startup logs a warning when that is the case.
pub async fn require_operator_token(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = app_state.config.operator_token.as_ref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(OPERATOR_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let matches: bool = provided
        .as_bytes()
        .ct_eq(expected.expose_secret().as_bytes())
        .into();
    if !matches {
        tracing::warn!(path = %request.uri().path(), "Operator token rejected");
        return Err(AppError::InvalidCredentials);
    }

    Ok(next.run(request).await)
}
