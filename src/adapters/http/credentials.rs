use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::Deserialize;

use crate::app_error::{AppError, AppResult};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Body shape accepted alongside (or instead of) the credential headers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBody {
    pub api_key: Option<String>,
}

impl CredentialBody {
    /// Lenient parse: an empty or non-JSON body simply carries no key.
    pub fn from_bytes(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Pulls the candidate key from, in order: `Authorization: Bearer`,
/// `x-api-key`, then the body's `apiKey`. Blank values are skipped; any
/// other value is returned exactly as sent.
pub fn extract_api_key(headers: &HeaderMap, body: &CredentialBody) -> AppResult<String> {
    bearer_token(headers)
        .or_else(|| header_value(headers, API_KEY_HEADER))
        .or_else(|| non_empty(body.api_key.as_deref()))
        .ok_or(AppError::MissingCredential)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    non_empty(value.strip_prefix("Bearer "))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    non_empty(headers.get(name)?.to_str().ok())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    let value = value?;
    (!value.trim().is_empty()).then(|| value.to_string())
}
