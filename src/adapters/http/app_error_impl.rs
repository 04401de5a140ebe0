use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server failures are logged with detail; caller mistakes only at debug.
        match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = ?self, "Request failed")
            }
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        match self {
            AppError::Database(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Internal server error".into(),
            ),
            AppError::MissingCredential => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::MissingCredential,
                self.to_string(),
            ),
            AppError::InvalidApiKey => {
                let body = serde_json::json!({
                    "success": false,
                    "valid": false,
                    "code": ErrorCode::InvalidApiKey.as_str(),
                    "message": self.to_string(),
                });
                (StatusCode::UNAUTHORIZED, Json(body)).into_response()
            }
            AppError::Duplicate(_) => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::DuplicateEntity,
                self.to_string(),
            ),
            AppError::InvalidCredentials => error_resp(
                StatusCode::UNAUTHORIZED,
                ErrorCode::InvalidCredentials,
                self.to_string(),
            ),
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, msg)
            }
            AppError::NotFound => {
                error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, self.to_string())
            }
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Internal server error".into(),
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({
        "success": false,
        "code": code.as_str(),
        "message": message,
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_error::DuplicateField;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        let cases = [
            (AppError::MissingCredential, StatusCode::BAD_REQUEST),
            (AppError::InvalidApiKey, StatusCode::UNAUTHORIZED),
            (
                AppError::Duplicate(DuplicateField::Email),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
