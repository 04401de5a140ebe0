use validator::ValidateEmail;

use crate::app_error::{AppError, AppResult};

const MAX_NAME_LEN: usize = 100;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Lowercases and trims an email, rejecting malformed input.
pub fn normalize_email(email: &str) -> AppResult<String> {
    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("A valid email is required".into()));
    }
    Ok(email.trim().to_lowercase())
}

/// Trims a person name and checks it is present and bounded.
pub fn require_name(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(value.to_string())
}
