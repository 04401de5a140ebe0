use thiserror::Error;

/// Which unique value a rejected write collided with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateField {
    /// Generated key value collided. Retryable with a fresh key.
    ApiKey,
    Email,
    Record,
}

impl DuplicateField {
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateField::ApiKey => "Generated API key already exists",
            DuplicateField::Email => "Email already registered",
            DuplicateField::Record => "A record with this value already exists",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("No API key provided")]
    MissingCredential,

    #[error("API key invalid")]
    InvalidApiKey,

    #[error("{}", .0.message())]
    Duplicate(DuplicateField),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    DatabaseError,
    MissingCredential,
    InvalidApiKey,
    DuplicateEntity,
    InvalidCredentials,
    InvalidInput,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::MissingCredential => "MISSING_CREDENTIAL",
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::DuplicateEntity => "DUPLICATE_ENTITY",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_display_names_the_field() {
        assert_eq!(
            AppError::Duplicate(DuplicateField::Email).to_string(),
            "Email already registered"
        );
        assert_eq!(
            AppError::Duplicate(DuplicateField::ApiKey).to_string(),
            "Generated API key already exists"
        );
    }
}
