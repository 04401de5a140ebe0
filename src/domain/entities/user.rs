use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered API consumer. Owns exactly one key, linked at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub api_key_id: Uuid,
}

/// One dashboard row: a user joined with its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithKey {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}
