use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Prefix carried by every issued key.
pub const API_KEY_PREFIX: &str = "sk_";

/// Number of random bytes behind the hex part of a key.
pub const API_KEY_RANDOM_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: Uuid,
    #[serde(rename = "apiKey")]
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
    pub owner_id: Option<Uuid>,
}

impl ApiKey {
    /// A key is active until it is revoked. Revocation is terminal.
    pub fn is_active(&self) -> bool {
        !self.revoked
    }
}

/// Checks the `sk_<64 lowercase hex>` shape of an issued key.
pub fn has_issued_key_shape(value: &str) -> bool {
    let Some(hex_part) = value.strip_prefix(API_KEY_PREFIX) else {
        return false;
    };
    hex_part.len() == API_KEY_RANDOM_BYTES * 2
        && hex_part
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
