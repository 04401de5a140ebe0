/// Dashboard credential pair.
///
/// `password` holds whatever the configured password scheme produced: an
/// Argon2 PHC string, or the raw password for the legacy plaintext scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub email: String,
    pub password: String,
}
