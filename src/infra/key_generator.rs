use rand::RngCore;

use crate::{
    application::use_cases::api_key::KeyGenerator,
    domain::entities::api_key::{API_KEY_PREFIX, API_KEY_RANDOM_BYTES},
};

/// Generates keys with format: sk_<64 hex chars> from the OS RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; API_KEY_RANDOM_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        format!("{}{}", API_KEY_PREFIX, hex::encode(bytes))
    }
}
