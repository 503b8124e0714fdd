//! Widget API keys — generation and digesting.
//!
//! Keys are random 256-bit values, handed out once at creation or rotation.
//! Only the SHA-256 hex digest is stored, so a database leak does not leak
//! usable keys.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix that makes OwnBot keys recognizable in logs and support tickets.
const KEY_PREFIX: &str = "ob_";

/// Generate a fresh plaintext API key.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    format!("{KEY_PREFIX}{}", hex::encode(bytes))
}

/// Digest a plaintext key for storage or lookup.
pub fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_prefixed() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
        assert!(a.starts_with(KEY_PREFIX));
        // 3-char prefix + 64 hex chars
        assert_eq!(a.len(), 3 + 64);
    }

    #[test]
    fn digest_is_deterministic_and_not_the_key() {
        let key = generate_api_key();
        let d1 = hash_api_key(&key);
        let d2 = hash_api_key(&key);
        assert_eq!(d1, d2);
        assert_ne!(d1, key);
        assert_eq!(d1.len(), 64);
    }

    #[test]
    fn different_keys_hash_differently() {
        assert_ne!(hash_api_key("ob_aaa"), hash_api_key("ob_aab"));
    }
}
