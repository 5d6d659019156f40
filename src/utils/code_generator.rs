//! Short code derivation.

use base64::Engine as _;
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of a generated short code in characters.
pub const CODE_LENGTH: usize = 7;

/// Derives a 7-character URL-safe short code.
///
/// The code is a SHA-256 hash of the owner id, the target URL, and a
/// nanosecond timestamp, encoded as URL-safe base64 without padding and
/// truncated. The timestamp is the varying salt: distinct calls produce
/// distinct codes in the overwhelming common case, but uniqueness is
/// probabilistic, not guaranteed. No check against existing codes happens
/// here; the caller is responsible for collision handling.
pub fn generate(owner_id: Uuid, url: &str) -> String {
    let now = Utc::now();
    let salt = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());

    let mut hasher = Sha256::new();
    hasher.update(owner_id.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(salt.to_le_bytes());

    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize());

    encoded[..CODE_LENGTH].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_fixed_length() {
        let code = generate(Uuid::new_v4(), "https://example.com");
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_url_safe_characters() {
        let code = generate(Uuid::new_v4(), "https://example.com/some/long/path?q=1");
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_distinct_for_repeated_calls() {
        let owner = Uuid::new_v4();
        let mut codes = HashSet::new();

        for _ in 0..1000 {
            codes.insert(generate(owner, "https://example.com"));
        }

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_distinct_across_owners() {
        let a = generate(Uuid::new_v4(), "https://example.com");
        let b = generate(Uuid::new_v4(), "https://example.com");
        assert_ne!(a, b);
    }
}
