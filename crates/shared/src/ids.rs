//! Opaque identifier generation.
//!
//! Identifiers carry a random suffix plus a millisecond timestamp so they
//! stay unique across rapid successive calls without any shared state.

use chrono::Utc;
use rand::Rng;

/// Length of the random segment in generated identifiers.
const RANDOM_SEGMENT_LEN: usize = 9;

/// Alphabet for random segments (lowercase base-36).
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_segment() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_SEGMENT_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a receipt identifier for a simulated submission.
pub fn simulated_receipt_id() -> String {
    format!("dev_{}_{}", Utc::now().timestamp_millis(), random_segment())
}

/// Generate a stable-looking user identifier.
pub fn generate_user_id() -> String {
    format!("user_{}_{}", random_segment(), Utc::now().timestamp_millis())
}

/// Generate a per-session identifier.
pub fn generate_session_id() -> String {
    format!(
        "session_{}_{}",
        random_segment(),
        Utc::now().timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_segment_alphabet() {
        let segment = random_segment();
        assert_eq!(segment.len(), RANDOM_SEGMENT_LEN);
        assert!(segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_simulated_receipt_id_prefix() {
        let id = simulated_receipt_id();
        assert!(id.starts_with("dev_"));
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = simulated_receipt_id();
        let b = simulated_receipt_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_and_session_prefixes() {
        assert!(generate_user_id().starts_with("user_"));
        assert!(generate_session_id().starts_with("session_"));
    }
}
