//! Entry/exit code generation and validation.
//!
//! Codes are short tokens read aloud at the gate, so they are generated from
//! an uppercase alphanumeric alphabet with look-alike characters kept (staff
//! compare against the printed pass, not memory). Uniqueness is scoped to a
//! single visit; collisions across visits are expected at these lengths.

use rand::Rng;

use crate::constants::codes::{MAX_LENGTH, MIN_LENGTH};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Which of the two code fields a presented token is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSlot {
    Entry,
    Exit,
}

impl std::fmt::Display for CodeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// Generate a random code of `length` characters from a CSPRNG.
///
/// Length is clamped to the supported range; entry and exit codes for one
/// visit are two independent calls.
#[must_use]
pub fn generate_code(length: usize) -> String {
    let length = length.clamp(MIN_LENGTH, MAX_LENGTH);
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Exact, case-sensitive comparison of a presented code against the stored
/// one. `None` stored (code never issued) always fails.
#[must_use]
pub fn validate_code(stored: Option<&str>, presented: &str) -> bool {
    stored.is_some_and(|s| !s.is_empty() && s == presented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::codes::DEFAULT_LENGTH;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code(DEFAULT_LENGTH);
        assert_eq!(code.len(), DEFAULT_LENGTH);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_length_clamped() {
        assert_eq!(generate_code(0).len(), MIN_LENGTH);
        assert_eq!(generate_code(64).len(), MAX_LENGTH);
    }

    #[test]
    fn test_codes_are_independent() {
        // Two draws colliding at length 10 over a 36-char alphabet would be
        // a one-in-3.6e15 event; treat it as a broken RNG.
        let a = generate_code(MAX_LENGTH);
        let b = generate_code(MAX_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn test_validation_is_exact() {
        assert!(validate_code(Some("AB12CD"), "AB12CD"));
        assert!(!validate_code(Some("AB12CD"), "ab12cd"));
        assert!(!validate_code(Some("AB12CD"), " AB12CD"));
        assert!(!validate_code(Some("AB12CD"), "AB12C"));
        assert!(!validate_code(Some(""), ""));
        assert!(!validate_code(None, "AB12CD"));
    }
}
