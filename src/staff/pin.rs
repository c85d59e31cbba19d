//! PIN digest handling
//!
//! PINs are exactly six ASCII digits. They are hashed with Argon2id and a
//! per-PIN random salt; the stored PHC string is the only thing that ever
//! touches storage. The deliberately slow digest is what makes online
//! guessing impractical for a six-digit space.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{TransitError, TransitResult};

/// Required PIN length in digits
pub const PIN_LEN: usize = 6;

/// Reject anything that is not exactly six ASCII digits
pub fn validate_pin(pin: &str) -> TransitResult<()> {
    if pin.len() != PIN_LEN || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TransitError::Validation(format!(
            "PIN must be exactly {} digits",
            PIN_LEN
        )));
    }
    Ok(())
}

/// Validate and hash a PIN into its PHC digest string
pub fn hash_pin(pin: &str) -> TransitResult<String> {
    validate_pin(pin)?;

    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| TransitError::Storage(format!("PIN hashing failed: {}", e)))?
        .to_string();

    Ok(digest)
}

/// Verify a PIN attempt against a stored PHC digest
pub fn verify_pin(pin: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok()
}

/// Digest verified against when the staff id is unknown, so a lookup for
/// a missing profile costs the same as a real verification and the API
/// does not leak which staff ids exist.
pub fn burn_in_digest() -> &'static str {
    static DIGEST: OnceLock<String> = OnceLock::new();
    DIGEST.get_or_init(|| {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(b"000000", &salt)
            .expect("argon2 default parameters are valid")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pin_format() {
        assert!(validate_pin("123456").is_ok());
        assert!(validate_pin("000000").is_ok());

        assert!(validate_pin("12345").is_err()); // too short
        assert!(validate_pin("1234567").is_err()); // too long
        assert!(validate_pin("12345a").is_err()); // letter
        assert!(validate_pin("12 456").is_err()); // space
        assert!(validate_pin("").is_err());
        assert!(validate_pin("１２３４５６").is_err()); // full-width digits
    }

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_pin("482913").unwrap();
        assert!(digest.starts_with("$argon2"));

        assert!(verify_pin("482913", &digest));
        assert!(!verify_pin("482914", &digest));
        assert!(!verify_pin("000000", &digest));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_pin("482913").unwrap();
        let b = hash_pin("482913").unwrap();
        assert_ne!(a, b);

        assert!(verify_pin("482913", &a));
        assert!(verify_pin("482913", &b));
    }

    #[test]
    fn test_hash_rejects_bad_format() {
        assert!(hash_pin("12345").is_err());
        assert!(hash_pin("abcdef").is_err());
    }

    #[test]
    fn test_verify_garbage_digest() {
        assert!(!verify_pin("123456", "not-a-phc-string"));
        assert!(!verify_pin("123456", ""));
    }

    #[test]
    fn test_burn_in_digest_is_cached() {
        let digest = burn_in_digest();
        assert!(digest.starts_with("$argon2"));
        // Same value twice (cached)
        assert_eq!(burn_in_digest(), digest);
    }
}
