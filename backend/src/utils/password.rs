//! Password hashing with bcrypt.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{BcryptError, non_truncating_hash, non_truncating_verify};

/// Longest password bcrypt reads in full: its 72-byte input includes the NUL
/// terminator. Anything longer would be silently cut, so it is refused instead.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hashes and verifies passwords at a fixed bcrypt cost.
///
/// Keeps a hash of a throwaway password so that a lookup miss can still pay
/// for one full verification.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Creates a hasher for the given bcrypt cost (4..=31).
    pub fn new(cost: u32) -> ServiceResult<Self> {
        let dummy_hash = non_truncating_hash("tokengate-dummy-password", cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))?;
        Ok(Self { cost, dummy_hash })
    }

    /// Hashes a password before storing it. Each call uses a fresh salt.
    ///
    /// # Errors
    /// `ServiceError::Validation` if the password is too long for bcrypt.
    pub fn hash_password(&self, password: &str) -> ServiceResult<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(too_long());
        }
        non_truncating_hash(password, self.cost).map_err(|e| match e {
            BcryptError::Truncation(_) => too_long(),
            other => ServiceError::internal_error(format!("Password hashing failed: {}", other)),
        })
    }

    /// Verifies a password against a stored hash.
    ///
    /// A password too long to be compared in full never matches.
    pub fn verify_password(&self, password: &str, hash: &str) -> ServiceResult<bool> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        match non_truncating_verify(password, hash) {
            Ok(matched) => Ok(matched),
            Err(BcryptError::Truncation(_)) => Ok(false),
            Err(e) => Err(ServiceError::internal_error(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }

    /// Burns the same amount of work as a real verification and always fails.
    pub fn verify_dummy(&self, password: &str) -> bool {
        if password.len() <= MAX_PASSWORD_BYTES {
            let _ = non_truncating_verify(password, &self.dummy_hash);
        }
        false
    }
}

fn too_long() -> ServiceError {
    ServiceError::validation(format!(
        "Password must be at most {} bytes",
        MAX_PASSWORD_BYTES
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let hasher = PasswordHasher::new(4).unwrap();
        let first = hasher.hash_password("p1").unwrap();
        let second = hasher.hash_password("p1").unwrap();

        assert_ne!(first, second);
        assert_ne!(first, "p1");
        assert!(hasher.verify_password("p1", &first).unwrap());
        assert!(hasher.verify_password("p1", &second).unwrap());
        assert!(!hasher.verify_password("wrong", &first).unwrap());
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        let hasher = PasswordHasher::new(4).unwrap();
        assert!(!hasher.verify_dummy("tokengate-dummy-password"));
        assert!(!hasher.verify_dummy(&"a".repeat(200)));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new(4).unwrap();
        assert!(hasher.verify_password("p1", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn overlong_password_is_refused_not_truncated() {
        let hasher = PasswordHasher::new(4).unwrap();
        let long = format!("{}correct-tail", "a".repeat(72));

        let err = hasher.hash_password(&long).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[test]
    fn shared_prefix_does_not_match_a_truncated_hash() {
        let hasher = PasswordHasher::new(4).unwrap();
        // Plain bcrypt only hashes the first 72 bytes.
        let legacy = bcrypt::hash(format!("{}correct-tail", "a".repeat(72)), 4).unwrap();

        let wrong = format!("{}WRONG", "a".repeat(72));
        assert!(!hasher.verify_password(&wrong, &legacy).unwrap());
    }

    #[test]
    fn multibyte_passwords_are_measured_in_bytes() {
        let hasher = PasswordHasher::new(4).unwrap();
        // 40 characters, 80 bytes.
        let wide = "é".repeat(40);
        assert!(hasher.hash_password(&wide).is_err());

        let narrow = "é".repeat(30);
        let hash = hasher.hash_password(&narrow).unwrap();
        assert!(hasher.verify_password(&narrow, &hash).unwrap());
    }

    #[test]
    fn longest_accepted_password_round_trips() {
        let hasher = PasswordHasher::new(4).unwrap();
        let longest = "a".repeat(MAX_PASSWORD_BYTES);

        let hash = hasher.hash_password(&longest).unwrap();
        assert!(hasher.verify_password(&longest, &hash).unwrap());
        assert!(!hasher.verify_password(&format!("{longest}b"), &hash).unwrap());
    }
}
