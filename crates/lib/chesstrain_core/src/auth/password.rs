//! Password hashing via bcrypt over a SHA-256 pre-digest.
//!
//! bcrypt only reads the first 72 bytes of its input, so the current scheme
//! condenses every password to a 64-character hex digest first. Hashes made
//! before that change hashed the raw password; they still verify through the
//! legacy scheme.

use sha2::{Digest, Sha256};
use tracing::warn;

use super::AuthError;

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = 12;

/// Longest input bcrypt accepts without truncating.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

/// Result of checking a password with a single scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Match,
    Mismatch,
    /// The scheme cannot judge this input (raw password over the bcrypt limit).
    Inapplicable,
}

/// Stored hash formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// bcrypt over the hex SHA-256 digest of the password.
    PreDigested,
    /// bcrypt over the raw password.
    Legacy,
}

/// Schemes in the order `check_password` tries them.
pub const VERIFY_ORDER: [Scheme; 2] = [Scheme::PreDigested, Scheme::Legacy];

impl Scheme {
    /// Check `password` against `hash` under this scheme.
    pub fn check(self, password: &str, hash: &str) -> Result<Outcome, AuthError> {
        let result = match self {
            Scheme::PreDigested => bcrypt::verify(prepare_password(password), hash),
            Scheme::Legacy => {
                if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
                    return Ok(Outcome::Inapplicable);
                }
                bcrypt::verify(password, hash)
            }
        };
        match result {
            Ok(true) => Ok(Outcome::Match),
            Ok(false) => Ok(Outcome::Mismatch),
            Err(e) => Err(AuthError::Verification(format!("{self:?}: {e}"))),
        }
    }
}

/// Hex-encoded SHA-256 of the UTF-8 password (always 64 bytes).
fn prepare_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Produces password hashes in the current (pre-digested) format.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: BCRYPT_COST }
    }
}

impl CredentialHasher {
    /// Hasher with an explicit bcrypt cost (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password of any length.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(prepare_password(password), self.cost)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }
}

/// Check a password against a stored hash, trying each scheme in order.
///
/// Returns `Ok(false)` on a plain mismatch and `Err(Verification)` when no
/// scheme matched and at least one failed for a reason other than a mismatch
/// (e.g. a malformed stored hash).
pub fn check_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let mut failure = None;
    for scheme in VERIFY_ORDER {
        match scheme.check(password, hash) {
            Ok(Outcome::Match) => return Ok(true),
            Ok(Outcome::Mismatch | Outcome::Inapplicable) => {}
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(false),
    }
}

/// Verify a password against a stored hash. Verification errors count as a
/// failed check.
pub fn verify_password(password: &str, hash: &str) -> bool {
    check_password(password, hash).unwrap_or_else(|e| {
        warn!(error = %e, "password verification failed");
        false
    })
}
