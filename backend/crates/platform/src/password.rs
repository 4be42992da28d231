//! Password Hashing and Verification
//!
//! One-way credential handling:
//! - Argon2id hashing with a configurable time cost
//! - Zeroization of clear text
//! - Constant-time verification (delegated to `argon2`)
//!
//! Clear text never implements `Display`, and its `Debug` output is
//! redacted, so it cannot end up in logs by accident.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Default Argon2id time cost (OWASP: t=2 with 19 MiB)
pub const DEFAULT_TIME_COST: u32 = 2;

/// Default Argon2id memory cost in KiB
pub const DEFAULT_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; the value is moved into the hashing task
/// and wiped when that task finishes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate a new password against the sign-up policy
    ///
    /// Input is NFKC-normalized first; lengths count code points.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::for_verification(raw)?;
        let password = candidate.0.as_str();

        let char_count = password.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password
            .chars()
            .any(|ch| ch.is_control() && ch != '\t')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(password) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(candidate)
    }

    /// Accept a password presented at login
    ///
    /// Only blank input is rejected, so a tightened policy never locks
    /// out accounts created under an older one.
    pub fn for_verification(raw: String) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        let password = Self(normalized);
        if password.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        Ok(password)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string embeds algorithm, version, parameters and salt, so a
/// hash produced under an older cost still verifies after the cost changes.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a stored PHC string, rejecting anything that is not one
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Time cost recorded in the hash, if present
    pub fn time_cost(&self) -> Option<u32> {
        let parsed = PasswordHash::new(&self.hash).ok()?;
        parsed
            .params
            .get_decimal("t")
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Argon2id hasher with a fixed cost
///
/// Stateless apart from its parameters; cheap to clone into blocking tasks.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Hasher with the given time cost and the default memory cost
    pub fn new(time_cost: u32) -> Result<Self, PasswordHashError> {
        Self::with_memory(time_cost, DEFAULT_MEMORY_KIB)
    }

    /// Hasher with explicit time and memory costs
    pub fn with_memory(time_cost: u32, memory_kib: u32) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, time_cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn time_cost(&self) -> u32 {
        self.params.t_cost()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh 128-bit salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Check a password against a stored hash
    ///
    /// A mismatch is `false`, never an error. The comparison is
    /// constant-time inside `argon2`.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("time_cost", &self.params.t_cost())
            .field("memory_kib", &self.params.m_cost())
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "123456",
        "1234567",
        "12345678",
        "123456789",
        "qwerty",
        "qwerty123",
        "abc123",
        "letmein",
        "welcome",
        "iloveyou",
        "admin123",
        "monkey",
        "dragon",
        "football",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Purely numeric and strictly ascending/descending ("123456", "987654")
fn is_sequential_numbers(s: &str) -> bool {
    if !s.chars().all(|c| c.is_ascii_digit()) || s.len() < 4 {
        return false;
    }

    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    let ascending = digits
        .windows(2)
        .all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits
        .windows(2)
        .all(|w| w[0] == (w[1] + 1) % 10);

    ascending || descending
}

// ============================================================================
// Tests
// ============================================================================
