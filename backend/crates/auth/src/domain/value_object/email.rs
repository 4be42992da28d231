//! Email Value Object
//!
//! A trimmed, lower-cased address of the form `local@domain.tld`.
//! Lower-casing makes the unique index and login lookup case-insensitive.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{AuthError, AuthResult};

/// Maximum email length (per RFC 5321)
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local-part length (per RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AuthResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AuthError::Validation("Email is required".into()));
        }
        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Email must be at most {EMAIL_MAX_LENGTH} characters"
            )));
        }
        if !is_valid_format(&email) {
            return Err(AuthError::Validation("Invalid email format".into()));
        }

        Ok(Self(email))
    }

    /// Rebuild from a stored value (validated on the way in)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

fn is_valid_format(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty()
        || local.chars().count() > LOCAL_PART_MAX_LENGTH
        || local.chars().any(|c| c.is_whitespace() || c.is_control() || c == '@')
    {
        return false;
    }

    // domain.tld, no empty labels, no leading/trailing hyphens
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

impl FromStr for Email {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("alice@x.com").is_ok());
        assert!(Email::new("user.name+tag@example.co.jp").is_ok());
    }

    #[test]
    fn test_email_lowercased_and_trimmed() {
        let email = Email::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_email_invalid() {
        for bad in [
            "",
            "aliceexample.com",
            "alice@",
            "@example.com",
            "alice@@example.com",
            "alice@example",
            "alice@.example.com",
            "alice@example..com",
            "alice@-example.com",
            "al ice@example.com",
        ] {
            assert!(
                matches!(Email::new(bad), Err(AuthError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_too_long() {
        let long = format!("{}@{}.com", "a".repeat(60), "b".repeat(200));
        assert!(Email::new(long).is_err());
    }
}
