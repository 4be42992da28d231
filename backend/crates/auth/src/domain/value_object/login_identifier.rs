//! Login Identifier
//!
//! What a user types into the login form. Usernames never contain `@`,
//! so anything with an `@` is looked up by email and everything else by
//! username. A lookup only ever matches one column.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    UserName(String),
    /// Lower-cased, like stored emails
    Email(String),
}

impl LoginIdentifier {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains('@') {
            LoginIdentifier::Email(raw.to_lowercase())
        } else {
            LoginIdentifier::UserName(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LoginIdentifier::UserName(s) | LoginIdentifier::Email(s) => s,
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
