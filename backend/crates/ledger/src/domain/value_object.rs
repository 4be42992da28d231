//! Validated ledger field types
//!
//! Constructors trim and check bounds; `from_db` skips validation for
//! values read back from storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

pub const PROFILE_NAME_MAX: usize = 100;
pub const CATEGORY_NAME_MIN: usize = 2;
pub const CATEGORY_NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const NOTE_MAX: usize = 500;

fn bounded(field: &str, raw: &str, min: usize, max: usize) -> LedgerResult<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(LedgerError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn optional_text(field: &str, raw: Option<String>, max: usize) -> LedgerResult<Option<String>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(LedgerError::Validation(format!(
            "{field} cannot exceed {max} characters"
        ))),
        Some(text) => Ok(Some(text.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileName(String);

impl ProfileName {
    pub fn new(raw: &str) -> LedgerResult<Self> {
        bounded("Profile name", raw, 1, PROFILE_NAME_MAX).map(Self)
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(raw: &str) -> LedgerResult<Self> {
        bounded("Category name", raw, CATEGORY_NAME_MIN, CATEGORY_NAME_MAX).map(Self)
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional free text capped at `DESCRIPTION_MAX`; blank becomes `None`
pub fn description(raw: Option<String>) -> LedgerResult<Option<String>> {
    optional_text("Description", raw, DESCRIPTION_MAX)
}

/// Optional free text capped at `NOTE_MAX`; blank becomes `None`
pub fn note(raw: Option<String>) -> LedgerResult<Option<String>> {
    optional_text("Note", raw, NOTE_MAX)
}

/// Strictly positive, finite amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> LedgerResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(LedgerError::Validation(
                "Amount must be a positive number".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn from_db(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Money in or out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn code(self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(TransactionType::Credit),
            "debit" => Ok(TransactionType::Debit),
            other => Err(LedgerError::Validation(format!(
                "Transaction type must be credit or debit, got {other:?}"
            ))),
        }
    }
}
