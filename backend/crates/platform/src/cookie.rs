//! Token Cookie Handling
//!
//! Builds `Set-Cookie` values for the session token and reads cookies back
//! out of request headers.

use std::{fmt, str::FromStr};

use axum::http::{HeaderMap, HeaderValue, header};

/// Default cookie name carrying the access token
pub const DEFAULT_TOKEN_COOKIE: &str = "token";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(format!("unknown SameSite policy: {other}")),
        }
    }
}

/// Cookie attributes for the token cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_COOKIE.to_string(),
            secure: false,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Token cookie with a lifetime matching the token's
    pub fn for_token(secure: bool, max_age_secs: i64) -> Self {
        Self {
            secure,
            max_age_secs: Some(max_age_secs),
            ..Self::default()
        }
    }

    fn attributes(&self, max_age: Option<i64>) -> String {
        let mut attrs = String::new();
        if self.http_only {
            attrs.push_str("; HttpOnly");
        }
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs.push_str("; SameSite=");
        attrs.push_str(self.same_site.as_str());
        attrs.push_str("; Path=");
        attrs.push_str(&self.path);
        if let Some(max_age) = max_age {
            attrs.push_str(&format!("; Max-Age={max_age}"));
        }
        attrs
    }

    /// `Set-Cookie` value carrying `value`
    pub fn build_set_cookie(&self, value: &str) -> String {
        format!("{}={}{}", self.name, value, self.attributes(self.max_age_secs))
    }

    /// `Set-Cookie` value that expires the cookie immediately
    ///
    /// Attributes mirror the issuing cookie so browsers match and drop it.
    pub fn build_delete_cookie(&self) -> String {
        format!("{}={}", self.name, self.attributes(Some(0)))
    }

    /// `build_set_cookie` as a header value
    ///
    /// `None` when the token contains bytes a header cannot carry.
    pub fn set_cookie_header(&self, value: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value)).ok()
    }

    pub fn delete_cookie_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_delete_cookie()).ok()
    }
}

/// Extract a cookie value from request headers
///
/// Looks through every `Cookie` header; empty values count as absent.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name && !value.trim().is_empty()).then(|| value.trim().to_string())
        })
}
