//! Session Transport
//!
//! Where the token lives on a request: the `token` cookie or the
//! `Authorization` header. Exactly one mode is active per deployment and
//! the auth gate only ever sees the extracted string.

use axum::http::{HeaderMap, HeaderValue};
use platform::cookie::{CookieConfig, extract_cookie};
use platform::header::extract_bearer_token;

use crate::application::config::{AuthConfig, TransportMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTransport {
    Cookie(CookieConfig),
    Header,
}

impl TokenTransport {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.transport {
            TransportMode::Cookie => TokenTransport::Cookie(config.cookie_config()),
            TransportMode::Header => TokenTransport::Header,
        }
    }

    pub fn mode(&self) -> TransportMode {
        match self {
            TokenTransport::Cookie(_) => TransportMode::Cookie,
            TokenTransport::Header => TransportMode::Header,
        }
    }

    /// Pull the raw token off the request, if any
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        match self {
            TokenTransport::Cookie(cookie) => extract_cookie(headers, &cookie.name),
            TokenTransport::Header => extract_bearer_token(headers),
        }
    }

    /// `Set-Cookie` value delivering a token (cookie mode only)
    pub fn deliver(&self, token: &str) -> Option<HeaderValue> {
        match self {
            TokenTransport::Cookie(cookie) => cookie.set_cookie_header(token),
            TokenTransport::Header => None,
        }
    }

    /// `Set-Cookie` value expiring the token cookie (cookie mode only)
    pub fn clear(&self) -> Option<HeaderValue> {
        match self {
            TokenTransport::Cookie(cookie) => cookie.delete_cookie_header(),
            TokenTransport::Header => None,
        }
    }

    /// Header-mode clients need the token in the response body
    pub fn token_in_body(&self) -> bool {
        matches!(self, TokenTransport::Header)
    }
}
