//! `Authorization` header parsing

use axum::http::{HeaderMap, header};

/// Authentication scheme accepted for header transport
pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively. Anything other than exactly
/// two whitespace-separated parts yields `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(
            extract_bearer_token(&headers_with("bearer   tok")),
            Some("tok".to_string())
        );
    }

    #[test]
    fn test_malformed_authorization() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer a b")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
