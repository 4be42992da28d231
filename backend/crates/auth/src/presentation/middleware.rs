//! Auth Gate
//!
//! Middleware for protected routes. A request either carries a token that
//! verifies, and continues with a `Principal` in its extensions, or it is
//! answered with 401 right here.
//!
//! Per request: `Unauthenticated -> TokenExtracted -> {Verified, Rejected}`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::Router;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::Response;
use kernel::id::UserId;

use crate::application::token::TokenService;
use crate::domain::value_object::IdentityClaim;
use crate::error::{AuthError, AuthResult};
use crate::presentation::audit::attribute_audit_fields;
use crate::presentation::transport::TokenTransport;

/// The authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub IdentityClaim);

impl Principal {
    pub fn user_id(&self) -> UserId {
        self.0.subject_id
    }

    pub fn claim(&self) -> &IdentityClaim {
        &self.0
    }
}

/// Handlers behind the gate take `Principal` as an argument
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::NoTokenProvided)
    }
}

/// Gate state: token verification plus the active transport
#[derive(Clone, Debug)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    transport: Arc<TokenTransport>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>, transport: Arc<TokenTransport>) -> Self {
        Self { tokens, transport }
    }

    /// Resolve the principal for a request's headers
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult<Principal> {
        let token = self
            .transport
            .extract(headers)
            .ok_or(AuthError::NoTokenProvided)?;

        let verified = std::panic::catch_unwind(AssertUnwindSafe(|| self.tokens.verify(&token)))
            .map_err(|_| AuthError::AuthenticationFailed("token verification panicked".into()))?;

        match verified {
            Ok(claim) => Ok(Principal(claim)),
            Err(AuthError::InvalidOrExpiredToken) => Err(AuthError::InvalidOrExpiredToken),
            Err(other) => Err(AuthError::AuthenticationFailed(other.to_string())),
        }
    }
}

/// Middleware that requires a verified token
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match gate.authenticate(req.headers()) {
        Ok(principal) => {
            tracing::debug!(user_id = %principal.user_id(), "Request authenticated");
            req.extensions_mut().insert(principal);
            Ok(next.run(req).await)
        }
        Err(reason) => {
            tracing::warn!(
                reason = %reason,
                method = %req.method(),
                path = %req.uri().path(),
                "Request rejected by auth gate"
            );
            Err(reason)
        }
    }
}

/// Put every route of `router` behind the gate
pub fn require_authentication<S>(router: Router<S>, gate: AuthGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, require_auth))
}

/// Gate plus audit attribution
///
/// The gate is the outer layer, so attribution always sees the principal
/// and always finishes before the handler reads the body.
pub fn protect<S>(router: Router<S>, gate: AuthGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn(attribute_audit_fields))
        .route_layer(middleware::from_fn_with_state(gate, require_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::{AuthConfig, TransportMode};
    use crate::error::{AUTH_REQUIRED_HEADER, NOT_AUTHORIZED_MESSAGE};
    use axum::body::{Body, to_bytes};
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use chrono::Duration;
    use platform::clock::ManualClock;
    use tower::ServiceExt;

    struct Harness {
        tokens: Arc<TokenService>,
        clock: Arc<ManualClock>,
        app: Router,
    }

    fn harness(mode: TransportMode) -> Harness {
        let mut config = AuthConfig::development();
        config.transport = mode;
        let clock = Arc::new(ManualClock::default());
        let tokens = Arc::new(TokenService::from_config(&config, clock.clone()));
        let gate = AuthGate::new(
            tokens.clone(),
            Arc::new(TokenTransport::from_config(&config)),
        );

        let app = require_authentication(
            Router::new().route(
                "/whoami",
                get(|principal: Principal| async move { principal.0.username }),
            ),
            gate,
        );

        Harness { tokens, clock, app }
    }

    fn token_for(tokens: &TokenService) -> String {
        let claim = IdentityClaim::new(UserId::new(), "alice", "alice@x.com");
        tokens.issue(&claim).unwrap().token
    }

    async fn call(app: &Router, request: Request) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn with_cookie(token: &str) -> Request {
        Request::builder()
            .uri("/whoami")
            .header(header::COOKIE, format!("token={token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_verified_cookie_reaches_handler() {
        let h = harness(TransportMode::Cookie);
        let token = token_for(&h.tokens);

        let (status, _, body) = call(&h.app, with_cookie(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn test_bearer_header_in_header_mode() {
        let h = harness(TransportMode::Header);
        let token = token_for(&h.tokens);

        let request = Request::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = call(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);

        // The cookie is ignored in header mode
        let (status, _, _) = call(&h.app, with_cookie(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_all_rejections_look_the_same() {
        let h = harness(TransportMode::Cookie);
        let token = token_for(&h.tokens);

        let (missing_status, missing_headers, missing_body) = call(
            &h.app,
            Request::builder().uri("/whoami").body(Body::empty()).unwrap(),
        )
        .await;
        let (garbage_status, _, garbage_body) = call(&h.app, with_cookie("garbage")).await;

        h.clock.advance(Duration::days(2));
        let (expired_status, _, expired_body) = call(&h.app, with_cookie(&token)).await;

        for status in [missing_status, garbage_status, expired_status] {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
        assert_eq!(missing_body, garbage_body);
        assert_eq!(garbage_body, expired_body);
        assert!(missing_body.contains(NOT_AUTHORIZED_MESSAGE));
        assert_eq!(missing_headers[AUTH_REQUIRED_HEADER], "true");
    }

    #[test]
    fn test_authenticate_reasons() {
        let h = harness(TransportMode::Cookie);
        let gate = AuthGate::new(
            h.tokens.clone(),
            Arc::new(TokenTransport::from_config(&AuthConfig::development())),
        );

        assert!(matches!(
            gate.authenticate(&HeaderMap::new()),
            Err(AuthError::NoTokenProvided)
        ));
        assert!(matches!(
            gate.authenticate(with_cookie("x.y.z").headers()),
            Err(AuthError::InvalidOrExpiredToken)
        ));

        let token = token_for(&h.tokens);
        let principal = gate.authenticate(with_cookie(&token).headers()).unwrap();
        assert_eq!(principal.claim().username, "alice");
    }
}
