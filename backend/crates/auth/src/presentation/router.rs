//! User Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{ProfileProvisioner, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_authentication;

/// Routes mounted under `/api/user`
pub fn user_router<U, P>(state: AuthAppState<U, P>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    P: ProfileProvisioner + Send + Sync + 'static,
{
    let protected = require_authentication(
        Router::new().route("/me", get(handlers::me::<U, P>)),
        state.gate(),
    );

    Router::new()
        .route("/sign-up", post(handlers::sign_up::<U, P>))
        .route("/login", post(handlers::login::<U, P>))
        .route("/logout", post(handlers::logout::<U, P>))
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::{AuthConfig, TransportMode};
    use crate::infra::memory::{InMemoryProfileProvisioner, InMemoryUserRepository};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use platform::clock::SystemClock;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(mode: TransportMode) -> Router {
        let mut config = AuthConfig::development();
        config.transport = mode;
        config.password_time_cost = 1;
        config.password_memory_kib = 64;

        let state = AuthAppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryProfileProvisioner::new()),
            &config,
            Arc::new(SystemClock),
        )
        .unwrap();
        user_router(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn sign_up_alice(app: &Router) {
        let response = app
            .clone()
            .oneshot(post_json(
                "/sign-up",
                json!({ "username": "alice", "email": "alice@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_sign_up_response_has_no_password() {
        let app = app(TransportMode::Cookie);
        let response = app
            .oneshot(post_json(
                "/sign-up",
                json!({ "username": "alice", "email": "Alice@X.com", "password": "secret1" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["email"], "alice@x.com");
        assert_eq!(body["user"]["role"], "user");
        assert!(body["user"].get("password").is_none());
        assert!(!body.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_sign_up_validation_and_conflict() {
        let app = app(TransportMode::Cookie);
        sign_up_alice(&app).await;

        let duplicate = app
            .clone()
            .oneshot(post_json(
                "/sign-up",
                json!({ "username": "alice", "email": "new@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let invalid = app
            .oneshot(post_json(
                "/sign-up",
                json!({ "username": "bo", "email": "bo@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cookie_login_then_me_then_logout() {
        let app = app(TransportMode::Cookie);
        sign_up_alice(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "usernameOrEmail": "alice", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        let body = json_body(response).await;
        assert!(body.get("token").is_none());

        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let me = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(json_body(me).await["username"], "alice");

        let logout = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(logout.status(), StatusCode::NO_CONTENT);
        assert!(
            logout.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
    }

    #[tokio::test]
    async fn test_header_mode_returns_token_in_body() {
        let app = app(TransportMode::Header);
        sign_up_alice(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "usernameOrEmail": "alice@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let token = json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let me = app
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_identical() {
        let app = app(TransportMode::Cookie);
        sign_up_alice(&app).await;

        let wrong = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "usernameOrEmail": "alice", "password": "wrong-password" }),
            ))
            .await
            .unwrap();
        let unknown = app
            .oneshot(post_json(
                "/login",
                json!({ "usernameOrEmail": "nobody", "password": "secret1" }),
            ))
            .await
            .unwrap();

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), unknown.status());
        assert_eq!(json_body(wrong).await, json_body(unknown).await);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let response = app(TransportMode::Cookie)
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
