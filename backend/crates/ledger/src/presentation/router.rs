//! Ledger Routers
//!
//! Each router is wrapped with `auth::protect`: gate first, then audit
//! attribution, then the handler.

use axum::Router;
use axum::routing::{get, post};

use crate::domain::repository::{CategoryRepository, ProfileRepository, TransactionRepository};
use crate::presentation::handlers::{self, LedgerAppState};

/// Routes mounted under `/api/profile`
pub fn profile_router<R>(state: LedgerAppState<R>) -> Router
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let routes = Router::new()
        .route("/", post(handlers::create_profile::<R>))
        .route("/user/{user_id}", get(handlers::list_profiles::<R>));

    auth::protect(routes, state.gate.clone()).with_state(state)
}

/// Routes mounted under `/api/category`
pub fn category_router<R>(state: LedgerAppState<R>) -> Router
where
    R: CategoryRepository + Send + Sync + 'static,
{
    let routes = Router::new()
        .route("/", post(handlers::create_category::<R>))
        .route("/user/{user_id}", get(handlers::list_categories::<R>))
        .route(
            "/{category_id}",
            get(handlers::get_category::<R>)
                .put(handlers::update_category::<R>)
                .delete(handlers::delete_category::<R>),
        );

    auth::protect(routes, state.gate.clone()).with_state(state)
}

/// Routes mounted under `/api/transaction`
pub fn transaction_router<R>(state: LedgerAppState<R>) -> Router
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let routes = Router::new()
        .route("/", post(handlers::create_transaction::<R>))
        .route(
            "/user/date-range",
            get(handlers::list_transactions_in_range::<R>),
        )
        .route("/user/{user_id}", get(handlers::list_transactions::<R>))
        .route(
            "/user/{user_id}/category/{category_id}",
            get(handlers::list_transactions_by_category::<R>),
        )
        .route(
            "/user/{user_id}/type/{kind}",
            get(handlers::list_transactions_by_type::<R>),
        )
        .route(
            "/{transaction_id}",
            get(handlers::get_transaction::<R>)
                .put(handlers::update_transaction::<R>)
                .delete(handlers::delete_transaction::<R>),
        );

    auth::protect(routes, state.gate.clone()).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryLedgerRepository;
    use auth::{AuthConfig, AuthGate, IdentityClaim, TokenService, TokenTransport, TransportMode};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use kernel::id::UserId;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        tokens: Arc<TokenService>,
        profiles: Router,
        categories: Router,
        transactions: Router,
    }

    fn harness() -> Harness {
        let mut config = AuthConfig::development();
        config.transport = TransportMode::Header;
        let tokens = Arc::new(TokenService::with_system_clock(&config));
        let gate = AuthGate::new(
            tokens.clone(),
            Arc::new(TokenTransport::from_config(&config)),
        );
        let state = LedgerAppState::new(Arc::new(InMemoryLedgerRepository::new()), gate);

        Harness {
            tokens,
            profiles: profile_router(state.clone()),
            categories: category_router(state.clone()),
            transactions: transaction_router(state),
        }
    }

    impl Harness {
        fn token(&self, user: UserId) -> String {
            let claim = IdentityClaim::new(user, "alice", "alice@x.com");
            self.tokens.issue(&claim).unwrap().token
        }
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_routes_require_token() {
        let h = harness();
        let response = h
            .categories
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Food"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_category_is_attributed_to_principal() {
        let h = harness();
        let alice = UserId::new();
        let token = h.token(alice);

        let forged = UserId::new().to_string();
        let (status, body) = send(
            &h.categories,
            request(
                "POST",
                "/",
                &token,
                Some(json!({ "name": "Food", "createdBy": forged, "updatedBy": forged })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Category created successfully");
        assert_eq!(body["category"]["createdBy"], alice.to_string());
        assert_eq!(body["category"]["updatedBy"], alice.to_string());
        assert_eq!(body["category"]["userId"], alice.to_string());

        let (status, _) = send(
            &h.categories,
            request("POST", "/", &token, Some(json!({ "name": "Food" }))),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_keeps_creator_and_sets_modifier() {
        let h = harness();
        let alice = UserId::new();
        let token = h.token(alice);

        let (_, created) = send(
            &h.categories,
            request("POST", "/", &token, Some(json!({ "name": "Food" }))),
        )
        .await;
        let id = created["category"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &h.categories,
            request(
                "PUT",
                &format!("/{id}"),
                &token,
                Some(json!({ "description": "Eating out", "createdBy": UserId::new().to_string() })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"]["description"], "Eating out");
        assert_eq!(body["category"]["createdBy"], alice.to_string());
        assert_eq!(body["category"]["updatedBy"], alice.to_string());
    }

    #[tokio::test]
    async fn test_other_users_records_are_forbidden() {
        let h = harness();
        let alice = UserId::new();
        let mallory = UserId::new();

        let (_, created) = send(
            &h.categories,
            request("POST", "/", &h.token(alice), Some(json!({ "name": "Rent" }))),
        )
        .await;
        let id = created["category"]["id"].as_str().unwrap().to_string();

        let mallory_token = h.token(mallory);
        let (status, _) = send(
            &h.categories,
            request("GET", &format!("/{id}"), &mallory_token, None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &h.categories,
            request("GET", &format!("/user/{alice}"), &mallory_token, None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Creating on someone else's behalf is refused
        let (status, _) = send(
            &h.categories,
            request(
                "POST",
                "/",
                &mallory_token,
                Some(json!({ "name": "Spying", "userId": alice.to_string() })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_transaction_flow() {
        let h = harness();
        let alice = UserId::new();
        let token = h.token(alice);

        let (status, _) = send(
            &h.profiles,
            request("POST", "/", &token, Some(json!({ "name": "self" }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, category) = send(
            &h.categories,
            request("POST", "/", &token, Some(json!({ "name": "Food" }))),
        )
        .await;
        let category_id = category["category"]["id"].as_str().unwrap().to_string();

        for (amount, kind, date) in [
            (50, "debit", "2025-03-01T12:00:00Z"),
            (900, "credit", "2025-03-05T12:00:00Z"),
        ] {
            let (status, body) = send(
                &h.transactions,
                request(
                    "POST",
                    "/",
                    &token,
                    Some(json!({
                        "amount": amount,
                        "type": kind,
                        "categoryId": category_id,
                        "date": date,
                    })),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            assert_eq!(body["transaction"]["createdBy"], alice.to_string());
        }

        let (status, body) = send(
            &h.transactions,
            request("GET", &format!("/user/{alice}"), &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let listed = body["transactions"].as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["type"], "credit");

        let (_, body) = send(
            &h.transactions,
            request("GET", &format!("/user/{alice}/type/debit"), &token, None),
        )
        .await;
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);

        let (_, body) = send(
            &h.transactions,
            request(
                "GET",
                &format!("/user/{alice}/category/{category_id}"),
                &token,
                None,
            ),
        )
        .await;
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &h.transactions,
            request(
                "GET",
                &format!(
                    "/user/date-range?userId={alice}&startDate=2025-03-01T12:00:00Z&endDate=2025-03-02T00:00:00Z"
                ),
                &token,
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(body["transactions"][0]["amount"], 50.0);

        // The category is in use
        let (status, _) = send(
            &h.categories,
            request("DELETE", &format!("/{category_id}"), &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_not_found() {
        let h = harness();
        let token = h.token(UserId::new());
        let (status, _) = send(
            &h.transactions,
            request(
                "GET",
                &format!("/{}", kernel::id::TransactionId::new()),
                &token,
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
