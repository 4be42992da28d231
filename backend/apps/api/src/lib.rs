//! FairTrack API
//!
//! Assembles the auth and ledger routers under `/api`. The binary wires in
//! Postgres repositories; the integration tests use the in-memory ones.

pub mod config;

use std::sync::Arc;

use auth::{AuthAppState, AuthConfig, AuthResult, ProfileProvisioner, UserRepository, user_router};
use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, routing::get};
use ledger::{
    CategoryRepository, LedgerAppState, ProfileRepository, TransactionRepository,
    category_router, profile_router, transaction_router,
};
use platform::clock::SharedClock;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// The full `/api` router
///
/// `ledger` also provisions the default profile at sign-up.
pub fn build_router<U, L>(
    users: Arc<U>,
    ledger: Arc<L>,
    auth_config: &AuthConfig,
    clock: SharedClock,
) -> AuthResult<Router>
where
    U: UserRepository + Send + Sync + 'static,
    L: ProfileProvisioner
        + ProfileRepository
        + CategoryRepository
        + TransactionRepository
        + Send
        + Sync
        + 'static,
{
    let auth_state = AuthAppState::new(users, ledger.clone(), auth_config, clock)?;
    let ledger_state = LedgerAppState::new(ledger, auth_state.gate());

    let api = Router::new()
        .route("/health", get(health))
        .nest("/user", user_router(auth_state))
        .nest("/profile", profile_router(ledger_state.clone()))
        .nest("/category", category_router(ledger_state.clone()))
        .nest("/transaction", transaction_router(ledger_state));

    Ok(Router::new().nest("/api", api))
}

/// CORS for the browser client; credentials allowed for the token cookie
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

/// Router plus HTTP tracing and CORS
pub fn with_http_layers(router: Router, origins: &[String]) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(origins)),
    )
}
