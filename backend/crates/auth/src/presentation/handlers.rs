//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::clock::SharedClock;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, PasswordService, SignUpInput, SignUpUseCase, TokenService,
};
use crate::domain::repository::{ProfileProvisioner, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, SignUpRequest, SignUpResponse, UserResponse,
};
use crate::presentation::middleware::{AuthGate, Principal};
use crate::presentation::transport::TokenTransport;

/// Shared state for auth handlers
pub struct AuthAppState<U, P> {
    pub users: Arc<U>,
    pub profiles: Arc<P>,
    pub passwords: PasswordService,
    pub tokens: Arc<TokenService>,
    pub transport: Arc<TokenTransport>,
}

impl<U, P> Clone for AuthAppState<U, P> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            profiles: self.profiles.clone(),
            passwords: self.passwords.clone(),
            tokens: self.tokens.clone(),
            transport: self.transport.clone(),
        }
    }
}

impl<U, P> AuthAppState<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProfileProvisioner + Send + Sync + 'static,
{
    pub fn new(
        users: Arc<U>,
        profiles: Arc<P>,
        config: &AuthConfig,
        clock: SharedClock,
    ) -> AuthResult<Self> {
        Ok(Self {
            users,
            profiles,
            passwords: PasswordService::from_config(config)?,
            tokens: Arc::new(TokenService::from_config(config, clock)),
            transport: Arc::new(TokenTransport::from_config(config)),
        })
    }

    /// Gate sharing this state's token service and transport
    pub fn gate(&self) -> AuthGate {
        AuthGate::new(self.tokens.clone(), self.transport.clone())
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/user/sign-up
pub async fn sign_up<U, P>(
    State(state): State<AuthAppState<U, P>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProfileProvisioner + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.users.clone(),
        state.profiles.clone(),
        state.passwords.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            user_name: req.username,
            email: req.email,
            password: req.password,
            role: None,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from(&output.user),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/user/login
pub async fn login<U, P>(
    State(state): State<AuthAppState<U, P>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProfileProvisioner + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.passwords.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            identifier: req.username_or_email,
            password: req.password,
        })
        .await?;

    let body = LoginResponse {
        message: "Login successful".to_string(),
        user: UserResponse::from(&output.user),
        token: state
            .transport
            .token_in_body()
            .then(|| output.token.token.clone()),
        expires_at: output.token.expires_at,
    };

    let mut response = Json(body).into_response();
    if let Some(cookie) = state.transport.deliver(&output.token.token) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/user/logout
///
/// Tokens cannot be revoked server-side; this only drops the cookie.
pub async fn logout<U, P>(
    State(state): State<AuthAppState<U, P>>,
    headers: HeaderMap,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    P: ProfileProvisioner + Send + Sync + 'static,
{
    // Log line only; nothing here is trusted for authorization.
    if let Some(claim) = state
        .transport
        .extract(&headers)
        .and_then(|token| state.tokens.decode_unverified(&token))
    {
        tracing::info!(user_id = %claim.subject_id, "User logged out");
    }

    match state.transport.clear() {
        Some(cookie) => (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/user/me
pub async fn me<U, P>(
    State(state): State<AuthAppState<U, P>>,
    principal: Principal,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProfileProvisioner + Send + Sync + 'static,
{
    let user = state
        .users
        .find_by_id(&principal.user_id())
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserResponse::from(&user)))
}
