//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases: sign-up, login, token service, hashing
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Request pipeline
//! 1. `TokenTransport` pulls the token from the `token` cookie or the
//!    `Authorization` header (one mode per deployment).
//! 2. The auth gate verifies it and attaches a `Principal`, or answers 401.
//! 3. The audit attributor stamps `createdBy` / `updatedBy` / `userId`
//!    into mutating JSON bodies from that principal.
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, clear text zeroized
//! - HS256 tokens with a server-side expiry check; no revocation list
//! - Unknown users and wrong passwords fail identically

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, TransportMode};
pub use application::token::{IssuedToken, TokenService};
pub use domain::repository::{ProfileProvisioner, UserRepository};
pub use domain::value_object::IdentityClaim;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::{AuthAppState, AuthGate, Principal, TokenTransport, protect, user_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
