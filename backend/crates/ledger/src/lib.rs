//! Ledger Backend Module
//!
//! Profiles, categories and transactions owned by a user. Every mutating
//! route sits behind `auth::protect`, so request bodies arrive with
//! `createdBy` / `updatedBy` / `userId` already stamped from the principal.
//!
//! Layering follows the auth crate:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Services enforcing ownership rules
//! - `infra/` - Postgres and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, routers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use domain::repository::{
    CategoryRepository, ProfileRepository, TransactionFilter, TransactionRepository,
};
pub use error::{LedgerError, LedgerResult};
pub use infra::postgres::PgLedgerRepository;
pub use presentation::{LedgerAppState, category_router, profile_router, transaction_router};
