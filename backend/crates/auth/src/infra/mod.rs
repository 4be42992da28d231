//! Infrastructure Layer
//!
//! Database implementations of the domain repository traits.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "memory"))]
pub use memory::{InMemoryProfileProvisioner, InMemoryUserRepository};
pub use postgres::PgUserRepository;
