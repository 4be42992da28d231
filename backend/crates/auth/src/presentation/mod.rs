//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the gate / attribution middleware.

pub mod audit;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod transport;

pub use audit::attribute_audit_fields;
pub use handlers::AuthAppState;
pub use middleware::{AuthGate, Principal, protect, require_auth, require_authentication};
pub use router::user_router;
pub use transport::TokenTransport;
