pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::LedgerAppState;
pub use router::{category_router, profile_router, transaction_router};
