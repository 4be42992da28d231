pub mod access;
pub mod category;
pub mod profile;
pub mod transaction;

pub use access::Attribution;
pub use category::{CategoryService, CategoryUpdate, NewCategory};
pub use profile::{NewProfile, ProfileService};
pub use transaction::{NewTransaction, TransactionService, TransactionUpdate};
