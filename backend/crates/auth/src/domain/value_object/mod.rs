//! Value Objects
//!
//! Validated, immutable building blocks of the auth domain.

pub mod email;
pub mod identity_claim;
pub mod login_identifier;
pub mod user_name;
pub mod user_password;
pub mod user_role;

pub use email::Email;
pub use identity_claim::IdentityClaim;
pub use login_identifier::LoginIdentifier;
pub use user_name::UserName;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
