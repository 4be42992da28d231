//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod password;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::{AuthConfig, TransportMode};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use password::PasswordService;
pub use sign_up::{DEFAULT_PROFILE_NAME, SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{IssuedToken, TokenService};
