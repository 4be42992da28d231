//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id with a configurable cost)
//! - Cookie building and extraction
//! - Bearer token extraction from `Authorization`
//! - An injectable wall clock
//! - Human-readable duration parsing (`"1d"`, `"12h"`)

pub mod clock;
pub mod cookie;
pub mod duration;
pub mod header;
pub mod password;
