//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token signing/validation and opaque token helpers
//!   shared by refresh sessions and password reset links.

pub mod jwt;
pub mod password;
