//! Authentication primitives.
//!
//! - [`password`]: Argon2id hashing and the minimum-length rule.
//! - [`jwt`]: access tokens and opaque refresh tokens.
//! - [`reset_code`]: six-digit password reset codes.

pub mod jwt;
pub mod password;
pub mod reset_code;
