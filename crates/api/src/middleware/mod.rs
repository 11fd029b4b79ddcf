//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`]: the caller identified by a Bearer access token.
//! - [`rbac::RequireManager`]: a caller whose stored profile role is `manager`.
//! - [`rbac::RequireAuth`]: any authenticated caller.

pub mod auth;
pub mod rbac;
