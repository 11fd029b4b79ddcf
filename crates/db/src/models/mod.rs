//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the table row and the
//! DTOs used to create or patch it.

pub mod inspection;
pub mod profile;
pub mod quality_report;
pub mod reset_code;
pub mod session;
pub mod user;
