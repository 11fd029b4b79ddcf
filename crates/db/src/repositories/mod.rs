//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod inspection_repo;
pub mod profile_repo;
pub mod quality_report_repo;
pub mod reset_code_repo;
pub mod session_repo;
pub mod user_repo;

pub use inspection_repo::InspectionRepo;
pub use profile_repo::ProfileRepo;
pub use quality_report_repo::QualityReportRepo;
pub use reset_code_repo::ResetCodeRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
