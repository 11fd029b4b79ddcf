//! Fleetcheck domain core.
//!
//! Pure, I/O-free building blocks shared by the API server and the client
//! SDK: the checklist catalog, the inspection session state machine, status
//! derivation, signature gating, quality-report capture, dashboard metrics,
//! screen navigation and HTML report rendering.

pub mod checklist;
pub mod error;
pub mod inspection;
pub mod metrics;
pub mod navigation;
pub mod quality_report;
pub mod report;
pub mod roles;
pub mod signature;
pub mod status;
pub mod types;
