use std::sync::Arc;

use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything heavy is behind an `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fleetcheck_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outgoing mail. `None` when SMTP is not configured, in which case
    /// reset requests are accepted but no code is delivered.
    pub mailer: Option<Arc<Mailer>>,
}
