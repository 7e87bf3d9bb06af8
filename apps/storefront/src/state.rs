//! Shared application state injected into every handler.

use std::sync::Arc;

use aisle_db::Database;

use crate::config::StorefrontConfig;
use crate::session::SessionStore;

/// Application state: database handle, session store and configuration.
///
/// Cheap to clone; axum clones it per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: Arc<SessionStore>,
    pub config: StorefrontConfig,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database, config: StorefrontConfig) -> Self {
        AppState {
            db,
            sessions: Arc::new(SessionStore::new()),
            config,
        }
    }
}
