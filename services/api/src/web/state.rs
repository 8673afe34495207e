//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use feedback_core::ports::{ReviewAnalysisService, ReviewStoreService, SessionStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStoreService>,
    pub analyzer: Arc<dyn ReviewAnalysisService>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
}
