//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-request identity.

use caseforge_core::domain::UserId;
use caseforge_core::ports::{CaseStudyGenerator, CaseStudyStore, IdentityVerifier};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// Requests share no mutable state; each one only reads these handles.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityVerifier>,
    pub generator: Arc<dyn CaseStudyGenerator>,
    pub store: Arc<dyn CaseStudyStore>,
}

//=========================================================================================
// AuthenticatedUser (Specific to One Request)
//=========================================================================================

/// Inserted into the request extensions by `require_auth` once the bearer
/// credential has been verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub uid: UserId,
}
