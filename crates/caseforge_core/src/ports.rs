//! crates/caseforge_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the identity provider, the generator and the database.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CaseStudyRecord, GenerationRequest, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Upstream service failed: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies a bearer credential and returns the subject it was issued to.
    async fn verify_token(&self, token: &str) -> PortResult<UserId>;
}

#[async_trait]
pub trait CaseStudyGenerator: Send + Sync {
    /// Forwards the parameters verbatim and returns the generator's JSON verbatim.
    async fn generate(&self, parameters: &Value) -> PortResult<Value>;
}

#[async_trait]
pub trait CaseStudySubmitter: Send + Sync {
    /// Sends one form submission to the generation endpoint.
    async fn submit(&self, request: &GenerationRequest) -> PortResult<Value>;
}

#[async_trait]
pub trait CaseStudyStore: Send + Sync {
    /// Appends a record under the user's partition with a fresh key and a server timestamp.
    async fn save_case_study(&self, user_id: &UserId, data: Value) -> PortResult<CaseStudyRecord>;

    /// Returns every record in the user's partition, in key order.
    async fn list_case_studies(&self, user_id: &UserId) -> PortResult<Vec<CaseStudyRecord>>;
}
