//! services/api/src/adapters/generator.rs
//!
//! HTTP adapter for the external case-study generator. It implements both the
//! backend's `CaseStudyGenerator` port and the form's `CaseStudySubmitter` port,
//! since both send one `POST /generate` with a `{ "parameters": ... }` body.

use async_trait::async_trait;
use caseforge_core::domain::{GenerateEnvelope, GenerationRequest};
use caseforge_core::ports::{CaseStudyGenerator, CaseStudySubmitter, PortError, PortResult};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct HttpGeneratorAdapter {
    client: Client,
    endpoint: String,
}

impl HttpGeneratorAdapter {
    /// Creates a new adapter for the generator at `base_url`. Without a timeout a
    /// hung generator holds the calling request open indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: format!("{}/generate", base_url.trim_end_matches('/')),
        })
    }

    async fn post_parameters<T: serde::Serialize + Sync>(&self, parameters: &T) -> PortResult<Value> {
        info!("Calling generator at {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateEnvelope { parameters })
            .send()
            .await
            .map_err(|e| PortError::Upstream(format!("generator request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generator returned {}: {}", status, body);
            return Err(PortError::Upstream(error_message(status.as_u16(), &body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Upstream(format!("generator returned invalid JSON: {}", e)))?;
        debug!("Generator response received");
        Ok(body)
    }
}

/// Prefers the generator's own `error` field over the raw body.
fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    format!("generator responded with status {}: {}", status, detail)
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl CaseStudyGenerator for HttpGeneratorAdapter {
    async fn generate(&self, parameters: &Value) -> PortResult<Value> {
        self.post_parameters(parameters).await
    }
}

#[async_trait]
impl CaseStudySubmitter for HttpGeneratorAdapter {
    async fn submit(&self, request: &GenerationRequest) -> PortResult<Value> {
        self.post_parameters(request).await
    }
}
