//! crates/caseforge_core/src/handoff.rs
//!
//! Single-slot storage that carries one generation result from the form view
//! to the result view.

use serde_json::Value;
use std::sync::Mutex;

use crate::domain::GenerationResult;

/// The fixed key the result blob lives under.
pub const HANDOFF_KEY: &str = "caseStudyData";

/// Holds at most one JSON blob. Writing replaces; nothing expires.
#[derive(Default)]
pub struct HandoffSlot {
    blob: Mutex<Option<String>>,
}

impl HandoffSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, body: &Value) {
        let mut blob = self.blob.lock().unwrap_or_else(|e| e.into_inner());
        *blob = Some(body.to_string());
    }

    pub fn read_raw(&self) -> Option<String> {
        self.blob.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Parses the stored blob. Missing or malformed data yields `None`.
    pub fn read(&self) -> Option<GenerationResult> {
        let raw = self.read_raw()?;
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Discarding unreadable hand-off blob: {}", e);
                None
            }
        }
    }
}
