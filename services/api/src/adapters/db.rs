//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CaseStudyStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use caseforge_core::domain::{CaseStudyRecord, UserId};
use caseforge_core::ports::{CaseStudyStore, PortError, PortResult};
use caseforge_core::push_id::PushIdGenerator;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CaseStudyStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
    ids: Arc<PushIdGenerator>,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ids: Arc::new(PushIdGenerator::new()),
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct CaseStudyRow {
    id: String,
    user_id: String,
    data: Value,
    created_at: DateTime<Utc>,
}
impl CaseStudyRow {
    fn to_domain(self) -> CaseStudyRecord {
        CaseStudyRecord {
            id: self.id,
            user_id: UserId::new(self.user_id),
            data: self.data,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `CaseStudyStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CaseStudyStore for DbAdapter {
    async fn save_case_study(&self, user_id: &UserId, data: Value) -> PortResult<CaseStudyRecord> {
        // created_at comes from the database clock, not the caller's.
        let record = sqlx::query_as::<_, CaseStudyRow>(
            "INSERT INTO case_studies (id, user_id, data) VALUES ($1, $2, $3) \
             RETURNING id, user_id, data, created_at",
        )
        .bind(self.ids.generate())
        .bind(user_id.as_str())
        .bind(&data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn list_case_studies(&self, user_id: &UserId) -> PortResult<Vec<CaseStudyRecord>> {
        let records = sqlx::query_as::<_, CaseStudyRow>(
            "SELECT id, user_id, data, created_at FROM case_studies \
             WHERE user_id = $1 ORDER BY id COLLATE \"C\" ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let case_studies = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(case_studies)
    }
}
