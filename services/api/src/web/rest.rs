//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::error::WebError;
use crate::web::state::{AppState, AuthenticatedUser};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use caseforge_core::domain::CaseStudyRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

const GENERATE_FAILED: &str = "Failed to generate or store case study";
const RETRIEVE_FAILED: &str = "Failed to retrieve case studies";
const NO_CASE_STUDIES: &str = "No case studies found";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate_case_study_handler,
        user_case_studies_handler,
    ),
    components(
        schemas(
            GenerateCaseStudyRequest,
            GenerateCaseStudyResponse,
            CaseStudiesResponse,
            NoCaseStudiesResponse,
            ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "CaseForge API", description = "Case study generation proxy and per-user history.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme the protected paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The body of `POST /generate-case-study`. `parameters` is forwarded untouched.
#[derive(Deserialize, ToSchema)]
pub struct GenerateCaseStudyRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub parameters: Value,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCaseStudyResponse {
    pub success: bool,
    pub case_study_id: String,
    /// The generator's response, unchanged.
    #[schema(value_type = Object)]
    pub data: Value,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudiesResponse {
    /// Stored records keyed by their push identifier.
    #[schema(value_type = Object)]
    pub case_studies: Map<String, Value>,
}

#[derive(Serialize, ToSchema)]
pub struct NoCaseStudiesResponse {
    pub message: String,
}

/// Shape of every error body. `details` is present on 500s only.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Generate a case study and store it under the caller's account.
///
/// The record is persisted before the response is sent, so a success response
/// always has a stored record behind it. A body that is not a JSON object
/// forwards `null` parameters and leaves validation to the generator.
#[utoipa::path(
    post,
    path = "/generate-case-study",
    request_body = GenerateCaseStudyRequest,
    responses(
        (status = 200, description = "Case study generated and stored", body = GenerateCaseStudyResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 500, description = "Generation or persistence failed", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn generate_case_study_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<GenerateCaseStudyRequest>, JsonRejection>,
) -> Result<Json<GenerateCaseStudyResponse>, WebError> {
    let parameters = match body {
        Ok(Json(req)) => req.parameters,
        Err(rejection) => {
            warn!("Unreadable request body, forwarding null parameters: {}", rejection);
            Value::Null
        }
    };
    let failed = |e: caseforge_core::PortError| WebError::Failed {
        error: GENERATE_FAILED,
        details: e.to_string(),
    };

    info!("Calling generator for user {}", user.uid);
    let data = app_state
        .generator
        .generate(&parameters)
        .await
        .map_err(failed)?;

    let record = app_state
        .store
        .save_case_study(&user.uid, data.clone())
        .await
        .map_err(failed)?;
    info!("Case study stored with ID: {}", record.id);

    Ok(Json(GenerateCaseStudyResponse {
        success: true,
        case_study_id: record.id,
        data,
    }))
}

/// List every case study stored for the caller.
#[utoipa::path(
    get,
    path = "/user-case-studies",
    responses(
        (status = 200, description = "The caller's case studies keyed by ID, or a 'No case studies found' message", body = CaseStudiesResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 500, description = "Retrieval failed", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn user_case_studies_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, WebError> {
    let records = app_state
        .store
        .list_case_studies(&user.uid)
        .await
        .map_err(|e| WebError::Failed {
            error: RETRIEVE_FAILED,
            details: e.to_string(),
        })?;

    if records.is_empty() {
        return Ok(Json(NoCaseStudiesResponse {
            message: NO_CASE_STUDIES.to_string(),
        })
        .into_response());
    }

    let case_studies = records
        .into_iter()
        .map(|record| (record.id.clone(), stored_view(record)))
        .collect();

    Ok(Json(CaseStudiesResponse { case_studies }).into_response())
}

/// The stored layout: the generator's fields plus `createdAt` in epoch milliseconds.
fn stored_view(record: CaseStudyRecord) -> Value {
    let created_at = json!(record.created_at.timestamp_millis());
    match record.data {
        Value::Object(mut fields) => {
            fields.insert("createdAt".to_string(), created_at);
            Value::Object(fields)
        }
        other => json!({ "data": other, "createdAt": created_at }),
    }
}
