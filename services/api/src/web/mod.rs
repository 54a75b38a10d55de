pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::require_auth;
pub use rest::{generate_case_study_handler, health_handler, user_case_studies_handler};
pub use state::AppState;

/// Builds the API router. Everything except `/health` sits behind `require_auth`.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(health_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/generate-case-study", post(generate_case_study_handler))
        .route("/user-case-studies", get(user_case_studies_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use caseforge_core::domain::{CaseStudyRecord, UserId};
    use caseforge_core::ports::{
        CaseStudyGenerator, CaseStudyStore, IdentityVerifier, PortError, PortResult,
    };
    use caseforge_core::push_id::PushIdGenerator;
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    //=====================================================================================
    // In-memory fakes for the ports
    //=====================================================================================

    /// Accepts `token-<uid>` and rejects everything else.
    #[derive(Default)]
    struct FakeIdentity {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IdentityVerifier for FakeIdentity {
        async fn verify_token(&self, token: &str) -> PortResult<UserId> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(token.to_string());
            token
                .strip_prefix("token-")
                .map(UserId::new)
                .ok_or_else(|| PortError::Unauthorized("INVALID_ID_TOKEN".to_string()))
        }
    }

    struct FakeGenerator {
        calls: AtomicUsize,
        received: Mutex<Vec<Value>>,
        response: Result<Value, String>,
    }

    impl FakeGenerator {
        fn returning(response: Result<Value, String>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl CaseStudyGenerator for FakeGenerator {
        async fn generate(&self, parameters: &Value) -> PortResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.received.lock().unwrap().push(parameters.clone());
            self.response.clone().map_err(PortError::Upstream)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        calls: AtomicUsize,
        records: Mutex<Vec<CaseStudyRecord>>,
        ids: PushIdGenerator,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl CaseStudyStore for MemoryStore {
        async fn save_case_study(&self, user_id: &UserId, data: Value) -> PortResult<CaseStudyRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.fail_with {
                return Err(PortError::Unexpected(message.clone()));
            }
            let record = CaseStudyRecord {
                id: self.ids.generate(),
                user_id: user_id.clone(),
                data,
                created_at: Utc::now(),
            };
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn list_case_studies(&self, user_id: &UserId) -> PortResult<Vec<CaseStudyRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = &self.fail_with {
                return Err(PortError::Unexpected(message.clone()));
            }
            let mut records: Vec<_> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| &r.user_id == user_id)
                .cloned()
                .collect();
            records.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(records)
        }
    }

    struct Harness {
        identity: Arc<FakeIdentity>,
        generator: Arc<FakeGenerator>,
        store: Arc<MemoryStore>,
        router: Router,
    }

    fn harness_with(generator: FakeGenerator, store: MemoryStore) -> Harness {
        let identity = Arc::new(FakeIdentity::default());
        let generator = Arc::new(generator);
        let store = Arc::new(store);
        let router = build_router(Arc::new(AppState {
            identity: identity.clone(),
            generator: generator.clone(),
            store: store.clone(),
        }));
        Harness { identity, generator, store, router }
    }

    fn harness() -> Harness {
        harness_with(
            FakeGenerator::returning(Ok(generated())),
            MemoryStore::default(),
        )
    }

    fn generated() -> Value {
        json!({
            "case_study": "Describe:\nSteps tracking.\n\nGoals:\nRetention.",
            "questions_and_answers": [{ "question": "Why?", "answer": "Because." }],
            "metadata": { "num_qa_pairs": 1 },
        })
    }

    fn generate_request(auth: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/generate-case-study")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn list_request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/user-case-studies");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn downstream_calls(h: &Harness) -> usize {
        h.generator.calls.load(Ordering::SeqCst) + h.store.calls.load(Ordering::SeqCst)
    }

    //=====================================================================================
    // Auth gate
    //=====================================================================================

    #[tokio::test]
    async fn missing_header_is_rejected_without_downstream_calls() {
        let h = harness();
        for request in [generate_request(None, json!({ "parameters": {} })), list_request(None)] {
            let (status, body) = send(&h.router, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({ "error": "No token provided" }));
        }
        assert_eq!(h.identity.calls.load(Ordering::SeqCst), 0);
        assert_eq!(downstream_calls(&h), 0);
    }

    #[tokio::test]
    async fn empty_credential_counts_as_missing() {
        let h = harness();
        for auth in ["", "Bearer ", "Bearer   "] {
            let (status, body) = send(&h.router, list_request(Some(auth))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({ "error": "No token provided" }));
        }
        assert_eq!(h.identity.calls.load(Ordering::SeqCst), 0);
        assert_eq!(downstream_calls(&h), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_without_downstream_calls() {
        let h = harness();
        for request in [
            generate_request(Some("Bearer forged"), json!({ "parameters": {} })),
            list_request(Some("Bearer forged")),
        ] {
            let (status, body) = send(&h.router, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({ "error": "Invalid or expired token" }));
        }
        assert_eq!(downstream_calls(&h), 0);
    }

    #[tokio::test]
    async fn bearer_prefix_is_optional() {
        let h = harness();
        let (status, _) = send(&h.router, list_request(Some("token-alice"))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&h.router, list_request(Some("Bearer token-alice"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            *h.identity.seen.lock().unwrap(),
            vec!["token-alice".to_string(), "token-alice".to_string()]
        );
    }

    #[tokio::test]
    async fn health_needs_no_credential() {
        let h = harness();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    //=====================================================================================
    // Proxy/persistence route
    //=====================================================================================

    #[tokio::test]
    async fn successful_generation_is_stored_and_returned() {
        let h = harness();
        let parameters = json!({ "interviewRole": "Other", "customInterviewRole": "Chief of Staff" });

        let (status, body) = send(
            &h.router,
            generate_request(Some("Bearer token-alice"), json!({ "parameters": parameters })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], generated());
        let id = body["caseStudyId"].as_str().unwrap();
        assert!(!id.is_empty());

        assert_eq!(*h.generator.received.lock().unwrap(), vec![parameters]);
        let records = h.store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].user_id, UserId::new("alice"));
        assert_eq!(records[0].data, generated());
    }

    #[tokio::test]
    async fn unreadable_body_forwards_null_parameters() {
        let h = harness();
        let form_encoded = Request::builder()
            .method("POST")
            .uri("/generate-case-study")
            .header(header::AUTHORIZATION, "Bearer token-alice")
            .body(Body::from("parameters=x"))
            .unwrap();
        let malformed_json = Request::builder()
            .method("POST")
            .uri("/generate-case-study")
            .header(header::AUTHORIZATION, "Bearer token-alice")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        for request in [form_encoded, malformed_json] {
            let (status, body) = send(&h.router, request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
        }

        assert_eq!(*h.generator.received.lock().unwrap(), vec![Value::Null, Value::Null]);
        assert_eq!(h.store.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn generator_failure_is_a_500_with_its_message() {
        let h = harness_with(
            FakeGenerator::returning(Err("generator responded with status 500: model offline".into())),
            MemoryStore::default(),
        );

        let (status, body) = send(
            &h.router,
            generate_request(Some("Bearer token-alice"), json!({ "parameters": {} })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate or store case study");
        assert!(body["details"].as_str().unwrap().contains("model offline"));
        assert_eq!(h.store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn persistence_failure_is_a_500_not_a_success() {
        let h = harness_with(
            FakeGenerator::returning(Ok(generated())),
            MemoryStore {
                fail_with: Some("connection reset".to_string()),
                ..Default::default()
            },
        );

        let (status, body) = send(
            &h.router,
            generate_request(Some("Bearer token-alice"), json!({ "parameters": {} })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("connection reset"));
        assert!(body.get("success").is_none());
    }

    //=====================================================================================
    // Retrieval route
    //=====================================================================================

    #[tokio::test]
    async fn empty_partition_reports_no_case_studies() {
        let h = harness();
        let (status, body) = send(&h.router, list_request(Some("Bearer token-alice"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "No case studies found" }));
    }

    #[tokio::test]
    async fn retrieval_returns_only_the_callers_records() {
        let h = harness();
        for token in ["Bearer token-alice", "Bearer token-alice", "Bearer token-bob"] {
            let (status, _) = send(
                &h.router,
                generate_request(Some(token), json!({ "parameters": {} })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&h.router, list_request(Some("Bearer token-alice"))).await;
        assert_eq!(status, StatusCode::OK);
        let case_studies = body["caseStudies"].as_object().unwrap();
        assert_eq!(case_studies.len(), 2);

        let alice_ids: Vec<String> = h
            .store
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == UserId::new("alice"))
            .map(|r| r.id.clone())
            .collect();
        for id in &alice_ids {
            let stored = &case_studies[id.as_str()];
            assert_eq!(stored["case_study"], generated()["case_study"]);
            assert!(stored["createdAt"].is_i64());
        }

        let (_, bob) = send(&h.router, list_request(Some("Bearer token-bob"))).await;
        assert_eq!(bob["caseStudies"].as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retrieval_failure_is_a_500() {
        let h = harness_with(
            FakeGenerator::returning(Ok(generated())),
            MemoryStore {
                fail_with: Some("timeout".to_string()),
                ..Default::default()
            },
        );
        let (status, body) = send(&h.router, list_request(Some("Bearer token-alice"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to retrieve case studies");
    }
}
