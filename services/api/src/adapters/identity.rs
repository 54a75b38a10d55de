//! services/api/src/adapters/identity.rs
//!
//! Verifies ID tokens with the identity provider's account lookup endpoint and
//! implements the `IdentityVerifier` port from the `core` crate.

use async_trait::async_trait;
use caseforge_core::domain::UserId;
use caseforge_core::ports::{IdentityVerifier, PortError, PortResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Deserialize)]
struct LookupError {
    error: LookupErrorBody,
}

#[derive(Deserialize)]
struct LookupErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct FirebaseIdentityAdapter {
    client: Client,
    lookup_url: String,
    api_key: String,
}

impl FirebaseIdentityAdapter {
    pub fn new(client: Client, base_url: &str, api_key: String) -> Self {
        Self {
            client,
            lookup_url: format!("{}/v1/accounts:lookup", base_url.trim_end_matches('/')),
            api_key,
        }
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseIdentityAdapter {
    async fn verify_token(&self, token: &str) -> PortResult<UserId> {
        let response = self
            .client
            .post(&self.lookup_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("identity lookup failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<LookupError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(PortError::Unauthorized(reason));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("identity lookup returned invalid JSON: {}", e)))?;

        lookup
            .users
            .into_iter()
            .next()
            .map(|user| UserId::new(user.local_id))
            .ok_or_else(|| PortError::Unauthorized("token does not belong to any account".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::{StatusCode, Uri},
        response::IntoResponse,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn spawn_provider() -> String {
        // The colon in the lookup path is served through the fallback route.
        let router = Router::new().fallback(
            |uri: Uri, Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                if uri.path() != "/v1/accounts:lookup" {
                    return StatusCode::NOT_FOUND.into_response();
                }
                if query.get("key").map(String::as_str) != Some("api-key") {
                    return (StatusCode::FORBIDDEN, Json(json!({ "error": { "message": "API_KEY_INVALID" } })))
                        .into_response();
                }
                match body["idToken"].as_str() {
                    Some("good-token") => Json(json!({ "users": [{ "localId": "uid-123" }] })).into_response(),
                    Some("orphan-token") => Json(json!({ "users": [] })).into_response(),
                    _ => (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": { "code": 400, "message": "INVALID_ID_TOKEN" } })),
                    )
                        .into_response(),
                }
            },
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn valid_token_yields_subject() {
        let base = spawn_provider().await;
        let adapter = FirebaseIdentityAdapter::new(Client::new(), &base, "api-key".to_string());
        assert_eq!(adapter.verify_token("good-token").await.unwrap(), UserId::new("uid-123"));
    }

    #[tokio::test]
    async fn rejected_token_carries_provider_reason() {
        let base = spawn_provider().await;
        let adapter = FirebaseIdentityAdapter::new(Client::new(), &base, "api-key".to_string());
        match adapter.verify_token("forged").await {
            Err(PortError::Unauthorized(reason)) => assert_eq!(reason, "INVALID_ID_TOKEN"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn token_without_account_is_unauthorized() {
        let base = spawn_provider().await;
        let adapter = FirebaseIdentityAdapter::new(Client::new(), &base, "api-key".to_string());
        assert!(matches!(
            adapter.verify_token("orphan-token").await,
            Err(PortError::Unauthorized(_))
        ));
    }
}
