// Winks Companion Engine — Sensay Directory Client
// The one HTTP boundary in the crate. Every request is versioned and
// credentialed here, and every raw response is classified into the
// `DirectoryError` taxonomy before anything downstream sees it.
//
// Credential modes (per operation):
//   • organization-only  — account lookup / creation (X-ORGANIZATION-SECRET)
//   • organization+user  — replica listing / creation / chat (adds X-USER-ID)

use std::time::Duration;

use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::atoms::constants::{API_VERSION, DEFAULT_BASE_URL, HOST_USER_ID};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::traits::{DirectoryError, ReplicaDirectory};
use crate::atoms::types::{
    ChatCompletionRequest, ChatCompletionResponse, CreateReplicaRequest, CreateReplicaResponse,
    CreateUserRequest, Replica, ReplicaList, SensayConfig, User,
};
use crate::engine::http::{classify_status, truncate_utf8};

// ── Client struct ──────────────────────────────────────────────────────────

pub struct SensayDirectory {
    client: Client,
    base_url: String,
    organization_secret: String,
}

impl SensayDirectory {
    /// Build a client from explicit config.
    ///
    /// Fails with a configuration error when the organization secret is
    /// empty, before any request leaves the process.
    pub fn new(config: SensayConfig) -> EngineResult<Self> {
        if config.organization_secret.trim().is_empty() {
            return Err(EngineError::Config(
                "Sensay organization secret is not set".into(),
            ));
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(SensayDirectory {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organization_secret: config.organization_secret,
        })
    }

    /// Build a client from `SENSAY_ORG_SECRET` / `SENSAY_BASE_URL`.
    pub fn from_env() -> EngineResult<Self> {
        let organization_secret = std::env::var("SENSAY_ORG_SECRET").unwrap_or_default();
        let base_url =
            std::env::var("SENSAY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(SensayConfig {
            organization_secret,
            base_url,
        })
    }

    // ── Credential modes ───────────────────────────────────────────────────

    /// Organization-only mode: account operations not tied to an end user.
    fn org_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-ORGANIZATION-SECRET", &self.organization_secret)
            .header("X-API-Version", API_VERSION)
            .header("Content-Type", "application/json")
    }

    /// Organization+user mode: replica and chat operations scoped to the
    /// host account.
    fn user_request(&self, builder: RequestBuilder) -> RequestBuilder {
        self.org_request(builder).header("X-USER-ID", HOST_USER_ID)
    }

    // ── Request execution ──────────────────────────────────────────────────

    /// Send a prepared request and either deserialize the body or classify
    /// the failure. `what` names the operation in logs and error messages.
    async fn execute<T: DeserializeOwned>(
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, DirectoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::Network(format!("{what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = upstream_message(&body);
            error!(
                "[engine] Sensay error {} on {}: {}",
                status.as_u16(),
                what,
                truncate_utf8(&body, 500)
            );
            return Err(classify_status(
                status.as_u16(),
                format!("{what}: {detail}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::Network(format!("{what}: invalid response body: {e}")))
    }
}

/// Pull the human-readable message out of a JSON error body, falling back to
/// a truncated raw excerpt.
fn upstream_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    truncate_utf8(body, 200).to_string()
}

// ── ReplicaDirectory implementation ────────────────────────────────────────

#[async_trait]
impl ReplicaDirectory for SensayDirectory {
    async fn get_user(&self, user_id: &str) -> Result<User, DirectoryError> {
        let url = format!("{}/v1/users/{}", self.base_url, user_id);
        Self::execute(self.org_request(self.client.get(&url)), "get user").await
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, DirectoryError> {
        info!("[engine] Creating Sensay user '{}'", request.id);
        let url = format!("{}/v1/users", self.base_url);
        Self::execute(
            self.org_request(self.client.post(&url)).json(request),
            "create user",
        )
        .await
    }

    async fn list_replicas(&self) -> Result<ReplicaList, DirectoryError> {
        let url = format!("{}/v1/replicas", self.base_url);
        Self::execute(self.user_request(self.client.get(&url)), "list replicas").await
    }

    async fn create_replica(
        &self,
        request: &CreateReplicaRequest,
    ) -> Result<String, DirectoryError> {
        info!(
            "[engine] Creating replica '{}' (slug '{}')",
            request.name, request.slug
        );
        let url = format!("{}/v1/replicas", self.base_url);
        let created: CreateReplicaResponse = Self::execute(
            self.user_request(self.client.post(&url)).json(request),
            "create replica",
        )
        .await?;
        Ok(created.uuid)
    }

    async fn get_replica(&self, uuid: &str) -> Result<Replica, DirectoryError> {
        let url = format!("{}/v1/replicas/{}", self.base_url, uuid);
        Self::execute(self.user_request(self.client.get(&url)), "get replica").await
    }

    async fn post_chat_completion(
        &self,
        replica_uuid: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, DirectoryError> {
        let url = format!(
            "{}/v1/replicas/{}/chat/completions",
            self.base_url, replica_uuid
        );
        Self::execute(
            self.user_request(self.client.post(&url)).json(request),
            "chat completion",
        )
        .await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
