// ── Winks Atoms: Directory Seam ────────────────────────────────────────────
// The golden trait every replica directory backend implements, plus the
// tagged error taxonomy produced at that boundary.
//
// Downstream code (provisioner, dispatcher) matches on `DirectoryError`
// variants only — raw HTTP statuses are classified once, at the client, and
// never inspected again.

use async_trait::async_trait;
use thiserror::Error;

use crate::atoms::types::{
    ChatCompletionRequest, ChatCompletionResponse, CreateReplicaRequest, CreateUserRequest,
    Replica, ReplicaList, User,
};

// ── Error taxonomy ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The requested record does not exist. Expected during first-run
    /// provisioning; callers treat it as "create it now", not as a failure.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A retryable upstream failure (HTTP 429 / 500 / 503).
    #[error("Transient service error {status}: {message}")]
    Transient { status: u16, message: String },

    /// Any other structured HTTP failure (401/403 auth errors included).
    /// Never retried.
    #[error("Service error {status}: {message}")]
    Permanent { status: u16, message: String },

    /// Transport-level failure with no structured status. Never retried.
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials or endpoint configuration missing — raised before any
    /// request leaves the process.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DirectoryError {
    /// Whether the dispatcher's retry budget applies to this failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, DirectoryError::Transient { .. })
    }

    /// The upstream HTTP status, for structured failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            DirectoryError::Transient { status, .. } | DirectoryError::Permanent { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

// ── The directory trait ────────────────────────────────────────────────────

/// Remote user/replica registry and chat endpoint.
///
/// Production backend is `engine::sensay::SensayDirectory`; tests substitute
/// an in-memory double. Credential scoping (organization-only vs
/// organization+user) and protocol versioning are the implementation's
/// responsibility — callers see only these six operations.
#[async_trait]
pub trait ReplicaDirectory: Send + Sync {
    /// Look up the host account by its fixed id.
    async fn get_user(&self, user_id: &str) -> Result<User, DirectoryError>;

    /// Create the host account.
    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, DirectoryError>;

    /// List every replica visible to the host account's credentials.
    async fn list_replicas(&self) -> Result<ReplicaList, DirectoryError>;

    /// Create a replica; returns its assigned uuid.
    async fn create_replica(&self, request: &CreateReplicaRequest)
        -> Result<String, DirectoryError>;

    /// Fetch the full replica record for a uuid.
    async fn get_replica(&self, uuid: &str) -> Result<Replica, DirectoryError>;

    /// Post one chat message to a replica and return its reply.
    async fn post_chat_completion(
        &self,
        replica_uuid: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, DirectoryError>;
}
