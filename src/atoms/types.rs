// ── Winks Atoms: Core types ────────────────────────────────────────────────
// Data structures that flow through the engine: Sensay wire types (camelCase
// field names follow the service), the public chat result, and the explicit
// quest-state snapshot used for context injection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::atoms::constants::{
    HOST_USER_ID, REPLICA_GREETING, REPLICA_MEMORY_MODE, REPLICA_MODEL, REPLICA_NAME,
    REPLICA_SHORT_DESCRIPTION, REPLICA_SLUG, REPLICA_SYSTEM_MESSAGE, REPLICA_TAGS, REPLICA_TYPE,
};

// ── Client config ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensayConfig {
    /// Organization-wide API secret. Required.
    pub organization_secret: String,
    /// Service endpoint; defaults to the hosted Sensay API.
    pub base_url: String,
}

// ── Accounts ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
}

// ── Replicas ───────────────────────────────────────────────────────────────

/// LLM configuration block on a replica. Opaque pass-through: the engine
/// neither interprets nor validates these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaLlm {
    pub model: String,
    #[serde(rename = "memoryMode")]
    pub memory_mode: String,
    #[serde(rename = "systemMessage")]
    pub system_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replica {
    pub uuid: String,
    pub name: String,
    pub slug: String,
    pub greeting: String,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub llm: ReplicaLlm,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReplicaRequest {
    pub name: String,
    pub slug: String,
    pub greeting: String,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    pub llm: ReplicaLlm,
}

impl CreateReplicaRequest {
    /// The creation payload for the Winks quest-host replica: fixed identity
    /// plus the opaque LLM block, owner set to the host account.
    pub fn host_default() -> Self {
        CreateReplicaRequest {
            name: REPLICA_NAME.to_string(),
            slug: REPLICA_SLUG.to_string(),
            greeting: REPLICA_GREETING.to_string(),
            short_description: REPLICA_SHORT_DESCRIPTION.to_string(),
            owner_id: HOST_USER_ID.to_string(),
            kind: REPLICA_TYPE.to_string(),
            tags: REPLICA_TAGS.iter().map(|t| t.to_string()).collect(),
            llm: ReplicaLlm {
                model: REPLICA_MODEL.to_string(),
                memory_mode: REPLICA_MEMORY_MODE.to_string(),
                system_message: REPLICA_SYSTEM_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplicaList {
    pub items: Vec<Replica>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReplicaResponse {
    pub uuid: String,
}

// ── Chat ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub content: String,
    pub source: String,
    pub skip_chat_history: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub content: String,
}

/// Final result of one dispatch: the reply plus whether the outgoing message
/// was context-enhanced before delivery.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub context_enhanced: bool,
    pub timestamp: DateTime<Utc>,
}

// ── Quest-state snapshot ───────────────────────────────────────────────────
// Read-only view of whatever puzzle the player has in flight, captured by the
// caller at send time and passed in explicitly. The dispatcher only reads it
// and tolerates every field being absent.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub riddle: Option<RiddleProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative: Option<CreativeBrief>,
    /// Facts recently shown in the UI (e.g. quiz explanations).
    #[serde(default)]
    pub recent_facts: Vec<String>,
}

impl QuestSnapshot {
    pub fn is_empty(&self) -> bool {
        self.quiz.is_none()
            && self.riddle.is_none()
            && self.creative.is_none()
            && self.recent_facts.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizProgress {
    pub topic: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiddleProgress {
    pub prompt: String,
    #[serde(default)]
    pub hints_used: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeBrief {
    pub prompt: String,
    #[serde(default)]
    pub submitted: bool,
}
