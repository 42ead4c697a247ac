// ── Winks Atoms: Constants ─────────────────────────────────────────────────
// Every named constant for the crate lives here so that identifiers shared
// with the remote service can be audited in one place.

// ── Sensay protocol ────────────────────────────────────────────────────────
// One protocol-version string, sent on every request. The service rejects
// unversioned calls, so changing this value is a wire-compatibility event.
pub(crate) const API_VERSION: &str = "2025-03-25";
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.sensay.io";

/// Source tag attached to every chat completion we post.
pub(crate) const CHAT_SOURCE: &str = "web";

// ── Host account ───────────────────────────────────────────────────────────
// The single end-user identity the whole application chats through.
// The remote side keys the account on this id — treat as a stable identifier.
pub(crate) const HOST_USER_ID: &str = "winks_quest_host";
pub(crate) const HOST_USER_NAME: &str = "Winks Quest Host";

// ── Replica identity ───────────────────────────────────────────────────────
// The well-known slug is how we find our replica again after a restart.
// Other replicas may exist under the same organization; selection falls back
// to the first listed entry when the slug is missing (see provisioner).
pub(crate) const REPLICA_SLUG: &str = "winks_v1";
pub(crate) const REPLICA_NAME: &str = "Winks";
pub(crate) const REPLICA_TYPE: &str = "character";
pub(crate) const REPLICA_TAGS: [&str; 3] = ["web3", "quests", "gamification"];

pub(crate) const REPLICA_SHORT_DESCRIPTION: &str =
    "Winks is the in-app companion for the Winks quest platform. It answers \
     questions about quests, quizzes, riddles, creative challenges, badges, \
     and referrals, and nudges players toward their next reward.";

pub(crate) const REPLICA_GREETING: &str =
    "Hey, I'm Winks! Ask me anything about quests, quizzes, riddles, badges, \
     or referrals — or just say gm.";

// ── Replica LLM configuration ──────────────────────────────────────────────
// Opaque to this crate: the block is passed through to the service verbatim
// at creation time and never interpreted locally.
pub(crate) const REPLICA_MODEL: &str = "claude-3-5-haiku-latest";
pub(crate) const REPLICA_MEMORY_MODE: &str = "rag-search";

pub(crate) const REPLICA_SYSTEM_MESSAGE: &str =
    "You are Winks, the companion bot of the Winks quest platform — a Web3 \
     gamification hub on BNB Chain where players earn points through quizzes, \
     riddles, creative challenges, and referrals. Keep answers short, \
     friendly, and concrete. Never give financial advice. When a player is \
     stuck on a puzzle, hint — do not reveal the answer outright.";
