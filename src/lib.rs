// Winks Companion Engine — chat core for the Winks quest platform
//
// Provisions the "Winks" replica against the Sensay directory service and
// dispatches context-enhanced chat messages with bounded retry.
//
// Layering (one-way dependency rule):
//   atoms  — constants, types, errors, the directory seam; no I/O
//   engine — HTTP boundary, context injection, provisioning, dispatch

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult};
pub use atoms::traits::{DirectoryError, ReplicaDirectory};
pub use atoms::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatResponse, CreateReplicaRequest,
    CreateUserRequest, CreativeBrief, QuestSnapshot, QuizProgress, Replica, ReplicaList,
    ReplicaLlm, RiddleProgress, SensayConfig, User,
};
pub use engine::context::{build_enhanced_message, is_question_like};
pub use engine::dispatcher::MessageDispatcher;
pub use engine::http::{is_retryable_status, MAX_RETRIES};
pub use engine::provisioner::ReplicaProvisioner;
pub use engine::sensay::SensayDirectory;
