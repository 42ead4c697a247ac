// Winks Companion Engine — Message Dispatcher
//
// Delivers one chat message to a replica. Context injection runs exactly
// once, before the first attempt; every retry resends the identical payload.
// Transient statuses (429 / 500 / 503) are retried up to MAX_RETRIES times
// with linear backoff. Auth failures, other API errors, and transport errors
// fail the call immediately.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};

use crate::atoms::constants::CHAT_SOURCE;
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::traits::ReplicaDirectory;
use crate::atoms::types::{ChatCompletionRequest, ChatResponse, QuestSnapshot};
use crate::engine::context::build_enhanced_message;
use crate::engine::http::{retry_delay, MAX_RETRIES};

pub struct MessageDispatcher {
    directory: Arc<dyn ReplicaDirectory>,
}

impl MessageDispatcher {
    pub fn new(directory: Arc<dyn ReplicaDirectory>) -> Self {
        MessageDispatcher { directory }
    }

    /// Send `message` to the replica, enriching question-like messages with
    /// persona, route, and quest-snapshot context.
    ///
    /// `route` is the page the user is on (path, e.g. `/quests/quiz`);
    /// `snapshot` is the caller-captured quest state, if any.
    pub async fn send(
        &self,
        replica_uuid: &str,
        message: &str,
        route: &str,
        snapshot: Option<&QuestSnapshot>,
    ) -> EngineResult<ChatResponse> {
        let (content, context_enhanced) = build_enhanced_message(message, route, snapshot);
        if context_enhanced {
            info!(
                "[engine] Question-like message — injecting context ({} chars total)",
                content.len()
            );
        }

        let request = ChatCompletionRequest {
            content,
            source: CHAT_SOURCE.to_string(),
            skip_chat_history: false,
        };

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = retry_delay(attempt - 1).await;
                warn!(
                    "[engine] Chat retry {}/{} after {}ms",
                    attempt,
                    MAX_RETRIES,
                    delay.as_millis()
                );
            }

            match self
                .directory
                .post_chat_completion(replica_uuid, &request)
                .await
            {
                Ok(reply) => {
                    return Ok(ChatResponse {
                        content: reply.content,
                        context_enhanced,
                        timestamp: Utc::now(),
                    });
                }
                Err(err) if err.is_transient() && attempt < MAX_RETRIES => {
                    error!("[engine] Chat attempt {} failed: {err}", attempt + 1);
                    continue;
                }
                Err(err) => {
                    error!("[engine] Chat failed on attempt {}: {err}", attempt + 1);
                    return Err(err.into());
                }
            }
        }

        // Unreachable: every loop arm returns.
        Err(EngineError::Other(
            "chat retry loop exited without a result".into(),
        ))
    }
}
