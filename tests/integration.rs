// Winks Companion Engine — integration scenarios
//
// Provisioning and dispatch flows driven against an in-memory directory
// double. Backoff timings are asserted under tokio's paused clock, so the
// retry tests run instantly while still measuring the scheduled delays.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use winks_engine::{
    ChatCompletionRequest, ChatCompletionResponse, CreateReplicaRequest, CreateUserRequest,
    DirectoryError, EngineError, MessageDispatcher, QuestSnapshot, Replica, ReplicaDirectory,
    ReplicaList, ReplicaLlm, ReplicaProvisioner, User,
};

// ── Directory double ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct Calls {
    get_user: u32,
    create_user: u32,
    list_replicas: u32,
    create_replica: u32,
    get_replica: u32,
    chat: u32,
}

/// In-memory `ReplicaDirectory`: registers created users/replicas, replays a
/// scripted sequence of chat results, and counts every call.
#[derive(Default)]
struct MockDirectory {
    users: Mutex<Vec<User>>,
    replicas: Mutex<Vec<Replica>>,
    user_failure: Mutex<Option<DirectoryError>>,
    chat_script: Mutex<VecDeque<Result<ChatCompletionResponse, DirectoryError>>>,
    chat_requests: Mutex<Vec<ChatCompletionRequest>>,
    calls: Mutex<Calls>,
}

impl MockDirectory {
    fn empty() -> Self {
        MockDirectory::default()
    }

    fn with_user_and_replica(replica: Replica) -> Self {
        let mock = MockDirectory::default();
        mock.users.lock().push(User {
            id: "winks_quest_host".into(),
            name: Some("Winks Quest Host".into()),
        });
        mock.replicas.lock().push(replica);
        mock
    }

    fn with_chat_script(
        script: Vec<Result<ChatCompletionResponse, DirectoryError>>,
    ) -> Self {
        let mock = MockDirectory::default();
        *mock.chat_script.lock() = script.into();
        mock
    }

    fn failing_create_user(error: DirectoryError) -> Self {
        let mock = MockDirectory::default();
        *mock.user_failure.lock() = Some(error);
        mock
    }

    fn calls(&self) -> Calls {
        *self.calls.lock()
    }

    fn recorded_chat_contents(&self) -> Vec<String> {
        self.chat_requests
            .lock()
            .iter()
            .map(|r| r.content.clone())
            .collect()
    }
}

fn sample_replica(slug: &str, uuid: &str) -> Replica {
    Replica {
        uuid: uuid.into(),
        name: "Winks".into(),
        slug: slug.into(),
        greeting: "Hey, I'm Winks!".into(),
        short_description: "Quest companion".into(),
        owner_id: "winks_quest_host".into(),
        kind: "character".into(),
        tags: vec!["web3".into()],
        llm: ReplicaLlm {
            model: "claude-3-5-haiku-latest".into(),
            memory_mode: "rag-search".into(),
            system_message: "You are Winks.".into(),
        },
    }
}

fn transient(status: u16) -> DirectoryError {
    DirectoryError::Transient {
        status,
        message: format!("scripted {status}"),
    }
}

fn reply(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        content: content.into(),
    }
}

#[async_trait]
impl ReplicaDirectory for MockDirectory {
    async fn get_user(&self, user_id: &str) -> Result<User, DirectoryError> {
        self.calls.lock().get_user += 1;
        self.users
            .lock()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("user {user_id}")))
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User, DirectoryError> {
        self.calls.lock().create_user += 1;
        if let Some(error) = self.user_failure.lock().clone() {
            return Err(error);
        }
        let user = User {
            id: request.id.clone(),
            name: Some(request.name.clone()),
        };
        self.users.lock().push(user.clone());
        Ok(user)
    }

    async fn list_replicas(&self) -> Result<ReplicaList, DirectoryError> {
        self.calls.lock().list_replicas += 1;
        Ok(ReplicaList {
            items: self.replicas.lock().clone(),
        })
    }

    async fn create_replica(
        &self,
        request: &CreateReplicaRequest,
    ) -> Result<String, DirectoryError> {
        self.calls.lock().create_replica += 1;
        let uuid = format!("replica-{}", self.replicas.lock().len() + 1);
        let replica = Replica {
            uuid: uuid.clone(),
            name: request.name.clone(),
            slug: request.slug.clone(),
            greeting: request.greeting.clone(),
            short_description: request.short_description.clone(),
            owner_id: request.owner_id.clone(),
            kind: request.kind.clone(),
            tags: request.tags.clone(),
            llm: request.llm.clone(),
        };
        self.replicas.lock().push(replica);
        Ok(uuid)
    }

    async fn get_replica(&self, uuid: &str) -> Result<Replica, DirectoryError> {
        self.calls.lock().get_replica += 1;
        self.replicas
            .lock()
            .iter()
            .find(|r| r.uuid == uuid)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("replica {uuid}")))
    }

    async fn post_chat_completion(
        &self,
        _replica_uuid: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, DirectoryError> {
        self.calls.lock().chat += 1;
        self.chat_requests.lock().push(request.clone());
        self.chat_script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(reply("gm! ready for your next quest?")))
    }
}

// ── Provisioning scenarios ─────────────────────────────────────────────────

#[tokio::test]
async fn fresh_directory_provisions_user_then_replica() {
    let mock = Arc::new(MockDirectory::empty());
    let provisioner = ReplicaProvisioner::new(mock.clone());

    let replica = provisioner.ensure_replica().await.unwrap();

    assert_eq!(replica.slug, "winks_v1");
    assert_eq!(replica.owner_id, "winks_quest_host");
    let calls = mock.calls();
    assert_eq!(calls.create_user, 1);
    assert_eq!(calls.create_replica, 1);
    assert_eq!(calls.get_replica, 1);
}

#[tokio::test]
async fn existing_replica_is_reused_without_creation() {
    let mock = Arc::new(MockDirectory::with_user_and_replica(sample_replica(
        "winks_v1", "uuid-1",
    )));
    let provisioner = ReplicaProvisioner::new(mock.clone());

    let replica = provisioner.ensure_replica().await.unwrap();

    assert_eq!(replica.uuid, "uuid-1");
    let calls = mock.calls();
    assert_eq!(calls.create_user, 0);
    assert_eq!(calls.create_replica, 0);
}

#[tokio::test]
async fn repeated_calls_recheck_account_but_never_recreate() {
    let mock = Arc::new(MockDirectory::empty());
    let provisioner = ReplicaProvisioner::new(mock.clone());

    let first = provisioner.ensure_replica().await.unwrap();
    let second = provisioner.ensure_replica().await.unwrap();

    assert_eq!(first.uuid, second.uuid);
    let calls = mock.calls();
    // The account-existence check runs on every call; creation happened once.
    assert_eq!(calls.get_user, 2);
    assert_eq!(calls.create_user, 1);
    assert_eq!(calls.create_replica, 1);
}

#[tokio::test]
async fn slug_miss_falls_back_to_first_listed_replica() {
    let mock = Arc::new(MockDirectory::with_user_and_replica(sample_replica(
        "legacy_bot",
        "uuid-legacy",
    )));
    mock.replicas
        .lock()
        .push(sample_replica("beta_bot", "uuid-beta"));
    let provisioner = ReplicaProvisioner::new(mock.clone());

    let replica = provisioner.ensure_replica().await.unwrap();

    assert_eq!(replica.uuid, "uuid-legacy");
    assert_eq!(mock.calls().create_replica, 0);
}

#[tokio::test]
async fn account_creation_failure_aborts_provisioning() {
    let mock = Arc::new(MockDirectory::failing_create_user(
        DirectoryError::Permanent {
            status: 403,
            message: "organization secret rejected".into(),
        },
    ));
    let provisioner = ReplicaProvisioner::new(mock.clone());

    let result = provisioner.ensure_replica().await;

    match result {
        Err(EngineError::Directory(DirectoryError::Permanent { status, .. })) => {
            assert_eq!(status, 403)
        }
        other => panic!("expected permanent directory error, got {other:?}"),
    }
    let calls = mock.calls();
    // Provisioning stopped at the account step — no replica calls at all.
    assert_eq!(calls.list_replicas, 0);
    assert_eq!(calls.create_replica, 0);
}

#[tokio::test]
async fn concurrent_first_calls_create_exactly_one_replica() {
    let mock = Arc::new(MockDirectory::empty());
    let provisioner = Arc::new(ReplicaProvisioner::new(mock.clone()));

    let (a, b) = tokio::join!(provisioner.ensure_replica(), provisioner.ensure_replica());

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.uuid, b.uuid);
    let calls = mock.calls();
    assert_eq!(calls.create_user, 1);
    assert_eq!(calls.create_replica, 1);
}

// ── Dispatch scenarios ─────────────────────────────────────────────────────

#[tokio::test]
async fn question_gets_route_context_and_literal_suffix() {
    let mock = Arc::new(MockDirectory::with_chat_script(vec![Ok(reply(
        "BNB is the native token of BNB Chain.",
    ))]));
    let dispatcher = MessageDispatcher::new(mock.clone());

    let response = dispatcher
        .send("uuid-1", "What is BNB?", "/quests/quiz", None)
        .await
        .unwrap();

    assert!(response.context_enhanced);
    assert_eq!(response.content, "BNB is the native token of BNB Chain.");
    let sent = mock.recorded_chat_contents();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("quiz page"));
    assert!(sent[0].ends_with("User question: What is BNB?"));
}

#[tokio::test]
async fn statement_is_sent_verbatim() {
    let mock = Arc::new(MockDirectory::empty());
    let dispatcher = MessageDispatcher::new(mock.clone());

    let response = dispatcher
        .send("uuid-1", "gm frens", "/quests/quiz", None)
        .await
        .unwrap();

    assert!(!response.context_enhanced);
    let requests = mock.chat_requests.lock();
    assert_eq!(requests[0].content, "gm frens");
    assert_eq!(requests[0].source, "web");
    assert!(!requests[0].skip_chat_history);
}

#[tokio::test]
async fn snapshot_state_reaches_the_wire() {
    let mock = Arc::new(MockDirectory::empty());
    let dispatcher = MessageDispatcher::new(mock.clone());
    let snapshot = QuestSnapshot {
        riddle: Some(winks_engine::RiddleProgress {
            prompt: "I have keys but no locks".into(),
            hints_used: 1,
        }),
        ..QuestSnapshot::default()
    };

    dispatcher
        .send("uuid-1", "can I get a hint", "/quests/riddles", Some(&snapshot))
        .await
        .unwrap();

    let sent = mock.recorded_chat_contents();
    assert!(sent[0].contains("Active riddle: I have keys but no locks (hints used: 1)"));
    assert!(sent[0].contains("riddles page"));
}

#[tokio::test(start_paused = true)]
async fn transient_errors_retry_with_linear_backoff() {
    let mock = Arc::new(MockDirectory::with_chat_script(vec![
        Err(transient(503)),
        Err(transient(503)),
        Ok(reply("third time lucky")),
    ]));
    let dispatcher = MessageDispatcher::new(mock.clone());

    let start = tokio::time::Instant::now();
    let response = dispatcher
        .send("uuid-1", "What is BNB?", "/quests/quiz", None)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.content, "third time lucky");
    assert_eq!(mock.calls().chat, 3);
    // 1s before the first retry, 2s before the second.
    assert!(elapsed >= Duration::from_millis(3_000));
    assert!(elapsed < Duration::from_millis(3_500));
}

#[tokio::test(start_paused = true)]
async fn retries_resend_the_identical_payload() {
    let mock = Arc::new(MockDirectory::with_chat_script(vec![
        Err(transient(500)),
        Ok(reply("ok")),
    ]));
    let dispatcher = MessageDispatcher::new(mock.clone());

    dispatcher
        .send("uuid-1", "how do badges work", "/quests", None)
        .await
        .unwrap();

    let sent = mock.recorded_chat_contents();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test(start_paused = true)]
async fn transient_exhaustion_fails_after_four_attempts() {
    let mock = Arc::new(MockDirectory::with_chat_script(vec![
        Err(transient(503)),
        Err(transient(503)),
        Err(transient(503)),
        Err(transient(503)),
    ]));
    let dispatcher = MessageDispatcher::new(mock.clone());

    let start = tokio::time::Instant::now();
    let result = dispatcher
        .send("uuid-1", "What is BNB?", "/quests/quiz", None)
        .await;
    let elapsed = start.elapsed();

    match result {
        Err(EngineError::Directory(DirectoryError::Transient { status, .. })) => {
            assert_eq!(status, 503)
        }
        other => panic!("expected transient directory error, got {other:?}"),
    }
    assert_eq!(mock.calls().chat, 4);
    // 1s + 2s + 3s of backoff across the three retries.
    assert!(elapsed >= Duration::from_millis(6_000));
    assert!(elapsed < Duration::from_millis(6_500));
}

#[tokio::test]
async fn auth_failure_is_not_retried() {
    let mock = Arc::new(MockDirectory::with_chat_script(vec![Err(
        DirectoryError::Permanent {
            status: 401,
            message: "invalid organization secret".into(),
        },
    )]));
    let dispatcher = MessageDispatcher::new(mock.clone());

    let result = dispatcher
        .send("uuid-1", "What is BNB?", "/quests/quiz", None)
        .await;

    match result {
        Err(EngineError::Directory(DirectoryError::Permanent { status, .. })) => {
            assert_eq!(status, 401)
        }
        other => panic!("expected permanent directory error, got {other:?}"),
    }
    assert_eq!(mock.calls().chat, 1);
}

#[tokio::test]
async fn network_failure_is_not_retried() {
    let mock = Arc::new(MockDirectory::with_chat_script(vec![Err(
        DirectoryError::Network("connection reset by peer".into()),
    )]));
    let dispatcher = MessageDispatcher::new(mock.clone());

    let result = dispatcher.send("uuid-1", "help", "/quests", None).await;

    match result {
        Err(EngineError::Directory(DirectoryError::Network(message))) => {
            assert!(message.contains("connection reset"))
        }
        other => panic!("expected network error, got {other:?}"),
    }
    assert_eq!(mock.calls().chat, 1);
}
