use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use teambox_api::api::ChatApi;
use teambox_api::error::ApiError;
use teambox_api::models::{Attachment, ChatGroup, ChatMessage, MessageKind, Reaction};
use teambox_api::realtime::{RealtimeEvent, RoomControl};
use teambox_api::session::{ChatSession, SessionChange};
use teambox_api::timeline::TimelineState;

fn message(id: &str, group_id: &str, sender_id: &str, content: &str, seconds: i64) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        group_id: group_id.to_string(),
        sender_id: sender_id.to_string(),
        sender_name: sender_id.to_uppercase(),
        content: content.to_string(),
        kind: MessageKind::Text,
        created_at: Utc.timestamp_opt(seconds, 0).unwrap(),
        attachments: Vec::new(),
        reactions: Vec::new(),
    }
}

#[derive(Default)]
struct MockState {
    history: HashMap<String, Vec<ChatMessage>>,
    history_fails: bool,
    send_results: VecDeque<Result<ChatMessage, ApiError>>,
}

#[derive(Clone, Default)]
struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    fn with_history(self, group_id: &str, page: Vec<ChatMessage>) -> Self {
        self.state
            .lock()
            .unwrap()
            .history
            .insert(group_id.to_string(), page);
        self
    }

    fn queue_send(&self, result: Result<ChatMessage, ApiError>) {
        self.state.lock().unwrap().send_results.push_back(result);
    }

    fn fail_history(&self, fails: bool) {
        self.state.lock().unwrap().history_fails = fails;
    }
}

#[async_trait]
impl ChatApi for MockApi {
    async fn get_groups(&self) -> Result<Vec<ChatGroup>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_group(&self, _group_id: &str) -> Result<ChatGroup, ApiError> {
        Err(ApiError::Application("not implemented".to_string()))
    }

    async fn get_messages(&self, group_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.history_fails {
            return Err(ApiError::Application("history unavailable".to_string()));
        }
        Ok(state.history.get(group_id).cloned().unwrap_or_default())
    }

    async fn send_message(
        &self,
        _group_id: &str,
        _content: &str,
        _attachments: &[Attachment],
    ) -> Result<ChatMessage, ApiError> {
        self.state
            .lock()
            .unwrap()
            .send_results
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Application("no canned send result".to_string())))
    }

    async fn add_members(&self, _group_id: &str, _user_ids: &[String]) -> Result<(), ApiError> {
        Ok(())
    }

    async fn remove_member(&self, _group_id: &str, _user_id: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MockRooms {
    log: Arc<Mutex<Vec<String>>>,
}

impl MockRooms {
    fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl RoomControl for MockRooms {
    fn join_room(&self, room_id: &str) {
        self.log.lock().unwrap().push(format!("join:{}", room_id));
    }

    fn leave_room(&self, room_id: &str) {
        self.log.lock().unwrap().push(format!("leave:{}", room_id));
    }
}

fn ids(session: &ChatSession<MockApi, MockRooms>) -> Vec<String> {
    session
        .timeline()
        .unwrap()
        .messages()
        .map(|m| m.id.clone())
        .collect()
}

#[tokio::test]
async fn test_open_group_joins_room_and_loads_history() {
    let api = MockApi::default().with_history(
        "g1",
        vec![
            message("m1", "g1", "bob", "hi", 10),
            message("m2", "g1", "bob", "again", 20),
        ],
    );
    let rooms = MockRooms::default();
    let mut session = ChatSession::new(api, rooms.clone(), "alice", "Alice");

    session.open_group("g1").await.unwrap();

    assert_eq!(rooms.entries(), ["join:g1"]);
    assert_eq!(ids(&session), ["m2", "m1"]);
    assert_eq!(
        session.timeline().unwrap().state(),
        TimelineState::Ready
    );
}

#[tokio::test]
async fn test_switching_groups_leaves_previous_room_and_clears() {
    let api = MockApi::default()
        .with_history("g1", vec![message("m1", "g1", "bob", "hi", 10)])
        .with_history("g2", vec![message("m9", "g2", "bob", "other", 10)]);
    let rooms = MockRooms::default();
    let mut session = ChatSession::new(api, rooms.clone(), "alice", "Alice");

    session.open_group("g1").await.unwrap();
    session.open_group("g2").await.unwrap();

    assert_eq!(rooms.entries(), ["join:g1", "leave:g1", "join:g2"]);
    assert_eq!(ids(&session), ["m9"]);
}

#[tokio::test]
async fn test_history_failure_marks_timeline_failed() {
    let api = MockApi::default();
    api.fail_history(true);
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");

    let result = session.open_group("g1").await;

    assert!(result.is_err());
    assert_eq!(
        session.timeline().unwrap().state(),
        TimelineState::Failed
    );
    assert!(session.timeline().unwrap().is_empty());
}

#[tokio::test]
async fn test_send_success_promotes_optimistic_entry() {
    let api = MockApi::default().with_history("g1", vec![message("m1", "g1", "bob", "hi", 10)]);
    api.queue_send(Ok(message("m2", "g1", "alice", "hello", 30)));
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");

    session.open_group("g1").await.unwrap();
    let confirmed = session.send("hello", Vec::new()).await.unwrap();

    assert_eq!(confirmed.id, "m2");
    assert_eq!(ids(&session), ["m2", "m1"]);
    assert!(!session
        .timeline()
        .unwrap()
        .entries()
        .iter()
        .any(|entry| entry.is_pending()));
}

#[tokio::test]
async fn test_send_failure_rolls_back_optimistic_entry() {
    let api = MockApi::default().with_history("g1", vec![message("m1", "g1", "bob", "hi", 10)]);
    api.queue_send(Err(ApiError::Application("quota exceeded".to_string())));
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");

    session.open_group("g1").await.unwrap();
    let before = ids(&session);

    let result = session.send("doomed", Vec::new()).await;

    assert!(result.is_err());
    assert_eq!(ids(&session), before);
}

#[tokio::test]
async fn test_send_without_open_group_is_rejected() {
    let api = MockApi::default();
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");

    let result = session.send("hello", Vec::new()).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn test_events_for_other_groups_are_ignored() {
    let api = MockApi::default().with_history("g1", vec![]);
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");
    session.open_group("g1").await.unwrap();

    let change = session
        .handle_event(&RealtimeEvent::MessageCreated(message(
            "m1", "g2", "bob", "elsewhere", 10,
        )))
        .await
        .unwrap();

    assert_eq!(change, SessionChange::None);
    assert!(session.timeline().unwrap().is_empty());
}

#[tokio::test]
async fn test_message_event_inserts_and_reports_scroll() {
    let api = MockApi::default().with_history("g1", vec![]);
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");
    session.open_group("g1").await.unwrap();

    let event = RealtimeEvent::MessageCreated(message("m1", "g1", "bob", "hi", 10));
    assert_eq!(
        session.handle_event(&event).await.unwrap(),
        SessionChange::MessageArrived
    );
    // Same event again is a duplicate.
    assert_eq!(
        session.handle_event(&event).await.unwrap(),
        SessionChange::None
    );
    assert_eq!(ids(&session), ["m1"]);
}

#[tokio::test]
async fn test_reaction_event_replaces_set() {
    let mut seeded = message("m1", "g1", "bob", "hi", 10);
    seeded.reactions = vec![Reaction {
        user_id: "alice".to_string(),
        reaction: "👍".to_string(),
    }];
    let api = MockApi::default().with_history("g1", vec![seeded]);
    let mut session = ChatSession::new(api, MockRooms::default(), "alice", "Alice");
    session.open_group("g1").await.unwrap();

    let change = session
        .handle_event(&RealtimeEvent::ReactionsUpdated {
            group_id: "g1".to_string(),
            message_id: "m1".to_string(),
            reactions: vec![Reaction {
                user_id: "bob".to_string(),
                reaction: "🎉".to_string(),
            }],
        })
        .await
        .unwrap();

    assert_eq!(change, SessionChange::ReactionsChanged);
    let reactions = &session.timeline().unwrap().messages().next().unwrap().reactions;
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].user_id, "bob");
}

#[tokio::test]
async fn test_reconnect_event_refetches_history_wholesale() {
    let api = MockApi::default().with_history("g1", vec![message("m1", "g1", "bob", "hi", 10)]);
    let mut session = ChatSession::new(api.clone(), MockRooms::default(), "alice", "Alice");
    session.open_group("g1").await.unwrap();

    // The socket dropped and missed m2 entirely; the refetch picks it up.
    api.state.lock().unwrap().history.insert(
        "g1".to_string(),
        vec![
            message("m1", "g1", "bob", "hi", 10),
            message("m2", "g1", "bob", "missed", 20),
        ],
    );

    let change = session
        .handle_event(&RealtimeEvent::Connected)
        .await
        .unwrap();

    assert_eq!(change, SessionChange::Refreshed);
    assert_eq!(ids(&session), ["m2", "m1"]);
}
