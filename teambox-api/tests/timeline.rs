use chrono::{TimeZone, Utc};
use teambox_api::models::{ChatMessage, MessageKind, Reaction};
use teambox_api::timeline::{Timeline, TimelineState};

fn message(id: &str, sender_id: &str, content: &str, seconds: i64) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        group_id: "g1".to_string(),
        sender_id: sender_id.to_string(),
        sender_name: sender_id.to_uppercase(),
        content: content.to_string(),
        kind: MessageKind::Text,
        created_at: Utc.timestamp_opt(seconds, 0).unwrap(),
        attachments: Vec::new(),
        reactions: Vec::new(),
    }
}

fn reaction(user_id: &str, emoji: &str) -> Reaction {
    Reaction {
        user_id: user_id.to_string(),
        reaction: emoji.to_string(),
    }
}

fn ids(timeline: &Timeline) -> Vec<String> {
    timeline.messages().map(|m| m.id.clone()).collect()
}

#[test]
fn test_history_loaded_replaces_wholesale_newest_first() {
    let mut timeline = Timeline::new("g1");
    assert_eq!(timeline.state(), TimelineState::Loading);

    timeline.history_loaded(vec![
        message("m1", "alice", "first", 10),
        message("m3", "bob", "third", 30),
        message("m2", "alice", "second", 20),
    ]);

    assert_eq!(timeline.state(), TimelineState::Ready);
    assert_eq!(ids(&timeline), ["m3", "m2", "m1"]);
}

#[test]
fn test_history_failed_leaves_no_messages() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![message("m1", "alice", "hello", 10)]);

    timeline.history_failed();
    assert_eq!(timeline.state(), TimelineState::Failed);
    assert!(timeline.is_empty());
}

#[test]
fn test_remote_message_is_idempotent() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![]);

    assert!(timeline.remote_message(message("m1", "bob", "hi", 10), "alice"));
    assert!(!timeline.remote_message(message("m1", "bob", "hi", 10), "alice"));

    assert_eq!(ids(&timeline), ["m1"]);
}

#[test]
fn test_remote_message_from_local_user_is_ignored() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![]);

    assert!(!timeline.remote_message(message("m1", "alice", "mine", 10), "alice"));
    assert!(timeline.is_empty());
}

#[test]
fn test_optimistic_send_prepends_pending_entry() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![message("m1", "bob", "hi", 10)]);

    let temp_id = timeline.begin_send("alice", "Alice", "hello", Vec::new());

    assert!(temp_id.starts_with("temp_"));
    let entries = timeline.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_pending());
    assert_eq!(entries[0].message().content, "hello");
}

#[test]
fn test_send_failure_rolls_back_to_previous_list() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![
        message("m2", "bob", "later", 20),
        message("m1", "bob", "hi", 10),
    ]);
    let before = ids(&timeline);

    let temp_id = timeline.begin_send("alice", "Alice", "doomed", Vec::new());
    assert!(timeline.fail_send(&temp_id));

    assert_eq!(ids(&timeline), before);
    assert!(!timeline.fail_send(&temp_id));
}

#[test]
fn test_send_success_promotes_in_place() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![message("m1", "bob", "hi", 10)]);

    let temp_id = timeline.begin_send("alice", "Alice", "hello", Vec::new());
    // Another sender's message lands while the send is in flight.
    timeline.remote_message(message("m2", "bob", "interleaved", 40), "alice");

    let position = timeline
        .entries()
        .iter()
        .position(|entry| entry.is_pending())
        .unwrap();

    assert!(timeline.confirm_send(&temp_id, message("m9", "alice", "hello", 50)));

    let entries = timeline.entries();
    assert_eq!(entries[position].message().id, "m9");
    assert!(!entries.iter().any(|entry| entry.is_pending()));
    assert_eq!(
        entries.iter().filter(|e| e.message().id == "m9").count(),
        1
    );
}

#[test]
fn test_confirm_drops_pending_when_id_already_present() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![]);

    let temp_id = timeline.begin_send("alice", "Alice", "hello", Vec::new());
    timeline.remote_message(message("m9", "bob", "same id", 50), "alice");

    assert!(timeline.confirm_send(&temp_id, message("m9", "alice", "hello", 50)));
    assert_eq!(
        timeline
            .messages()
            .filter(|message| message.id == "m9")
            .count(),
        1
    );
}

#[test]
fn test_reaction_set_is_replaced_not_merged() {
    let mut timeline = Timeline::new("g1");
    let mut seeded = message("m1", "bob", "hi", 10);
    seeded.reactions = vec![reaction("alice", "👍")];
    timeline.history_loaded(vec![seeded]);

    assert!(timeline.reactions_updated(
        "m1",
        vec![reaction("bob", "🎉"), reaction("carol", "❤️")]
    ));

    let reactions = &timeline.messages().next().unwrap().reactions;
    assert_eq!(reactions.len(), 2);
    assert!(!reactions.iter().any(|r| r.user_id == "alice"));
}

#[test]
fn test_reaction_event_for_unknown_message_is_dropped() {
    let mut timeline = Timeline::new("g1");
    timeline.history_loaded(vec![message("m1", "bob", "hi", 10)]);

    assert!(!timeline.reactions_updated("missing", vec![reaction("bob", "🎉")]));
}
