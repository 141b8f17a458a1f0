use chrono::Utc;
use log::debug;

use crate::models::{Attachment, ChatMessage, MessageKind, Reaction};

/// One entry of the timeline. A locally-sent message lives as `Pending`
/// under a temporary id until the send response either promotes it in place
/// or removes it; everything else is `Confirmed` under its server id.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageEntry {
    Confirmed(ChatMessage),
    Pending { temp_id: String, message: ChatMessage },
}

impl MessageEntry {
    pub fn message(&self) -> &ChatMessage {
        match self {
            MessageEntry::Confirmed(message) => message,
            MessageEntry::Pending { message, .. } => message,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MessageEntry::Confirmed(message) => &message.id,
            MessageEntry::Pending { temp_id, .. } => temp_id,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MessageEntry::Pending { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Loading,
    Ready,
    /// History fetch failed; there is no message list and no scheduled
    /// retry. Recovery is a fresh open or an explicit refresh.
    Failed,
}

/// Order-consistent message list for one open group, reconciling the
/// history fetch, incoming socket events and locally-initiated sends.
///
/// Entries are kept newest-first so a reversed render shows the latest
/// message at the visual bottom without re-sorting per frame. Ordering
/// between socket events is arrival order, nothing stronger; a missed
/// window is recovered by reloading history wholesale.
#[derive(Debug)]
pub struct Timeline {
    group_id: String,
    state: TimelineState,
    entries: Vec<MessageEntry>,
}

impl Timeline {
    pub fn new(group_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            state: TimelineState::Loading,
            entries: Vec::new(),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest-first.
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    /// Messages newest-first.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().map(MessageEntry::message)
    }

    fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.message().id == id)
    }

    /// Replace the list wholesale with a fetched history page.
    pub fn history_loaded(&mut self, mut page: Vec<ChatMessage>) {
        page.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.entries = page.into_iter().map(MessageEntry::Confirmed).collect();
        self.state = TimelineState::Ready;
    }

    pub fn history_failed(&mut self) {
        self.entries.clear();
        self.state = TimelineState::Failed;
    }

    /// Apply a message arriving over the realtime channel. Messages from the
    /// local user are ignored (the send-response path owns those) and ids
    /// already present are dropped. Returns whether the list changed, which
    /// is also the cue to scroll to the latest message.
    pub fn remote_message(&mut self, message: ChatMessage, local_user_id: &str) -> bool {
        if message.sender_id == local_user_id {
            debug!("ignoring echoed own message {}", message.id);
            return false;
        }
        if self.contains(&message.id) {
            debug!("ignoring duplicate message {}", message.id);
            return false;
        }

        self.entries.insert(0, MessageEntry::Confirmed(message));
        true
    }

    /// Synthesize the optimistic local echo for a send and prepend it. This
    /// happens before any network round-trip; the returned temp id is the
    /// handle for [`Timeline::confirm_send`] / [`Timeline::fail_send`].
    pub fn begin_send(
        &mut self,
        sender_id: &str,
        sender_name: &str,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> String {
        let temp_id = format!("temp_{}", Utc::now().timestamp_millis());
        let message = ChatMessage {
            id: temp_id.clone(),
            group_id: self.group_id.clone(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            content: content.to_string(),
            kind: MessageKind::Text,
            created_at: Utc::now(),
            attachments,
            reactions: Vec::new(),
        };

        self.entries.insert(
            0,
            MessageEntry::Pending {
                temp_id: temp_id.clone(),
                message,
            },
        );
        temp_id
    }

    /// Promote a pending entry to the server-confirmed message, preserving
    /// its list position. If the confirmed id somehow already arrived, the
    /// pending entry is removed instead so one id never appears twice.
    pub fn confirm_send(&mut self, temp_id: &str, confirmed: ChatMessage) -> bool {
        let Some(position) = self.position_of_pending(temp_id) else {
            debug!("no pending entry {} to confirm", temp_id);
            return false;
        };

        if self.contains(&confirmed.id) {
            self.entries.remove(position);
        } else {
            self.entries[position] = MessageEntry::Confirmed(confirmed);
        }
        true
    }

    /// Roll back a failed send by removing its pending entry entirely. The
    /// typed content is not kept anywhere.
    pub fn fail_send(&mut self, temp_id: &str) -> bool {
        let Some(position) = self.position_of_pending(temp_id) else {
            return false;
        };
        self.entries.remove(position);
        true
    }

    /// Replace a message's whole reaction set, last event wins.
    pub fn reactions_updated(&mut self, message_id: &str, reactions: Vec<Reaction>) -> bool {
        for entry in &mut self.entries {
            let message = match entry {
                MessageEntry::Confirmed(message) => message,
                MessageEntry::Pending { message, .. } => message,
            };
            if message.id == message_id {
                message.reactions = reactions;
                return true;
            }
        }
        false
    }

    fn position_of_pending(&self, temp_id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| match entry {
            MessageEntry::Pending { temp_id: id, .. } => id == temp_id,
            MessageEntry::Confirmed(_) => false,
        })
    }
}
