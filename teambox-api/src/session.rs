use log::debug;

use crate::api::ChatApi;
use crate::error::ApiError;
use crate::models::{Attachment, ChatMessage};
use crate::realtime::{RealtimeEvent, RoomControl};
use crate::timeline::Timeline;

/// What a realtime event did to the open timeline, so the caller knows
/// whether to redraw or scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    None,
    /// A message was inserted, scroll to latest.
    MessageArrived,
    ReactionsChanged,
    /// The channel came back; history was refetched wholesale.
    Refreshed,
}

/// One open group view: owns the current [`Timeline`], the room
/// subscription, and the guard that drops responses which arrive after the
/// group has been switched away from.
pub struct ChatSession<A, R> {
    api: A,
    rooms: R,
    user_id: String,
    user_name: String,
    timeline: Option<Timeline>,
    generation: u64,
}

impl<A: ChatApi, R: RoomControl> ChatSession<A, R> {
    pub fn new(api: A, rooms: R, user_id: &str, user_name: &str) -> Self {
        Self {
            api,
            rooms,
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            timeline: None,
            generation: 0,
        }
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Leave the previous group's room, join the new one and load its
    /// history. A page fetched for a group that is no longer current is
    /// dropped, not applied.
    pub async fn open_group(&mut self, group_id: &str) -> Result<(), ApiError> {
        if let Some(previous) = self.timeline.take() {
            self.rooms.leave_room(previous.group_id());
        }

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        self.timeline = Some(Timeline::new(group_id));
        self.rooms.join_room(group_id);

        let fetched = self.api.get_messages(group_id).await;
        self.install_history(generation, fetched)
    }

    /// Refetch the open group's history wholesale (reconnect recovery and
    /// manual retry share this path).
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let Some(group_id) = self.timeline.as_ref().map(|t| t.group_id().to_string()) else {
            return Ok(());
        };

        let generation = self.generation;
        let fetched = self.api.get_messages(&group_id).await;
        self.install_history(generation, fetched)
    }

    fn install_history(
        &mut self,
        generation: u64,
        fetched: Result<Vec<ChatMessage>, ApiError>,
    ) -> Result<(), ApiError> {
        if self.generation != generation {
            debug!("dropping history page for a stale group view");
            return Ok(());
        }
        let Some(timeline) = self.timeline.as_mut() else {
            return Ok(());
        };

        match fetched {
            Ok(page) => {
                timeline.history_loaded(page);
                Ok(())
            }
            Err(e) => {
                timeline.history_failed();
                Err(e)
            }
        }
    }

    /// Optimistically echo the message, then send it. Success promotes the
    /// echo in place; failure removes it and surfaces the error without
    /// restoring the typed content.
    pub async fn send(
        &mut self,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> Result<ChatMessage, ApiError> {
        let (group_id, temp_id) = {
            let timeline = self
                .timeline
                .as_mut()
                .ok_or_else(|| ApiError::Validation("no group is open".to_string()))?;
            let temp_id = timeline.begin_send(
                &self.user_id,
                &self.user_name,
                content,
                attachments.clone(),
            );
            (timeline.group_id().to_string(), temp_id)
        };

        match self.api.send_message(&group_id, content, &attachments).await {
            Ok(confirmed) => {
                if let Some(timeline) = self.timeline.as_mut() {
                    if timeline.group_id() == group_id {
                        timeline.confirm_send(&temp_id, confirmed.clone());
                    }
                }
                Ok(confirmed)
            }
            Err(e) => {
                if let Some(timeline) = self.timeline.as_mut() {
                    if timeline.group_id() == group_id {
                        timeline.fail_send(&temp_id);
                    }
                }
                Err(e)
            }
        }
    }

    /// Route one realtime event into the timeline. Events for other groups
    /// are ignored.
    pub async fn handle_event(&mut self, event: &RealtimeEvent) -> Result<SessionChange, ApiError> {
        match event {
            RealtimeEvent::MessageCreated(message) => {
                let Some(timeline) = self.timeline.as_mut() else {
                    return Ok(SessionChange::None);
                };
                if message.group_id != timeline.group_id() {
                    return Ok(SessionChange::None);
                }
                if timeline.remote_message(message.clone(), &self.user_id) {
                    Ok(SessionChange::MessageArrived)
                } else {
                    Ok(SessionChange::None)
                }
            }
            RealtimeEvent::ReactionsUpdated {
                group_id,
                message_id,
                reactions,
            } => {
                let Some(timeline) = self.timeline.as_mut() else {
                    return Ok(SessionChange::None);
                };
                if group_id != timeline.group_id() {
                    return Ok(SessionChange::None);
                }
                if timeline.reactions_updated(message_id, reactions.clone()) {
                    Ok(SessionChange::ReactionsChanged)
                } else {
                    Ok(SessionChange::None)
                }
            }
            RealtimeEvent::Connected => {
                self.refresh().await?;
                Ok(SessionChange::Refreshed)
            }
            RealtimeEvent::Disconnected => {
                debug!("realtime channel dropped, waiting for reconnect");
                Ok(SessionChange::None)
            }
        }
    }

    /// Leave the current room and discard the timeline.
    pub fn close(&mut self) {
        if let Some(timeline) = self.timeline.take() {
            self.rooms.leave_room(timeline.group_id());
        }
        self.generation = self.generation.wrapping_add(1);
    }
}
