use async_trait::async_trait;

use crate::api::BackendClient;
use crate::error::ApiError;
use crate::http::Ack;
use crate::models::{
    Attachment, ChatGroup, ChatMessage, GroupPayload, GroupsPayload, MessagePayload,
    MessagesPayload,
};

#[async_trait]
pub trait ChatApi {
    async fn get_groups(&self) -> Result<Vec<ChatGroup>, ApiError>;
    async fn get_group(&self, group_id: &str) -> Result<ChatGroup, ApiError>;
    /// Full history page for a group, newest first.
    async fn get_messages(&self, group_id: &str) -> Result<Vec<ChatMessage>, ApiError>;
    async fn send_message(
        &self,
        group_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<ChatMessage, ApiError>;
    async fn add_members(&self, group_id: &str, user_ids: &[String]) -> Result<(), ApiError>;
    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl ChatApi for BackendClient {
    async fn get_groups(&self) -> Result<Vec<ChatGroup>, ApiError> {
        let payload: GroupsPayload = self.http.get("/chat/groups", &[]).await?;
        Ok(payload.groups)
    }

    async fn get_group(&self, group_id: &str) -> Result<ChatGroup, ApiError> {
        let payload: GroupPayload = self
            .http
            .get(&format!("/chat/groups/{}", group_id), &[])
            .await?;
        Ok(payload.group)
    }

    async fn get_messages(&self, group_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let payload: MessagesPayload = self
            .http
            .get(&format!("/chat/groups/{}/messages", group_id), &[])
            .await?;
        Ok(payload.messages)
    }

    async fn send_message(
        &self,
        group_id: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<ChatMessage, ApiError> {
        if content.trim().is_empty() && attachments.is_empty() {
            return Err(ApiError::Validation(
                "message must have content or an attachment".to_string(),
            ));
        }

        let payload: MessagePayload = self
            .http
            .post(
                &format!("/chat/groups/{}/messages", group_id),
                &serde_json::json!({
                    "content": content,
                    "attachments": attachments,
                }),
            )
            .await?;
        Ok(payload.message)
    }

    async fn add_members(&self, group_id: &str, user_ids: &[String]) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                &format!("/chat/groups/{}/members", group_id),
                &serde_json::json!({ "userIds": user_ids }),
            )
            .await?;
        Ok(())
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .delete(
                &format!("/chat/groups/{}/members/{}", group_id, user_id),
                &[],
            )
            .await?;
        Ok(())
    }
}
