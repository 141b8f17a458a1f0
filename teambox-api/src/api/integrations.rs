use async_trait::async_trait;

use crate::api::BackendClient;
use crate::error::ApiError;
use crate::http::Ack;
use crate::models::{
    ConnectUrlPayload, SlackChannel, SlackChannelsPayload, SlackMessagePage, WhatsAppConnectPayload,
    WhatsAppMessagePage, WhatsAppStatus, WhatsAppStatusPayload,
};

#[async_trait]
pub trait SlackApi {
    /// OAuth connect URL to open in an external browser.
    async fn connect_url(&self) -> Result<String, ApiError>;
    async fn list_channels(&self) -> Result<Vec<SlackChannel>, ApiError>;
    /// Replace the set of channels opted into message polling.
    async fn set_tracked_channels(&self, channel_ids: &[String]) -> Result<(), ApiError>;
    async fn get_messages(
        &self,
        channel_id: &str,
        search: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<SlackMessagePage, ApiError>;
}

#[async_trait]
pub trait WhatsAppApi {
    async fn connect(&self) -> Result<WhatsAppConnectPayload, ApiError>;
    async fn status(&self) -> Result<WhatsAppStatus, ApiError>;
    async fn disconnect(&self) -> Result<(), ApiError>;
    async fn get_messages(
        &self,
        search: Option<&str>,
        page: Option<u32>,
    ) -> Result<WhatsAppMessagePage, ApiError>;
}

#[async_trait]
impl SlackApi for BackendClient {
    async fn connect_url(&self) -> Result<String, ApiError> {
        let payload: ConnectUrlPayload = self
            .http
            .get("/integrations/slack/connect-url", &[])
            .await?;
        Ok(payload.url)
    }

    async fn list_channels(&self) -> Result<Vec<SlackChannel>, ApiError> {
        let payload: SlackChannelsPayload = self
            .http
            .get("/integrations/slack/channels", &[])
            .await?;
        Ok(payload.channels)
    }

    async fn set_tracked_channels(&self, channel_ids: &[String]) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                "/integrations/slack/tracked-channels",
                &serde_json::json!({ "channelIds": channel_ids }),
            )
            .await?;
        Ok(())
    }

    async fn get_messages(
        &self,
        channel_id: &str,
        search: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<SlackMessagePage, ApiError> {
        let mut query: Vec<(&str, &str)> = vec![("channel", channel_id)];
        if let Some(search) = search {
            query.push(("search", search));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        self.http.get("/integrations/slack/messages", &query).await
    }
}

#[async_trait]
impl WhatsAppApi for BackendClient {
    async fn connect(&self) -> Result<WhatsAppConnectPayload, ApiError> {
        self.http
            .post("/integrations/whatsapp/connect", &serde_json::json!({}))
            .await
    }

    async fn status(&self) -> Result<WhatsAppStatus, ApiError> {
        let payload: WhatsAppStatusPayload = self
            .http
            .get("/integrations/whatsapp/status", &[])
            .await?;
        Ok(payload.status)
    }

    async fn disconnect(&self) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post("/integrations/whatsapp/disconnect", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn get_messages(
        &self,
        search: Option<&str>,
        page: Option<u32>,
    ) -> Result<WhatsAppMessagePage, ApiError> {
        let page_value;
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(search) = search {
            query.push(("search", search));
        }
        if let Some(page) = page {
            page_value = page.to_string();
            query.push(("page", &page_value));
        }

        self.http
            .get("/integrations/whatsapp/messages", &query)
            .await
    }
}
