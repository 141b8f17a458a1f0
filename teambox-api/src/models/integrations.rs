use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
    /// Whether the channel is opted into message polling.
    #[serde(default)]
    pub tracked: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackMessage {
    pub ts: String,
    pub channel_id: String,
    pub user_name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackMessagePage {
    pub messages: Vec<SlackMessage>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlackChannelsPayload {
    pub channels: Vec<SlackChannel>,
}

/// OAuth-style connect flows hand back one URL for the external browser.
#[derive(Debug, Deserialize)]
pub struct ConnectUrlPayload {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppStatus {
    pub connected: bool,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Session start answers with a QR payload to scan from the phone until the
/// session is linked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppConnectPayload {
    #[serde(default)]
    pub qr_code: Option<String>,
    pub connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppMessage {
    pub id: String,
    pub from: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppMessagePage {
    pub messages: Vec<WhatsAppMessage>,
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppStatusPayload {
    pub status: WhatsAppStatus,
}
