use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteRequest {
    pub code: String,
    pub name: String,
    pub password: String,
}

/// Payload of the signup/login/accept-invite endpoints. The custom token is
/// not a session by itself, it still has to be exchanged against the
/// identity provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTokenPayload {
    pub custom_token: String,
}

/// Session issued by the identity provider for a custom token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub id_token: String,
    pub user_id: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
