use async_trait::async_trait;

use crate::api::BackendClient;
use crate::error::ApiError;
use crate::http::Ack;
use crate::models::{
    Invitation, InvitationCheck, InvitationPayload, InvitationsPayload, Member, MemberRole,
    MembersPayload,
};

#[async_trait]
pub trait TeamApi {
    async fn send_invitation(&self, email: &str, role: MemberRole) -> Result<Invitation, ApiError>;
    async fn get_invitations(&self) -> Result<Vec<Invitation>, ApiError>;
    async fn check_invitation(&self, code: &str) -> Result<InvitationCheck, ApiError>;
    async fn cancel_invitation(&self, invitation_id: &str) -> Result<(), ApiError>;
    async fn resend_invitation(&self, invitation_id: &str) -> Result<(), ApiError>;
    async fn get_members(&self) -> Result<Vec<Member>, ApiError>;
    async fn enable_member(&self, member_id: &str) -> Result<(), ApiError>;
    async fn disable_member(&self, member_id: &str) -> Result<(), ApiError>;
    async fn remove_member(&self, member_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl TeamApi for BackendClient {
    async fn send_invitation(&self, email: &str, role: MemberRole) -> Result<Invitation, ApiError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(ApiError::Validation(
                "please enter a valid email address".to_string(),
            ));
        }

        let payload: InvitationPayload = self
            .http
            .post(
                "/team/invitations",
                &serde_json::json!({ "email": email, "role": role }),
            )
            .await?;
        Ok(payload.invitation)
    }

    async fn get_invitations(&self) -> Result<Vec<Invitation>, ApiError> {
        let payload: InvitationsPayload = self.http.get("/team/invitations", &[]).await?;
        Ok(payload.invitations)
    }

    async fn check_invitation(&self, code: &str) -> Result<InvitationCheck, ApiError> {
        self.http
            .get("/team/invitations/check", &[("code", code)])
            .await
    }

    async fn cancel_invitation(&self, invitation_id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                &format!("/team/invitations/{}/cancel", invitation_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn resend_invitation(&self, invitation_id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                &format!("/team/invitations/{}/resend", invitation_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn get_members(&self) -> Result<Vec<Member>, ApiError> {
        let payload: MembersPayload = self.http.get("/team/members", &[]).await?;
        Ok(payload.members)
    }

    async fn enable_member(&self, member_id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                &format!("/team/members/{}/enable", member_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn disable_member(&self, member_id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                &format!("/team/members/{}/disable", member_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn remove_member(&self, member_id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .delete(&format!("/team/members/{}", member_id), &[])
            .await?;
        Ok(())
    }
}
