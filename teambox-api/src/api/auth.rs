use async_trait::async_trait;

use crate::api::BackendClient;
use crate::error::ApiError;
use crate::models::{AcceptInviteRequest, CustomTokenPayload, SignUpRequest};

/// Signup, login and invite acceptance all answer with a custom token that
/// still has to be exchanged against the identity provider for a session.
#[async_trait]
pub trait AuthApi {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, ApiError>;
    async fn log_in(&self, email: &str, password: &str) -> Result<String, ApiError>;
    async fn accept_invite(&self, request: &AcceptInviteRequest) -> Result<String, ApiError>;
}

fn require_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::Validation(
            "please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}

fn require_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, ApiError> {
        require_email(&request.email)?;
        require_password(&request.password)?;
        if request.company_name.trim().is_empty() {
            return Err(ApiError::Validation(
                "company name must not be empty".to_string(),
            ));
        }

        let payload: CustomTokenPayload = self.http.post("/auth/signup", request).await?;
        Ok(payload.custom_token)
    }

    async fn log_in(&self, email: &str, password: &str) -> Result<String, ApiError> {
        require_email(email)?;
        require_password(password)?;

        let payload: CustomTokenPayload = self
            .http
            .post(
                "/auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        Ok(payload.custom_token)
    }

    async fn accept_invite(&self, request: &AcceptInviteRequest) -> Result<String, ApiError> {
        if request.code.trim().is_empty() {
            return Err(ApiError::Validation(
                "invitation code must not be empty".to_string(),
            ));
        }
        require_password(&request.password)?;

        let payload: CustomTokenPayload = self.http.post("/auth/accept-invite", request).await?;
        Ok(payload.custom_token)
    }
}
