use async_trait::async_trait;

use crate::api::BackendClient;
use crate::error::ApiError;
use crate::models::{BillingUrlPayload, CompanyPlan, PlanPayload};

#[async_trait]
pub trait BillingApi {
    /// URL of a hosted checkout session for the given plan.
    async fn checkout_session(&self, plan: &str) -> Result<String, ApiError>;
    /// URL of the hosted customer portal.
    async fn customer_portal(&self) -> Result<String, ApiError>;
    async fn company_plan(&self) -> Result<CompanyPlan, ApiError>;
}

#[async_trait]
impl BillingApi for BackendClient {
    async fn checkout_session(&self, plan: &str) -> Result<String, ApiError> {
        if plan.trim().is_empty() {
            return Err(ApiError::Validation("plan must not be empty".to_string()));
        }

        let payload: BillingUrlPayload = self
            .http
            .post(
                "/billing/checkout-session",
                &serde_json::json!({ "plan": plan }),
            )
            .await?;
        Ok(payload.url)
    }

    async fn customer_portal(&self) -> Result<String, ApiError> {
        let payload: BillingUrlPayload = self
            .http
            .post("/billing/portal", &serde_json::json!({}))
            .await?;
        Ok(payload.url)
    }

    async fn company_plan(&self) -> Result<CompanyPlan, ApiError> {
        let payload: PlanPayload = self.http.get("/billing/plan", &[]).await?;
        Ok(payload.plan)
    }
}
