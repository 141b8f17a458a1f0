use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPlan {
    pub plan: String,
    pub status: String,
    #[serde(default)]
    pub seats: Option<u32>,
    #[serde(default)]
    pub renews_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct PlanPayload {
    pub plan: CompanyPlan,
}

/// Checkout-session and customer-portal endpoints both answer with one URL
/// to open in an external browser.
#[derive(Debug, Deserialize)]
pub struct BillingUrlPayload {
    pub url: String,
}
