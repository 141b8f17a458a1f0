pub mod auth;
pub mod billing;
pub mod chat;
pub mod identity;
pub mod integrations;
pub mod storage;
pub mod team;

pub use auth::AuthApi;
pub use billing::BillingApi;
pub use chat::ChatApi;
pub use identity::IdentityClient;
pub use integrations::{SlackApi, WhatsAppApi};
pub use storage::StorageApi;
pub use team::TeamApi;

use crate::http::HttpClient;

/// The one concrete client behind every service trait. Screens (or here,
/// CLI commands) depend on the traits so tests can swap the backend out.
pub struct BackendClient {
    pub(crate) http: HttpClient,
}

impl BackendClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            http: HttpClient::new(base_url, token),
        }
    }
}
