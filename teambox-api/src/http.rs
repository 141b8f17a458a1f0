use std::time::Duration;

use log::debug;
use reqwest::{header, multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// Response for endpoints that answer with `{success: true}` and no payload.
#[derive(Debug, serde::Deserialize)]
pub struct Ack {}

/// Thin wrapper around one `reqwest::Client` that owns the base URL, the
/// bearer session token and the `{success, error, ...payload}` envelope
/// decoding shared by every Teambox endpoint.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .unwrap();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await?;
        self.decode(path, response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        self.decode(path, response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        self.decode(path, response).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .delete(self.url(path))
            .query(query)
            .send()
            .await?;
        self.decode(path, response).await
    }

    /// Every endpoint wraps its payload in `{success, error?, ...fields}`.
    /// A `success: false` body (or a non-2xx status) becomes
    /// `ApiError::Application` with the backend's message; the remaining
    /// fields are decoded into the endpoint's typed payload.
    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        debug!("{} -> {}", path, status);

        let success = body.get("success").and_then(serde_json::Value::as_bool);
        if !status.is_success() || success == Some(false) {
            let message = body
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(ApiError::Application(message));
        }

        Ok(serde_json::from_value(body)?)
    }
}
