use thiserror::Error;

/// Failure taxonomy for every remote call made by this crate.
///
/// `Application` carries the backend's own `error` string and is meant to be
/// shown to the user verbatim. Everything else is presented generically.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("realtime channel error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed server response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend answered `{success: false, error: ...}`.
    #[error("{0}")]
    Application(String),

    /// Rejected locally, never reached the network.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Message suitable for end users. Backend and validation messages are
    /// passed through; transport failures collapse into a generic notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Application(message) | ApiError::Validation(message) => message.clone(),
            _ => "An error occurred, please try again".to_string(),
        }
    }
}
