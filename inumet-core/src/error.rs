//! Error types for the INUMET client.

/// Errors returned by [`InumetClient`](crate::InumetClient) and its helpers.
#[derive(Debug, thiserror::Error)]
pub enum InumetError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// Response body was not the JSON we expected
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The resources document has no entry with this name
    #[error("resource '{0}' is not listed by the endpoint discovery document")]
    MissingEndpoint(String),

    /// Caller supplied an unknown station/zone or bad coordinates
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Something the context refers to is absent from a response
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),
}

impl InumetError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

pub type Result<T, E = InumetError> = std::result::Result<T, E>;
