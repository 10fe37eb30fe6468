use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid HTTP header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build API client: {0}")]
    Build(String),
}

impl Error {
    /// The human-readable message to show for this error.
    ///
    /// Server responses resolve to `detail`, falling back to the status text.
    /// Failures without a response (connection errors, undecodable bodies)
    /// use the error's own description.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api(error) => error.message().to_owned(),
            error => error.to_string(),
        }
    }
}

/// A non-success response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,

    /// The `detail` field of the JSON error body, if any.
    pub detail: Option<String>,

    /// The raw response body.
    pub body: Option<String>,
}

impl ApiError {
    #[must_use]
    pub const fn new(status: StatusCode, detail: Option<String>) -> Self {
        Self {
            status,
            detail,
            body: None,
        }
    }

    pub(crate) fn from_body(status: StatusCode, body: String) -> Self {
        let detail = serde_json::from_str::<Value>(&body).ok().and_then(|value| {
            value
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_owned)
        });

        Self {
            status,
            detail,
            body: (!body.is_empty()).then_some(body),
        }
    }

    /// The reason phrase of the response status, e.g. `Not Found`.
    #[must_use]
    pub fn status_text(&self) -> &str {
        self.status.canonical_reason().unwrap_or("error")
    }

    /// `detail` if the server sent one, the status text otherwise.
    #[must_use]
    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or_else(|| self.status_text())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.status.as_u16())
    }
}

impl std::error::Error for ApiError {}
