use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum KarakeepError {
    #[error("Missing API key: provide `api_key` or set the KARAKEEP_API_KEY environment variable")]
    MissingApiKey,
    #[error("Missing base url: provide `base_url`, set the KARAKEEP_BASE_URL environment variable, or configure `base_url` in settings.json")]
    MissingBaseUrl,
    #[error("Can't parse url: {0}")]
    ParseUrl(#[from] ParseError),
    #[error("Can't create client: {}", 0.to_string())]
    CreateClient(reqwest::Error),
    #[error("Request failed for {method} {endpoint}: {err}")]
    HttpRequest {
        method: String,
        endpoint: String,
        err: reqwest::Error,
    },
    #[error("Authentication failed (401): {0}")]
    Authentication(String),
    #[error("API error (status {status}) for {method} {endpoint}: {message}")]
    Api {
        status: u16,
        method: String,
        endpoint: String,
        message: String,
    },
    #[error("Can't read response body: {}", 0.to_string())]
    ParseHttpResponse(reqwest::Error),
    #[error("Expected a response body for {0}, got none")]
    EmptyResponse(String),
    #[error("Can't serialize json: {}", 0.to_string())]
    SerializeJson(serde_json::Error),
    #[error("Can't deserialize json: {}", 0.to_string())]
    DeserializeJson(serde_json::Error),
    #[error("Incomplete fetch: expected {expected} bookmarks, got {actual}")]
    IncompleteFetch { expected: u64, actual: u64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KarakeepError {
    /// The HTTP status code of the failed request, if the server responded
    /// with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            KarakeepError::Authentication(_) => Some(401),
            KarakeepError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
