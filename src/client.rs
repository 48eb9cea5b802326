use crate::errors::KarakeepError;
use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use parking_lot::Mutex;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client as ReqwestClient, Method, StatusCode, Url,
};
use scraper::Html;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::time::{self, Duration};

/// The maximum length of a raw error body quoted in error messages.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The base url of the Karakeep instance.
    pub base_url: String,
    /// The API key used as bearer token.
    pub api_key: String,
    /// The request timeout in milliseconds.
    pub request_timeout: u64,
    /// The throttling between requests in milliseconds.
    pub request_throttling: u64,
    /// The maximum number of retries for failed requests.
    pub max_retries: u32,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: 60_000,
            request_throttling: 1000,
            max_retries: 3,
        }
    }
}

/// A client for the Karakeep REST API.
///
/// Requests are throttled, authenticated with a bearer token, and retried on
/// connection failures and timeouts.
#[derive(Debug, Clone)]
pub struct KarakeepClient {
    client: ReqwestClient,
    base_url: Url,
    throttler: Throttler,
    max_retries: u32,
}

impl KarakeepClient {
    pub fn new(config: &ClientConfig) -> Result<Self, KarakeepError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| KarakeepError::MissingApiKey)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = ReqwestClient::builder()
            .timeout(Duration::from_millis(config.request_timeout))
            .default_headers(headers)
            .user_agent(concat!("karakeep-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(KarakeepError::CreateClient)?;
        let throttler = Throttler::new(config.request_throttling);

        Ok(Self {
            client,
            base_url,
            throttler,
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute a request against the API and return the parsed response body,
    /// or `None` for empty and `204 No Content` responses.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, KarakeepError> {
        let url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(KarakeepError::ParseUrl)?;
        let mut attempt = 0;

        let response = loop {
            self.throttler.throttle().await;

            debug!("{method} {url}");
            let mut request = self.client.request(method.clone(), url.clone());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => break response,
                Err(err) if (err.is_connect() || err.is_timeout()) && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_secs(attempt as u64 * 2);
                    warn!("Request failed ({err}), retry {attempt}/{} in {backoff:?}", self.max_retries);
                    time::sleep(backoff).await;
                }
                Err(err) => {
                    return Err(KarakeepError::HttpRequest {
                        method: method.to_string(),
                        endpoint: endpoint.to_owned(),
                        err,
                    })
                }
            }
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(KarakeepError::ParseHttpResponse)?;
        trace!("Response ({status}): {text}");

        if status == StatusCode::UNAUTHORIZED {
            return Err(KarakeepError::Authentication(extract_error_message(&text)));
        }

        if !status.is_success() {
            return Err(KarakeepError::Api {
                status: status.as_u16(),
                method: method.to_string(),
                endpoint: endpoint.to_owned(),
                message: extract_error_message(&text),
            });
        }

        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&text).map_err(KarakeepError::DeserializeJson)?;
        Ok(Some(value))
    }

    /// Execute a request and deserialize the response body into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, KarakeepError> {
        let value = self
            .request(method, endpoint, query, body)
            .await?
            .ok_or_else(|| KarakeepError::EmptyResponse(endpoint.to_owned()))?;
        serde_json::from_value(value).map_err(KarakeepError::DeserializeJson)
    }

    /// Execute a request for which the response body is discarded.
    pub async fn request_no_content(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), KarakeepError> {
        self.request(method, endpoint, &[], body).await?;
        Ok(())
    }
}

/// Normalize a Karakeep base url so that it ends in `/v1/`.
///
/// Users configure the API url with or without the version segment, so
/// `https://host/api`, `https://host/api/v1` and `https://host/api/v1/` all
/// resolve to the same base.
fn normalize_base_url(base_url: &str) -> Result<Url, KarakeepError> {
    let trimmed = base_url.trim().trim_end_matches('/');

    if trimmed.is_empty() {
        return Err(KarakeepError::MissingBaseUrl);
    }

    let normalized = if trimmed.ends_with("/v1") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/v1/")
    };

    Url::parse(&normalized).map_err(KarakeepError::ParseUrl)
}

/// Extract a readable message from an error response body.
///
/// The API returns JSON errors with a `message` or `detail` key, but proxies
/// in front of an instance answer with HTML error pages.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "detail", "error"] {
            if let Some(message) = value.get(key).and_then(|message| message.as_str()) {
                return message.to_owned();
            }
        }
    }

    let trimmed = body.trim_start();
    if trimmed.starts_with("<html")
        || trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<!doctype")
    {
        let html = Html::parse_document(body);
        let text = html
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            return text;
        }
    }

    body.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

/// A throttler to limit the request rate against an instance.
#[derive(Debug, Clone)]
pub struct Throttler {
    /// The time in milliseconds at which the next request is allowed to be
    /// executed.
    next_request_time: Arc<Mutex<i64>>,
    /// The throttling between requests in milliseconds.
    request_throttling: u64,
}

impl Throttler {
    pub fn new(request_throttling: u64) -> Self {
        Self {
            next_request_time: Arc::new(Mutex::new(0)),
            request_throttling,
        }
    }

    /// Wait until the next request slot to prevent overloading the instance.
    pub async fn throttle(&self) {
        if self.request_throttling == 0 {
            return;
        }

        let now = Utc::now();

        if let Some(next_request_time) = self.update_request_time(now) {
            let duration_until_next_request = next_request_time - now.timestamp_millis();

            if duration_until_next_request > 0 {
                debug!("Wait {duration_until_next_request} milliseconds until next request");
                time::sleep(Duration::from_millis(duration_until_next_request as u64)).await;
            }
        }
    }

    /// Update the next request time and return the previous value.
    fn update_request_time(&self, now: DateTime<Utc>) -> Option<i64> {
        let mut next_request_time = self.next_request_time.lock();
        let last_request_time = *next_request_time;

        if now.timestamp_millis() < *next_request_time {
            *next_request_time += self.request_throttling as i64;
        } else {
            *next_request_time = now.timestamp_millis() + self.request_throttling as i64;
        }

        if last_request_time == 0 {
            None
        } else {
            Some(last_request_time)
        }
    }
}

/// Build the query parameters shared by paginated endpoints, skipping the
/// parameters which are not set. Booleans are rendered lowercase.
pub(crate) fn page_query(
    limit: Option<u32>,
    cursor: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(cursor) = cursor {
        query.push(("cursor", cursor.to_owned()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{time::Instant, join};

    #[test]
    fn test_normalize_base_url() {
        let expected = "https://karakeep.example.com/api/v1/";
        assert_eq!(
            normalize_base_url("https://karakeep.example.com/api")
                .unwrap()
                .as_str(),
            expected
        );
        assert_eq!(
            normalize_base_url("https://karakeep.example.com/api/")
                .unwrap()
                .as_str(),
            expected
        );
        assert_eq!(
            normalize_base_url("https://karakeep.example.com/api/v1")
                .unwrap()
                .as_str(),
            expected
        );
        assert_eq!(
            normalize_base_url("https://karakeep.example.com/api/v1/")
                .unwrap()
                .as_str(),
            expected
        );
        assert_eq!(
            normalize_base_url("https://karakeep.example.com").unwrap().as_str(),
            "https://karakeep.example.com/v1/"
        );
    }

    #[test]
    fn test_normalize_base_url_empty() {
        let err = normalize_base_url("   ").unwrap_err();
        assert!(matches!(err, KarakeepError::MissingBaseUrl));
    }

    #[test]
    fn test_extract_error_message_json() {
        assert_eq!(
            extract_error_message(r#"{"message": "Bookmark not found"}"#),
            "Bookmark not found"
        );
        assert_eq!(
            extract_error_message(r#"{"detail": "Invalid token"}"#),
            "Invalid token"
        );
    }

    #[test]
    fn test_extract_error_message_html() {
        let message = extract_error_message(
            "<html><head><title>502</title></head><body><h1>502 Bad\n Gateway</h1></body></html>",
        );
        assert_eq!(message, "502 502 Bad Gateway");
    }

    #[test]
    fn test_extract_error_message_raw() {
        assert_eq!(extract_error_message("plain failure"), "plain failure");
    }

    #[tokio::test]
    async fn test_throttle() {
        tokio::time::pause();
        let request_throttling = 1000;
        let throttler = Throttler::new(request_throttling);

        let start_instant = Instant::now();

        join!(
            throttler.throttle(),
            throttler.throttle(),
            throttler.throttle()
        );

        assert_eq!(
            Instant::now().duration_since(start_instant).as_millis(),
            2001
        );
    }

    #[test]
    fn test_update_request_time() {
        let now = Utc::now();
        let request_throttling = 1000;
        let throttler = Throttler::new(request_throttling);

        let last_request_time = throttler.update_request_time(now);
        assert!(last_request_time.is_none());

        let last_request_time = throttler.update_request_time(now);
        assert_eq!(last_request_time, Some(now.timestamp_millis() + 1000));

        let last_request_time = throttler.update_request_time(now);
        assert_eq!(last_request_time, Some(now.timestamp_millis() + 2000));
    }
}
