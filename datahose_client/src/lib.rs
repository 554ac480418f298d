//! Push and notification client for a Datahose endpoint.
//!
//! Every event is a single POST of `{key, body[, time]}` authenticated with a
//! fixed `Authorization` header. Nothing is retried.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// Key used by [`DatahoseClient::notify`].
pub const NOTIFICATION_KEY: &str = "notification";

/// Errors produced by [`DatahoseClient`].
#[derive(Debug, thiserror::Error)]
pub enum DatahoseError {
    #[error("Password is not a valid header value")]
    InvalidPassword,

    /// The endpoint answered with something other than 200.
    #[error("Push rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatahoseError>;

#[derive(Debug, Serialize)]
struct PushPayload<'a> {
    key: &'a str,
    body: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<i64>,
}

/// Client for a single Datahose URL.
#[derive(Debug, Clone)]
pub struct DatahoseClient {
    url: String,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl DatahoseClient {
    /// `password` is sent verbatim as the `Authorization` header.
    pub fn new(url: impl Into<String>, password: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(password).map_err(|_| DatahoseError::InvalidPassword)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            url: url.into(),
            headers,
            http: reqwest::Client::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Push `body` under `key`, with an optional event time.
    pub async fn push<B: Serialize>(&self, key: &str, body: B, time: Option<i64>) -> Result<()> {
        let payload = PushPayload {
            key,
            body: serde_json::to_value(body)?,
            time,
        };
        debug!("Datahose push {} to {}", key, self.url);

        let response = self
            .http
            .post(&self.url)
            .headers(self.headers.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(DatahoseError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Push a `{sender, message}` notification.
    pub async fn notify(&self, sender: &str, message: &str) -> Result<()> {
        self.push(
            NOTIFICATION_KEY,
            json!({ "sender": sender, "message": message }),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines_authorization_header() {
        let client = DatahoseClient::new("http://hose", "some_password").unwrap();
        assert_eq!(client.headers().len(), 1);
        assert_eq!(client.headers()[AUTHORIZATION], "some_password");
        assert!(client.headers()[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_rejects_password_with_newline() {
        let err = DatahoseClient::new("http://hose", "bad\npassword").unwrap_err();
        assert!(matches!(err, DatahoseError::InvalidPassword));
    }

    #[test]
    fn test_payload_omits_missing_time() {
        let payload = PushPayload {
            key: "k",
            body: json!({"a": 1}),
            time: None,
        };
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"key": "k", "body": {"a": 1}}));
    }
}
