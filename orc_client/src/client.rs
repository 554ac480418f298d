//! REST client for a local ORC server.

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::action::{ActionTag, SupportedActions};
use crate::error::{OrcError, Result};
use crate::keyval::KeyVal;

/// Port ORC listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 33000;

/// Configuration for [`OrcClient`].
#[derive(Debug, Clone)]
pub struct OrcConfig {
    /// Base URL of the server, without a trailing slash
    pub base_url: String,
    /// Probe `GET /` when connecting and fail if the server does not answer
    pub check_liveness: bool,
}

impl OrcConfig {
    /// Point at `http://localhost:{port}`.
    pub fn for_port(port: u16) -> Self {
        Self {
            base_url: format!("http://localhost:{}", port),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_liveness_check(mut self, check: bool) -> Self {
        self.check_liveness = check;
        self
    }
}

impl Default for OrcConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://localhost:{}", DEFAULT_PORT),
            check_liveness: true,
        }
    }
}

/// Client for the ORC action API.
pub struct OrcClient {
    base_url: String,
    http: reqwest::Client,
    supported: OnceCell<SupportedActions>,
}

impl OrcClient {
    /// Connect with the default configuration.
    pub async fn new() -> Result<Self> {
        Self::with_config(OrcConfig::default()).await
    }

    /// Create with custom configuration, probing the server first when the
    /// config asks for it.
    pub async fn with_config(config: OrcConfig) -> Result<Self> {
        let client = Self {
            base_url: config.base_url,
            http: reqwest::Client::new(),
            supported: OnceCell::new(),
        };

        if config.check_liveness && !client.is_alive().await {
            return Err(OrcError::ServerNotFound(client.base_url.clone()));
        }

        info!("OrcClient ready at {}", client.base_url);
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the server answers `GET /`. Never errors.
    pub async fn is_alive(&self) -> bool {
        match self.request(Method::GET, "/", None).await {
            Ok(_) => true,
            Err(e) => {
                debug!("ORC liveness probe failed: {}", e);
                false
            }
        }
    }

    /// Module to action table, fetched on first use and kept for the
    /// lifetime of the client.
    pub async fn supported_actions(&self) -> Result<&SupportedActions> {
        self.supported
            .get_or_try_init(|| async {
                let raw = self
                    .request(Method::GET, "/manage/actions_available", None)
                    .await?;
                SupportedActions::from_value(raw)
            })
            .await
    }

    /// Whether the server exposes `tag`. A malformed tag is an error and
    /// never reaches the network.
    pub async fn supports(&self, tag: &str) -> Result<bool> {
        let tag: ActionTag = tag.parse()?;
        self.supports_tag(&tag).await
    }

    pub async fn supports_tag(&self, tag: &ActionTag) -> Result<bool> {
        Ok(self.supported_actions().await?.contains(tag))
    }

    /// Run `tag` on the server with `data` as the JSON body (`{}` when
    /// absent) and return the success payload.
    pub async fn dispatch(&self, tag: &str, data: Option<Value>) -> Result<Value> {
        let tag: ActionTag = tag.parse()?;
        self.dispatch_tag(&tag, data).await
    }

    pub async fn dispatch_tag(&self, tag: &ActionTag, data: Option<Value>) -> Result<Value> {
        if !self.supports_tag(tag).await? {
            return Err(OrcError::UnsupportedAction(tag.to_string()));
        }

        let body = data.unwrap_or_else(|| json!({}));
        self.request(Method::POST, &tag.endpoint(), Some(&body)).await
    }

    /// Facade over the `keyval` module.
    pub fn keyval(&self) -> KeyVal<'_> {
        KeyVal::new(self)
    }

    // ==================== HTTP Helper Methods ====================

    async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("ORC {} {}", method, url);

        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        check_envelope(status, &text)
    }
}

/// Turn a raw response into the success payload or the matching error.
///
/// Success requires status 200 and no `error` field in the body.
fn check_envelope(status: StatusCode, text: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_str(text).ok();

    if let Some(error) = parsed.as_ref().and_then(|body| body.get("error")) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(OrcError::Remote(message));
    }

    if status != StatusCode::OK {
        return Err(OrcError::UnexpectedStatus(status.as_u16()));
    }

    parsed.ok_or_else(|| OrcError::InvalidResponse(format!("expected JSON body, got {:?}", text)))
}
