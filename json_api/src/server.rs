//! The [`Api`] route wrapper and server loop.

use std::fmt::Display;
use std::future::Future;

use axum::{
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{ApiError, ServerError};

/// Where and how to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Trace every request
    pub debug: bool,
}

/// JSON API built from zero-argument handlers.
///
/// Handlers return plain data; `Ok` values are serialized as the JSON body
/// and any `Err` becomes `500 {"error": <message>}`.
#[derive(Debug)]
pub struct Api {
    config: ApiConfig,
    router: Router,
}

impl Api {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            router: Router::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Register `handler` for GET requests on `path`.
    pub fn route<H, Fut, T, E>(self, path: &str, handler: H) -> Self
    where
        H: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + 'static,
        E: Display + 'static,
    {
        self.route_with(path, MethodFilter::GET, handler)
    }

    /// Register `handler` for the given methods on `path`.
    pub fn route_with<H, Fut, T, E>(mut self, path: &str, methods: MethodFilter, handler: H) -> Self
    where
        H: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + 'static,
        E: Display + 'static,
    {
        let wrapped = move || {
            let handler = handler.clone();
            async move { json_response(handler().await) }
        };
        self.router = self.router.route(path, on(methods, wrapped));
        self
    }

    /// The assembled router, with request tracing in debug mode.
    pub fn router(&self) -> Router {
        if self.config.debug {
            self.router.clone().layer(TraceLayer::new_for_http())
        } else {
            self.router.clone()
        }
    }

    /// Bind the configured host and port and serve until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            info!("API listening on {} (debug: {})", addr, self.config.debug);
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

/// Render a handler result as a JSON response.
fn json_response<T: Serialize, E: Display>(result: Result<T, E>) -> Response {
    let value = result
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::to_value(data).map_err(|e| e.to_string()));

    match value {
        Ok(value) => Json(value).into_response(),
        Err(message) => {
            warn!("Handler failed: {}", message);
            ApiError::new(message).into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::collections::BTreeMap;

    #[test]
    fn test_ok_is_200() {
        let response = json_response(Ok::<_, String>(vec![1, 2, 3]));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_err_is_500() {
        let response = json_response(Err::<(), _>("nope"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unserializable_value_is_500() {
        // JSON object keys must be strings.
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "x");
        let response = json_response(Ok::<_, String>(map));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
