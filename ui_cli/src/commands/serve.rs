//! Serve command - run the JSON API.

use std::sync::Arc;

use clap::Args;
use json_api::{Api, ApiConfig};
use orc_client::{OrcClient, OrcConfig, OrcError};
use serde_json::json;
use user_config::UserConfig;

use crate::commands::orc::actions_map;
use crate::error::{CliError, Result};
use crate::output;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind, overrides `[api] host`
    #[arg(long, env = "DAL_API_HOST")]
    host: Option<String>,

    /// Port to bind, overrides `[api] port`
    #[arg(short, long, env = "DAL_API_PORT")]
    port: Option<u16>,

    /// Trace every request
    #[arg(long)]
    debug: bool,
}

/// Merge flags over the `[api]` section. Host and port have no defaults.
fn api_config(args: &ServeArgs, config: &UserConfig) -> Result<ApiConfig> {
    let settings = config.api.as_ref();

    let host = args
        .host
        .clone()
        .or_else(|| settings.map(|s| s.host.clone()))
        .ok_or_else(|| CliError::config_error("no API host: pass --host or set [api] host"))?;
    let port = args
        .port
        .or_else(|| settings.map(|s| s.port))
        .ok_or_else(|| CliError::config_error("no API port: pass --port or set [api] port"))?;
    let debug = args.debug || settings.map(|s| s.debug).unwrap_or(false);

    Ok(ApiConfig { host, port, debug })
}

/// The routes `dal serve` exposes.
async fn build_api(api_config: ApiConfig, orc_config: OrcConfig) -> Result<Api> {
    let orc = Arc::new(OrcClient::with_config(orc_config.with_liveness_check(false)).await?);
    let alive_orc = Arc::clone(&orc);

    let api = Api::new(api_config)
        .route("/health", || async { Ok::<_, OrcError>(json!({ "status": "ok" })) })
        .route("/orc/alive", move || {
            let orc = Arc::clone(&alive_orc);
            async move { Ok::<_, OrcError>(json!({ "alive": orc.is_alive().await })) }
        })
        .route("/orc/actions", move || {
            let orc = Arc::clone(&orc);
            async move {
                let actions = orc.supported_actions().await?;
                Ok::<_, OrcError>(actions_map(actions))
            }
        });

    Ok(api)
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, config: &UserConfig) -> anyhow::Result<()> {
    let api_config = api_config(&args, config)?;
    let orc_config = OrcConfig::for_port(config.orc.port);

    output::info(&format!(
        "Serving on {}:{} (ORC at {})",
        api_config.host, api_config.port, orc_config.base_url
    ));

    build_api(api_config, orc_config).await?.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_config::ApiSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(host: Option<&str>, port: Option<u16>, debug: bool) -> ServeArgs {
        ServeArgs {
            host: host.map(str::to_string),
            port,
            debug,
        }
    }

    #[test]
    fn test_api_config_requires_host_and_port() {
        let config = UserConfig::default();
        assert!(api_config(&args(None, Some(80), false), &config).is_err());
        assert!(api_config(&args(Some("0.0.0.0"), None, false), &config).is_err());

        let api = api_config(&args(Some("0.0.0.0"), Some(80), false), &config).unwrap();
        assert_eq!(api.host, "0.0.0.0");
        assert_eq!(api.port, 80);
        assert!(!api.debug);
    }

    #[test]
    fn test_api_config_flags_override_file() {
        let config = UserConfig {
            api: Some(ApiSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                debug: true,
            }),
            ..UserConfig::default()
        };

        let api = api_config(&args(None, None, false), &config).unwrap();
        assert_eq!(api, ApiConfig { host: "127.0.0.1".into(), port: 8080, debug: true });

        let api = api_config(&args(None, Some(9000), false), &config).unwrap();
        assert_eq!(api.port, 9000);
    }

    #[tokio::test]
    async fn test_orc_actions_route() {
        let orc = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/manage/actions_available"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keyval": ["get"]})))
            .mount(&orc)
            .await;

        let api_config = ApiConfig {
            host: "127.0.0.1".into(),
            port: 0,
            debug: false,
        };
        let orc_config = OrcConfig::default().with_base_url(orc.uri());
        let api = build_api(api_config, orc_config).await.unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(api.serve(listener));

        let response = reqwest::get(format!("http://{}/orc/actions", addr)).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({"keyval": ["get"]}));

        server.abort();
    }
}
