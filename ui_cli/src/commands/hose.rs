//! Push and notify commands - send events to Datahose.

use clap::Args;
use datahose_client::DatahoseClient;
use secrecy::ExposeSecret;
use serde_json::Value;
use user_config::UserConfig;

use crate::error::{CliError, Result};
use crate::output;

/// Datahose endpoint, from flags or the `[datahose]` section.
#[derive(Args)]
pub struct HoseArgs {
    /// Datahose URL
    #[arg(long, env = "DATAHOSE_URL")]
    url: Option<String>,

    /// Password sent as the Authorization header
    #[arg(long, env = "DATAHOSE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

/// Arguments for the push command.
#[derive(Args)]
pub struct PushArgs {
    /// Event key
    key: String,

    /// Event body as JSON
    body: String,

    /// Event time
    #[arg(long)]
    time: Option<i64>,

    #[command(flatten)]
    hose: HoseArgs,
}

/// Arguments for the notify command.
#[derive(Args)]
pub struct NotifyArgs {
    /// Who the notification is from
    sender: String,

    /// Notification text
    message: String,

    #[command(flatten)]
    hose: HoseArgs,
}

fn hose_client(args: &HoseArgs, config: &UserConfig) -> Result<DatahoseClient> {
    let settings = config.datahose.as_ref();

    let url = args
        .url
        .clone()
        .or_else(|| settings.map(|s| s.url.clone()))
        .ok_or_else(|| CliError::config_error("no Datahose URL: pass --url or set [datahose] url"))?;

    let client = match (&args.password, settings) {
        (Some(password), _) => DatahoseClient::new(url, password)?,
        (None, Some(s)) => DatahoseClient::new(url, s.password.expose_secret())?,
        (None, None) => {
            return Err(CliError::config_error(
                "no Datahose password: pass --password or set [datahose] password",
            ))
        }
    };
    Ok(client)
}

/// Execute the push command.
pub async fn execute_push(args: PushArgs, config: &UserConfig) -> anyhow::Result<()> {
    let body: Value = serde_json::from_str(&args.body)
        .map_err(|e| CliError::invalid_argument(format!("body is not JSON: {}", e)))?;

    hose_client(&args.hose, config)?
        .push(&args.key, body, args.time)
        .await?;

    output::success(&format!("Pushed '{}'", args.key));
    Ok(())
}

/// Execute the notify command.
pub async fn execute_notify(args: NotifyArgs, config: &UserConfig) -> anyhow::Result<()> {
    hose_client(&args.hose, config)?
        .notify(&args.sender, &args.message)
        .await?;

    output::success("Notification sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn hose_args(url: Option<&str>, password: Option<&str>) -> HoseArgs {
        HoseArgs {
            url: url.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_client_from_flags() {
        let client = hose_client(&hose_args(Some("http://hose"), Some("pw")), &UserConfig::default()).unwrap();
        assert_eq!(client.url(), "http://hose");
        assert_eq!(client.headers()["authorization"], "pw");
    }

    #[test]
    fn test_client_from_config_file() {
        let config = UserConfig::from_toml(
            Path::new("c.toml"),
            "[datahose]\nurl = \"http://from-file\"\npassword = \"secret\"\n",
        )
        .unwrap();

        let client = hose_client(&hose_args(None, None), &config).unwrap();
        assert_eq!(client.url(), "http://from-file");
        assert_eq!(client.headers()["authorization"], "secret");

        let client = hose_client(&hose_args(None, Some("override")), &config).unwrap();
        assert_eq!(client.headers()["authorization"], "override");
    }

    #[test]
    fn test_client_needs_url_and_password() {
        let config = UserConfig::default();
        assert!(matches!(hose_client(&hose_args(None, Some("pw")), &config), Err(CliError::Config(_))));
        assert!(matches!(hose_client(&hose_args(Some("http://h"), None), &config), Err(CliError::Config(_))));
    }
}
