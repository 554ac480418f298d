//! ORC commands - actions, keyval and tasks.

use std::collections::BTreeMap;

use clap::{Args, Subcommand};
use orc_client::{requires, OrcClient, OrcConfig, SupportedActions, Task};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;
use user_config::{OrcSettings, UserConfig};

use crate::error::{CliError, Result};
use crate::output::{self, print_data, print_flag, print_value};
use crate::OutputFormat;

/// Arguments for the orc command.
#[derive(Args)]
pub struct OrcArgs {
    /// ORC port on localhost
    #[arg(long, env = "ORC_PORT")]
    port: Option<u16>,

    /// Full ORC base URL, overrides --port
    #[arg(long, env = "ORC_URL")]
    url: Option<String>,

    /// Skip the liveness probe before running the command
    #[arg(long)]
    no_liveness_check: bool,

    #[command(subcommand)]
    command: OrcCommand,
}

#[derive(Subcommand)]
enum OrcCommand {
    /// Check whether the ORC server answers
    Alive,

    /// List the actions the server supports
    Actions,

    /// Run an action, e.g. `dal orc do task/running`
    Do {
        /// Action tag (module/action)
        tag: String,

        /// JSON body
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Read a key
    Get { key: String },

    /// Write a key (the value is parsed as JSON, falling back to a string)
    Set { key: String, value: String },

    /// Delete a key
    Del { key: String },

    /// Check whether a key exists
    Has { key: String },

    /// Task management
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Run a command with a task started for its duration
    WithTask {
        /// Task that must be running
        task: String,

        /// Stop the task once the command exits
        #[arg(long)]
        teardown: bool,

        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Start a task
    Start { name: String },

    /// Stop a task
    Stop { name: String },

    /// Show whether a task is running
    Status { name: String },
}

/// Row of the supported actions table.
#[derive(Debug, Serialize, Tabled)]
struct ActionRow {
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

fn action_rows(actions: &SupportedActions) -> Vec<ActionRow> {
    actions
        .modules()
        .map(|(module, names)| ActionRow {
            module: module.to_string(),
            actions: names.iter().cloned().collect::<Vec<_>>().join(", "),
        })
        .collect()
}

/// Module to action list, for JSON output.
pub fn actions_map(actions: &SupportedActions) -> BTreeMap<String, Vec<String>> {
    actions
        .modules()
        .map(|(module, names)| (module.to_string(), names.iter().cloned().collect()))
        .collect()
}

/// Client configuration from flags over the `[orc]` settings.
fn client_config(args: &OrcArgs, settings: &OrcSettings) -> OrcConfig {
    let mut config = OrcConfig::for_port(args.port.unwrap_or(settings.port));
    if let Some(url) = &args.url {
        config = config.with_base_url(url.as_str());
    }
    config.with_liveness_check(settings.check_liveness && !args.no_liveness_check)
}

/// Parse a value argument as JSON, or keep it as a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Execute the orc command.
pub async fn execute(args: OrcArgs, config: &UserConfig, format: OutputFormat) -> anyhow::Result<()> {
    let orc_config = client_config(&args, &config.orc);

    // `alive` must report rather than fail on a dead server.
    let command = match args.command {
        OrcCommand::Alive => {
            let client = OrcClient::with_config(orc_config.with_liveness_check(false)).await?;
            let alive = client.is_alive().await;
            print_flag("alive", alive, format)?;
            if !alive {
                std::process::exit(1);
            }
            return Ok(());
        }
        command => command,
    };

    let client = OrcClient::with_config(orc_config).await?;

    match command {
        OrcCommand::Alive => {}
        OrcCommand::Actions => {
            let actions = client.supported_actions().await?;
            match format {
                OutputFormat::Table => print_data(&action_rows(actions), format)?,
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&actions_map(actions))?)
                }
            }
        }
        OrcCommand::Do { tag, data } => {
            let data = data
                .map(|raw| {
                    serde_json::from_str::<Value>(&raw)
                        .map_err(|e| CliError::invalid_argument(format!("--data is not JSON: {}", e)))
                })
                .transpose()?;
            let payload = client.dispatch(&tag, data).await?;
            print_value(&payload, format)?;
        }
        OrcCommand::Get { key } => {
            let value = client.keyval().get(&key).await?;
            print_value(&value, format)?;
        }
        OrcCommand::Set { key, value } => {
            client.keyval().set(&key, parse_value(&value)).await?;
            output::success(&format!("Set '{}'", key));
        }
        OrcCommand::Del { key } => {
            client.keyval().delete(&key).await?;
            output::success(&format!("Deleted '{}'", key));
        }
        OrcCommand::Has { key } => {
            let present = client.keyval().contains(&key).await?;
            print_flag(&key, present, format)?;
        }
        OrcCommand::Task { action } => run_task_command(&client, action, format).await?,
        OrcCommand::WithTask {
            task,
            teardown,
            command,
        } => {
            let requirement = requires(task)
                .teardown(teardown)
                .startup_delay(config.orc.startup_delay());
            let status = requirement
                .run(&client, || run_child(command))
                .await?;
            if !status.success() {
                output::warn(&format!("Command exited with {}", status));
                std::process::exit(status.code().unwrap_or(1));
            }
        }
    }

    Ok(())
}

async fn run_task_command(client: &OrcClient, action: TaskCommand, format: OutputFormat) -> Result<()> {
    match action {
        TaskCommand::Start { name } => {
            Task::new(name.as_str(), client).start().await?;
            output::success(&format!("Started task '{}'", name));
        }
        TaskCommand::Stop { name } => {
            Task::new(name.as_str(), client).stop().await?;
            output::success(&format!("Stopped task '{}'", name));
        }
        TaskCommand::Status { name } => {
            let running = Task::new(name.as_str(), client).running().await?;
            print_flag(&name, running, format)?;
        }
    }
    Ok(())
}

async fn run_child(command: Vec<String>) -> Result<std::process::ExitStatus> {
    let (program, rest) = command
        .split_first()
        .ok_or_else(|| CliError::invalid_argument("no command given"))?;
    let status = tokio::process::Command::new(program).args(rest).status().await?;
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(port: Option<u16>, url: Option<&str>, no_liveness_check: bool) -> OrcArgs {
        OrcArgs {
            port,
            url: url.map(str::to_string),
            no_liveness_check,
            command: OrcCommand::Actions,
        }
    }

    #[test]
    fn test_client_config_uses_settings_port() {
        let config = client_config(&args(None, None, false), &OrcSettings::default());
        assert_eq!(config.base_url, "http://localhost:33000");
        assert!(config.check_liveness);
    }

    #[test]
    fn test_client_config_flags_win() {
        let config = client_config(&args(Some(4000), None, true), &OrcSettings::default());
        assert_eq!(config.base_url, "http://localhost:4000");
        assert!(!config.check_liveness);

        let config = client_config(
            &args(Some(4000), Some("http://orc.internal:1/"), false),
            &OrcSettings::default(),
        );
        assert_eq!(config.base_url, "http://orc.internal:1");
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("{\"a\": true}"), json!({"a": true}));
        assert_eq!(parse_value("hello world"), json!("hello world"));
    }

    #[test]
    fn test_action_rows() {
        let actions = SupportedActions::from_value(json!({
            "task": ["stop", "start"],
            "keyval": ["get"]
        }))
        .unwrap();
        let rows = action_rows(&actions);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].module, "keyval");
        assert_eq!(rows[1].actions, "start, stop");

        let map = actions_map(&actions);
        assert_eq!(map["task"], vec!["start", "stop"]);
    }
}
