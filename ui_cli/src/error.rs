//! CLI error types.

use thiserror::Error;

/// Errors surfaced by `dal` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    UserConfig(#[from] user_config::ConfigError),

    #[error(transparent)]
    Orc(#[from] orc_client::OrcError),

    #[error(transparent)]
    Datahose(#[from] datahose_client::DatahoseError),

    #[error(transparent)]
    Build(#[from] docker_builder::BuildError),

    #[error(transparent)]
    Server(#[from] json_api::ServerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CliError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
