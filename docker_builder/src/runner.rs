//! Subprocess execution behind a trait.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// A program to run, with its arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory of the child. The caller's own directory is left
    /// untouched.
    pub working_dir: PathBuf,
    /// Discard stdout and stderr
    pub silent: bool,
}

impl Invocation {
    /// Shell-style rendering for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// How a finished command exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

/// Runs invocations to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutcome>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutcome> {
        debug!(
            "Executing: {} (in {:?})",
            invocation.command_line(),
            invocation.working_dir
        );

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null());

        if invocation.silent {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().await?;
        Ok(CommandOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}
