//! Remotely managed tasks and the `requires` wrapper.
//!
//! A task is nothing more than a name: whether it runs is owned by the ORC
//! server and asked for on every call.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::client::OrcClient;
use crate::error::{OrcError, Result};

/// Blind wait after starting a task before running dependent work.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct RunningTasks {
    tasks: Vec<String>,
}

/// Handle on a named task.
pub struct Task<'a> {
    name: String,
    client: &'a OrcClient,
}

impl<'a> Task<'a> {
    pub fn new(name: impl Into<String>, client: &'a OrcClient) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `task/start`
    pub async fn start(&self) -> Result<()> {
        self.client
            .dispatch("task/start", Some(json!({ "name": self.name })))
            .await?;
        Ok(())
    }

    /// `task/stop`
    pub async fn stop(&self) -> Result<()> {
        self.client
            .dispatch("task/stop", Some(json!({ "name": self.name })))
            .await?;
        Ok(())
    }

    /// Whether the server lists this task as running.
    pub async fn running(&self) -> Result<bool> {
        let response = self.client.dispatch("task/running", None).await?;
        let running: RunningTasks = serde_json::from_value(response)?;
        Ok(running.tasks.iter().any(|t| t == &self.name))
    }
}

/// Start building a [`Requirement`] on `task_name`.
pub fn requires(task_name: impl Into<String>) -> Requirement {
    Requirement {
        task_name: task_name.into(),
        teardown: false,
        startup_delay: DEFAULT_STARTUP_DELAY,
    }
}

/// Runs a unit of work with a named task guaranteed to have been started.
#[derive(Debug, Clone)]
pub struct Requirement {
    task_name: String,
    teardown: bool,
    startup_delay: Duration,
}

impl Requirement {
    /// Stop the task once the work finishes, whatever its outcome.
    pub fn teardown(mut self, teardown: bool) -> Self {
        self.teardown = teardown;
        self
    }

    pub fn startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Ensure the task runs, then run `work`.
    ///
    /// When teardown is set the task is stopped after `work` on both the
    /// success and the error path. A failing stop replaces a successful
    /// result; after a failed `work` it is only logged.
    pub async fn run<F, Fut, T, E>(&self, client: &OrcClient, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<OrcError>,
    {
        let task = Task::new(self.task_name.as_str(), client);

        if !task.running().await? {
            info!("Task {} not running, starting it", self.task_name);
            task.start().await?;
            tokio::time::sleep(self.startup_delay).await;
        }

        let outcome = work().await;

        if self.teardown {
            info!("Tearing down task {}", self.task_name);
            match (&outcome, task.stop().await) {
                (Ok(_), Err(e)) => return Err(e.into()),
                (Err(_), Err(e)) => warn!("Failed to stop task {}: {}", self.task_name, e),
                _ => {}
            }
        }

        outcome
    }
}
