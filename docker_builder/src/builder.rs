//! `docker build` wrapper.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::runner::{CommandRunner, Invocation, ProcessRunner};

/// Tag used when the caller does not name one.
pub const DEFAULT_TAG: &str = "latest";

/// Errors specific to image builds.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Build context not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Could not run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Build of {image} failed (exit code {code:?})")]
    Failed { image: String, code: Option<i32> },
}

/// Configuration for [`DockerBuilder`].
#[derive(Debug, Clone)]
pub struct DockerConfig {
    /// Path to docker binary (default: "docker")
    pub docker_binary: PathBuf,
    /// Discard the build output (default: true)
    pub silent: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            docker_binary: PathBuf::from("docker"),
            silent: true,
        }
    }
}

/// Builds images from a directory containing a Dockerfile.
pub struct DockerBuilder<R = ProcessRunner> {
    config: DockerConfig,
    runner: R,
}

impl DockerBuilder<ProcessRunner> {
    pub fn new() -> Self {
        Self::with_config(DockerConfig::default())
    }

    pub fn with_config(config: DockerConfig) -> Self {
        Self {
            config,
            runner: ProcessRunner,
        }
    }
}

impl Default for DockerBuilder<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> DockerBuilder<R> {
    /// Use a custom runner in place of real child processes.
    pub fn with_runner(config: DockerConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The invocation that builds `path` as `image:tag`.
    pub fn invocation(&self, path: &Path, image: &str, tag: Option<&str>) -> Invocation {
        let reference = format!("{}:{}", image, tag.unwrap_or(DEFAULT_TAG));
        Invocation {
            program: self.config.docker_binary.clone(),
            args: vec!["build".into(), "-t".into(), reference, ".".into()],
            working_dir: path.to_path_buf(),
            silent: self.config.silent,
        }
    }

    /// docker build -t <image>:<tag> . (run inside `path`)
    pub async fn build(&self, path: impl AsRef<Path>, image: &str, tag: Option<&str>) -> Result<(), BuildError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(BuildError::PathNotFound(path.to_path_buf()));
        }

        let invocation = self.invocation(path, image, tag);
        let image_ref = invocation.args[2].clone();
        info!("Building image {} from {:?}", image_ref, path);

        let outcome = self
            .runner
            .run(&invocation)
            .await
            .map_err(|source| BuildError::Spawn {
                command: invocation.command_line(),
                source,
            })?;

        if !outcome.success {
            return Err(BuildError::Failed {
                image: image_ref,
                code: outcome.code,
            });
        }

        debug!("Image {} built", image_ref);
        Ok(())
    }
}

/// Build `path` as `image:tag` with the default configuration.
pub async fn build(path: impl AsRef<Path>, image: &str, tag: Option<&str>) -> Result<(), BuildError> {
    DockerBuilder::new().build(path, image, tag).await
}
