//! Image builds with a recording runner in place of docker.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use docker_builder::{BuildError, CommandOutcome, CommandRunner, DockerBuilder, DockerConfig, Invocation};
use tempfile::TempDir;

/// Records every invocation and answers with a fixed exit code.
struct RecordingRunner {
    exit_code: i32,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    fn exiting_with(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(CommandOutcome {
            success: self.exit_code == 0,
            code: Some(self.exit_code),
        })
    }
}

struct FailingSpawn;

#[async_trait]
impl CommandRunner for FailingSpawn {
    async fn run(&self, _invocation: &Invocation) -> std::io::Result<CommandOutcome> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "docker: not found"))
    }
}

fn builder(exit_code: i32) -> DockerBuilder<RecordingRunner> {
    DockerBuilder::with_runner(DockerConfig::default(), RecordingRunner::exiting_with(exit_code))
}

#[tokio::test]
async fn build_runs_docker_with_given_tag_in_context_dir() {
    let ctx = TempDir::new().unwrap();
    let cwd_before = std::env::current_dir().unwrap();
    let builder = builder(0);

    builder.build(ctx.path(), "my_image", Some("mytag")).await.unwrap();

    let calls = builder.runner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, PathBuf::from("docker"));
    assert_eq!(calls[0].args, vec!["build", "-t", "my_image:mytag", "."]);
    assert_eq!(calls[0].working_dir, ctx.path());
    assert!(calls[0].silent);
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);
}

#[tokio::test]
async fn build_defaults_tag_to_latest() {
    let ctx = TempDir::new().unwrap();
    let builder = builder(0);

    builder.build(ctx.path(), "my_image", None).await.unwrap();

    let calls = builder.runner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["build", "-t", "my_image:latest", "."]);
}

#[tokio::test]
async fn non_zero_exit_is_a_build_failure() {
    let ctx = TempDir::new().unwrap();
    let cwd_before = std::env::current_dir().unwrap();
    let builder = builder(2);

    let err = builder.build(ctx.path(), "my_image", None).await.unwrap_err();
    match err {
        BuildError::Failed { image, code } => {
            assert_eq!(image, "my_image:latest");
            assert_eq!(code, Some(2));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let ctx = TempDir::new().unwrap();
    let builder = DockerBuilder::with_runner(DockerConfig::default(), FailingSpawn);

    let err = builder.build(ctx.path(), "my_image", None).await.unwrap_err();
    assert!(matches!(err, BuildError::Spawn { ref command, .. } if command == "docker build -t my_image:latest ."));
}

#[tokio::test]
async fn custom_binary_and_verbose_output() {
    let ctx = TempDir::new().unwrap();
    let config = DockerConfig {
        docker_binary: PathBuf::from("/usr/local/bin/podman"),
        silent: false,
    };
    let builder = DockerBuilder::with_runner(config, RecordingRunner::exiting_with(0));

    builder.build(ctx.path(), "app", Some("v1")).await.unwrap();

    let calls = builder.runner().calls();
    assert_eq!(calls[0].program, PathBuf::from("/usr/local/bin/podman"));
    assert!(!calls[0].silent);
}
