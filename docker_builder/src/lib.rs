//! Docker image builds through the `docker` CLI.
//!
//! # Requirements
//!
//! - `docker` binary must be installed and in PATH (or configured through
//!   [`DockerConfig`])
//!
//! The build runs with the context directory as the child's working
//! directory; the calling process never changes its own.

pub mod builder;
pub mod runner;

pub use builder::{build, BuildError, DockerBuilder, DockerConfig, DEFAULT_TAG};
pub use runner::{CommandOutcome, CommandRunner, Invocation, ProcessRunner};
