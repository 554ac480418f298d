//! Build command - build a Docker image.

use std::path::PathBuf;

use clap::Args;
use docker_builder::{DockerBuilder, DockerConfig};
use user_config::UserConfig;

use crate::output;

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Directory containing the Dockerfile
    path: PathBuf,

    /// Image name
    image: String,

    /// Image tag (default: latest)
    #[arg(short, long)]
    tag: Option<String>,

    /// Show docker's output instead of discarding it
    #[arg(long)]
    show_output: bool,
}

fn docker_config(args: &BuildArgs, config: &UserConfig) -> DockerConfig {
    DockerConfig {
        docker_binary: config.docker.binary.clone(),
        silent: !args.show_output,
    }
}

/// Execute the build command.
pub async fn execute(args: BuildArgs, config: &UserConfig) -> anyhow::Result<()> {
    let builder = DockerBuilder::with_config(docker_config(&args, config));

    output::info(&format!("Building '{}' from {}...", args.image, args.path.display()));
    builder
        .build(&args.path, &args.image, args.tag.as_deref())
        .await?;

    output::success(&format!(
        "Built {}:{}",
        args.image,
        args.tag.as_deref().unwrap_or(docker_builder::DEFAULT_TAG)
    ));
    Ok(())
}
