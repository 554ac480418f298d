//! `dal` subcommands.

pub mod build;
pub mod hose;
pub mod orc;
pub mod serve;
