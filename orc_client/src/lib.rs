//! Client for the ORC orchestrator.
//!
//! ORC exposes a fixed namespace of `module/action` operations over HTTP.
//! This crate provides:
//!
//! - [`OrcClient`]: liveness probing, the cached table of supported actions,
//!   and validated dispatch of actions
//! - [`KeyVal`]: get/set/delete/contains over the `keyval` module
//! - [`Task`] and [`requires`]: start/stop/status of named tasks, and a
//!   wrapper that makes sure a task runs around a unit of work

pub mod action;
pub mod client;
pub mod error;
pub mod keyval;
pub mod task;

pub use action::{ActionTag, SupportedActions};
pub use client::{OrcClient, OrcConfig, DEFAULT_PORT};
pub use error::{OrcError, Result};
pub use keyval::KeyVal;
pub use task::{requires, Requirement, Task, DEFAULT_STARTUP_DELAY};
