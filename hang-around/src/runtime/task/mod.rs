//! Execution contexts and the tasks they run.
//!
//! This module contains:
//! - context lifecycle states,
//! - the spawner that creates tagged contexts and supervises their task,
//! - join handles for observing spawned contexts.
//!
//! Most users will interact with this module through [`async_run`],
//! [`spawn`] and [`block_on`].

pub(crate) mod handle;
pub(crate) mod state;

pub(crate) mod core;

pub use self::core::{Report, async_run, block_on, spawn};
pub use handle::JoinHandle;
pub use state::ContextState;
