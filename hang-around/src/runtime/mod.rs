//! Core runtime components.
//!
//! This module contains everything needed to run sequential code that
//! waits on callback-completed futures:
//! - execution contexts, their context-local tag and their parker,
//! - the spawner and its uncaught failure boundary,
//! - the completion bridge behind [`await_future`],
//! - the reentrant handler wrapper,
//! - process-wide configuration and per-context builders.

mod bridge;
mod handler;
mod parker;

pub(crate) mod builder;
pub(crate) mod config;
pub(crate) mod context;

pub mod task;

pub use bridge::await_future;
pub use builder::Builder;
pub use config::{Config, NAME_PREFIX_ENV, STACK_SIZE_ENV};
pub use context::{ContextHandle, ContextId, current, current_id, is_await_capable};
pub use handler::{Handler, Reentrant, async_handler};
