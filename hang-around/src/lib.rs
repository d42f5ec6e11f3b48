//! # hang-around
//!
//! **hang-around** lets code written in plain, sequential style wait on
//! callback-completed futures without an `async` colouring of the whole
//! call graph.
//!
//! Tasks run on cheap execution contexts: threads with a small stack that
//! carry an *await-capable* tag installed when they are spawned. Inside such
//! a context, [`await_future`] registers a completion callback on a future,
//! parks the context, and resumes it with the value (or the failure) once
//! the callback fires, from whatever thread that happens on.
//!
//! The crate provides:
//!
//! - [`async_run`] to launch a fire-and-forget task on a new context, with
//!   uncaught failures reported to a process-wide [sink](diagnostics),
//! - [`await_future`], the blocking-style wait on any [`future::Eventual`],
//! - [`async_handler`] to wrap callbacks so they run inline when already on
//!   a context and on a new one otherwise,
//! - [`spawn`], [`block_on`] and [`Builder`] for joinable or synchronous
//!   entry points,
//! - `#[hang_around::main]` and `#[hang_around::test]` attribute macros.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hang_around::{AwaitError, async_run, await_future, time::resolve_after};
//! use std::time::Duration;
//!
//! #[hang_around::main]
//! fn main() -> Result<(), AwaitError> {
//!     let greeting = await_future(resolve_after(Duration::from_millis(50), "hello"))?;
//!     println!("{greeting}");
//!
//!     async_run(|| {
//!         let value = await_future(resolve_after(Duration::from_millis(10), 42))?;
//!         println!("background task got {value}");
//!         Ok::<_, AwaitError>(())
//!     });
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`future`]: The eventual-value capability and a single-fire promise
//! - [`time`]: Timer-backed promises
//! - [`diagnostics`]: Reporting of uncaught failures
//! - [`task`]: Spawning and joining contexts
//!
//! ## Getting Started
//!
//! Add hang-around to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! hang-around = "0.1"
//! ```

mod error;
mod runtime;

pub mod diagnostics;
pub mod future;
pub mod time;

pub use error::{AlreadyInitialized, AwaitError, BoxError, SpawnError, TaskFailure};
pub use runtime::task;
pub use runtime::task::{ContextState, JoinHandle, Report, async_run, block_on, spawn};
pub use runtime::{
    Builder, Config, ContextHandle, ContextId, Handler, NAME_PREFIX_ENV, Reentrant,
    STACK_SIZE_ENV, async_handler, await_future, current, current_id, is_await_capable,
};

pub use hang_around_macros::*;
