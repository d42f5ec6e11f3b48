//! Callback-completed futures.
//!
//! The await primitive does not care where an eventual value comes from;
//! anything implementing [`Eventual`] can be awaited. This module defines
//! that capability together with the failure model, and ships a minimal
//! single-fire [`Promise`] implementation.
//!
//! Note that these are *not* [`std::future::Future`]s: there is no polling,
//! only a single completion callback.

mod promise;

pub use promise::{Abandoned, Completer, Promise, promise};

use crate::error::BoxError;

use std::error::Error;
use std::fmt;

/// The outcome delivered to a completion callback.
pub type Outcome<T> = Result<T, Failure>;

/// A value that becomes available exactly once, asynchronously.
///
/// Implementors must invoke the registered callback exactly once, with
/// either a value or a [`Failure`]. The callback may be invoked on any
/// thread, including synchronously from within `on_complete` when the
/// outcome is already known.
pub trait Eventual<T> {
    /// Registers the single observer of this eventual value.
    fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
        Self: Sized;
}

/// Why an eventual value failed.
///
/// The distinction controls how [`await_future`](crate::await_future)
/// re-raises the cause: unchecked failures come back unchanged, checked
/// ones are wrapped in [`AwaitError::Wrapped`](crate::AwaitError::Wrapped).
#[derive(Debug)]
pub enum Failure {
    /// Runtime-style failure, propagated as-is.
    Unchecked(BoxError),

    /// Checked failure, wrapped when propagated.
    Checked(BoxError),
}

impl Failure {
    /// Creates a runtime-style failure.
    pub fn unchecked(cause: impl Into<BoxError>) -> Self {
        Self::Unchecked(cause.into())
    }

    /// Creates a checked failure.
    pub fn checked(cause: impl Into<BoxError>) -> Self {
        Self::Checked(cause.into())
    }

    /// Returns the underlying cause.
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        match self {
            Self::Unchecked(cause) | Self::Checked(cause) => cause.as_ref(),
        }
    }

    /// Returns `true` for runtime-style failures.
    pub fn is_unchecked(&self) -> bool {
        matches!(self, Self::Unchecked(_))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchecked(cause) => write!(f, "{cause}"),
            Self::Checked(cause) => write!(f, "checked failure: {cause}"),
        }
    }
}
