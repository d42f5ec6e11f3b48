use parking_lot::{Condvar, Mutex};

use std::mem;

/// Wake-up signals pending on a context.
#[derive(Default)]
struct Signals {
    /// A single buffered resume. Never counts above one.
    permit: bool,

    /// Sticky interrupt request, cleared only by `take_interrupt`.
    interrupted: bool,
}

/// Permit-based park/unpark primitive owned by one execution context.
///
/// An `unpark` that happens before `park` is not lost: it leaves a permit
/// behind and the next `park` returns immediately, consuming it. Repeated
/// unparks collapse into a single permit.
///
/// Only the owning context parks. Any thread may unpark or interrupt.
pub(crate) struct Parker {
    signals: Mutex<Signals>,
    condvar: Condvar,
}

impl Parker {
    pub(crate) fn new() -> Self {
        Self {
            signals: Mutex::new(Signals::default()),
            condvar: Condvar::new(),
        }
    }

    /// Blocks until a permit is available or an interrupt is pending.
    ///
    /// A permit is consumed on return. A pending interrupt is left in place
    /// so the caller can observe it with [`take_interrupt`](Self::take_interrupt).
    pub(crate) fn park(&self) {
        let mut signals = self.signals.lock();

        while !signals.permit && !signals.interrupted {
            self.condvar.wait(&mut signals);
        }

        signals.permit = false;
    }

    /// Makes a permit available and wakes the parked owner, if any.
    pub(crate) fn unpark(&self) {
        let mut signals = self.signals.lock();
        signals.permit = true;
        drop(signals);

        self.condvar.notify_one();
    }

    /// Requests an interrupt and wakes the parked owner, if any.
    pub(crate) fn interrupt(&self) {
        let mut signals = self.signals.lock();
        signals.interrupted = true;
        drop(signals);

        self.condvar.notify_one();
    }

    /// Clears the interrupt request, returning whether one was pending.
    pub(crate) fn take_interrupt(&self) -> bool {
        mem::take(&mut self.signals.lock().interrupted)
    }

    pub(crate) fn is_interrupted(&self) -> bool {
        self.signals.lock().interrupted
    }
}
