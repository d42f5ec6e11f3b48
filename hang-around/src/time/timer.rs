use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::OnceLock;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

/// Work run by the timer thread once an entry's deadline is reached.
type Fire = Box<dyn FnOnce() + Send>;

/// An entry in the timer queue.
///
/// `TimerEntry` represents a callback scheduled at a specific deadline.
/// It is stored inside a binary heap ordered by deadline.
pub(crate) struct TimerEntry {
    /// The time at which the timer should fire.
    pub(crate) deadline: Instant,

    /// Callback to run when the deadline is reached.
    pub(crate) fire: Fire,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    /// Two timer entries are equal if their deadlines are equal.
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Orders timer entries by deadline.
    ///
    /// The comparison is **reversed** so that a `BinaryHeap<TimerEntry>`
    /// behaves as a min-heap, where the earliest deadline is popped first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

static TIMER: OnceLock<Sender<TimerEntry>> = OnceLock::new();

/// Schedules `fire` to run on the timer thread at `deadline`.
///
/// The timer thread is started on first use and lives for the rest of the
/// process. It is a plain thread, not an await-capable context, so the
/// callbacks it runs complete promises from outside any context.
///
/// If the timer thread could not be started the entry is dropped, which
/// drops whatever `fire` captured.
pub(crate) fn schedule(deadline: Instant, fire: Fire) {
    let sender = TIMER.get_or_init(start);

    if sender.send(TimerEntry { deadline, fire }).is_err() {
        tracing::error!("timer thread is not running; dropping timer");
    }
}

/// Starts the timer thread, returning the sender that feeds it.
fn start() -> Sender<TimerEntry> {
    let (transmitter, receiver) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("hang-around-timer".into())
        .spawn(move || run(receiver));

    if let Err(err) = spawned {
        tracing::error!(error = %err, "failed to start timer thread");
    }

    transmitter
}

/// Timer loop: waits for new entries until the earliest deadline, then
/// fires every entry that is due.
fn run(receiver: Receiver<TimerEntry>) {
    let mut timers = BinaryHeap::new();

    loop {
        let next = match timers.peek() {
            Some(TimerEntry { deadline, .. }) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                receiver.recv_timeout(timeout)
            }
            None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match next {
            Ok(entry) => timers.push(entry),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => match timers.peek() {
                Some(next) => {
                    thread::sleep(next.deadline.saturating_duration_since(Instant::now()));
                }
                None => return,
            },
        }

        let now = Instant::now();
        while let Some(timer) = timers.peek() {
            if timer.deadline > now {
                break;
            }

            if let Some(timer) = timers.pop() {
                (timer.fire)();
            }
        }
    }
}
