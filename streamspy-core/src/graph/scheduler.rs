//! Flush Scheduler
//!
//! Detaching a finished subscription from its destination is deferred so
//! the edge stays visible for a while after unsubscribe. The scheduler is
//! the only place where graph work resumes after a delay.
//!
//! # Guarantees
//!
//! A scheduler must run each task once, no earlier than the requested
//! delay. Tasks scheduled at different times may run in any order relative
//! to each other, and there is no cancellation.
//!
//! Two implementations are provided:
//!
//! - `TokioScheduler` sleeps on a tokio runtime and is what a live host uses.
//! - `ManualScheduler` keeps its own clock that only moves when `advance` is
//!   called. Due tasks fire in (due time, schedule order).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::error::{Error, Result};

/// A deferred unit of graph work.
pub type FlushTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs a task once after a delay.
pub trait FlushScheduler: Send + Sync {
    /// Run `task` no earlier than `after` from now.
    fn schedule(&self, after: Duration, task: FlushTask);
}

/// Scheduler backed by a tokio runtime.
///
/// Each task becomes a spawned future that sleeps for the delay and then
/// runs the task. The join handle is dropped, so the task is detached.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Create a scheduler on an explicit runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a scheduler on the runtime of the calling context.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::new(handle))
    }
}

impl FlushScheduler for TokioScheduler {
    fn schedule(&self, after: Duration, task: FlushTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(after).await;
            task();
        });
    }
}

/// A task waiting in the manual scheduler.
struct PendingFlush {
    due: Duration,
    seq: u64,
    task: FlushTask,
}

impl PartialEq for PendingFlush {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for PendingFlush {}

impl Ord for PendingFlush {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest first)
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

impl PartialOrd for PendingFlush {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_seq: u64,
    pending: BinaryHeap<PendingFlush>,
}

/// Scheduler with a hand-driven clock.
#[derive(Default)]
pub struct ManualScheduler {
    clock: Mutex<ManualClock>,
}

impl ManualScheduler {
    /// Create a scheduler with its clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this scheduler's clock.
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Number of tasks that have not run yet.
    pub fn pending(&self) -> usize {
        self.clock.lock().pending.len()
    }

    /// Move the clock forward and run every task that became due.
    ///
    /// Returns the number of tasks that ran. Tasks run after the clock lock
    /// is released, so they may schedule further work.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut clock = self.clock.lock();
            clock.now = clock.now.saturating_add(by);
            let now = clock.now;

            let mut due = Vec::new();
            while clock.pending.peek().is_some_and(|p| p.due <= now) {
                if let Some(pending) = clock.pending.pop() {
                    due.push(pending.task);
                }
            }
            due
        };

        let ran = due.len();
        for task in due {
            task();
        }
        ran
    }
}

impl FlushScheduler for ManualScheduler {
    fn schedule(&self, after: Duration, task: FlushTask) {
        let mut clock = self.clock.lock();
        let due = clock.now.saturating_add(after);
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.pending.push(PendingFlush { due, seq, task });
    }
}
