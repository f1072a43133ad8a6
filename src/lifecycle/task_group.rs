//! Join-on-completion task group.
//!
//! Spawns independent units of work and waits for all of them. Results are
//! not collected; units report through logs. A panicking unit is logged and
//! counted as completed without affecting the others.

use std::future::Future;

use tokio::task::JoinSet;

/// A set of fire-and-forget units joined as a whole.
#[derive(Default)]
pub struct TaskGroup {
    set: JoinSet<()>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self { set: JoinSet::new() }
    }

    /// Spawn one unit on the current runtime.
    pub fn spawn<F>(&mut self, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.set.spawn(unit);
    }

    /// Number of units not yet joined.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Wait for every unit, in completion order. Returns how many finished.
    pub async fn join_all(mut self) -> usize {
        let mut finished = 0;
        while let Some(result) = self.set.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Task group unit aborted");
            }
            finished += 1;
        }
        finished
    }
}
