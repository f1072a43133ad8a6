//! Block watcher states and the qualifying-block counter.

use std::fmt;

/// Where the watch loop currently is.
///
/// ```text
/// WaitingForHeader → Counting → WaitingForHeader        (not a multiple)
/// WaitingForHeader → Counting → AttemptingSend → WaitingForHeader (send failed)
/// WaitingForHeader → Counting → AttemptingSend → Done             (sent)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    WaitingForHeader,
    Counting,
    AttemptingSend,
    Done,
}

impl fmt::Display for WatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WatcherState::WaitingForHeader => "waiting_for_header",
            WatcherState::Counting => "counting",
            WatcherState::AttemptingSend => "attempting_send",
            WatcherState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Counts header notifications and flags every `interval`-th one.
#[derive(Debug, Clone)]
pub struct BlockCounter {
    count: u64,
    interval: u64,
}

impl BlockCounter {
    /// `interval` of 0 is treated as 1.
    pub fn new(interval: u64) -> Self {
        Self {
            count: 0,
            interval: interval.max(1),
        }
    }

    /// Record one header. Returns true when the new count is a positive
    /// multiple of the interval.
    pub fn record(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.count % self.interval == 0
    }

    /// Account for `n` headers that were delivered but never read. Returns
    /// true when a qualifying count was among them.
    pub fn skip(&mut self, n: u64) -> bool {
        let before = self.count / self.interval;
        self.count = self.count.saturating_add(n);
        self.count / self.interval > before
    }

    /// Headers recorded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }
}
