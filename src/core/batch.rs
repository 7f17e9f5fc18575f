//! core/batch.rs
//! Sequential per-file batches with progress and cooperative cancellation.
//!
//! - One step per item, in order, on the calling thread.
//! - Progress is reported after every step.
//! - The cancel flag is checked before each step; items already processed
//!   keep their new state.
//! - A failing step is logged and counted; the batch goes on.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

/// Shared stop flag. Clone it into whatever may want to cancel the batch.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Snapshot handed to the progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub title: String,
    pub current: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Run `step` over `items`.
pub fn run<T, E: Display>(
    title: &str,
    items: impl IntoIterator<Item = T>,
    cancel: &CancelFlag,
    mut progress: impl FnMut(&Progress),
    mut step: impl FnMut(T) -> Result<(), E>,
) -> BatchReport {
    let items: Vec<T> = items.into_iter().collect();
    let max = items.len();
    let mut report = BatchReport::default();

    for (index, item) in items.into_iter().enumerate() {
        if cancel.is_cancelled() {
            info!(title, done = index, max, "batch cancelled");
            report.cancelled = true;
            break;
        }

        match step(item) {
            Ok(()) => report.processed += 1,
            Err(e) => {
                warn!(title, index, error = %e, "batch step failed");
                report.failed += 1;
            }
        }

        progress(&Progress {
            title: title.to_string(),
            current: index + 1,
            max,
        });
    }

    debug!(title, ?report, "batch finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_do_not_stop_the_batch() {
        let mut seen = Vec::new();
        let report = run(
            "t",
            1..=4,
            &CancelFlag::new(),
            |p| seen.push(p.current),
            |n| if n == 2 { Err("boom") } else { Ok(()) },
        );
        assert_eq!(report, BatchReport { processed: 3, failed: 1, cancelled: false });
        assert_eq!(seen, [1, 2, 3, 4]);
    }

    #[test]
    fn cancellation_is_checked_between_items() {
        let cancel = CancelFlag::new();
        let remote = cancel.clone();
        let mut done = Vec::new();
        let report = run(
            "t",
            ["a", "b", "c"],
            &cancel,
            |_| {},
            |item| {
                done.push(item);
                if item == "b" {
                    remote.cancel();
                }
                Ok::<(), String>(())
            },
        );
        assert_eq!(done, ["a", "b"]);
        assert_eq!(report, BatchReport { processed: 2, failed: 0, cancelled: true });
    }
}
