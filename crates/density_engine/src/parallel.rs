//! Rayon fan-out of independent comparisons.
//!
//! Each [`ComparisonTask`] is pure and owns its inputs, so tasks run on the
//! rayon pool with no shared state beyond a [`CancellationToken`]. The token
//! is checked before each task starts; a task already integrating runs to
//! completion.
//!
//! Results come back in input order, each tagged with its
//! [`ComparisonKey`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::comparison::{compare_snapshots, ComparisonResult, Snapshot};
use crate::config::DensityParams;
use crate::sources::OptionSide;

/// Identifies one comparison: quote day `t`, expiration and option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonKey {
    /// Quote date `t` (the current side)
    pub quote_date: NaiveDate,
    /// Expiration date of the chain
    pub expiration: NaiveDate,
    /// Calls or puts
    pub side: OptionSide,
}

/// Inputs of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTask {
    /// Result key
    pub key: ComparisonKey,
    /// Chain at `t - 1`
    pub previous: Snapshot,
    /// Chain at `t`
    pub current: Snapshot,
}

/// A comparison result tagged with its key.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyedComparison {
    /// Which comparison this is
    pub key: ComparisonKey,
    /// Both outcomes
    pub result: ComparisonResult,
}

/// Cooperative cancellation flag shared between a caller and the workers.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of tasks that have not started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Configuration for parallel execution.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Minimum number of tasks before using the rayon pool
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Returns whether to use parallel processing for the given task count.
    #[inline]
    pub fn should_parallelize(&self, n_tasks: usize) -> bool {
        n_tasks >= self.parallel_threshold
    }
}

/// Run every task, in parallel when there are enough of them.
///
/// Tasks that have not started when `token` is cancelled report
/// [`DensityError::Cancelled`](crate::DensityError::Cancelled) on both sides.
pub fn run_comparisons(
    tasks: &[ComparisonTask],
    params: &DensityParams,
    token: &CancellationToken,
    config: &ParallelConfig,
) -> Vec<KeyedComparison> {
    let run = |task: &ComparisonTask| {
        let result = if token.is_cancelled() {
            ComparisonResult::cancelled()
        } else {
            compare_snapshots(&task.previous, &task.current, params)
        };
        KeyedComparison {
            key: task.key,
            result,
        }
    };

    if config.should_parallelize(tasks.len()) {
        tasks.par_iter().map(run).collect()
    } else {
        tasks.iter().map(run).collect()
    }
}
