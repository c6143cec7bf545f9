//! Backtrackable statistics counters and the per-interval trace hook
//! (spec §2.8, §5 "Statistics globals", §6 introspection).

use serde::Serialize;

use crate::trail::{CounterField, Trail, UndoEntry};

/// Per-interval trace action, set via `watch(X, Action)` (spec §6).
/// Rather than a bespoke logger, `Log`/`Trace` emit `tracing` events from
/// [`crate::store::IntervalStore::intersect_set`] — matching how
/// `gat-cli` wires `tracing`/`tracing-subscriber` for its own
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchAction {
    #[default]
    None,
    Log,
    Trace,
}

/// Process-wide propagation counters. Each field is incremented through
/// the trail during propagation so a failed choice point restores the
/// pre-choice counts (spec §5: "maintained as backtrackable globals when
/// incremented during propagation").
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub narrowing_ops: u64,
    pub failures: u64,
    pub node_count: u64,
    pub iterations_used: u64,
}

impl Stats {
    pub fn incr(&mut self, field: CounterField, trail: &mut Trail) {
        let prior = self.field_mut_get(field);
        trail.push(UndoEntry::Counter { field, prior });
        *self.field_mut(field) += 1;
    }

    pub fn add_nodes(&mut self, count: u64, trail: &mut Trail) {
        let prior = self.node_count;
        trail.push(UndoEntry::Counter {
            field: CounterField::NodeCount,
            prior,
        });
        self.node_count += count;
    }

    pub fn apply_undo(&mut self, entry: &UndoEntry) {
        if let UndoEntry::Counter { field, prior } = entry {
            *self.field_mut(*field) = *prior;
        }
    }

    /// `clpStatistics/0`: reset all counters (non-backtrackable — this is
    /// a user-facing reset, not part of propagation).
    pub fn reset(&mut self) {
        *self = Stats::default();
    }

    /// `clpStatistics/1` / `clpStatistic(S)`: a serializable snapshot.
    pub fn snapshot(&self) -> Stats {
        self.clone()
    }

    fn field_mut(&mut self, field: CounterField) -> &mut u64 {
        match field {
            CounterField::NarrowingOps => &mut self.narrowing_ops,
            CounterField::Failures => &mut self.failures,
            CounterField::NodeCount => &mut self.node_count,
            CounterField::IterationsUsed => &mut self.iterations_used,
        }
    }

    fn field_mut_get(&mut self, field: CounterField) -> u64 {
        *self.field_mut(field)
    }
}
