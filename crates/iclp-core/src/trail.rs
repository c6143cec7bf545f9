//! A backtrackable write log standing in for the host's trail (spec §5,
//! §9 "Backtrackable state").
//!
//! The host logic-programming substrate is out of scope (spec §1); per
//! spec §9's "Attributed variables pattern" note ("a map<VarId,
//! IntervalRecord> with explicit bind(var, term) calls is a direct
//! equivalent"), this crate is the explicit equivalent of that trail: a
//! flat undo log that every mutating write appends to, and that
//! `undo_to` replays in reverse to restore a prior state. Modeled on the
//! teacher's `ArenaContext` snapshot/reset idea
//! (`gat-algo::arena::ArenaContext`), except it undoes individual writes
//! instead of bulk-freeing, since interval/statistics state must survive
//! across choice points that do not fail.

use crate::interval::{Bound, IntervalKind};
use crate::node::NodeId;
use crate::store::IntervalId;

/// One undone-on-backtrack write.
#[derive(Debug, Clone)]
pub enum UndoEntry {
    Bounds {
        id: IntervalId,
        kind: IntervalKind,
        lo: Bound,
        hi: Bound,
    },
    WatcherPushed {
        id: IntervalId,
    },
    LinkedFlag {
        id: NodeId,
        was_linked: bool,
    },
    PersistentFlag {
        id: NodeId,
    },
    Counter {
        field: CounterField,
        prior: u64,
    },
}

/// Which backtrackable statistics counter an undo entry restores (spec
/// §5 "Statistics globals ... maintained as backtrackable globals when
/// incremented during propagation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    NarrowingOps,
    Failures,
    NodeCount,
    IterationsUsed,
}

/// An opaque position in the trail, returned by [`Trail::mark`] and
/// consumed by [`Trail::undo_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug, Default)]
pub struct Trail {
    entries: Vec<UndoEntry>,
}

impl Trail {
    pub fn new() -> Trail {
        Trail::default()
    }

    pub fn mark(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop and return undo entries back to `checkpoint`, in reverse
    /// (most-recent-first) order, for the caller to apply.
    pub fn drain_to(&mut self, checkpoint: Checkpoint) -> Vec<UndoEntry> {
        let mut popped = Vec::new();
        while self.entries.len() > checkpoint.0 {
            popped.push(self.entries.pop().expect("checked len above"));
        }
        popped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_drain_restores_length() {
        let mut trail = Trail::new();
        let mark = trail.mark();
        trail.push(UndoEntry::Counter {
            field: CounterField::Failures,
            prior: 0,
        });
        trail.push(UndoEntry::Counter {
            field: CounterField::Failures,
            prior: 1,
        });
        assert_eq!(trail.len(), 2);
        let popped = trail.drain_to(mark);
        assert_eq!(popped.len(), 2);
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn test_drain_to_is_lifo_order() {
        let mut trail = Trail::new();
        let mark = trail.mark();
        trail.push(UndoEntry::Counter {
            field: CounterField::Failures,
            prior: 10,
        });
        trail.push(UndoEntry::Counter {
            field: CounterField::Failures,
            prior: 20,
        });
        let popped = trail.drain_to(mark);
        match popped[0] {
            UndoEntry::Counter { prior, .. } => assert_eq!(prior, 20),
            _ => panic!("wrong variant"),
        }
    }
}
