//! The interval store: the backtrackable arena of live intervals plus
//! their watcher lists (spec §3 "Interval", §4.2 "Interval Store").

use num_rational::BigRational;

use crate::interval::{Bound, Interval, IntervalKind};
use crate::node::NodeId;
use crate::stats::{Stats, WatchAction};
use crate::trail::{CounterField, Trail, UndoEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalId(pub usize);

impl IntervalId {
    pub fn new(index: usize) -> IntervalId {
        IntervalId(index)
    }
    pub fn index(self) -> usize {
        self.0
    }
}

/// A live interval plus the store-side bookkeeping the pure [`Interval`]
/// value doesn't carry (spec §3: "watchers", "flags").
#[derive(Debug, Clone)]
struct IntervalRecord {
    kind: IntervalKind,
    lo: Bound,
    hi: Bound,
    watchers: Vec<NodeId>,
    watch_action: WatchAction,
}

/// Result of narrowing an interval (spec §4.2 `intersect_set`).
#[derive(Debug, Clone)]
pub enum NarrowOutcome {
    Unchanged,
    Updated,
    Failed,
    CollapsedToPoint(BigRational),
}

#[derive(Debug, Default)]
pub struct IntervalStore {
    records: Vec<IntervalRecord>,
}

impl IntervalStore {
    pub fn new() -> IntervalStore {
        IntervalStore::default()
    }

    pub fn declare(&mut self, kind: IntervalKind, lo: Bound, hi: Bound) -> IntervalId {
        let iv = Interval::new(kind, lo, hi);
        self.records.push(IntervalRecord {
            kind: iv.kind,
            lo: iv.lo,
            hi: iv.hi,
            watchers: Vec::new(),
            watch_action: WatchAction::None,
        });
        IntervalId::new(self.records.len() - 1)
    }

    fn record(&self, id: IntervalId) -> &IntervalRecord {
        &self.records[id.index()]
    }

    pub fn get(&self, id: IntervalId) -> Interval {
        let r = self.record(id);
        Interval {
            kind: r.kind,
            lo: r.lo.clone(),
            hi: r.hi.clone(),
        }
    }

    pub fn kind(&self, id: IntervalId) -> IntervalKind {
        self.record(id).kind
    }

    pub fn watchers(&self, id: IntervalId) -> &[NodeId] {
        &self.record(id).watchers
    }

    pub fn watch_action(&self, id: IntervalId) -> WatchAction {
        self.record(id).watch_action
    }

    pub fn set_watch_action(&mut self, id: IntervalId, action: WatchAction) {
        self.records[id.index()].watch_action = action;
    }

    /// Register `node` as a watcher of `id` unless an equal entry is
    /// already present for the same structural node — duplicate
    /// suppression happens at the call site (scheduler/compiler), which
    /// has the `Node` value to compare; this just appends and trails it.
    pub fn add_watcher(&mut self, id: IntervalId, node: NodeId, trail: &mut Trail) {
        self.records[id.index()].watchers.push(node);
        trail.push(UndoEntry::WatcherPushed { id });
    }

    /// Remove the watcher at `node` from `id`'s list (used for
    /// persistence trimming, spec §4.5 "Persistence trimming"). Not
    /// trailed: once a node is proven persistent it stays persistent
    /// regardless of backtracking, so removing it from a watch list is
    /// safe to leave undone (the node is still reachable from other
    /// operands' watch lists and its `persistent` flag, which *is*
    /// trailed, still gates re-execution).
    pub fn remove_watcher(&mut self, id: IntervalId, node: NodeId) {
        self.records[id.index()].watchers.retain(|&w| w != node);
    }

    /// Intersect `id`'s current bounds with `(new_lo, new_hi)`, trailing
    /// the write (spec §4.2 `intersect_set`).
    pub fn intersect_set(
        &mut self,
        id: IntervalId,
        new_lo: Bound,
        new_hi: Bound,
        trail: &mut Trail,
        stats: &mut Stats,
    ) -> NarrowOutcome {
        let rec = self.record(id);
        let kind = rec.kind;
        let tighter_lo = Bound::tighter_lo(&rec.lo, &new_lo);
        let tighter_hi = Bound::tighter_hi(&rec.hi, &new_hi);

        let old_lo = rec.lo.clone();
        let old_hi = rec.hi.clone();
        let candidate = Interval::new(kind, tighter_lo, tighter_hi);

        if candidate.is_empty() {
            stats.incr(CounterField::Failures, trail);
            return NarrowOutcome::Failed;
        }

        let unchanged = candidate.lo.to_f64(false) == old_lo.to_f64(false)
            && candidate.hi.to_f64(true) == old_hi.to_f64(true);
        if unchanged {
            return NarrowOutcome::Unchanged;
        }

        trail.push(UndoEntry::Bounds {
            id,
            kind,
            lo: old_lo,
            hi: old_hi,
        });
        stats.incr(CounterField::NarrowingOps, trail);

        if matches!(self.record(id).watch_action, WatchAction::Trace) {
            tracing::trace!(
                interval = id.index(),
                lo = %candidate.lo,
                hi = %candidate.hi,
                "interval narrowed"
            );
        } else if matches!(self.record(id).watch_action, WatchAction::Log) {
            tracing::debug!(interval = id.index(), "interval narrowed");
        }

        let point = candidate.collapsed_point();
        self.records[id.index()].lo = candidate.lo;
        self.records[id.index()].hi = candidate.hi;

        match point {
            Some(p) => NarrowOutcome::CollapsedToPoint(p),
            None => NarrowOutcome::Updated,
        }
    }

    /// Undo a single trail entry, reversing exactly what the forward
    /// write did (spec §9 "every interval bounds update ... uses trailed
    /// writes").
    pub fn apply_undo(&mut self, entry: &UndoEntry) {
        if let UndoEntry::Bounds { id, lo, hi, .. } = entry {
            self.records[id.index()].lo = lo.clone();
            self.records[id.index()].hi = hi.clone();
        }
        if let UndoEntry::WatcherPushed { id } = entry {
            self.records[id.index()].watchers.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalKind;

    fn new_store_with_real(lo: f64, hi: f64) -> (IntervalStore, IntervalId) {
        let mut store = IntervalStore::new();
        let id = store.declare(IntervalKind::Real, Bound::from_f64(lo), Bound::from_f64(hi));
        (store, id)
    }

    #[test]
    fn test_intersect_narrows() {
        let (mut store, id) = new_store_with_real(0.0, 10.0);
        let mut trail = Trail::new();
        let mut stats = Stats::default();
        let outcome = store.intersect_set(
            id,
            Bound::from_f64(2.0),
            Bound::from_f64(5.0),
            &mut trail,
            &mut stats,
        );
        assert!(matches!(outcome, NarrowOutcome::Updated));
        let iv = store.get(id);
        assert_eq!(iv.lo.to_f64(false), 2.0);
        assert_eq!(iv.hi.to_f64(true), 5.0);
    }

    #[test]
    fn test_intersect_unchanged_when_not_tighter() {
        let (mut store, id) = new_store_with_real(0.0, 10.0);
        let mut trail = Trail::new();
        let mut stats = Stats::default();
        let outcome = store.intersect_set(
            id,
            Bound::from_f64(-5.0),
            Bound::from_f64(20.0),
            &mut trail,
            &mut stats,
        );
        assert!(matches!(outcome, NarrowOutcome::Unchanged));
    }

    #[test]
    fn test_intersect_fails_on_empty() {
        let (mut store, id) = new_store_with_real(0.0, 10.0);
        let mut trail = Trail::new();
        let mut stats = Stats::default();
        let outcome = store.intersect_set(
            id,
            Bound::from_f64(20.0),
            Bound::from_f64(30.0),
            &mut trail,
            &mut stats,
        );
        assert!(matches!(outcome, NarrowOutcome::Failed));
    }

    #[test]
    fn test_undo_restores_bounds() {
        let (mut store, id) = new_store_with_real(0.0, 10.0);
        let mut trail = Trail::new();
        let mut stats = Stats::default();
        let mark = trail.mark();
        store.intersect_set(
            id,
            Bound::from_f64(2.0),
            Bound::from_f64(5.0),
            &mut trail,
            &mut stats,
        );
        let popped = trail.drain_to(mark);
        for entry in &popped {
            store.apply_undo(entry);
        }
        let iv = store.get(id);
        assert_eq!(iv.lo.to_f64(false), 0.0);
        assert_eq!(iv.hi.to_f64(true), 10.0);
    }

    #[test]
    fn test_point_collapse_detected() {
        let (mut store, id) = new_store_with_real(0.0, 10.0);
        let mut trail = Trail::new();
        let mut stats = Stats::default();
        let outcome = store.intersect_set(
            id,
            Bound::from_f64(3.0),
            Bound::from_f64(3.0),
            &mut trail,
            &mut stats,
        );
        assert!(matches!(outcome, NarrowOutcome::CollapsedToPoint(_)));
    }

    #[test]
    fn test_integer_interval_rerounds_on_intersect() {
        let mut store = IntervalStore::new();
        let id = store.declare(IntervalKind::Integer, Bound::from_i64(0), Bound::from_i64(10));
        let mut trail = Trail::new();
        let mut stats = Stats::default();
        store.intersect_set(
            id,
            Bound::from_f64(2.3),
            Bound::from_f64(7.8),
            &mut trail,
            &mut stats,
        );
        let iv = store.get(id);
        assert_eq!(iv.lo.to_f64(false), 3.0);
        assert_eq!(iv.hi.to_f64(true), 7.0);
    }
}
