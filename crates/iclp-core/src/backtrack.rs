//! Coordinated backtracking: replaying a run of [`UndoEntry`] values
//! against every piece of state a forward write could have touched
//! (spec §5 "Backtracking": "undoing a choice point must restore
//! interval bounds, watcher lists, node flags, and statistics counters
//! together, in the reverse order they were written").

use crate::node::Node;
use crate::stats::Stats;
use crate::store::IntervalStore;
use crate::trail::{Checkpoint, Trail, UndoEntry};

fn apply_one(nodes: &mut [Node], store: &mut IntervalStore, stats: &mut Stats, entry: &UndoEntry) {
    match entry {
        UndoEntry::Bounds { .. } | UndoEntry::WatcherPushed { .. } => store.apply_undo(entry),
        UndoEntry::LinkedFlag { id, was_linked } => nodes[id.index()].linked = *was_linked,
        UndoEntry::PersistentFlag { id } => nodes[id.index()].persistent = false,
        UndoEntry::Counter { .. } => stats.apply_undo(entry),
    }
}

/// Undo every entry pushed since `checkpoint`, restoring the full engine
/// state (intervals, watcher lists, node flags, and counters) to what it
/// was at that point.
pub fn undo_to(nodes: &mut [Node], store: &mut IntervalStore, stats: &mut Stats, trail: &mut Trail, checkpoint: Checkpoint) {
    for entry in trail.drain_to(checkpoint) {
        apply_one(nodes, store, stats, &entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{Bound, IntervalKind};
    use crate::node::{NodeId, Op, Operand};

    #[test]
    fn test_undo_to_restores_bounds_and_node_flags() {
        let mut store = IntervalStore::new();
        let id = store.declare(IntervalKind::Real, Bound::from_f64(0.0), Bound::from_f64(10.0));
        let mut nodes = vec![crate::node::Node::new(Op::Add, vec![Operand::Interval(id)])];
        let mut trail = Trail::new();
        let mut stats = Stats::default();

        let mark = trail.mark();
        store.intersect_set(id, Bound::from_f64(2.0), Bound::from_f64(5.0), &mut trail, &mut stats);
        nodes[0].linked = false;
        trail.push(UndoEntry::LinkedFlag { id: NodeId::new(0), was_linked: true });

        undo_to(&mut nodes, &mut store, &mut stats, &mut trail, mark);

        let iv = store.get(id);
        assert_eq!(iv.width_lo_hi(), (0.0, 10.0));
        assert!(nodes[0].linked);
    }
}
