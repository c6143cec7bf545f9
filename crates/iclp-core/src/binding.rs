//! The variable-binding hook: maps source-level variable names onto a
//! single canonical [`IntervalId`] so repeated references compile to the
//! same live interval rather than independent copies (spec §4.6
//! "Variable-Binding Hook"), and merges watcher lists without admitting
//! structurally duplicate nodes when two bindings turn out to alias the
//! same variable (spec §4.6 "Merging suppresses duplicate nodes by
//! structural equality of (Op, operand-vector)").

use std::collections::HashMap;

use crate::node::{Node, NodeId};
use crate::store::IntervalId;

/// Name -> canonical interval map built up while compiling one constraint
/// script (spec §10 "each first occurrence of a name declares a fresh
/// interval; subsequent occurrences resolve through this map").
#[derive(Debug, Default)]
pub struct VarBindings {
    names: HashMap<String, IntervalId>,
}

impl VarBindings {
    pub fn new() -> VarBindings {
        VarBindings::default()
    }

    pub fn lookup(&self, name: &str) -> Option<IntervalId> {
        self.names.get(name).copied()
    }

    pub fn bind(&mut self, name: &str, id: IntervalId) {
        self.names.insert(name.to_string(), id);
    }

    /// Resolve `name` to its bound interval, declaring a fresh one via
    /// `declare` on first occurrence.
    pub fn resolve_or_declare(&mut self, name: &str, declare: impl FnOnce() -> IntervalId) -> IntervalId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let id = declare();
        self.bind(name, id);
        id
    }
}

/// Append `incoming` onto `existing`, skipping any node that is
/// structurally equal (spec §4.6) to one already present, by comparing
/// against `nodes`.
pub fn merge_watchers(existing: &mut Vec<NodeId>, incoming: &[NodeId], nodes: &[Node]) {
    for &candidate in incoming {
        let candidate_node = &nodes[candidate.index()];
        let is_dup = existing
            .iter()
            .any(|&present| nodes[present.index()].structurally_eq(candidate_node));
        if !is_dup {
            existing.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Op, Operand};

    #[test]
    fn test_first_occurrence_declares_fresh_interval() {
        let mut bindings = VarBindings::new();
        let id = bindings.resolve_or_declare("X", || IntervalId::new(7));
        assert_eq!(id, IntervalId::new(7));
    }

    #[test]
    fn test_second_occurrence_reuses_binding() {
        let mut bindings = VarBindings::new();
        bindings.bind("X", IntervalId::new(3));
        let id = bindings.resolve_or_declare("X", || panic!("should not redeclare"));
        assert_eq!(id, IntervalId::new(3));
    }

    #[test]
    fn test_merge_watchers_suppresses_structural_duplicate() {
        let n0 = Node::new(
            Op::Add,
            vec![Operand::Interval(IntervalId::new(0)), Operand::Interval(IntervalId::new(1))],
        );
        let n1 = Node::new(
            Op::Add,
            vec![Operand::Interval(IntervalId::new(0)), Operand::Interval(IntervalId::new(1))],
        );
        let nodes = vec![n0, n1];
        let mut existing = vec![NodeId::new(0)];
        merge_watchers(&mut existing, &[NodeId::new(1)], &nodes);
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn test_merge_watchers_keeps_distinct_node() {
        let n0 = Node::new(
            Op::Add,
            vec![Operand::Interval(IntervalId::new(0)), Operand::Interval(IntervalId::new(1))],
        );
        let n1 = Node::new(
            Op::Add,
            vec![Operand::Interval(IntervalId::new(0)), Operand::Interval(IntervalId::new(2))],
        );
        let nodes = vec![n0, n1];
        let mut existing = vec![NodeId::new(0)];
        merge_watchers(&mut existing, &[NodeId::new(1)], &nodes);
        assert_eq!(existing.len(), 2);
    }
}
