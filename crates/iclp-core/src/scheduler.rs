//! The fixed-point propagation scheduler: the AC-3-style agenda loop that
//! drains [`Agenda`], fires each node's [`Contractor`], writes results
//! back through the trail, and re-enqueues watchers — spec §4.5
//! "Fixed-point loop", §4.5 "Throttling", §4.5 "Persistence trimming".

use crate::config::EngineConfig;
use crate::contract::ContractorRegistry;
use crate::interval::{Bound, Interval, IntervalKind};
use crate::node::{Agenda, Node, NodeId, Operand};
use crate::rounded;
use crate::stats::Stats;
use crate::store::{IntervalStore, NarrowOutcome};
use crate::trail::{CounterField, Trail, UndoEntry};

/// Why [`propagate`] stopped (spec §4.5: "a run ends in one of three
/// states").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// The agenda drained with no operand left inconsistent.
    Stable,
    /// The iteration limit was hit with nodes still pending — propagation
    /// made progress but did not reach a fixed point.
    ThrottledNonEmpty,
    /// Some operand narrowed to an empty enclosure.
    Failed,
}

fn operand_to_interval(operand: &Operand, store: &IntervalStore) -> Interval {
    match operand {
        Operand::Interval(id) => store.get(*id),
        Operand::Literal(bound) => Interval::point(IntervalKind::Real, bound.clone()),
    }
}

/// Drain `agenda`, firing each node's contractor until the agenda is
/// empty, the iteration limit is hit, or some operand fails.
pub fn propagate(
    nodes: &mut [Node],
    store: &mut IntervalStore,
    agenda: &mut Agenda,
    trail: &mut Trail,
    stats: &mut Stats,
    registry: &ContractorRegistry,
    config: &EngineConfig,
) -> PropagationOutcome {
    let mut iterations: u64 = 0;

    while let Some(node_id) = agenda.pop_front() {
        let idx = node_id.index();
        if nodes[idx].persistent {
            continue;
        }

        iterations += 1;
        stats.incr(CounterField::IterationsUsed, trail);
        if iterations > config.iteration_limit {
            return PropagationOutcome::ThrottledNonEmpty;
        }

        let was_linked = nodes[idx].linked;
        nodes[idx].linked = false;
        trail.push(UndoEntry::LinkedFlag { id: node_id, was_linked });

        let op = nodes[idx].op;
        let args_spec = nodes[idx].args.clone();
        let Some(contractor) = registry.get(op) else {
            continue;
        };
        let arg_intervals: Vec<Interval> = args_spec
            .iter()
            .map(|o| operand_to_interval(o, store))
            .collect();
        let outcome = contractor.narrow(&arg_intervals);

        let mut failed = false;
        for (slot, operand) in args_spec.iter().enumerate() {
            let Operand::Interval(id) = operand else {
                continue;
            };
            let before = store.get(*id);
            let (before_lo, before_hi) = before.width_lo_hi();
            let before_width = rounded::sub_hi(before_hi, before_lo);

            let (new_lo, new_hi) = outcome.new_bounds[slot].clone();
            match store.intersect_set(*id, new_lo, new_hi, trail, stats) {
                NarrowOutcome::Failed => {
                    failed = true;
                    break;
                }
                NarrowOutcome::Unchanged => {}
                NarrowOutcome::Updated | NarrowOutcome::CollapsedToPoint(_) => {
                    let after = store.get(*id);
                    let (after_lo, after_hi) = after.width_lo_hi();
                    let after_width = rounded::sub_hi(after_hi, after_lo);
                    let significant = if before_width.is_finite() && before_width > 0.0 {
                        (before_width - after_width) / before_width >= config.throttle_threshold
                    } else {
                        true
                    };
                    if significant {
                        enqueue_watchers(*id, node_id, nodes, store, agenda, trail);
                    }
                }
            }
        }

        if failed {
            return PropagationOutcome::Failed;
        }

        if outcome.persistent {
            nodes[idx].persistent = true;
            trail.push(UndoEntry::PersistentFlag { id: node_id });
            for operand in &args_spec {
                if let Operand::Interval(id) = operand {
                    store.remove_watcher(*id, node_id);
                }
            }
        }
    }

    PropagationOutcome::Stable
}

fn enqueue_watchers(
    id: crate::store::IntervalId,
    firing_node: NodeId,
    nodes: &mut [Node],
    store: &IntervalStore,
    agenda: &mut Agenda,
    trail: &mut Trail,
) {
    for &watcher in store.watchers(id) {
        if watcher == firing_node {
            continue;
        }
        let w = &mut nodes[watcher.index()];
        if !w.linked && !w.persistent {
            w.linked = true;
            trail.push(UndoEntry::LinkedFlag {
                id: watcher,
                was_linked: false,
            });
            agenda.push_back(watcher);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractorRegistry;
    use crate::node::Op;

    fn setup_add(xl: f64, xh: f64, yl: f64, yh: f64, zl: f64, zh: f64) -> (
        Vec<Node>,
        IntervalStore,
        Agenda,
        Trail,
        Stats,
    ) {
        let mut store = IntervalStore::new();
        let z = store.declare(IntervalKind::Real, Bound::from_f64(zl), Bound::from_f64(zh));
        let x = store.declare(IntervalKind::Real, Bound::from_f64(xl), Bound::from_f64(xh));
        let y = store.declare(IntervalKind::Real, Bound::from_f64(yl), Bound::from_f64(yh));
        let node = Node::new(
            Op::Add,
            vec![Operand::Interval(z), Operand::Interval(x), Operand::Interval(y)],
        );
        let mut nodes = vec![node];
        nodes[0].linked = true;
        let mut trail = Trail::new();
        for id in [z, x, y] {
            store.add_watcher(id, NodeId::new(0), &mut trail);
        }
        let mut agenda = Agenda::new();
        agenda.push_back(NodeId::new(0));
        (nodes, store, agenda, trail, Stats::default())
    }

    #[test]
    fn test_propagate_reaches_stable_fixed_point() {
        let (mut nodes, mut store, mut agenda, mut trail, mut stats) =
            setup_add(1.0, 2.0, 3.0, 4.0, f64::NEG_INFINITY, f64::INFINITY);
        let registry = ContractorRegistry::with_defaults();
        let config = crate::config::EngineConfig::default();
        let outcome = propagate(&mut nodes, &mut store, &mut agenda, &mut trail, &mut stats, &registry, &config);
        assert_eq!(outcome, PropagationOutcome::Stable);
        let z = store.get(crate::store::IntervalId::new(0));
        assert_eq!(z.lo.to_f64(false), 4.0);
        assert_eq!(z.hi.to_f64(true), 6.0);
    }

    #[test]
    fn test_propagate_fails_on_inconsistent_system() {
        let (mut nodes, mut store, mut agenda, mut trail, mut stats) =
            setup_add(1.0, 2.0, 3.0, 4.0, 100.0, 200.0);
        let registry = ContractorRegistry::with_defaults();
        let config = crate::config::EngineConfig::default();
        let outcome = propagate(&mut nodes, &mut store, &mut agenda, &mut trail, &mut stats, &registry, &config);
        assert_eq!(outcome, PropagationOutcome::Failed);
    }

    #[test]
    fn test_iteration_limit_throttles() {
        let (mut nodes, mut store, mut agenda, mut trail, mut stats) =
            setup_add(1.0, 2.0, 3.0, 4.0, f64::NEG_INFINITY, f64::INFINITY);
        let registry = ContractorRegistry::with_defaults();
        let config = crate::config::EngineConfig::default().with_iteration_limit(0);
        let outcome = propagate(&mut nodes, &mut store, &mut agenda, &mut trail, &mut stats, &registry, &config);
        assert_eq!(outcome, PropagationOutcome::ThrottledNonEmpty);
    }
}
