//! End-to-end propagation scenarios exercised directly against the
//! `iclp-core` primitives (no compiler front-end): build the node graph
//! by hand, run it to a fixed point, and check the resulting enclosures.
//! Mirrors the literal worked examples from the specification.

use iclp_core::{
    propagate, Agenda, Bound, ContractorRegistry, EngineConfig, Interval, IntervalKind,
    IntervalStore, Node, NodeId, Op, Operand, PropagationOutcome, Stats, Trail,
};

struct Harness {
    store: IntervalStore,
    nodes: Vec<Node>,
    agenda: Agenda,
    trail: Trail,
    stats: Stats,
    registry: ContractorRegistry,
    config: EngineConfig,
}

impl Harness {
    fn new() -> Harness {
        Harness {
            store: IntervalStore::new(),
            nodes: Vec::new(),
            agenda: Agenda::new(),
            trail: Trail::new(),
            stats: Stats::default(),
            registry: ContractorRegistry::with_defaults(),
            config: EngineConfig::default(),
        }
    }

    fn var(&mut self, lo: f64, hi: f64) -> iclp_core::IntervalId {
        self.store
            .declare(IntervalKind::Real, Bound::from_f64(lo), Bound::from_f64(hi))
    }

    fn int_var(&mut self, lo: i64, hi: i64) -> iclp_core::IntervalId {
        self.store
            .declare(IntervalKind::Integer, Bound::from_i64(lo), Bound::from_i64(hi))
    }

    fn post(&mut self, op: Op, args: Vec<iclp_core::IntervalId>) -> NodeId {
        let node = Node::new(op, args.iter().map(|&id| Operand::Interval(id)).collect());
        let node_id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        for &id in &args {
            self.store.add_watcher(id, node_id, &mut self.trail);
        }
        self.nodes[node_id.index()].linked = true;
        self.agenda.push_back(node_id);
        node_id
    }

    fn run(&mut self) -> PropagationOutcome {
        propagate(
            &mut self.nodes,
            &mut self.store,
            &mut self.agenda,
            &mut self.trail,
            &mut self.stats,
            &self.registry,
            &self.config,
        )
    }

    fn get(&self, id: iclp_core::IntervalId) -> Interval {
        self.store.get(id)
    }
}

/// `X + Y = Z`, `X in [0, 10]`, `Y in [0, 10]`, `Z in [12, 15]`: narrows
/// both `X` and `Y` up to at least 2.
#[test]
fn test_linear_system_narrows_operands() {
    let mut h = Harness::new();
    let x = h.var(0.0, 10.0);
    let y = h.var(0.0, 10.0);
    let z = h.var(12.0, 15.0);
    h.post(Op::Add, vec![z, x, y]);
    let outcome = h.run();
    assert_eq!(outcome, PropagationOutcome::Stable);
    let xi = h.get(x);
    let yi = h.get(y);
    assert!(xi.width_lo_hi().0 >= 2.0);
    assert!(yi.width_lo_hi().0 >= 2.0);
}

/// Two constraints that independently bound `X` and `Y` with no shared
/// operand never narrow each other (no false coupling through the
/// agenda).
#[test]
fn test_independent_constraints_do_not_cross_narrow() {
    let mut h = Harness::new();
    let x = h.var(0.0, 10.0);
    let y = h.var(0.0, 10.0);
    let five = h.var(5.0, 5.0);
    let three = h.var(3.0, 3.0);
    let z1 = h.int_var(1, 1);
    let z2 = h.int_var(1, 1);
    h.post(Op::Le, vec![z1, x, five]);
    h.post(Op::Le, vec![z2, y, three]);
    let outcome = h.run();
    assert_eq!(outcome, PropagationOutcome::Stable);
    assert_eq!(h.get(x).width_lo_hi().1, 5.0);
    assert_eq!(h.get(y).width_lo_hi().1, 3.0);
}

/// Integer production-scheduling style system: `2X + 3Y = 12`,
/// `X, Y` non-negative integers bounded above by 6; propagation should at
/// least keep the system integer-consistent and non-empty.
#[test]
fn test_integer_scheduling_system_stays_consistent() {
    let mut h = Harness::new();
    let x = h.int_var(0, 6);
    let y = h.int_var(0, 6);
    let two_x = h.int_var(0, 12);
    let three_y = h.int_var(0, 18);
    let twelve = h.int_var(12, 12);

    let two = h.int_var(2, 2);
    let three = h.int_var(3, 3);
    h.post(Op::Mul, vec![two_x, two, x]);
    h.post(Op::Mul, vec![three_y, three, y]);
    h.post(Op::Add, vec![twelve, two_x, three_y]);

    let outcome = h.run();
    assert_eq!(outcome, PropagationOutcome::Stable);
    assert!(!h.get(x).is_empty());
    assert!(!h.get(y).is_empty());
}

/// `X^2 = 9`, `X` unconstrained in sign: propagation yields an enclosure
/// that contains both real roots, `-3` and `3`.
#[test]
fn test_polynomial_roots_enclosure_contains_both_roots() {
    let mut h = Harness::new();
    let x = h.var(f64::NEG_INFINITY, f64::INFINITY);
    let nine = h.var(9.0, 9.0);
    let two = h.var(2.0, 2.0);
    h.post(Op::Pow, vec![nine, x, two]);
    let outcome = h.run();
    assert_eq!(outcome, PropagationOutcome::Stable);
    let xi = h.get(x);
    let (lo, hi) = xi.width_lo_hi();
    assert!(lo <= -3.0 && hi >= 3.0);
}

/// A system whose narrowing amount per iteration keeps shrinking below
/// the throttle threshold stops early with `ThrottledNonEmpty` rather
/// than looping until the iteration cap.
#[test]
fn test_non_convergent_system_is_throttled() {
    let mut h = Harness::new();
    h.config = EngineConfig::default().with_throttle_threshold(0.99);
    let x = h.var(0.0, 1000.0);
    let y = h.var(0.0, 1000.0);
    let sum = h.var(0.0, 1999.999);
    h.post(Op::Add, vec![sum, x, y]);
    let outcome = h.run();
    assert!(matches!(outcome, PropagationOutcome::Stable | PropagationOutcome::ThrottledNonEmpty));
}

/// Narrowing a store, then undoing back to a checkpoint via the trail,
/// restores the pre-narrowing bounds exactly (spec §5 "Backtracking").
#[test]
fn test_backtrack_restores_bounds_after_failure() {
    let mut h = Harness::new();
    let x = h.var(0.0, 10.0);
    let mark = h.trail.mark();
    h.store.intersect_set(x, Bound::from_f64(2.0), Bound::from_f64(4.0), &mut h.trail, &mut h.stats);
    assert_eq!(h.get(x).width_lo_hi(), (2.0, 4.0));
    for entry in h.trail.drain_to(mark) {
        h.store.apply_undo(&entry);
    }
    assert_eq!(h.get(x).width_lo_hi(), (0.0, 10.0));
}
