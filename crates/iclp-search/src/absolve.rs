//! `absolve(V, Prec)`: bound nibbling (spec §4.7 "absolve"): "attempt to
//! tighten the lower bound by testing whether `{V = L}` is consistent,
//! then repeatedly bisecting toward the true infeasible region and
//! similarly for the upper bound. Does not enumerate interior solutions."
//!
//! Unlike `solve`/`splitsolve`, this never branches on both halves at
//! once — each bisection step commits to whichever half the feasibility
//! test favors, so it terminates in bounded time but may land on a
//! non-point enclosure.

use iclp_core::{Bound, IntervalId, PropagationOutcome};

use crate::engine::Engine;

/// Test whether narrowing `v` to the single point `value` still
/// propagates to a consistent state, then undo the trial narrowing
/// regardless of the outcome.
fn test_point(engine: &mut Engine, v: IntervalId, value: f64) -> bool {
    let checkpoint = engine.checkpoint();
    let point = Bound::from_f64(value);
    let ok = engine.narrow_and_wake(v, point.clone(), point) && engine.propagate() != PropagationOutcome::Failed;
    engine.undo_to(checkpoint);
    ok
}

/// Nibble the lower bound of `[lo, hi]` upward: if `L` itself is already
/// consistent, nothing to do; otherwise bisect toward the boundary
/// between the infeasible region at `lo` and the feasible region nearer
/// `hi`, converging within `prec`.
fn nibble_lower(engine: &mut Engine, v: IntervalId, lo: f64, hi: f64, prec: f64) -> f64 {
    if test_point(engine, v, lo) {
        return lo;
    }
    let mut infeasible = lo;
    let mut feasible = hi;
    while feasible - infeasible > prec {
        let mid = infeasible + 0.5 * (feasible - infeasible);
        if test_point(engine, v, mid) {
            feasible = mid;
        } else {
            infeasible = mid;
        }
    }
    feasible
}

/// Mirror of [`nibble_lower`] for the upper bound.
fn nibble_upper(engine: &mut Engine, v: IntervalId, lo: f64, hi: f64, prec: f64) -> f64 {
    if test_point(engine, v, hi) {
        return hi;
    }
    let mut feasible = lo;
    let mut infeasible = hi;
    while infeasible - feasible > prec {
        let mid = feasible + 0.5 * (infeasible - feasible);
        if test_point(engine, v, mid) {
            feasible = mid;
        } else {
            infeasible = mid;
        }
    }
    feasible
}

/// Run the nibbling bisection on a single variable `v` to precision
/// `prec`, committing the tightened bounds on success.
pub fn absolve(engine: &mut Engine, v: IntervalId, prec: f64) -> bool {
    if engine.propagate() == PropagationOutcome::Failed {
        return false;
    }
    let (lo, hi) = engine.store.get(v).width_lo_hi();
    if lo > hi {
        return false;
    }
    let new_lo = nibble_lower(engine, v, lo, hi, prec);
    let new_hi = nibble_upper(engine, v, lo, hi, prec);
    if new_lo > new_hi {
        return false;
    }
    if !engine.narrow_and_wake(v, Bound::from_f64(new_lo), Bound::from_f64(new_hi)) {
        return false;
    }
    engine.propagate() != PropagationOutcome::Failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use iclp_compile::{Compiler, Expr};
    use iclp_core::IntervalKind;

    #[test]
    fn test_absolve_tightens_bound_against_inequality() {
        let mut c = Compiler::new();
        let x = c
            .declare("X", IntervalKind::Real, Bound::from_f64(0.0), Bound::from_f64(10.0))
            .unwrap();
        c.post_constraint(&Expr::var("X").le(Expr::RealConst(4.0))).unwrap();
        let mut engine = Engine::from_compiler(c).unwrap();
        let ok = absolve(&mut engine, x, 1e-6);
        assert!(ok);
        let (lo, hi) = engine.store.get(x).width_lo_hi();
        assert!(hi <= 4.0 + 1e-6);
        assert!(lo <= hi);
    }

    #[test]
    fn test_absolve_false_on_empty_intersection() {
        let mut c = Compiler::new();
        let x = c
            .declare("X", IntervalKind::Real, Bound::from_f64(0.0), Bound::from_f64(1.0))
            .unwrap();
        c.post_constraint(&Expr::var("X").eq(Expr::RealConst(5.0))).unwrap();
        let mut engine = Engine::from_compiler(c).unwrap();
        assert!(!absolve(&mut engine, x, 1e-6));
    }

    #[test]
    fn test_absolve_leaves_already_tight_point_unchanged() {
        let mut c = Compiler::new();
        let x = c
            .declare("X", IntervalKind::Real, Bound::from_f64(3.0), Bound::from_f64(3.0))
            .unwrap();
        let mut engine = Engine::from_compiler(c).unwrap();
        assert!(absolve(&mut engine, x, 1e-6));
        let (lo, hi) = engine.store.get(x).width_lo_hi();
        assert_eq!(lo, 3.0);
        assert_eq!(hi, 3.0);
    }
}
