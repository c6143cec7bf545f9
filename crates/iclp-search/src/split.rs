//! Splitting strategies and the bisection search (`solve`/`splitsolve`,
//! spec §11 "Splitting" and "solve/splitsolve").
//!
//! Each branch narrows one variable to half its current enclosure,
//! propagates, and recurses; failing branches are discarded and the
//! trail rewinds to the pre-split checkpoint before trying the other
//! half (spec §5 "Backtracking").

use iclp_core::{Bound, Interval, IntervalId, PropagationOutcome};

use crate::engine::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPoint {
    /// Goualard's overflow-avoiding midpoint (spec §4.7 `midpoint`).
    Midpoint,
    /// The zero-crossing-aware median (spec §4.7 `median`), which biases
    /// splits of intervals straddling zero toward cutting at zero itself.
    Median,
}

fn split_value(iv: &Interval, strategy: SplitPoint) -> f64 {
    match strategy {
        SplitPoint::Midpoint => iv.midpoint(),
        SplitPoint::Median => iv.median(),
    }
}

/// Choose the widest variable still above `precision`, or `None` if every
/// tracked variable has converged (spec §11 "variable selection:
/// largest-width-first").
fn pick_widest(engine: &Engine, vars: &[IntervalId], precision: f64) -> Option<IntervalId> {
    vars.iter()
        .copied()
        .filter(|&id| engine.store.get(id).delta() > precision)
        .max_by(|&a, &b| {
            engine
                .store
                .get(a)
                .delta()
                .partial_cmp(&engine.store.get(b).delta())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

pub type Assignment = Vec<(IntervalId, Interval)>;

fn snapshot(engine: &Engine, vars: &[IntervalId]) -> Assignment {
    vars.iter().map(|&id| (id, engine.store.get(id))).collect()
}

/// Find every solution (enclosure narrow enough on every tracked
/// variable) up to `limit` results, splitting with `strategy` (spec §11
/// "solve/N"). `limit = None` searches exhaustively.
///
/// Unlike `splitsolve`, the split point is nudged slightly off the exact
/// midpoint: `{X ≤ m}` / `{m ≤ X}` with `m` just off-center, so a point
/// solution sitting exactly on the geometric midpoint falls into only one
/// branch instead of being reachable (and reported) from both.
pub fn solve(
    engine: &mut Engine,
    vars: &[IntervalId],
    precision: f64,
    strategy: SplitPoint,
    limit: Option<usize>,
) -> Vec<Assignment> {
    let mut solutions = Vec::new();
    search(engine, vars, precision, strategy, limit, true, &mut solutions);
    solutions
}

/// Find the first solution only, committing to whichever branch succeeds
/// first (spec §11 "splitsolve/N"). Splits at the plain midpoint, unlike
/// `solve` — there is only ever one branch kept, so the double-counting
/// `solve` guards against cannot occur here.
pub fn splitsolve(engine: &mut Engine, vars: &[IntervalId], precision: f64, strategy: SplitPoint) -> Option<Assignment> {
    let mut solutions = Vec::new();
    search(engine, vars, precision, strategy, Some(1), false, &mut solutions);
    solutions.into_iter().next()
}

fn search(
    engine: &mut Engine,
    vars: &[IntervalId],
    precision: f64,
    strategy: SplitPoint,
    limit: Option<usize>,
    offset_split: bool,
    solutions: &mut Vec<Assignment>,
) {
    if let Some(n) = limit {
        if solutions.len() >= n {
            return;
        }
    }
    if engine.propagate() == PropagationOutcome::Failed {
        return;
    }
    match pick_widest(engine, vars, precision) {
        None => solutions.push(snapshot(engine, vars)),
        Some(id) => {
            let iv = engine.store.get(id);
            let (lo, hi) = iv.width_lo_hi();
            let mid = split_value(&iv, strategy).clamp(lo, hi);
            let m = if offset_split {
                let width = hi - lo;
                let eps = if width.is_finite() { width * 1e-9 } else { 1e-6 }.max(f64::MIN_POSITIVE);
                (mid + eps).clamp(lo, hi)
            } else {
                mid
            };

            let checkpoint = engine.checkpoint();
            if engine.narrow_and_wake(id, Bound::from_f64(lo), Bound::from_f64(m)) {
                search(engine, vars, precision, strategy, limit, offset_split, solutions);
            }
            engine.undo_to(checkpoint);

            if let Some(n) = limit {
                if solutions.len() >= n {
                    return;
                }
            }

            let checkpoint = engine.checkpoint();
            if engine.narrow_and_wake(id, Bound::from_f64(m), Bound::from_f64(hi)) {
                search(engine, vars, precision, strategy, limit, offset_split, solutions);
            }
            engine.undo_to(checkpoint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iclp_compile::{Compiler, Expr};
    use iclp_core::IntervalKind;

    #[test]
    fn test_solve_finds_point_solution_for_linear_system() {
        let mut c = Compiler::new();
        let x = c.declare("X", IntervalKind::Real, Bound::from_f64(0.0), Bound::from_f64(10.0)).unwrap();
        let y = c.declare("Y", IntervalKind::Real, Bound::from_f64(0.0), Bound::from_f64(10.0)).unwrap();
        c.post_constraint(&Expr::var("X").add(Expr::var("Y")).eq(Expr::RealConst(10.0))).unwrap();
        c.post_constraint(&Expr::var("X").sub(Expr::var("Y")).eq(Expr::RealConst(2.0))).unwrap();
        let mut engine = Engine::from_compiler(c).unwrap();
        let solutions = solve(&mut engine, &[x, y], 0.01, SplitPoint::Midpoint, Some(1));
        assert_eq!(solutions.len(), 1);
        let (_, x_iv) = solutions[0].iter().find(|(id, _)| *id == x).unwrap();
        assert!((x_iv.midpoint() - 6.0).abs() < 0.1);
    }

    #[test]
    fn test_splitsolve_returns_none_on_inconsistent_system() {
        let mut c = Compiler::new();
        let x = c.declare("X", IntervalKind::Real, Bound::from_f64(0.0), Bound::from_f64(1.0)).unwrap();
        c.post_constraint(&Expr::var("X").eq(Expr::RealConst(5.0))).unwrap();
        let mut engine = Engine::from_compiler(c).unwrap();
        let solution = splitsolve(&mut engine, &[x], 0.01, SplitPoint::Midpoint);
        assert!(solution.is_none());
    }
}
