//! Branch-and-bound global optimization: `global_minimum`/`global_maximum`
//! (spec §11 "Global optimization"). Pruning relies on the objective's
//! own interval enclosure rather than a derivative: a branch whose
//! objective lower bound (for minimization) already exceeds the best
//! solution found so far can never improve on it, so the search skips it
//! without even propagating into it (spec §11 "branch-and-bound: prune
//! using the objective's own bound").
//!
//! `engine.stats.narrowing_ops` doubles as the "number of bound-tightening
//! steps" counter a caller would otherwise track separately per search
//! node.

use iclp_core::{Bound, IntervalId, PropagationOutcome};

use crate::engine::Engine;
use crate::split::{Assignment, SplitPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sense {
    Minimize,
    Maximize,
}

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

fn snapshot(engine: &Engine, vars: &[IntervalId]) -> Assignment {
    vars.iter().map(|&id| (id, engine.store.get(id))).collect()
}

fn optimize(
    engine: &mut Engine,
    vars: &[IntervalId],
    objective: IntervalId,
    precision: f64,
    strategy: SplitPoint,
    sense: Sense,
    best: &mut Option<f64>,
    best_assignment: &mut Option<Assignment>,
) {
    if engine.propagate() == PropagationOutcome::Failed {
        return;
    }

    let (obj_lo, obj_hi) = engine.store.get(objective).width_lo_hi();
    let optimistic_bound = match sense {
        Sense::Minimize => obj_lo,
        Sense::Maximize => obj_hi,
    };
    if let Some(b) = *best {
        let cannot_improve = match sense {
            Sense::Minimize => optimistic_bound >= b,
            Sense::Maximize => optimistic_bound <= b,
        };
        if cannot_improve {
            return;
        }
    }

    match pick_widest(engine, vars, precision) {
        None => {
            let value = match sense {
                Sense::Minimize => obj_lo,
                Sense::Maximize => obj_hi,
            };
            let better = best.map_or(true, |b| match sense {
                Sense::Minimize => value < b,
                Sense::Maximize => value > b,
            });
            if better {
                *best = Some(value);
                *best_assignment = Some(snapshot(engine, vars));
            }
        }
        Some(id) => {
            let iv = engine.store.get(id);
            let (lo, hi) = iv.width_lo_hi();
            let mid = match strategy {
                SplitPoint::Midpoint => iv.midpoint(),
                SplitPoint::Median => iv.median(),
            }
            .clamp(lo, hi);

            let checkpoint = engine.checkpoint();
            if engine.narrow_and_wake(id, Bound::from_f64(lo), Bound::from_f64(mid)) {
                optimize(engine, vars, objective, precision, strategy, sense, best, best_assignment);
            }
            engine.undo_to(checkpoint);

            let checkpoint = engine.checkpoint();
            if engine.narrow_and_wake(id, Bound::from_f64(mid), Bound::from_f64(hi)) {
                optimize(engine, vars, objective, precision, strategy, sense, best, best_assignment);
            }
            engine.undo_to(checkpoint);
        }
    }
}

/// Smallest achievable value of `objective` over the feasible region
/// defined by `vars`'s constraints, narrowed to within `precision`.
pub fn global_minimum(
    engine: &mut Engine,
    vars: &[IntervalId],
    objective: IntervalId,
    precision: f64,
    strategy: SplitPoint,
) -> Option<(Assignment, f64)> {
    let mut best = None;
    let mut best_assignment = None;
    optimize(engine, vars, objective, precision, strategy, Sense::Minimize, &mut best, &mut best_assignment);
    best_assignment.zip(best)
}

/// Largest achievable value of `objective`.
pub fn global_maximum(
    engine: &mut Engine,
    vars: &[IntervalId],
    objective: IntervalId,
    precision: f64,
    strategy: SplitPoint,
) -> Option<(Assignment, f64)> {
    let mut best = None;
    let mut best_assignment = None;
    optimize(engine, vars, objective, precision, strategy, Sense::Maximize, &mut best, &mut best_assignment);
    best_assignment.zip(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iclp_compile::{Compiler, Expr};
    use iclp_core::IntervalKind;

    #[test]
    fn test_global_minimum_of_linear_objective_under_bound_constraint() {
        let mut c = Compiler::new();
        let x = c.declare("X", IntervalKind::Real, Bound::from_f64(-5.0), Bound::from_f64(5.0)).unwrap();
        c.post_constraint(&Expr::var("X").le(Expr::RealConst(5.0))).unwrap();
        let objective = x;
        let mut engine = Engine::from_compiler(c).unwrap();
        let (_assignment, value) = global_minimum(&mut engine, &[x], objective, 0.05, SplitPoint::Midpoint).unwrap();
        assert!((value - (-5.0)).abs() < 0.2);
    }
}
