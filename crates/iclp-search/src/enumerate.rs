//! `enumerate/1`: exhaustive labeling of `Integer` variables one value at
//! a time, rather than bisecting (spec §11 "enumerate": "labels an
//! Integer variable by peeling off its lowest remaining value instead of
//! halving the domain, the classical CLP(FD) labeling strategy").

use iclp_core::{Bound, PropagationOutcome};

use crate::engine::Engine;
use crate::split::Assignment;

fn snapshot(engine: &Engine, vars: &[iclp_core::IntervalId]) -> Assignment {
    vars.iter().map(|&id| (id, engine.store.get(id))).collect()
}

/// Enumerate every consistent assignment of `vars` (expected to be
/// `Integer`-kinded) up to `limit` solutions.
pub fn enumerate(engine: &mut Engine, vars: &[iclp_core::IntervalId], limit: Option<usize>) -> Vec<Assignment> {
    let mut solutions = Vec::new();
    label(engine, vars, limit, &mut solutions);
    solutions
}

fn label(engine: &mut Engine, vars: &[iclp_core::IntervalId], limit: Option<usize>, solutions: &mut Vec<Assignment>) {
    if let Some(n) = limit {
        if solutions.len() >= n {
            return;
        }
    }
    if engine.propagate() == PropagationOutcome::Failed {
        return;
    }
    let next = vars.iter().copied().find(|&id| {
        let (lo, hi) = engine.store.get(id).width_lo_hi();
        hi > lo
    });
    match next {
        None => solutions.push(snapshot(engine, vars)),
        Some(id) => {
            let (lo, hi) = engine.store.get(id).width_lo_hi();

            let checkpoint = engine.checkpoint();
            if engine.narrow_and_wake(id, Bound::from_f64(lo), Bound::from_f64(lo)) {
                label(engine, vars, limit, solutions);
            }
            engine.undo_to(checkpoint);

            if hi > lo {
                if let Some(n) = limit {
                    if solutions.len() >= n {
                        return;
                    }
                }
                let checkpoint = engine.checkpoint();
                if engine.narrow_and_wake(id, Bound::from_f64(lo + 1.0), Bound::from_f64(hi)) {
                    label(engine, vars, limit, solutions);
                }
                engine.undo_to(checkpoint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iclp_compile::{Compiler, Expr};
    use iclp_core::IntervalKind;

    #[test]
    fn test_enumerate_lists_every_value_in_small_domain() {
        let mut c = Compiler::new();
        let x = c.declare("X", IntervalKind::Integer, Bound::from_i64(1), Bound::from_i64(3)).unwrap();
        c.post_constraint(&Expr::var("X").le(Expr::IntConst(3))).unwrap();
        let mut engine = crate::engine::Engine::from_compiler(c).unwrap();
        let solutions = enumerate(&mut engine, &[x], None);
        assert_eq!(solutions.len(), 3);
    }

    #[test]
    fn test_enumerate_respects_limit() {
        let mut c = Compiler::new();
        let x = c.declare("X", IntervalKind::Integer, Bound::from_i64(1), Bound::from_i64(10)).unwrap();
        c.post_constraint(&Expr::var("X").le(Expr::IntConst(10))).unwrap();
        let mut engine = crate::engine::Engine::from_compiler(c).unwrap();
        let solutions = enumerate(&mut engine, &[x], Some(2));
        assert_eq!(solutions.len(), 2);
    }
}
