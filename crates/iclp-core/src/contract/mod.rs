//! The primitive-relation contractor library (spec §2.3, §4.3).
//!
//! Each [`Contractor`] narrows every operand of one primitive given the
//! others, returning the tightest easily-computable enclosure per
//! operand plus a `persistent` flag (spec §3 "Node" `persistent`, §4.3
//! "Persistence"). Dispatch from [`crate::node::Op`] to its `Contractor`
//! goes through a small registry, the same trait-object-by-id pattern as
//! the teacher's OPF solver dispatch
//! (`gat-algo::opf::registry::SolverRegistry` /
//! `gat-algo::opf::traits::{OpfFormulation, OpfBackend}`).

mod arithmetic;
mod boolean;
mod integral;
mod relational;
mod transcendental;

use std::collections::HashMap;

use crate::interval::{Bound, Interval};
use crate::node::Op;

/// Per-operand new enclosure plus the overall persistence verdict for
/// this firing (spec §4.3 "Each contractor also returns a persistent
/// flag").
#[derive(Debug, Clone)]
pub struct ContractOutcome {
    /// `new_bounds[i]` is the candidate `(lo, hi)` for `args[i]`; the
    /// scheduler intersects it with the operand's current bounds rather
    /// than overwriting, so a contractor never needs to special-case
    /// "no narrowing on this operand" — it can just echo the input back.
    pub new_bounds: Vec<(Bound, Bound)>,
    pub persistent: bool,
}

impl ContractOutcome {
    fn unchanged(args: &[Interval]) -> ContractOutcome {
        ContractOutcome {
            new_bounds: args.iter().map(|iv| (iv.lo.clone(), iv.hi.clone())).collect(),
            persistent: false,
        }
    }
}

pub trait Contractor: Send + Sync {
    /// Narrow `args` (in node-slot order, spec §3's `[Z, X, Y]`
    /// convention, see `node::Op::arity`) given their current
    /// enclosures.
    fn narrow(&self, args: &[Interval]) -> ContractOutcome;
}

/// Maps each [`Op`] to its `Contractor` implementation.
pub struct ContractorRegistry {
    contractors: HashMap<Op, Box<dyn Contractor>>,
}

impl ContractorRegistry {
    pub fn new() -> ContractorRegistry {
        ContractorRegistry {
            contractors: HashMap::new(),
        }
    }

    pub fn register(&mut self, op: Op, contractor: Box<dyn Contractor>) {
        self.contractors.insert(op, contractor);
    }

    pub fn get(&self, op: Op) -> Option<&dyn Contractor> {
        self.contractors.get(&op).map(|b| b.as_ref())
    }

    /// Registry pre-populated with every primitive in spec §4.3.
    pub fn with_defaults() -> ContractorRegistry {
        let mut reg = ContractorRegistry::new();
        arithmetic::register_all(&mut reg);
        transcendental::register_all(&mut reg);
        relational::register_all(&mut reg);
        boolean::register_all(&mut reg);
        integral::register_all(&mut reg);
        reg
    }
}

impl Default for ContractorRegistry {
    fn default() -> Self {
        ContractorRegistry::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_every_primitive() {
        let reg = ContractorRegistry::with_defaults();
        let all_ops = [
            Op::Add,
            Op::Sub,
            Op::Mul,
            Op::Div,
            Op::Pow,
            Op::Neg,
            Op::Abs,
            Op::Min,
            Op::Max,
            Op::Sqrt,
            Op::Exp,
            Op::Log,
            Op::Sin,
            Op::Cos,
            Op::Tan,
            Op::Eq,
            Op::Ne,
            Op::Lt,
            Op::Le,
            Op::Subset,
            Op::Superset,
            Op::And,
            Op::Or,
            Op::Xor,
            Op::Nand,
            Op::Nor,
            Op::Imply,
            Op::Not,
            Op::Integral,
        ];
        for op in all_ops {
            assert!(reg.get(op).is_some(), "missing contractor for {op:?}");
        }
    }
}
