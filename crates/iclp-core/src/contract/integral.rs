//! The `integral` contractor: coerces a `Real` operand into an `Integer`
//! result by rounding inward to the enclosed integer hull (spec §4.3
//! "integral/2 ... inserted automatically by the compiler wherever a
//! Real flows into an Integer-typed position", spec §10).

use crate::interval::{Bound, Interval, IntervalKind};
use crate::node::Op;

use super::{ContractOutcome, Contractor, ContractorRegistry};

struct IntegralOp;
impl Contractor for IntegralOp {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = args[0].width_lo_hi();
        let (xl, xh) = args[1].width_lo_hi();
        // Z's own Integer kind re-rounds these inward via Interval::new
        // in the store; here we just intersect. X, being Real, also
        // benefits from Z's (integer, hence tighter) bounds.
        let new_z = (Bound::Float(xl), Bound::Float(xh));
        let new_x = (Bound::Float(xl.max(zl)), Bound::Float(xh.min(zh)));
        ContractOutcome {
            new_bounds: vec![new_z, new_x],
            persistent: false,
        }
    }
}

pub(super) fn register_all(reg: &mut ContractorRegistry) {
    reg.register(Op::Integral, Box::new(IntegralOp));
}
