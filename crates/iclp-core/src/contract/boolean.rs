//! Boolean contractors: `and`, `or`, `xor`, `nand`, `nor`, `imply`, `not`
//! (spec §4.3). Booleans are `Integer` intervals confined to `{0, 1}`
//! (spec §3); each operand's *possible values* are just the subset of
//! `{0, 1}` its current bounds admit, so narrowing reduces to enumerating
//! the surviving `(x, y, z)` triples of a truth table and projecting the
//! admissible values for each slot back into an interval.

use crate::interval::{Bound, Interval};
use crate::node::Op;

use super::{ContractOutcome, Contractor, ContractorRegistry};

fn fb(lo: f64, hi: f64) -> (Bound, Bound) {
    (Bound::Float(lo), Bound::Float(hi))
}

/// The subset of `{0, 1}` still admitted by `iv`'s current bounds.
fn possible(iv: &Interval) -> Vec<u8> {
    let (lo, hi) = iv.width_lo_hi();
    [0u8, 1u8]
        .into_iter()
        .filter(|&v| (v as f64) >= lo && (v as f64) <= hi)
        .collect()
}

fn project(values: &[u8]) -> (Bound, Bound) {
    if values.is_empty() {
        return (Bound::Float(f64::INFINITY), Bound::Float(f64::NEG_INFINITY));
    }
    let lo = *values.iter().min().unwrap() as f64;
    let hi = *values.iter().max().unwrap() as f64;
    (Bound::Float(lo), Bound::Float(hi))
}

/// Narrow a binary boolean op given its truth table `f(x, y) -> z`.
fn narrow_binary(args: &[Interval], f: fn(u8, u8) -> u8) -> ContractOutcome {
    let pz = possible(&args[0]);
    let px = possible(&args[1]);
    let py = possible(&args[2]);

    let mut surviving_z = Vec::new();
    let mut surviving_x = Vec::new();
    let mut surviving_y = Vec::new();
    for &x in &px {
        for &y in &py {
            let z = f(x, y);
            if pz.contains(&z) {
                surviving_z.push(z);
                surviving_x.push(x);
                surviving_y.push(y);
            }
        }
    }
    ContractOutcome {
        new_bounds: vec![project(&surviving_z), project(&surviving_x), project(&surviving_y)],
        persistent: surviving_x.len() <= 1 && surviving_y.len() <= 1,
    }
}

struct And;
impl Contractor for And {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        narrow_binary(args, |x, y| x & y)
    }
}

struct Or;
impl Contractor for Or {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        narrow_binary(args, |x, y| x | y)
    }
}

struct Xor;
impl Contractor for Xor {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        narrow_binary(args, |x, y| x ^ y)
    }
}

struct Nand;
impl Contractor for Nand {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        narrow_binary(args, |x, y| 1 - (x & y))
    }
}

struct Nor;
impl Contractor for Nor {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        narrow_binary(args, |x, y| 1 - (x | y))
    }
}

struct Imply;
impl Contractor for Imply {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        narrow_binary(args, |x, y| if x == 1 && y == 0 { 0 } else { 1 })
    }
}

struct Not;
impl Contractor for Not {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let pz = possible(&args[0]);
        let px = possible(&args[1]);
        let mut surviving_z = Vec::new();
        let mut surviving_x = Vec::new();
        for &x in &px {
            let z = 1 - x;
            if pz.contains(&z) {
                surviving_z.push(z);
                surviving_x.push(x);
            }
        }
        ContractOutcome {
            new_bounds: vec![project(&surviving_z), project(&surviving_x)],
            persistent: surviving_x.len() <= 1,
        }
    }
}

pub(super) fn register_all(reg: &mut ContractorRegistry) {
    reg.register(Op::And, Box::new(And));
    reg.register(Op::Or, Box::new(Or));
    reg.register(Op::Xor, Box::new(Xor));
    reg.register(Op::Nand, Box::new(Nand));
    reg.register(Op::Nor, Box::new(Nor));
    reg.register(Op::Imply, Box::new(Imply));
    reg.register(Op::Not, Box::new(Not));
}
