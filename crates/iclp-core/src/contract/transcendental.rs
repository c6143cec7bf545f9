//! Transcendental contractors: `exp`, `log`, `sin`, `cos`, `tan` (spec
//! §4.3). Forward narrowing only for the trigonometric family, since their
//! reverse images are generally infinite unions of intervals that don't
//! fit the single-`Interval` representation (spec §4.3 "sound
//! over-approximation" escape hatch).

use crate::interval::{Bound, Interval};
use crate::node::Op;
use crate::rounded::*;

use super::{ContractOutcome, Contractor, ContractorRegistry};

fn fb(lo: f64, hi: f64) -> (Bound, Bound) {
    (Bound::Float(lo), Bound::Float(hi))
}

fn lohi(iv: &Interval) -> (f64, f64) {
    iv.width_lo_hi()
}

struct Exp;
impl Contractor for Exp {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let new_z = fb(exp_lo(xl), exp_hi(xh));
        // Reverse: X = ln(Z), valid where Z > 0.
        let new_x = if zl > 0.0 {
            fb(xl.max(ln_lo(zl)), xh.min(ln_hi(zh)))
        } else {
            fb(xl, xh)
        };
        ContractOutcome {
            new_bounds: vec![new_z, new_x],
            persistent: false,
        }
    }
}

struct Log;
impl Contractor for Log {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let new_z = fb(ln_lo(xl), ln_hi(xh));
        // Reverse: X = exp(Z).
        let new_x = fb(xl.max(exp_lo(zl)), xh.min(exp_hi(zh)));
        ContractOutcome {
            new_bounds: vec![new_z, new_x],
            persistent: false,
        }
    }
}

struct Sin;
impl Contractor for Sin {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (xl, xh) = lohi(&args[1]);
        let (nzl, nzh) = sin_range(xl, xh);
        ContractOutcome {
            new_bounds: vec![fb(nzl, nzh), fb(xl, xh)],
            persistent: false,
        }
    }
}

struct Cos;
impl Contractor for Cos {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (xl, xh) = lohi(&args[1]);
        let (nzl, nzh) = cos_range(xl, xh);
        ContractOutcome {
            new_bounds: vec![fb(nzl, nzh), fb(xl, xh)],
            persistent: false,
        }
    }
}

struct Tan;
impl Contractor for Tan {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (xl, xh) = lohi(&args[1]);
        let (nzl, nzh) = tan_range(xl, xh);
        ContractOutcome {
            new_bounds: vec![fb(nzl, nzh), fb(xl, xh)],
            persistent: false,
        }
    }
}

pub(super) fn register_all(reg: &mut ContractorRegistry) {
    reg.register(Op::Exp, Box::new(Exp));
    reg.register(Op::Log, Box::new(Log));
    reg.register(Op::Sin, Box::new(Sin));
    reg.register(Op::Cos, Box::new(Cos));
    reg.register(Op::Tan, Box::new(Tan));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval as Iv;

    #[test]
    fn test_exp_forward_and_reverse() {
        let exp = Exp;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(0.0, 1.0);
        let out = exp.narrow(&[z, x]);
        let (lo, hi) = (out.new_bounds[0].0.to_f64(false), out.new_bounds[0].1.to_f64(true));
        assert!(lo <= 1.0 && hi >= std::f64::consts::E);
    }

    #[test]
    fn test_log_of_positive() {
        let log = Log;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(1.0, std::f64::consts::E);
        let out = log.narrow(&[z, x]);
        let (lo, hi) = (out.new_bounds[0].0.to_f64(false), out.new_bounds[0].1.to_f64(true));
        assert!(lo <= 0.0 && hi >= 1.0);
    }

    #[test]
    fn test_sin_straddles_extremum() {
        let sin = Sin;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(0.0, std::f64::consts::PI);
        let out = sin.narrow(&[z, x]);
        assert_eq!(out.new_bounds[0].1.to_f64(true), 1.0);
    }

    #[test]
    fn test_tan_no_pole_tight_bounds() {
        let tan = Tan;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(0.0, 0.5);
        let out = tan.narrow(&[z, x]);
        let (lo, hi) = (out.new_bounds[0].0.to_f64(false), out.new_bounds[0].1.to_f64(true));
        assert!(lo <= 0.0 && hi >= 0.5_f64.tan());
        assert!(hi.is_finite());
    }
}
