//! Arithmetic contractors: `+`, `-`, `*`, `/`, `**`, unary `-`, `abs`,
//! `min`, `max`, `sqrt` (spec §4.3).
//!
//! Node slot convention throughout this module: `args[0]` is the result
//! interval `Z`, the remaining slots are the operator's mathematical
//! operands (spec §4.3 "For the ternary add Z = X+Y").

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

struct Add;
impl Contractor for Add {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);
        // NewZ subset Z intersect (X+Y); NewX subset X intersect (Z-Y);
        // NewY subset Y intersect (Z-X) (spec §4.3).
        let new_z = fb(add_lo(xl, yl), add_hi(xh, yh));
        let new_x = fb(sub_lo(zl, yh), sub_hi(zh, yl));
        let new_y = fb(sub_lo(zl, xh), sub_hi(zh, xl));
        // Only truly stable once every operand has collapsed to a point;
        // finite-but-wide bounds (the common case, since undeclared reals
        // default to a large-but-finite domain) still have narrowing left
        // to do on a later fixed-point pass.
        let persistent = xl == xh && yl == yh && zl == zh;
        ContractOutcome {
            new_bounds: vec![new_z, new_x, new_y],
            persistent,
        }
    }
}

struct Sub;
impl Contractor for Sub {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);
        // Z = X - Y <=> X = Z + Y, Y = X - Z
        let new_z = fb(sub_lo(xl, yh), sub_hi(xh, yl));
        let new_x = fb(add_lo(zl, yl), add_hi(zh, yh));
        let new_y = fb(sub_lo(xl, zh), sub_hi(xh, zl));
        ContractOutcome {
            new_bounds: vec![new_z, new_x, new_y],
            persistent: false,
        }
    }
}

/// Interval product via the four corner evaluations (equivalent to the
/// sign-pattern case analysis spec §4.3 describes for `mul`, without
/// hand-enumerating the sign cases).
fn interval_mul(xl: f64, xh: f64, yl: f64, yh: f64) -> (f64, f64) {
    let corners_lo = [
        mul_lo(xl, yl),
        mul_lo(xl, yh),
        mul_lo(xh, yl),
        mul_lo(xh, yh),
    ];
    let corners_hi = [
        mul_hi(xl, yl),
        mul_hi(xl, yh),
        mul_hi(xh, yl),
        mul_hi(xh, yh),
    ];
    let lo = corners_lo.into_iter().fold(f64::INFINITY, f64::min);
    let hi = corners_hi.into_iter().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

/// Interval division. When the divisor straddles zero the quotient is
/// not representable as a single interval; spec §4.3 allows returning "a
/// sound over-approximation... no narrowing along that operand" in that
/// case, which here is simply the unbounded real line.
fn interval_div(xl: f64, xh: f64, yl: f64, yh: f64) -> (f64, f64) {
    let straddles_zero = yl <= 0.0 && yh >= 0.0;
    if straddles_zero {
        return (f64::NEG_INFINITY, f64::INFINITY);
    }
    let corners_lo = [
        div_lo(xl, yl),
        div_lo(xl, yh),
        div_lo(xh, yl),
        div_lo(xh, yh),
    ];
    let corners_hi = [
        div_hi(xl, yl),
        div_hi(xl, yh),
        div_hi(xh, yl),
        div_hi(xh, yh),
    ];
    let lo = corners_lo.into_iter().fold(f64::INFINITY, f64::min);
    let hi = corners_hi.into_iter().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

struct Mul;
impl Contractor for Mul {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);
        let (nzl, nzh) = interval_mul(xl, xh, yl, yh);
        let (nxl, nxh) = interval_div(zl, zh, yl, yh);
        let (nyl, nyh) = interval_div(zl, zh, xl, xh);
        ContractOutcome {
            new_bounds: vec![fb(nzl, nzh), fb(nxl, nxh), fb(nyl, nyh)],
            persistent: false,
        }
    }
}

struct Div;
impl Contractor for Div {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);
        // Z = X / Y <=> X = Z * Y, Y = X / Z
        let (nzl, nzh) = interval_div(xl, xh, yl, yh);
        let (nxl, nxh) = interval_mul(zl, zh, yl, yh);
        let (nyl, nyh) = interval_div(xl, xh, zl, zh);
        ContractOutcome {
            new_bounds: vec![fb(nzl, nzh), fb(nxl, nxh), fb(nyl, nyh)],
            persistent: false,
        }
    }
}

fn pow_interval_int(xl: f64, xh: f64, n: i32) -> (f64, f64) {
    if n == 0 {
        return (1.0, 1.0);
    }
    if n > 0 {
        if n % 2 == 0 {
            if xl >= 0.0 {
                (pow_lo(xl, n), pow_hi(xh, n))
            } else if xh <= 0.0 {
                (pow_lo(xh, n), pow_hi(xl, n))
            } else {
                (0.0, pow_hi(xl, n).max(pow_hi(xh, n)))
            }
        } else {
            (pow_lo(xl, n), pow_hi(xh, n))
        }
    } else {
        // Negative exponent: reciprocal of the positive power (spec §4.3
        // "pow ... the specification handles integer exponents").
        let (pl, ph) = pow_interval_int(xl, xh, -n);
        interval_div(1.0, 1.0, pl, ph)
    }
}

/// Sound (not necessarily maximally tight) nth root enclosure, used to
/// narrow `X` from `Z` when the exponent is a known point integer.
fn nth_root_interval(zl: f64, zh: f64, n: i32) -> (f64, f64) {
    let root = |v: f64| -> f64 {
        if v < 0.0 {
            -((-v).powf(1.0 / n as f64))
        } else {
            v.powf(1.0 / n as f64)
        }
    };
    if n % 2 == 0 {
        // Even root: only defined for z >= 0; clip below.
        let lo_in = zl.max(0.0);
        let hi_in = zh.max(0.0);
        if hi_in < 0.0 {
            return (f64::INFINITY, f64::NEG_INFINITY); // empty: triggers failure downstream
        }
        let r_lo = root(lo_in).abs().max(root(hi_in).abs());
        (-r_lo, r_lo)
    } else {
        let a = root(zl);
        let b = root(zh);
        (a.min(b), a.max(b))
    }
}

struct Pow;
impl Contractor for Pow {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);

        if yl == yh && yl.fract() == 0.0 && yl.is_finite() {
            let n = yl as i32;
            let (fzl, fzh) = pow_interval_int(xl, xh, n);
            let (nxl, nxh) = if n != 0 {
                nth_root_interval(zl, zh, n)
            } else {
                (xl, xh)
            };
            return ContractOutcome {
                new_bounds: vec![fb(fzl, fzh), fb(nxl, nxh), fb(yl, yh)],
                persistent: false,
            };
        }

        // General real exponent via exp/log (spec §4.3 "general real
        // exponents via exp/log"); only sound for a positive base, and
        // only narrows the result (reverse narrowing of X or Y from a
        // non-integer exponent is not attempted).
        if xl > 0.0 {
            let candidates_lo = [
                pow_real_lo(xl, yl),
                pow_real_lo(xl, yh),
                pow_real_lo(xh, yl),
                pow_real_lo(xh, yh),
            ];
            let candidates_hi = [
                pow_real_hi(xl, yl),
                pow_real_hi(xl, yh),
                pow_real_hi(xh, yl),
                pow_real_hi(xh, yh),
            ];
            let lo = candidates_lo.into_iter().fold(f64::INFINITY, f64::min);
            let hi = candidates_hi.into_iter().fold(f64::NEG_INFINITY, f64::max);
            return ContractOutcome {
                new_bounds: vec![fb(lo, hi), fb(xl, xh), fb(yl, yh)],
                persistent: false,
            };
        }

        ContractOutcome::unchanged(args)
    }
}

struct Neg;
impl Contractor for Neg {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let new_z = fb(-xh, -xl);
        let new_x = fb(-zh, -zl);
        ContractOutcome {
            new_bounds: vec![new_z, new_x],
            persistent: false,
        }
    }
}

struct Abs;
impl Contractor for Abs {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (fzl, fzh) = if xl >= 0.0 {
            (xl, xh)
        } else if xh <= 0.0 {
            (-xh, -xl)
        } else {
            (0.0, xh.max(-xl))
        };
        // Backward: X must lie within the envelope [-zh, zh]; the true
        // domain is a union of two intervals that isn't representable
        // here, so this is a sound but not maximally tight enclosure
        // (spec §4.3's pattern for non-single-interval results).
        let new_x = fb(xl.max(-zh), xh.min(zh));
        ContractOutcome {
            new_bounds: vec![fb(fzl, fzh), new_x],
            persistent: false,
        }
    }
}

struct Sqrt;
impl Contractor for Sqrt {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (zl, zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let new_z = fb(sqrt_lo(xl), sqrt_hi(xh));
        // X = Z^2 also narrows the lower bound to 0: sqrt's domain is x >= 0.
        let sq_lo = xl.max(0.0).max(mul_lo(zl, zl));
        let sq_hi = xh.min(mul_hi(zh, zh));
        let new_x = fb(sq_lo, sq_hi.max(sq_lo));
        ContractOutcome {
            new_bounds: vec![new_z, new_x],
            persistent: false,
        }
    }
}

struct Min;
impl Contractor for Min {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (_zl, _zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);
        let new_z = fb(xl.min(yl), xh.min(yh));
        // X, Y >= min(X,Y) = Z, so their lower bounds can rise to Z's.
        let zl_new = xl.min(yl);
        let new_x = fb(xl.max(zl_new), xh);
        let new_y = fb(yl.max(zl_new), yh);
        ContractOutcome {
            new_bounds: vec![new_z, new_x, new_y],
            persistent: false,
        }
    }
}

struct Max;
impl Contractor for Max {
    fn narrow(&self, args: &[Interval]) -> ContractOutcome {
        let (_zl, _zh) = lohi(&args[0]);
        let (xl, xh) = lohi(&args[1]);
        let (yl, yh) = lohi(&args[2]);
        let new_z = fb(xl.max(yl), xh.max(yh));
        let zh_new = xh.max(yh);
        let new_x = fb(xl, xh.min(zh_new));
        let new_y = fb(yl, yh.min(zh_new));
        ContractOutcome {
            new_bounds: vec![new_z, new_x, new_y],
            persistent: false,
        }
    }
}

pub(super) fn register_all(reg: &mut ContractorRegistry) {
    reg.register(Op::Add, Box::new(Add));
    reg.register(Op::Sub, Box::new(Sub));
    reg.register(Op::Mul, Box::new(Mul));
    reg.register(Op::Div, Box::new(Div));
    reg.register(Op::Pow, Box::new(Pow));
    reg.register(Op::Neg, Box::new(Neg));
    reg.register(Op::Abs, Box::new(Abs));
    reg.register(Op::Sqrt, Box::new(Sqrt));
    reg.register(Op::Min, Box::new(Min));
    reg.register(Op::Max, Box::new(Max));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval as Iv;

    #[test]
    fn test_add_narrows_result() {
        let add = Add;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(1.0, 2.0);
        let y = Iv::real(3.0, 4.0);
        let out = add.narrow(&[z, x, y]);
        let (lo, hi) = (out.new_bounds[0].0.to_f64(false), out.new_bounds[0].1.to_f64(true));
        assert!(lo <= 4.0 && hi >= 6.0);
    }

    #[test]
    fn test_add_reverse_narrows_x() {
        let add = Add;
        let z = Iv::real(1.0, 1.0);
        let x = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let y = Iv::real(0.0, 0.0);
        let out = add.narrow(&[z, x, y]);
        let (lo, hi) = (out.new_bounds[1].0.to_f64(false), out.new_bounds[1].1.to_f64(true));
        assert!(lo <= 1.0 && hi >= 1.0);
        assert!(hi - lo < 1e-6);
    }

    #[test]
    fn test_mul_sign_cases() {
        let mul = Mul;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(-2.0, -1.0);
        let y = Iv::real(3.0, 5.0);
        let out = mul.narrow(&[z, x, y]);
        let (lo, hi) = (out.new_bounds[0].0.to_f64(false), out.new_bounds[0].1.to_f64(true));
        assert!(lo <= -10.0 && hi >= -3.0);
    }

    #[test]
    fn test_div_by_interval_containing_zero_is_unbounded() {
        let div = Div;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(1.0, 2.0);
        let y = Iv::real(-1.0, 1.0);
        let out = div.narrow(&[z, x, y]);
        assert_eq!(out.new_bounds[0].0.to_f64(false), f64::NEG_INFINITY);
        assert_eq!(out.new_bounds[0].1.to_f64(true), f64::INFINITY);
    }

    #[test]
    fn test_pow_even_integer_exponent() {
        let pow = Pow;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(-3.0, 2.0);
        let y = Iv::point(crate::interval::IntervalKind::Real, Bound::from_i64(2));
        let out = pow.narrow(&[z, x, y]);
        let (lo, hi) = (out.new_bounds[0].0.to_f64(false), out.new_bounds[0].1.to_f64(true));
        assert!(lo <= 0.0);
        assert!(hi >= 9.0);
    }

    #[test]
    fn test_neg_swaps_and_flips_bounds() {
        let neg = Neg;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(2.0, 5.0);
        let out = neg.narrow(&[z, x]);
        assert_eq!(out.new_bounds[0].0.to_f64(false), -5.0);
        assert_eq!(out.new_bounds[0].1.to_f64(true), -2.0);
    }

    #[test]
    fn test_abs_straddling_zero() {
        let abs = Abs;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(-3.0, 2.0);
        let out = abs.narrow(&[z, x]);
        assert_eq!(out.new_bounds[0].0.to_f64(false), 0.0);
        assert_eq!(out.new_bounds[0].1.to_f64(true), 3.0);
    }

    #[test]
    fn test_min_max_forward() {
        let min = Min;
        let z = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let x = Iv::real(1.0, 5.0);
        let y = Iv::real(2.0, 3.0);
        let out = min.narrow(&[z, x, y]);
        assert_eq!(out.new_bounds[0].0.to_f64(false), 1.0);
        assert_eq!(out.new_bounds[0].1.to_f64(true), 3.0);

        let max = Max;
        let z2 = Iv::real(f64::NEG_INFINITY, f64::INFINITY);
        let out2 = max.narrow(&[z2, Iv::real(1.0, 5.0), Iv::real(2.0, 3.0)]);
        assert_eq!(out2.new_bounds[0].0.to_f64(false), 2.0);
        assert_eq!(out2.new_bounds[0].1.to_f64(true), 5.0);
    }
}
