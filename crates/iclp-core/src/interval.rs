//! The interval value itself: a pair of bounds with a type tag (spec §2.2,
//! §3 "Interval").
//!
//! A bound is either an exact rational (kept exact through compilation and
//! propagation so point collapse onto e.g. `1/3` is lossless, spec §9
//! "Rationals vs floats") or an outward-rounded `f64`. Arithmetic on bounds
//! is always done through [`crate::rounded`] on the `f64` projection; the
//! exact representation is preserved only when both sides of an
//! intersection already agree on the same rational value, which is the
//! only case spec.md requires to stay exact (a constant narrowing an
//! interval onto itself).

use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use std::fmt;

use crate::rounded;

/// Boolean is encoded as `Integer` with bounds `(0,1)` (spec §3), not a
/// separate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    Real,
    Integer,
}

impl IntervalKind {
    /// Type unification rule for the binding hook (spec §4.6): "two reals
    /// stay real; any integer makes the result integer".
    pub fn unify(self, other: IntervalKind) -> IntervalKind {
        if self == IntervalKind::Integer || other == IntervalKind::Integer {
            IntervalKind::Integer
        } else {
            IntervalKind::Real
        }
    }
}

/// A single interval bound: either exact (a rational, possibly widened
/// later) or an already-inexact float.
#[derive(Debug, Clone)]
pub enum Bound {
    Exact(BigRational),
    Float(f64),
}

impl Bound {
    pub fn pos_inf() -> Bound {
        Bound::Float(f64::INFINITY)
    }
    pub fn neg_inf() -> Bound {
        Bound::Float(f64::NEG_INFINITY)
    }
    pub fn from_i64(n: i64) -> Bound {
        Bound::Exact(BigRational::from_integer(n.into()))
    }
    pub fn from_f64(x: f64) -> Bound {
        Bound::Float(x)
    }

    pub fn is_infinite(&self) -> bool {
        match self {
            Bound::Exact(_) => false,
            Bound::Float(x) => x.is_infinite(),
        }
    }

    pub fn as_exact(&self) -> Option<&BigRational> {
        match self {
            Bound::Exact(r) => Some(r),
            Bound::Float(_) => None,
        }
    }

    /// Outward-rounded projection to `f64`, rounding toward `-inf` for a
    /// lower bound or `+inf` for an upper bound depending on `round_up`.
    pub fn to_f64(&self, round_up: bool) -> f64 {
        match self {
            Bound::Float(x) => *x,
            Bound::Exact(r) => rational_to_f64_outward(r, round_up),
        }
    }

    /// Tighter of two lower bounds: the numerically larger one; ties
    /// prefer the exact representation so point collapse stays lossless.
    pub fn tighter_lo(a: &Bound, b: &Bound) -> Bound {
        let fa = a.to_f64(false);
        let fb = b.to_f64(false);
        if fa > fb {
            a.clone()
        } else if fb > fa {
            b.clone()
        } else {
            prefer_exact(a, b)
        }
    }

    /// Tighter of two upper bounds: the numerically smaller one.
    pub fn tighter_hi(a: &Bound, b: &Bound) -> Bound {
        let fa = a.to_f64(true);
        let fb = b.to_f64(true);
        if fa < fb {
            a.clone()
        } else if fb < fa {
            b.clone()
        } else {
            prefer_exact(a, b)
        }
    }
}

fn prefer_exact(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (Bound::Exact(_), _) => a.clone(),
        (_, Bound::Exact(_)) => b.clone(),
        _ => a.clone(),
    }
}

fn rational_to_f64_outward(r: &BigRational, round_up: bool) -> f64 {
    if let Some(f) = r.to_f64() {
        // `to_f64` rounds to nearest; nudge outward in case the true
        // rational value is strictly beyond the nearest float (spec §4.1
        // "conversions rational<->float with outward rounding when float
        // is inexact").
        let back = BigRational::from_float(f).unwrap_or_else(|| r.clone());
        if &back == r {
            f
        } else if round_up {
            if back < *r {
                rounded::nexttoward(f, f64::INFINITY)
            } else {
                f
            }
        } else if back > *r {
            rounded::nexttoward(f, f64::NEG_INFINITY)
        } else {
            f
        }
    } else if r.is_positive() {
        f64::INFINITY
    } else if r.is_negative() {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Exact(r) => write!(f, "{r}"),
            Bound::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A standalone interval value (no watcher/store linkage): `(lo, hi)`
/// plus a type tag. Used both for literals flowing through the compiler
/// and as the return shape of `IntervalStore::get`.
#[derive(Debug, Clone)]
pub struct Interval {
    pub kind: IntervalKind,
    pub lo: Bound,
    pub hi: Bound,
}

impl Interval {
    pub fn new(kind: IntervalKind, lo: Bound, hi: Bound) -> Interval {
        let mut iv = Interval { kind, lo, hi };
        iv.round_to_kind();
        iv
    }

    pub fn real(lo: f64, hi: f64) -> Interval {
        Interval::new(IntervalKind::Real, Bound::Float(lo), Bound::Float(hi))
    }

    pub fn integer(lo: i64, hi_is_inf: Option<i64>) -> Interval {
        let hi = match hi_is_inf {
            Some(h) => Bound::from_i64(h),
            None => Bound::pos_inf(),
        };
        Interval::new(IntervalKind::Integer, Bound::from_i64(lo), hi)
    }

    pub fn boolean() -> Interval {
        Interval::new(IntervalKind::Integer, Bound::from_i64(0), Bound::from_i64(1))
    }

    pub fn point(kind: IntervalKind, value: Bound) -> Interval {
        Interval::new(kind, value.clone(), value)
    }

    /// Invariant (spec §3): for `Integer` type, re-round inward (ceil the
    /// low bound, floor the high bound) so non-integral bounds never
    /// persist.
    fn round_to_kind(&mut self) {
        if self.kind != IntervalKind::Integer {
            return;
        }
        self.lo = ceil_bound(&self.lo);
        self.hi = floor_bound(&self.hi);
    }

    /// `true` if `lo > hi`, i.e. this enclosure is empty and any update
    /// producing it must fail (spec §3 "If an update produces L > H").
    pub fn is_empty(&self) -> bool {
        self.lo.to_f64(false) > self.hi.to_f64(true)
    }

    /// If `lo == hi` and that value is exactly representable, the point
    /// collapse invariant (spec §3) applies: return the collapsed
    /// rational value.
    pub fn collapsed_point(&self) -> Option<BigRational> {
        if self.lo.to_f64(false) != self.hi.to_f64(true) {
            return None;
        }
        match (&self.lo, &self.hi) {
            (Bound::Exact(a), Bound::Exact(b)) if a == b => Some(a.clone()),
            (Bound::Exact(a), Bound::Float(_)) => Some(a.clone()),
            (Bound::Float(_), Bound::Exact(b)) => Some(b.clone()),
            (Bound::Float(a), Bound::Float(b)) if a == b && a.is_finite() => {
                BigRational::from_float(*a)
            }
            _ => None,
        }
    }

    pub fn width_lo_hi(&self) -> (f64, f64) {
        (self.lo.to_f64(false), self.hi.to_f64(true))
    }

    /// Width rounded up (spec §4.7 `delta`).
    pub fn delta(&self) -> f64 {
        let (lo, hi) = self.width_lo_hi();
        rounded::sub_hi(hi, lo)
    }

    /// Goualard's overflow-avoiding midpoint formula (spec §4.7).
    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.width_lo_hi();
        if lo == f64::NEG_INFINITY && hi == f64::INFINITY {
            return 0.0;
        }
        if lo == f64::NEG_INFINITY {
            return f64::MIN / 2.0;
        }
        if hi == f64::INFINITY {
            return f64::MAX / 2.0;
        }
        lo + 0.5 * (hi - lo)
    }

    /// Median: 0 if the interval contains 0, otherwise the
    /// sign-appropriate `sqrt(|lo| * |hi|)` (spec §4.7).
    pub fn median(&self) -> f64 {
        let (lo, hi) = self.width_lo_hi();
        if lo <= 0.0 && hi >= 0.0 {
            return 0.0;
        }
        if lo > 0.0 {
            (lo * hi).sqrt()
        } else {
            -((lo.abs()) * (hi.abs())).sqrt()
        }
    }
}

fn ceil_bound(b: &Bound) -> Bound {
    match b {
        Bound::Exact(r) => {
            if r.is_integer() {
                Bound::Exact(r.clone())
            } else {
                Bound::Exact(r.ceil())
            }
        }
        Bound::Float(x) => {
            if x.is_infinite() {
                Bound::Float(*x)
            } else {
                Bound::Float(x.ceil())
            }
        }
    }
}

fn floor_bound(b: &Bound) -> Bound {
    match b {
        Bound::Exact(r) => {
            if r.is_integer() {
                Bound::Exact(r.clone())
            } else {
                Bound::Exact(r.floor())
            }
        }
        Bound::Float(x) => {
            if x.is_infinite() {
                Bound::Float(*x)
            } else {
                Bound::Float(x.floor())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_interval_delta_midpoint_median() {
        let iv = Interval::real(3.0, 3.0);
        assert_eq!(iv.delta(), 0.0);
        assert_eq!(iv.midpoint(), 3.0);
        assert_eq!(iv.median(), 3.0);
    }

    #[test]
    fn test_unbounded_midpoint_is_zero() {
        let iv = Interval::real(f64::NEG_INFINITY, f64::INFINITY);
        assert_eq!(iv.midpoint(), 0.0);
    }

    #[test]
    fn test_median_crossing_zero_is_zero() {
        let iv = Interval::real(-3.0, 5.0);
        assert_eq!(iv.median(), 0.0);
    }

    #[test]
    fn test_median_positive_interval() {
        let iv = Interval::real(4.0, 9.0);
        assert!((iv.median() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_integer_rounds_inward() {
        let iv = Interval::new(
            IntervalKind::Integer,
            Bound::Float(1.2),
            Bound::Float(4.8),
        );
        assert_eq!(iv.lo.to_f64(false), 2.0);
        assert_eq!(iv.hi.to_f64(true), 4.0);
    }

    #[test]
    fn test_integer_empty_after_rounding_is_empty() {
        // [4.1, 4.9] contains no integer.
        let iv = Interval::new(
            IntervalKind::Integer,
            Bound::Float(4.1),
            Bound::Float(4.9),
        );
        assert!(iv.is_empty());
    }

    #[test]
    fn test_collapsed_point_exact() {
        let half = Bound::Exact(BigRational::new(1.into(), 2.into()));
        let iv = Interval::point(IntervalKind::Real, half);
        let p = iv.collapsed_point().unwrap();
        assert_eq!(p, BigRational::new(1.into(), 2.into()));
    }

    #[test]
    fn test_kind_unify() {
        assert_eq!(
            IntervalKind::Real.unify(IntervalKind::Real),
            IntervalKind::Real
        );
        assert_eq!(
            IntervalKind::Real.unify(IntervalKind::Integer),
            IntervalKind::Integer
        );
    }

    #[test]
    fn test_is_empty_when_lo_greater_than_hi() {
        let iv = Interval::real(5.0, 1.0);
        assert!(iv.is_empty());
    }
}
