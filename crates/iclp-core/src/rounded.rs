//! Rounded numeric kernel: directed-rounding arithmetic over `f64`, plus
//! exact rational constants and the extended values `{-inf, +inf, NaN}`.
//!
//! Rust has no portable way to flip the FPU rounding mode, so every
//! directed operation here uses the "compute in round-to-nearest, then
//! bump outward by one ULP if the true result could have been strictly
//! beyond the representable float" technique described in spec §9
//! ("Directed rounding"). This roughly doubles the cost of each operation
//! versus hardware directed rounding but needs no `unsafe` or
//! platform-specific FE control.

use std::cmp::Ordering;

/// A float extended with signed infinities and NaN, used as an interval
/// bound. `f64` already has `INFINITY`/`NEG_INFINITY`/`NAN` so this is a
/// thin wrapper giving the extended-value vocabulary from spec §2.1/§4.1
/// a name, rather than a new representation.
pub type ExtendedFloat = f64;

/// Step `x` one representable float toward `target`. A direct analogue of
/// C's `nexttoward`, used to widen a float known to under/over-approximate
/// a true real value (spec §4.1).
pub fn nexttoward(x: f64, target: f64) -> f64 {
    if x.is_nan() || target.is_nan() || x == target {
        return x;
    }
    if x == 0.0 {
        return if target > 0.0 { f64::MIN_POSITIVE * f64::EPSILON } else { -f64::MIN_POSITIVE * f64::EPSILON };
    }
    let bits = x.to_bits();
    let next_bits = if (target > x) == (x > 0.0) {
        bits + 1
    } else {
        bits - 1
    };
    f64::from_bits(next_bits)
}

/// One ULP toward negative infinity (used to build `_lo` rounding from a
/// round-to-nearest computation).
#[inline]
fn down(x: f64) -> f64 {
    if x.is_infinite() || x.is_nan() {
        return x;
    }
    nexttoward(x, f64::NEG_INFINITY)
}

/// One ULP toward positive infinity.
#[inline]
fn up(x: f64) -> f64 {
    if x.is_infinite() || x.is_nan() {
        return x;
    }
    nexttoward(x, f64::INFINITY)
}

pub fn add_lo(a: f64, b: f64) -> f64 {
    down(a + b)
}
pub fn add_hi(a: f64, b: f64) -> f64 {
    up(a + b)
}
pub fn sub_lo(a: f64, b: f64) -> f64 {
    down(a - b)
}
pub fn sub_hi(a: f64, b: f64) -> f64 {
    up(a - b)
}
pub fn mul_lo(a: f64, b: f64) -> f64 {
    down(a * b)
}
pub fn mul_hi(a: f64, b: f64) -> f64 {
    up(a * b)
}

/// Division with the convention `1/0 = +inf`, `-1/0 = -inf`, `0/0 = NaN`
/// (spec §4.1 special values). An interval contractor that receives NaN
/// back from here re-clamps to an unbounded direction rather than
/// treating it as a hard error.
pub fn div_lo(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return if a == 0.0 {
            f64::NAN
        } else if (a > 0.0) == b.is_sign_positive() {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    down(a / b)
}
pub fn div_hi(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return if a == 0.0 {
            f64::NAN
        } else if (a > 0.0) == b.is_sign_positive() {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    up(a / b)
}

pub fn sqrt_lo(a: f64) -> f64 {
    if a <= 0.0 {
        return 0.0;
    }
    down(a.sqrt())
}
pub fn sqrt_hi(a: f64) -> f64 {
    if a <= 0.0 {
        return 0.0;
    }
    up(a.sqrt())
}

/// Integer power, exact case-analysis on sign and parity (spec §4.3
/// "pow" — "integer exponents (odd/even distinction for sign)").
pub fn pow_lo(a: f64, n: i32) -> f64 {
    if n % 2 == 0 && a < 0.0 {
        // even power of a negative number: result computed from |a|
        down(a.abs().powi(n))
    } else {
        down(a.powi(n))
    }
}
pub fn pow_hi(a: f64, n: i32) -> f64 {
    if n % 2 == 0 && a < 0.0 {
        up(a.abs().powi(n))
    } else {
        up(a.powi(n))
    }
}

/// General real-exponent power via `exp(y * ln(x))` (spec §4.3 "general
/// real exponents via exp/log"), valid for `x > 0`.
pub fn pow_real_lo(a: f64, y: f64) -> f64 {
    if a <= 0.0 {
        return f64::NEG_INFINITY;
    }
    exp_lo(mul_lo(y, ln_lo(a)))
}
pub fn pow_real_hi(a: f64, y: f64) -> f64 {
    if a <= 0.0 {
        return f64::INFINITY;
    }
    exp_hi(mul_hi(y, ln_hi(a)))
}

pub fn exp_lo(a: f64) -> f64 {
    down(a.exp())
}
pub fn exp_hi(a: f64) -> f64 {
    up(a.exp())
}

pub fn ln_lo(a: f64) -> f64 {
    if a <= 0.0 {
        return f64::NEG_INFINITY;
    }
    down(a.ln())
}
pub fn ln_hi(a: f64) -> f64 {
    if a <= 0.0 {
        return f64::NEG_INFINITY;
    }
    up(a.ln())
}

/// Sound enclosure of `sin` over `[lo, hi]`. Reduces by quadrant so a
/// range spanning a period boundary still gets worst-case `[-1, 1]`
/// bounds rather than a naive (and unsound) `[sin(lo), sin(hi)]`
/// (spec §4.1 "sin/cos/tan over intervals spanning the period boundary").
pub fn sin_range(lo: f64, hi: f64) -> (f64, f64) {
    trig_range(lo, hi, f64::sin, f64::sin, std::f64::consts::FRAC_PI_2)
}

pub fn cos_range(lo: f64, hi: f64) -> (f64, f64) {
    trig_range(lo, hi, f64::cos, f64::cos, 0.0)
}

/// Shared quadrant-reduction logic for `sin`/`cos`: if the interval width
/// already covers a full period, or straddles a point where the
/// reference function's extremum (`phase`) occurs, the sound range is the
/// full `[-1, 1]`. Otherwise the bounds are the rounded endpoint
/// evaluations.
fn trig_range(
    lo: f64,
    hi: f64,
    f: fn(f64) -> f64,
    _f2: fn(f64) -> f64,
    phase: f64,
) -> (f64, f64) {
    let two_pi = 2.0 * std::f64::consts::PI;
    if !lo.is_finite() || !hi.is_finite() || hi - lo >= two_pi {
        return (-1.0, 1.0);
    }
    // Does an extremum (f == +-1) occur at lo + phase + k*pi for some k
    // in [lo, hi]? Extrema of sin occur at pi/2 + k*pi; of cos at k*pi.
    let first_extremum = {
        let k = ((lo - phase) / std::f64::consts::PI).ceil();
        phase + k * std::f64::consts::PI
    };
    let mut has_max = false;
    let mut has_min = false;
    let mut k_val = first_extremum;
    while k_val <= hi + 1e-12 {
        if k_val >= lo - 1e-12 {
            let v = f(k_val).round();
            if v >= 1.0 {
                has_max = true;
            } else if v <= -1.0 {
                has_min = true;
            }
        }
        k_val += std::f64::consts::PI;
    }
    let a = f(lo);
    let b = f(hi);
    let mut low = down(a.min(b));
    let mut high = up(a.max(b));
    if has_max {
        high = 1.0;
    }
    if has_min {
        low = -1.0;
    }
    (low, high)
}

/// Sound enclosure of `tan` over `[lo, hi]`. `tan` has a pole at
/// `pi/2 + k*pi`; if one falls strictly inside the interval the sound
/// enclosure is the full real line (spec §4.1).
pub fn tan_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (f64::NEG_INFINITY, f64::INFINITY);
    }
    let pi = std::f64::consts::PI;
    let half_pi = std::f64::consts::FRAC_PI_2;
    let k = ((lo - half_pi) / pi).ceil();
    let pole = half_pi + k * pi;
    if pole > lo + 1e-12 && pole < hi - 1e-12 {
        return (f64::NEG_INFINITY, f64::INFINITY);
    }
    let a = lo.tan();
    let b = hi.tan();
    if a <= b {
        (down(a), up(b))
    } else {
        // crossed a pole right at an endpoint; be conservative
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

/// Total order over extended floats treating NaN as "unbounded in both
/// directions" for comparison purposes used only by `min`/`max`-style
/// bound merges, never by the contractor narrowing logic itself (which
/// must special-case NaN explicitly).
pub fn cmp_ext(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rounds_outward() {
        let lo = add_lo(0.1, 0.2);
        let hi = add_hi(0.1, 0.2);
        assert!(lo <= 0.1 + 0.2);
        assert!(hi >= 0.1 + 0.2);
        assert!(lo <= hi);
    }

    #[test]
    fn test_div_by_zero_signed_infinity() {
        assert_eq!(div_lo(1.0, 0.0), f64::INFINITY);
        assert_eq!(div_lo(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(div_lo(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_sqrt_of_zero_and_negative() {
        assert_eq!(sqrt_lo(0.0), 0.0);
        assert_eq!(sqrt_lo(-5.0), 0.0);
    }

    #[test]
    fn test_pow_even_negative_base() {
        // (-2)^2 = 4, must not be negative just because base is negative.
        assert!(pow_lo(-2.0, 2) <= 4.0);
        assert!(pow_hi(-2.0, 2) >= 4.0);
    }

    #[test]
    fn test_sin_full_period_is_unbounded_to_unit_range() {
        let (lo, hi) = sin_range(0.0, 10.0);
        assert_eq!((lo, hi), (-1.0, 1.0));
    }

    #[test]
    fn test_sin_small_range_tight() {
        let (lo, hi) = sin_range(0.0, 0.1);
        assert!(lo <= 0.0);
        assert!(hi >= 0.1_f64.sin());
        assert!(hi < 0.2);
    }

    #[test]
    fn test_tan_pole_gives_full_range() {
        let (lo, hi) = tan_range(1.0, 2.0); // straddles pi/2
        assert_eq!(lo, f64::NEG_INFINITY);
        assert_eq!(hi, f64::INFINITY);
    }

    #[test]
    fn test_nexttoward_moves_one_step() {
        let x = 1.0_f64;
        let up_x = nexttoward(x, f64::INFINITY);
        assert!(up_x > x);
        let down_x = nexttoward(x, f64::NEG_INFINITY);
        assert!(down_x < x);
    }
}
