//! Type inference and the `Integral` coercion rule (spec §10 "Type
//! coercion": "every `Expr` gets an `IntervalKind` bottom-up; wherever a
//! `Real`-kinded subexpression feeds an `Integer`-typed position, the
//! compiler inserts an explicit `integral/2` node rather than silently
//! truncating").

use std::collections::HashMap;

use iclp_core::IntervalKind;

use crate::expr::Expr;

/// Declared variable types, populated as variables are declared (spec
/// §10 "the declaration environment").
pub type TypeEnv = HashMap<String, IntervalKind>;

/// Operators whose result is always `Real` regardless of operand kind
/// (spec §4.3: transcendental functions are not closed over the
/// integers).
fn always_real(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Sqrt(_) | Expr::Exp(_) | Expr::Log(_) | Expr::Sin(_) | Expr::Cos(_) | Expr::Tan(_) | Expr::Div(..)
    )
}

/// Infer the `IntervalKind` an `Expr` evaluates to, given the declared
/// kinds of its free variables.
pub fn infer_kind(expr: &Expr, env: &TypeEnv) -> IntervalKind {
    if expr.is_boolean_valued() {
        return IntervalKind::Integer;
    }
    if always_real(expr) {
        return IntervalKind::Real;
    }
    match expr {
        Expr::Var(name) => *env.get(name).unwrap_or(&IntervalKind::Real),
        Expr::IntConst(_) => IntervalKind::Integer,
        Expr::RealConst(_) => IntervalKind::Real,
        Expr::Neg(a) | Expr::Abs(a) => infer_kind(a, env),
        Expr::Add(a, b)
        | Expr::Sub(a, b)
        | Expr::Mul(a, b)
        | Expr::Pow(a, b)
        | Expr::Min(a, b)
        | Expr::Max(a, b) => infer_kind(a, env).unify(infer_kind(b, env)),
        Expr::Not(a) => infer_kind(a, env),
        _ => IntervalKind::Real,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_is_always_integer_valued() {
        let env = TypeEnv::new();
        let e = Expr::IntConst(1).lt(Expr::IntConst(2));
        assert_eq!(infer_kind(&e, &env), IntervalKind::Integer);
    }

    #[test]
    fn test_transcendental_is_always_real() {
        let env = TypeEnv::new();
        let e = Expr::Sqrt(Box::new(Expr::IntConst(4)));
        assert_eq!(infer_kind(&e, &env), IntervalKind::Real);
    }

    #[test]
    fn test_mixed_add_unifies_to_integer() {
        let mut env = TypeEnv::new();
        env.insert("X".into(), IntervalKind::Integer);
        let e = Expr::var("X").add(Expr::RealConst(0.5));
        assert_eq!(infer_kind(&e, &env), IntervalKind::Integer);
    }
}
