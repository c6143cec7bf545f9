//! Constant folding and a handful of algebraic identities, run once
//! before compilation (spec §10 "Simplification pass ... folds constant
//! subtrees and drops algebraic no-ops before node construction so the
//! graph doesn't carry dead weight like `X*1` or `X+0`").

use crate::expr::Expr;

/// Recursively fold constant subtrees and strip identity operations.
/// Never changes the *meaning* of an expression, only its size.
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Var(_) | Expr::IntConst(_) | Expr::RealConst(_) => expr.clone(),

        Expr::Neg(a) => match simplify(a) {
            Expr::IntConst(x) => Expr::IntConst(-x),
            Expr::RealConst(x) => Expr::RealConst(-x),
            other => Expr::Neg(Box::new(other)),
        },
        Expr::Not(a) => match simplify(a) {
            Expr::IntConst(0) => Expr::IntConst(1),
            Expr::IntConst(1) => Expr::IntConst(0),
            other => Expr::Not(Box::new(other)),
        },
        Expr::Abs(a) => match simplify(a) {
            Expr::IntConst(x) => Expr::IntConst(x.abs()),
            Expr::RealConst(x) => Expr::RealConst(x.abs()),
            other => Expr::Abs(Box::new(other)),
        },
        Expr::Sqrt(a) => unary_fold(simplify(a), Expr::Sqrt, f64::sqrt),
        Expr::Exp(a) => unary_fold(simplify(a), Expr::Exp, f64::exp),
        Expr::Log(a) => unary_fold(simplify(a), Expr::Log, f64::ln),
        Expr::Sin(a) => unary_fold(simplify(a), Expr::Sin, f64::sin),
        Expr::Cos(a) => unary_fold(simplify(a), Expr::Cos, f64::cos),
        Expr::Tan(a) => unary_fold(simplify(a), Expr::Tan, f64::tan),

        Expr::Add(a, b) => fold_binary_arith(
            simplify(a),
            simplify(b),
            Expr::Add,
            |x, y| x.checked_add(y),
            |x, y| x + y,
            Some(0),
        ),
        Expr::Sub(a, b) => fold_binary_arith(
            simplify(a),
            simplify(b),
            Expr::Sub,
            |x, y| x.checked_sub(y),
            |x, y| x - y,
            None,
        ),
        Expr::Mul(a, b) => {
            let (sa, sb) = (simplify(a), simplify(b));
            if is_zero(&sa) || is_zero(&sb) {
                return Expr::IntConst(0);
            }
            if is_one(&sa) {
                return sb;
            }
            if is_one(&sb) {
                return sa;
            }
            fold_binary_arith(sa, sb, Expr::Mul, |x, y| x.checked_mul(y), |x, y| x * y, None)
        }
        Expr::Div(a, b) => Expr::Div(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Pow(a, b) => Expr::Pow(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Min(a, b) => Expr::Min(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Max(a, b) => Expr::Max(Box::new(simplify(a)), Box::new(simplify(b))),

        Expr::Eq(a, b) => Expr::Eq(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Ne(a, b) => Expr::Ne(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Lt(a, b) => Expr::Lt(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Le(a, b) => Expr::Le(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Subset(a, b) => Expr::Subset(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Superset(a, b) => Expr::Superset(Box::new(simplify(a)), Box::new(simplify(b))),

        Expr::And(a, b) => Expr::And(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Or(a, b) => Expr::Or(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Xor(a, b) => Expr::Xor(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Nand(a, b) => Expr::Nand(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Nor(a, b) => Expr::Nor(Box::new(simplify(a)), Box::new(simplify(b))),
        Expr::Imply(a, b) => Expr::Imply(Box::new(simplify(a)), Box::new(simplify(b))),
    }
}

fn is_zero(e: &Expr) -> bool {
    matches!(e, Expr::IntConst(0)) || matches!(e, Expr::RealConst(x) if *x == 0.0)
}

fn is_one(e: &Expr) -> bool {
    matches!(e, Expr::IntConst(1)) || matches!(e, Expr::RealConst(x) if *x == 1.0)
}

fn unary_fold(a: Expr, rebuild: fn(Box<Expr>) -> Expr, f: fn(f64) -> f64) -> Expr {
    match a {
        Expr::IntConst(x) => Expr::RealConst(f(x as f64)),
        Expr::RealConst(x) => Expr::RealConst(f(x)),
        other => rebuild(Box::new(other)),
    }
}

/// Fold a binary arithmetic node when both operands are constants,
/// preferring an exact integer result when both operands were integers
/// and the integer operation doesn't overflow; otherwise drop to `f64`.
/// `identity` is the value of the right-hand identity element (e.g. `0`
/// for `+`) stripped when matched.
fn fold_binary_arith(
    a: Expr,
    b: Expr,
    rebuild: fn(Box<Expr>, Box<Expr>) -> Expr,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    identity: Option<i64>,
) -> Expr {
    if let Some(id) = identity {
        if matches!(b, Expr::IntConst(n) if n == id) {
            return a;
        }
    }
    match (&a, &b) {
        (Expr::IntConst(x), Expr::IntConst(y)) => {
            if let Some(v) = int_op(*x, *y) {
                return Expr::IntConst(v);
            }
            Expr::RealConst(float_op(*x as f64, *y as f64))
        }
        (Expr::IntConst(x), Expr::RealConst(y)) => Expr::RealConst(float_op(*x as f64, *y)),
        (Expr::RealConst(x), Expr::IntConst(y)) => Expr::RealConst(float_op(*x, *y as f64)),
        (Expr::RealConst(x), Expr::RealConst(y)) => Expr::RealConst(float_op(*x, *y)),
        _ => rebuild(Box::new(a), Box::new(b)),
    }
}
