//! Symbolic partial differentiation (spec §11 "partial_derivative"), used
//! to build tighter contractors for later-stage narrowing (e.g. interval
//! Newton). Limited to the operators with a closed-form derivative: the
//! relational and boolean families, and `Min`/`Max`, are not
//! differentiable everywhere and return an error instead of a silently
//! wrong result.

use iclp_compile::Expr;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DerivativeError {
    #[error("{0} is not differentiable")]
    NotDifferentiable(String),
    #[error("pow with a non-constant-integer exponent is not supported")]
    UnsupportedExponent,
}

/// `d(expr)/d(var)`, treating every other variable as held constant.
pub fn partial_derivative(expr: &Expr, var: &str) -> Result<Expr, DerivativeError> {
    use Expr::*;
    match expr {
        Var(name) => Ok(if name == var { Expr::IntConst(1) } else { Expr::IntConst(0) }),
        IntConst(_) | RealConst(_) => Ok(Expr::IntConst(0)),

        Neg(a) => Ok(Expr::Neg(Box::new(partial_derivative(a, var)?))),
        Abs(a) => {
            let da = partial_derivative(a, var)?;
            // sign(a) * da, via a / |a| (undefined at a = 0, as with the
            // real derivative of |x|).
            Ok(Expr::Div(Box::new((**a).clone()), Box::new(Expr::Abs(a.clone()))).mul(da))
        }
        Sqrt(a) => {
            let da = partial_derivative(a, var)?;
            Ok(da.div(Expr::RealConst(2.0).mul(Expr::Sqrt(a.clone()))))
        }
        Exp(a) => {
            let da = partial_derivative(a, var)?;
            Ok(Expr::Exp(a.clone()).mul(da))
        }
        Log(a) => {
            let da = partial_derivative(a, var)?;
            Ok(da.div((**a).clone()))
        }
        Sin(a) => {
            let da = partial_derivative(a, var)?;
            Ok(Expr::Cos(a.clone()).mul(da))
        }
        Cos(a) => {
            let da = partial_derivative(a, var)?;
            Ok(Expr::Neg(Box::new(Expr::Sin(a.clone()).mul(da))))
        }
        Tan(a) => {
            let da = partial_derivative(a, var)?;
            let sec2 = Expr::IntConst(1).add(Expr::Tan(a.clone()).pow(Expr::IntConst(2)));
            Ok(sec2.mul(da))
        }

        Add(a, b) => Ok(partial_derivative(a, var)?.add(partial_derivative(b, var)?)),
        Sub(a, b) => Ok(partial_derivative(a, var)?.sub(partial_derivative(b, var)?)),
        Mul(a, b) => {
            let da = partial_derivative(a, var)?;
            let db = partial_derivative(b, var)?;
            Ok(da.mul((**b).clone()).add((**a).clone().mul(db)))
        }
        Div(a, b) => {
            let da = partial_derivative(a, var)?;
            let db = partial_derivative(b, var)?;
            let numerator = da.mul((**b).clone()).sub((**a).clone().mul(db));
            let denominator = (**b).clone().mul((**b).clone());
            Ok(numerator.div(denominator))
        }
        Pow(a, b) => match **b {
            Expr::IntConst(n) => {
                let da = partial_derivative(a, var)?;
                let reduced = (**a).clone().pow(Expr::IntConst(n - 1));
                Ok(Expr::RealConst(n as f64).mul(reduced).mul(da))
            }
            _ => Err(DerivativeError::UnsupportedExponent),
        },

        Min(..) | Max(..) => Err(DerivativeError::NotDifferentiable("min/max".into())),
        Eq(..) | Ne(..) | Lt(..) | Le(..) | Subset(..) | Superset(..) => {
            Err(DerivativeError::NotDifferentiable("relational operator".into()))
        }
        And(..) | Or(..) | Xor(..) | Nand(..) | Nor(..) | Imply(..) | Not(..) => {
            Err(DerivativeError::NotDifferentiable("boolean operator".into()))
        }
    }
}
