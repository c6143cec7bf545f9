//! The constraint expression AST (spec §10 "Constraint Compiler").
//!
//! One flat enum covers arithmetic, transcendental, relational, and
//! boolean expressions alike, since spec §3 encodes booleans as
//! `Integer` intervals and every one of these forms compiles to exactly
//! one [`iclp_core::node::Op`] (spec §10 "one `Expr` variant per `Op`,
//! plus `Var` and the two constant leaves").

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(String),
    IntConst(i64),
    RealConst(f64),

    Neg(Box<Expr>),
    Abs(Box<Expr>),
    Sqrt(Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Not(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Min(Box<Expr>, Box<Expr>),
    Max(Box<Expr>, Box<Expr>),

    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Le(Box<Expr>, Box<Expr>),
    Subset(Box<Expr>, Box<Expr>),
    Superset(Box<Expr>, Box<Expr>),

    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Nand(Box<Expr>, Box<Expr>),
    Nor(Box<Expr>, Box<Expr>),
    Imply(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
    pub fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
    pub fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
    pub fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(Box::new(self), Box::new(rhs))
    }
    pub fn eq(self, rhs: Expr) -> Expr {
        Expr::Eq(Box::new(self), Box::new(rhs))
    }
    pub fn lt(self, rhs: Expr) -> Expr {
        Expr::Lt(Box::new(self), Box::new(rhs))
    }
    pub fn le(self, rhs: Expr) -> Expr {
        Expr::Le(Box::new(self), Box::new(rhs))
    }
    pub fn and(self, rhs: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(rhs))
    }
    pub fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }

    /// `true` for the boolean-family operators (spec §3: these produce an
    /// `Integer` result confined to `{0, 1}`).
    pub fn is_boolean_valued(&self) -> bool {
        matches!(
            self,
            Expr::Eq(..)
                | Expr::Ne(..)
                | Expr::Lt(..)
                | Expr::Le(..)
                | Expr::Subset(..)
                | Expr::Superset(..)
                | Expr::And(..)
                | Expr::Or(..)
                | Expr::Xor(..)
                | Expr::Nand(..)
                | Expr::Nor(..)
                | Expr::Imply(..)
                | Expr::Not(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods_compose() {
        let e = Expr::var("X").add(Expr::IntConst(1)).eq(Expr::var("Y"));
        assert!(e.is_boolean_valued());
        match e {
            Expr::Eq(lhs, _) => assert!(matches!(*lhs, Expr::Add(..))),
            _ => panic!("expected Eq"),
        }
    }

    #[test]
    fn test_arithmetic_expr_is_not_boolean_valued() {
        let e = Expr::var("X").mul(Expr::RealConst(2.0));
        assert!(!e.is_boolean_valued());
    }
}
