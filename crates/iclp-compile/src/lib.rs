//! The expression AST, constant folder, type inference, and the
//! recursive-decomposition compiler that lowers a constraint script onto
//! an `iclp-core` node graph (spec §10 "Constraint Compiler").

pub mod compiler;
pub mod expr;
pub mod simplify;
pub mod types;

pub use compiler::Compiler;
pub use expr::Expr;
pub use simplify::simplify;
pub use types::{infer_kind, TypeEnv};
