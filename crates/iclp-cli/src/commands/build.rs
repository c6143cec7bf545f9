//! Turns a parsed script into a compiled [`iclp_compile::Compiler`], in
//! declaration order, so the reporting commands can print variables in
//! the order the user declared them rather than hash-map order.

use iclp_compile::Compiler;
use iclp_core::{IclpResult, IntervalId};

use crate::parser::Stmt;

pub fn compile_script(stmts: &[Stmt]) -> IclpResult<(Compiler, Vec<(String, IntervalId)>)> {
    let mut compiler = Compiler::new();
    let mut order = Vec::new();
    for stmt in stmts {
        match stmt {
            Stmt::Declare { names, kind, lo, hi } => {
                for name in names {
                    let id = compiler.declare(name, *kind, lo.clone(), hi.clone())?;
                    order.push((name.clone(), id));
                }
            }
            Stmt::Constraints(exprs) => {
                for expr in exprs {
                    compiler.post_constraint(expr)?;
                }
            }
        }
    }
    Ok((compiler, order))
}

/// Resolve `--vars` against the declared names, defaulting to every
/// declared variable in declaration order.
pub fn resolve_vars(requested: &[String], declared: &[(String, IntervalId)]) -> anyhow::Result<Vec<IntervalId>> {
    if requested.is_empty() {
        return Ok(declared.iter().map(|(_, id)| *id).collect());
    }
    requested
        .iter()
        .map(|name| {
            declared
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, id)| *id)
                .ok_or_else(|| anyhow::anyhow!("undeclared variable '{name}'"))
        })
        .collect()
}
