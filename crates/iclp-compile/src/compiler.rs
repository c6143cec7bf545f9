//! The recursive-decomposition compiler: walks a simplified [`Expr`]
//! post-order, declaring one fresh result interval and one [`Node`] per
//! compound subexpression, and wiring watcher lists through
//! [`iclp_core::binding`] (spec §10 "Constraint Compiler").

use iclp_core::{
    Agenda, Bound, IclpError, IclpResult, Interval, IntervalId, IntervalKind, IntervalStore, Node,
    NodeId, Op, Operand, Stats, Trail,
};

use crate::expr::Expr;
use crate::simplify::simplify;
use crate::types::{infer_kind, TypeEnv};
use iclp_core::binding::VarBindings;

/// Everything produced by compiling a constraint script: the store and
/// node graph ready to hand to [`iclp_core::propagate`], plus the name ->
/// interval bindings so a caller can read results back out by name.
pub struct Compiler {
    pub store: IntervalStore,
    pub nodes: Vec<Node>,
    pub agenda: Agenda,
    pub trail: Trail,
    pub bindings: VarBindings,
    pub types: TypeEnv,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            store: IntervalStore::new(),
            nodes: Vec::new(),
            agenda: Agenda::new(),
            trail: Trail::new(),
            bindings: VarBindings::new(),
            types: TypeEnv::new(),
        }
    }

    /// Declare a named variable with explicit initial bounds (spec §10
    /// "Declarations"). Re-declaring an existing name is a type error.
    pub fn declare(&mut self, name: &str, kind: IntervalKind, lo: Bound, hi: Bound) -> IclpResult<IntervalId> {
        if self.bindings.lookup(name).is_some() {
            return Err(IclpError::TypeError(format!("variable {name} already declared")));
        }
        let id = self.store.declare(kind, lo, hi);
        self.bindings.bind(name, id);
        self.types.insert(name.to_string(), kind);
        Ok(id)
    }

    /// Compile and post one top-level constraint: `expr` must evaluate to
    /// a boolean, and the compiler asserts it `= 1` (spec §10 "Posting a
    /// constraint").
    pub fn post_constraint(&mut self, expr: &Expr) -> IclpResult<()> {
        let simplified = simplify(expr);
        if !simplified.is_boolean_valued() {
            if let Expr::IntConst(1) = simplified {
                return Ok(());
            }
            return Err(IclpError::TypeError(
                "top-level constraint must be boolean-valued".into(),
            ));
        }
        let result = self.compile(&simplified)?;
        let mut stats = Stats::default();
        self.store
            .intersect_set(result, Bound::from_i64(1), Bound::from_i64(1), &mut self.trail, &mut stats);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<IntervalId> {
        self.bindings.lookup(name)
    }

    pub fn get(&self, id: IntervalId) -> Interval {
        self.store.get(id)
    }

    /// Compile `expr`, returning the interval holding its value. Reuses
    /// the existing binding for a `Var` leaf rather than declaring a
    /// fresh interval.
    fn compile(&mut self, expr: &Expr) -> IclpResult<IntervalId> {
        match expr {
            Expr::Var(name) => self
                .bindings
                .lookup(name)
                .ok_or_else(|| IclpError::TypeError(format!("undeclared variable {name}"))),
            Expr::IntConst(n) => Ok(self.store.declare(IntervalKind::Integer, Bound::from_i64(*n), Bound::from_i64(*n))),
            Expr::RealConst(x) => Ok(self.store.declare(IntervalKind::Real, Bound::from_f64(*x), Bound::from_f64(*x))),
            _ => self.compile_compound(expr),
        }
    }

    fn compile_compound(&mut self, expr: &Expr) -> IclpResult<IntervalId> {
        let (op, operands) = decompose(expr)?;
        let operand_ids = operands
            .iter()
            .map(|e| self.compile(e))
            .collect::<IclpResult<Vec<_>>>()?;

        let result_kind = infer_kind(expr, &self.types);
        let coerced: Vec<IntervalId> = operand_ids
            .iter()
            .zip(operands.iter())
            .map(|(&id, operand_expr)| {
                let operand_kind = infer_kind(operand_expr, &self.types);
                self.coerce_if_needed(id, operand_kind, op, result_kind)
            })
            .collect();

        let result = self
            .store
            .declare(result_kind, Bound::neg_inf(), Bound::pos_inf());
        self.post_node(op, result, &coerced);
        Ok(result)
    }

    /// Insert an `integral/2` node wherever a `Real`-kinded operand feeds
    /// an `Integer`-typed position (spec §10 "wherever a Real flows into
    /// an Integer-typed position"): one of the operand-kind-unifying
    /// arithmetic ops (`+ - * min max pow`) whose own result kind unified
    /// to `Integer` via one of its *other* operands. Relational/boolean
    /// ops are always `Integer`-result (they're boolean-valued) but don't
    /// unify their operands' kinds together, so their operands are left
    /// alone here.
    fn coerce_if_needed(&mut self, id: IntervalId, operand_kind: IntervalKind, op: Op, result_kind: IntervalKind) -> IntervalId {
        let unifies_operand_kinds = matches!(op, Op::Add | Op::Sub | Op::Mul | Op::Pow | Op::Min | Op::Max);
        if !unifies_operand_kinds || operand_kind != IntervalKind::Real || result_kind != IntervalKind::Integer {
            return id;
        }
        let coerced = self.store.declare(IntervalKind::Integer, Bound::neg_inf(), Bound::pos_inf());
        self.post_node(Op::Integral, coerced, &[id]);
        coerced
    }

    fn post_node(&mut self, op: Op, result: IntervalId, operands: &[IntervalId]) -> NodeId {
        let mut args = vec![Operand::Interval(result)];
        args.extend(operands.iter().map(|&id| Operand::Interval(id)));
        let node = Node::new(op, args);
        let node_id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        for &id in std::iter::once(&result).chain(operands.iter()) {
            self.store.add_watcher(id, node_id, &mut self.trail);
        }
        self.nodes[node_id.index()].linked = true;
        self.agenda.push_back(node_id);
        node_id
    }
}

/// Split a compound `Expr` into its `Op` and operand subexpressions.
fn decompose(expr: &Expr) -> IclpResult<(Op, Vec<Expr>)> {
    use Expr::*;
    Ok(match expr {
        Neg(a) => (Op::Neg, vec![(**a).clone()]),
        Abs(a) => (Op::Abs, vec![(**a).clone()]),
        Sqrt(a) => (Op::Sqrt, vec![(**a).clone()]),
        Exp(a) => (Op::Exp, vec![(**a).clone()]),
        Log(a) => (Op::Log, vec![(**a).clone()]),
        Sin(a) => (Op::Sin, vec![(**a).clone()]),
        Cos(a) => (Op::Cos, vec![(**a).clone()]),
        Tan(a) => (Op::Tan, vec![(**a).clone()]),
        Not(a) => (Op::Not, vec![(**a).clone()]),

        Add(a, b) => (Op::Add, vec![(**a).clone(), (**b).clone()]),
        Sub(a, b) => (Op::Sub, vec![(**a).clone(), (**b).clone()]),
        Mul(a, b) => (Op::Mul, vec![(**a).clone(), (**b).clone()]),
        Div(a, b) => (Op::Div, vec![(**a).clone(), (**b).clone()]),
        Pow(a, b) => (Op::Pow, vec![(**a).clone(), (**b).clone()]),
        Min(a, b) => (Op::Min, vec![(**a).clone(), (**b).clone()]),
        Max(a, b) => (Op::Max, vec![(**a).clone(), (**b).clone()]),

        Eq(a, b) => (Op::Eq, vec![(**a).clone(), (**b).clone()]),
        Ne(a, b) => (Op::Ne, vec![(**a).clone(), (**b).clone()]),
        Lt(a, b) => (Op::Lt, vec![(**a).clone(), (**b).clone()]),
        Le(a, b) => (Op::Le, vec![(**a).clone(), (**b).clone()]),
        Subset(a, b) => (Op::Subset, vec![(**a).clone(), (**b).clone()]),
        Superset(a, b) => (Op::Superset, vec![(**a).clone(), (**b).clone()]),

        And(a, b) => (Op::And, vec![(**a).clone(), (**b).clone()]),
        Or(a, b) => (Op::Or, vec![(**a).clone(), (**b).clone()]),
        Xor(a, b) => (Op::Xor, vec![(**a).clone(), (**b).clone()]),
        Nand(a, b) => (Op::Nand, vec![(**a).clone(), (**b).clone()]),
        Nor(a, b) => (Op::Nor, vec![(**a).clone(), (**b).clone()]),
        Imply(a, b) => (Op::Imply, vec![(**a).clone(), (**b).clone()]),

        Var(_) | IntConst(_) | RealConst(_) => {
            return Err(IclpError::TypeError("leaf expression is not compound".into()))
        }
    })
}
