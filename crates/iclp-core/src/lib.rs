//! Rounded interval arithmetic, the primitive-relation contractor
//! library, and the fixed-point propagation scheduler underlying the
//! interval constraint engine.
//!
//! This crate has no notion of a constraint *language* — that is
//! `iclp-compile`'s job — or of search/splitting — `iclp-search`. It
//! owns exactly the propagation substrate: intervals, the node graph,
//! the trail, the contractors, and the scheduler that drives them to a
//! fixed point.

pub mod backtrack;
pub mod binding;
pub mod config;
pub mod contract;
pub mod error;
pub mod interval;
pub mod node;
pub mod rounded;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod trail;

pub use backtrack::undo_to;
pub use config::EngineConfig;
pub use contract::{ContractOutcome, Contractor, ContractorRegistry};
pub use error::{IclpError, IclpResult};
pub use interval::{Bound, Interval, IntervalKind};
pub use node::{Agenda, ArgVec, Node, NodeId, Op, Operand};
pub use scheduler::{propagate, PropagationOutcome};
pub use stats::{Stats, WatchAction};
pub use store::{IntervalId, IntervalStore, NarrowOutcome};
pub use trail::{Checkpoint, CounterField, Trail, UndoEntry};
