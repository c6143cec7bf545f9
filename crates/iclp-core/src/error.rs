//! Unified error type for the interval constraint engine.
//!
//! Consistency failures (an operand narrowed to an empty enclosure) are
//! *not* reported through this type in the propagation hot path — they are
//! reported as [`crate::scheduler::PropagationOutcome::Failed`] so they can
//! compose with backtracking (spec §7 "Propagation policy"). `IclpError` is
//! for errors raised at a boundary, before any state has been mutated, or at
//! the CLI surface.

use thiserror::Error;

/// Errors surfaced outside of propagation: at declaration time, at
/// compile time, or at process initialisation.
#[derive(Error, Debug)]
pub enum IclpError {
    /// A contractor (or a top-level declaration) produced an empty
    /// enclosure. Kept as a named variant for callers that post a
    /// constraint outside of any choice point and have nothing to
    /// backtrack into.
    #[error("consistency failure: {0}")]
    Consistency(String),

    /// A declaration attached a non-numeric domain, or a constraint used
    /// an operator the compiler does not recognise. Raised before any
    /// interval or node state is modified.
    #[error("type error: {0}")]
    TypeError(String),

    /// A numeric domain error (e.g. `sqrt` of an interval with no
    /// overlap with `[0, inf)`), distinguished from a generic consistency
    /// failure only for diagnostics.
    #[error("numeric domain error: {0}")]
    NumericDomain(String),

    /// The host environment lacks IEEE-754 double precision or another
    /// prerequisite checked at `Engine` construction.
    #[error("host environment error: {0}")]
    HostEnvironment(String),
}

/// Convenience alias, matching the teacher's `GatResult<T>`.
pub type IclpResult<T> = Result<T, IclpError>;
