//! The search layer: splitting strategies, enumeration, branch-and-bound
//! global optimization, and symbolic differentiation built on top of the
//! `iclp-core` propagation engine and `iclp-compile`'s compiler (spec §11
//! "Search Layer").

pub mod absolve;
pub mod derivative;
pub mod engine;
pub mod enumerate;
pub mod optimize;
pub mod split;

pub use absolve::absolve;
pub use derivative::{partial_derivative, DerivativeError};
pub use engine::Engine;
pub use enumerate::enumerate;
pub use optimize::{global_maximum, global_minimum};
pub use split::{solve, splitsolve, Assignment, SplitPoint};
