//! Engine-wide tunables (spec §7 "Propagation policy", §9 "Throttle
//! threshold"). Modeled on the teacher's builder-style solver option
//! structs (e.g. `gat-algo::opf::OpfOptions`): a `Default` plus chained
//! `with_*` setters rather than a constructor with a dozen positional
//! arguments.

/// Fraction of an operand's prior width a narrowing step must achieve to
/// count as "significant" and re-enqueue that operand's watchers (spec
/// §7: below this threshold the scheduler throttles rather than chasing
/// diminishing returns on a non-terminating narrowing sequence). The
/// default of `0.10` was chosen as the Open Question resolution recorded
/// in `DESIGN.md`.
pub const DEFAULT_THROTTLE_THRESHOLD: f64 = 0.10;

/// Hard cap on propagation iterations per `solve` call before the engine
/// gives up and reports [`crate::scheduler::PropagationOutcome::ThrottledNonEmpty`]
/// instead of looping forever on a non-convergent system (spec §7).
pub const DEFAULT_ITERATION_LIMIT: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub iteration_limit: u64,
    pub throttle_threshold: f64,
    pub default_precision: f64,
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            throttle_threshold: DEFAULT_THROTTLE_THRESHOLD,
            default_precision: 1e-8,
            verbose: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> EngineConfig {
        EngineConfig::default()
    }

    pub fn with_iteration_limit(mut self, limit: u64) -> EngineConfig {
        self.iteration_limit = limit;
        self
    }

    pub fn with_throttle_threshold(mut self, threshold: f64) -> EngineConfig {
        self.throttle_threshold = threshold;
        self
    }

    pub fn with_precision(mut self, precision: f64) -> EngineConfig {
        self.default_precision = precision;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> EngineConfig {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_documented_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.iteration_limit, DEFAULT_ITERATION_LIMIT);
        assert!((cfg.throttle_threshold - DEFAULT_THROTTLE_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_overrides_chain() {
        let cfg = EngineConfig::new()
            .with_iteration_limit(10)
            .with_throttle_threshold(0.5)
            .with_verbose(true);
        assert_eq!(cfg.iteration_limit, 10);
        assert_eq!(cfg.throttle_threshold, 0.5);
        assert!(cfg.verbose);
    }
}
