//! Aggregator configuration.

/// What to do when the fare query for one split point fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegFailurePolicy {
    /// Fail the whole computation.
    #[default]
    Abort,
    /// Log the failure, record the stop as skipped, and carry on.
    Skip,
}

/// Configuration parameters for fare aggregation.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// How many split points are queried at once.
    /// Results are still reported in route order.
    pub max_concurrent: usize,

    pub leg_failure: LegFailurePolicy,
}

impl AggregatorConfig {
    pub fn new() -> Self {
        Self {
            max_concurrent: 1,
            leg_failure: LegFailurePolicy::Abort,
        }
    }

    /// Query up to `n` split points at once (at least 1).
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    pub fn with_leg_failure(mut self, policy: LegFailurePolicy) -> Self {
        self.leg_failure = policy;
        self
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
