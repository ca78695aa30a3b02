//! Search statistics and their output.

pub mod statistic_logging;

pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;

/// Counters describing the effort of one search run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStatistics {
    /// Nodes taken from the search tree or the open set.
    pub nodes_expanded: u64,
    /// Forced-move propagation calls.
    pub propagations: u64,
    /// Nodes pruned because their residual was already reached at an equal
    /// or lower cost.
    pub memo_pruned: u64,
    /// Nodes pruned by the admissible lower bound.
    pub bound_pruned: u64,
    /// Times the incumbent improved.
    pub incumbent_updates: u64,
    /// States enqueued by the A* strategy.
    pub enqueued: u64,
}

impl SearchStatistics {
    /// Writes every counter through the statistic logger.
    pub fn log(&self) {
        log_statistic("nodes_expanded", self.nodes_expanded);
        log_statistic("propagations", self.propagations);
        log_statistic("memo_pruned", self.memo_pruned);
        log_statistic("bound_pruned", self.bound_pruned);
        log_statistic("incumbent_updates", self.incumbent_updates);
        log_statistic("enqueued", self.enqueued);
    }
}
