//! Minimum-press search.
//!
//! The entry point is [`solve`], which runs the full pipeline on one
//! instance: algebraic simplification, greedy upper bounding, and the
//! configured search strategy. [`minimum_presses`] runs the search stage
//! alone.

mod astar;
mod branch_and_bound;
mod greedy;
mod lower_bound;
mod propagation;
mod state;
#[cfg(test)]
mod test_helper;

use std::fmt::Display;

use clap::ValueEnum;

use crate::model::Machine;
use crate::simplification::simplify;
use crate::simplification::Simplification;
use crate::statistics::should_log_statistics;
use crate::statistics::SearchStatistics;

pub use greedy::greedy_upper_bound;
pub use greedy::GreedyOptions;

/// The search strategy used to prove optimality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchStrategy {
    /// Depth-first branch-and-bound with forced-move propagation,
    /// memoization, and lower-bound pruning.
    #[default]
    BranchAndBound,
    /// A* over residual vectors; expands states in order of cost plus lower
    /// bound.
    Astar,
}

impl Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::BranchAndBound => write!(f, "branch-and-bound"),
            SearchStrategy::Astar => write!(f, "astar"),
        }
    }
}

/// Options for [`solve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    pub strategy: SearchStrategy,
    pub greedy: GreedyOptions,
}

/// The minimum number of presses needed to reach every target of `machine`
/// exactly, ignoring simplification. `upper_bound` must be feasible when
/// given.
///
/// # Panics
/// Panics if the instance has no solution.
pub fn minimum_presses(
    machine: &Machine,
    upper_bound: Option<u64>,
    strategy: SearchStrategy,
    statistics: &mut SearchStatistics,
) -> u64 {
    match strategy {
        SearchStrategy::BranchAndBound => {
            branch_and_bound::minimum_presses(machine, upper_bound, statistics)
        }
        SearchStrategy::Astar => astar::minimum_presses(machine, upper_bound, statistics),
    }
}

/// Runs the full pipeline on one instance and returns its minimum press
/// total.
///
/// # Panics
/// Panics if the instance has no solution.
pub fn solve(machine: Machine, options: &SolveOptions) -> u64 {
    let Simplification { presses, machine } = simplify(machine);
    let upper_bound = greedy_upper_bound(&machine, &options.greedy);

    let mut statistics = SearchStatistics::default();
    let optimal = minimum_presses(&machine, upper_bound, options.strategy, &mut statistics);
    if should_log_statistics() {
        statistics.log();
    }

    presses + optimal
}
