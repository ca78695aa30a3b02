//! Depth-first branch-and-bound over press-count assignments.

use std::collections::hash_map::Entry;

use fnv::FnvHashMap;
use log::debug;

use crate::model::Machine;
use crate::statistics::SearchStatistics;

use super::lower_bound::lower_bound;
use super::propagation::propagate_forced_moves;
use super::state::ResidualKey;
use super::state::SearchState;

/// Every recursion level applies at least one press, so depth is bounded by
/// the optimal press total; this cap only guards adversarial inputs against
/// stack exhaustion.
const MAX_SEARCH_DEPTH: usize = 4096;

/// Finds the minimum press total for `machine`, seeded with a known-feasible
/// `upper_bound` if one is available.
///
/// # Panics
/// Panics if the search space is exhausted without any solution and no upper
/// bound was given; valid instances always have a solution.
pub(crate) fn minimum_presses(
    machine: &Machine,
    upper_bound: Option<u64>,
    statistics: &mut SearchStatistics,
) -> u64 {
    let mut search = BranchAndBound {
        memo: FnvHashMap::default(),
        best: upper_bound.unwrap_or(u64::MAX),
    };

    search.explore(SearchState::initial(machine), 0, statistics);

    assert!(
        search.best != u64::MAX,
        "exhausted the search space without finding a press assignment; \
         the instance is unsatisfiable"
    );
    search.best
}

/// One search run: the incumbent plus a memo table mapping each residual
/// vector to the cheapest cost at which it was reached. Both live exactly as
/// long as the run, so costs can never leak between instances.
struct BranchAndBound {
    memo: FnvHashMap<ResidualKey, u64>,
    best: u64,
}

impl BranchAndBound {
    fn explore(&mut self, state: SearchState<'_>, depth: usize, statistics: &mut SearchStatistics) {
        assert!(
            depth <= MAX_SEARCH_DEPTH,
            "search recursion exceeded {MAX_SEARCH_DEPTH} levels"
        );

        if state.cost() >= self.best {
            return;
        }

        statistics.nodes_expanded += 1;
        statistics.propagations += 1;
        let Some(state) = propagate_forced_moves(state) else {
            return;
        };

        if state.is_solved() {
            if state.cost() < self.best {
                debug!("new incumbent: {} presses", state.cost());
                self.best = state.cost();
                statistics.incumbent_updates += 1;
            }
            return;
        }

        if state.cost() >= self.best {
            return;
        }

        // Dominance: reaching the same residual at an equal or higher cost
        // cannot improve on the earlier visit.
        match self.memo.entry(state.residual_key()) {
            Entry::Occupied(mut entry) => {
                if *entry.get() <= state.cost() {
                    statistics.memo_pruned += 1;
                    return;
                }
                let _ = entry.insert(state.cost());
            }
            Entry::Vacant(entry) => {
                let _ = entry.insert(state.cost());
            }
        }

        if state.cost() + lower_bound(&state) >= self.best {
            statistics.bound_pruned += 1;
            return;
        }

        let Some(hardest) = state.hardest_counter() else {
            return;
        };

        for &button in state.machine.buttons_affecting(hardest) {
            let max = state.max_presses(button);
            if max == 0 {
                continue;
            }

            // Full commitment and minimal commitment prune fastest; the
            // remaining press counts follow in descending order.
            if let Some(child) = state.press(button, max) {
                self.explore(child, depth + 1, statistics);
            }
            if max == 1 {
                continue;
            }
            if let Some(child) = state.press(button, 1) {
                self.explore(child, depth + 1, statistics);
            }
            for times in (2..max).rev() {
                if let Some(child) = state.press(button, times) {
                    self.explore(child, depth + 1, statistics);
                }
            }
        }
    }
}
