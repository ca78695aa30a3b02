//! A* search over the space of residual vectors.
//!
//! An alternative to the depth-first branch-and-bound: states are expanded
//! in order of `f = g + h`, where `g` is the press total spent to reach the
//! residual and `h` is the admissible lower bound. The first solved state
//! expanded is therefore optimal. The open set holds residual keys rather
//! than full states; a state is rebuilt from its key on expansion, and
//! entries that no longer match the best known `g` for their key are stale
//! and skipped.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fnv::FnvHashMap;

use crate::model::Machine;
use crate::statistics::SearchStatistics;

use super::lower_bound::lower_bound;
use super::propagation::propagate_forced_moves;
use super::state::ResidualKey;
use super::state::SearchState;

struct QueueEntry {
    key: ResidualKey,
    g: u64,
    f: u64,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.cmp(&other.f).then(self.g.cmp(&other.g))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Finds the minimum press total for `machine` by A*. Entries whose `f`
/// exceeds a known-feasible `upper_bound` are never enqueued.
///
/// # Panics
/// Panics if the open set runs dry without reaching a solved state; valid
/// instances always have a solution.
pub(crate) fn minimum_presses(
    machine: &Machine,
    upper_bound: Option<u64>,
    statistics: &mut SearchStatistics,
) -> u64 {
    statistics.propagations += 1;
    let Some(start) = propagate_forced_moves(SearchState::initial(machine)) else {
        panic!("the instance is unsatisfiable");
    };
    if start.is_solved() {
        return start.cost();
    }

    let mut g_score: FnvHashMap<ResidualKey, u64> = FnvHashMap::default();
    let _ = g_score.insert(start.residual_key(), start.cost());

    let mut open = BinaryHeap::new();
    open.push(Reverse(QueueEntry {
        f: start.cost() + lower_bound(&start),
        g: start.cost(),
        key: start.residual_key(),
    }));

    loop {
        let Some(Reverse(entry)) = open.pop() else {
            panic!(
                "exhausted the search space without finding a press assignment; \
                 the instance is unsatisfiable"
            );
        };

        if g_score.get(&entry.key) != Some(&entry.g) {
            // A cheaper path to this residual was found after enqueueing.
            continue;
        }

        let state = SearchState::with_residual(machine, entry.key.0.clone(), entry.g);
        if state.is_solved() {
            return entry.g;
        }

        statistics.nodes_expanded += 1;

        let Some(hardest) = state.hardest_counter() else {
            continue;
        };

        for &button in machine.buttons_affecting(hardest) {
            let max = state.max_presses(button);
            let attempts = match max {
                0 => vec![],
                1 => vec![1],
                2..=4 => vec![1, max],
                _ => vec![1, max / 2, max],
            };

            for times in attempts {
                statistics.propagations += 1;
                let Some(neighbour) = state
                    .press(button, times)
                    .and_then(propagate_forced_moves)
                else {
                    // Press counts are tried in ascending order and pressing
                    // more can only remove solutions, so the rest are
                    // infeasible too.
                    break;
                };

                let key = neighbour.residual_key();
                let improves = match g_score.get(&key) {
                    None => true,
                    Some(&previous) => neighbour.cost() < previous,
                };
                if !improves {
                    continue;
                }

                let _ = g_score.insert(key.clone(), neighbour.cost());
                let f = neighbour.cost() + lower_bound(&neighbour);
                if upper_bound.is_some_and(|bound| f > bound) {
                    continue;
                }
                statistics.enqueued += 1;
                open.push(Reverse(QueueEntry {
                    key,
                    g: neighbour.cost(),
                    f,
                }));
            }
        }
    }
}
