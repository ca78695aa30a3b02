//! Admissible lower bound on the remaining presses of a state.
//!
//! The bound is the maximum of three estimates, none of which can exceed the
//! true remaining cost:
//!
//! 1. the largest single residual (one press reduces a counter by at most
//!    one);
//! 2. the residual sum divided (rounding up) by the size of the largest
//!    pressable button (one press reduces the sum by at most that size);
//! 3. for small counter subsets, the subset's residual sum divided (rounding
//!    up) by the most subset counters any single pressable button covers.
//!
//! Estimate 3 generalises both others but is only enumerated for subsets of
//! size at most two to keep the bound cheap; the first two estimates cover
//! the whole-instance cases it would otherwise miss.

use crate::basic_types::CounterSet;
use crate::containers::StorageKey;
use crate::model::ButtonId;
use crate::model::CounterId;

use super::state::SearchState;

/// Sentinel bound for states where residual remains but nothing is
/// pressable; large enough to exceed any real press count, small enough to
/// never overflow when added to a path cost.
pub(crate) const INFEASIBLE_BOUND: u64 = u64::MAX / 4;

pub(crate) fn lower_bound(state: &SearchState<'_>) -> u64 {
    if state.is_solved() {
        return 0;
    }

    let pressable: Vec<ButtonId> = state.pressable_buttons().collect();
    let Some(&largest) = pressable.first() else {
        return INFEASIBLE_BOUND;
    };
    // Buttons are ordered by descending size, so the first pressable button
    // is the largest.
    let largest_size = state.machine.button(largest).size() as u64;

    let total: u64 = state.residuals().iter().map(|&r| u64::from(r)).sum();
    let by_sum = total.div_ceil(largest_size);

    let by_max = state
        .residuals()
        .iter()
        .map(|&r| u64::from(r))
        .max()
        .unwrap_or(0);

    let by_subsets = subset_cover_bound(state, &pressable);

    by_max.max(by_sum).max(by_subsets)
}

/// The best bound over all counter subsets up to the size cap.
fn subset_cover_bound(state: &SearchState<'_>, pressable: &[ButtonId]) -> u64 {
    let cap = state.machine.num_counters().min(2);
    let mut best = 0;
    for size in 1..=cap {
        visit_subsets(state, pressable, 0, size, CounterSet::empty(), 0, &mut best);
    }
    best
}

fn visit_subsets(
    state: &SearchState<'_>,
    pressable: &[ButtonId],
    start: usize,
    remaining: usize,
    subset: CounterSet,
    sum: u64,
    best: &mut u64,
) {
    if remaining == 0 {
        if sum == 0 {
            return;
        }
        let cover = pressable
            .iter()
            .map(|&button| state.machine.button(button).mask().intersection(subset).len())
            .max()
            .unwrap_or(0) as u64;
        if cover == 0 {
            return;
        }
        *best = (*best).max(sum.div_ceil(cover));
        return;
    }

    let last_start = state.machine.num_counters() - remaining;
    for index in start..=last_start {
        let counter = CounterId::create_from_index(index);
        visit_subsets(
            state,
            pressable,
            index + 1,
            remaining - 1,
            subset.with(counter),
            sum + u64::from(state.residual(counter)),
            best,
        );
    }
}
