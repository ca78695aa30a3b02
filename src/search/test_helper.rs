//! Helpers shared by the search unit tests: a brute-force reference solver
//! and a generator of random feasible instances.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::containers::StorageKey;
use crate::model::Machine;

/// Exhaustively enumerates every press-count assignment and returns the
/// cheapest one reaching all targets, or `None` for unsatisfiable instances.
/// Only usable on small instances.
pub(crate) fn brute_force_minimum(machine: &Machine) -> Option<u64> {
    let buttons: Vec<Vec<usize>> = machine
        .button_ids()
        .map(|button| {
            machine
                .button(button)
                .counters()
                .iter()
                .map(|counter| counter.index())
                .collect()
        })
        .collect();
    let mut residual: Vec<u32> = machine.targets().collect();

    let mut best = None;
    enumerate(&buttons, 0, &mut residual, 0, &mut best);
    best
}

fn enumerate(
    buttons: &[Vec<usize>],
    index: usize,
    residual: &mut [u32],
    cost: u64,
    best: &mut Option<u64>,
) {
    if index == buttons.len() {
        if residual.iter().all(|&r| r == 0) {
            *best = Some(best.map_or(cost, |current: u64| current.min(cost)));
        }
        return;
    }

    let counters = &buttons[index];
    let max = counters
        .iter()
        .map(|&counter| residual[counter])
        .min()
        .unwrap_or(0);

    for times in 0..=max {
        if times > 0 {
            for &counter in counters {
                residual[counter] -= 1;
            }
        }
        enumerate(buttons, index + 1, residual, cost + u64::from(times), best);
    }
    for &counter in counters {
        residual[counter] += max;
    }
}

/// Generates a small instance that is feasible by construction: targets are
/// the counter totals of a randomly chosen press assignment.
pub(crate) fn random_feasible_machine(rng: &mut SmallRng) -> Machine {
    let num_counters = rng.gen_range(1..=4);
    let num_buttons = rng.gen_range(1..=4);

    let mut buttons = Vec::with_capacity(num_buttons);
    let mut targets = vec![0; num_counters];
    for _ in 0..num_buttons {
        let mut counters: Vec<usize> = (0..num_counters).filter(|_| rng.gen_bool(0.5)).collect();
        if counters.is_empty() {
            counters.push(rng.gen_range(0..num_counters));
        }

        let presses = rng.gen_range(0..=2u32);
        for &counter in &counters {
            targets[counter] += presses;
        }
        buttons.push(counters);
    }

    Machine::new(buttons, targets).expect("generated instances are always in range")
}
