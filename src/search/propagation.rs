//! Forced-move deduction.
//!
//! Pure fixpoint propagation over a [`SearchState`]: presses that are present
//! in every solution of the state are applied without guessing, and states
//! with no solution are detected. Each pass scans every unsolved counter:
//!
//! - no pressable button left, or total press capacity below the residual ⇒
//!   infeasible;
//! - exactly one pressable button ⇒ that button is pressed exactly the
//!   residual;
//! - total capacity equal to the residual ⇒ every pressable button is
//!   pressed at its capacity.
//!
//! Forced counts of one pass are applied as a single batch; two counters
//! forcing different counts onto the same button is a contradiction. The
//! pass repeats until nothing new is forced.

use crate::containers::StorageKey;
use crate::model::ButtonId;
use crate::presto_assert_moderate;

use super::state::SearchState;

/// Applies all forced moves to `state`. Returns `None` if the state is
/// infeasible.
pub(crate) fn propagate_forced_moves(state: SearchState<'_>) -> Option<SearchState<'_>> {
    let mut state = state;

    loop {
        let machine = state.machine;
        let mut forced: Vec<Option<u32>> = vec![None; machine.num_buttons()];
        let mut any_forced = false;

        for counter in machine.counter_ids() {
            let needed = state.residual(counter);
            if needed == 0 {
                continue;
            }

            let pressable: Vec<ButtonId> = machine
                .buttons_affecting(counter)
                .iter()
                .copied()
                .filter(|&button| state.can_press(button))
                .collect();
            let capacity: u64 = pressable
                .iter()
                .map(|&button| u64::from(state.max_presses(button)))
                .sum();

            if pressable.is_empty() || capacity < u64::from(needed) {
                return None;
            }

            if pressable.len() == 1 {
                force(&mut forced, pressable[0], needed, &mut any_forced)?;
            } else if capacity == u64::from(needed) {
                for &button in &pressable {
                    force(&mut forced, button, state.max_presses(button), &mut any_forced)?;
                }
            }
        }

        if !any_forced {
            return Some(state);
        }

        let mut residual = state.residuals().to_vec();
        let mut cost = state.cost();
        for (index, times) in forced.iter().enumerate() {
            let Some(times) = *times else { continue };
            presto_assert_moderate!(times > 0, "forced presses are always positive");

            let button = ButtonId::create_from_index(index);
            for counter in machine.button(button).counters() {
                let slot = &mut residual[counter.index()];
                *slot = slot.checked_sub(times)?;
            }
            cost += u64::from(times);
        }

        state = SearchState::with_residual(machine, residual.into_boxed_slice(), cost);
    }
}

/// Records a forced press count; a conflicting earlier count for the same
/// button proves the state infeasible.
fn force(
    forced: &mut [Option<u32>],
    button: ButtonId,
    times: u32,
    any_forced: &mut bool,
) -> Option<()> {
    match forced[button.index()] {
        Some(previous) if previous != times => None,
        _ => {
            forced[button.index()] = Some(times);
            *any_forced = true;
            Some(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Machine;

    fn propagate(machine: &Machine) -> Option<SearchState<'_>> {
        propagate_forced_moves(SearchState::initial(machine))
    }

    #[test]
    fn single_button_counters_are_solved_outright() {
        let machine = Machine::new(vec![vec![0]], vec![4]).unwrap();
        let state = propagate(&machine).unwrap();

        assert!(state.is_solved());
        assert_eq!(state.cost(), 4);
    }

    #[test]
    fn forcing_cascades_through_shared_counters() {
        // Counter 0 forces button (0,1) to 2 presses, which leaves counter 1
        // needing 1 press of button (1).
        let machine = Machine::new(vec![vec![0, 1], vec![1]], vec![2, 3]).unwrap();
        let state = propagate(&machine).unwrap();

        assert!(state.is_solved());
        assert_eq!(state.cost(), 3);
    }

    #[test]
    fn saturated_capacity_forces_every_button_to_its_maximum() {
        // Counter 0 needs 4; its two buttons have capacities 2 and 2, so both
        // are forced to the maximum.
        let machine = Machine::new(vec![vec![0, 1], vec![0, 2]], vec![4, 2, 2]).unwrap();
        let state = propagate(&machine).unwrap();

        assert!(state.is_solved());
        assert_eq!(state.cost(), 4);
    }

    #[test]
    fn uncovered_counter_is_infeasible() {
        let machine = Machine::new(vec![vec![0]], vec![1, 1]).unwrap();

        assert!(propagate(&machine).is_none());
    }

    #[test]
    fn insufficient_capacity_is_infeasible() {
        // Button (0,1) is capped at 1 by counter 1, but counter 0 needs 3.
        let machine = Machine::new(vec![vec![0, 1]], vec![3, 1]).unwrap();

        assert!(propagate(&machine).is_none());
    }

    #[test]
    fn overshooting_forced_batch_is_infeasible() {
        // Counter 0 forces (0,1) to 2 presses and counter 2 forces (1,2) to
        // 1 press; together they overshoot counter 1.
        let machine = Machine::new(vec![vec![0, 1], vec![1, 2]], vec![2, 2, 1]).unwrap();

        assert!(propagate(&machine).is_none());
    }

    #[test]
    fn no_deduction_leaves_the_state_unchanged() {
        let machine =
            Machine::new(vec![vec![0, 1], vec![1, 2], vec![0, 2]], vec![2, 2, 2]).unwrap();
        let state = propagate(&machine).unwrap();

        assert_eq!(state.cost(), 0);
        assert_eq!(state.residuals(), &[2, 2, 2]);
    }

    #[test]
    fn propagation_never_loses_optimality() {
        // The propagated cost plus the optimum of the remaining residuals
        // must equal the optimum of the original instance.
        let machine = Machine::new(vec![vec![0, 1], vec![1]], vec![2, 3]).unwrap();
        let state = propagate(&machine).unwrap();

        // Optimal by hand: (0,1) twice, (1) once.
        assert_eq!(state.cost(), 3);
        assert!(state.is_solved());
    }

    #[test]
    fn forced_moves_are_part_of_every_optimal_solution() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        use crate::containers::StorageKey;
        use crate::search::test_helper::brute_force_minimum;
        use crate::search::test_helper::random_feasible_machine;

        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let machine = random_feasible_machine(&mut rng);
            let optimum = brute_force_minimum(&machine)
                .expect("generated instances are feasible by construction");

            let state =
                propagate(&machine).expect("feasible instances cannot propagate to infeasible");

            // Re-pose the remaining residuals as an instance over the same
            // buttons; the forced presses plus its optimum must equal the
            // original optimum.
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
            let remaining = Machine::new(buttons, state.residuals().to_vec()).unwrap();
            let remaining_optimum = brute_force_minimum(&remaining)
                .expect("states reached by sound forced moves stay feasible");

            assert_eq!(
                state.cost() + remaining_optimum,
                optimum,
                "forced moves changed the optimum of {machine}"
            );
        }
    }
}
