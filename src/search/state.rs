//! Transient search-tree nodes.

use crate::containers::StorageKey;
use crate::model::ButtonId;
use crate::model::CounterId;
use crate::model::Machine;
use crate::presto_assert_simple;

/// A partial solution: the remaining amount per counter, the presses spent so
/// far, and the per-button press capacity derived from the residuals.
///
/// States are never mutated; [`SearchState::press`] produces a fresh state
/// with a copied residual vector, so parents stay valid while children are
/// explored.
#[derive(Debug, Clone)]
pub(crate) struct SearchState<'a> {
    pub(crate) machine: &'a Machine,
    residual: Box<[u32]>,
    cost: u64,
    max_presses: Box<[u32]>,
}

/// Memo key: the residual vector of a state, with structural equality and
/// hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ResidualKey(pub(crate) Box<[u32]>);

impl<'a> SearchState<'a> {
    pub(crate) fn initial(machine: &'a Machine) -> SearchState<'a> {
        SearchState::with_residual(machine, machine.targets().collect(), 0)
    }

    /// Builds a state from a residual vector, deriving each button's press
    /// capacity (the minimum residual over the counters it affects; a button
    /// affecting no counters can never be pressed).
    pub(crate) fn with_residual(
        machine: &'a Machine,
        residual: Box<[u32]>,
        cost: u64,
    ) -> SearchState<'a> {
        let max_presses = machine
            .button_ids()
            .map(|button| {
                machine
                    .button(button)
                    .counters()
                    .iter()
                    .map(|counter| residual[counter.index()])
                    .min()
                    .unwrap_or(0)
            })
            .collect();

        SearchState {
            machine,
            residual,
            cost,
            max_presses,
        }
    }

    pub(crate) fn residual(&self, counter: CounterId) -> u32 {
        self.residual[counter.index()]
    }

    pub(crate) fn residuals(&self) -> &[u32] {
        &self.residual
    }

    pub(crate) fn residual_key(&self) -> ResidualKey {
        ResidualKey(self.residual.clone())
    }

    pub(crate) fn cost(&self) -> u64 {
        self.cost
    }

    pub(crate) fn max_presses(&self, button: ButtonId) -> u32 {
        self.max_presses[button.index()]
    }

    pub(crate) fn can_press(&self, button: ButtonId) -> bool {
        self.max_presses(button) > 0
    }

    pub(crate) fn pressable_buttons(&self) -> impl Iterator<Item = ButtonId> + '_ {
        self.machine
            .button_ids()
            .filter(move |&button| self.can_press(button))
    }

    pub(crate) fn is_solved(&self) -> bool {
        self.residual.iter().all(|&remaining| remaining == 0)
    }

    /// Presses `button` the given number of times. Returns `None` if any
    /// affected counter would overshoot its target.
    pub(crate) fn press(&self, button: ButtonId, times: u32) -> Option<SearchState<'a>> {
        presto_assert_simple!(times > 0, "pressing a button zero times is meaningless");

        let mut residual = self.residual.clone();
        for counter in self.machine.button(button).counters() {
            let slot = &mut residual[counter.index()];
            *slot = slot.checked_sub(times)?;
        }

        Some(SearchState::with_residual(
            self.machine,
            residual,
            self.cost + u64::from(times),
        ))
    }

    /// The unsolved counter affected by the fewest pressable buttons;
    /// ties break towards the lowest residual, then the lowest index.
    /// `None` when the state is solved.
    pub(crate) fn hardest_counter(&self) -> Option<CounterId> {
        self.machine
            .counter_ids()
            .filter(|&counter| self.residual(counter) > 0)
            .min_by_key(|&counter| {
                (
                    self.pressable_count(counter),
                    self.residual(counter),
                    counter.index(),
                )
            })
    }

    /// All unsolved counters tied for the fewest pressable buttons.
    pub(crate) fn hardest_counters(&self) -> Vec<CounterId> {
        let mut fewest = usize::MAX;
        let mut hardest = Vec::new();

        for counter in self.machine.counter_ids() {
            if self.residual(counter) == 0 {
                continue;
            }
            let pressable = self.pressable_count(counter);
            if pressable < fewest {
                fewest = pressable;
                hardest.clear();
                hardest.push(counter);
            } else if pressable == fewest {
                hardest.push(counter);
            }
        }

        hardest
    }

    fn pressable_count(&self, counter: CounterId) -> usize {
        self.machine
            .buttons_affecting(counter)
            .iter()
            .filter(|&&button| self.can_press(button))
            .count()
    }
}
