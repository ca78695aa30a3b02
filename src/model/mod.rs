//! The immutable problem model.
//!
//! A [`Machine`] is a set of buttons and a target vector. Pressing a button
//! increments every counter in its subset by one; the goal of the solver is
//! to reach every target exactly with as few presses as possible.
//!
//! Buttons are canonically ordered by descending size (number of affected
//! counters), with ties broken by the order in which they were given. This
//! makes size-based heuristics monotonic in button-index order: the first
//! pressable button is always the largest.

mod parser;

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::basic_types::CounterSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::presto_assert_simple;

pub use parser::ParseMachineError;

/// Identifies a button of a [`Machine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId {
    id: u32,
}

/// Identifies a counter of a [`Machine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterId {
    id: u32,
}

impl StorageKey for ButtonId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ButtonId { id: index as u32 }
    }
}

impl StorageKey for CounterId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        CounterId { id: index as u32 }
    }
}

/// A single button: the set of counters it increments by one per press.
#[derive(Debug, Clone)]
pub struct Button {
    counters: Box<[CounterId]>,
    mask: CounterSet,
}

impl Button {
    fn from_mask(mask: CounterSet) -> Button {
        Button {
            counters: mask.iter().collect(),
            mask,
        }
    }

    /// The counters this button increments, in ascending index order.
    pub fn counters(&self) -> &[CounterId] {
        &self.counters
    }

    pub fn mask(&self) -> CounterSet {
        self.mask
    }

    /// The number of counters this button increments.
    pub fn size(&self) -> usize {
        self.counters.len()
    }
}

/// One problem instance: an ordered list of buttons and a target per counter.
#[derive(Debug, Clone)]
pub struct Machine {
    buttons: KeyedVec<ButtonId, Button>,
    targets: KeyedVec<CounterId, u32>,
    counter_to_buttons: KeyedVec<CounterId, Vec<ButtonId>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("the instance has {count} counters; only instances with fewer than 32 are supported")]
    TooManyCounters { count: usize },
    #[error("a button references counter {index} but there are only {num_counters} counters")]
    CounterOutOfRange { index: usize, num_counters: usize },
}

impl Machine {
    /// Creates a machine from per-button counter-index lists and the target
    /// vector. Duplicate indices within one button are collapsed.
    pub fn new(buttons: Vec<Vec<usize>>, targets: Vec<u32>) -> Result<Machine, MachineError> {
        if targets.len() >= CounterSet::CAPACITY {
            return Err(MachineError::TooManyCounters {
                count: targets.len(),
            });
        }

        let mut masks = Vec::with_capacity(buttons.len());
        for button in buttons {
            let mut mask = CounterSet::empty();
            for index in button {
                if index >= targets.len() {
                    return Err(MachineError::CounterOutOfRange {
                        index,
                        num_counters: targets.len(),
                    });
                }
                mask.insert(CounterId::create_from_index(index));
            }
            masks.push(mask);
        }

        Ok(Machine::from_parts(masks, targets))
    }

    /// Parses a single instance line. See the crate documentation for the
    /// line format.
    pub fn parse(line: &str) -> Result<Machine, ParseMachineError> {
        parser::parse_machine(line)
    }

    /// Builds a machine from raw parts, establishing the canonical button
    /// order and the counter-to-button adjacency.
    pub(crate) fn from_parts(mut masks: Vec<CounterSet>, targets: Vec<u32>) -> Machine {
        presto_assert_simple!(targets.len() < CounterSet::CAPACITY);

        // Stable, so buttons of equal size keep their given order.
        masks.sort_by_key(|mask| std::cmp::Reverse(mask.len()));

        let mut buttons = KeyedVec::new();
        for mask in masks {
            let _ = buttons.push(Button::from_mask(mask));
        }

        let mut counter_to_buttons = KeyedVec::new();
        let mut target_values = KeyedVec::new();
        for (index, target) in targets.into_iter().enumerate() {
            let counter = CounterId::create_from_index(index);
            let affecting: Vec<ButtonId> = buttons
                .keys()
                .filter(|&button| buttons[button].mask().contains(counter))
                .collect();
            let _ = counter_to_buttons.push(affecting);
            let _ = target_values.push(target);
        }

        Machine {
            buttons,
            targets: target_values,
            counter_to_buttons,
        }
    }

    pub fn num_buttons(&self) -> usize {
        self.buttons.len()
    }

    pub fn num_counters(&self) -> usize {
        self.targets.len()
    }

    pub fn button(&self, button: ButtonId) -> &Button {
        &self.buttons[button]
    }

    pub fn target(&self, counter: CounterId) -> u32 {
        self.targets[counter]
    }

    /// The targets in counter-index order.
    pub fn targets(&self) -> impl Iterator<Item = u32> + '_ {
        self.targets.iter().copied()
    }

    pub fn button_ids(&self) -> impl Iterator<Item = ButtonId> {
        self.buttons.keys()
    }

    pub fn counter_ids(&self) -> impl Iterator<Item = CounterId> {
        self.targets.keys()
    }

    /// The buttons affecting `counter`, in ascending button-index order.
    pub fn buttons_affecting(&self, counter: CounterId) -> &[ButtonId] {
        &self.counter_to_buttons[counter]
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for button in self.buttons.iter() {
            write!(
                f,
                "({}) ",
                button.counters().iter().map(|c| c.index()).join(",")
            )?;
        }
        write!(f, "{{{}}}", self.targets.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_sorted_by_descending_size() {
        let machine =
            Machine::new(vec![vec![0], vec![0, 1, 2], vec![1, 2]], vec![1, 1, 1]).unwrap();

        let sizes: Vec<usize> = machine
            .button_ids()
            .map(|b| machine.button(b).size())
            .collect();
        assert_eq!(sizes, vec![3, 2, 1]);
    }

    #[test]
    fn equal_sizes_keep_their_given_order() {
        let machine = Machine::new(vec![vec![1], vec![0], vec![2]], vec![1, 1, 1]).unwrap();

        let first: Vec<usize> = machine
            .button(ButtonId::create_from_index(0))
            .counters()
            .iter()
            .map(|c| c.index())
            .collect();
        assert_eq!(first, vec![1]);
    }

    #[test]
    fn adjacency_maps_counters_to_affecting_buttons() {
        let machine = Machine::new(vec![vec![0, 1], vec![1]], vec![2, 3]).unwrap();

        let counter_one = CounterId::create_from_index(1);
        assert_eq!(machine.buttons_affecting(counter_one).len(), 2);

        let counter_zero = CounterId::create_from_index(0);
        assert_eq!(machine.buttons_affecting(counter_zero).len(), 1);
    }

    #[test]
    fn out_of_range_counter_is_rejected() {
        let result = Machine::new(vec![vec![0, 3]], vec![1, 1]);

        assert_eq!(
            result.unwrap_err(),
            MachineError::CounterOutOfRange {
                index: 3,
                num_counters: 2
            }
        );
    }

    #[test]
    fn too_many_counters_are_rejected() {
        let result = Machine::new(vec![], vec![0; 32]);

        assert_eq!(result.unwrap_err(), MachineError::TooManyCounters { count: 32 });
    }

    #[test]
    fn duplicate_indices_within_a_button_collapse() {
        let machine = Machine::new(vec![vec![0, 0, 1]], vec![1, 1]).unwrap();

        assert_eq!(machine.button(ButtonId::create_from_index(0)).size(), 2);
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let machine = Machine::new(vec![vec![0, 1], vec![2]], vec![3, 4, 5]).unwrap();
        let reparsed = Machine::parse(&machine.to_string()).unwrap();

        assert_eq!(machine.to_string(), reparsed.to_string());
    }
}
