//! Algebraic instance reduction.
//!
//! Two rewrite rules are applied to a fixed point, each producing a new,
//! equivalent [`Machine`] together with a number of presses that every
//! solution of the original instance must contain:
//!
//! - **Counter-pair rule**: for an ordered pair of counters (a, b), if both
//!   are affected by exactly the same buttons their targets must agree and
//!   one of them is redundant. Otherwise, if a's target exceeds b's by `diff`
//!   and exactly one button distinguishes a from b, that button must be
//!   pressed at least `diff` times; when the distinguishing button is the
//!   *only* difference between the two button sets it must be pressed exactly
//!   `diff` times and both it and counter a can be removed.
//! - **Duplicate-button rule**: two buttons with identical counter sets are
//!   interchangeable, so one is deleted. Only checked once no counter-pair
//!   rule fires.
//!
//! Every step removes a counter, removes a button, or strictly decreases the
//! target sum, so the rewrite terminates. Realistic instances shrink
//! dramatically before the search runs.

use log::debug;

use crate::basic_types::CounterSet;
use crate::containers::StorageKey;
use crate::model::ButtonId;
use crate::model::CounterId;
use crate::model::Machine;

/// The result of reducing an instance: the presses forced by the reduction
/// plus the remaining, equivalent instance.
#[derive(Debug)]
pub struct Simplification {
    pub presses: u64,
    pub machine: Machine,
}

/// Rewrites `machine` to a fixed point of the two reduction rules.
///
/// # Panics
/// Panics if the rules prove the instance unsatisfiable (counters with
/// identical button sets but different targets, or forced presses exceeding
/// a target); valid instances always have a solution.
pub fn simplify(machine: Machine) -> Simplification {
    let original_counters = machine.num_counters();
    let original_buttons = machine.num_buttons();

    let mut presses = 0;
    let mut machine = machine;
    while let Some(reduction) = reduce_once(&machine) {
        presses += reduction.forced;
        machine = reduction.machine;
    }

    debug!(
        "simplified {original_counters}x{original_buttons} to {}x{} with {presses} forced presses",
        machine.num_counters(),
        machine.num_buttons(),
    );

    Simplification { presses, machine }
}

struct Reduction {
    forced: u64,
    machine: Machine,
}

fn reduce_once(machine: &Machine) -> Option<Reduction> {
    for a in machine.counter_ids() {
        for b in machine.counter_ids() {
            if a == b {
                continue;
            }

            let buttons_a = machine.buttons_affecting(a);
            let buttons_b = machine.buttons_affecting(b);

            if buttons_a == buttons_b {
                assert!(
                    machine.target(a) == machine.target(b),
                    "counters {} and {} are affected by identical buttons but have targets \
                     {} and {}; the instance is unsatisfiable",
                    a.index(),
                    b.index(),
                    machine.target(a),
                    machine.target(b),
                );
                return Some(Reduction {
                    forced: 0,
                    machine: remove_counter(machine, a),
                });
            }

            let diff = machine.target(a).saturating_sub(machine.target(b));
            if diff == 0 {
                continue;
            }

            let Some(button) = distinguishing_button(machine, a, b) else {
                continue;
            };

            let perfect = is_set_plus_button(buttons_a, buttons_b, button);
            let (mut masks, mut targets) = raw_parts(machine);
            apply_presses(&mut targets, machine.button(button).mask(), diff);

            if perfect {
                masks.remove(button.index());
                remove_counter_from_raw(&mut masks, &mut targets, a);
            }

            return Some(Reduction {
                forced: u64::from(diff),
                machine: Machine::from_parts(masks, targets),
            });
        }
    }

    for a in machine.button_ids() {
        for b in machine.button_ids() {
            if b <= a {
                continue;
            }
            if machine.button(a).mask() == machine.button(b).mask() {
                let (mut masks, targets) = raw_parts(machine);
                masks.remove(a.index());
                return Some(Reduction {
                    forced: 0,
                    machine: Machine::from_parts(masks, targets),
                });
            }
        }
    }

    None
}

/// The unique button affecting `a` but not `b`, if exactly one exists.
fn distinguishing_button(machine: &Machine, a: CounterId, b: CounterId) -> Option<ButtonId> {
    let mut found = None;
    for button in machine.button_ids() {
        let mask = machine.button(button).mask();
        if mask.contains(a) && !mask.contains(b) {
            if found.is_some() {
                return None;
            }
            found = Some(button);
        }
    }
    found
}

/// Whether `buttons_a` is exactly `buttons_b` with `extra` added.
fn is_set_plus_button(buttons_a: &[ButtonId], buttons_b: &[ButtonId], extra: ButtonId) -> bool {
    if buttons_a.len() != buttons_b.len() + 1 {
        return false;
    }
    let mut expected = buttons_b.to_vec();
    let position = expected.partition_point(|&button| button < extra);
    expected.insert(position, extra);
    expected == buttons_a
}

fn raw_parts(machine: &Machine) -> (Vec<CounterSet>, Vec<u32>) {
    let masks = machine
        .button_ids()
        .map(|button| machine.button(button).mask())
        .collect();
    let targets = machine.targets().collect();
    (masks, targets)
}

fn apply_presses(targets: &mut [u32], mask: CounterSet, presses: u32) {
    for counter in mask.iter() {
        let index = counter.index();
        let old = targets[index];
        targets[index] = old.checked_sub(presses).unwrap_or_else(|| {
            panic!(
                "{presses} forced presses exceed the target {old} of counter {index}; \
                 the instance is unsatisfiable"
            )
        });
    }
}

fn remove_counter(machine: &Machine, counter: CounterId) -> Machine {
    let (mut masks, mut targets) = raw_parts(machine);
    remove_counter_from_raw(&mut masks, &mut targets, counter);
    Machine::from_parts(masks, targets)
}

fn remove_counter_from_raw(masks: &mut [CounterSet], targets: &mut Vec<u32>, counter: CounterId) {
    for mask in masks.iter_mut() {
        *mask = mask.compact_without(counter);
    }
    let _ = targets.remove(counter.index());
}
