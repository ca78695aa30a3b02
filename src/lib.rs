//! # Presto
//! Presto is a solver for minimum button-press counting problems: given a set
//! of buttons which each increment a fixed subset of counters by one per
//! press, and a target value per counter, it computes the minimum total number
//! of presses such that every counter reaches its target exactly.
//!
//! The solver pipeline consists of four stages:
//! 1. **Algebraic simplification** ([`simplification::simplify`]) rewrites an
//!    instance into an equivalent, smaller instance plus a count of presses
//!    that every solution must contain.
//! 2. **Greedy upper bounding** ([`search::greedy_upper_bound`]) runs a
//!    handful of deterministic heuristics and a bounded number of seeded
//!    randomized trials to find a cheap feasible solution.
//! 3. **Forced-move propagation** deduces presses that are logically required
//!    in any solution of a partial state, and detects infeasible states.
//! 4. **Search** ([`search::minimum_presses`]) explores press-count
//!    assignments per button with branch-and-bound (or, alternatively, A*
//!    over the space of residual vectors), pruned by an admissible lower
//!    bound and a memo table.
//!
//! Instances are written one per line as whitespace-separated tokens: an
//! optional bracketed indicator-light token (accepted and ignored), one
//! parenthesised comma-separated counter-index list per button, and a final
//! brace-delimited comma-separated target vector:
//!
//! ```text
//! [###] (0,1,2) (0,1) (2) {3,3,2}
//! ```
//!
//! # Example
//! ```rust
//! use presto_solver::model::Machine;
//! use presto_solver::search::solve;
//! use presto_solver::search::SolveOptions;
//!
//! let machine = Machine::parse("(0) (1) (0,1) {2,3}").expect("well-formed instance");
//! let presses = solve(machine, &SolveOptions::default());
//! assert_eq!(presses, 3);
//! ```

pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod model;
pub mod search;
pub mod simplification;
pub mod statistics;
