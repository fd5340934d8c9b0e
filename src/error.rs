//! Error taxonomy for the search engine.
//!
//! Severity ranges from programming-invariant violations (`IllegalAction`,
//! fatal) through per-iteration data issues (`InvalidBeliefState`,
//! recoverable) up to total search failure (`NoViableAction`).

use thiserror::Error;

use crate::core::Action;

/// Errors produced by the state model, determinizer, workers, and
/// coordinator.
#[derive(Clone, Debug, Error)]
pub enum SearchError {
    /// An action was applied that is not legal in the current state.
    ///
    /// This indicates a bug in expansion bookkeeping, not bad input: the
    /// worker only ever applies actions it enumerated itself. The
    /// coordinator aborts the whole search when it surfaces.
    #[error("illegal action {action}: {reason}")]
    IllegalAction {
        /// The offending action.
        action: Action,
        /// Why it was rejected.
        reason: String,
    },

    /// The hidden-information belief cannot be realized as a concrete world
    /// (e.g., the opponent hand count exceeds the unseen card pool).
    ///
    /// Recoverable per iteration: the worker discards the simulation and
    /// draws a fresh one.
    #[error("belief state is inconsistent: {0}")]
    InvalidBeliefState(String),

    /// A worker gave up after too many determinization failures.
    ///
    /// The worker still reports whatever root statistics it accumulated;
    /// the coordinator merely discounts it at merge time.
    #[error("determinization gave up after {failures} failures in {attempts} attempts")]
    DeterminizationExhausted {
        /// Failed determinization attempts.
        failures: u32,
        /// Total attempts (failures + completed iterations).
        attempts: u32,
    },

    /// Every worker failed before producing any root statistics.
    ///
    /// Callers must surface this rather than silently defaulting; re-running
    /// with a larger budget is the suggested recovery.
    #[error("no worker produced a viable root action")]
    NoViableAction,
}
