//! Root-parallel coordination: fan out workers, merge their roots.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, warn};

use super::config::SearchConfig;
use super::stats::{AggregateResult, WorkerReport};
use super::worker;
use crate::core::{Action, GameRng, GameState};
use crate::error::SearchError;
use crate::rules;

/// The outcome of one search: the chosen action plus everything that went
/// into choosing it.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// The top-ranked action.
    pub best_action: Action,

    /// Merged root statistics.
    pub aggregate: AggregateResult,

    /// Per-worker reports, in worker order.
    pub reports: Vec<WorkerReport>,
}

/// Search the position and pick an action.
///
/// Spawns `worker_count` independent workers, each with its own tree and a
/// seed derived from the base seed, and merges their root statistics by
/// summation. Workers that failed partway still contribute whatever they
/// accumulated; the search only fails outright when a worker hit an engine
/// bug (`IllegalAction`), when the position is terminal, or when no worker
/// produced a single statistic.
pub fn search(state: &GameState, config: &SearchConfig) -> Result<SearchOutcome, SearchError> {
    if state.is_terminal() {
        return Err(SearchError::NoViableAction);
    }
    if rules::legal_actions(state).is_empty() {
        return Err(SearchError::NoViableAction);
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let deadline = config
        .time_budget_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let worker_count = config.worker_count.max(1);

    info!(
        worker_count,
        base_seed,
        time_budget_ms = config.time_budget_ms,
        max_iterations = config.max_iterations,
        "starting search"
    );

    let reports: Vec<WorkerReport> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..worker_count)
            .map(|i| {
                let seed = GameRng::derive_seed(base_seed, i as u64);
                scope.spawn(move || worker::run(i, state, config, deadline, seed))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(report) => report,
                // A panicking worker contributes nothing.
                Err(_) => {
                    warn!("worker panicked");
                    WorkerReport::new(usize::MAX)
                }
            })
            .collect()
    });

    for report in &reports {
        if let Some(SearchError::IllegalAction { action, reason }) = &report.error {
            return Err(SearchError::IllegalAction {
                action: action.clone(),
                reason: reason.clone(),
            });
        }
        if let Some(err) = &report.error {
            warn!(worker_id = report.worker_id, %err, "worker stopped early");
        }
    }

    let aggregate = merge_reports(&reports);
    let best_action = aggregate.best_action().ok_or(SearchError::NoViableAction)?;

    info!(
        %best_action,
        total_iterations = aggregate.total_iterations,
        "search finished"
    );

    Ok(SearchOutcome {
        best_action,
        aggregate,
        reports,
    })
}

/// Merge worker reports into one aggregate by pure summation.
#[must_use]
pub fn merge_reports(reports: &[WorkerReport]) -> AggregateResult {
    let mut aggregate = AggregateResult::new();
    for report in reports {
        aggregate.merge_report(report);
    }
    aggregate
}

/// Search the position and return the chosen action alone.
pub fn find_next_action(state: &GameState, config: &SearchConfig) -> Result<Action, SearchError> {
    search(state, config).map(|outcome| outcome.best_action)
}

/// Apply a chosen action to the knowable state.
///
/// Deterministic consequences only; the caller folds recognized draws back
/// in with [`GameState::with_drawn_cards`].
pub fn apply_action(state: &GameState, action: &Action) -> Result<GameState, SearchError> {
    rules::apply_to_state(state, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardId, GameConfig};

    fn sample_hand(n: usize) -> Vec<Card> {
        (0..n as u8).map(|i| Card::from_id(CardId(i))).collect()
    }

    fn seeded_config(iterations: u32, workers: usize) -> SearchConfig {
        SearchConfig::default()
            .with_iterations(iterations)
            .with_workers(workers)
            .with_seed(42)
    }

    #[test]
    fn test_terminal_state_is_no_viable_action() {
        let state = GameState::new(sample_hand(8), GameConfig::default())
            .unwrap()
            .with_enemy_health(0.0);
        let err = search(&state, &seeded_config(10, 2)).unwrap_err();
        assert!(matches!(err, SearchError::NoViableAction));
    }

    #[test]
    fn test_apply_action_advances_state() {
        let state = GameState::new(sample_hand(8), GameConfig::default()).unwrap();
        let next = apply_action(&state, &Action::attack(&[0])).unwrap();
        assert!(next.enemy_health < state.enemy_health);
        assert_eq!(next.turn, state.turn + 1);
    }
}
