//! Per-worker reports and cross-worker aggregation.

use rustc_hash::FxHashMap;

use crate::core::Action;
use crate::error::SearchError;

/// Accumulated visit statistics for one root action.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActionStats {
    pub visits: u64,
    pub total_value: f64,
}

impl ActionStats {
    /// Mean value, 0.0 when unvisited.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f64
        }
    }
}

/// What one worker brings back from its tree.
///
/// A report is produced even when the worker failed partway: whatever
/// statistics it accumulated before stopping still count, and `error`
/// records why it stopped early.
#[derive(Clone, Debug)]
pub struct WorkerReport {
    pub worker_id: usize,

    /// Root-edge statistics in canonical action order.
    pub root_stats: Vec<(Action, ActionStats)>,

    /// Completed iterations.
    pub iterations: u32,

    /// Determinization attempts that failed.
    pub determinization_failures: u32,

    /// The worker stopped because determinization kept failing.
    pub exhausted: bool,

    /// Wall time spent, microseconds.
    pub time_us: u64,

    /// Why the worker stopped early, if it did.
    pub error: Option<SearchError>,
}

impl WorkerReport {
    #[must_use]
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            root_stats: Vec::new(),
            iterations: 0,
            determinization_failures: 0,
            exhausted: false,
            time_us: 0,
            error: None,
        }
    }
}

/// Merged root statistics across workers.
///
/// Merging is pure summation: per action, visits and total values add.
/// No worker is weighted above any other.
#[derive(Clone, Debug, Default)]
pub struct AggregateResult {
    entries: FxHashMap<Action, ActionStats>,
    pub workers_merged: usize,
    pub total_iterations: u64,
}

impl AggregateResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one worker's root statistics in.
    pub fn merge_report(&mut self, report: &WorkerReport) {
        for (action, stats) in &report.root_stats {
            let entry = self.entries.entry(action.clone()).or_default();
            entry.visits += stats.visits;
            entry.total_value += stats.total_value;
        }
        self.workers_merged += 1;
        self.total_iterations += u64::from(report.iterations);
    }

    #[must_use]
    pub fn get(&self, action: &Action) -> Option<ActionStats> {
        self.entries.get(action).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|s| s.visits == 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Actions best-first: mean value, then visits, then canonical action
    /// order. The ordering is total, so ranking is deterministic.
    ///
    /// Entries without a single visit carry no evidence and rank after
    /// every visited action, whatever the visited means look like.
    #[must_use]
    pub fn ranked(&self) -> Vec<(Action, ActionStats)> {
        let mut ranked: Vec<(Action, ActionStats)> =
            self.entries.iter().map(|(a, s)| (a.clone(), *s)).collect();
        ranked.sort_by(|(a_act, a), (b_act, b)| {
            (a.visits == 0)
                .cmp(&(b.visits == 0))
                .then(b.mean().total_cmp(&a.mean()))
                .then(b.visits.cmp(&a.visits))
                .then(a_act.cmp(b_act))
        });
        ranked
    }

    /// The top-ranked action, if any statistics exist.
    #[must_use]
    pub fn best_action(&self) -> Option<Action> {
        if self.is_empty() {
            return None;
        }
        self.ranked().into_iter().next().map(|(action, _)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack(i: u8) -> Action {
        Action::attack(&[i])
    }

    fn report(worker_id: usize, stats: Vec<(Action, ActionStats)>) -> WorkerReport {
        WorkerReport {
            root_stats: stats,
            iterations: 10,
            ..WorkerReport::new(worker_id)
        }
    }

    #[test]
    fn test_merge_is_summation() {
        let mut agg = AggregateResult::new();
        agg.merge_report(&report(
            0,
            vec![(
                attack(0),
                ActionStats {
                    visits: 6,
                    total_value: 3.0,
                },
            )],
        ));
        agg.merge_report(&report(
            1,
            vec![(
                attack(0),
                ActionStats {
                    visits: 4,
                    total_value: 1.0,
                },
            )],
        ));

        let stats = agg.get(&attack(0)).unwrap();
        assert_eq!(stats.visits, 10);
        assert_eq!(stats.total_value, 4.0);
        assert_eq!(stats.mean(), 0.4);
        assert_eq!(agg.workers_merged, 2);
        assert_eq!(agg.total_iterations, 20);
    }

    #[test]
    fn test_ranked_by_mean_then_visits_then_action() {
        let mut agg = AggregateResult::new();
        agg.merge_report(&report(
            0,
            vec![
                (
                    attack(0),
                    ActionStats {
                        visits: 10,
                        total_value: 5.0, // mean 0.5
                    },
                ),
                (
                    attack(1),
                    ActionStats {
                        visits: 10,
                        total_value: 8.0, // mean 0.8
                    },
                ),
                (
                    attack(2),
                    ActionStats {
                        visits: 20,
                        total_value: 10.0, // mean 0.5, more visits
                    },
                ),
            ],
        ));

        let ranked = agg.ranked();
        assert_eq!(ranked[0].0, attack(1));
        assert_eq!(ranked[1].0, attack(2));
        assert_eq!(ranked[2].0, attack(0));
        assert_eq!(agg.best_action(), Some(attack(1)));
    }

    #[test]
    fn test_tie_breaks_to_canonical_action_order() {
        let mut agg = AggregateResult::new();
        let same = ActionStats {
            visits: 5,
            total_value: 2.5,
        };
        agg.merge_report(&report(0, vec![(attack(1), same), (attack(0), same)]));

        // attack[0] precedes attack[1] in canonical order.
        let ranked = agg.ranked();
        assert_eq!(ranked[0].0, attack(0));
    }

    #[test]
    fn test_unvisited_entries_rank_after_negative_evidence() {
        // A losing position: every simulated action has mean -1. An entry
        // with zero visits must not outrank them on its default 0.0 mean.
        let mut agg = AggregateResult::new();
        agg.merge_report(&report(
            0,
            vec![
                (
                    attack(0),
                    ActionStats {
                        visits: 5,
                        total_value: -5.0,
                    },
                ),
                (attack(1), ActionStats::default()),
            ],
        ));

        let ranked = agg.ranked();
        assert_eq!(ranked[0].0, attack(0));
        assert_eq!(ranked[1].0, attack(1));
        assert_eq!(agg.best_action(), Some(attack(0)));
    }

    #[test]
    fn test_failed_worker_stats_still_merge() {
        let mut agg = AggregateResult::new();
        let mut failed = report(
            0,
            vec![(
                attack(0),
                ActionStats {
                    visits: 3,
                    total_value: 1.5,
                },
            )],
        );
        failed.error = Some(SearchError::DeterminizationExhausted {
            failures: 9,
            attempts: 16,
        });
        failed.exhausted = true;
        agg.merge_report(&failed);

        assert_eq!(agg.get(&attack(0)).unwrap().visits, 3);
        assert!(!agg.is_empty());
    }

    #[test]
    fn test_empty_aggregate() {
        let agg = AggregateResult::new();
        assert!(agg.is_empty());
        assert_eq!(agg.best_action(), None);

        // All-zero visits also counts as empty.
        let mut agg = AggregateResult::new();
        agg.merge_report(&report(0, vec![(attack(0), ActionStats::default())]));
        assert!(agg.is_empty());
        assert_eq!(agg.best_action(), None);
    }
}
