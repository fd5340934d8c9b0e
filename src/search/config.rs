//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for one search invocation.
///
/// The budget is either a wall-clock deadline shared by every worker
/// (`time_budget_ms`) or a per-worker iteration count (`max_iterations`).
/// When both are set, whichever exhausts first stops a worker; for
/// reproducible runs use an iteration budget and a fixed seed, since
/// wall-clock stops are inherently timing-dependent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Wall-clock budget in milliseconds, shared by all workers.
    pub time_budget_ms: Option<u64>,

    /// Iteration budget per worker.
    pub max_iterations: Option<u32>,

    /// Number of parallel workers (independent trees).
    pub worker_count: usize,

    /// UCT exploration constant.
    pub exploration_constant: f64,

    /// Rollout cutoff in actions; unfinished rollouts are scored by the
    /// board-advantage heuristic.
    pub max_rollout_depth: u32,

    /// Short-circuit rollouts to a finishing attack when one exists
    /// instead of picking randomly. Stronger rollouts at the price of a
    /// damage scan per rollout step.
    pub rollout_lethal_check: bool,

    /// Base seed; workers derive independent seeds from it. None draws a
    /// fresh seed per invocation.
    pub seed: Option<u64>,

    /// Determinization failure rate at which a worker gives up.
    pub max_failure_rate: f64,

    /// Attempts before the failure rate is checked.
    pub min_failure_samples: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: Some(1000),
            max_iterations: None,
            worker_count: 4,
            exploration_constant: 1.4,
            max_rollout_depth: 64,
            rollout_lethal_check: false,
            seed: None,
            max_failure_rate: 0.5,
            min_failure_samples: 16,
        }
    }
}

impl SearchConfig {
    /// Set a wall-clock budget.
    #[must_use]
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }

    /// Switch to a pure iteration budget (clears the wall-clock budget so
    /// seeded runs are reproducible).
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self.time_budget_ms = None;
        self
    }

    /// Set the parallelism degree.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Set the UCT exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the rollout depth cutoff.
    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Enable the lethal-attack short circuit in rollouts.
    #[must_use]
    pub fn with_lethal_rollout(mut self, enabled: bool) -> Self {
        self.rollout_lethal_check = enabled;
        self
    }

    /// Pin the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.time_budget_ms, Some(1000));
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.worker_count, 4);
        assert!((config.exploration_constant - 1.4).abs() < 1e-9);
        // Rollouts are uniform random unless opted in.
        assert!(!config.rollout_lethal_check);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_iterations(500)
            .with_workers(8)
            .with_exploration(1.0)
            .with_lethal_rollout(true)
            .with_seed(7);

        assert_eq!(config.max_iterations, Some(500));
        // Iteration budgets clear the wall clock for reproducibility.
        assert_eq!(config.time_budget_ms, None);
        assert_eq!(config.worker_count, 8);
        assert!(config.rollout_lethal_check);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, Some(99));
        assert_eq!(back.worker_count, config.worker_count);
    }
}
