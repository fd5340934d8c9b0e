//! Determinized MCTS with root parallelism.
//!
//! Each worker owns an arena tree and an independent RNG stream; every
//! iteration samples a fresh world from the belief state, walks the tree
//! with UCT, expands one node, plays out randomly, and backpropagates.
//! The coordinator merges the workers' root statistics by summation and
//! ranks actions deterministically.

pub mod config;
pub mod coordinator;
pub mod determinize;
pub mod node;
pub mod stats;
pub mod tree;
pub mod worker;

pub use config::SearchConfig;
pub use coordinator::{apply_action, find_next_action, merge_reports, search, SearchOutcome};
pub use node::{Edge, NodeId, SearchNode};
pub use stats::{ActionStats, AggregateResult, WorkerReport};
pub use tree::SearchTree;
