//! # demon-hand
//!
//! A decision engine for a turn-based card battle with hidden information,
//! built around determinized Monte Carlo Tree Search with root parallelism.
//!
//! ## Design Principles
//!
//! 1. **Belief In, Action Out**: Callers describe what they know (their
//!    hand, health totals, a weighted belief over the opponent's cards);
//!    the engine returns the action to take plus the statistics behind it.
//!
//! 2. **Determinism On Demand**: Every random draw flows through a seeded
//!    `GameRng`; a fixed seed with an iteration budget reproduces the
//!    search bit for bit, workers included.
//!
//! 3. **Failure Is Data**: Bad determinizations are counted and tolerated,
//!    exhausted workers still contribute their partial statistics, and
//!    only engine bugs or dead positions fail the whole search.
//!
//! ## Architecture
//!
//! - **Root Parallelism**: N workers build fully independent trees from
//!   the same root and their root statistics merge by pure summation.
//!
//! - **Determinization Per Iteration**: Hidden information is re-sampled
//!   into a concrete `World` at the top of every iteration, so tree
//!   statistics average over the belief instead of committing to one deal.
//!
//! - **Arena Trees**: Nodes live in flat `Vec`s and refer to each other by
//!   index; no reference counting on the hot path.
//!
//! ## Modules
//!
//! - `core`: Cards, actions, RNG, the belief state and determinized world
//! - `rules`: Combo scoring and the legal-action/transition engine
//! - `search`: Determinizer, trees, workers, and the root coordinator
//! - `error`: The error taxonomy (fatal vs recoverable)

pub mod core;
pub mod error;
pub mod rules;
pub mod search;

// Re-export the primary API surface
pub use crate::core::{
    Action, Card, CardCounts, CardId, GameConfig, GameRng, GameState, HandIndices, OpponentBelief,
    Rank, Suit, World, DECK_SIZE,
};

pub use crate::error::SearchError;

pub use crate::rules::{attack_damage, classify, legal_actions, Combo};

pub use crate::search::{
    apply_action, find_next_action, search, ActionStats, AggregateResult, SearchConfig,
    SearchOutcome, WorkerReport,
};
