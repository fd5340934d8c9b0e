//! Core types: cards, actions, positions, RNG.
//!
//! These are the pure data building blocks; no search logic lives here.

pub mod action;
pub mod card;
pub mod rng;
pub mod state;

pub use action::{Action, HandIndices};
pub use card::{Card, CardCounts, CardId, Rank, Suit, DECK_SIZE, NUM_RANKS, NUM_SUITS};
pub use rng::GameRng;
pub use state::{GameConfig, GameState, OpponentBelief, World};
