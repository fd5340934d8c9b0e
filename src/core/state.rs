//! Game positions: the knowable snapshot and the determinized world.
//!
//! ## GameState
//!
//! Everything the engine can know from recognition: the player's hand,
//! both health totals and counters, the opponent's hand as a count plus a
//! belief over identities, and the unseen-card multiset. Immutable once
//! constructed; transitions produce new values, so trees share no mutable
//! state across branches.
//!
//! ## World
//!
//! A fully determinized variant produced by the determinizer: the opponent
//! hand is concrete, the draw order is fixed, and critical flags are
//! pre-assigned. Used inside exactly one simulation and then discarded.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardCounts, CardId};
use crate::error::SearchError;

/// Game-tunable constants fed to the engine as data.
///
/// These are the rules knobs the surrounding layer recognizes or
/// configures; the search treats them as opaque parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Player health at battle start (reward normalization anchor).
    pub starting_player_health: i32,

    /// Enemy health at battle start (cutoff heuristic anchor).
    pub starting_enemy_health: f64,

    /// Damage the enemy deals when its counter expires.
    pub enemy_attack_power: i32,

    /// Counter value restored after each enemy strike.
    pub enemy_base_counter: i32,

    /// Discard charges available at battle start.
    pub discard_charges: u8,

    /// Nominal hand size.
    pub hand_size: usize,

    /// Hard upper bound on hand size.
    pub max_hand_size: usize,

    /// Chance that a drawn card is critical.
    pub critical_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_player_health: 100,
            starting_enemy_health: 100.0,
            enemy_attack_power: 10,
            enemy_base_counter: 3,
            discard_charges: 3,
            hand_size: 8,
            max_hand_size: 10,
            critical_chance: 0.03,
        }
    }
}

impl GameConfig {
    /// Set starting player health.
    #[must_use]
    pub fn with_player_health(mut self, health: i32) -> Self {
        self.starting_player_health = health;
        self
    }

    /// Set starting enemy health.
    #[must_use]
    pub fn with_enemy_health(mut self, health: f64) -> Self {
        self.starting_enemy_health = health;
        self
    }

    /// Set enemy attack power.
    #[must_use]
    pub fn with_enemy_power(mut self, power: i32) -> Self {
        self.enemy_attack_power = power;
        self
    }

    /// Set the enemy counter reset value.
    #[must_use]
    pub fn with_enemy_counter(mut self, counter: i32) -> Self {
        self.enemy_base_counter = counter;
        self
    }

    /// Set the starting discard charges.
    #[must_use]
    pub fn with_discard_charges(mut self, charges: u8) -> Self {
        self.discard_charges = charges;
        self
    }

    /// Set the critical draw chance.
    #[must_use]
    pub fn with_critical_chance(mut self, chance: f64) -> Self {
        self.critical_chance = chance;
        self
    }
}

/// Probability-weighted belief over the opponent's hidden hand.
///
/// `hand_count` cards are hidden; `weights` biases which unseen identities
/// they are. An empty weight map means uniform over the unseen pool; a
/// non-empty map treats missing identities as impossible (weight zero).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpponentBelief {
    /// Number of hidden opponent cards.
    pub hand_count: u8,

    /// Relative weight per identity; empty = uniform.
    pub weights: FxHashMap<CardId, f64>,
}

impl OpponentBelief {
    /// Uniform belief over `hand_count` hidden cards.
    #[must_use]
    pub fn uniform(hand_count: u8) -> Self {
        Self {
            hand_count,
            weights: FxHashMap::default(),
        }
    }

    /// Set the relative weight of one identity.
    #[must_use]
    pub fn with_weight(mut self, id: CardId, weight: f64) -> Self {
        self.weights.insert(id, weight);
        self
    }

    /// Sampling weight of an identity under this belief.
    #[must_use]
    pub fn weight_of(&self, id: CardId) -> f64 {
        if self.weights.is_empty() {
            1.0
        } else {
            self.weights.get(&id).copied().unwrap_or(0.0)
        }
    }
}

/// The full knowable-to-the-engine position.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,

    /// The player's hand, in recognition order.
    pub hand: Vector<Card>,

    /// Player health.
    pub player_health: i32,

    /// Enemy health (fractional because critical damage is).
    pub enemy_health: f64,

    /// Actions until the enemy strikes; strikes at zero.
    pub enemy_attack_counter: i32,

    /// Remaining discard charges.
    pub discard_charges: u8,

    /// Belief over the opponent's hidden hand.
    pub opponent: OpponentBelief,

    /// Multiset of card identities not in the player's hand: the hidden
    /// opponent hand plus the draw pile.
    pub unseen: CardCounts,

    /// Turn marker.
    pub turn: u32,
}

impl GameState {
    /// Build a fresh state from a recognized hand.
    ///
    /// Health totals and counters start at the config values; the unseen
    /// pool is the full deck minus the hand. Fails with
    /// `InvalidBeliefState` if the hand repeats an identity or exceeds the
    /// configured maximum.
    pub fn new(
        hand: impl IntoIterator<Item = Card>,
        config: GameConfig,
    ) -> Result<Self, SearchError> {
        let hand: Vector<Card> = hand.into_iter().collect();
        if hand.len() > config.max_hand_size {
            return Err(SearchError::InvalidBeliefState(format!(
                "hand of {} exceeds maximum {}",
                hand.len(),
                config.max_hand_size
            )));
        }

        let mut unseen = CardCounts::full();
        for card in hand.iter() {
            if !unseen.remove(card.id()) {
                return Err(SearchError::InvalidBeliefState(format!(
                    "hand repeats {card}"
                )));
            }
        }

        Ok(Self {
            player_health: config.starting_player_health,
            enemy_health: config.starting_enemy_health,
            enemy_attack_counter: config.enemy_base_counter,
            discard_charges: config.discard_charges,
            opponent: OpponentBelief::default(),
            unseen,
            turn: 0,
            hand,
            config,
        })
    }

    /// Replace the opponent belief.
    ///
    /// Fails if the claimed hand count exceeds the unseen pool.
    pub fn with_opponent(mut self, opponent: OpponentBelief) -> Result<Self, SearchError> {
        if opponent.hand_count as usize > self.unseen.total() {
            return Err(SearchError::InvalidBeliefState(format!(
                "opponent hand of {} exceeds {} unseen cards",
                opponent.hand_count,
                self.unseen.total()
            )));
        }
        self.opponent = opponent;
        Ok(self)
    }

    /// Override the player's current health.
    #[must_use]
    pub fn with_player_health(mut self, health: i32) -> Self {
        self.player_health = health;
        self
    }

    /// Override the enemy's current health.
    #[must_use]
    pub fn with_enemy_health(mut self, health: f64) -> Self {
        self.enemy_health = health;
        self
    }

    /// Override the enemy attack counter.
    #[must_use]
    pub fn with_attack_counter(mut self, counter: i32) -> Self {
        self.enemy_attack_counter = counter;
        self
    }

    /// Override the remaining discard charges.
    #[must_use]
    pub fn with_discard_charges(mut self, charges: u8) -> Self {
        self.discard_charges = charges;
        self
    }

    /// Fold recognized drawn cards back into the hand, debiting the unseen
    /// pool. Used after `apply_to_state` left the hand short.
    pub fn with_drawn_cards(mut self, cards: &[Card]) -> Result<Self, SearchError> {
        for card in cards {
            if !self.unseen.remove(card.id()) {
                return Err(SearchError::InvalidBeliefState(format!(
                    "drawn card {card} is not in the unseen pool"
                )));
            }
            self.hand.push_back(*card);
        }
        if self.hand.len() > self.config.max_hand_size {
            return Err(SearchError::InvalidBeliefState(format!(
                "hand of {} exceeds maximum {}",
                self.hand.len(),
                self.config.max_hand_size
            )));
        }
        Ok(self)
    }

    /// Game-rule constants for this battle.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// True once either side is dead.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.enemy_health <= 0.0 || self.player_health <= 0
    }
}

/// A fully determinized position: all hidden information resolved.
///
/// Scratch state for one simulation; mutated freely by the owning worker
/// and dropped afterward.
#[derive(Clone, Debug)]
pub struct World {
    /// Game-rule constants.
    pub config: GameConfig,

    /// The player's hand.
    pub hand: Vec<Card>,

    /// Player health.
    pub player_health: i32,

    /// Enemy health.
    pub enemy_health: f64,

    /// Actions until the enemy strikes.
    pub enemy_attack_counter: i32,

    /// Remaining discard charges.
    pub discard_charges: u8,

    /// The opponent's (now concrete) hand; excluded from draws.
    pub opponent_hand: Vec<Card>,

    /// Determinized draw order; cards are drawn from the back.
    pub draw_pile: Vec<Card>,

    /// Cards played or discarded so far, oldest first.
    pub discard_pile: Vec<Card>,

    /// Turn marker.
    pub turn: u32,
}

impl World {
    /// True once either side is dead.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.enemy_health <= 0.0 || self.player_health <= 0
    }

    /// Draw up to `n` cards into the hand.
    ///
    /// When the draw pile runs dry the discard pile is recycled in discard
    /// order; chance was already resolved at determinization time, so this
    /// stays deterministic.
    pub fn draw_into_hand(&mut self, n: usize) {
        for _ in 0..n {
            if self.draw_pile.is_empty() {
                self.recycle_discards();
            }
            match self.draw_pile.pop() {
                Some(card) => self.hand.push(card),
                None => break,
            }
        }
    }

    /// Move the discard pile back into the draw pile, oldest discard drawn
    /// first.
    fn recycle_discards(&mut self) {
        self.draw_pile.extend(self.discard_pile.drain(..).rev());
    }

    /// Multiset of every card identity across all piles. The conservation
    /// invariant is that this always equals the full deck.
    #[must_use]
    pub fn card_counts(&self) -> CardCounts {
        let mut counts = CardCounts::empty();
        for card in self
            .hand
            .iter()
            .chain(&self.opponent_hand)
            .chain(&self.draw_pile)
            .chain(&self.discard_pile)
        {
            counts.add(card.id());
        }
        counts
    }
}
