//! Attack combo recognition and damage scoring.
//!
//! A played set of 1-5 cards scores as its strongest recognized combo plus
//! the values of the cards involved. An attack action is allowed to play a
//! weak set: the damage actually dealt is the best score over all
//! non-empty subsets of the chosen cards, scaled up by 25% per critical
//! card played.

use crate::core::card::{Card, Rank};

/// Recognized combos, weakest to strongest base damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combo {
    /// Any single card (or the best card of an unmatched set).
    Solo,
    /// Two of the same rank.
    Dyad,
    /// Two distinct ranks, twice each.
    DyadSet,
    /// Three of the same rank.
    Triad,
    /// Five sequential ranks.
    March,
    /// Five of the same suit.
    Horde,
    /// A rank three times plus another rank twice.
    GrandWarhost,
    /// Four of the same rank.
    Tetrad,
    /// Five sequential ranks, same suit.
    MarchingHorde,
    /// 10 through prime-0, same suit.
    DemonsHand,
}

impl Combo {
    /// Base damage before card-value bonuses.
    #[must_use]
    pub const fn base_damage(self) -> f64 {
        match self {
            Combo::Solo => 10.0,
            Combo::Dyad => 20.0,
            Combo::DyadSet => 40.0,
            Combo::Triad => 80.0,
            Combo::March => 100.0,
            Combo::Horde => 125.0,
            Combo::GrandWarhost => 175.0,
            Combo::Tetrad => 400.0,
            Combo::MarchingHorde => 600.0,
            Combo::DemonsHand => 2000.0,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Combo::Solo => "Solo",
            Combo::Dyad => "Dyad",
            Combo::DyadSet => "Dyad Set",
            Combo::Triad => "Triad",
            Combo::March => "March",
            Combo::Horde => "Horde",
            Combo::GrandWarhost => "Grand Warhost",
            Combo::Tetrad => "Tetrad",
            Combo::MarchingHorde => "Marching Horde",
            Combo::DemonsHand => "The Demon's Hand",
        }
    }
}

fn all_same_rank(cards: &[Card]) -> bool {
    cards.iter().all(|c| c.rank == cards[0].rank)
}

fn all_same_suit(cards: &[Card]) -> bool {
    cards.iter().all(|c| c.suit == cards[0].suit)
}

fn is_sequential(cards: &[Card]) -> bool {
    let mut orders: Vec<usize> = cards.iter().map(|c| c.rank.order()).collect();
    orders.sort_unstable();
    orders.windows(2).all(|w| w[0] + 1 == w[1])
}

/// 10, command-1..3, and prime-0 of one suit.
fn is_demons_hand(cards: &[Card]) -> bool {
    if !all_same_suit(cards) {
        return false;
    }
    let mut orders: Vec<usize> = cards.iter().map(|c| c.rank.order()).collect();
    orders.sort_unstable();
    orders
        == [
            Rank::Ten.order(),
            Rank::Command1.order(),
            Rank::Command2.order(),
            Rank::Command3.order(),
            Rank::Prime.order(),
        ]
}

/// Sorted multiplicities of the ranks present.
fn rank_multiplicities(cards: &[Card]) -> Vec<u8> {
    let mut per_rank = [0u8; crate::core::NUM_RANKS];
    for card in cards {
        per_rank[card.rank.order()] += 1;
    }
    let mut counts: Vec<u8> = per_rank.iter().copied().filter(|&c| c > 0).collect();
    counts.sort_unstable();
    counts
}

fn value_sum(cards: &[Card]) -> f64 {
    cards.iter().map(|c| c.value() as f64).sum()
}

/// Classify a played set as its strongest combo and return the combo plus
/// its full score (base damage + card-value bonus).
///
/// The Solo fallback scores only the highest card's value; every real
/// combo adds all played card values.
#[must_use]
pub fn classify(cards: &[Card]) -> (Combo, f64) {
    assert!(
        !cards.is_empty() && cards.len() <= 5,
        "combos are over 1-5 cards"
    );

    match cards.len() {
        5 => {
            if is_demons_hand(cards) {
                return (Combo::DemonsHand, Combo::DemonsHand.base_damage() + value_sum(cards));
            }
            if is_sequential(cards) && all_same_suit(cards) {
                return (
                    Combo::MarchingHorde,
                    Combo::MarchingHorde.base_damage() + value_sum(cards),
                );
            }
            if all_same_suit(cards) {
                return (Combo::Horde, Combo::Horde.base_damage() + value_sum(cards));
            }
            if is_sequential(cards) {
                return (Combo::March, Combo::March.base_damage() + value_sum(cards));
            }
            if rank_multiplicities(cards) == [2, 3] {
                return (
                    Combo::GrandWarhost,
                    Combo::GrandWarhost.base_damage() + value_sum(cards),
                );
            }
        }
        4 => {
            if all_same_rank(cards) {
                return (Combo::Tetrad, Combo::Tetrad.base_damage() + value_sum(cards));
            }
            if rank_multiplicities(cards) == [2, 2] {
                return (Combo::DyadSet, Combo::DyadSet.base_damage() + value_sum(cards));
            }
        }
        3 => {
            if all_same_rank(cards) {
                return (Combo::Triad, Combo::Triad.base_damage() + value_sum(cards));
            }
        }
        2 => {
            if all_same_rank(cards) {
                return (Combo::Dyad, Combo::Dyad.base_damage() + value_sum(cards));
            }
        }
        _ => {}
    }

    let best_value = cards.iter().map(|c| c.value()).max().unwrap_or(0) as f64;
    (Combo::Solo, Combo::Solo.base_damage() + best_value)
}

/// Best combo score over all non-empty subsets of the chosen cards,
/// ignoring critical flags.
#[must_use]
pub fn best_attack_score(cards: &[Card]) -> f64 {
    debug_assert!(!cards.is_empty() && cards.len() <= 5);

    let mut best = f64::NEG_INFINITY;
    let mut subset = Vec::with_capacity(cards.len());
    for mask in 1u32..(1 << cards.len()) {
        subset.clear();
        for (i, card) in cards.iter().enumerate() {
            if mask & (1 << i) != 0 {
                subset.push(*card);
            }
        }
        let (_, score) = classify(&subset);
        if score > best {
            best = score;
        }
    }
    best
}

/// Damage dealt by attacking with the chosen cards: best subset score
/// scaled by 25% per critical card played.
#[must_use]
pub fn attack_damage(cards: &[Card]) -> f64 {
    let criticals = cards.iter().filter(|c| c.critical).count();
    best_attack_score(cards) * (1.0 + 0.25 * criticals as f64)
}
