//! Card identities and multisets.
//!
//! The deck is a closed set of 52 identities: 13 ranks by 4 suits. Every
//! identity maps to a stable `CardId` in `0..52`, which doubles as a bit
//! position for subset masks and as an index into [`CardCounts`].

use serde::{Deserialize, Serialize};

/// Number of distinct ranks.
pub const NUM_RANKS: usize = 13;

/// Number of distinct suits.
pub const NUM_SUITS: usize = 4;

/// Total distinct card identities in the game.
pub const DECK_SIZE: usize = NUM_RANKS * NUM_SUITS;

/// Card rank, ordered weakest to strongest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Command1,
    Command2,
    Command3,
    Prime,
}

impl Rank {
    /// All ranks in canonical order.
    pub const ALL: [Rank; NUM_RANKS] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Command1,
        Rank::Command2,
        Rank::Command3,
        Rank::Prime,
    ];

    /// Position in the canonical rank order (0-based).
    #[inline]
    #[must_use]
    pub const fn order(self) -> usize {
        self as usize
    }

    /// Card value used for attack bonuses: 2..=10, Prime counts 11.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Rank::Prime => 11,
            _ => {
                let v = self as u32 + 2;
                if v > 10 {
                    10
                } else {
                    v
                }
            }
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Command1 => "command-1",
            Rank::Command2 => "command-2",
            Rank::Command3 => "command-3",
            Rank::Prime => "prime-0",
        };
        f.write_str(name)
    }
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Moon,
    Fire,
    Sun,
    Stone,
}

impl Suit {
    /// All suits in canonical order.
    pub const ALL: [Suit; NUM_SUITS] = [Suit::Moon, Suit::Fire, Suit::Sun, Suit::Stone];

    /// Position in the canonical suit order (0-based).
    #[inline]
    #[must_use]
    pub const fn order(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suit::Moon => "Moon",
            Suit::Fire => "Fire",
            Suit::Sun => "Sun",
            Suit::Stone => "Stone",
        };
        f.write_str(name)
    }
}

/// Stable identity index in `0..DECK_SIZE`: `suit * 13 + rank`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Build an id from its suit and rank.
    #[must_use]
    pub const fn from_parts(suit: Suit, rank: Rank) -> Self {
        Self((suit as u8) * NUM_RANKS as u8 + rank as u8)
    }

    /// Raw index value.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Suit component.
    #[must_use]
    pub fn suit(self) -> Suit {
        Suit::ALL[self.index() / NUM_RANKS]
    }

    /// Rank component.
    #[must_use]
    pub fn rank(self) -> Rank {
        Rank::ALL[self.index() % NUM_RANKS]
    }
}

/// A concrete card: identity plus a critical flag.
///
/// Critical status is a property of a drawn physical card, not of the
/// identity; it is assigned at draw/determinization time and multiplies
/// attack damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub critical: bool,
}

impl Card {
    /// Create a non-critical card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            critical: false,
        }
    }

    /// Set the critical flag.
    #[must_use]
    pub const fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Build from a stable identity index.
    #[must_use]
    pub fn from_id(id: CardId) -> Self {
        Self::new(id.rank(), id.suit())
    }

    /// Stable identity index, ignoring the critical flag.
    #[must_use]
    pub fn id(self) -> CardId {
        CardId::from_parts(self.suit, self.rank)
    }

    /// Attack value bonus for this card.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.rank.value()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)?;
        if self.critical {
            f.write_str(" (critical)")?;
        }
        Ok(())
    }
}

/// Multiset over card identities.
///
/// One byte per identity; in the standard game every count is 0 or 1, but
/// the multiset form keeps the conservation invariant checkable without
/// special-casing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardCounts {
    counts: [u8; DECK_SIZE],
}

impl CardCounts {
    /// Empty multiset.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            counts: [0; DECK_SIZE],
        }
    }

    /// One copy of every identity (the full game deck).
    #[must_use]
    pub fn full() -> Self {
        Self {
            counts: [1; DECK_SIZE],
        }
    }

    /// Copies of a given identity.
    #[inline]
    #[must_use]
    pub fn count(&self, id: CardId) -> u8 {
        self.counts[id.index()]
    }

    /// Total cards across all identities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Add one copy of an identity.
    pub fn add(&mut self, id: CardId) {
        self.counts[id.index()] += 1;
    }

    /// Remove one copy of an identity. Returns false if none remain.
    pub fn remove(&mut self, id: CardId) -> bool {
        let slot = &mut self.counts[id.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Expand to a flat list of identities, one entry per copy, in
    /// canonical id order.
    #[must_use]
    pub fn expand(&self) -> Vec<CardId> {
        let mut out = Vec::with_capacity(self.total());
        for (i, &c) in self.counts.iter().enumerate() {
            for _ in 0..c {
                out.push(CardId(i as u8));
            }
        }
        out
    }
}

impl Default for CardCounts {
    fn default() -> Self {
        Self::empty()
    }
}
