//! Semantic moves over a hand of cards.
//!
//! An action names which hand positions are played and whether they attack
//! or are discarded. Equality, hashing, and ordering are by the semantic
//! move, so identical moves reached through different tree nodes compare
//! equal and the canonical `Ord` gives deterministic tie-breaks.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Hand positions played by an action, stored strictly descending.
///
/// Descending order lets apply remove positions without index shifting;
/// at most 5 cards are ever played, so the indices stay inline.
pub type HandIndices = SmallVec<[u8; 5]>;

/// A move: attack with the cards at `indices`, or discard them.
///
/// Canonical order (used for expansion order and tie-breaks): all attacks
/// before all discards, then lexicographic on the index list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Play the selected cards as an attack combo.
    Attack { indices: HandIndices },
    /// Spend a discard charge to replace the selected cards.
    Discard { indices: HandIndices },
}

impl Action {
    /// Build an attack; indices are normalized to descending order.
    #[must_use]
    pub fn attack(indices: &[u8]) -> Self {
        Self::Attack {
            indices: Self::normalize(indices),
        }
    }

    /// Build a discard; indices are normalized to descending order.
    #[must_use]
    pub fn discard(indices: &[u8]) -> Self {
        Self::Discard {
            indices: Self::normalize(indices),
        }
    }

    fn normalize(indices: &[u8]) -> HandIndices {
        let mut v = HandIndices::from_slice(indices);
        v.sort_unstable_by(|a, b| b.cmp(a));
        debug_assert!(v.windows(2).all(|w| w[0] > w[1]), "duplicate hand index");
        v
    }

    /// The hand positions this action plays, descending.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        match self {
            Action::Attack { indices } | Action::Discard { indices } => indices,
        }
    }

    /// Number of cards played.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.indices().len()
    }

    /// True for discard moves.
    #[must_use]
    pub fn is_discard(&self) -> bool {
        matches!(self, Action::Discard { .. })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = if self.is_discard() { "discard" } else { "attack" };
        write!(f, "{verb}[")?;
        for (i, idx) in self.indices().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{idx}")?;
        }
        f.write_str("]")
    }
}
