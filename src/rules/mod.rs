//! Game rules: combo scoring and the state/action model.

pub mod combos;
pub mod engine;

pub use combos::{attack_damage, best_attack_score, classify, Combo};
pub use engine::{
    apply, apply_to_state, cutoff_value, is_terminal, legal_actions, legal_actions_world, reward,
    MAX_PLAYED,
};
