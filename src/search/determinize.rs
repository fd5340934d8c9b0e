//! Determinization: sampling a concrete world from a belief state.
//!
//! Each search iteration starts by resolving every piece of hidden
//! information into one concrete `World`: the opponent's hand is drawn
//! from the unseen pool under the belief weights, the remaining pool is
//! shuffled into a draw order, and critical flags are rolled up front so
//! that `apply` stays fully deterministic afterward.

use crate::core::{Card, CardId, GameRng, GameState, World};
use crate::error::SearchError;

/// Sample one concrete world consistent with the belief state.
///
/// Conservation holds by construction: hand + opponent hand + draw pile
/// together carry exactly the identities of the state's hand plus its
/// unseen pool. Fails with `InvalidBeliefState` when the belief cannot be
/// satisfied (more claimed opponent cards than unseen identities, or all
/// remaining weights zero mid-draw).
pub fn sample(state: &GameState, rng: &mut GameRng) -> Result<World, SearchError> {
    let mut pool = state.unseen.expand();
    let opponent_count = state.opponent.hand_count as usize;
    if opponent_count > pool.len() {
        return Err(SearchError::InvalidBeliefState(format!(
            "opponent hand of {opponent_count} exceeds {} unseen cards",
            pool.len()
        )));
    }

    let mut opponent_hand = Vec::with_capacity(opponent_count);
    for _ in 0..opponent_count {
        let id = draw_weighted(state, &mut pool, rng)?;
        // Opponent cards never come back through the draw pile, so their
        // critical flags are irrelevant.
        opponent_hand.push(Card::from_id(id));
    }

    rng.shuffle(&mut pool);
    let critical_chance = state.config().critical_chance;
    let draw_pile: Vec<Card> = pool
        .into_iter()
        .map(|id| {
            let critical = critical_chance > 0.0 && rng.gen_bool(critical_chance);
            Card::from_id(id).with_critical(critical)
        })
        .collect();

    Ok(World {
        config: state.config().clone(),
        hand: state.hand.iter().copied().collect(),
        player_health: state.player_health,
        enemy_health: state.enemy_health,
        enemy_attack_counter: state.enemy_attack_counter,
        discard_charges: state.discard_charges,
        opponent_hand,
        draw_pile,
        discard_pile: Vec::new(),
        turn: state.turn,
    })
}

/// Draw one identity from the pool without replacement, biased by the
/// belief weights.
fn draw_weighted(
    state: &GameState,
    pool: &mut Vec<CardId>,
    rng: &mut GameRng,
) -> Result<CardId, SearchError> {
    let total: f64 = pool.iter().map(|&id| state.opponent.weight_of(id)).sum();
    if total <= 0.0 {
        return Err(SearchError::InvalidBeliefState(
            "opponent belief has zero total weight over the unseen pool".to_string(),
        ));
    }

    let threshold = rng.gen_f64() * total;
    let mut cumulative = 0.0;
    for i in 0..pool.len() {
        cumulative += state.opponent.weight_of(pool[i]);
        if cumulative > threshold {
            return Ok(pool.swap_remove(i));
        }
    }
    // Floating-point slack put the threshold past the last positive weight.
    let last = pool
        .iter()
        .rposition(|&id| state.opponent.weight_of(id) > 0.0)
        .ok_or_else(|| {
            SearchError::InvalidBeliefState(
                "opponent belief has zero total weight over the unseen pool".to_string(),
            )
        })?;
    Ok(pool.swap_remove(last))
}
