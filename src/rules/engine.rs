//! The state and action model: legal moves, transitions, terminal check,
//! reward.
//!
//! Transitions with chance outcomes (drawing) operate on a [`World`], where
//! the determinizer already fixed the draw order; that is why the search
//! determinizes before simulating rather than resolving chance mid-apply.
//! The GUI-facing [`apply_to_state`] advances a [`GameState`] instead,
//! leaving drawn cards to be filled in by recognition.

use crate::core::{Action, GameState, World};
use crate::error::SearchError;

use super::combos::attack_damage;

/// Most cards a single action may play.
pub const MAX_PLAYED: usize = 5;

/// Every legal action in `state`: all attack subsets of 1-5 hand cards,
/// plus the same subsets as discards while charges remain. Sorted in
/// canonical action order. Empty only for terminal or handless states.
#[must_use]
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    if state.is_terminal() {
        return Vec::new();
    }
    enumerate_actions(state.hand.len(), state.discard_charges)
}

/// Worker-side variant of [`legal_actions`] over a determinized world.
#[must_use]
pub fn legal_actions_world(world: &World) -> Vec<Action> {
    if world.is_terminal() {
        return Vec::new();
    }
    enumerate_actions(world.hand.len(), world.discard_charges)
}

/// Enumerate actions for a hand of `hand_len` cards. Legality depends only
/// on hand size and discard charges, both of which evolve deterministically
/// along an action path, so the same enumeration is valid in every world
/// determinized from the same root.
pub(crate) fn enumerate_actions(hand_len: usize, discard_charges: u8) -> Vec<Action> {
    let mut actions = Vec::new();
    let max_cards = hand_len.min(MAX_PLAYED);

    for r in 1..=max_cards {
        for_each_combination(hand_len, r, &mut |combo| {
            actions.push(Action::attack(combo));
        });
    }
    if discard_charges > 0 {
        for r in 1..=max_cards {
            for_each_combination(hand_len, r, &mut |combo| {
                actions.push(Action::discard(combo));
            });
        }
    }

    actions.sort_unstable();
    actions
}

/// Visit every r-combination of `0..n` in ascending lexicographic order.
fn for_each_combination(n: usize, r: usize, visit: &mut impl FnMut(&[u8])) {
    debug_assert!(r >= 1 && r <= n);
    let mut combo: Vec<u8> = (0..r as u8).collect();
    loop {
        visit(&combo);

        // Advance the rightmost index that still has room.
        let mut i = r;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if (combo[i] as usize) < n - (r - i) {
                break;
            }
        }
        combo[i] += 1;
        for j in i + 1..r {
            combo[j] = combo[j - 1] + 1;
        }
    }
}

fn validate(hand_len: usize, discard_charges: u8, action: &Action) -> Result<(), SearchError> {
    let indices = action.indices();
    let illegal = |reason: String| SearchError::IllegalAction {
        action: action.clone(),
        reason,
    };

    if indices.is_empty() || indices.len() > MAX_PLAYED {
        return Err(illegal(format!("plays {} cards", indices.len())));
    }
    if indices.windows(2).any(|w| w[0] <= w[1]) {
        return Err(illegal("repeated hand index".into()));
    }
    if let Some(&top) = indices.first() {
        if top as usize >= hand_len {
            return Err(illegal(format!(
                "index {top} out of range for hand of {hand_len}"
            )));
        }
    }
    if action.is_discard() && discard_charges == 0 {
        return Err(illegal("no discard charges remain".into()));
    }
    Ok(())
}

/// Apply an action to a determinized world.
///
/// Attack: deal best-subset damage (with critical scaling), replace the
/// played cards from the draw order, tick the enemy counter, and resolve
/// an enemy strike if due. Discard: spend a charge and replace the cards.
///
/// Fails with `IllegalAction` if the action is not legal here; the worker
/// never constructs such calls, so this is an assertion boundary.
pub fn apply(world: &mut World, action: &Action) -> Result<(), SearchError> {
    validate(world.hand.len(), world.discard_charges, action)?;

    match action {
        Action::Attack { indices } => {
            let played: Vec<_> = indices.iter().map(|&i| world.hand[i as usize]).collect();
            world.enemy_health -= attack_damage(&played);

            remove_played(world, indices);
            world.draw_into_hand(indices.len());
            world.enemy_attack_counter -= 1;
        }
        Action::Discard { indices } => {
            world.discard_charges -= 1;
            remove_played(world, indices);
            world.draw_into_hand(indices.len());
        }
    }

    world.turn += 1;
    end_turn(world);
    Ok(())
}

/// Move the selected cards (descending indices) to the discard pile.
fn remove_played(world: &mut World, indices: &[u8]) {
    for &i in indices {
        let card = world.hand.remove(i as usize);
        world.discard_pile.push(card);
    }
}

/// Enemy automaton: once the battle is still live and the counter has
/// expired, the enemy strikes and the counter resets.
fn end_turn(world: &mut World) {
    if world.enemy_health <= 0.0 {
        return;
    }
    if world.enemy_attack_counter <= 0 {
        world.player_health -= world.config.enemy_attack_power;
        world.enemy_attack_counter = world.config.enemy_base_counter;
    }
}

/// True once either side is dead.
#[must_use]
pub fn is_terminal(world: &World) -> bool {
    world.is_terminal()
}

/// Terminal reward in [-1, 1] from the player's perspective: a loss is
/// -1, a win scores the surviving health fraction in (0, 1]. Zero for
/// non-terminal states.
#[must_use]
pub fn reward(world: &World) -> f64 {
    if world.enemy_health <= 0.0 {
        let fraction =
            world.player_health.max(0) as f64 / world.config.starting_player_health.max(1) as f64;
        fraction.clamp(0.0, 1.0)
    } else if world.player_health <= 0 {
        -1.0
    } else {
        0.0
    }
}

/// Depth-cutoff evaluation for unfinished rollouts: damage fraction dealt
/// minus damage fraction taken, clamped to [-1, 1].
#[must_use]
pub fn cutoff_value(world: &World) -> f64 {
    let dealt = 1.0 - (world.enemy_health / world.config.starting_enemy_health.max(1.0));
    let taken =
        1.0 - (world.player_health as f64 / world.config.starting_player_health.max(1) as f64);
    (dealt.clamp(0.0, 1.0) - taken.clamp(0.0, 1.0)).clamp(-1.0, 1.0)
}

/// GUI-facing advance: apply the deterministic effects of an action to a
/// knowable snapshot. Damage uses the real hand (criticals included); the
/// replacement draws are unknown, so the hand is left short for
/// [`GameState::with_drawn_cards`] to fill once recognition sees them.
pub fn apply_to_state(state: &GameState, action: &Action) -> Result<GameState, SearchError> {
    validate(state.hand.len(), state.discard_charges, action)?;

    let mut next = state.clone();
    match action {
        Action::Attack { indices } => {
            let played: Vec<_> = indices.iter().map(|&i| next.hand[i as usize]).collect();
            next.enemy_health -= attack_damage(&played);
            for &i in indices.iter() {
                next.hand.remove(i as usize);
            }
            next.enemy_attack_counter -= 1;
        }
        Action::Discard { indices } => {
            next.discard_charges -= 1;
            for &i in indices.iter() {
                next.hand.remove(i as usize);
            }
        }
    }

    next.turn += 1;
    if next.enemy_health > 0.0 && next.enemy_attack_counter <= 0 {
        next.player_health -= next.config().enemy_attack_power;
        next.enemy_attack_counter = next.config().enemy_base_counter;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{Card, CardId, Rank, Suit};
    use crate::core::state::GameConfig;

    fn test_world(hand_size: usize) -> World {
        let hand: Vec<Card> = (0..hand_size as u8).map(|i| Card::from_id(CardId(i))).collect();
        let draw_pile: Vec<Card> = (hand_size as u8..52).map(|i| Card::from_id(CardId(i))).collect();
        World {
            config: GameConfig::default(),
            hand,
            player_health: 100,
            enemy_health: 100.0,
            enemy_attack_counter: 3,
            discard_charges: 3,
            opponent_hand: vec![],
            draw_pile,
            discard_pile: vec![],
            turn: 0,
        }
    }

    #[test]
    fn test_legal_action_counts() {
        // C(8,1..5) = 8+28+56+70+56 = 218 attacks, doubled with charges.
        assert_eq!(enumerate_actions(8, 1).len(), 436);
        assert_eq!(enumerate_actions(8, 0).len(), 218);
        assert_eq!(enumerate_actions(2, 1).len(), 6);
        assert_eq!(enumerate_actions(1, 0), vec![Action::attack(&[0])]);
    }

    #[test]
    fn test_legal_actions_sorted_and_unique() {
        let actions = enumerate_actions(5, 1);
        assert!(actions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_apply_attack_semantics() {
        let mut world = test_world(8);
        // Hand is Moon 2..9: indices 0 and 1 are 2 and 3 of Moon, no combo.
        let action = Action::attack(&[1, 0]);
        apply(&mut world, &action).unwrap();

        // Solo fallback on the 3: 10 + 3 = 13 damage.
        assert_eq!(world.enemy_health, 87.0);
        // Played cards replaced from the draw order.
        assert_eq!(world.hand.len(), 8);
        assert_eq!(world.discard_pile.len(), 2);
        assert_eq!(world.enemy_attack_counter, 2);
        assert_eq!(world.turn, 1);
    }

    #[test]
    fn test_enemy_strikes_when_counter_expires() {
        let mut world = test_world(8);
        world.enemy_attack_counter = 1;

        apply(&mut world, &Action::attack(&[0])).unwrap();

        assert_eq!(world.enemy_attack_counter, world.config.enemy_base_counter);
        assert_eq!(world.player_health, 100 - world.config.enemy_attack_power);
    }

    #[test]
    fn test_no_strike_after_lethal_attack() {
        let mut world = test_world(8);
        world.enemy_attack_counter = 1;
        world.enemy_health = 5.0;

        apply(&mut world, &Action::attack(&[0])).unwrap();

        assert!(world.is_terminal());
        assert_eq!(world.player_health, 100);
    }

    #[test]
    fn test_discard_spends_charge_without_ticking_counter() {
        let mut world = test_world(8);

        apply(&mut world, &Action::discard(&[2])).unwrap();

        assert_eq!(world.discard_charges, 2);
        assert_eq!(world.enemy_attack_counter, 3);
        assert_eq!(world.enemy_health, 100.0);
        assert_eq!(world.hand.len(), 8);
    }

    #[test]
    fn test_illegal_actions_rejected() {
        let mut world = test_world(3);

        let err = apply(&mut world, &Action::attack(&[7])).unwrap_err();
        assert!(matches!(err, SearchError::IllegalAction { .. }));

        world.discard_charges = 0;
        let err = apply(&mut world, &Action::discard(&[0])).unwrap_err();
        assert!(matches!(err, SearchError::IllegalAction { .. }));
    }

    #[test]
    fn test_reward_range() {
        let mut world = test_world(8);
        assert_eq!(reward(&world), 0.0);

        world.enemy_health = -3.0;
        assert_eq!(reward(&world), 1.0);

        world.player_health = 40;
        assert_eq!(reward(&world), 0.4);

        world.enemy_health = 50.0;
        world.player_health = -5;
        assert_eq!(reward(&world), -1.0);
    }

    #[test]
    fn test_cutoff_value_tracks_advantage() {
        let mut world = test_world(8);
        assert_eq!(cutoff_value(&world), 0.0);

        world.enemy_health = 40.0;
        world.player_health = 80;
        // Dealt 0.6, taken 0.2.
        assert!((cutoff_value(&world) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_apply_to_state_leaves_hand_short() {
        let hand = [
            Card::new(Rank::Seven, Suit::Moon),
            Card::new(Rank::Seven, Suit::Fire),
            Card::new(Rank::Two, Suit::Sun),
        ];
        let state = GameState::new(hand, GameConfig::default()).unwrap();

        let next = apply_to_state(&state, &Action::attack(&[1, 0])).unwrap();

        // Dyad of sevens: 20 + 14.
        assert_eq!(next.enemy_health, 100.0 - 34.0);
        assert_eq!(next.hand.len(), 1);
        assert_eq!(next.hand[0], Card::new(Rank::Two, Suit::Sun));
        assert_eq!(next.enemy_attack_counter, 2);
        // The unseen pool is untouched until draws are recognized.
        assert_eq!(next.unseen.total(), 49);
        assert_eq!(next.turn, 1);
    }
}
