//! A single search worker: one tree, one RNG stream, one budget.
//!
//! Each iteration re-determinizes the root belief into a fresh world, so
//! hidden information is re-sampled every time a line of play is
//! evaluated. Action legality depends only on hand size and remaining
//! charges, both of which evolve deterministically along an action path,
//! so edges stored in the tree stay legal in every world that replays
//! them.

use std::time::Instant;

use tracing::{debug, trace};

use super::config::SearchConfig;
use super::determinize;
use super::node::NodeId;
use super::stats::{ActionStats, WorkerReport};
use super::tree::SearchTree;
use crate::core::{Action, Card, GameRng, GameState, World};
use crate::error::SearchError;
use crate::rules::{
    apply, attack_damage, cutoff_value, legal_actions, legal_actions_world, reward, MAX_PLAYED,
};

/// Run one worker to completion and report its root statistics.
///
/// The worker stops on whichever budget expires first. Recoverable
/// failures (bad determinizations) are counted and tolerated up to the
/// configured rate; an illegal action surfacing mid-simulation is an
/// engine bug and stops the worker with the error in its report.
pub fn run(
    worker_id: usize,
    root_state: &GameState,
    config: &SearchConfig,
    deadline: Option<Instant>,
    seed: u64,
) -> WorkerReport {
    let start = Instant::now();
    let mut report = WorkerReport::new(worker_id);
    let mut rng = GameRng::new(seed);

    let mut tree = SearchTree::new(1024);
    tree.root_node_mut().populate_edges(legal_actions(root_state));
    if !tree.root_node().has_edges() {
        report.time_us = start.elapsed().as_micros() as u64;
        return report;
    }

    // Without any budget the loop would never stop.
    let unbudgeted = config.max_iterations.is_none() && deadline.is_none();
    let mut attempts: u32 = 0;

    while !unbudgeted {
        if config
            .max_iterations
            .is_some_and(|max| report.iterations >= max)
        {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        attempts += 1;
        let world = match determinize::sample(root_state, &mut rng) {
            Ok(world) => world,
            Err(err) => {
                report.determinization_failures += 1;
                trace!(worker_id, %err, "determinization failed");
                if attempts >= config.min_failure_samples
                    && f64::from(report.determinization_failures) / f64::from(attempts)
                        > config.max_failure_rate
                {
                    report.exhausted = true;
                    report.error = Some(SearchError::DeterminizationExhausted {
                        failures: report.determinization_failures,
                        attempts,
                    });
                    break;
                }
                continue;
            }
        };

        if let Err(err) = iterate(&mut tree, world, config, &mut rng) {
            report.error = Some(err);
            break;
        }
        report.iterations += 1;
    }

    // Only actions that were actually simulated carry evidence; edges the
    // budget never reached stay out of the report.
    report.root_stats = tree
        .root_node()
        .edges
        .iter()
        .filter(|edge| edge.visits > 0)
        .map(|edge| {
            (
                edge.action.clone(),
                ActionStats {
                    visits: u64::from(edge.visits),
                    total_value: edge.total_value,
                },
            )
        })
        .collect();
    report.time_us = start.elapsed().as_micros() as u64;

    debug!(
        worker_id,
        iterations = report.iterations,
        failures = report.determinization_failures,
        nodes = tree.len(),
        time_us = report.time_us,
        "worker finished"
    );
    report
}

/// One select / expand / rollout / backpropagate pass.
fn iterate(
    tree: &mut SearchTree,
    mut world: World,
    config: &SearchConfig,
    rng: &mut GameRng,
) -> Result<(), SearchError> {
    let mut node_id = SearchTree::root();
    let mut path: Vec<(NodeId, usize)> = Vec::new();

    // Selection walks stored edges, replaying each action in this
    // iteration's world, until a node still has untried actions.
    let leaf = loop {
        if world.is_terminal() {
            break node_id;
        }

        if !tree.get(node_id).has_edges() {
            tree.get_mut(node_id)
                .populate_edges(legal_actions_world(&world));
            if !tree.get(node_id).has_edges() {
                break node_id;
            }
        }

        if let Some(edge_i) = tree.get(node_id).first_untried() {
            let action = tree.get(node_id).edges[edge_i].action.clone();
            apply(&mut world, &action)?;
            let child = tree.alloc(node_id, edge_i);
            path.push((node_id, edge_i));
            break child;
        }

        let Some(edge_i) = tree.get(node_id).select_uct(config.exploration_constant) else {
            break node_id;
        };
        let action = tree.get(node_id).edges[edge_i].action.clone();
        apply(&mut world, &action)?;
        path.push((node_id, edge_i));
        node_id = tree.get(node_id).edges[edge_i].child;
    };

    let value = rollout(&mut world, config, rng)?;
    backpropagate(tree, leaf, &path, value);
    Ok(())
}

/// Play random legal actions to a terminal or the depth cutoff. With the
/// lethal check enabled a finishing attack pre-empts the random pick.
fn rollout(world: &mut World, config: &SearchConfig, rng: &mut GameRng) -> Result<f64, SearchError> {
    for _ in 0..config.max_rollout_depth {
        if world.is_terminal() {
            return Ok(reward(world));
        }
        let actions = legal_actions_world(world);
        if actions.is_empty() {
            return Ok(reward(world));
        }
        let lethal = if config.rollout_lethal_check {
            find_lethal(world, &actions)
        } else {
            None
        };
        let action =
            lethal.unwrap_or_else(|| &actions[rng.gen_range_usize(0..actions.len())]);
        apply(world, action)?;
    }
    Ok(if world.is_terminal() {
        reward(world)
    } else {
        cutoff_value(world)
    })
}

/// First full-size attack whose damage finishes the enemy, if any.
///
/// Only attacks playing the maximum card count are checked: damage is the
/// best subset score of the played cards, so a full-size play dominates
/// every smaller play drawn from the same hand.
fn find_lethal<'a>(world: &World, actions: &'a [Action]) -> Option<&'a Action> {
    let max_cards = world.hand.len().min(MAX_PLAYED);
    actions.iter().find(|action| {
        if action.is_discard() || action.card_count() != max_cards {
            return false;
        }
        let played: Vec<Card> = action
            .indices()
            .iter()
            .map(|&i| world.hand[i as usize])
            .collect();
        attack_damage(&played) >= world.enemy_health
    })
}

fn backpropagate(tree: &mut SearchTree, leaf: NodeId, path: &[(NodeId, usize)], value: f64) {
    tree.get_mut(leaf).visits += 1;
    for &(node_id, edge_i) in path {
        let node = tree.get_mut(node_id);
        node.visits += 1;
        let edge = &mut node.edges[edge_i];
        edge.visits += 1;
        edge.total_value += value;
    }
}
