//! Tree nodes and edges.

use crate::core::Action;

/// Index of a node within its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// An action edge out of a node, carrying the visit statistics for the
/// action and a link to the child (NONE until expanded).
#[derive(Clone, Debug)]
pub struct Edge {
    pub action: Action,
    pub child: NodeId,
    pub visits: u32,
    pub total_value: f64,
}

impl Edge {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            child: NodeId::NONE,
            visits: 0,
            total_value: 0.0,
        }
    }

    /// Mean value of this edge, 0.0 when unvisited.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / f64::from(self.visits)
        }
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.child.is_none()
    }
}

/// One node of a search tree.
///
/// Edges are kept sorted by the canonical `Action` ordering, which makes
/// tie-breaks in selection deterministic across runs with the same seed.
/// Edges are populated lazily, the first time a determinized playthrough
/// reaches the node.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub parent: NodeId,
    /// Index of the edge in the parent that leads here.
    pub parent_edge: u16,
    pub depth: u16,
    pub visits: u32,
    pub edges: Vec<Edge>,
}

impl SearchNode {
    /// The root node; its edges are filled in by the worker before the
    /// first iteration.
    #[must_use]
    pub fn root() -> Self {
        Self {
            parent: NodeId::NONE,
            parent_edge: 0,
            depth: 0,
            visits: 0,
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn new(parent: NodeId, parent_edge: u16, depth: u16) -> Self {
        Self {
            parent,
            parent_edge,
            depth,
            visits: 0,
            edges: Vec::new(),
        }
    }

    /// Actions become edges in canonical order.
    pub fn populate_edges(&mut self, actions: Vec<Action>) {
        debug_assert!(self.edges.is_empty());
        self.edges = actions.into_iter().map(Edge::new).collect();
    }

    #[must_use]
    pub fn has_edges(&self) -> bool {
        !self.edges.is_empty()
    }

    /// First edge with no child yet, in canonical action order.
    #[must_use]
    pub fn first_untried(&self) -> Option<usize> {
        self.edges.iter().position(|e| !e.is_expanded())
    }

    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.edges.iter().all(Edge::is_expanded)
    }

    /// Pick an edge by UCT. Unvisited edges win outright (first in
    /// canonical order); otherwise the highest upper confidence bound,
    /// with ties going to the earlier edge.
    #[must_use]
    pub fn select_uct(&self, exploration: f64) -> Option<usize> {
        if self.edges.is_empty() {
            return None;
        }
        if let Some(i) = self.edges.iter().position(|e| e.visits == 0) {
            return Some(i);
        }

        let ln_parent = f64::from(self.visits.max(1)).ln();
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, edge) in self.edges.iter().enumerate() {
            let explore = (ln_parent / f64::from(edge.visits)).sqrt();
            let score = edge.mean() + exploration * explore;
            if score > best_score {
                best_score = score;
                best = i;
            }
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack(i: u8) -> Action {
        Action::attack(&[i])
    }

    #[test]
    fn test_node_id_sentinel() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId(0).is_none());
    }

    #[test]
    fn test_edge_mean() {
        let mut edge = Edge::new(attack(0));
        assert_eq!(edge.mean(), 0.0);
        edge.visits = 4;
        edge.total_value = 2.0;
        assert_eq!(edge.mean(), 0.5);
    }

    #[test]
    fn test_first_untried_in_canonical_order() {
        let mut node = SearchNode::root();
        node.populate_edges(vec![attack(0), attack(1), attack(2)]);

        assert_eq!(node.first_untried(), Some(0));
        node.edges[0].child = NodeId(1);
        assert_eq!(node.first_untried(), Some(1));
        node.edges[1].child = NodeId(2);
        node.edges[2].child = NodeId(3);
        assert_eq!(node.first_untried(), None);
        assert!(node.is_fully_expanded());
    }

    #[test]
    fn test_uct_prefers_unvisited() {
        let mut node = SearchNode::root();
        node.populate_edges(vec![attack(0), attack(1)]);
        node.visits = 10;
        node.edges[0].visits = 10;
        node.edges[0].total_value = 10.0;

        // A perfect visited edge still loses to the unvisited one.
        assert_eq!(node.select_uct(1.4), Some(1));
    }

    #[test]
    fn test_uct_balances_value_and_exploration() {
        let mut node = SearchNode::root();
        node.populate_edges(vec![attack(0), attack(1)]);
        node.visits = 100;
        node.edges[0].visits = 90;
        node.edges[0].total_value = 45.0; // mean 0.5
        node.edges[1].visits = 10;
        node.edges[1].total_value = 4.0; // mean 0.4

        // With no exploration the better mean wins.
        assert_eq!(node.select_uct(0.0), Some(0));
        // With strong exploration the rarely-visited edge wins.
        assert_eq!(node.select_uct(2.0), Some(1));
    }

    #[test]
    fn test_uct_tie_breaks_to_earlier_edge() {
        let mut node = SearchNode::root();
        node.populate_edges(vec![attack(0), attack(1)]);
        node.visits = 2;
        for edge in &mut node.edges {
            edge.visits = 1;
            edge.total_value = 0.5;
        }
        assert_eq!(node.select_uct(1.4), Some(0));
    }

    #[test]
    fn test_uct_empty_node() {
        let node = SearchNode::root();
        assert_eq!(node.select_uct(1.4), None);
    }
}
