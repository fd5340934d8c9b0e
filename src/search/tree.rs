//! Arena-allocated search tree.

use super::node::{NodeId, SearchNode};

/// A single worker's tree. Nodes live in a flat arena and refer to each
/// other by index; the root is always index 0.
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(SearchNode::root());
        Self { nodes }
    }

    #[must_use]
    pub fn root() -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a child of `parent` reached via `parent_edge` and link it.
    pub fn alloc(&mut self, parent: NodeId, parent_edge: usize) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(SearchNode::new(parent, parent_edge as u16, depth));
        self.get_mut(parent).edges[parent_edge].child = id;
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn root_node(&self) -> &SearchNode {
        self.get(Self::root())
    }

    #[must_use]
    pub fn root_node_mut(&mut self) -> &mut SearchNode {
        self.get_mut(Self::root())
    }
}
