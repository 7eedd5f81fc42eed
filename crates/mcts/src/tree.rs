//! Arena-allocated MCTS tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. A node is
//! owned through its parent's children list; the parent link is an index.

use crate::node::{Node, NodeId};
use santorini_core::{BoardState, Child};

/// Arena-allocated MCTS tree.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only the root.
    pub fn new(root: BoardState) -> Self {
        Self {
            nodes: vec![Node::root(root)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append a generated child under `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, child: Child, sim_weight: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(
            child.state,
            Some(child.ply),
            child.group,
            Some(parent),
            sim_weight,
        ));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Discard everything and start over from a new root.
    pub fn reset(&mut self, root: BoardState) {
        self.nodes.clear();
        self.nodes.push(Node::root(root));
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node {
        self.get(NodeId::ROOT)
    }

    /// Number of edges from the root to `id`.
    pub fn depth(&self, mut id: NodeId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.get(id).parent {
            depth += 1;
            id = parent;
        }
        depth
    }
}
