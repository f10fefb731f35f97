//! In-memory diagram arena.

use std::collections::{BTreeSet, HashMap};

use crate::surface::Surface;
use crate::types::{Code, DiagramNode, NodeId};

/// Error type for the diagram arena.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Handle not issued by this store.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    /// The arena ran out of handles.
    #[error("Diagram arena is full at {0} nodes")]
    Full(usize),
}

/// Arena of diagram nodes indexed by canonical code.
///
/// Nodes are never removed, so a [`NodeId`] stays valid for the lifetime of
/// the store. Iteration is in creation order.
#[derive(Debug, Clone, Default)]
pub struct DiagramStore {
    nodes: Vec<DiagramNode>,
    index: HashMap<Code, NodeId>,
}

impl DiagramStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of an existing code.
    pub fn lookup(&self, code: &Code) -> Option<NodeId> {
        self.index.get(code).copied()
    }

    /// Add a node for `code`, or return the existing one.
    ///
    /// The second value is `true` if a node was created.
    pub fn insert(&mut self, code: Code, surface: Surface) -> Result<(NodeId, bool), StoreError> {
        if let Some(id) = self.lookup(&code) {
            return Ok((id, false));
        }

        let raw = u32::try_from(self.nodes.len()).map_err(|_| StoreError::Full(self.nodes.len()))?;
        let id = NodeId(raw);
        self.index.insert(code.clone(), id);
        self.nodes.push(DiagramNode::new(id, code, surface));
        Ok((id, true))
    }

    /// Get a node.
    pub fn get(&self, id: NodeId) -> Result<&DiagramNode, StoreError> {
        self.nodes.get(id.index()).ok_or(StoreError::NodeNotFound(id))
    }

    /// Get a node for modification.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut DiagramNode, StoreError> {
        self.nodes.get_mut(id.index()).ok_or(StoreError::NodeNotFound(id))
    }

    /// Record `a` and `b` as neighbors of each other.
    ///
    /// Self-loops are ignored.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<(), StoreError> {
        self.get(b)?;
        if a == b {
            return Ok(());
        }
        self.get_mut(a)?.neighbors.insert(b);
        self.get_mut(b)?.neighbors.insert(a);
        Ok(())
    }

    /// Neighbor handles of a node.
    pub fn neighbors(&self, id: NodeId) -> Result<&BTreeSet<NodeId>, StoreError> {
        Ok(&self.get(id)?.neighbors)
    }

    /// Get number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node was created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter()
    }
}
