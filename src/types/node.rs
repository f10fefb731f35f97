//! Diagram nodes of the exploration graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::code::Code;
use crate::surface::Surface;

/// Dense handle of a node in the diagram arena.
///
/// Handles are assigned in creation order and never reused, so ordering by
/// `NodeId` is ordering by discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position in the arena.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One canonical diagram and the state attached to it during exploration.
#[derive(Debug, Clone)]
pub struct DiagramNode {
    /// Handle of this node.
    pub id: NodeId,
    /// Canonical code.
    pub code: Code,
    /// Genus and planarity, computed when the node is created.
    pub surface: Surface,
    /// Adjacent diagrams (one move away), kept symmetric.
    pub neighbors: BTreeSet<NodeId>,
    /// Planar subdiagrams, once generated.
    pub subs: Option<BTreeSet<NodeId>>,
    /// Candidate classical projections, once s-ified.
    pub s: Option<BTreeSet<NodeId>>,
    /// Special (non-growing) neighbors have been enumerated.
    pub special_explored: bool,
    /// All neighbors have been enumerated.
    pub complete_explored: bool,
    /// Node takes part in the prune fixed point.
    pub prune_ified: bool,
}

impl DiagramNode {
    /// Fresh node with no neighbors and no derived sets.
    pub fn new(id: NodeId, code: Code, surface: Surface) -> Self {
        Self {
            id,
            code,
            surface,
            neighbors: BTreeSet::new(),
            subs: None,
            s: None,
            special_explored: false,
            complete_explored: false,
            prune_ified: false,
        }
    }

    /// True for classical diagrams.
    pub fn is_planar(&self) -> bool {
        self.surface.planar
    }

    /// Number of chords in the code.
    pub fn chord_count(&self) -> usize {
        self.code.chord_count()
    }

    /// True once `s` has been assigned.
    pub fn is_s_ified(&self) -> bool {
        self.s.is_some()
    }
}
