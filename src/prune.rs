//! The prune fixed point.
//!
//! A candidate `e` in `s(d)` stays plausible only if every move `d -> n` to
//! an s-ified neighbor can be mirrored on the classical side: some `f` in
//! `s(n)` is `e` itself or one move away from `e`. Implausible candidates are
//! removed until nothing changes or some prune-ified node has no candidates
//! left.
//!
//! ## Determinism
//!
//! Dirty nodes are kept in a min-heap keyed by [`NodeId`] with a companion
//! set, so the smallest dirty node is always processed next and a node is
//! never queued twice. Candidates and neighbors are visited in `BTreeSet`
//! order.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashSet};
use tracing::{debug, info, warn};

use crate::graph::{DiagramGraph, GraphError};
use crate::types::{NodeId, PruneOutcome};

/// Error type for the prune engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PruneError {
    /// Plausibility was checked against a node outside the fixed point.
    #[error("Node {node} is not prune-ified")]
    NotPruneIfied {
        /// The offending node.
        node: NodeId,
    },
    /// A candidate projection was never given its special neighbors, so
    /// its one-move distances are unknown.
    #[error("Candidate {node} has unexplored special neighbors")]
    UnexploredCandidate {
        /// The candidate.
        node: NodeId,
    },
    /// Graph failure.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Owns the diagram graph and the dirty worklist.
#[derive(Debug)]
pub struct PruneEngine {
    graph: DiagramGraph,
    worklist: BinaryHeap<Reverse<NodeId>>,
    dirty: HashSet<NodeId>,
    checks: u64,
    removed: u64,
}

impl PruneEngine {
    /// Wrap a graph with an empty worklist.
    pub fn new(graph: DiagramGraph) -> Self {
        Self {
            graph,
            worklist: BinaryHeap::new(),
            dirty: HashSet::new(),
            checks: 0,
            removed: 0,
        }
    }

    /// The graph.
    pub fn graph(&self) -> &DiagramGraph {
        &self.graph
    }

    /// The graph, for exploration.
    pub fn graph_mut(&mut self) -> &mut DiagramGraph {
        &mut self.graph
    }

    /// Consume the engine, keeping the graph.
    pub fn into_graph(self) -> DiagramGraph {
        self.graph
    }

    /// Number of nodes waiting to be checked.
    pub fn pending(&self) -> usize {
        self.dirty.len()
    }

    /// Queue a node for checking; no-op if already queued.
    pub fn mark_dirty(&mut self, id: NodeId) {
        if self.dirty.insert(id) {
            self.worklist.push(Reverse(id));
        }
    }

    fn pop_dirty(&mut self) -> Option<NodeId> {
        let Reverse(id) = self.worklist.pop()?;
        self.dirty.remove(&id);
        Some(id)
    }

    /// Add a node to the fixed point and queue it.
    ///
    /// Returns `false` if the node cannot be s-ified.
    pub fn prune_ify(&mut self, id: NodeId) -> Result<bool, PruneError> {
        if self.graph.get(id)?.prune_ified {
            return Ok(true);
        }
        if !self.graph.prune_ify(id)? {
            debug!(node = %id, "Node over capacity, not prune-ified");
            return Ok(false);
        }
        self.mark_dirty(id);
        Ok(true)
    }

    fn explored_candidate(&self, id: NodeId) -> Result<(), PruneError> {
        if self.graph.get(id)?.special_explored {
            Ok(())
        } else {
            Err(PruneError::UnexploredCandidate { node: id })
        }
    }

    /// Whether `e` is still a plausible projection of `d`.
    ///
    /// `e` and every candidate it is compared against must have their
    /// special neighbors explored.
    pub fn plausible_erasure(&self, e: NodeId, d: NodeId) -> Result<bool, PruneError> {
        let node = self.graph.get(d)?;
        if !node.prune_ified {
            return Err(PruneError::NotPruneIfied { node: d });
        }
        self.explored_candidate(e)?;

        for &n in &node.neighbors {
            let Some(s) = &self.graph.get(n)?.s else {
                continue;
            };

            let mut found = false;
            for &f in s {
                self.explored_candidate(f)?;
                if f == e || self.graph.get(f)?.neighbors.contains(&e) {
                    found = true;
                    break;
                }
            }
            if !found {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run the fixed point until the worklist is empty or a contradiction
    /// is found.
    pub fn run(&mut self) -> Result<PruneOutcome, PruneError> {
        info!(pending = self.pending(), "Prune started");

        while let Some(d) = self.pop_dirty() {
            let candidates: BTreeSet<NodeId> = match &self.graph.get(d)?.s {
                Some(s) => s.clone(),
                None => return Err(PruneError::NotPruneIfied { node: d }),
            };

            let mut kept = BTreeSet::new();
            for &e in &candidates {
                self.checks += 1;
                if self.plausible_erasure(e, d)? {
                    kept.insert(e);
                }
            }

            let dropped = (candidates.len() - kept.len()) as u64;
            self.removed += dropped;
            let empty = kept.is_empty();
            self.graph.set_candidates(d, kept)?;

            if empty {
                let code = self.graph.get(d)?.code.clone();
                warn!(
                    node = %d,
                    code = %code,
                    fingerprint = %code.fingerprint(),
                    removed = self.removed,
                    checks = self.checks,
                    "Contradiction"
                );
                return Ok(PruneOutcome::Contradiction {
                    node: d,
                    code,
                    removed: self.removed,
                    checks: self.checks,
                });
            }

            if dropped > 0 {
                debug!(node = %d, dropped, "Removed implausible candidates");
                let neighbors: Vec<NodeId> = self.graph.get(d)?.neighbors.iter().copied().collect();
                for n in neighbors {
                    if self.graph.get(n)?.prune_ified {
                        self.mark_dirty(n);
                    }
                }
            }
        }

        info!(checks = self.checks, removed = self.removed, "Prune finished, consistent");
        Ok(PruneOutcome::Consistent { checks: self.checks, removed: self.removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Code, ElementModel};

    fn engine() -> PruneEngine {
        PruneEngine::new(DiagramGraph::new(ElementModel::Oriented, 12).unwrap())
    }

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn test_single_planar_node_is_consistent() {
        let mut engine = engine();
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        assert!(engine.prune_ify(root).unwrap());
        assert_eq!(engine.pending(), 1);

        let outcome = engine.run().unwrap();
        assert!(outcome.is_consistent());
        assert_eq!(outcome.checks(), 1);
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn test_prune_ify_is_idempotent() {
        let mut engine = engine();
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        engine.prune_ify(root).unwrap();
        engine.run().unwrap();
        engine.prune_ify(root).unwrap();
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn test_plausibility_requires_prune_ified_node() {
        let mut engine = engine();
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        assert_eq!(
            engine.plausible_erasure(root, root),
            Err(PruneError::NotPruneIfied { node: root })
        );
    }

    #[test]
    fn test_over_capacity_neighbors_are_skipped() {
        let mut engine = PruneEngine::new(DiagramGraph::new(ElementModel::Oriented, 1).unwrap());
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        engine.graph_mut().explore_neighbors(root, crate::moves::NeighborKind::Complete).unwrap();
        assert!(engine.prune_ify(root).unwrap());

        let neighbors: Vec<NodeId> =
            engine.graph().get(root).unwrap().neighbors.iter().copied().collect();
        let mut skipped = 0;
        for &n in &neighbors {
            let node = engine.graph().get(n).unwrap();
            if node.chord_count() > 1 {
                assert!(node.s.is_none(), "{} was s-ified", node.code);
                assert!(!node.special_explored);
                skipped += 1;
            } else {
                assert!(node.is_s_ified());
            }
        }
        assert!(skipped > 0);

        assert_eq!(engine.plausible_erasure(root, root), Ok(true));
        assert!(engine.run().unwrap().is_consistent());
    }

    #[test]
    fn test_unexplored_candidate_is_rejected() {
        let mut engine = engine();
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        engine.prune_ify(root).unwrap();
        let kink = engine.graph_mut().node(&code("U+0O+0")).unwrap();
        engine.graph_mut().set_candidates(root, BTreeSet::from([kink])).unwrap();

        assert_eq!(
            engine.plausible_erasure(kink, root),
            Err(PruneError::UnexploredCandidate { node: kink })
        );
    }

    #[test]
    fn test_unexplored_neighbor_candidate_is_rejected() {
        let mut engine = engine();
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        engine.prune_ify(root).unwrap();
        let kink = engine.graph_mut().node(&code("U+0O+0")).unwrap();
        let other = engine.graph_mut().node(&code("U-0O-0")).unwrap();
        engine.graph_mut().link(root, kink).unwrap();
        engine.graph_mut().set_candidates(kink, BTreeSet::from([other])).unwrap();

        assert_eq!(
            engine.plausible_erasure(root, root),
            Err(PruneError::UnexploredCandidate { node: other })
        );
    }

    #[test]
    fn test_trefoil_linked_to_virtual_pair_contradicts() {
        let trefoil = code("O+0U+1O+2U+0O+1U+2");
        let virt = code("U-0U+1O-0O+1");

        let mut engine = engine();
        let t = engine.graph_mut().node(&trefoil).unwrap();
        let v = engine.graph_mut().node(&virt).unwrap();
        engine.graph_mut().link(t, v).unwrap();
        engine.prune_ify(t).unwrap();
        engine.prune_ify(v).unwrap();

        let outcome = engine.run().unwrap();
        let found = outcome.contradiction_code().cloned().unwrap();
        assert!(found == trefoil || found == virt);
        match outcome {
            PruneOutcome::Contradiction { node, .. } => assert_eq!(node, t),
            PruneOutcome::Consistent { .. } => panic!("expected a contradiction"),
        }
    }

    #[test]
    fn test_s_sets_only_shrink() {
        let mut engine = engine();
        let root = engine.graph_mut().node(&Code::empty()).unwrap();
        engine.graph_mut().explore_neighbors(root, crate::moves::NeighborKind::Complete).unwrap();
        engine.prune_ify(root).unwrap();
        let neighbors: Vec<NodeId> =
            engine.graph().get(root).unwrap().neighbors.iter().copied().collect();
        for n in &neighbors {
            engine.prune_ify(*n).unwrap();
        }

        let s_len = |engine: &PruneEngine, n: NodeId| {
            engine.graph().get(n).unwrap().s.as_ref().unwrap().len()
        };
        let before: Vec<usize> = neighbors.iter().map(|&n| s_len(&engine, n)).collect();
        assert!(engine.run().unwrap().is_consistent());
        let after: Vec<usize> = neighbors.iter().map(|&n| s_len(&engine, n)).collect();

        for (b, a) in before.iter().zip(&after) {
            assert!(a <= b);
            assert!(*a > 0);
        }
    }
}
