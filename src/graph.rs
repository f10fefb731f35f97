//! The diagram graph: canonical nodes, move edges and candidate projections.
//!
//! Every diagram reached during exploration is a node in a single arena,
//! created only through [`DiagramGraph::node`] so each canonical code has
//! exactly one node. Neighbor edges are added in both directions as move
//! enumeration discovers them.
//!
//! ## Candidate Projections
//!
//! Each s-ified node carries an `s` set, the classical diagrams it could
//! project to:
//!
//! - planar node: `s = {node}`
//! - non-planar node: `s = planar subdiagrams` (plus, with R3 unification,
//!   the planar subdiagrams of its whole R3 neighborhood)
//!
//! Nodes with more chords than the capacity keep their surface but are never
//! expanded, never given subdiagrams and never s-ified. Every member of an
//! `s` set therefore has its special neighbors explored.

use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

use crate::moves::{MoveKind, NeighborKind};
use crate::policy::ExplorePolicyV1;
use crate::store::{DiagramStore, StoreError};
use crate::subdiagram::{CapacityError, SubsetTable};
use crate::surface::{oracle_for, PlanarityOracle, SurfaceError};
use crate::types::{Code, DiagramNode, ElementModel, GraphStats, NodeId};

/// Error type for graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A surface could not be computed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// Arena failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Subset table failure.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Memoized graph of diagrams.
#[derive(Debug)]
pub struct DiagramGraph {
    store: DiagramStore,
    model: ElementModel,
    oracle: Box<dyn PlanarityOracle>,
    table: SubsetTable,
    exhaustive_prune: bool,
    r3_unify_limit: Option<usize>,
    s_order: Vec<NodeId>,
}

impl DiagramGraph {
    /// Create an empty graph for codes of at most `max_chords` chords.
    pub fn new(model: ElementModel, max_chords: usize) -> Result<Self, GraphError> {
        Ok(Self {
            store: DiagramStore::new(),
            model,
            oracle: oracle_for(model),
            table: SubsetTable::new(max_chords)?,
            exhaustive_prune: true,
            r3_unify_limit: None,
            s_order: Vec::new(),
        })
    }

    /// Create a graph configured by a policy.
    pub fn from_policy(policy: &ExplorePolicyV1) -> Result<Self, GraphError> {
        let graph = Self::new(policy.model, policy.max_chords)?
            .with_exhaustive_prune(policy.exhaustive_prune)
            .with_r3_unify(policy.r3_unify.then_some(policy.r3_unify_limit));
        Ok(graph)
    }

    /// Whether prune-ifying a node also s-ifies all of its neighbors.
    pub fn with_exhaustive_prune(mut self, exhaustive: bool) -> Self {
        self.exhaustive_prune = exhaustive;
        self
    }

    /// Merge R3-neighborhood subdiagrams into `s`, visiting at most `limit`
    /// neighbors per node. `None` disables it.
    pub fn with_r3_unify(mut self, limit: Option<usize>) -> Self {
        self.r3_unify_limit = limit;
        self
    }

    /// Element model of every code in the graph.
    pub fn model(&self) -> ElementModel {
        self.model
    }

    /// Largest chord count that is expanded.
    pub fn max_chords(&self) -> usize {
        self.table.max_chords()
    }

    /// The underlying arena.
    pub fn store(&self) -> &DiagramStore {
        &self.store
    }

    /// Node by handle.
    pub fn get(&self, id: NodeId) -> Result<&DiagramNode, GraphError> {
        Ok(self.store.get(id)?)
    }

    /// Nodes in the order they were s-ified.
    pub fn s_order(&self) -> &[NodeId] {
        &self.s_order
    }

    /// Resolve a code to its node, creating it if needed.
    ///
    /// The code is canonicalized under the graph's element model first; the
    /// surface of a new node is computed immediately.
    pub fn node(&mut self, code: &Code) -> Result<NodeId, GraphError> {
        let canonical = code.normalized(self.model);
        if let Some(id) = self.store.lookup(&canonical) {
            return Ok(id);
        }

        let surface = self.oracle.surface(&canonical)?;
        let (id, _) = self.store.insert(canonical, surface)?;
        debug!(node = %id, code = %self.store.get(id)?.code, surface = %surface, "Created node");
        Ok(id)
    }

    /// Add a neighbor edge in both directions.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError> {
        Ok(self.store.link(a, b)?)
    }

    /// True if the node is small enough to expand.
    pub fn within_capacity(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get(id)?.chord_count() <= self.max_chords())
    }

    /// Enumerate and link neighbors of a node.
    ///
    /// `Special` and `Complete` run at most once per node; `Complete` after
    /// `Special` only adds the chord-adding moves. `Rest` is never recorded.
    /// Nodes over capacity are left alone.
    pub fn explore_neighbors(&mut self, id: NodeId, kind: NeighborKind) -> Result<(), GraphError> {
        if !self.within_capacity(id)? {
            return Ok(());
        }

        let node = self.store.get_mut(id)?;
        let effective = match kind {
            NeighborKind::Special if node.special_explored => return Ok(()),
            NeighborKind::Special => {
                node.special_explored = true;
                NeighborKind::Special
            }
            NeighborKind::Complete if node.complete_explored => return Ok(()),
            NeighborKind::Complete => {
                let effective = if node.special_explored {
                    NeighborKind::Rest
                } else {
                    NeighborKind::Complete
                };
                node.special_explored = true;
                node.complete_explored = true;
                effective
            }
            NeighborKind::Rest => NeighborKind::Rest,
        };

        let code = node.code.clone();
        let neighbors = effective.enumerate(&code, self.model);
        let found = neighbors.len();
        for neighbor in neighbors {
            let nid = self.node(&neighbor)?;
            self.link(id, nid)?;
        }

        debug!(
            node = %id,
            kind = %kind,
            enumerated = found,
            degree = self.get(id)?.neighbors.len(),
            "Explored neighbors"
        );
        Ok(())
    }

    /// Compute the planar subdiagrams of a node, once.
    ///
    /// Each planar subdiagram has its special neighbors explored. Returns
    /// `false` for nodes over capacity.
    pub fn generate_subs(&mut self, id: NodeId) -> Result<bool, GraphError> {
        let node = self.get(id)?;
        if node.subs.is_some() {
            return Ok(true);
        }
        if !self.within_capacity(id)? {
            return Ok(false);
        }

        let codes = self.table.subdiagrams(&node.code)?;
        let mut subs = BTreeSet::new();
        for code in &codes {
            let sid = self.node(code)?;
            if self.get(sid)?.is_planar() {
                self.explore_neighbors(sid, NeighborKind::Special)?;
                subs.insert(sid);
            }
        }

        debug!(node = %id, subdiagrams = codes.len(), planar = subs.len(), "Generated subs");
        self.store.get_mut(id)?.subs = Some(subs);
        Ok(true)
    }

    /// Assign the candidate projection set of a node, once.
    ///
    /// Returns `false` if the node is over capacity.
    pub fn s_ify(&mut self, id: NodeId) -> Result<bool, GraphError> {
        let node = self.get(id)?;
        if node.is_s_ified() {
            return Ok(true);
        }
        if !self.within_capacity(id)? {
            debug!(node = %id, chords = node.chord_count(), "Node over capacity, not s-ified");
            return Ok(false);
        }

        let s = if node.is_planar() {
            self.explore_neighbors(id, NeighborKind::Special)?;
            BTreeSet::from([id])
        } else {
            if !self.generate_subs(id)? {
                return Ok(false);
            }
            let mut s = self.get(id)?.subs.clone().unwrap_or_default();
            if let Some(limit) = self.r3_unify_limit {
                self.collect_r3_subs(id, limit, &mut s)?;
            }
            s
        };

        debug!(node = %id, candidates = s.len(), "S-ified node");
        self.store.get_mut(id)?.s = Some(s);
        self.s_order.push(id);
        Ok(true)
    }

    /// Breadth-first walk over R3 neighbors, adding their planar subs to `s`.
    fn collect_r3_subs(
        &mut self,
        id: NodeId,
        limit: usize,
        s: &mut BTreeSet<NodeId>,
    ) -> Result<(), GraphError> {
        let mut seen = BTreeSet::from([id]);
        let mut queue = VecDeque::from([id]);
        let mut visits = 0;

        while let Some(current) = queue.pop_front() {
            if !self.within_capacity(current)? {
                continue;
            }

            let code = self.get(current)?.code.clone();
            for neighbor in MoveKind::R3.enumerate(&code, self.model) {
                let nid = self.node(&neighbor)?;
                if seen.contains(&nid) {
                    continue;
                }
                if visits >= limit {
                    debug!(node = %id, limit, "R3 neighborhood truncated");
                    return Ok(());
                }
                seen.insert(nid);
                visits += 1;

                self.generate_subs(nid)?;
                if let Some(subs) = &self.get(nid)?.subs {
                    s.extend(subs.iter().copied());
                }
                queue.push_back(nid);
            }
        }
        Ok(())
    }

    /// Prepare a node for the prune fixed point, once.
    ///
    /// The node is s-ified; in exhaustive mode its special neighbors are
    /// explored and every neighbor is s-ified too. Returns `false` if the
    /// node could not be s-ified.
    pub fn prune_ify(&mut self, id: NodeId) -> Result<bool, GraphError> {
        if self.get(id)?.prune_ified {
            return Ok(true);
        }
        if !self.s_ify(id)? {
            return Ok(false);
        }

        if self.exhaustive_prune {
            self.explore_neighbors(id, NeighborKind::Special)?;
            let neighbors: Vec<NodeId> = self.get(id)?.neighbors.iter().copied().collect();
            for n in neighbors {
                self.s_ify(n)?;
            }
        }

        self.store.get_mut(id)?.prune_ified = true;
        Ok(true)
    }

    /// Replace the candidate set of an s-ified node.
    pub(crate) fn set_candidates(
        &mut self,
        id: NodeId,
        s: BTreeSet<NodeId>,
    ) -> Result<(), GraphError> {
        self.store.get_mut(id)?.s = Some(s);
        Ok(())
    }

    /// Size of the graph.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.store.len(),
            edges: self.store.num_edges(),
            ..Default::default()
        };
        for node in self.store.iter() {
            stats.planar += node.is_planar() as usize;
            stats.s_ified += node.is_s_ified() as usize;
            stats.prune_ified += node.prune_ified as usize;
            stats.max_chords_seen = stats.max_chords_seen.max(node.chord_count());
        }
        stats
    }
}
