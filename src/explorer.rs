//! Bounded exploration from the empty diagram.
//!
//! The explorer seeds the graph with the empty code, grows it level by
//! level, optionally audits move distances, and then runs the prune fixed
//! point.
//!
//! ## Algorithm
//!
//! 1. Prune-ify the root and explore its `seed_expansion` neighbors
//! 2. For each level `1..=depth`, for each frontier node in id order, for
//!    each of its neighbors in id order:
//!    - skip neighbors above the chord capacity
//!    - prune-ify the neighbor
//!    - below the last level, explore its `frontier_expansion` neighbors and
//!      add it to the next frontier
//! 3. Audit, if enabled
//! 4. Run the prune fixed point
//!
//! Neighbor lists are snapshotted before each frontier node is processed,
//! so nodes discovered while walking a level only join later levels.

use std::collections::BTreeSet;
use tracing::{info, info_span};

use crate::audit::DistanceAudit;
use crate::graph::{DiagramGraph, GraphError};
use crate::policy::{ExplorePolicyV1, PolicyError};
use crate::prune::{PruneEngine, PruneError};
use crate::types::{Code, ExploreReport, NodeId};

/// Error type for exploration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExploreError {
    /// The policy failed validation.
    #[error("Invalid policy: {0}")]
    Policy(#[from] PolicyError),
    /// Graph failure.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Prune failure.
    #[error(transparent)]
    Prune(#[from] PruneError),
}

/// Drives one exploration run under a fixed policy.
#[derive(Debug)]
pub struct Explorer {
    policy: ExplorePolicyV1,
    engine: PruneEngine,
    root: Option<NodeId>,
}

impl Explorer {
    /// Validate the policy and build an empty graph for it.
    pub fn new(policy: ExplorePolicyV1) -> Result<Self, ExploreError> {
        policy.validate()?;
        let graph = DiagramGraph::from_policy(&policy)?;
        Ok(Self { policy, engine: PruneEngine::new(graph), root: None })
    }

    /// The policy.
    pub fn policy(&self) -> &ExplorePolicyV1 {
        &self.policy
    }

    /// The graph built so far.
    pub fn graph(&self) -> &DiagramGraph {
        self.engine.graph()
    }

    /// The empty diagram's node, once seeded.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Create the root and expand it.
    fn seed(&mut self) -> Result<NodeId, ExploreError> {
        if let Some(root) = self.root {
            return Ok(root);
        }

        let root = self.engine.graph_mut().node(&Code::empty())?;
        self.engine.prune_ify(root)?;
        self.engine.graph_mut().explore_neighbors(root, self.policy.seed_expansion)?;
        self.root = Some(root);

        info!(
            root = %root,
            neighbors = self.graph().get(root)?.neighbors.len(),
            expansion = %self.policy.seed_expansion,
            "Seeded exploration"
        );
        Ok(root)
    }

    /// Walk the frontier for one level and return the next frontier.
    fn expand_level(
        &mut self,
        level: u32,
        frontier: &BTreeSet<NodeId>,
    ) -> Result<BTreeSet<NodeId>, ExploreError> {
        let last = level == self.policy.depth;
        let mut next = BTreeSet::new();

        for &f in frontier {
            let neighbors: Vec<NodeId> = self.graph().get(f)?.neighbors.iter().copied().collect();
            for n in neighbors {
                if !self.graph().within_capacity(n)? {
                    continue;
                }
                self.engine.prune_ify(n)?;
                if !last {
                    self.engine.graph_mut().explore_neighbors(n, self.policy.frontier_expansion)?;
                    next.insert(n);
                }
            }
        }

        info!(
            level,
            frontier = frontier.len(),
            next = next.len(),
            nodes = self.graph().store().len(),
            "Level expanded"
        );
        Ok(next)
    }

    /// Run the whole pipeline and report.
    pub fn run(&mut self) -> Result<ExploreReport, ExploreError> {
        let span = info_span!(
            "explore",
            policy = %self.policy.policy_id(),
            depth = self.policy.depth
        );
        let _enter = span.enter();

        let root = {
            let _seed = info_span!("seed").entered();
            self.seed()?
        };

        let mut frontier = BTreeSet::from([root]);
        for level in 1..=self.policy.depth {
            let _level = info_span!("level", level).entered();
            frontier = self.expand_level(level, &frontier)?;
        }

        let audit = if self.policy.audit {
            let _audit = info_span!("audit").entered();
            Some(DistanceAudit::new(self.policy.audit_limit).run(self.graph())?)
        } else {
            None
        };

        let outcome = {
            let _prune = info_span!("prune").entered();
            self.engine.run()?
        };

        let stats = self.graph().stats();
        info!(
            nodes = stats.nodes,
            edges = stats.edges,
            prune_ified = stats.prune_ified,
            consistent = outcome.is_consistent(),
            "Exploration finished"
        );

        Ok(ExploreReport {
            policy_id: self.policy.policy_id().to_string(),
            params_hash: self.policy.params_hash(),
            model: self.policy.model,
            outcome,
            stats,
            audit,
        })
    }
}

/// Run one exploration under `policy`.
pub fn explore(policy: &ExplorePolicyV1) -> Result<ExploreReport, ExploreError> {
    Explorer::new(policy.clone())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::NeighborKind;
    use crate::types::ElementModel;

    #[test]
    fn test_default_run() {
        let report = explore(&ExplorePolicyV1::default()).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.stats.nodes, 7);
        assert_eq!(report.stats.prune_ified, 7);
        assert_eq!(report.stats.s_ified, 7);
        assert_eq!(report.stats.planar, 5);
        assert_eq!(report.stats.max_chords_seen, 2);
        assert_eq!(report.outcome.checks(), 11);
        assert_eq!(report.outcome.removed(), 0);
        assert!(report.audit.is_none());
    }

    #[test]
    fn test_report_carries_policy_identity() {
        let policy = ExplorePolicyV1::default();
        let report = explore(&policy).unwrap();
        assert_eq!(report.policy_id, "explore_policy_v1");
        assert_eq!(report.params_hash, policy.params_hash());
        assert_eq!(report.model, ElementModel::Oriented);
    }

    #[test]
    fn test_depth_zero_only_prunes_root() {
        let policy = ExplorePolicyV1 { depth: 0, ..Default::default() };
        let report = explore(&policy).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.stats.nodes, 7);
        assert_eq!(report.stats.prune_ified, 1);
    }

    #[test]
    fn test_depth_one() {
        let policy = ExplorePolicyV1 { depth: 1, ..Default::default() };
        let report = explore(&policy).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.stats.nodes, 7);
        assert_eq!(report.stats.prune_ified, 7);
    }

    #[test]
    fn test_flat_run() {
        let policy = ExplorePolicyV1 { model: ElementModel::Flat, ..Default::default() };
        let report = explore(&policy).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.stats.nodes, 5);
        assert_eq!(report.stats.prune_ified, 5);
        assert_eq!(report.stats.planar, 4);
    }

    #[test]
    fn test_audit_runs_when_enabled() {
        let policy = ExplorePolicyV1 { audit: true, ..Default::default() };
        let report = explore(&policy).unwrap();
        let audit = report.audit.unwrap();
        assert_eq!(audit.indexed, 7);
        assert_eq!(audit.not_indexed, 0);
        assert!(audit.findings.is_empty());
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let policy = ExplorePolicyV1 { max_chords: 99, ..Default::default() };
        assert!(matches!(Explorer::new(policy), Err(ExploreError::Policy(_))));
    }

    #[test]
    fn test_explorer_exposes_graph() {
        let policy = ExplorePolicyV1 {
            frontier_expansion: NeighborKind::Special,
            ..ExplorePolicyV1::minimal()
        };
        let mut explorer = Explorer::new(policy).unwrap();
        assert!(explorer.root().is_none());
        explorer.run().unwrap();

        let root = explorer.root().unwrap();
        let node = explorer.graph().get(root).unwrap();
        assert!(node.code.is_empty());
        assert!(node.prune_ified);
        assert_eq!(node.neighbors.len(), 6);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let policy = ExplorePolicyV1 {
            depth: 2,
            frontier_expansion: NeighborKind::Complete,
            ..Default::default()
        };
        let a = explore(&policy).unwrap();
        let b = explore(&policy).unwrap();
        assert_eq!(a, b);
    }
}
