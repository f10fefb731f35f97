//! Results of the prune test and of a whole exploration run.

use serde::{Deserialize, Serialize};

use super::code::Code;
use super::element::ElementModel;
use super::node::NodeId;

/// Result of running the prune fixed point.
///
/// A contradiction is a finding about the explored neighborhood, not a
/// failure of the program, so it is a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PruneOutcome {
    /// Every prune-ified node kept at least one candidate projection.
    Consistent {
        /// Plausibility checks performed.
        checks: u64,
        /// Candidates removed in total.
        removed: u64,
    },
    /// Some node lost all of its candidate projections.
    Contradiction {
        /// The node whose candidate set became empty.
        node: NodeId,
        /// Its code.
        code: Code,
        /// Candidates removed in total, including the last ones from `node`.
        removed: u64,
        /// Plausibility checks performed.
        checks: u64,
    },
}

impl PruneOutcome {
    /// True if no contradiction was found.
    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent { .. })
    }

    /// Plausibility checks performed.
    pub fn checks(&self) -> u64 {
        match self {
            Self::Consistent { checks, .. } | Self::Contradiction { checks, .. } => *checks,
        }
    }

    /// Candidates removed.
    pub fn removed(&self) -> u64 {
        match self {
            Self::Consistent { removed, .. } | Self::Contradiction { removed, .. } => *removed,
        }
    }

    /// Code of the contradicting node, if any.
    pub fn contradiction_code(&self) -> Option<&Code> {
        match self {
            Self::Contradiction { code, .. } => Some(code),
            Self::Consistent { .. } => None,
        }
    }
}

/// Size of the explored graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Nodes in the arena.
    pub nodes: usize,
    /// Classical nodes.
    pub planar: usize,
    /// Undirected neighbor edges.
    pub edges: usize,
    /// Nodes with an assigned candidate set.
    pub s_ified: usize,
    /// Nodes in the fixed point.
    pub prune_ified: usize,
    /// Largest chord count seen.
    pub max_chords_seen: usize,
}

/// A pair of classical diagrams that are further apart classically than
/// virtually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    /// Source diagram.
    pub from: Code,
    /// Target diagram.
    pub to: Code,
    /// Moves needed through any indexed diagram.
    pub virtual_distance: u32,
    /// Moves needed through classical indexed diagrams only.
    pub classical_distance: u32,
}

/// Output of the distance audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Nodes indexed for the audit.
    pub indexed: usize,
    /// S-ified nodes left out because the index was full.
    pub not_indexed: usize,
    /// Classical pairs compared.
    pub pairs_checked: u64,
    /// Pairs that violate the distance bound.
    pub findings: Vec<AuditFinding>,
}

/// Everything an exploration run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreReport {
    /// Policy that produced the run.
    pub policy_id: String,
    /// Hash of the policy parameters.
    pub params_hash: String,
    /// Element model used.
    pub model: ElementModel,
    /// Prune result.
    pub outcome: PruneOutcome,
    /// Graph size at the end of the run.
    pub stats: GraphStats,
    /// Distance audit, when enabled.
    pub audit: Option<AuditReport>,
}

impl ExploreReport {
    /// True if the prune test found no contradiction.
    pub fn is_consistent(&self) -> bool {
        self.outcome.is_consistent()
    }
}
