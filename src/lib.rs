//! # gauss-kernel
//!
//! Canonical Gauss codes, Reidemeister move enumeration and the prune test
//! for classical projections of virtual knot diagrams.
//!
//! The kernel answers one question:
//!
//! > Can every diagram in an explored neighborhood be assigned a **classical
//! > projection** that is consistent with the moves between them?
//!
//! ## Core Contract
//!
//! 1. Every diagram is identified by a canonical Gauss code (least rotation
//!    after relabeling)
//! 2. Neighbors are enumerated by exact R1, R2 and R3 parameterizations
//! 3. Planarity comes from the genus of the diagram's ribbon graph
//! 4. The prune fixed point either settles or names a contradicting diagram
//!
//! ## Architecture
//!
//! ```text
//! ExplorePolicy → Explorer → DiagramGraph ⇄ Moves / Surface / Subdiagrams
//!                               ↓
//!                          PruneEngine → ExploreReport
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same policy → identical report, including node counts and check counts
//! - Node ids are assigned in creation order and every traversal is in
//!   id order
//! - `params_hash` depends only on the policy parameters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod surface;
pub mod moves;
pub mod subdiagram;
pub mod store;
pub mod graph;
pub mod prune;
pub mod audit;
pub mod policy;
pub mod explorer;

// Re-exports
pub use types::{
    Code, CodeError, DiagramNode, Element, ElementModel, NodeId, ParseError, Role, Sign,
    UnknownName,
    AuditFinding, AuditReport, ExploreReport, GraphStats, PruneOutcome,
};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use surface::{classify, genus, is_planar, oracle_for, PlanarityOracle, Surface, SurfaceError};
pub use moves::{
    enumerate_complete_neighbors, enumerate_rest_neighbors, enumerate_special_neighbors,
    Move, MoveKind, NeighborKind,
};
pub use subdiagram::{subdiagrams, CapacityError, SubsetTable, MAX_TABLE_CHORDS};
pub use store::{DiagramStore, StoreError};
pub use graph::{DiagramGraph, GraphError};
pub use prune::{PruneEngine, PruneError};
pub use audit::{DistanceAudit, DEFAULT_AUDIT_LIMIT};
pub use policy::{ExplorePolicyV1, PolicyError};
pub use explorer::{explore, ExploreError, Explorer};

/// Default chord capacity for exploration.
pub const DEFAULT_MAX_CHORDS: usize = 12;

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "explore_policy_v1";
