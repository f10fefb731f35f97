//! Core types for the gauss kernel.

pub mod element;
pub mod code;
pub mod node;
pub mod outcome;

pub use element::{Element, ElementModel, Role, Sign, UnknownName};
pub use code::{Code, CodeError, ParseError, EMPTY_CODE_TEXT};
pub use node::{DiagramNode, NodeId};
pub use outcome::{AuditFinding, AuditReport, ExploreReport, GraphStats, PruneOutcome};
