//! Diagram storage.

pub mod memory;

pub use memory::{DiagramStore, StoreError};
