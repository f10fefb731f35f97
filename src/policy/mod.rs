//! Exploration policy definitions.

pub mod v1;

pub use v1::{ExplorePolicyV1, PolicyError, MAX_DEPTH};
