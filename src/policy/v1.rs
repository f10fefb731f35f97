//! ExplorePolicy v1: bounded breadth-first exploration from the empty diagram.
//!
//! ## Environment
//!
//! | Variable | Field | Values |
//! |----------|-------|--------|
//! | `GAUSS_DEPTH` | `depth` | integer |
//! | `GAUSS_MAX_CHORDS` | `max_chords` | integer |
//! | `GAUSS_MODEL` | `model` | `oriented`, `flat` |
//! | `GAUSS_SEED` | `seed_expansion` | `special`, `complete`, `rest` |
//! | `GAUSS_FRONTIER` | `frontier_expansion` | `special`, `complete`, `rest` |
//! | `GAUSS_EXHAUSTIVE` | `exhaustive_prune` | boolean |
//! | `GAUSS_R3_UNIFY` | `r3_unify` | boolean |
//! | `GAUSS_R3_UNIFY_LIMIT` | `r3_unify_limit` | integer |
//! | `GAUSS_AUDIT` | `audit` | boolean |
//! | `GAUSS_AUDIT_LIMIT` | `audit_limit` | integer |
//!
//! Booleans accept `1/0`, `true/false`, `yes/no`, `on/off`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::audit::DEFAULT_AUDIT_LIMIT;
use crate::canonical::canonical_hash_hex;
use crate::moves::NeighborKind;
use crate::subdiagram::MAX_TABLE_CHORDS;
use crate::types::{ElementModel, UnknownName};
use crate::{DEFAULT_MAX_CHORDS, DEFAULT_POLICY_VERSION};

/// Deepest exploration a policy may request.
pub const MAX_DEPTH: u32 = 8;

/// Error type for policy construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// An environment value could not be parsed.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Value as given.
        value: String,
    },
    /// A parameter is outside its allowed range.
    #[error("{field} = {value} is out of range (max {max})")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Value given.
        value: u64,
        /// Largest allowed value.
        max: u64,
    },
    /// A limit that must be positive is zero.
    #[error("{field} must be positive")]
    ZeroLimit {
        /// Field name.
        field: &'static str,
    },
    /// Missing version string.
    #[error("Policy version is empty")]
    EmptyVersion,
}

/// Exploration policy version 1.
///
/// ## Parameters
///
/// - `depth`: levels expanded beyond the seed
/// - `max_chords`: diagrams above this size are never expanded
/// - `model`: element model for every code
/// - `seed_expansion`: neighbor set of the empty diagram
/// - `frontier_expansion`: neighbor set of every later frontier node
/// - `exhaustive_prune`: prune-ifying a node s-ifies all of its neighbors
/// - `r3_unify`, `r3_unify_limit`: widen `s` to the R3 neighborhood
/// - `audit`, `audit_limit`: run the distance audit before pruning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorePolicyV1 {
    /// Policy version identifier.
    pub version: String,
    /// Exploration depth.
    pub depth: u32,
    /// Capacity in chords.
    pub max_chords: usize,
    /// Element model.
    pub model: ElementModel,
    /// Neighbor set explored at the seed.
    pub seed_expansion: NeighborKind,
    /// Neighbor set explored at later levels.
    pub frontier_expansion: NeighborKind,
    /// S-ify every neighbor of a prune-ified node.
    pub exhaustive_prune: bool,
    /// Merge R3-neighborhood subdiagrams into `s`.
    pub r3_unify: bool,
    /// Visit limit for R3 unification.
    pub r3_unify_limit: usize,
    /// Run the distance audit.
    pub audit: bool,
    /// Nodes indexed by the audit.
    pub audit_limit: usize,
}

impl ExplorePolicyV1 {
    /// Create a policy with the given bounds and default switches.
    pub fn new(depth: u32, max_chords: usize, model: ElementModel) -> Self {
        Self { depth, max_chords, model, ..Self::default() }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version.is_empty() {
            return Err(PolicyError::EmptyVersion);
        }
        if self.depth > MAX_DEPTH {
            return Err(PolicyError::OutOfRange {
                field: "depth",
                value: self.depth as u64,
                max: MAX_DEPTH as u64,
            });
        }
        if self.max_chords > MAX_TABLE_CHORDS {
            return Err(PolicyError::OutOfRange {
                field: "max_chords",
                value: self.max_chords as u64,
                max: MAX_TABLE_CHORDS as u64,
            });
        }
        if self.r3_unify && self.r3_unify_limit == 0 {
            return Err(PolicyError::ZeroLimit { field: "r3_unify_limit" });
        }
        if self.audit && self.audit_limit == 0 {
            return Err(PolicyError::ZeroLimit { field: "audit_limit" });
        }
        Ok(())
    }

    /// Build a policy from a key lookup, starting from the defaults.
    ///
    /// Unset keys keep their default; set keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PolicyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();

        if let Some(v) = lookup("GAUSS_DEPTH") {
            policy.depth = parse_number("GAUSS_DEPTH", &v)?;
        }
        if let Some(v) = lookup("GAUSS_MAX_CHORDS") {
            policy.max_chords = parse_number("GAUSS_MAX_CHORDS", &v)?;
        }
        if let Some(v) = lookup("GAUSS_MODEL") {
            policy.model = parse_name("GAUSS_MODEL", &v)?;
        }
        if let Some(v) = lookup("GAUSS_SEED") {
            policy.seed_expansion = parse_name("GAUSS_SEED", &v)?;
        }
        if let Some(v) = lookup("GAUSS_FRONTIER") {
            policy.frontier_expansion = parse_name("GAUSS_FRONTIER", &v)?;
        }
        if let Some(v) = lookup("GAUSS_EXHAUSTIVE") {
            policy.exhaustive_prune = parse_flag("GAUSS_EXHAUSTIVE", &v)?;
        }
        if let Some(v) = lookup("GAUSS_R3_UNIFY") {
            policy.r3_unify = parse_flag("GAUSS_R3_UNIFY", &v)?;
        }
        if let Some(v) = lookup("GAUSS_R3_UNIFY_LIMIT") {
            policy.r3_unify_limit = parse_number("GAUSS_R3_UNIFY_LIMIT", &v)?;
        }
        if let Some(v) = lookup("GAUSS_AUDIT") {
            policy.audit = parse_flag("GAUSS_AUDIT", &v)?;
        }
        if let Some(v) = lookup("GAUSS_AUDIT_LIMIT") {
            policy.audit_limit = parse_number("GAUSS_AUDIT_LIMIT", &v)?;
        }

        policy.validate()?;
        Ok(policy)
    }

    /// Build a policy from the process environment.
    pub fn from_env() -> Result<Self, PolicyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a minimal policy for testing.
    pub fn minimal() -> Self {
        Self { depth: 1, max_chords: 4, ..Self::default() }
    }
}

impl Default for ExplorePolicyV1 {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            depth: 3,
            max_chords: DEFAULT_MAX_CHORDS,
            model: ElementModel::Oriented,
            seed_expansion: NeighborKind::Complete,
            frontier_expansion: NeighborKind::Special,
            exhaustive_prune: true,
            r3_unify: false,
            r3_unify_limit: 256,
            audit: false,
            audit_limit: DEFAULT_AUDIT_LIMIT,
        }
    }
}

fn invalid(key: &str, value: &str) -> PolicyError {
    PolicyError::InvalidValue { key: key.to_string(), value: value.to_string() }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, PolicyError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_name<T: FromStr<Err = UnknownName>>(key: &str, value: &str) -> Result<T, PolicyError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, PolicyError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let policy = ExplorePolicyV1::default();
        assert_eq!(policy.policy_id(), "explore_policy_v1");
        assert_eq!(policy.depth, 3);
        assert_eq!(policy.max_chords, 12);
        assert_eq!(policy.seed_expansion, NeighborKind::Complete);
        assert_eq!(policy.frontier_expansion, NeighborKind::Special);
        assert!(policy.exhaustive_prune && !policy.r3_unify && !policy.audit);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_params_hash_determinism() {
        let a = ExplorePolicyV1::default();
        let b = ExplorePolicyV1::default();
        assert_eq!(a.params_hash(), b.params_hash());
    }

    #[test]
    fn test_policy_params_hash_changes() {
        let base = ExplorePolicyV1::default();
        let variants = [
            ExplorePolicyV1 { depth: 2, ..base.clone() },
            ExplorePolicyV1 { max_chords: 11, ..base.clone() },
            ExplorePolicyV1 { model: ElementModel::Flat, ..base.clone() },
            ExplorePolicyV1 { seed_expansion: NeighborKind::Special, ..base.clone() },
            ExplorePolicyV1 { frontier_expansion: NeighborKind::Complete, ..base.clone() },
            ExplorePolicyV1 { exhaustive_prune: false, ..base.clone() },
            ExplorePolicyV1 { r3_unify: true, ..base.clone() },
            ExplorePolicyV1 { r3_unify_limit: 1, ..base.clone() },
            ExplorePolicyV1 { audit: true, ..base.clone() },
            ExplorePolicyV1 { audit_limit: 1, ..base.clone() },
            ExplorePolicyV1 { version: "explore_policy_v2".to_string(), ..base.clone() },
        ];
        for variant in &variants {
            assert_ne!(variant.params_hash(), base.params_hash(), "{:?}", variant);
        }
    }

    #[test]
    fn test_from_lookup() {
        let policy = ExplorePolicyV1::from_lookup(lookup(&[
            ("GAUSS_DEPTH", "2"),
            ("GAUSS_MAX_CHORDS", " 10 "),
            ("GAUSS_MODEL", "flat"),
            ("GAUSS_SEED", "Special"),
            ("GAUSS_FRONTIER", "complete"),
            ("GAUSS_EXHAUSTIVE", "off"),
            ("GAUSS_R3_UNIFY", "yes"),
            ("GAUSS_R3_UNIFY_LIMIT", "64"),
            ("GAUSS_AUDIT", "1"),
            ("GAUSS_AUDIT_LIMIT", "500"),
        ]))
        .unwrap();

        assert_eq!(policy.depth, 2);
        assert_eq!(policy.max_chords, 10);
        assert_eq!(policy.model, ElementModel::Flat);
        assert_eq!(policy.seed_expansion, NeighborKind::Special);
        assert_eq!(policy.frontier_expansion, NeighborKind::Complete);
        assert!(!policy.exhaustive_prune);
        assert!(policy.r3_unify);
        assert_eq!(policy.r3_unify_limit, 64);
        assert!(policy.audit);
        assert_eq!(policy.audit_limit, 500);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        assert_eq!(ExplorePolicyV1::from_lookup(|_| None).unwrap(), ExplorePolicyV1::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert_eq!(
            ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_DEPTH", "three")])),
            Err(PolicyError::InvalidValue {
                key: "GAUSS_DEPTH".to_string(),
                value: "three".to_string()
            })
        );
        assert!(ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_MODEL", "")])).is_err());
        assert!(ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_SEED", "all")])).is_err());
        assert!(ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_AUDIT_LIMIT", "-1")])).is_err());
        assert!(ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_MODEL", "signed")])).is_err());
        assert!(ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_AUDIT", "maybe")])).is_err());
        assert!(matches!(
            ExplorePolicyV1::from_lookup(lookup(&[("GAUSS_MAX_CHORDS", "30")])),
            Err(PolicyError::OutOfRange { field: "max_chords", .. })
        ));
    }

    #[test]
    fn test_from_lookup_zero_limit_is_validated() {
        let result = ExplorePolicyV1::from_lookup(lookup(&[
            ("GAUSS_AUDIT", "true"),
            ("GAUSS_AUDIT_LIMIT", "0"),
        ]));
        assert_eq!(result, Err(PolicyError::ZeroLimit { field: "audit_limit" }));
    }

    #[test]
    fn test_validate_limits() {
        let policy = ExplorePolicyV1 { r3_unify: true, r3_unify_limit: 0, ..Default::default() };
        assert_eq!(policy.validate(), Err(PolicyError::ZeroLimit { field: "r3_unify_limit" }));

        let policy = ExplorePolicyV1 { depth: MAX_DEPTH + 1, ..Default::default() };
        assert!(policy.validate().is_err());

        let policy = ExplorePolicyV1 { version: String::new(), ..Default::default() };
        assert_eq!(policy.validate(), Err(PolicyError::EmptyVersion));
    }

    #[test]
    fn test_serde_round_trip() {
        let policy = ExplorePolicyV1::minimal();
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"model\":\"oriented\""));
        assert!(json.contains("\"frontier_expansion\":\"special\""));
        let back: ExplorePolicyV1 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
