//! Reidemeister move enumeration.
//!
//! Every move is described by a [`Move`] value. [`MoveKind`] lists the five
//! families ("do" removes crossings, "undo" adds them) and [`NeighborKind`]
//! groups them into the neighbor sets used by exploration:
//!
//! | NeighborKind | Families | Adds chords |
//! |--------------|----------|-------------|
//! | `Special` | R1 do, R2 do, R3 | no |
//! | `Rest` | R1 undo, R2 undo | yes |
//! | `Complete` | all five | yes |
//!
//! Inputs are expected to be canonical; enumerated neighbors are always
//! canonical (flattened under [`ElementModel::Flat`]).

pub mod r1;
pub mod r2;
pub mod r3;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Code, ElementModel, UnknownName};

pub use r1::{r1_do_sites, r1_undo_sites};
pub use r2::{r2_do_sites, r2_undo_sites};
pub use r3::{can_r3, r3_sites};

/// Id for a chord inserted into `code`.
pub(crate) fn fresh_id(code: &Code) -> u32 {
    code.max_id().map(|m| m + 1).unwrap_or(0)
}

/// One application of a Reidemeister move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "move", rename_all = "snake_case")]
pub enum Move {
    /// Remove the kink at `x, x+1`.
    R1Do {
        /// First position of the kink.
        x: usize,
    },
    /// Insert a kink before `x`.
    R1Undo {
        /// Insertion position.
        x: usize,
        /// Sign of the new crossing.
        positive: bool,
        /// First visit passes over (ignored for flat codes).
        first_over: bool,
    },
    /// Remove the overlap at `x, x+1` and `y, y+1`.
    R2Do {
        /// First pair.
        x: usize,
        /// Second pair.
        y: usize,
    },
    /// Insert an overlap before `y` and `x`.
    R2Undo {
        /// Insertion position of the first pair.
        x: usize,
        /// Insertion position of the second pair.
        y: usize,
        /// The first new chord is the positive one.
        first_positive: bool,
        /// The first pair passes over (ignored for flat codes).
        first_over: bool,
        /// Second pair visits the chords in reverse order.
        flip: bool,
    },
    /// Swap the pairs at `x`, `y` and `z`.
    R3 {
        /// First pair.
        x: usize,
        /// Second pair.
        y: usize,
        /// Third pair.
        z: usize,
    },
}

impl Move {
    /// Family of this move.
    pub fn kind(&self) -> MoveKind {
        match self {
            Self::R1Do { .. } => MoveKind::R1Do,
            Self::R1Undo { .. } => MoveKind::R1Undo,
            Self::R2Do { .. } => MoveKind::R2Do,
            Self::R2Undo { .. } => MoveKind::R2Undo,
            Self::R3 { .. } => MoveKind::R3,
        }
    }

    /// Apply to `code` without canonicalizing.
    ///
    /// Legality is not rechecked; use the enumerators to obtain legal moves.
    pub fn apply(&self, code: &Code, model: ElementModel) -> Code {
        match *self {
            Self::R1Do { x } => r1::r1_do_apply(code, x),
            Self::R1Undo {
                x,
                positive,
                first_over,
            } => r1::r1_undo_apply(code, model, x, positive, first_over),
            Self::R2Do { x, y } => r2::r2_do_apply(code, x, y),
            Self::R2Undo { x, y, first_positive, first_over, flip } => {
                r2::r2_undo_apply(code, model, (x, y), first_positive, first_over, flip)
            }
            Self::R3 { x, y, z } => r3::r3_apply(code, x, y, z),
        }
    }

    /// Apply and canonicalize under `model`.
    pub fn apply_canonical(&self, code: &Code, model: ElementModel) -> Code {
        self.apply(code, model).normalized(model)
    }
}

/// A family of moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Kink removal.
    R1Do,
    /// Kink insertion.
    R1Undo,
    /// Overlap removal.
    R2Do,
    /// Overlap insertion.
    R2Undo,
    /// Triangle move.
    R3,
}

impl MoveKind {
    /// All families, in enumeration order.
    pub const ALL: [MoveKind; 5] = [Self::R1Do, Self::R1Undo, Self::R2Do, Self::R2Undo, Self::R3];

    /// Legal moves of this family on `code`.
    pub fn sites(&self, code: &Code, model: ElementModel) -> Vec<Move> {
        match self {
            Self::R1Do => r1_do_sites(code),
            Self::R1Undo => r1_undo_sites(code, model),
            Self::R2Do => r2_do_sites(code, model),
            Self::R2Undo => r2_undo_sites(code, model),
            Self::R3 => r3_sites(code, model),
        }
    }

    /// Canonical neighbors of `code` under this family, with repeats.
    pub fn enumerate(&self, code: &Code, model: ElementModel) -> Vec<Code> {
        self.sites(code, model)
            .iter()
            .map(|m| m.apply_canonical(code, model))
            .collect()
    }

    /// True for families that introduce new chords.
    pub fn adds_chords(&self) -> bool {
        matches!(self, Self::R1Undo | Self::R2Undo)
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R1Do => "r1_do",
            Self::R1Undo => "r1_undo",
            Self::R2Do => "r2_do",
            Self::R2Undo => "r2_undo",
            Self::R3 => "r3",
        };
        write!(f, "{}", name)
    }
}

/// Which neighbor set to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborKind {
    /// Moves that never add chords.
    Special,
    /// Every move.
    Complete,
    /// Moves that add chords.
    Rest,
}

impl FromStr for NeighborKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "special" => Ok(Self::Special),
            "complete" => Ok(Self::Complete),
            "rest" => Ok(Self::Rest),
            _ => Err(UnknownName { kind: "neighbor kind", name: s.to_string() }),
        }
    }
}

impl NeighborKind {
    /// Move families in this set, in enumeration order.
    pub fn kinds(&self) -> &'static [MoveKind] {
        match self {
            Self::Special => &[MoveKind::R1Do, MoveKind::R2Do, MoveKind::R3],
            Self::Complete => &MoveKind::ALL,
            Self::Rest => &[MoveKind::R1Undo, MoveKind::R2Undo],
        }
    }

    /// Canonical neighbors of `code`, with repeats.
    pub fn enumerate(&self, code: &Code, model: ElementModel) -> Vec<Code> {
        self.kinds()
            .iter()
            .flat_map(|kind| kind.enumerate(code, model))
            .collect()
    }
}

impl fmt::Display for NeighborKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Special => write!(f, "special"),
            Self::Complete => write!(f, "complete"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// Every neighbor of `code`.
pub fn enumerate_complete_neighbors(code: &Code, model: ElementModel) -> Vec<Code> {
    NeighborKind::Complete.enumerate(code, model)
}

/// Neighbors that do not add chords.
///
/// If two codes are special neighbors of each other, enumerating either one
/// finds the other, so exploring with this set never grows the id space.
pub fn enumerate_special_neighbors(code: &Code, model: ElementModel) -> Vec<Code> {
    NeighborKind::Special.enumerate(code, model)
}

/// Neighbors that add chords.
pub fn enumerate_rest_neighbors(code: &Code, model: ElementModel) -> Vec<Code> {
    NeighborKind::Rest.enumerate(code, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::genus;
    use std::collections::BTreeSet;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    fn strings(codes: &[Code]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_complete_neighbors_of_empty() {
        let expected: BTreeSet<String> = [
            "U+0O+0",
            "U-0O-0",
            "U-0O+1O-0U+1",
            "U-0O-0O+1U+1",
            "U-0U+1O+1O-0",
            "U-0U+1O-0O+1",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let found = enumerate_complete_neighbors(&Code::empty(), ElementModel::Oriented);
        assert_eq!(strings(&found), expected);
    }

    #[test]
    fn test_complete_neighbors_of_empty_flat() {
        let expected: BTreeSet<String> = ["U-0U+0", "U-0U+0U-1U+1", "U-0U+1U-1U+0", "U-0U-1U+0U+1"]
            .into_iter()
            .map(String::from)
            .collect();
        let found = enumerate_complete_neighbors(&Code::empty(), ElementModel::Flat);
        assert_eq!(strings(&found), expected);
    }

    #[test]
    fn test_complete_is_special_plus_rest() {
        let c = code("U-0O-0U-1O-1O+2U+2");
        let model = ElementModel::Oriented;
        let complete = enumerate_complete_neighbors(&c, model);
        let special = enumerate_special_neighbors(&c, model);
        let rest = enumerate_rest_neighbors(&c, model);
        assert_eq!(complete.len(), special.len() + rest.len());
        assert_eq!(
            strings(&complete),
            strings(&special).union(&strings(&rest)).cloned().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_special_neighbors_do_not_grow() {
        let c = code("U-0O-0U-1O-1O+2U+2");
        for n in enumerate_special_neighbors(&c, ElementModel::Oriented) {
            assert!(n.len() <= c.len());
        }
    }

    #[test]
    fn test_undo_then_do_is_identity() {
        let c = code("U-0O-0O+1U+1");
        let model = ElementModel::Oriented;

        for m in r1_undo_sites(&c, model) {
            let Move::R1Undo { x, .. } = m else { unreachable!() };
            let raw = m.apply(&c, model);
            assert_eq!(Move::R1Do { x }.apply_canonical(&raw, model), c);
        }

        for m in r2_undo_sites(&c, model) {
            let Move::R2Undo { x, y, .. } = m else { unreachable!() };
            let raw = m.apply(&c, model);
            assert_eq!(Move::R2Do { x, y: y + 2 }.apply_canonical(&raw, model), c);
        }
    }

    #[test]
    fn test_enumerated_neighbors_are_canonical() {
        let c = code("U-0U+1O-0O+1");
        for n in enumerate_complete_neighbors(&c, ElementModel::Oriented) {
            assert!(n.is_canonical(), "{}", n);
        }
    }

    #[test]
    fn test_r1_and_r3_preserve_genus() {
        let model = ElementModel::Oriented;
        for s in ["U-0O-0O+1U+1", "U-0U+1O-0O+1", "U-0O-0U-1O-1O+2U+2", "U-0U-1U+2O-0O+2O-1"] {
            let c = code(s);
            let g = genus(&c).unwrap();
            for kind in [MoveKind::R1Do, MoveKind::R1Undo, MoveKind::R3] {
                for n in kind.enumerate(&c, model) {
                    assert_eq!(genus(&n).unwrap(), g, "{} -> {} by {}", s, n, kind);
                }
            }
        }
    }

    #[test]
    fn test_neighbor_kind_names() {
        assert_eq!("Complete".parse::<NeighborKind>(), Ok(NeighborKind::Complete));
        assert!("nope".parse::<NeighborKind>().is_err());
        assert!("".parse::<NeighborKind>().is_err());
        assert_eq!(NeighborKind::Rest.to_string(), "rest");
        assert_eq!(MoveKind::R2Undo.to_string(), "r2_undo");
        assert!(MoveKind::R1Undo.adds_chords() && !MoveKind::R3.adds_chords());
    }

    #[test]
    fn test_move_serializes_with_tag() {
        let json = serde_json::to_value(Move::R3 { x: 0, y: 2, z: 4 }).unwrap();
        assert_eq!(json["move"], "r3");
        assert_eq!(json["z"], 4);
    }
}
