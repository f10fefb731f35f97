//! Genus and planarity of diagrams.
//!
//! A diagram is classical (planar) iff the surface it naturally lives on has
//! genus zero. Two oracles are provided:
//!
//! | Oracle | Needs roles | Output | Cost |
//! |--------|-------------|--------|------|
//! | [`FaceTracing`] | yes | genus | O(n log n) |
//! | [`ChordSums`] | no | planar / not planar | O(n³) |
//!
//! The element model selects the oracle once per run: oriented codes use face
//! tracing, flat codes use chord sums.

pub mod chord_sum;
pub mod genus;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Code, ElementModel};

pub use chord_sum::chord_sum_planar;
pub use genus::genus;

/// Error type for surface computations.
///
/// These indicate a code that violates the pairing invariants the oracles rely
/// on; they are never expected for codes produced by the move enumerator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Face tracing could not continue.
    #[error("Face tracing of {code} has no free edge at chord {chord}")]
    MissingEdge {
        /// The code being traced.
        code: String,
        /// Chord where the walk got stuck.
        chord: u32,
    },
    /// Face count inconsistent with an orientable surface.
    #[error("Face tracing of {code} found {faces} faces for {chords} chords")]
    EulerCharacteristic {
        /// The code being traced.
        code: String,
        /// Faces found.
        faces: usize,
        /// Chords in the code.
        chords: usize,
    },
    /// A chord has no positive occurrence to anchor its chord set.
    #[error("Chord {chord} of {code} has no positive occurrence")]
    UnanchoredChord {
        /// The code being tested.
        code: String,
        /// The offending chord.
        chord: u32,
    },
}

/// Genus and planarity of one diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    /// Genus, when the oracle computes one.
    pub genus: Option<u32>,
    /// True for classical diagrams.
    pub planar: bool,
}

impl Surface {
    /// Surface with a known genus.
    pub fn from_genus(genus: u32) -> Self {
        Self { genus: Some(genus), planar: genus == 0 }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.genus {
            Some(g) => write!(f, "genus {}", g),
            None if self.planar => write!(f, "planar"),
            None => write!(f, "virtual"),
        }
    }
}

/// Strategy for deciding planarity.
pub trait PlanarityOracle: fmt::Debug + Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Compute the surface of a code.
    fn surface(&self, code: &Code) -> Result<Surface, SurfaceError>;
}

/// Ribbon-graph face tracing (oriented codes).
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceTracing;

impl PlanarityOracle for FaceTracing {
    fn name(&self) -> &'static str {
        "face_tracing"
    }

    fn surface(&self, code: &Code) -> Result<Surface, SurfaceError> {
        genus(code).map(Surface::from_genus)
    }
}

/// Chord-sum criterion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordSums {
    /// Element model used to encode symbols.
    pub model: ElementModel,
}

impl PlanarityOracle for ChordSums {
    fn name(&self) -> &'static str {
        "chord_sums"
    }

    fn surface(&self, code: &Code) -> Result<Surface, SurfaceError> {
        let planar = chord_sum_planar(code, self.model)?;
        Ok(Surface { genus: None, planar })
    }
}

/// The oracle used for a given element model.
pub fn oracle_for(model: ElementModel) -> Box<dyn PlanarityOracle> {
    match model {
        ElementModel::Oriented => Box::new(FaceTracing),
        ElementModel::Flat => Box::new(ChordSums { model }),
    }
}

/// Surface of `code` under `model`.
pub fn classify(code: &Code, model: ElementModel) -> Result<Surface, SurfaceError> {
    oracle_for(model).surface(code)
}

/// True if `code` is classical under `model`.
pub fn is_planar(code: &Code, model: ElementModel) -> Result<bool, SurfaceError> {
    classify(code, model).map(|s| s.planar)
}
