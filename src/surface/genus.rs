//! Ribbon-graph genus by face tracing.
//!
//! Every element becomes a vertex labelled by its chord id: under-visits keep
//! their crossing sign, over-visits are neutral. Each cyclically adjacent pair
//! of positions contributes a forward (`+`) and a reverse (`-`) directed edge.
//! Faces are traced by following the turn rule until the walk returns to its
//! first edge; each closed walk consumes its edges and counts as one face.
//!
//! ```text
//! genus = (2 - (faces - chords)) / 2
//! ```
//!
//! ## Turn Rule
//!
//! | Current end vertex | Next edge starting on the same chord |
//! |--------------------|--------------------------------------|
//! | neutral            | `sign(next.start) == current.sign * next.sign` |
//! | positive           | neutral start, `next.sign == -current.sign` |
//! | negative           | neutral start, `next.sign == current.sign` |
//!
//! Exactly one candidate satisfies the rule on a well-formed code; the first
//! one in insertion order is taken.

use std::collections::BTreeSet;

use super::SurfaceError;
use crate::types::{Code, Element};

/// Vertex label: chord id and sign, `0` for over-visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Vertex {
    chord: u32,
    sign: i8,
}

impl Vertex {
    fn from_element(e: &Element) -> Self {
        let sign = if e.is_over() { 0 } else { e.sign_value() as i8 };
        Self { chord: e.id, sign }
    }

    fn is_neutral(&self) -> bool {
        self.sign == 0
    }
}

/// Directed edge `a -> b`; `sign` is `+1` along the code and `-1` against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct HalfEdge {
    a: Vertex,
    b: Vertex,
    sign: i8,
}

/// Pick the edge that continues a face after `current`.
fn turn(starting: &[Vec<HalfEdge>], current: &HalfEdge) -> Option<HalfEdge> {
    let candidates = starting.get(current.b.chord as usize)?;

    if current.b.is_neutral() {
        let factor = current.sign;
        candidates.iter().find(|e| e.a.sign == factor * e.sign).copied()
    } else {
        let factor: i8 = if current.b.sign > 0 { -1 } else { 1 };
        candidates
            .iter()
            .find(|e| e.a.is_neutral() && e.sign == factor * current.sign)
            .copied()
    }
}

/// Genus of the ribbon graph of `code`.
///
/// Returns `0` for the empty code. A code whose chords do not each have one
/// over- and one under-visit cannot be traced and yields
/// [`SurfaceError::MissingEdge`].
pub fn genus(code: &Code) -> Result<u32, SurfaceError> {
    let n = code.len();
    if n == 0 {
        return Ok(0);
    }

    let vertices: Vec<Vertex> = code.elements().iter().map(Vertex::from_element).collect();
    let id_space = code.max_id().map(|m| m as usize + 1).unwrap_or(0);

    let mut free: BTreeSet<HalfEdge> = BTreeSet::new();
    let mut starting: Vec<Vec<HalfEdge>> = vec![Vec::new(); id_space];

    for i in 0..n {
        let first = vertices[i];
        let second = vertices[(i + 1) % n];

        let forward = HalfEdge { a: first, b: second, sign: 1 };
        free.insert(forward);
        starting[first.chord as usize].push(forward);

        let reverse = HalfEdge { a: second, b: first, sign: -1 };
        free.insert(reverse);
        starting[second.chord as usize].push(reverse);
    }

    let mut faces: i64 = 0;
    while let Some(&start) = free.iter().next() {
        let mut end = start;
        loop {
            let at = end.b.chord;
            end = turn(&starting, &end).ok_or_else(|| SurfaceError::MissingEdge {
                code: code.to_string(),
                chord: at,
            })?;
            if !free.remove(&end) {
                return Err(SurfaceError::MissingEdge {
                    code: code.to_string(),
                    chord: end.a.chord,
                });
            }
            if end == start {
                break;
            }
        }
        faces += 1;
    }

    let chords = code.chord_count() as i64;
    let numerator = 2 - (faces - chords);
    if numerator < 0 || numerator % 2 != 0 {
        return Err(SurfaceError::EulerCharacteristic {
            code: code.to_string(),
            faces: faces as usize,
            chords: chords as usize,
        });
    }

    Ok((numerator / 2) as u32)
}
