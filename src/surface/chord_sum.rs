//! Planarity by signed chord sums.
//!
//! An alternative to face tracing that never builds a ribbon graph. Each
//! element is encoded as the signed symbol `(id + 1) * sign`, negated for
//! under-visits when roles are present. For chord `i`, `S_i` is the set of
//! symbols strictly between the positive occurrence of `i` and the next
//! occurrence of `±i` (read cyclically). The code is classical iff
//!
//! 1. every `S_i` has signed count zero, and
//! 2. for every pair `(i, j)`, `(S_i ∪ {+i, -i}) ∩ (-S_j)` has signed count zero.
//!
//! Cubic in the number of chords.

use std::collections::BTreeSet;

use super::SurfaceError;
use crate::types::{Code, ElementModel};

fn signed_count<'a, I: IntoIterator<Item = &'a i64>>(symbols: I) -> i64 {
    symbols.into_iter().map(|s| if *s > 0 { 1 } else { -1 }).sum()
}

/// Whether `code` is classical according to the chord-sum criterion.
pub fn chord_sum_planar(code: &Code, model: ElementModel) -> Result<bool, SurfaceError> {
    let mut dense = code.clone();
    dense.renumber();

    let symbols: Vec<i64> = dense
        .elements()
        .iter()
        .map(|e| {
            let symbol = (e.id as i64 + 1) * e.sign_value() as i64;
            if model.has_roles() && !e.is_over() {
                -symbol
            } else {
                symbol
            }
        })
        .collect();

    let n = symbols.len();
    let chords = dense.chord_count();
    let mut between: Vec<BTreeSet<i64>> = Vec::with_capacity(chords);

    for i in 0..chords {
        let label = i as i64 + 1;
        let anchor = symbols
            .iter()
            .position(|s| *s == label)
            .ok_or_else(|| SurfaceError::UnanchoredChord {
                code: code.to_string(),
                chord: i as u32,
            })?;

        let mut set = BTreeSet::new();
        let mut idx = (anchor + 1) % n;
        while symbols[idx].abs() != label {
            set.insert(symbols[idx]);
            idx = (idx + 1) % n;
        }
        between.push(set);
    }

    if between.iter().any(|s| signed_count(s) != 0) {
        return Ok(false);
    }

    for i in 0..chords {
        let mut with_ends = between[i].clone();
        with_ends.insert(i as i64 + 1);
        with_ends.insert(-(i as i64 + 1));

        for other in &between {
            let inverted: BTreeSet<i64> = other.iter().map(|s| -s).collect();
            if signed_count(with_ends.intersection(&inverted)) != 0 {
                return Ok(false);
            }
        }
    }

    Ok(true)
}
