//! Subdiagrams: the codes obtained by keeping a subset of the chords.
//!
//! Chord subsets are bitmasks. The table for `k` chords is built by doubling,
//! so the subsets of the first `i` chords are always a prefix of the table:
//!
//! ```text
//! subsets[0] = { {} }
//! subsets[i] = subsets[i-1] ∪ { s ∪ {i-1} : s in subsets[i-1] }
//! ```

use std::collections::BTreeSet;
use tracing::debug;

use crate::types::Code;

/// Largest chord count a subset table can be built for.
pub const MAX_TABLE_CHORDS: usize = 24;

/// Error type for capacity-limited operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    /// The code has more chords than the table covers.
    #[error("Code has {chords} chords, capacity is {max_chords}")]
    TooManyChords {
        /// Chords in the code.
        chords: usize,
        /// Table capacity.
        max_chords: usize,
    },
    /// The requested capacity is too large to tabulate.
    #[error("Subset table for {requested} chords exceeds the limit of {limit}")]
    TableTooLarge {
        /// Requested capacity.
        requested: usize,
        /// Hard limit.
        limit: usize,
    },
}

/// Precomputed chord subsets up to a fixed chord count.
#[derive(Debug, Clone)]
pub struct SubsetTable {
    max_chords: usize,
    masks: Vec<u32>,
}

impl SubsetTable {
    /// Build the table for codes with at most `max_chords` chords.
    pub fn new(max_chords: usize) -> Result<Self, CapacityError> {
        if max_chords > MAX_TABLE_CHORDS {
            return Err(CapacityError::TableTooLarge {
                requested: max_chords,
                limit: MAX_TABLE_CHORDS,
            });
        }

        let mut masks = Vec::with_capacity(1 << max_chords);
        masks.push(0u32);
        for i in 0..max_chords {
            let half = masks.len();
            for j in 0..half {
                masks.push(masks[j] | (1 << i));
            }
        }

        Ok(Self { max_chords, masks })
    }

    /// Capacity of the table.
    pub fn max_chords(&self) -> usize {
        self.max_chords
    }

    /// All subsets of the first `k` chords.
    pub fn subsets(&self, k: usize) -> Result<&[u32], CapacityError> {
        if k > self.max_chords {
            return Err(CapacityError::TooManyChords { chords: k, max_chords: self.max_chords });
        }
        Ok(&self.masks[..1 << k])
    }

    /// Every distinct subdiagram of `code`, canonicalized.
    ///
    /// Includes the empty code and `code` itself.
    pub fn subdiagrams(&self, code: &Code) -> Result<BTreeSet<Code>, CapacityError> {
        let subsets = self.subsets(code.chord_count())?;

        let mut dense = code.clone();
        dense.renumber();

        let mut found = BTreeSet::new();
        for &mask in subsets {
            let kept: Vec<_> = dense
                .elements()
                .iter()
                .filter(|e| mask & (1 << e.id) != 0)
                .copied()
                .collect();
            found.insert(Code::new(kept).canonicalize());
        }

        debug!(
            code = %code,
            subsets = subsets.len(),
            distinct = found.len(),
            "Generated subdiagrams"
        );
        Ok(found)
    }
}

/// Every distinct subdiagram of `code`, failing above `max_chords`.
pub fn subdiagrams(code: &Code, max_chords: usize) -> Result<BTreeSet<Code>, CapacityError> {
    SubsetTable::new(max_chords)?.subdiagrams(code)
}
