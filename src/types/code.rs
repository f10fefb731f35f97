//! Gauss codes and their canonical form.
//!
//! A [`Code`] is a cyclic sequence of [`Element`]s in which every chord id
//! appears exactly twice. The same diagram can be written down from any
//! starting position and with any labelling of its chords, so every code that
//! is used as an identity must first be brought to canonical form.
//!
//! ## Canonical Form
//!
//! ```text
//! canonical(c) = min over k in 0..len of renumber(rotate(c, k))
//! ```
//!
//! where `renumber` relabels chords `0..k-1` in order of first appearance and
//! the minimum is taken under [`Code`]'s `Ord` (length first, then
//! element-by-element packed value). This is O(n²) in the code length.
//!
//! ## Text Format
//!
//! Tokens `<O|U><+|-><digits>` with optional whitespace between them, for
//! example `O+0U-0` or `U-0 U+1 O-0 O+1`. The empty code prints as `<empty>`
//! and both `<empty>` and the blank string parse back to it.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::element::{Element, ElementModel, Role, Sign};
use crate::canonical::canonical_hash_hex;

/// Text printed for the empty code.
pub const EMPTY_CODE_TEXT: &str = "<empty>";

/// Error type for code parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A character that cannot start a token.
    #[error("Unexpected character {found:?} at offset {offset}, expected 'O' or 'U'")]
    UnexpectedChar {
        /// Byte offset into the input.
        offset: usize,
        /// The offending character.
        found: char,
    },
    /// Role letter not followed by `+` or `-`.
    #[error("Missing sign at offset {offset}")]
    MissingSign {
        /// Byte offset where the sign was expected.
        offset: usize,
    },
    /// Sign not followed by digits.
    #[error("Missing chord id at offset {offset}")]
    MissingId {
        /// Byte offset where the digits were expected.
        offset: usize,
    },
    /// Digits that do not fit a chord id.
    #[error("Chord id {digits} at offset {offset} is out of range")]
    IdOutOfRange {
        /// Byte offset of the digits.
        offset: usize,
        /// The digits as written.
        digits: String,
    },
    /// A chord that is not visited exactly twice.
    #[error("Chord {id} appears {occurrences} time(s), expected exactly 2")]
    UnpairedChord {
        /// Chord id as written.
        id: u32,
        /// Number of visits found.
        occurrences: usize,
    },
}

/// Error type for code manipulation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    /// More distinct chord ids than the id space allows.
    #[error("Code has {distinct} distinct chord ids, bound is {bound}")]
    IdSpaceExceeded {
        /// Distinct ids in the code.
        distinct: usize,
        /// Requested bound.
        bound: usize,
    },
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"([OU])([+-])([0-9]+)").expect("token pattern is valid"))
}

/// A Gauss code.
///
/// Codes built with [`Code::new`] are taken as-is; [`Code::parse`] and every
/// move or subdiagram operation return canonical codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(Vec<Element>);

impl Code {
    /// Wrap a raw element sequence without canonicalizing it.
    pub fn new(elements: Vec<Element>) -> Self {
        Self(elements)
    }

    /// The trivial diagram.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse and canonicalize a code.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if text.trim() == EMPTY_CODE_TEXT {
            return Ok(Self::empty());
        }

        let re = token_regex();
        let mut elements = Vec::new();
        let mut offset = 0;

        while let Some(ch) = text[offset..].chars().next() {
            if ch.is_whitespace() {
                offset += ch.len_utf8();
                continue;
            }

            let caps = match re.captures_at(text, offset) {
                Some(caps) if caps.get(0).map(|m| m.start()) == Some(offset) => caps,
                _ => return Err(diagnose(text, offset)),
            };

            let whole = caps.get(0).map(|m| m.end()).unwrap_or(offset);
            let role = caps
                .get(1)
                .and_then(|m| m.as_str().chars().next())
                .and_then(Role::from_letter);
            let sign = caps
                .get(2)
                .and_then(|m| m.as_str().chars().next())
                .and_then(Sign::from_symbol);
            let digits = caps.get(3).map(|m| m.as_str()).unwrap_or("");

            let (role, sign) = match (role, sign) {
                (Some(role), Some(sign)) => (role, sign),
                _ => return Err(diagnose(text, offset)),
            };
            let id = digits.parse::<u32>().map_err(|_| ParseError::IdOutOfRange {
                offset: offset + 2,
                digits: digits.to_string(),
            })?;

            elements.push(Element::new(id, role, sign));
            offset = whole;
        }

        let code = Self(elements);
        code.check_pairs()?;
        Ok(code.canonicalize())
    }

    /// The elements in order.
    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    /// Consume into the element vector.
    pub fn into_elements(self) -> Vec<Element> {
        self.0
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the trivial diagram.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of chords (crossings).
    pub fn chord_count(&self) -> usize {
        self.0.len() / 2
    }

    /// Largest chord id, if any.
    pub fn max_id(&self) -> Option<u32> {
        self.0.iter().map(|e| e.id).max()
    }

    /// Element at a cyclic position. The code must not be empty.
    pub(crate) fn at(&self, position: usize) -> Element {
        self.0[position % self.0.len()]
    }

    /// Check that every chord id is visited exactly twice.
    pub fn check_pairs(&self) -> Result<(), ParseError> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for e in &self.0 {
            *counts.entry(e.id).or_default() += 1;
        }

        match counts.into_iter().find(|(_, n)| *n != 2) {
            Some((id, occurrences)) => Err(ParseError::UnpairedChord { id, occurrences }),
            None => Ok(()),
        }
    }

    /// Relabel chords `0..k-1` in order of first appearance.
    pub fn renumber(&mut self) {
        let Some(max_id) = self.max_id() else {
            return;
        };

        if (max_id as usize) < 4 * self.0.len() + 16 {
            let mut renum = vec![u32::MAX; max_id as usize + 1];
            let mut next = 0;
            for e in self.0.iter_mut() {
                let slot = &mut renum[e.id as usize];
                if *slot == u32::MAX {
                    *slot = next;
                    next += 1;
                }
                e.id = *slot;
            }
        } else {
            let mut renum: HashMap<u32, u32> = HashMap::new();
            for e in self.0.iter_mut() {
                let next = renum.len() as u32;
                e.id = *renum.entry(e.id).or_insert(next);
            }
        }
    }

    /// Renumber, requiring at most `bound` distinct chord ids.
    pub fn renumber_within(&mut self, bound: usize) -> Result<(), CodeError> {
        let mut ids: Vec<u32> = self.0.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() > bound {
            return Err(CodeError::IdSpaceExceeded { distinct: ids.len(), bound });
        }

        self.renumber();
        Ok(())
    }

    /// Cyclic left shift by `k` positions, then renumber.
    pub fn rotate(&self, k: usize) -> Self {
        if self.0.is_empty() {
            return self.clone();
        }

        let mut rotated = self.0.clone();
        rotated.rotate_left(k % self.0.len());
        let mut code = Self(rotated);
        code.renumber();
        code
    }

    /// The canonical representative of this code.
    pub fn canonicalize(&self) -> Self {
        let n = self.0.len();
        let mut base = self.clone();
        base.renumber();
        if n < 2 {
            return base;
        }

        // Ids are dense after renumbering, so the scratch table stays small.
        let id_space = base.max_id().map(|m| m as usize + 1).unwrap_or(0);
        let mut renum = vec![u32::MAX; id_space];
        let mut best = base.0.clone();
        let mut candidate = Vec::with_capacity(n);

        for k in 1..n {
            renum.iter_mut().for_each(|slot| *slot = u32::MAX);
            candidate.clear();
            let mut next = 0;
            for i in 0..n {
                let e = base.0[(i + k) % n];
                let slot = &mut renum[e.id as usize];
                if *slot == u32::MAX {
                    *slot = next;
                    next += 1;
                }
                candidate.push(e.with_id(*slot));
            }

            if candidate.as_slice() < best.as_slice() {
                std::mem::swap(&mut best, &mut candidate);
            }
        }

        Self(best)
    }

    /// True if this code equals its canonical form.
    pub fn is_canonical(&self) -> bool {
        *self == self.canonicalize()
    }

    /// Canonicalize under an element model.
    pub fn normalized(&self, model: ElementModel) -> Self {
        match model {
            ElementModel::Oriented => self.canonicalize(),
            ElementModel::Flat => self.flatten(),
        }
    }

    /// Drop roles (all visits become `Under`) and canonicalize.
    pub fn flatten(&self) -> Self {
        Self(self.0.iter().map(|e| ElementModel::Flat.normalize(*e)).collect()).canonicalize()
    }

    /// Stable fingerprint of the code, for logs and dumps.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Explain why no token matched at `offset`.
fn diagnose(text: &str, offset: usize) -> ParseError {
    let mut chars = text[offset..].char_indices();
    let found = match chars.next() {
        Some((_, c)) => c,
        None => return ParseError::MissingSign { offset },
    };
    if Role::from_letter(found).is_none() {
        return ParseError::UnexpectedChar { offset, found };
    }

    match chars.next() {
        Some((_, c)) if Sign::from_symbol(c).is_some() => ParseError::MissingId {
            offset: offset + 2,
        },
        _ => ParseError::MissingSign { offset: offset + 1 },
    }
}

// Canonical ordering: length, then element-by-element packed value
impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Code {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.len().cmp(&other.0.len()) {
            Ordering::Equal => self.0.cmp(&other.0),
            ord => ord,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{}", EMPTY_CODE_TEXT);
        }
        for e in &self.0 {
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Code {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

impl From<Vec<Element>> for Code {
    fn from(elements: Vec<Element>) -> Self {
        Self(elements)
    }
}
