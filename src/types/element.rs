//! Crossing elements of a Gauss code.
//!
//! Each element records one visit of the curve to a crossing: whether the
//! strand passes over or under, the crossing sign, and the chord id shared by
//! both visits of the same crossing.
//!
//! ## Ordering
//!
//! Elements order by their packed value `(id, role, sign)` with the id most
//! significant, then `Under < Over`, then `Negative < Positive`. Canonical
//! forms of whole codes are defined in terms of this ordering, so the field
//! order of [`Element`] is load-bearing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A name that matches no variant of an enum parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} {name:?}")]
pub struct UnknownName {
    /// What was being parsed.
    pub kind: &'static str,
    /// The name as given.
    pub name: String,
}

/// Whether a visit passes over or under the other strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Strand passes under.
    Under,
    /// Strand passes over.
    Over,
}

impl Role {
    /// Parse a role from its code letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'O' => Some(Self::Over),
            'U' => Some(Self::Under),
            _ => None,
        }
    }

    /// The letter used in the text format.
    pub fn letter(&self) -> char {
        match self {
            Self::Over => 'O',
            Self::Under => 'U',
        }
    }

    /// The opposite role.
    pub fn flipped(&self) -> Self {
        match self {
            Self::Over => Self::Under,
            Self::Under => Self::Over,
        }
    }

    /// True for [`Role::Over`].
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Over)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Crossing sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Negative crossing.
    Negative,
    /// Positive crossing.
    Positive,
}

impl Sign {
    /// Parse a sign from its code symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Positive),
            '-' => Some(Self::Negative),
            _ => None,
        }
    }

    /// The symbol used in the text format.
    pub fn symbol(&self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }

    /// `+1` or `-1`.
    pub fn value(&self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    /// The opposite sign.
    pub fn flipped(&self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }

    /// Sign from a boolean "is positive" flag.
    pub fn from_positive(positive: bool) -> Self {
        if positive {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// True for [`Sign::Positive`].
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One visit to a crossing.
///
/// Field order matters: the derived `Ord` compares `id`, then `role`, then
/// `sign`, which is exactly the packed-value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Element {
    /// Chord id shared by both visits of the crossing.
    pub id: u32,
    /// Over or under.
    pub role: Role,
    /// Crossing sign.
    pub sign: Sign,
}

impl Element {
    /// Create a new element.
    pub fn new(id: u32, role: Role, sign: Sign) -> Self {
        Self { id, role, sign }
    }

    /// Over-visit of chord `id`.
    pub fn over(id: u32, sign: Sign) -> Self {
        Self::new(id, Role::Over, sign)
    }

    /// Under-visit of chord `id`.
    pub fn under(id: u32, sign: Sign) -> Self {
        Self::new(id, Role::Under, sign)
    }

    /// Packed representation `id << 2 | over << 1 | positive`.
    pub fn packed(&self) -> u64 {
        ((self.id as u64) << 2)
            | ((self.role.is_over() as u64) << 1)
            | (self.sign.is_positive() as u64)
    }

    /// Same flags, different id.
    pub fn with_id(&self, id: u32) -> Self {
        Self { id, ..*self }
    }

    /// Same element with the role inverted.
    pub fn role_flipped(&self) -> Self {
        Self { role: self.role.flipped(), ..*self }
    }

    /// Same element with the sign inverted.
    pub fn sign_flipped(&self) -> Self {
        Self { sign: self.sign.flipped(), ..*self }
    }

    /// True if the strand passes over.
    pub fn is_over(&self) -> bool {
        self.role.is_over()
    }

    /// `+1` or `-1`.
    pub fn sign_value(&self) -> i32 {
        self.sign.value()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.role, self.sign, self.id)
    }
}

/// Which element fields carry meaning.
///
/// `Oriented` codes carry over/under information and use face tracing for
/// their genus. `Flat` codes only carry signs; roles are normalized to
/// [`Role::Under`] so the packed ordering matches a role-free packing, and
/// planarity comes from the chord-sum test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementModel {
    /// Signed elements with over/under roles.
    #[default]
    Oriented,
    /// Signed elements without roles.
    Flat,
}

impl FromStr for ElementModel {
    type Err = UnknownName;

    /// Case-insensitive model name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oriented" => Ok(Self::Oriented),
            "flat" => Ok(Self::Flat),
            _ => Err(UnknownName { kind: "element model", name: s.to_string() }),
        }
    }
}

impl ElementModel {
    /// Whether roles are meaningful under this model.
    pub fn has_roles(&self) -> bool {
        matches!(self, Self::Oriented)
    }

    /// Normalize an element for this model.
    pub fn normalize(&self, element: Element) -> Element {
        match self {
            Self::Oriented => element,
            Self::Flat => Element { role: Role::Under, ..element },
        }
    }

    /// The second visit of a freshly inserted chord whose first visit is `first`.
    ///
    /// Oriented chords swap the role and keep the sign; flat chords swap the sign.
    pub fn partner(&self, first: Element) -> Element {
        match self {
            Self::Oriented => first.role_flipped(),
            Self::Flat => first.sign_flipped(),
        }
    }
}

impl fmt::Display for ElementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oriented => write!(f, "oriented"),
            Self::Flat => write!(f, "flat"),
        }
    }
}
