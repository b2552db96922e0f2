//! # Members
//!
//! Static member metadata as produced by the geometry/solver layer, plus the
//! identifier and classification types every other module keys on.
//!
//! ## Identifiers
//!
//! Members crossing a module boundary are split into segments that share a
//! base id and carry a letter suffix (`12a`, `12b`). [`MemberId`] models this
//! as `{ base, suffix }` and orders by base first, then suffix, so `2 < 10 <
//! 10a < 10b < 11`.
//!
//! ```rust
//! use sizing_core::member::MemberId;
//!
//! let mut ids: Vec<MemberId> = ["10b", "2", "10", "10a"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! ids.sort();
//! let printed: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
//! assert_eq!(printed, ["2", "10", "10a", "10b"]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SizingError;

// ============================================================================
// Member Identifier
// ============================================================================

/// Member identifier: numeric base id plus optional segment suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId {
    pub base: u32,
    pub suffix: Option<char>,
}

impl MemberId {
    pub fn new(base: u32) -> Self {
        MemberId { base, suffix: None }
    }

    pub fn with_suffix(base: u32, suffix: char) -> Self {
        MemberId {
            base,
            suffix: Some(suffix.to_ascii_lowercase()),
        }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suffix {
            Some(s) => write!(f, "{}{}", self.base, s),
            None => write!(f, "{}", self.base),
        }
    }
}

impl FromStr for MemberId {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, rest) = trimmed.split_at(digits_end);

        let base: u32 = digits
            .parse()
            .map_err(|_| SizingError::invalid_input("member_id", s, "Expected a numeric id"))?;

        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(MemberId::new(base)),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(MemberId::with_suffix(base, c)),
            _ => Err(SizingError::invalid_input(
                "member_id",
                s,
                "Suffix must be a single letter",
            )),
        }
    }
}

impl TryFrom<String> for MemberId {
    type Error = SizingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.to_string()
    }
}

// ============================================================================
// Bar Classification
// ============================================================================

/// Bar class as tagged by the geometry generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarClass {
    /// Leg on the left face
    LegLeft,
    /// Leg on the right face
    LegRight,
    /// Leg with no side information
    Leg,
    Diagonal,
    Horizontal,
}

impl BarClass {
    /// Base kind used to key per-class configuration.
    pub fn kind(&self) -> BarKind {
        match self {
            BarClass::LegLeft | BarClass::LegRight | BarClass::Leg => BarKind::Leg,
            BarClass::Diagonal => BarKind::Diagonal,
            BarClass::Horizontal => BarKind::Horizontal,
        }
    }

    pub fn is_leg(&self) -> bool {
        self.kind() == BarKind::Leg
    }

    /// Whether `other` is an acceptable mirror partner for a member of this class.
    ///
    /// Sided legs look for the opposite side; an unsided leg accepts any leg.
    pub fn mirrors(&self, other: BarClass) -> bool {
        match self {
            BarClass::LegLeft => other == BarClass::LegRight,
            BarClass::LegRight => other == BarClass::LegLeft,
            BarClass::Leg => other.is_leg(),
            BarClass::Diagonal | BarClass::Horizontal => false,
        }
    }
}

/// Base member kind: leg or bracing (diagonal/horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    Leg,
    Diagonal,
    Horizontal,
}

impl BarKind {
    pub fn is_leg(&self) -> bool {
        *self == BarKind::Leg
    }
}

impl fmt::Display for BarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BarKind::Leg => "leg",
            BarKind::Diagonal => "diagonal",
            BarKind::Horizontal => "horizontal",
        };
        write!(f, "{}", name)
    }
}

/// One value per [`BarKind`].
///
/// ## JSON Example
///
/// ```json
/// { "leg": 20, "diagonal": 2, "horizontal": 2 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub leg: T,
    pub diagonal: T,
    pub horizontal: T,
}

impl<T: Copy> PerKind<T> {
    /// Same value for every kind
    pub fn uniform(value: T) -> Self {
        PerKind {
            leg: value,
            diagonal: value,
            horizontal: value,
        }
    }

    pub fn get(&self, kind: BarKind) -> T {
        match kind {
            BarKind::Leg => self.leg,
            BarKind::Diagonal => self.diagonal,
            BarKind::Horizontal => self.horizontal,
        }
    }

    /// Iterate `(kind, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (BarKind, T)> + '_ {
        [BarKind::Leg, BarKind::Diagonal, BarKind::Horizontal]
            .into_iter()
            .map(move |k| (k, self.get(k)))
    }
}

// ============================================================================
// Member Metadata
// ============================================================================

/// Extremity flags assigned by the position classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionFlags {
    /// Leg touches the lowest level of its module
    #[serde(default)]
    pub module_base: bool,
    /// Leg touches the highest level of its module
    #[serde(default)]
    pub module_top: bool,
    /// Leg touches the top of the whole structure
    #[serde(default)]
    pub structure_top: bool,
}

/// Static member metadata.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "3",
///   "class": "leg_left",
///   "length_cm": 300.0,
///   "unbraced_length_cm": 150.0,
///   "angle_deg": 90.0,
///   "modules": [1],
///   "y_min_cm": 300.0,
///   "y_max_cm": 600.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    pub class: BarClass,

    /// Real (node to node) length in cm
    pub length_cm: f64,

    /// Buckling length between bracing points in cm (legs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbraced_length_cm: Option<f64>,

    /// Inclination from horizontal in degrees
    pub angle_deg: f64,

    /// Module indices, 1 = topmost module
    pub modules: Vec<u32>,

    pub y_min_cm: f64,

    pub y_max_cm: f64,

    #[serde(default)]
    pub position: PositionFlags,

    /// Profile selected during sizing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_profile: Option<String>,
}

impl Member {
    pub fn kind(&self) -> BarKind {
        self.class.kind()
    }

    pub fn is_leg(&self) -> bool {
        self.class.is_leg()
    }

    /// Module the member is grouped under: the topmost of its modules.
    pub fn module(&self) -> Option<u32> {
        self.modules.iter().min().copied()
    }

    /// Buckling length: unbraced length for legs, real length otherwise.
    pub fn effective_length_cm(&self) -> f64 {
        if self.is_leg() {
            self.unbraced_length_cm.unwrap_or(self.length_cm)
        } else {
            self.length_cm
        }
    }
}
