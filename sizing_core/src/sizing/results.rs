//! Per-member sizing results.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calculations::{AxialCheck, ConnectionDesign};
use crate::member::{BarClass, Member, MemberId};

/// Profile name reported for a member with no viable profile
pub const NO_PROFILE: &str = "NONE";

/// Verification of one member under one critical hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseVerification {
    pub hypothesis: String,

    /// Signed axial force (kgf)
    pub force_kgf: f64,

    /// The force was synthesized for a missing sign
    pub synthetic: bool,

    /// Profile the record was computed with
    pub profile: String,

    pub axial: AxialCheck,

    /// Connection designed for this case's force
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionDesign>,
}

impl CaseVerification {
    pub fn connection_utilization(&self) -> f64 {
        self.connection.as_ref().map_or(0.0, |c| c.utilization)
    }
}

/// Sizing result for one member.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "5",
///   "class": "diagonal",
///   "module": 2,
///   "profile": "L 50x50x4",
///   "tension_hypothesis": "wind_180",
///   "compression_hypothesis": "wind_0",
///   "governing_hypothesis": "wind_0",
///   "worst_connection_hypothesis": "wind_0",
///   "synthetic": false,
///   "cases": { "wind_0": { "...": "..." }, "wind_180": { "...": "..." } },
///   "final_axial_utilization": 0.41,
///   "final_connection_utilization": 0.62
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResult {
    pub id: MemberId,
    pub class: BarClass,
    pub module: Option<u32>,

    /// Chosen profile, or [`NO_PROFILE`]
    pub profile: String,

    pub tension_hypothesis: String,
    pub compression_hypothesis: String,

    /// Critical hypothesis the profile was chosen for
    pub governing_hypothesis: String,

    /// Critical hypothesis with the highest connection utilization
    pub worst_connection_hypothesis: String,

    /// A critical case was synthesized
    pub synthetic: bool,

    /// Records keyed by hypothesis name (the two critical cases)
    pub cases: BTreeMap<String, CaseVerification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_axial_utilization: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_connection_utilization: Option<f64>,
}

impl MemberResult {
    pub fn has_profile(&self) -> bool {
        self.profile != NO_PROFILE
    }

    pub fn governing_case(&self) -> Option<&CaseVerification> {
        self.cases.get(&self.governing_hypothesis)
    }

    pub fn governing_case_mut(&mut self) -> Option<&mut CaseVerification> {
        self.cases.get_mut(&self.governing_hypothesis)
    }

    /// Critical cases in `[tension, compression]` order
    pub fn critical_cases(&self) -> impl Iterator<Item = &CaseVerification> {
        [&self.tension_hypothesis, &self.compression_hypothesis]
            .into_iter()
            .filter_map(|h| self.cases.get(h))
    }

    /// Re-point the worst-connection case at the highest connection
    /// utilization (tension case first on ties).
    pub fn refresh_worst_connection(&mut self) {
        let mut worst: Option<(&str, f64)> = None;
        for case in self.critical_cases() {
            let u = case.connection_utilization();
            if worst.map_or(true, |(_, best)| u > best) {
                worst = Some((case.hypothesis.as_str(), u));
            }
        }
        if let Some((h, _)) = worst {
            self.worst_connection_hypothesis = h.to_string();
        }
    }

    /// Connection of the worst-connection case
    pub fn worst_connection(&self) -> Option<&ConnectionDesign> {
        self.cases
            .get(&self.worst_connection_hypothesis)
            .and_then(|c| c.connection.as_ref())
    }
}

/// Output of a successful sizing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingOutput {
    /// Per-member results
    pub results: BTreeMap<MemberId, MemberResult>,

    /// End connection of every leg at a module extremity and its mirrors
    pub connections: BTreeMap<MemberId, ConnectionDesign>,

    /// Legs whose connection is verified, after mirror expansion
    pub connection_required: BTreeSet<MemberId>,

    /// Member metadata with position flags and chosen profiles
    pub members: BTreeMap<MemberId, Member>,
}

/// Outcome of [`crate::sizing::size_members`].
///
/// `Infeasible` is only produced when `hard_stop` is disabled; with hard stop
/// the same condition is returned as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SizingOutcome {
    Sized(SizingOutput),
    Infeasible { reason: crate::errors::SizingError },
}

/// `(results, connections, connection_required)`
pub type SizingParts = (
    Option<BTreeMap<MemberId, MemberResult>>,
    Option<BTreeMap<MemberId, ConnectionDesign>>,
    Option<BTreeSet<MemberId>>,
);

impl SizingOutcome {
    pub fn is_sized(&self) -> bool {
        matches!(self, SizingOutcome::Sized(_))
    }

    pub fn output(&self) -> Option<&SizingOutput> {
        match self {
            SizingOutcome::Sized(output) => Some(output),
            SizingOutcome::Infeasible { .. } => None,
        }
    }

    /// Split into the three result maps; all `None` when infeasible.
    pub fn into_parts(self) -> SizingParts {
        match self {
            SizingOutcome::Sized(output) => (
                Some(output.results),
                Some(output.connections),
                Some(output.connection_required),
            ),
            SizingOutcome::Infeasible { .. } => (None, None, None),
        }
    }
}
