//! # Load Hypotheses
//!
//! Axial forces per load hypothesis as produced by the structural solver,
//! and the selection of each member's critical tension and compression
//! cases.
//!
//! A member never loaded in one sign gets a synthetic case of ±0.01 kgf
//! (`hyp_0_t` / `hyp_0_c`) so every member is sized for both signs.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "wind_0": { "1": 8000.0, "2": -9000.0 },
//!   "wind_180": { "1": -8000.0, "2": 9000.0 }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::member::MemberId;

/// Hypothesis name → member → signed axial force (kgf, tension positive)
pub type ForceTable = BTreeMap<String, BTreeMap<MemberId, f64>>;

/// Magnitude of the synthetic force (kgf)
pub const SYNTHETIC_FORCE_KGF: f64 = 0.01;

pub const SYNTHETIC_TENSION: &str = "hyp_0_t";
pub const SYNTHETIC_COMPRESSION: &str = "hyp_0_c";

pub fn is_synthetic(hypothesis: &str) -> bool {
    hypothesis == SYNTHETIC_TENSION || hypothesis == SYNTHETIC_COMPRESSION
}

/// Forces acting on one member, in hypothesis name order
pub fn member_forces<'a>(table: &'a ForceTable, id: &MemberId) -> Vec<(&'a str, f64)> {
    table
        .iter()
        .filter_map(|(name, forces)| forces.get(id).map(|f| (name.as_str(), *f)))
        .collect()
}

/// Largest and smallest force on a member over all hypotheses
pub fn force_envelope(table: &ForceTable, id: &MemberId) -> Option<(f64, f64)> {
    let forces = member_forces(table, id);
    if forces.is_empty() {
        return None;
    }
    let max = forces.iter().map(|(_, f)| *f).fold(f64::NEG_INFINITY, f64::max);
    let min = forces.iter().map(|(_, f)| *f).fold(f64::INFINITY, f64::min);
    Some((max, min))
}

/// Force of largest magnitude (first in name order on ties)
pub fn peak_force(table: &ForceTable, id: &MemberId) -> Option<f64> {
    member_forces(table, id)
        .into_iter()
        .map(|(_, f)| f)
        .fold(None, |best: Option<f64>, f| match best {
            Some(b) if b.abs() >= f.abs() => Some(b),
            _ => Some(f),
        })
}

/// One critical case of a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalCase {
    pub hypothesis: String,
    pub force_kgf: f64,
}

/// Worst tension and worst compression cases of a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalCases {
    pub tension: CriticalCase,
    pub compression: CriticalCase,
    /// At least one of the two cases is synthetic
    pub synthetic: bool,
    /// Every real force on the member is tension
    pub tension_only: bool,
}

impl CriticalCases {
    /// `[tension, compression]`
    pub fn both(&self) -> [&CriticalCase; 2] {
        [&self.tension, &self.compression]
    }
}

/// Select the critical cases of a member.
///
/// Strictly larger forces replace the running choice, so ties stay with the
/// first hypothesis in name order. Zero counts as compression.
pub fn critical_cases(table: &ForceTable, id: &MemberId) -> CriticalCases {
    let forces = member_forces(table, id);

    let mut tension: Option<(&str, f64)> = None;
    let mut compression: Option<(&str, f64)> = None;
    for &(name, f) in &forces {
        if f > 0.0 {
            if tension.map_or(true, |(_, best)| f > best) {
                tension = Some((name, f));
            }
        } else if f < 0.0 && compression.map_or(true, |(_, best)| f < best) {
            compression = Some((name, f));
        }
    }

    let tension_only = !forces.is_empty() && forces.iter().all(|(_, f)| *f > 0.0);
    let synthetic = tension.is_none() || compression.is_none();

    let case = |found: Option<(&str, f64)>, name: &str, force: f64| match found {
        Some((h, f)) => CriticalCase {
            hypothesis: h.to_string(),
            force_kgf: f,
        },
        None => CriticalCase {
            hypothesis: name.to_string(),
            force_kgf: force,
        },
    };

    CriticalCases {
        tension: case(tension, SYNTHETIC_TENSION, SYNTHETIC_FORCE_KGF),
        compression: case(compression, SYNTHETIC_COMPRESSION, -SYNTHETIC_FORCE_KGF),
        synthetic,
        tension_only,
    }
}
