//! # Weight Takeoff
//!
//! Steel mass of a sized tower, per module and in total, and the
//! length-weighted leg areas fed back to the structural model between
//! sizing iterations.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::sizing::{size_members, SizingInput};
//! use sizing_core::weight::weight_takeoff;
//!
//! let input = SizingInput::default();
//! let outcome = size_members(&input).unwrap();
//! let summary = weight_takeoff(outcome.output().unwrap(), &input.profiles).unwrap();
//! assert_eq!(summary.total_kg, 0.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::SizingResult;
use crate::materials::ProfileCatalog;
use crate::sizing::SizingOutput;
use crate::units::{Centimeters, KgPerMeter};

/// Mass of one module split by member kind (kg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleWeight {
    pub legs_kg: f64,
    /// Diagonals and horizontals
    pub bracing_kg: f64,
}

impl ModuleWeight {
    pub fn total_kg(&self) -> f64 {
        self.legs_kg + self.bracing_kg
    }
}

/// Weight summary of a sized tower.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_kg": 412.7,
///   "modules": { "1": { "legs_kg": 120.4, "bracing_kg": 38.1 } },
///   "equivalent_leg_area_cm2": { "1": 7.53, "12": 10.2 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightSummary {
    pub total_kg: f64,

    /// Module index → mass split
    pub modules: BTreeMap<u32, ModuleWeight>,

    /// Leg base id → Σ(A·L) / ΣL over its segments (cm²)
    pub equivalent_leg_area_cm2: BTreeMap<u32, f64>,
}

/// Compute the weight takeoff of a sized tower.
///
/// Members without a module count toward the total only. Split leg segments
/// (`12a`, `12b`) share one equivalent area under their base id.
pub fn weight_takeoff(output: &SizingOutput, profiles: &ProfileCatalog) -> SizingResult<WeightSummary> {
    let mut summary = WeightSummary::default();
    let mut leg_segments: BTreeMap<u32, (f64, f64)> = BTreeMap::new();

    for (id, result) in &output.results {
        let Some(member) = output.members.get(id) else {
            continue;
        };
        let profile = profiles.lookup(&result.profile)?;
        let mass = KgPerMeter(profile.mass_kg_m).mass_of(Centimeters(member.length_cm));

        summary.total_kg += mass;

        if let Some(module) = member.module() {
            let entry = summary.modules.entry(module).or_default();
            if member.is_leg() {
                entry.legs_kg += mass;
            } else {
                entry.bracing_kg += mass;
            }
        }

        if member.is_leg() {
            let (area_length, length) = leg_segments.entry(id.base).or_default();
            *area_length += profile.area_cm2 * member.length_cm;
            *length += member.length_cm;
        }
    }

    for (base, (area_length, length)) in leg_segments {
        if length > 0.0 {
            summary.equivalent_leg_area_cm2.insert(base, area_length / length);
        }
    }

    tracing::debug!(total_kg = summary.total_kg, modules = summary.modules.len(), "weight takeoff");
    Ok(summary)
}
