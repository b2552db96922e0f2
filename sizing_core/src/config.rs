//! # Sizing Configuration
//!
//! Scalars and per-class maps that parameterize a sizing run.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "minoration": 0.9,
//!   "hole_diameter_cm": { "leg": 1.59, "diagonal": 1.59, "horizontal": 1.59 },
//!   "net_area_holes": { "leg": null, "diagonal": 1, "horizontal": 1 },
//!   "bolt_limits": { "leg": 20, "diagonal": 2, "horizontal": 2 },
//!   "shear_planes": { "leg": 1, "diagonal": 1, "horizontal": 1 },
//!   "bearing_factors": [1.0833333333333333, 1.25],
//!   "hard_stop": true
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SizingError, SizingResult};
use crate::member::{BarKind, PerKind};

/// Configuration for one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Resistance reduction applied to every admissible stress
    pub minoration: f64,

    /// Bolt hole diameter per member kind (cm)
    pub hole_diameter_cm: PerKind<f64>,

    /// Net-area hole count override per kind; None uses the profile's count
    pub net_area_holes: PerKind<Option<u32>>,

    /// Maximum bolts per connection
    pub bolt_limits: PerKind<u32>,

    /// Shear planes per bolt
    pub shear_planes: PerKind<u32>,

    /// Bearing factors tried in order
    pub bearing_factors: Vec<f64>,

    /// Raise on infeasibility instead of returning an infeasible outcome
    pub hard_stop: bool,

    /// Axial utilization ceiling for diagonals and horizontals in the sweep
    pub bracing_utilization_limit: f64,

    /// Reinforcement cycle cap
    pub max_reinforcement_cycles: u32,

    /// Tolerance for comparing node levels (cm)
    pub level_tolerance_cm: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        SizingConfig {
            minoration: 0.90,
            hole_diameter_cm: PerKind::uniform(1.59),
            net_area_holes: PerKind::uniform(None),
            bolt_limits: PerKind {
                leg: 20,
                diagonal: 2,
                horizontal: 2,
            },
            shear_planes: PerKind::uniform(1),
            bearing_factors: vec![1.3 / 1.2, 1.25],
            hard_stop: true,
            bracing_utilization_limit: 0.90,
            max_reinforcement_cycles: 10,
            level_tolerance_cm: 1e-3,
        }
    }
}

impl SizingConfig {
    pub fn hole_diameter(&self, kind: BarKind) -> f64 {
        self.hole_diameter_cm.get(kind)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> SizingResult<()> {
        if !(self.minoration > 0.0 && self.minoration <= 1.0) {
            return Err(SizingError::invalid_input(
                "minoration",
                self.minoration.to_string(),
                "Minoration coefficient must be in (0, 1]",
            ));
        }
        for (kind, d) in self.hole_diameter_cm.iter() {
            if d <= 0.0 {
                return Err(SizingError::invalid_input(
                    format!("hole_diameter_cm.{}", kind),
                    d.to_string(),
                    "Hole diameter must be positive",
                ));
            }
        }
        for (kind, n) in self.bolt_limits.iter() {
            if n == 0 {
                return Err(SizingError::invalid_input(
                    format!("bolt_limits.{}", kind),
                    "0",
                    "At least one bolt must be allowed",
                ));
            }
        }
        for (kind, n) in self.shear_planes.iter() {
            if n == 0 {
                return Err(SizingError::invalid_input(
                    format!("shear_planes.{}", kind),
                    "0",
                    "Bolts need at least one shear plane",
                ));
            }
        }
        if self.bearing_factors.is_empty() || self.bearing_factors.iter().any(|f| *f <= 0.0) {
            return Err(SizingError::invalid_input(
                "bearing_factors",
                format!("{:?}", self.bearing_factors),
                "Bearing factors must be a non-empty list of positive values",
            ));
        }
        if self.bracing_utilization_limit <= 0.0 {
            return Err(SizingError::invalid_input(
                "bracing_utilization_limit",
                self.bracing_utilization_limit.to_string(),
                "Utilization limit must be positive",
            ));
        }
        if self.max_reinforcement_cycles == 0 {
            return Err(SizingError::invalid_input(
                "max_reinforcement_cycles",
                "0",
                "At least one reinforcement cycle is required",
            ));
        }
        Ok(())
    }
}
