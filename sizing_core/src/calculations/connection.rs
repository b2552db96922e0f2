//! # Bolted Connection Design
//!
//! Finds the smallest bolt count and least favorable bearing factor that
//! carry an axial force through a single-angle bolted end connection.
//!
//! ## Capacities
//!
//! ```text
//! Fc = φ · np · Ab · fv · planes          (bolt shear)
//! Fe = φ · fp · fu · (np · d · t)         (bearing on the connected flange)
//! ```
//!
//! Legs use even bolt counts starting at the profile's minimum leg bolt count
//! (4 when the catalog is silent). Bracing starts at one bolt. Counts never
//! exceed the class limit.
//!
//! ## Infeasibility
//!
//! Exhausting every combination is not an error: the returned design has
//! `feasible = false`, zero capacities, no bolt count and utilization 999.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::calculations::connection::design_connection;
//! use sizing_core::config::SizingConfig;
//! use sizing_core::materials::{builtin_angle_profiles, builtin_grades};
//! use sizing_core::member::BarKind;
//!
//! let catalog = builtin_angle_profiles();
//! let grades = builtin_grades();
//! let config = SizingConfig::default();
//! let profile = catalog.lookup("L 50x50x5").unwrap();
//!
//! let design = design_connection(&config, &grades, profile, BarKind::Diagonal, -3000.0).unwrap();
//! assert!(design.feasible);
//! assert_eq!(design.bolt_count, Some(1));
//! assert!(design.utilization <= 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::SizingConfig;
use crate::errors::SizingResult;
use crate::materials::{MaterialTable, Profile};
use crate::member::BarKind;

/// Utilization reported for a connection with no admissible combination
pub const INFEASIBLE_CONNECTION_UTILIZATION: f64 = 999.0;

/// Leg bolt count used when the profile does not specify one
pub const DEFAULT_MIN_LEG_BOLTS: u32 = 4;

/// One connection design (or the record of its infeasibility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDesign {
    pub feasible: bool,

    /// Number of bolts; None when infeasible
    pub bolt_count: Option<u32>,

    /// Hole (bolt) diameter (cm)
    pub hole_diameter_cm: f64,

    /// Bolt shank area (cm²)
    pub bolt_area_cm2: f64,

    pub shear_planes: u32,

    /// Bearing factor fp that satisfied the check; None when infeasible
    pub bearing_factor: Option<f64>,

    /// Admissible bolt shear force Fc (kgf)
    pub shear_capacity_kgf: f64,

    /// Admissible bearing force Fe (kgf)
    pub bearing_capacity_kgf: f64,

    /// max(N/Fc, N/Fe)
    pub utilization: f64,

    pub minoration: f64,
}

impl ConnectionDesign {
    fn infeasible(hole_diameter_cm: f64, bolt_area_cm2: f64, shear_planes: u32, minoration: f64) -> Self {
        ConnectionDesign {
            feasible: false,
            bolt_count: None,
            hole_diameter_cm,
            bolt_area_cm2,
            shear_planes,
            bearing_factor: None,
            shear_capacity_kgf: 0.0,
            bearing_capacity_kgf: 0.0,
            utilization: INFEASIBLE_CONNECTION_UTILIZATION,
            minoration,
        }
    }

    /// Utilization of this design under another force.
    ///
    /// A zero capacity counts as 999 for its ratio.
    pub fn utilization_for(&self, force_kgf: f64) -> f64 {
        let n = force_kgf.abs();
        let ratio = |capacity: f64| {
            if capacity > 0.0 {
                n / capacity
            } else {
                INFEASIBLE_CONNECTION_UTILIZATION
            }
        };
        ratio(self.shear_capacity_kgf).max(ratio(self.bearing_capacity_kgf))
    }

    /// Whether the design carries `force_kgf` in both shear and bearing
    pub fn carries(&self, force_kgf: f64) -> bool {
        let n = force_kgf.abs();
        n <= self.shear_capacity_kgf && n <= self.bearing_capacity_kgf
    }

    /// Same bolts on a different connected flange.
    ///
    /// Bearing is recomputed for the flange thickness and ultimate stress of
    /// `profile`; shear is unchanged. The utilization is re-evaluated for
    /// `force_kgf`.
    pub fn rebased_to(&self, thickness_cm: f64, fu_kgf_cm2: f64, force_kgf: f64) -> Self {
        let mut rebased = self.clone();
        if let (Some(np), Some(fp)) = (self.bolt_count, self.bearing_factor) {
            rebased.bearing_capacity_kgf =
                np as f64 * self.hole_diameter_cm * thickness_cm * fp * fu_kgf_cm2 * self.minoration;
        }
        rebased.utilization = rebased.utilization_for(force_kgf);
        rebased
    }
}

/// Admissible shear force of `bolts` bolts (kgf)
pub fn shear_capacity(minoration: f64, bolts: u32, bolt_area_cm2: f64, fv: f64, planes: u32) -> f64 {
    minoration * bolts as f64 * bolt_area_cm2 * fv * planes as f64
}

/// Smallest bolt count admissible for the class
fn first_bolt_count(profile: &Profile, kind: BarKind) -> u32 {
    if kind.is_leg() {
        profile.min_leg_bolts.unwrap_or(DEFAULT_MIN_LEG_BOLTS)
    } else {
        1
    }
}

/// Design the lightest connection for `force_kgf` on `profile`.
pub fn design_connection(
    config: &SizingConfig,
    materials: &MaterialTable,
    profile: &Profile,
    kind: BarKind,
    force_kgf: f64,
) -> SizingResult<ConnectionDesign> {
    design_connection_from(config, materials, profile, kind, force_kgf, 0)
}

/// Design a connection using at least `min_bolts` bolts.
///
/// The class minimum still applies; `min_bolts` only raises it. Used when
/// escalating a design that fails for another member's force.
pub fn design_connection_from(
    config: &SizingConfig,
    materials: &MaterialTable,
    profile: &Profile,
    kind: BarKind,
    force_kgf: f64,
    min_bolts: u32,
) -> SizingResult<ConnectionDesign> {
    let fv = materials.bolt_shear_stress()?;
    let fu = materials.for_profile(profile)?.fu_kgf_cm2;

    let phi = config.minoration;
    let d = config.hole_diameter(kind);
    let bolt_area = std::f64::consts::PI * (d / 2.0).powi(2);
    let planes = config.shear_planes.get(kind);
    let max_bolts = config.bolt_limits.get(kind);
    let t = profile.thickness_cm;
    let n = force_kgf.abs();

    let start = first_bolt_count(profile, kind).max(min_bolts);

    for np in start..=max_bolts {
        if kind.is_leg() && np % 2 != 0 {
            continue;
        }

        let fc = shear_capacity(phi, np, bolt_area, fv, planes);
        if n > fc {
            continue;
        }

        let contact_area = np as f64 * d * t;
        let bearing_stress = n / contact_area;

        for &fp in &config.bearing_factors {
            let admissible_bearing = phi * fp * fu;
            if bearing_stress > admissible_bearing {
                continue;
            }

            let utilization = (n / fc).max(bearing_stress / admissible_bearing);
            if utilization <= 1.0 {
                return Ok(ConnectionDesign {
                    feasible: true,
                    bolt_count: Some(np),
                    hole_diameter_cm: d,
                    bolt_area_cm2: bolt_area,
                    shear_planes: planes,
                    bearing_factor: Some(fp),
                    shear_capacity_kgf: fc,
                    bearing_capacity_kgf: admissible_bearing * contact_area,
                    utilization,
                    minoration: phi,
                });
            }
        }
    }

    tracing::debug!(
        profile = %profile.name,
        %kind,
        force_kgf,
        start,
        max_bolts,
        "no admissible bolt/bearing combination"
    );
    Ok(ConnectionDesign::infeasible(d, bolt_area, planes, phi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_grades, test_profile};

    const FV: f64 = 3000.0;

    /// t = 0.5, grade A36 (fu 4000)
    fn angle() -> Profile {
        test_profile("C", 5.0, 1.5, 1.0, 5.0, 0.5, 0.6, 2.0, 3.9)
    }

    fn bolt_area() -> f64 {
        std::f64::consts::PI * (1.59f64 / 2.0).powi(2)
    }

    #[test]
    fn test_single_bolt_bracing() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let design = design_connection(&config, &grades, &angle(), BarKind::Diagonal, 2000.0).unwrap();

        // Fc = 0.9 * 1 * 1.9856 * 3000 = 5361.0
        assert!(design.feasible);
        assert_eq!(design.bolt_count, Some(1));
        assert!((design.shear_capacity_kgf - 0.9 * bolt_area() * FV).abs() < 1e-6);
        // Fe = 0.9 * 1.0833 * 4000 * 1.59 * 0.5 = 3100.5
        assert!((design.bearing_capacity_kgf - 3100.5).abs() < 0.1);
        assert!((design.bearing_factor.unwrap() - 1.3 / 1.2).abs() < 1e-12);
        assert!((design.utilization - 2000.0 / 3100.5).abs() < 1e-4);
    }

    #[test]
    fn test_falls_back_to_second_bearing_factor() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        // Above Fe(1.083) = 3100.5, below Fe(1.25) = 3577.5 and Fc = 5361
        let design = design_connection(&config, &grades, &angle(), BarKind::Horizontal, 3400.0).unwrap();
        assert_eq!(design.bolt_count, Some(1));
        assert_eq!(design.bearing_factor, Some(1.25));
        assert!(design.utilization <= 1.0);
    }

    #[test]
    fn test_adds_bolts_before_giving_up() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let design = design_connection(&config, &grades, &angle(), BarKind::Diagonal, 5000.0).unwrap();
        assert_eq!(design.bolt_count, Some(2));
        assert!(design.utilization <= 1.0);
    }

    #[test]
    fn test_infeasible_record() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let design = design_connection(&config, &grades, &angle(), BarKind::Diagonal, 50_000.0).unwrap();
        assert!(!design.feasible);
        assert_eq!(design.bolt_count, None);
        assert_eq!(design.bearing_factor, None);
        assert_eq!(design.shear_capacity_kgf, 0.0);
        assert_eq!(design.bearing_capacity_kgf, 0.0);
        assert_eq!(design.utilization, INFEASIBLE_CONNECTION_UTILIZATION);
        assert_eq!(design.utilization_for(1.0), INFEASIBLE_CONNECTION_UTILIZATION);
    }

    #[test]
    fn test_leg_bolt_counts_are_even() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let profile = angle();

        let light = design_connection(&config, &grades, &profile, BarKind::Leg, 100.0).unwrap();
        assert_eq!(light.bolt_count, Some(DEFAULT_MIN_LEG_BOLTS));

        // 4 bolts: Fe(1.25) = 0.9 * 1.25 * 4000 * 4 * 1.59 * 0.5 = 14310
        let heavy = design_connection(&config, &grades, &profile, BarKind::Leg, 15_000.0).unwrap();
        assert_eq!(heavy.bolt_count, Some(6));
    }

    #[test]
    fn test_profile_minimum_leg_bolts() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let mut profile = angle();
        profile.min_leg_bolts = Some(6);
        let design = design_connection(&config, &grades, &profile, BarKind::Leg, 100.0).unwrap();
        assert_eq!(design.bolt_count, Some(6));
    }

    #[test]
    fn test_never_exceeds_class_limit() {
        let mut config = SizingConfig::default();
        config.bolt_limits.leg = 4;
        let grades = fixture_grades();
        let design = design_connection(&config, &grades, &angle(), BarKind::Leg, 15_000.0).unwrap();
        assert!(!design.feasible);

        config.bolt_limits.leg = 20;
        for force in [1000.0, 8000.0, 20_000.0, 40_000.0, 60_000.0] {
            let design = design_connection(&config, &grades, &angle(), BarKind::Leg, force).unwrap();
            if let Some(np) = design.bolt_count {
                assert!(np <= 20);
                assert!(design.utilization <= 1.0);
            } else {
                assert_eq!(design.utilization, INFEASIBLE_CONNECTION_UTILIZATION);
            }
        }
    }

    #[test]
    fn test_shear_grows_with_bolts() {
        let area = bolt_area();
        let mut previous = 0.0;
        for np in 1..=10 {
            let fc = shear_capacity(0.9, np, area, FV, 1);
            assert!(fc > previous);
            previous = fc;
        }
        assert!((shear_capacity(0.9, 2, area, FV, 2) - 4.0 * shear_capacity(0.9, 1, area, FV, 1)).abs() < 1e-9);
    }

    #[test]
    fn test_escalation_start() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let profile = angle();
        let base = design_connection(&config, &grades, &profile, BarKind::Leg, 100.0).unwrap();
        let escalated =
            design_connection_from(&config, &grades, &profile, BarKind::Leg, 100.0, base.bolt_count.unwrap() + 2)
                .unwrap();
        assert_eq!(escalated.bolt_count, Some(6));
        assert!(escalated.shear_capacity_kgf > base.shear_capacity_kgf);
    }

    #[test]
    fn test_rebased_bearing() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let design = design_connection(&config, &grades, &angle(), BarKind::Diagonal, 2000.0).unwrap();

        let thicker = design.rebased_to(1.0, 4000.0, 2000.0);
        assert!((thicker.bearing_capacity_kgf - 2.0 * design.bearing_capacity_kgf).abs() < 1e-6);
        assert_eq!(thicker.shear_capacity_kgf, design.shear_capacity_kgf);
        assert!(thicker.utilization < design.utilization);
    }

    #[test]
    fn test_missing_bolt_grade() {
        let config = SizingConfig::default();
        let mut grades = fixture_grades();
        grades.bolt_grade = "A36".to_string();
        assert!(design_connection(&config, &grades, &angle(), BarKind::Diagonal, 1.0).is_err());
    }
}
