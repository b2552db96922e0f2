//! # Axial Capacity
//!
//! Allowable-stress check of a single angle under a signed axial force
//! (positive = tension).
//!
//! ## Compression
//!
//! Slenderness is `λ = L / r`, with `r = rx` for legs and `r = rz` for
//! bracing. Bracing uses the corrected slenderness `60 + λ/2` up to λ = 120.
//! Members beyond 150 (legs) or 200 (bracing, corrected) are rejected
//! outright. Otherwise the yield stress is corrected for local buckling and
//! the column curve gives
//!
//! ```text
//! Cc = π·√(2E/Fy)
//! Fa = (1 − ½(λ/Cc)²)·Fy      λ ≤ Cc
//! Fa = π²E/λ²                 λ > Cc
//! ```
//!
//! reduced by the minoration coefficient and compared against `|N| / Ag`.
//!
//! ## Tension
//!
//! `ft = φ·Fy` compared against `|N| / Ae`, where
//! `Ae = (Ag − n·(d + 0.3175)·t)·Ct` with `Ct = 1.0` for legs and `0.9`
//! for bracing. λ > 375 is rejected when the tension limit is requested.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::calculations::axial::{check_axial, AxialInput};
//! use sizing_core::materials::{builtin_angle_profiles, builtin_grades};
//! use sizing_core::member::BarKind;
//!
//! let catalog = builtin_angle_profiles();
//! let grades = builtin_grades();
//! let input = AxialInput {
//!     profile: catalog.lookup("L 65x65x6").unwrap(),
//!     force_kgf: -4500.0,
//!     kind: BarKind::Leg,
//!     effective_length_cm: 150.0,
//!     minoration: 0.9,
//!     hole_diameter_cm: 1.59,
//!     limit_tension_slenderness: false,
//!     force_compression_check: true,
//!     net_area_holes: None,
//! };
//! let check = check_axial(&grades, &input).unwrap();
//! assert!(check.feasible);
//! assert!(check.utilization.unwrap() < 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::local_buckling::correct_yield_stress;
use crate::calculations::STEEL_ELASTIC_MODULUS;
use crate::errors::SizingResult;
use crate::materials::{MaterialTable, Profile};
use crate::member::BarKind;

pub const LEG_SLENDERNESS_LIMIT: f64 = 150.0;
pub const BRACING_SLENDERNESS_LIMIT: f64 = 200.0;
pub const TENSION_SLENDERNESS_LIMIT: f64 = 375.0;

/// Added to the bolt diameter when deducting holes from the net area (cm)
pub const HOLE_CLEARANCE_CM: f64 = 0.3175;

/// Utilization reported when the admissible force vanishes
pub const INFEASIBLE_AXIAL_UTILIZATION: f64 = 9999.0;

/// Slenderness reported for a profile with zero radius of gyration
const UNBOUNDED_SLENDERNESS: f64 = 9999.0;

/// Stress reported for a zero working section
const UNBOUNDED_STRESS: f64 = 1e12;

/// Admissible forces at or below this are treated as zero
const NEGLIGIBLE_FORCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solicitation {
    Tension,
    Compression,
}

impl Solicitation {
    /// Tension for positive forces, compression otherwise (zero included)
    pub fn of(force_kgf: f64) -> Self {
        if force_kgf > 0.0 {
            Solicitation::Tension
        } else {
            Solicitation::Compression
        }
    }
}

/// Input for one axial check.
#[derive(Debug, Clone)]
pub struct AxialInput<'a> {
    pub profile: &'a Profile,
    /// Signed axial force, positive = tension (kgf)
    pub force_kgf: f64,
    pub kind: BarKind,
    /// Buckling length (cm)
    pub effective_length_cm: f64,
    pub minoration: f64,
    /// Bolt hole diameter (cm)
    pub hole_diameter_cm: f64,
    /// Reject tension members with λ > 375
    pub limit_tension_slenderness: bool,
    /// Apply compression slenderness limits regardless of the force sign
    pub force_compression_check: bool,
    /// Overrides the profile's net-area hole count
    pub net_area_holes: Option<u32>,
}

/// Result of one axial check.
///
/// A member rejected on slenderness carries only `solicitation` and
/// `feasible = false`; every other field is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxialCheck {
    pub solicitation: Option<Solicitation>,
    pub feasible: bool,
    /// |N| over the working section (kgf/cm²)
    pub acting_stress: Option<f64>,
    pub gross_area_cm2: Option<f64>,
    pub net_area_cm2: Option<f64>,
    pub admissible_force_kgf: Option<f64>,
    pub utilization: Option<f64>,
    pub corrected_slenderness: Option<f64>,
    pub corrected_fy: Option<f64>,
    pub fa: Option<f64>,
    pub fa_reduced: Option<f64>,
    pub ft_admissible: Option<f64>,
    pub tension_slenderness: Option<f64>,
}

impl AxialCheck {
    fn rejected(solicitation: Solicitation) -> Self {
        AxialCheck {
            solicitation: Some(solicitation),
            feasible: false,
            ..Default::default()
        }
    }

    /// Utilization, or the infeasible sentinel for slenderness rejections
    pub fn utilization_or_infeasible(&self) -> f64 {
        self.utilization.unwrap_or(INFEASIBLE_AXIAL_UTILIZATION)
    }
}

/// Corrected slenderness: bracing is amplified below λ = 120, legs are not.
pub fn corrected_slenderness(kind: BarKind, slenderness: f64) -> f64 {
    if !kind.is_leg() && slenderness <= 120.0 {
        60.0 + 0.5 * slenderness
    } else {
        slenderness
    }
}

/// Allowable compression stress Fa (before minoration).
pub fn allowable_compression_stress(slenderness: f64, e: f64, fy: f64) -> f64 {
    let pi = std::f64::consts::PI;
    let cc = pi * (2.0 * e / fy).sqrt();
    if slenderness <= cc {
        (1.0 - 0.5 * (slenderness / cc).powi(2)) * fy
    } else {
        pi.powi(2) * e / slenderness.powi(2)
    }
}

/// Net effective area for tension (cm²).
pub fn net_effective_area(profile: &Profile, kind: BarKind, hole_diameter_cm: f64, holes: u32) -> f64 {
    let efficiency = if kind.is_leg() { 1.0 } else { 0.9 };
    let deduction = holes as f64 * (hole_diameter_cm + HOLE_CLEARANCE_CM) * profile.thickness_cm;
    (profile.area_cm2 - deduction) * efficiency
}

/// Evaluate axial capacity of a profile under a signed force.
///
/// Fails only when the profile's grade is missing from the material table.
pub fn check_axial(materials: &MaterialTable, input: &AxialInput) -> SizingResult<AxialCheck> {
    let profile = input.profile;
    let grade = materials.for_profile(profile)?;
    let fy = grade.fy_kgf_cm2;
    let solicitation = Solicitation::of(input.force_kgf);
    let force = input.force_kgf.abs();

    let radius = profile.radius_for(input.kind);
    let slenderness = if radius > 0.0 {
        input.effective_length_cm / radius
    } else {
        UNBOUNDED_SLENDERNESS
    };
    let slenderness_c = corrected_slenderness(input.kind, slenderness);

    if solicitation == Solicitation::Compression || input.force_compression_check {
        let too_slender = if input.kind.is_leg() {
            slenderness > LEG_SLENDERNESS_LIMIT
        } else {
            slenderness_c > BRACING_SLENDERNESS_LIMIT
        };
        if too_slender {
            return Ok(AxialCheck::rejected(solicitation));
        }
    } else if input.limit_tension_slenderness && slenderness > TENSION_SLENDERNESS_LIMIT {
        return Ok(AxialCheck::rejected(solicitation));
    }

    let gross = profile.area_cm2;
    let holes = input.net_area_holes.unwrap_or(profile.net_area_holes);
    let net = net_effective_area(profile, input.kind, input.hole_diameter_cm, holes);

    let section = match solicitation {
        Solicitation::Compression => gross,
        Solicitation::Tension => net,
    };
    let acting_stress = if section != 0.0 {
        force / section
    } else {
        UNBOUNDED_STRESS
    };

    let mut check = AxialCheck {
        solicitation: Some(solicitation),
        acting_stress: Some(acting_stress),
        gross_area_cm2: Some(gross),
        net_area_cm2: Some(net),
        corrected_slenderness: Some(slenderness_c),
        ..Default::default()
    };

    let admissible = match solicitation {
        Solicitation::Compression => {
            let fy_corrected = correct_yield_stress(
                profile.width_thickness_ratio(),
                fy,
                STEEL_ELASTIC_MODULUS,
            )
            .fy_kgf_cm2;
            let fa = allowable_compression_stress(slenderness_c, STEEL_ELASTIC_MODULUS, fy_corrected);
            let fa_reduced = input.minoration * fa;

            check.corrected_fy = Some(fy_corrected);
            check.fa = Some(fa);
            check.fa_reduced = Some(fa_reduced);
            check.feasible = acting_stress <= fa_reduced;
            fa_reduced * gross
        }
        Solicitation::Tension => {
            let ft = input.minoration * fy;

            check.ft_admissible = Some(ft);
            check.tension_slenderness = Some(slenderness);
            check.feasible = acting_stress <= ft;
            ft * net
        }
    };

    check.admissible_force_kgf = Some(admissible);
    if admissible > NEGLIGIBLE_FORCE {
        check.utilization = Some(force / admissible);
    } else {
        check.utilization = Some(INFEASIBLE_AXIAL_UTILIZATION);
        check.feasible = false;
    }

    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_grades, test_profile};

    fn input<'a>(profile: &'a Profile, force: f64, kind: BarKind, length: f64) -> AxialInput<'a> {
        AxialInput {
            profile,
            force_kgf: force,
            kind,
            effective_length_cm: length,
            minoration: 0.9,
            hole_diameter_cm: 1.59,
            limit_tension_slenderness: true,
            force_compression_check: false,
            net_area_holes: None,
        }
    }

    /// A = 10, rx = 2, rz = 1.5, b = 6, t = 0.5, R = 0.5 (w/t = 10)
    fn plate_angle() -> Profile {
        test_profile("P", 10.0, 2.0, 1.5, 6.0, 0.5, 0.5, 2.0, 7.85)
    }

    #[test]
    fn test_leg_tension() {
        let grades = fixture_grades();
        let profile = plate_angle();
        let check = check_axial(&grades, &input(&profile, 5000.0, BarKind::Leg, 100.0)).unwrap();

        // Ae = 10 - 1 * (1.59 + 0.3175) * 0.5 = 9.04625
        assert_eq!(check.solicitation, Some(Solicitation::Tension));
        assert!((check.net_area_cm2.unwrap() - 9.04625).abs() < 1e-9);
        assert!((check.ft_admissible.unwrap() - 2250.0).abs() < 1e-9);
        assert!((check.admissible_force_kgf.unwrap() - 20354.06).abs() < 0.01);
        assert!((check.utilization.unwrap() - 0.24565).abs() < 1e-4);
        assert_eq!(check.tension_slenderness, Some(50.0));
        assert!(check.feasible);
    }

    #[test]
    fn test_bracing_net_area_efficiency() {
        let grades = fixture_grades();
        let profile = plate_angle();
        let check = check_axial(&grades, &input(&profile, 5000.0, BarKind::Diagonal, 100.0)).unwrap();
        assert!((check.net_area_cm2.unwrap() - 9.04625 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_net_area_hole_override() {
        let grades = fixture_grades();
        let profile = plate_angle();
        let mut axial = input(&profile, 5000.0, BarKind::Leg, 100.0);
        axial.net_area_holes = Some(2);
        let check = check_axial(&grades, &axial).unwrap();
        assert!((check.net_area_cm2.unwrap() - (10.0 - 2.0 * 1.9075 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_leg_compression_inelastic() {
        let grades = fixture_grades();
        let profile = plate_angle();
        let check = check_axial(&grades, &input(&profile, -10000.0, BarKind::Leg, 100.0)).unwrap();

        // lambda = 50, Cc = 126.88, Fa = 0.92235 * 2500
        assert_eq!(check.solicitation, Some(Solicitation::Compression));
        assert!((check.corrected_fy.unwrap() - 2500.0).abs() < 1e-6);
        assert!((check.fa.unwrap() - 2305.9).abs() < 1.0);
        let fa_reduced = check.fa_reduced.unwrap();
        assert!((fa_reduced - 0.9 * check.fa.unwrap()).abs() < 1e-9);
        assert!((check.admissible_force_kgf.unwrap() - fa_reduced * 10.0).abs() < 1e-6);
        assert!((check.acting_stress.unwrap() - 1000.0).abs() < 1e-9);
        assert!(check.feasible);
        assert!(check.tension_slenderness.is_none());
    }

    #[test]
    fn test_euler_branch() {
        let e = STEEL_ELASTIC_MODULUS;
        let fa = allowable_compression_stress(190.0, e, 2500.0);
        let euler = std::f64::consts::PI.powi(2) * e / (190.0 * 190.0);
        assert!((fa - euler).abs() < 1e-9);
        assert!((fa - 557.4).abs() < 0.5);
    }

    #[test]
    fn test_leg_slenderness_rejection() {
        let grades = fixture_grades();
        let profile = plate_angle();
        // 400 / 2.0 = 200 > 150
        let check = check_axial(&grades, &input(&profile, -100.0, BarKind::Leg, 400.0)).unwrap();
        assert!(!check.feasible);
        assert_eq!(check.solicitation, Some(Solicitation::Compression));
        assert!(check.utilization.is_none());
        assert!(check.admissible_force_kgf.is_none());
        assert_eq!(check.utilization_or_infeasible(), INFEASIBLE_AXIAL_UTILIZATION);
    }

    #[test]
    fn test_forced_compression_applies_to_tension() {
        let grades = fixture_grades();
        let profile = plate_angle();
        let mut axial = input(&profile, 100.0, BarKind::Leg, 400.0);
        assert!(check_axial(&grades, &axial).unwrap().feasible);

        axial.force_compression_check = true;
        let check = check_axial(&grades, &axial).unwrap();
        assert!(!check.feasible);
        assert_eq!(check.solicitation, Some(Solicitation::Tension));
    }

    #[test]
    fn test_tension_slenderness_limit() {
        let grades = fixture_grades();
        let profile = plate_angle();
        // 800 / 2.0 = 400 > 375
        let mut axial = input(&profile, 100.0, BarKind::Leg, 800.0);
        assert!(!check_axial(&grades, &axial).unwrap().feasible);

        axial.limit_tension_slenderness = false;
        assert!(check_axial(&grades, &axial).unwrap().feasible);
    }

    #[test]
    fn test_bracing_corrected_slenderness() {
        assert!((corrected_slenderness(BarKind::Diagonal, 66.0) - 93.0).abs() < 1e-9);
        assert_eq!(corrected_slenderness(BarKind::Diagonal, 150.0), 150.0);
        assert_eq!(corrected_slenderness(BarKind::Leg, 66.0), 66.0);

        let grades = fixture_grades();
        let profile = plate_angle();
        // 100 / 1.5 = 66.67 -> 93.33
        let check = check_axial(&grades, &input(&profile, -100.0, BarKind::Horizontal, 100.0)).unwrap();
        assert!((check.corrected_slenderness.unwrap() - 93.333).abs() < 1e-3);

        // 320 / 1.5 = 213 > 200
        let check = check_axial(&grades, &input(&profile, -100.0, BarKind::Horizontal, 320.0)).unwrap();
        assert!(!check.feasible);
    }

    #[test]
    fn test_vanishing_net_area() {
        let grades = fixture_grades();
        let profile = test_profile("THICK", 1.0, 1.0, 1.0, 5.0, 1.0, 0.5, 1.0, 1.0);
        let check = check_axial(&grades, &input(&profile, 500.0, BarKind::Leg, 10.0)).unwrap();
        assert!(check.net_area_cm2.unwrap() < 0.0);
        assert_eq!(check.utilization, Some(INFEASIBLE_AXIAL_UTILIZATION));
        assert!(!check.feasible);
    }

    #[test]
    fn test_repeatable() {
        let grades = fixture_grades();
        let profile = plate_angle();
        let axial = input(&profile, -7300.0, BarKind::Leg, 140.0);
        let first = check_axial(&grades, &axial).unwrap();
        let second = check_axial(&grades, &axial).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_grade() {
        let grades = fixture_grades();
        let mut profile = plate_angle();
        profile.grade = "X99".to_string();
        assert!(check_axial(&grades, &input(&profile, 1.0, BarKind::Leg, 1.0)).is_err());
    }
}
