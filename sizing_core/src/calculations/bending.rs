//! # Simple Bending
//!
//! Bracing members inclined within 45° of horizontal must carry a 100 kgf
//! service load at midspan (a lineman standing on the bar):
//!
//! ```text
//! M  = 100 · L / 4
//! Mr = Wx · Fy · φ
//! ```
//!
//! Legs and steeper bracing pass automatically.

use serde::{Deserialize, Serialize};

use crate::calculations::axial::{check_axial, AxialInput};
use crate::config::SizingConfig;
use crate::errors::SizingResult;
use crate::materials::{MaterialTable, Profile};
use crate::member::BarKind;

/// Concentrated service load at midspan (kgf)
pub const SERVICE_LOAD_KGF: f64 = 100.0;

/// Utilization reported by the combined check when bending fails
pub const BENDING_FAILURE_UTILIZATION: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendingCheck {
    /// Whether the bending criterion applies to this member at all
    pub applies: bool,
    pub moment_kgf_cm: f64,
    pub resisting_moment_kgf_cm: f64,
    pub passes: bool,
}

/// Whether an inclination falls in one of the near-horizontal bands.
///
/// The angle is first normalized into [0, 360).
pub fn in_bending_band(angle_deg: f64) -> bool {
    let a = angle_deg.rem_euclid(360.0);
    (0.0..=45.0).contains(&a) || (135.0..=225.0).contains(&a) || (315.0..=360.0).contains(&a)
}

pub fn check_bending(
    profile: &Profile,
    fy: f64,
    kind: BarKind,
    angle_deg: f64,
    length_cm: f64,
    minoration: f64,
) -> BendingCheck {
    if kind.is_leg() || !in_bending_band(angle_deg) {
        return BendingCheck {
            applies: false,
            moment_kgf_cm: 0.0,
            resisting_moment_kgf_cm: 0.0,
            passes: true,
        };
    }

    let moment = SERVICE_LOAD_KGF * length_cm / 4.0;
    let resisting = profile.wx_cm3 * fy * minoration;
    BendingCheck {
        applies: true,
        moment_kgf_cm: moment,
        resisting_moment_kgf_cm: resisting,
        passes: moment <= resisting,
    }
}

/// Member geometry needed by the combined check.
#[derive(Debug, Clone, Copy)]
pub struct MemberGeometry {
    pub kind: BarKind,
    /// Buckling length (cm)
    pub effective_length_cm: f64,
    /// Real length (cm), loaded in bending
    pub length_cm: f64,
    pub angle_deg: f64,
}

/// Combined axial + bending utilization.
///
/// Axial is checked with the compression slenderness limits forced on and the
/// tension limit relaxed. Returns the larger of the axial utilization and
/// the bending penalty (0 when bending passes, 999 otherwise).
pub fn axial_bending_utilization(
    config: &SizingConfig,
    materials: &MaterialTable,
    profile: &Profile,
    force_kgf: f64,
    geometry: &MemberGeometry,
) -> SizingResult<f64> {
    let axial = check_axial(
        materials,
        &AxialInput {
            profile,
            force_kgf,
            kind: geometry.kind,
            effective_length_cm: geometry.effective_length_cm,
            minoration: config.minoration,
            hole_diameter_cm: config.hole_diameter(geometry.kind),
            limit_tension_slenderness: false,
            force_compression_check: true,
            net_area_holes: config.net_area_holes.get(geometry.kind),
        },
    )?;

    let fy = materials.for_profile(profile)?.fy_kgf_cm2;
    let bending = check_bending(
        profile,
        fy,
        geometry.kind,
        geometry.angle_deg,
        geometry.length_cm,
        config.minoration,
    );
    let bending_penalty = if bending.passes { 0.0 } else { BENDING_FAILURE_UTILIZATION };

    Ok(axial.utilization_or_infeasible().max(bending_penalty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_grades, test_profile};

    #[test]
    fn test_bands() {
        assert!(in_bending_band(0.0));
        assert!(in_bending_band(45.0));
        assert!(!in_bending_band(45.1));
        assert!(!in_bending_band(90.0));
        assert!(in_bending_band(180.0));
        assert!(!in_bending_band(270.0));
        assert!(in_bending_band(330.0));
        // normalized
        assert!(in_bending_band(-30.0));
        assert!(!in_bending_band(-90.0));
        assert!(in_bending_band(540.0));
    }

    #[test]
    fn test_horizontal_bending() {
        let profile = test_profile("H", 3.0, 1.2, 0.8, 4.0, 0.4, 0.5, 1.2, 2.4);
        // M = 100 * 100 / 4 = 2500, Mr = 1.2 * 2500 * 0.9 = 2700
        let check = check_bending(&profile, 2500.0, BarKind::Horizontal, 0.0, 100.0, 0.9);
        assert!(check.applies);
        assert_eq!(check.moment_kgf_cm, 2500.0);
        assert!((check.resisting_moment_kgf_cm - 2700.0).abs() < 1e-9);
        assert!(check.passes);

        let long = check_bending(&profile, 2500.0, BarKind::Horizontal, 0.0, 120.0, 0.9);
        assert!(!long.passes);
    }

    #[test]
    fn test_exempt_members() {
        let profile = test_profile("H", 3.0, 1.2, 0.8, 4.0, 0.4, 0.5, 0.01, 2.4);
        assert!(check_bending(&profile, 2500.0, BarKind::Leg, 0.0, 500.0, 0.9).passes);
        let steep = check_bending(&profile, 2500.0, BarKind::Diagonal, 60.0, 500.0, 0.9);
        assert!(!steep.applies);
        assert!(steep.passes);
    }

    #[test]
    fn test_combined_takes_worst() {
        let config = SizingConfig::default();
        let grades = fixture_grades();
        let profile = test_profile("H", 3.0, 1.2, 0.8, 4.0, 0.4, 0.5, 1.2, 2.4);
        let geometry = MemberGeometry {
            kind: BarKind::Horizontal,
            effective_length_cm: 100.0,
            length_cm: 100.0,
            angle_deg: 0.0,
        };
        let combined = axial_bending_utilization(&config, &grades, &profile, -500.0, &geometry).unwrap();
        assert!(combined > 0.0 && combined < 1.0);

        let geometry = MemberGeometry {
            length_cm: 200.0,
            effective_length_cm: 120.0,
            ..geometry
        };
        let combined = axial_bending_utilization(&config, &grades, &profile, -500.0, &geometry).unwrap();
        assert_eq!(combined, BENDING_FAILURE_UTILIZATION);
    }
}
