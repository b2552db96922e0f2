//! Steel grades and bolt material.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "bolt_grade": "A394",
//!   "grades": [
//!     { "name": "A36", "fy_kgf_cm2": 2530.0, "fu_kgf_cm2": 4080.0 },
//!     { "name": "A394", "fy_kgf_cm2": 6330.0, "fu_kgf_cm2": 8440.0, "bolt_shear_kgf_cm2": 3163.0 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SizingError, SizingResult};
use crate::materials::steel::Profile;

/// Grade supplying the bolt shear stress when none is configured
pub const DEFAULT_BOLT_GRADE: &str = "A394";

/// Mechanical properties of one steel grade (kgf/cm²).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelGrade {
    pub name: String,

    /// Yield stress
    pub fy_kgf_cm2: f64,

    /// Ultimate stress
    pub fu_kgf_cm2: f64,

    /// Allowable bolt shear stress, for bolt grades
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolt_shear_kgf_cm2: Option<f64>,
}

fn default_bolt_grade() -> String {
    DEFAULT_BOLT_GRADE.to_string()
}

/// Material table keyed by grade name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    /// Grade whose shear stress applies to every bolt
    #[serde(default = "default_bolt_grade")]
    pub bolt_grade: String,

    pub grades: Vec<SteelGrade>,
}

impl MaterialTable {
    pub fn new(grades: Vec<SteelGrade>) -> Self {
        MaterialTable {
            bolt_grade: DEFAULT_BOLT_GRADE.to_string(),
            grades,
        }
    }

    /// Look up a grade by name (case-insensitive)
    pub fn grade(&self, name: &str) -> SizingResult<&SteelGrade> {
        let name = name.trim();
        self.grades
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SizingError::material_not_found(name))
    }

    /// Grade of the profile's steel
    pub fn for_profile(&self, profile: &Profile) -> SizingResult<&SteelGrade> {
        self.grade(&profile.grade)
    }

    /// Allowable bolt shear stress of the configured bolt grade
    pub fn bolt_shear_stress(&self) -> SizingResult<f64> {
        let bolt = self.grade(&self.bolt_grade)?;
        bolt.bolt_shear_kgf_cm2.ok_or_else(|| {
            SizingError::invalid_input(
                "bolt_shear_kgf_cm2",
                &bolt.name,
                "Bolt grade has no shear stress",
            )
        })
    }
}

/// Structural and bolt grades used in tower work.
pub fn builtin_grades() -> MaterialTable {
    let grade = |name: &str, fy: f64, fu: f64, fv: Option<f64>| SteelGrade {
        name: name.to_string(),
        fy_kgf_cm2: fy,
        fu_kgf_cm2: fu,
        bolt_shear_kgf_cm2: fv,
    };

    MaterialTable::new(vec![
        grade("A36", 2530.0, 4080.0, None),
        grade("A572-50", 3515.0, 4570.0, None),
        grade("A394", 6330.0, 8440.0, Some(3163.0)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::steel::builtin_angle_profiles;

    #[test]
    fn test_grade_lookup() {
        let table = builtin_grades();
        assert_eq!(table.grade("a36").unwrap().fy_kgf_cm2, 2530.0);
        assert_eq!(table.grade("X99").unwrap_err().error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_profile_grade() {
        let table = builtin_grades();
        let catalog = builtin_angle_profiles();
        let angle = catalog.lookup("L 50x50x5").unwrap();
        assert_eq!(table.for_profile(angle).unwrap().name, "A572-50");
    }

    #[test]
    fn test_bolt_shear_stress() {
        let mut table = builtin_grades();
        assert_eq!(table.bolt_shear_stress().unwrap(), 3163.0);

        table.bolt_grade = "A36".to_string();
        assert!(table.bolt_shear_stress().is_err());
    }
}
