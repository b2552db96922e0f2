//! # Local-Buckling Yield Correction
//!
//! Reduces the effective yield stress of angles whose flanges are slender
//! enough to buckle locally before the member yields.
//!
//! The flange is classified by its utility width to thickness ratio
//! `w/t = (b - t - R) / t` against two limits that scale with `1/sqrt(Fy)`
//! (Fy in MPa):
//!
//! | Regime    | Condition              | Fy used                                 |
//! |-----------|------------------------|-----------------------------------------|
//! | Compact   | w/t ≤ 209.6/√Fy        | Fy                                      |
//! | Inelastic | w/t ≤ 377.28/√Fy       | (1.677 − 0.677·(w/t)/lower)·Fy          |
//! | Elastic   | above                  | 0.0332·π²·E/(w/t)²                      |
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::calculations::local_buckling::{correct_yield_stress, BucklingRegime};
//! use sizing_core::calculations::STEEL_ELASTIC_MODULUS;
//!
//! let compact = correct_yield_stress(8.0, 2500.0, STEEL_ELASTIC_MODULUS);
//! assert_eq!(compact.regime, BucklingRegime::Compact);
//! assert!((compact.fy_kgf_cm2 - 2500.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{KgfPerCm2, Megapascals};

/// Absolute width-to-thickness ceiling for any candidate profile
pub const WIDTH_THICKNESS_LIMIT: f64 = 25.0;

const LOWER_LIMIT_COEFF: f64 = 209.6;
const UPPER_LIMIT_COEFF: f64 = 377.28;
const ELASTIC_COEFF: f64 = 0.0332;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucklingRegime {
    Compact,
    Inelastic,
    Elastic,
}

/// Corrected yield stress and the quantities that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldCorrection {
    pub width_thickness_ratio: f64,
    /// Compact limit on w/t
    pub lower_limit: f64,
    /// Inelastic limit on w/t
    pub upper_limit: f64,
    pub regime: BucklingRegime,
    /// Yield stress to use in compression (kgf/cm²)
    pub fy_kgf_cm2: f64,
}

/// Correct the nominal yield stress `fy` (kgf/cm²) for flange slenderness.
///
/// `e` is the elastic modulus in kgf/cm².
pub fn correct_yield_stress(width_thickness_ratio: f64, fy: f64, e: f64) -> YieldCorrection {
    let fy_mpa = Megapascals::from(KgfPerCm2(fy)).value();
    let e_mpa = Megapascals::from(KgfPerCm2(e)).value();
    let wt = width_thickness_ratio;

    let lower_limit = LOWER_LIMIT_COEFF / fy_mpa.sqrt();
    let upper_limit = UPPER_LIMIT_COEFF / fy_mpa.sqrt();

    let (regime, corrected_mpa) = if wt <= lower_limit {
        (BucklingRegime::Compact, fy_mpa)
    } else if wt <= upper_limit {
        (
            BucklingRegime::Inelastic,
            (1.677 - 0.677 * wt / lower_limit) * fy_mpa,
        )
    } else {
        (
            BucklingRegime::Elastic,
            ELASTIC_COEFF * std::f64::consts::PI.powi(2) * e_mpa / wt.powi(2),
        )
    };

    YieldCorrection {
        width_thickness_ratio: wt,
        lower_limit,
        upper_limit,
        regime,
        fy_kgf_cm2: KgfPerCm2::from(Megapascals(corrected_mpa)).value(),
    }
}
