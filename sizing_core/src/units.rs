//! # Unit Types
//!
//! Lightweight newtype wrappers for the technical metric system the tower
//! design code is written in. JSON stays clean (plain numbers) thanks to
//! `#[serde(transparent)]`.
//!
//! - Length: centimeters (cm), meters (m)
//! - Stress: kgf/cm², megapascals (MPa)
//!
//! The local-buckling limits are tabulated in MPa, so stresses cross the
//! kgf/cm² ↔ MPa boundary through [`KGF_CM2_PER_MPA`].
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::units::{KgfPerCm2, Megapascals, Centimeters, Meters};
//!
//! let fy = KgfPerCm2(2548.9);
//! let fy_mpa: Megapascals = fy.into();
//! assert!((fy_mpa.0 - 249.96).abs() < 0.01);
//!
//! let span: Meters = Centimeters(350.0).into();
//! assert_eq!(span.0, 3.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// kgf/cm² in one MPa
pub const KGF_CM2_PER_MPA: f64 = 10.1972;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in kgf/cm²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgfPerCm2(pub f64);

/// Stress in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

impl From<KgfPerCm2> for Megapascals {
    fn from(s: KgfPerCm2) -> Self {
        Megapascals(s.0 / KGF_CM2_PER_MPA)
    }
}

impl From<Megapascals> for KgfPerCm2 {
    fn from(s: Megapascals) -> Self {
        KgfPerCm2(s.0 * KGF_CM2_PER_MPA)
    }
}

// ============================================================================
// Linear Mass
// ============================================================================

/// Mass per length in kg/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerMeter(pub f64);

impl KgPerMeter {
    /// Mass in kg of a bar of the given length
    pub fn mass_of(self, length: Centimeters) -> f64 {
        self.0 * Meters::from(length).0
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(KgfPerCm2);
impl_arithmetic!(Megapascals);
