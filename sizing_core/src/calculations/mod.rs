//! # Normative Checks
//!
//! Pure functions evaluating one profile against one force. Every check
//! takes the catalogs explicitly and keeps no state between calls.
//!
//! - [`axial`] - tension and compression capacity, slenderness limits
//! - [`local_buckling`] - yield stress correction for slender flanges
//! - [`bending`] - midspan service load on near-horizontal bracing
//! - [`connection`] - bolt count and bearing factor search

pub mod axial;
pub mod bending;
pub mod connection;
pub mod local_buckling;

pub use axial::{check_axial, AxialCheck, AxialInput, Solicitation};
pub use bending::{axial_bending_utilization, check_bending, BendingCheck, MemberGeometry};
pub use connection::{design_connection, design_connection_from, ConnectionDesign};
pub use local_buckling::{correct_yield_stress, BucklingRegime, YieldCorrection, WIDTH_THICKNESS_LIMIT};

/// Steel elastic modulus (kgf/cm²)
pub const STEEL_ELASTIC_MODULUS: f64 = 2_038_894.0;
