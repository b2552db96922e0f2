//! # Materials Database
//!
//! Profile catalogs and steel grades consumed by the checks. Both are
//! read-only for the duration of a sizing run and are passed explicitly
//! into every evaluator.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::materials::{builtin_angle_profiles, builtin_grades};
//!
//! let catalog = builtin_angle_profiles();
//! let grades = builtin_grades();
//!
//! let angle = catalog.lookup("L 65x65x6").unwrap();
//! let steel = grades.for_profile(angle).unwrap();
//! println!("{}: fy = {} kgf/cm²", angle.name, steel.fy_kgf_cm2);
//! ```

pub mod grades;
pub mod steel;

pub use grades::{builtin_grades, MaterialTable, SteelGrade, DEFAULT_BOLT_GRADE};
pub use steel::{builtin_angle_profiles, Profile, ProfileCatalog, ProfileUsage, DEFAULT_GRADE};
