//! # sizing_core - Lattice Tower Member and Connection Sizing
//!
//! `sizing_core` selects steel angle profiles for every member of a modular
//! lattice tower and designs the bolted splices at module extremities, given
//! the axial forces of each load hypothesis. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure evaluators**: axial, bending and connection checks take catalogs
//!   and configuration as explicit parameters
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types naming the offending members
//! - **Two failure modes**: infeasible towers are errors with hard stop, or an
//!   empty outcome without it
//!
//! ## Quick Start
//!
//! ```rust
//! use sizing_core::job::SizingJob;
//! use sizing_core::sizing::size_members;
//!
//! let job = SizingJob::demo();
//! let outcome = size_members(&job.input).unwrap();
//! for (id, result) in &outcome.output().unwrap().results {
//!     println!("{id}: {}", result.profile);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`sizing`] - Sizing pipeline and results
//! - [`calculations`] - Axial, local-buckling, bending and connection checks
//! - [`classifier`] - Leg position flags, connection-required legs, mirrors
//! - [`hypothesis`] - Force tables and critical case selection
//! - [`materials`] - Profile catalogs and steel grades
//! - [`member`] - Member identifiers, classes and metadata
//! - [`config`] - Sizing configuration
//! - [`weight`] - Weight takeoff
//! - [`job`] - Job container and metadata
//! - [`file_io`] - Job and report files with atomic saves
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod hypothesis;
pub mod job;
pub mod materials;
pub mod member;
pub mod sizing;
pub mod units;
pub mod weight;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at crate root for convenience
pub use config::SizingConfig;
pub use errors::{SizingError, SizingResult};
pub use file_io::{load_job, save_job, save_report, SizingReport};
pub use job::{JobMetadata, SizingJob};
pub use member::{BarClass, BarKind, Member, MemberId};
pub use sizing::{size_members, SizingInput, SizingOutcome};
