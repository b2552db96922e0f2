//! # Sizing Jobs
//!
//! A `SizingJob` bundles everything one sizing run needs with the metadata
//! identifying the job. Jobs serialize to `.tsj` (tower sizing job) files as
//! human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! SizingJob
//! ├── meta: JobMetadata (version, job id, engineer, timestamps)
//! └── (flattened) SizingInput
//!     ├── config: SizingConfig
//!     ├── materials: MaterialTable
//!     ├── profiles: ProfileCatalog
//!     ├── members: [Member]
//!     └── hypotheses: { name → { member id → force } }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::job::SizingJob;
//! use sizing_core::sizing::size_members;
//!
//! let job = SizingJob::demo();
//! let outcome = size_members(&job.input).unwrap();
//! assert!(outcome.is_sized());
//!
//! let json = serde_json::to_string_pretty(&job).unwrap();
//! assert!(json.contains("\"hypotheses\""));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hypothesis::ForceTable;
use crate::materials::{builtin_angle_profiles, builtin_grades};
use crate::member::{BarClass, Member, MemberId, PositionFlags};
use crate::sizing::SizingInput;

/// Current schema version for job files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root job container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingJob {
    pub meta: JobMetadata,

    #[serde(flatten)]
    pub input: SizingInput,
}

impl SizingJob {
    /// Create an empty job with default configuration and built-in grades.
    ///
    /// ```rust
    /// use sizing_core::job::SizingJob;
    ///
    /// let job = SizingJob::new("Jane Engineer", "TWR-042", "40 m self-supporting tower");
    /// assert_eq!(job.meta.engineer, "Jane Engineer");
    /// assert!(job.input.members.is_empty());
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        SizingJob {
            meta: JobMetadata {
                version: SCHEMA_VERSION.to_string(),
                job_id: job_id.into(),
                engineer: engineer.into(),
                description: description.into(),
                created: now,
                modified: now,
            },
            input: SizingInput::default(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Two-module demo tower on the built-in angle catalog.
    ///
    /// Modules are 4 m tall with legs braced at mid-height, one diagonal and
    /// one horizontal per module, loaded by wind from two opposite
    /// directions.
    pub fn demo() -> Self {
        let mut job = SizingJob::new("", "DEMO", "Two-module demo tower");
        job.input.profiles = builtin_angle_profiles();
        job.input.materials = builtin_grades();
        job.input.members = demo_members();
        job.input.hypotheses = demo_hypotheses();
        job
    }
}

impl Default for SizingJob {
    fn default() -> Self {
        SizingJob::new("", "", "")
    }
}

/// Job metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Job/project number
    pub job_id: String,

    /// Name of the responsible engineer
    pub engineer: String,

    #[serde(default)]
    pub description: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

// ============================================================================
// Demo Tower
// ============================================================================

fn demo_members() -> Vec<Member> {
    let bar = |id: u32, class: BarClass, length: f64, unbraced: Option<f64>, angle: f64, module: u32, y: (f64, f64)| {
        Member {
            id: MemberId::new(id),
            class,
            length_cm: length,
            unbraced_length_cm: unbraced,
            angle_deg: angle,
            modules: vec![module],
            y_min_cm: y.0,
            y_max_cm: y.1,
            position: PositionFlags::default(),
            chosen_profile: None,
        }
    };

    vec![
        bar(1, BarClass::LegLeft, 400.0, Some(200.0), 90.0, 2, (0.0, 400.0)),
        bar(2, BarClass::LegRight, 400.0, Some(200.0), 90.0, 2, (0.0, 400.0)),
        bar(3, BarClass::LegLeft, 400.0, Some(200.0), 90.0, 1, (400.0, 800.0)),
        bar(4, BarClass::LegRight, 400.0, Some(200.0), 90.0, 1, (400.0, 800.0)),
        bar(5, BarClass::Diagonal, 250.0, None, 53.1, 2, (0.0, 200.0)),
        bar(6, BarClass::Horizontal, 150.0, None, 0.0, 2, (200.0, 200.0)),
        bar(7, BarClass::Diagonal, 250.0, None, 53.1, 1, (400.0, 600.0)),
        bar(8, BarClass::Horizontal, 150.0, None, 180.0, 1, (600.0, 600.0)),
    ]
}

fn demo_hypotheses() -> ForceTable {
    let wind_0 = [
        (1, 14_000.0),
        (2, -16_000.0),
        (3, 6_000.0),
        (4, -7_000.0),
        (5, -1_800.0),
        (6, 350.0),
        (7, -900.0),
        (8, 150.0),
    ];

    let mut table = ForceTable::new();
    table.insert(
        "wind_0".to_string(),
        wind_0.iter().map(|&(id, f)| (MemberId::new(id), f)).collect(),
    );
    table.insert(
        "wind_180".to_string(),
        wind_0.iter().map(|&(id, f)| (MemberId::new(id), -f)).collect(),
    );
    table
}
