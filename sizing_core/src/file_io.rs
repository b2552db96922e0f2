//! # File I/O Module
//!
//! Job and report file operations:
//! - **Atomic saves**: write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: refuse job files from an incompatible schema
//!
//! ## File Format
//!
//! Jobs are saved as `.tsj` files containing pretty-printed JSON (see
//! [`crate::job`]). Reports pair the job metadata with the sizing outcome
//! and, when sized, the weight takeoff.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sizing_core::file_io::{load_job, save_job};
//! use sizing_core::job::SizingJob;
//! use std::path::Path;
//!
//! let job = SizingJob::demo();
//! let path = Path::new("demo.tsj");
//!
//! save_job(&job, path).unwrap();
//! let loaded = load_job(path).unwrap();
//! assert_eq!(loaded.meta.job_id, "DEMO");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{SizingError, SizingResult};
use crate::job::{JobMetadata, SizingJob, SCHEMA_VERSION};
use crate::sizing::SizingOutcome;
use crate::weight::WeightSummary;

/// Sizing report written next to a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingReport {
    pub job: JobMetadata,

    pub generated: DateTime<Utc>,

    pub outcome: SizingOutcome,

    /// Present when the tower was sized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<WeightSummary>,
}

impl SizingReport {
    pub fn new(job: &SizingJob, outcome: SizingOutcome, weight: Option<WeightSummary>) -> Self {
        SizingReport {
            job: job.meta.clone(),
            generated: Utc::now(),
            outcome,
            weight,
        }
    }
}

/// Write `contents` to `path` through a synced temporary file.
fn write_atomic(path: &Path, contents: &[u8]) -> SizingResult<()> {
    let tmp_path = path.with_extension("tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        SizingError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        SizingError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        SizingError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SizingError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Save a job with atomic write semantics.
///
/// # Example
///
/// ```rust,no_run
/// use sizing_core::file_io::save_job;
/// use sizing_core::job::SizingJob;
/// use std::path::Path;
///
/// let job = SizingJob::new("Engineer", "TWR-001", "Tower");
/// save_job(&job, Path::new("tower.tsj"))?;
/// # Ok::<(), sizing_core::errors::SizingError>(())
/// ```
pub fn save_job(job: &SizingJob, path: &Path) -> SizingResult<()> {
    let json = serde_json::to_string_pretty(job)?;
    write_atomic(path, json.as_bytes())?;
    tracing::debug!(path = %path.display(), job = %job.meta.job_id, "job saved");
    Ok(())
}

/// Load a job file.
///
/// # Returns
///
/// * `Err(SizingError::VersionMismatch)` - File version is incompatible
/// * `Err(SizingError::SerializationError)` - Invalid JSON
/// * `Err(SizingError::FileError)` - I/O error
pub fn load_job(path: &Path) -> SizingResult<SizingJob> {
    let mut file = File::open(path).map_err(|e| {
        SizingError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        SizingError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let job: SizingJob = serde_json::from_str(&contents).map_err(|e| SizingError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&job.meta.version)?;

    tracing::debug!(
        path = %path.display(),
        job = %job.meta.job_id,
        members = job.input.members.len(),
        hypotheses = job.input.hypotheses.len(),
        "job loaded"
    );
    Ok(job)
}

/// Save a sizing report as pretty JSON (atomic).
pub fn save_report(report: &SizingReport, path: &Path) -> SizingResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    write_atomic(path, json.as_bytes())
}

/// Validate that a file version is compatible with the current schema.
///
/// Major versions must match; in 0.x a newer minor version is rejected.
fn validate_version(file_version: &str) -> SizingResult<()> {
    let mismatch = || SizingError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    if file_parts.is_empty() || current_parts.is_empty() || file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
