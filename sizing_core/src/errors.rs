//! # Error Types
//!
//! Structured error types for sizing_core. Every stage of a sizing run
//! returns [`SizingResult`]; the infeasibility variants are collapsed into
//! [`crate::sizing::SizingOutcome::Infeasible`] at the API boundary when
//! hard-stop is disabled, everything else always propagates.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::errors::{SizingError, SizingResult};
//!
//! fn validate_minoration(phi: f64) -> SizingResult<()> {
//!     if phi <= 0.0 || phi > 1.0 {
//!         return Err(SizingError::invalid_input(
//!             "minoration",
//!             phi.to_string(),
//!             "Minoration coefficient must be in (0, 1]",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_minoration(0.9).is_ok());
//! assert!(validate_minoration(1.2).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::member::MemberId;

/// Result type alias for sizing_core operations
pub type SizingResult<T> = Result<T, SizingError>;

/// Structured error type for sizing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SizingError {
    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Profile name not present in the catalog
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// Steel grade not present in the material table
    #[error("Material not found: {grade}")]
    MaterialNotFound { grade: String },

    /// Member referenced by a hypothesis has no metadata
    #[error("Member not found: {member}")]
    MemberNotFound { member: MemberId },

    /// No profile passed every check for any critical hypothesis
    #[error("No viable profile for member(s) {}", join_ids(.members))]
    InfeasibleMembers { members: Vec<MemberId> },

    /// No governing connection exists for a module extremity
    #[error("No viable connection for module {module} {position} (members {})", join_ids(.members))]
    GroupConnectionInfeasible {
        module: u32,
        position: String,
        members: Vec<MemberId>,
    },

    /// Leg reinforcement did not converge within the cycle cap
    #[error("Leg reinforcement did not converge after {cycles} cycles (members {})", join_ids(.members))]
    ReinforcementNotConverged { cycles: u32, members: Vec<MemberId> },

    /// A reinforced member fails axial or bending after its profile change
    #[error("Member {member} fails axial/bending checks for hypothesis '{hypothesis}' after reinforcement")]
    ReinforcementRegression { member: MemberId, hypothesis: String },

    /// A connection-required member still exceeds its connection capacity
    #[error("Connection of member {member} remains overstressed (utilization {utilization:.3})")]
    ConnectionOverstressed { member: MemberId, utilization: f64 },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

fn join_ids(ids: &[MemberId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SizingError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SizingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ProfileNotFound error
    pub fn profile_not_found(name: impl Into<String>) -> Self {
        SizingError::ProfileNotFound { name: name.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(grade: impl Into<String>) -> Self {
        SizingError::MaterialNotFound { grade: grade.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SizingError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error reports an infeasible tower configuration rather
    /// than bad data. Only these are softened when hard-stop is disabled.
    pub fn is_infeasibility(&self) -> bool {
        matches!(
            self,
            SizingError::InfeasibleMembers { .. }
                | SizingError::GroupConnectionInfeasible { .. }
                | SizingError::ReinforcementNotConverged { .. }
                | SizingError::ReinforcementRegression { .. }
                | SizingError::ConnectionOverstressed { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SizingError::InvalidInput { .. } => "INVALID_INPUT",
            SizingError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            SizingError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            SizingError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            SizingError::InfeasibleMembers { .. } => "INFEASIBLE_MEMBER",
            SizingError::GroupConnectionInfeasible { .. } => "GROUP_CONNECTION_INFEASIBLE",
            SizingError::ReinforcementNotConverged { .. } => "REINFORCEMENT_NOT_CONVERGED",
            SizingError::ReinforcementRegression { .. } => "REINFORCEMENT_REGRESSION",
            SizingError::ConnectionOverstressed { .. } => "CONNECTION_OVERSTRESSED",
            SizingError::FileError { .. } => "FILE_ERROR",
            SizingError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SizingError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for SizingError {
    fn from(e: serde_json::Error) -> Self {
        SizingError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SizingError::InfeasibleMembers {
            members: vec![MemberId::new(3), "12a".parse().unwrap()],
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InfeasibleMembers"));
        assert!(json.contains("12a"));
        let roundtrip: SizingError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SizingError::profile_not_found("L 50x5").error_code(), "PROFILE_NOT_FOUND");
        assert_eq!(SizingError::material_not_found("A36").error_code(), "MATERIAL_NOT_FOUND");
        let err = SizingError::ReinforcementNotConverged { cycles: 10, members: vec![] };
        assert_eq!(err.error_code(), "REINFORCEMENT_NOT_CONVERGED");
    }

    #[test]
    fn test_infeasibility_classification() {
        let infeasible = SizingError::ReinforcementRegression {
            member: MemberId::new(7),
            hypothesis: "wind_0".to_string(),
        };
        assert!(infeasible.is_infeasibility());
        assert!(!SizingError::material_not_found("A36").is_infeasibility());
        assert!(!SizingError::invalid_input("minoration", "0", "must be positive").is_infeasibility());
    }

    #[test]
    fn test_message_lists_members() {
        let err = SizingError::InfeasibleMembers {
            members: vec![MemberId::new(2), MemberId::with_suffix(10, 'b')],
        };
        assert_eq!(err.to_string(), "No viable profile for member(s) 2, 10b");
    }
}
