use std::time::Duration;

use thiserror::Error;

use crate::collaborators::FailureKind;

/// A report that parsed but violates a value invariant of [`crate::model::AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidResult {
    #[error("risk score {0} is outside [0, 100]")]
    RiskScoreOutOfRange(i64),

    #[error("{field} must be non-negative, got {value}")]
    NegativeCount { field: &'static str, value: i64 },

    #[error("{field} {value} does not fit the result model")]
    CountOverflow { field: &'static str, value: i64 },
}

/// The frame source could not deliver an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("capture unavailable: {0}")]
    Unavailable(String),
}

/// The external analyzer failed to produce a usable report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analysis service unreachable: {0}")]
    Unreachable(String),

    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("analysis service rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

/// Why a sampling cycle was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("invalid result: {0}")]
    Invalid(#[from] InvalidResult),
}

impl CycleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CycleError::Capture(_) => FailureKind::CaptureUnavailable,
            CycleError::Analysis(_) => FailureKind::AnalysisServiceError,
            CycleError::Invalid(_) => FailureKind::InvalidResult,
        }
    }
}

/// Zone registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    #[error("invalid zone id {0:?}")]
    InvalidId(String),

    #[error("duplicate zone id: {0}")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_errors_map_to_failure_kinds() {
        let capture: CycleError = CaptureError::Unavailable("denied".into()).into();
        let analysis: CycleError = AnalysisError::Timeout(Duration::from_secs(1)).into();
        let invalid: CycleError = InvalidResult::RiskScoreOutOfRange(101).into();

        assert_eq!(capture.kind(), FailureKind::CaptureUnavailable);
        assert_eq!(analysis.kind(), FailureKind::AnalysisServiceError);
        assert_eq!(invalid.kind(), FailureKind::InvalidResult);
    }

    #[test]
    fn invalid_result_message_names_the_field() {
        let err = InvalidResult::NegativeCount {
            field: "people_count",
            value: -3,
        };
        assert_eq!(err.to_string(), "people_count must be non-negative, got -3");
    }
}
