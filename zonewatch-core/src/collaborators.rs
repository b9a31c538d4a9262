//! Interfaces to the world outside the sensing loop: where frames come from,
//! who analyzes them, and who hears about failed cycles.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, CaptureError};
use crate::model::AnalysisReport;

/// One captured still image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Bytes,
    pub mime_type: String,
}

impl Frame {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn jpeg(data: impl Into<Bytes>) -> Self {
        Self::new(data, "image/jpeg")
    }
}

#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Grabs the current frame.
    async fn capture(&self) -> Result<Frame, CaptureError>;
}

const PRIVACY_DIRECTIVE: &str = "Analyze this surveillance frame for crowd and traffic \
conditions. Report only aggregate, anonymous information: approximate number of people, \
number of vehicles, crowd density (Low, Medium, High or Critical), traffic flow (Smooth, \
Moderate, Congested or Stalled) and an overall safety risk score from 0 to 100. Do not \
identify, describe or track any individual person, face, clothing, licence plate or other \
personally identifying detail. Give a one-sentence summary of the scene and a one-sentence \
prediction of how conditions are likely to develop.";

/// Fixed directive sent with every frame. It cannot be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    text: &'static str,
}

impl Instruction {
    pub const fn privacy_directive() -> Self {
        Self {
            text: PRIVACY_DIRECTIVE,
        }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        frame: &Frame,
        instruction: &Instruction,
    ) -> Result<AnalysisReport, AnalysisError>;
}

/// Failure classes surfaced to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    CaptureUnavailable,
    AnalysisServiceError,
    InvalidResult,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::CaptureUnavailable => "capture_unavailable",
            FailureKind::AnalysisServiceError => "analysis_service_error",
            FailureKind::InvalidResult => "invalid_result",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of one abandoned cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Observability collaborator.
pub trait FailureSink: Send + Sync {
    fn report(&self, failure: &FailureReport);
}
