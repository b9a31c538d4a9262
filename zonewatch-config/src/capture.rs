//! Frame capture configuration.
//!
//! Defines where frames come from:
//! - a still file that an external grabber keeps overwriting
//! - a directory of images replayed in name order
//! - an external command that writes one image to stdout
//! - synthetic frames for simulation

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Still,
    Directory,
    Command,
    Simulated,
}

/// Frame capture configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CaptureConfig {
    /// Capture mode (still, directory, command, simulated).
    #[serde(default = "default_mode")]
    pub mode: CaptureMode,

    /// Image file (still) or image directory (directory).
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Program and arguments for command capture, e.g.
    /// `["ffmpeg", "-f", "v4l2", "-i", "/dev/video0", "-frames:v", "1", "-f", "mjpeg", "-"]`.
    #[serde(default)]
    pub command: Vec<String>,

    /// Mime type of command output.
    #[validate(custom(function = validation::validate_mime_type))]
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Maximum time a capture command may run (milliseconds).
    #[validate(range(min = 10, max = 60_000))]
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_mode() -> CaptureMode {
    CaptureMode::Still
}

fn default_mime_type() -> String {
    "image/jpeg".into()
}

fn default_timeout() -> u64 {
    3000
}

impl CaptureConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            path: None,
            command: Vec::new(),
            mime_type: default_mime_type(),
            timeout_ms: default_timeout(),
        }
    }
}
