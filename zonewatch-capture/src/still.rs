use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;
use zonewatch_core::collaborators::{Frame, FrameSource};
use zonewatch_core::error::CaptureError;

use crate::mime_for_path;

/// Reads the same image path on every capture. Pair it with a grabber that
/// keeps overwriting the file.
#[derive(Debug, Clone)]
pub struct StillFrameSource {
    path: PathBuf,
}

impl StillFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FrameSource for StillFrameSource {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        let mime = mime_for_path(&self.path).ok_or_else(|| {
            CaptureError::Unavailable(format!("{} is not a supported image", self.path.display()))
        })?;
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CaptureError::Unavailable(format!("{}: {e}", self.path.display())))?;

        if data.is_empty() {
            return Err(CaptureError::Unavailable(format!(
                "{} is empty",
                self.path.display()
            )));
        }

        trace!("Read {} byte frame from {}", data.len(), self.path.display());
        Ok(Frame::new(Bytes::from(data), mime))
    }
}
