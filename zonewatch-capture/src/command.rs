use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, warn};
use zonewatch_core::collaborators::{Frame, FrameSource};
use zonewatch_core::error::CaptureError;

/// Runs an external grabber and treats its stdout as one encoded image.
#[derive(Debug, Clone)]
pub struct CommandFrameSource {
    program: String,
    args: Vec<String>,
    mime_type: String,
    timeout: Duration,
}

impl CommandFrameSource {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        mime_type: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            mime_type: mime_type.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FrameSource for CommandFrameSource {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| {
                CaptureError::Unavailable(format!(
                    "{} did not finish within {:?}",
                    self.program, self.timeout
                ))
            })?
            .map_err(|e| CaptureError::Unavailable(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Capture command failed: {}", stderr.trim());
            return Err(CaptureError::Unavailable(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        if output.stdout.is_empty() {
            return Err(CaptureError::Unavailable(format!(
                "{} produced no image data",
                self.program
            )));
        }

        debug!("Captured {} bytes from {}", output.stdout.len(), self.program);
        Ok(Frame::new(Bytes::from(output.stdout), self.mime_type.clone()))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> CommandFrameSource {
        CommandFrameSource::new(
            "sh",
            vec!["-c".into(), script.into()],
            "image/jpeg",
            timeout,
        )
    }

    #[tokio::test]
    async fn stdout_becomes_the_frame() {
        let frame = sh("printf frame", Duration::from_secs(5))
            .capture()
            .await
            .unwrap();
        assert_eq!(&frame.data[..], b"frame");
        assert_eq!(frame.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn non_zero_exit_is_unavailable() {
        let err = sh("exit 3", Duration::from_secs(5))
            .capture()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[tokio::test]
    async fn empty_output_is_unavailable() {
        let err = sh("true", Duration::from_secs(5))
            .capture()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no image data"));
    }

    #[tokio::test]
    async fn slow_grabber_times_out() {
        let err = sh("sleep 5", Duration::from_millis(50))
            .capture()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not finish"));
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let source = CommandFrameSource::new(
            "zonewatch-no-such-grabber",
            Vec::new(),
            "image/jpeg",
            Duration::from_secs(1),
        );
        assert!(source.capture().await.is_err());
    }
}
