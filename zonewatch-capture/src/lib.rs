//! # zonewatch capture
//!
//! Frame sources that feed the sensing loop from a camera grabber.

pub mod command;
pub mod directory;
pub mod still;

use std::path::Path;
use std::sync::Arc;

use zonewatch_config::{CaptureConfig, CaptureMode, ConfigError};
use zonewatch_core::collaborators::FrameSource;

pub use command::CommandFrameSource;
pub use directory::DirectoryFrameSource;
pub use still::StillFrameSource;

/// Mime type for a supported image extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Builds the live frame source described by the configuration.
///
/// Simulated capture lives in `zonewatch-simulator` and is rejected here.
pub fn from_config(config: &CaptureConfig) -> Result<Arc<dyn FrameSource>, ConfigError> {
    match config.mode {
        CaptureMode::Still => {
            let path = config.path.as_ref().ok_or(ConfigError::Missing("capture.path"))?;
            Ok(Arc::new(StillFrameSource::new(path)))
        }
        CaptureMode::Directory => {
            let path = config.path.as_ref().ok_or(ConfigError::Missing("capture.path"))?;
            Ok(Arc::new(DirectoryFrameSource::new(path)))
        }
        CaptureMode::Command => {
            let (program, args) = config
                .command
                .split_first()
                .ok_or(ConfigError::Missing("capture.command"))?;
            Ok(Arc::new(CommandFrameSource::new(
                program.clone(),
                args.to_vec(),
                config.mime_type.clone(),
                config.timeout(),
            )))
        }
        CaptureMode::Simulated => Err(ConfigError::Unsupported(
            "capture.mode `simulated` only applies to `zonewatch simulate`".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn recognises_image_extensions() {
        assert_eq!(mime_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("x.webp")), Some("image/webp"));
        assert_eq!(mime_for_path(Path::new("x.gif")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn still_mode_needs_a_path() {
        let config = CaptureConfig::default();
        assert!(matches!(
            from_config(&config),
            Err(ConfigError::Missing("capture.path"))
        ));

        let config = CaptureConfig {
            path: Some(PathBuf::from("/tmp/frame.jpg")),
            ..CaptureConfig::default()
        };
        assert!(from_config(&config).is_ok());
    }

    #[test]
    fn command_mode_needs_a_program() {
        let config = CaptureConfig {
            mode: CaptureMode::Command,
            ..CaptureConfig::default()
        };
        assert!(matches!(
            from_config(&config),
            Err(ConfigError::Missing("capture.command"))
        ));
    }

    #[test]
    fn simulated_mode_is_not_a_live_source() {
        let config = CaptureConfig {
            mode: CaptureMode::Simulated,
            ..CaptureConfig::default()
        };
        assert!(matches!(
            from_config(&config),
            Err(ConfigError::Unsupported(_))
        ));
    }
}
