use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use zonewatch_core::collaborators::{Frame, FrameSource};
use zonewatch_core::error::CaptureError;

use crate::mime_for_path;

/// Replays the images of a directory in file-name order, wrapping around.
/// The directory is re-listed on every capture so new files are picked up.
#[derive(Debug)]
pub struct DirectoryFrameSource {
    dir: PathBuf,
    cursor: Mutex<usize>,
}

impl DirectoryFrameSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cursor: Mutex::new(0),
        }
    }

    async fn list_images(&self) -> Result<Vec<PathBuf>, CaptureError> {
        let unavailable = |e: std::io::Error| {
            CaptureError::Unavailable(format!("{}: {e}", self.dir.display()))
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(unavailable)?;
        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let path = entry.path();
            if is_image(&path) {
                images.push(path);
            }
        }
        images.sort();
        Ok(images)
    }
}

fn is_image(path: &Path) -> bool {
    path.is_file() && mime_for_path(path).is_some()
}

#[async_trait]
impl FrameSource for DirectoryFrameSource {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        let images = self.list_images().await?;
        if images.is_empty() {
            return Err(CaptureError::Unavailable(format!(
                "no images in {}",
                self.dir.display()
            )));
        }

        let path = {
            let mut cursor = self.cursor.lock();
            let path = images[*cursor % images.len()].clone();
            *cursor = cursor.wrapping_add(1);
            path
        };

        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| CaptureError::Unavailable(format!("{}: {e}", path.display())))?;
        let mime = mime_for_path(&path).unwrap_or("image/jpeg");

        debug!("Replaying {}", path.display());
        Ok(Frame::new(Bytes::from(data), mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cycles_through_images_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"B").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"A").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let source = DirectoryFrameSource::new(dir.path());
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(source.capture().await.unwrap().data.to_vec());
        }
        assert_eq!(seen, vec![b"A".to_vec(), b"B".to_vec(), b"A".to_vec()]);
    }

    #[tokio::test]
    async fn empty_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirectoryFrameSource::new(dir.path())
            .capture()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no images"));
    }
}
