use async_trait::async_trait;
use log::info;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, SubtitleError};
use crate::subtitle_processor::{self, TranscriptSegment};

use super::SegmentSource;

/// Segments imported from an existing `.srt` or `.ass` file
#[derive(Debug, Clone)]
pub struct SubtitleFileSource {
    /// File to import
    path: PathBuf,
}

impl SubtitleFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SegmentSource for SubtitleFileSource {
    fn name(&self) -> &str {
        "subtitle file"
    }

    async fn load_segments(&self) -> Result<Vec<TranscriptSegment>, AppError> {
        if !self.path.is_file() {
            return Err(SubtitleError::Parse(format!("subtitle file not found: {:?}", self.path)).into());
        }

        let path = self.path.clone();
        let segments = tokio::task::spawn_blocking(move || subtitle_processor::parse_subtitle_file(path))
            .await
            .map_err(|e| AppError::Unknown(format!("subtitle import task failed: {}", e)))??;

        info!("Imported {} segments from {:?}", segments.len(), self.path);
        Ok(segments)
    }
}
