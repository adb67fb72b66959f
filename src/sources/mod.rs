/*!
 * Segment sources.
 *
 * Transcript segments reach the synthesizer through one interface, whichever
 * way they were produced:
 * - `whisper`: extract the audio track and run a speech-to-text CLI on it
 * - `subtitle_file`: import an existing `.srt` or `.ass` file
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::{SegmentSourceKind, TranscriptionConfig};
use crate::errors::AppError;
use crate::subtitle_processor::TranscriptSegment;

/// Supplier of time-ordered transcript segments
#[async_trait]
pub trait SegmentSource: Send + Sync + Debug {
    /// Short name for log output
    fn name(&self) -> &str;

    /// Produce every segment, in time order
    ///
    /// # Returns
    /// * `Result<Vec<TranscriptSegment>, AppError>` - The full segment list, or the failure that aborts the run
    async fn load_segments(&self) -> Result<Vec<TranscriptSegment>, AppError>;
}

/// Build the configured source for one video.
///
/// `audio_path` is where the transcriber writes the extracted audio; the
/// subtitle file source ignores it.
pub fn from_config(
    config: &TranscriptionConfig,
    video_path: &Path,
    audio_path: &Path,
) -> anyhow::Result<Box<dyn SegmentSource>> {
    match config.source {
        SegmentSourceKind::Transcribe => Ok(Box::new(whisper::WhisperTranscriber::from_config(
            config, video_path, audio_path,
        )?)),
        SegmentSourceKind::SubtitleFile => {
            let path = config.subtitle_file.as_deref().ok_or_else(|| {
                anyhow::anyhow!("A subtitle file path is required for the subtitle_file source")
            })?;
            Ok(Box::new(subtitle_file::SubtitleFileSource::new(path)))
        }
    }
}

pub mod subtitle_file;
pub mod whisper;
