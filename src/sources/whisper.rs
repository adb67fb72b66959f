use anyhow::Context;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

use crate::app_config::TranscriptionConfig;
use crate::errors::{AppError, PipelineError, SubtitleError};
use crate::language_utils;
use crate::media;
use crate::subtitle_processor::TranscriptSegment;

use super::SegmentSource;

/// Segment list as written by whisper-style CLIs with `--output_format json`
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    #[serde(default)]
    text: String,
}

/// Speech-to-text through an external whisper-compatible CLI
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    /// Executable to run
    binary: String,
    /// Model name
    model: String,
    /// Quantization, e.g. int8
    compute_type: String,
    /// ISO 639-1 language code
    language: String,
    /// Video the audio is taken from
    video_path: PathBuf,
    /// Where the extracted audio is written
    audio_path: PathBuf,
    /// Limit for the transcription run
    timeout: Duration,
}

impl WhisperTranscriber {
    pub fn from_config(
        config: &TranscriptionConfig,
        video_path: &Path,
        audio_path: &Path,
    ) -> anyhow::Result<Self> {
        let language = language_utils::normalize_to_part1_or_part2t(&config.language)
            .context("Invalid transcription language")?;

        Ok(Self {
            binary: config.binary.clone(),
            model: config.model.clone(),
            compute_type: config.compute_type.clone(),
            language,
            video_path: video_path.to_path_buf(),
            audio_path: audio_path.to_path_buf(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Command-line arguments for transcribing `audio_path` into `output_dir`
    pub fn build_args(&self, output_dir: &Path) -> Vec<String> {
        vec![
            self.audio_path.to_string_lossy().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--language".to_string(),
            self.language.clone(),
            "--compute_type".to_string(),
            self.compute_type.clone(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
        ]
    }

    async fn transcribe(&self) -> Result<Vec<TranscriptSegment>, AppError> {
        let output_dir = TempDir::new()?;
        let args = self.build_args(output_dir.path());

        let start = Instant::now();
        media::run_tool(&self.binary, &args, self.timeout).await?;
        debug!("Transcription finished in {:.2} s", start.elapsed().as_secs_f64());

        let stem = self
            .audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());
        let json_path = output_dir.path().join(format!("{}.json", stem));

        let content = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            PipelineError::ExternalTool {
                tool: self.binary.clone(),
                message: format!("no transcript at {:?}: {}", json_path, e),
            }
        })?;

        Ok(parse_whisper_json(&content)?)
    }
}

#[async_trait]
impl SegmentSource for WhisperTranscriber {
    fn name(&self) -> &str {
        "speech-to-text"
    }

    async fn load_segments(&self) -> Result<Vec<TranscriptSegment>, AppError> {
        info!("Extracting audio from {:?}", self.video_path);
        media::extract_audio(&self.video_path, &self.audio_path).await?;

        let language_name = language_utils::get_language_name(&self.language)
            .unwrap_or_else(|_| self.language.clone());
        info!("Running speech-to-text ({}, model {}, language {})", self.binary, self.model, language_name);
        let segments = self.transcribe().await?;

        info!("Transcribed {} segments", segments.len());
        Ok(segments)
    }
}

/// Parse a whisper JSON transcript into segments, keeping their order
pub fn parse_whisper_json(content: &str) -> Result<Vec<TranscriptSegment>, SubtitleError> {
    let output: WhisperOutput = serde_json::from_str(content)
        .map_err(|e| SubtitleError::Parse(format!("invalid transcript JSON: {}", e)))?;

    Ok(output
        .segments
        .into_iter()
        .map(|s| TranscriptSegment::new(s.start, s.end, s.text))
        .collect())
}
