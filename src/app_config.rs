use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::style::StyleResolver;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Subtitle styling choices
    #[serde(default)]
    pub style: StyleConfig,

    /// Working directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// Where transcript segments come from
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// User-facing subtitle style options, resolved by [`StyleResolver`]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StyleConfig {
    /// Maximum words per emitted cue
    #[serde(default = "default_words_per_line")]
    pub words_per_line: usize,

    /// Color name (e.g. "yellow") or literal hex (e.g. "#FFA500")
    #[serde(default = "default_color")]
    pub color: String,

    /// Font weight, embedded verbatim in the style record
    #[serde(default = "default_font_weight")]
    pub font_weight: i32,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Shadow depth; 0 disables the shadow
    #[serde(default = "default_shadow_strength")]
    pub shadow_strength: f64,

    /// Scale-in animation on every cue
    #[serde(default)]
    pub bounce: bool,

    /// Screen position: bottom, middle, top, slightly-above-bottom (or 1-4)
    #[serde(default = "default_position")]
    pub position: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            words_per_line: default_words_per_line(),
            color: default_color(),
            font_weight: default_font_weight(),
            font_size: default_font_size(),
            shadow_strength: default_shadow_strength(),
            bounce: false,
            position: default_position(),
        }
    }
}

/// Working directory layout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    // @field: Source videos
    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,

    // @field: Extracted audio tracks
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    // @field: Rendered videos
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    // @field: Generated .ass documents
    #[serde(default = "default_subtitle_dir")]
    pub subtitle_dir: PathBuf,

    // @field: Font files searched by the renderer
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
}

impl PathsConfig {
    /// All directories the pipeline writes to or reads from
    pub fn all_dirs(&self) -> [&PathBuf; 5] {
        [
            &self.video_dir,
            &self.audio_dir,
            &self.output_dir,
            &self.subtitle_dir,
            &self.fonts_dir,
        ]
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            video_dir: default_video_dir(),
            audio_dir: default_audio_dir(),
            output_dir: default_output_dir(),
            subtitle_dir: default_subtitle_dir(),
            fonts_dir: default_fonts_dir(),
        }
    }
}

/// Segment source type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSourceKind {
    // @source: Run the speech-to-text tool on the extracted audio
    #[default]
    Transcribe,
    // @source: Import an existing .srt or .ass file
    SubtitleFile,
}

impl SegmentSourceKind {
    // @returns: Human readable source name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Transcribe => "Speech-to-text",
            Self::SubtitleFile => "Subtitle file",
        }
    }
}

impl std::fmt::Display for SegmentSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transcribe => write!(f, "transcribe"),
            Self::SubtitleFile => write!(f, "subtitle_file"),
        }
    }
}

impl std::str::FromStr for SegmentSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "transcribe" => Ok(Self::Transcribe),
            "subtitle_file" | "subtitle" => Ok(Self::SubtitleFile),
            _ => Err(anyhow!("Invalid segment source: {}", s)),
        }
    }
}

/// Speech-to-text settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptionConfig {
    /// Segment source to use
    #[serde(default)]
    pub source: SegmentSourceKind,

    /// Whisper-compatible executable
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    /// Model name passed to the executable
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Quantization passed to the executable
    #[serde(default = "default_compute_type")]
    pub compute_type: String,

    /// Spoken language code (ISO 639-1 or 639-2)
    #[serde(default = "default_language")]
    pub language: String,

    /// Subtitle file used by the `subtitle_file` source
    #[serde(default)]
    pub subtitle_file: Option<PathBuf>,

    /// Timeout for the transcription run in seconds
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            source: SegmentSourceKind::default(),
            binary: default_whisper_binary(),
            model: default_whisper_model(),
            compute_type: default_compute_type(),
            language: default_language(),
            subtitle_file: None,
            timeout_secs: default_transcription_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_words_per_line() -> usize {
    6
}

fn default_color() -> String {
    "white".to_string()
}

fn default_font_weight() -> i32 {
    400
}

fn default_font_size() -> u32 {
    48
}

fn default_shadow_strength() -> f64 {
    1.0
}

fn default_position() -> String {
    "bottom".to_string()
}

fn default_video_dir() -> PathBuf {
    PathBuf::from("videos")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_subtitle_dir() -> PathBuf {
    PathBuf::from("subtitles")
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_whisper_binary() -> String {
    "whisper-ctranslate2".to_string()
}

fn default_whisper_model() -> String {
    "small".to_string()
}

fn default_compute_type() -> String {
    "int8".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_transcription_timeout_secs() -> u64 {
    1800 // 30 minutes, long videos on CPU are slow
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Malformed colors and bad sizes fail here, before any external tool runs
        StyleResolver::resolve(&self.style)?;

        if self.transcription.source == SegmentSourceKind::Transcribe {
            crate::language_utils::validate_language_code(&self.transcription.language)?;

            if self.transcription.binary.trim().is_empty() {
                return Err(anyhow!("Transcription binary must not be empty"));
            }
        }

        if self.transcription.source == SegmentSourceKind::SubtitleFile
            && self.transcription.subtitle_file.is_none()
        {
            return Err(anyhow!(
                "A subtitle file path is required for the subtitle_file source"
            ));
        }

        Ok(())
    }
}
