/*!
 * Error types for the subburn application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving user-facing style choices
#[derive(Error, Debug, PartialEq)]
pub enum StyleError {
    /// A literal color that is not a six-digit hex RGB value
    #[error("Malformed color '{input}': expected a color name or #RRGGBB")]
    MalformedColor {
        /// The color string as supplied by the user
        input: String,
    },

    /// Words per line must allow at least one word
    #[error("Words per line must be at least 1")]
    InvalidWordsPerLine,

    /// Font size must be a positive point size
    #[error("Font size must be at least 1")]
    InvalidFontSize,

    /// Shadow strength must be a finite, non-negative number
    #[error("Shadow strength must be a non-negative number, got {0}")]
    InvalidShadowStrength(f64),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle document could not be persisted
    #[error("Failed to write subtitle file {path:?}: {message}")]
    FileWrite {
        /// Destination path of the document
        path: PathBuf,
        /// Underlying I/O failure
        message: String,
    },

    /// An imported subtitle file could not be parsed
    #[error("Failed to parse subtitle file: {0}")]
    Parse(String),
}

/// Errors raised by the pipeline around the synthesis core
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No source media available
    #[error("No video file found in {dir:?}")]
    InputExhausted {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// Several candidate videos and no selection
    #[error("Found {count} video files in {dir:?}; select one with --video")]
    AmbiguousInput {
        /// Number of candidates
        count: usize,
        /// Directory that was searched
        dir: PathBuf,
    },

    /// An external tool (ffmpeg, whisper) failed
    #[error("{tool} failed: {message}")]
    ExternalTool {
        /// Executable name
        tool: String,
        /// Failure description
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from style resolution
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the media pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
