/*!
 * # subburn - styled subtitles from speech, burned into video
 *
 * A Rust library and CLI that turns timestamped transcript segments into a
 * styled, time-aligned Advanced SubStation Alpha (ASS) track and hands it to
 * ffmpeg for burning into the source video.
 *
 * ## Features
 *
 * - Segments from a whisper-compatible speech-to-text CLI or an existing
 *   `.srt`/`.ass` file, behind one `SegmentSource` interface
 * - Word-count based line splitting with evenly shared timing
 * - Named or hex colors, font weight and size, shadow, four screen positions
 * - Optional scale-in "bounce" animation per line
 * - Atomic `.ass` writes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `style`: Style resolution (colors, positions, the ASS style record)
 * - `subtitle_processor`: Cue synthesis, ASS serialization, subtitle import
 * - `sources`: Segment providers:
 *   - `sources::whisper`: Speech-to-text through an external CLI
 *   - `sources::subtitle_file`: Import of existing subtitle files
 * - `media`: ffmpeg wrappers for audio extraction and burning
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod style;
pub mod subtitle_processor;
pub mod sources;
pub mod media;
pub mod file_utils;
pub mod app_controller;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use style::{StyleResolver, StyleSettings, AssStyle, Position};
pub use subtitle_processor::{TranscriptSegment, SubtitleCue, AssDocument, synthesize, format_time};
pub use sources::SegmentSource;
pub use errors::{AppError, StyleError, SubtitleError, PipelineError};
