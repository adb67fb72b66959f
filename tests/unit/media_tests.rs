/*!
 * Tests for the ffmpeg wrapper helpers
 */

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use subburn::errors::PipelineError;
use subburn::media::{burn_subtitles, filter_ffmpeg_stderr, processing_speed, run_tool, subtitles_filter};

use crate::common;

/// The burn filter points at the document and the fonts folder
#[test]
fn test_subtitlesFilter_withPaths_shouldBuildAssFilter() {
    let filter = subtitles_filter(Path::new("subtitles/subtitles_1.ass"), Path::new("fonts"));
    assert_eq!(filter, "ass=subtitles/subtitles_1.ass:fontsdir=fonts");
}

/// Backslash separators are converted for the filter syntax
#[test]
fn test_subtitlesFilter_withBackslashes_shouldUseForwardSlashes() {
    let filter = subtitles_filter(Path::new(r"subs\run.ass"), Path::new(r"assets\fonts"));
    assert_eq!(filter, "ass=subs/run.ass:fontsdir=assets/fonts");
}

/// Speed is size over elapsed time, and zero for no time
#[test]
fn test_processingSpeed_withElapsedTime_shouldDivide() {
    assert_eq!(processing_speed(10.0, Duration::from_secs(4)), 2.5);
    assert_eq!(processing_speed(10.0, Duration::ZERO), 0.0);
}

/// Banner and stream noise is dropped from ffmpeg errors
#[test]
fn test_filterFfmpegStderr_withBanner_shouldKeepErrorLines() {
    let stderr = "ffmpeg version 6.0 Copyright (c) 2000-2023\n  built with gcc 12\n  configuration: --enable-libass\n  libavutil      58.  2.100\nInput #0, mov,mp4, from 'in.mp4':\n  Duration: 00:00:10.00\n  Stream #0:0: Video: h264\n[Parsed_ass_0 @ 0x1] Unable to open subtitles.ass\nError initializing filters\n";

    assert_eq!(
        filter_ffmpeg_stderr(stderr),
        "[Parsed_ass_0 @ 0x1] Unable to open subtitles.ass\nError initializing filters"
    );
}

/// Pure noise falls back to a placeholder message
#[test]
fn test_filterFfmpegStderr_withOnlyNoise_shouldReturnFallback() {
    let filtered = filter_ffmpeg_stderr("ffmpeg version 6.0\n\n  built with clang\n");
    assert!(filtered.starts_with("unknown error"));
}

/// Tools that cannot be started surface as external tool failures
#[test]
fn test_runTool_withMissingBinary_shouldReturnExternalTool() {
    let result = tokio_test::block_on(run_tool(
        "subburn-test-no-such-binary",
        &[],
        Duration::from_secs(5),
    ));

    match result {
        Err(PipelineError::ExternalTool { tool, message }) => {
            assert_eq!(tool, "subburn-test-no-such-binary");
            assert!(message.contains("could not be started"));
        }
        other => panic!("expected ExternalTool, got {:?}", other),
    }
}

/// Burning checks for the document before invoking ffmpeg
#[test]
fn test_burnSubtitles_withMissingDocument_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let result = tokio_test::block_on(burn_subtitles(
        &dir.join("in.mp4"),
        &dir.join("missing.ass"),
        &dir.join("fonts"),
        &dir.join("out.mp4"),
    ));

    match result {
        Err(PipelineError::ExternalTool { tool, message }) => {
            assert_eq!(tool, "ffmpeg");
            assert!(message.contains("subtitle file not found"));
        }
        other => panic!("expected ExternalTool, got {:?}", other),
    }
    assert!(!dir.join("out.mp4").exists());
    Ok(())
}
