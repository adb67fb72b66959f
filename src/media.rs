/*!
 * External media tools.
 *
 * Thin wrappers around ffmpeg for audio extraction and subtitle burning.
 * Every call is single-shot: a non-zero exit, a spawn failure or a timeout
 * becomes a `PipelineError::ExternalTool` and the run aborts.
 */

use std::path::Path;
use std::process::Output;
use std::time::{Duration, Instant};
use log::{debug, error, info};
use tokio::process::Command;

use crate::errors::PipelineError;
use crate::file_utils::FileManager;

const FFMPEG: &str = "ffmpeg";

/// Upper bound for a single ffmpeg run
const FFMPEG_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Run an external tool to completion, failing on timeout or non-zero exit
pub async fn run_tool(tool: &str, args: &[String], timeout: Duration) -> Result<Output, PipelineError> {
    debug!("Running {} {}", tool, args.join(" "));

    let tool_error = |message: String| PipelineError::ExternalTool {
        tool: tool.to_string(),
        message,
    };

    let future = Command::new(tool).args(args).kill_on_drop(true).output();

    let output = tokio::select! {
        result = future => {
            result.map_err(|e| tool_error(format!("could not be started: {}", e)))?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(tool_error(format!("timed out after {} seconds", timeout.as_secs())));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("{} exited with {}: {}", tool, output.status, filtered);
        return Err(tool_error(filtered));
    }

    Ok(output)
}

/// Extract a 44.1kHz stereo PCM track from the video
pub async fn extract_audio(video_path: &Path, audio_path: &Path) -> Result<(), PipelineError> {
    let args = vec![
        "-y".to_string(),
        "-i".to_string(),
        video_path.to_string_lossy().to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        "pcm_s16le".to_string(),
        "-ar".to_string(),
        "44100".to_string(),
        "-ac".to_string(),
        "2".to_string(),
        audio_path.to_string_lossy().to_string(),
    ];

    let start = Instant::now();
    run_tool(FFMPEG, &args, FFMPEG_TIMEOUT).await?;
    log_speed(audio_path, start.elapsed(), "Audio extraction");

    Ok(())
}

/// Render the ASS track onto the video, loading fonts from `fonts_dir`
pub async fn burn_subtitles(
    video_path: &Path,
    ass_path: &Path,
    fonts_dir: &Path,
    output_path: &Path,
) -> Result<(), PipelineError> {
    if !FileManager::file_exists(ass_path) {
        return Err(PipelineError::ExternalTool {
            tool: FFMPEG.to_string(),
            message: format!("subtitle file not found: {:?}", ass_path),
        });
    }

    let args = vec![
        "-y".to_string(),
        "-i".to_string(),
        video_path.to_string_lossy().to_string(),
        "-vf".to_string(),
        subtitles_filter(ass_path, fonts_dir),
        output_path.to_string_lossy().to_string(),
    ];

    let start = Instant::now();
    run_tool(FFMPEG, &args, FFMPEG_TIMEOUT).await?;
    log_speed(output_path, start.elapsed(), "Subtitle burning");

    Ok(())
}

/// The `ass=` video filter argument; ffmpeg filter paths need forward slashes
pub fn subtitles_filter(ass_path: &Path, fonts_dir: &Path) -> String {
    format!(
        "ass={}:fontsdir={}",
        ass_path.to_string_lossy().replace('\\', "/"),
        fonts_dir.to_string_lossy().replace('\\', "/")
    )
}

/// Processing speed in MB/s; zero when no time elapsed
pub fn processing_speed(size_mb: f64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { size_mb / secs } else { 0.0 }
}

fn log_speed(file_path: &Path, elapsed: Duration, label: &str) {
    if let Some(size_mb) = FileManager::size_mb(file_path) {
        info!(
            "{} speed: {:.2} MB/s ({:.2} MB in {:.2} s)",
            label,
            processing_speed(size_mb, elapsed),
            size_mb,
            elapsed.as_secs_f64()
        );
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    const NOISE_PREFIXES: &[&str] = &[
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
