use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::errors::SubtitleError;
use crate::style::{AssStyle, StyleSettings, STYLE_NAME};

// @module: Cue synthesis and ASS document serialization

/// Scale-in animation: 30% to 115% over 0-75ms, then settle to 100% by 150ms
pub const BOUNCE_MARKUP: &str = r"{\fscx30\fscy30\t(0,75,\fscx115\fscy115)\t(75,150,\fscx100\fscy100)}";

/// Canvas the style record and margins are expressed in
pub const PLAY_RES_X: u32 = 1280;
pub const PLAY_RES_Y: u32 = 720;

// @const: SRT timestamp regex
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})")
        .expect("valid SRT timestamp regex")
});

// @const: ASS timestamp regex (H:MM:SS.CC)
static ASS_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").expect("valid ASS timestamp regex")
});

// @const: ASS override blocks such as {\b1}
static ASS_OVERRIDE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^}]*\}").expect("valid ASS override regex")
});

// @struct: One utterance span from the transcriber or an imported subtitle file
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds
    pub end: f64,

    // @field: Raw utterance text
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Whitespace-separated words of the utterance
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

// @struct: One rendered dialogue line
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds
    pub end: f64,

    // @field: Chunk words, possibly prefixed with animation markup
    pub text: String,
}

impl SubtitleCue {
    /// Format as an `[Events]` dialogue line
    pub fn to_dialogue_line(&self) -> String {
        format!(
            "Dialogue: 0,{},{},{},,0,0,0,,{}",
            format_time(self.start),
            format_time(self.end),
            STYLE_NAME,
            self.text
        )
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dialogue_line())
    }
}

/// Split segments into timed cues of at most `max_words_per_line` words.
///
/// Each segment's duration is shared evenly between its words, so a chunk lasts
/// `words_in_chunk * (duration / word_count)`. Segments are processed in input
/// order and never re-sorted or merged; a segment with no words yields no cues.
pub fn synthesize(segments: &[TranscriptSegment], style: &StyleSettings) -> Vec<SubtitleCue> {
    let chunk_size = style.max_words_per_line.max(1);
    let mut cues = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        let words = segment.words();
        if words.is_empty() {
            debug!("Skipping segment {} with no words", index);
            continue;
        }

        let word_count = words.len();
        let avg_word_duration = (segment.end - segment.start) / word_count as f64;

        let mut consumed = 0;
        for chunk in words.chunks(chunk_size) {
            let chunk_start = segment.start + consumed as f64 * avg_word_duration;
            consumed += chunk.len();
            // Same expression as the next chunk's start, so boundaries match exactly
            let chunk_end = segment.start + consumed as f64 * avg_word_duration;

            let joined = chunk.join(" ");
            let text = if style.bounce_enabled {
                format!("{}{}", BOUNCE_MARKUP, joined)
            } else {
                joined
            };

            cues.push(SubtitleCue {
                start: chunk_start,
                end: chunk_end,
                text,
            });
        }
    }

    debug!("Synthesized {} cues from {} segments", cues.len(), segments.len());
    cues
}

/// Format seconds as an ASS timestamp `H:MM:SS.CC`, truncating to centiseconds.
///
/// Hours are not padded. Negative and non-finite inputs are clamped to zero.
pub fn format_time(seconds: f64) -> String {
    let t = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    let hours = (t / 3600.0).floor() as u64;
    let minutes = ((t % 3600.0) / 60.0).floor() as u64;
    let secs = (t % 60.0).floor() as u64;
    let centis = ((t - t.floor()) * 100.0).floor() as u64;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

/// A complete ASS document: script info, one style record, and the cue events
#[derive(Debug, Clone)]
pub struct AssDocument {
    pub style: AssStyle,
    pub cues: Vec<SubtitleCue>,
}

impl AssDocument {
    pub fn new(style: AssStyle, cues: Vec<SubtitleCue>) -> Self {
        Self { style, cues }
    }

    /// Build a document straight from segments
    pub fn from_segments(segments: &[TranscriptSegment], settings: &StyleSettings, style: AssStyle) -> Self {
        Self::new(style, synthesize(segments, settings))
    }

    /// Render the whole document to a string
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the document to `path`.
    ///
    /// The content goes to a temporary file in the destination directory which is
    /// then renamed over `path`, so readers never see a half-written document.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let file_write = |message: String| SubtitleError::FileWrite {
            path: path.to_path_buf(),
            message,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let rendered = self.render();
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| file_write(e.to_string()))?;
        temp.write_all(rendered.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| file_write(e.to_string()))?;
        temp.persist(path).map_err(|e| file_write(e.error.to_string()))?;

        debug!("Wrote {} cues to {:?}", self.cues.len(), path);
        Ok(())
    }
}

impl fmt::Display for AssDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "PlayResX:{}", PLAY_RES_X)?;
        writeln!(f, "PlayResY:{}", PLAY_RES_Y)?;
        writeln!(f, "WrapStyle:0")?;
        writeln!(f, "ScaledBorderAndShadow:yes")?;
        writeln!(f)?;

        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "{}", AssStyle::FORMAT)?;
        writeln!(f, "{}", self.style)?;
        writeln!(f)?;

        writeln!(f, "[Events]")?;
        writeln!(f, "Format: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text")?;
        for cue in &self.cues {
            writeln!(f, "{}", cue)?;
        }
        Ok(())
    }
}

/// Read an `.srt` or `.ass` file into transcript segments, by extension
pub fn parse_subtitle_file<P: AsRef<Path>>(path: P) -> Result<Vec<TranscriptSegment>, SubtitleError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| SubtitleError::Parse(format!("{:?}: {}", path, e)))?;

    let is_ass = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("ass"))
        .unwrap_or(false);

    if is_ass {
        parse_ass_string(&content)
    } else {
        parse_srt_string(&content)
    }
}

/// Parse SRT content into transcript segments.
///
/// Multi-line entry text is joined with single spaces. Entries stay in file order.
pub fn parse_srt_string(content: &str) -> Result<Vec<TranscriptSegment>, SubtitleError> {
    let mut segments = Vec::new();

    // State variables for parsing
    let mut current_times: Option<(f64, f64)> = None;
    let mut current_text = String::new();
    let mut awaiting_timestamp = false;

    let mut finish_entry = |times: Option<(f64, f64)>, text: &mut String| {
        if let Some((start, end)) = times {
            if end < start {
                warn!("Skipping subtitle entry with end before start: {:.3} < {:.3}", end, start);
            } else if text.trim().is_empty() {
                debug!("Skipping empty subtitle entry at {:.3}", start);
            } else {
                segments.push(TranscriptSegment::new(start, end, text.trim()));
            }
        }
        text.clear();
    };

    let mut lines = content.lines().enumerate().peekable();
    while let Some((line_number, line)) = lines.next() {
        let trimmed = line.trim().trim_start_matches('\u{feff}');

        if trimmed.is_empty() {
            if current_times.is_some() {
                finish_entry(current_times.take(), &mut current_text);
            }
            awaiting_timestamp = false;
            continue;
        }

        // Sequence number starts a new entry, even without a blank line before it
        if trimmed.parse::<usize>().is_ok() {
            let next_is_timestamp = lines
                .peek()
                .is_some_and(|(_, next)| SRT_TIMESTAMP_REGEX.is_match(next.trim()));

            if next_is_timestamp || (current_times.is_none() && !awaiting_timestamp) {
                if current_times.is_some() {
                    finish_entry(current_times.take(), &mut current_text);
                }
                awaiting_timestamp = true;
                continue;
            }
        }

        if let Some(caps) = SRT_TIMESTAMP_REGEX.captures(trimmed) {
            if current_times.is_some() {
                finish_entry(current_times.take(), &mut current_text);
            }
            current_times = Some((srt_capture_seconds(&caps, 1), srt_capture_seconds(&caps, 5)));
            awaiting_timestamp = false;
            continue;
        }

        if current_times.is_some() {
            if !current_text.is_empty() {
                current_text.push(' ');
            }
            current_text.push_str(trimmed);
        } else {
            warn!("Unexpected text at line {} before timestamp: {}", line_number + 1, trimmed);
        }
    }

    finish_entry(current_times.take(), &mut current_text);

    if segments.is_empty() {
        return Err(SubtitleError::Parse(
            "No valid subtitle entries were found in the SRT content".to_string(),
        ));
    }

    Ok(segments)
}

/// Parse the `Dialogue:` lines of an ASS document into transcript segments.
///
/// Override blocks (`{...}`) are stripped and `\N` line breaks become spaces.
pub fn parse_ass_string(content: &str) -> Result<Vec<TranscriptSegment>, SubtitleError> {
    let mut segments = Vec::new();

    for (line_number, line) in content.lines().enumerate() {
        let Some(body) = line.trim().strip_prefix("Dialogue:") else {
            continue;
        };

        // Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text
        let fields: Vec<&str> = body.trim().splitn(10, ',').collect();
        if fields.len() < 10 {
            warn!("Malformed dialogue at line {}: {}", line_number + 1, line);
            continue;
        }

        let (Some(start), Some(end)) = (parse_ass_timestamp(fields[1]), parse_ass_timestamp(fields[2])) else {
            warn!("Invalid dialogue timestamps at line {}: {}", line_number + 1, line);
            continue;
        };

        let text = ASS_OVERRIDE_REGEX
            .replace_all(fields[9], "")
            .replace("\\N", " ")
            .replace("\\n", " ");
        segments.push(TranscriptSegment::new(start, end, text.trim()));
    }

    if segments.is_empty() {
        return Err(SubtitleError::Parse(
            "No dialogue lines were found in the ASS content".to_string(),
        ));
    }

    Ok(segments)
}

/// Parse an `H:MM:SS.CC` timestamp to seconds
pub fn parse_ass_timestamp(timestamp: &str) -> Option<f64> {
    let caps = ASS_TIMESTAMP_REGEX.captures(timestamp.trim())?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());

    let total_centis = (field(1)? * 3600 + field(2)? * 60 + field(3)?) * 100 + field(4)?;
    Some(total_centis as f64 / 100.0)
}

// Capture groups start_idx..start_idx+3 are hours, minutes, seconds, millis
fn srt_capture_seconds(caps: &regex::Captures, start_idx: usize) -> f64 {
    let field = |i: usize| -> u64 {
        caps.get(start_idx + i)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    let total_ms = (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + field(3);
    total_ms as f64 / 1000.0
}
