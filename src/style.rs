/*!
 * Style resolution for the ASS subtitle track.
 *
 * Translates user-facing choices (color names or hex, weight, size, shadow,
 * screen position) into `StyleSettings` and the `Style:` record of the
 * `[V4+ Styles]` section.
 */

use std::fmt;
use log::warn;

use crate::app_config::StyleConfig;
use crate::errors::StyleError;

/// Font named in the style record; the renderer looks it up in the fonts directory
pub const DEFAULT_FONT_NAME: &str = "Playfair Display";

/// Name of the single style record every dialogue line refers to
pub const STYLE_NAME: &str = "Default";

/// Named colors accepted in place of a hex literal
const COLOR_MAP: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("red", "#FF0000"),
    ("green", "#00FF00"),
    ("blue", "#0000FF"),
    ("yellow", "#FFFF00"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
    ("orange", "#FFA500"),
    ("purple", "#800080"),
];

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(input: &str) -> Result<Self, StyleError> {
        let malformed = || StyleError::MalformedColor { input: input.to_string() };

        let hex = input.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| malformed())
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Encode as an ASS color: `&H00BBGGRR`, alpha byte first, then blue, green, red
    pub fn to_ass_color(&self) -> String {
        format!("&H00{:02X}{:02X}{:02X}", self.b, self.g, self.r)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Look up a color name case-insensitively, returning the literal unchanged if unknown
pub fn lookup_color_name(input: &str) -> &str {
    let lowered = input.trim().to_lowercase();
    COLOR_MAP
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, hex)| *hex)
        .unwrap_or(input)
}

/// Resolve a color name or hex literal into an RGB value
pub fn resolve_color(input: &str) -> Result<Rgb, StyleError> {
    Rgb::from_hex(lookup_color_name(input))
}

/// On-screen subtitle placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Bottom,
    Middle,
    Top,
    SlightlyAboveBottom,
}

impl Position {
    /// Parse a position name or menu number; anything unrecognized is `Bottom`
    pub fn parse_or_default(input: &str) -> Self {
        let normalized: String = input
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(*c, '-' | '_' | ' '))
            .collect();

        match normalized.as_str() {
            "1" | "bottom" => Self::Bottom,
            "2" | "middle" | "center" => Self::Middle,
            "3" | "top" => Self::Top,
            "4" | "slightlyabovebottom" | "abovebottom" => Self::SlightlyAboveBottom,
            _ => {
                warn!("Unknown subtitle position '{}', using bottom", input);
                Self::Bottom
            }
        }
    }

    /// ASS numpad alignment code
    pub fn anchor_code(&self) -> u8 {
        match self {
            Self::Bottom => 2,
            Self::Middle => 5,
            Self::Top => 8,
            Self::SlightlyAboveBottom => 5,
        }
    }

    /// Vertical margin in script pixels
    pub fn margin_v(&self) -> u32 {
        match self {
            Self::SlightlyAboveBottom => 180,
            _ => 30,
        }
    }
}

/// Style parameters resolved once per run
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSettings {
    pub max_words_per_line: usize,
    pub color: Rgb,
    pub font_weight: i32,
    pub font_size: u32,
    pub shadow_strength: f64,
    pub bounce_enabled: bool,
    pub position: Position,
}

/// The `Style:` record of the `[V4+ Styles]` section
#[derive(Debug, Clone, PartialEq)]
pub struct AssStyle {
    pub name: String,
    pub font_name: String,
    pub font_size: u32,
    pub primary_colour: String,
    pub bold: i32,
    pub shadow: f64,
    pub alignment: u8,
    pub margin_v: u32,
}

impl AssStyle {
    /// Column layout matching [`fmt::Display`] for this record
    pub const FORMAT: &'static str = "Format: Name,Fontname,Fontsize,PrimaryColour,Bold,Italic,Underline,StrikeOut,ScaleX,ScaleY,Spacing,Angle,BorderStyle,Outline,Shadow,Alignment,MarginL,MarginR,MarginV,Encoding";

    /// Build the record from resolved settings
    pub fn from_settings(settings: &StyleSettings) -> Self {
        Self {
            name: STYLE_NAME.to_string(),
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_size: settings.font_size,
            primary_colour: settings.color.to_ass_color(),
            bold: settings.font_weight,
            shadow: settings.shadow_strength,
            alignment: settings.position.anchor_code(),
            margin_v: settings.position.margin_v(),
        }
    }
}

impl fmt::Display for AssStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Italic, Underline, StrikeOut off; 100% scale; outline and drop shadow, outline width 2
        write!(
            f,
            "Style: {},{},{},{},{},0,0,0,100,100,0,0,1,2,{},{},10,10,{},1",
            self.name,
            self.font_name,
            self.font_size,
            self.primary_colour,
            self.bold,
            format_decimal(self.shadow),
            self.alignment,
            self.margin_v,
        )
    }
}

// Whole numbers keep one decimal place: 1.0 renders as "1.0", not "1"
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Resolves raw style options into validated settings and the ASS style record
pub struct StyleResolver;

impl StyleResolver {
    /// Resolve and validate the configured style
    pub fn resolve(config: &StyleConfig) -> Result<(StyleSettings, AssStyle), StyleError> {
        if config.words_per_line == 0 {
            return Err(StyleError::InvalidWordsPerLine);
        }
        if config.font_size == 0 {
            return Err(StyleError::InvalidFontSize);
        }
        if !config.shadow_strength.is_finite() || config.shadow_strength < 0.0 {
            return Err(StyleError::InvalidShadowStrength(config.shadow_strength));
        }

        let settings = StyleSettings {
            max_words_per_line: config.words_per_line,
            color: resolve_color(&config.color)?,
            font_weight: config.font_weight,
            font_size: config.font_size,
            shadow_strength: config.shadow_strength,
            bounce_enabled: config.bounce,
            position: Position::parse_or_default(&config.position),
        };
        let record = AssStyle::from_settings(&settings);

        Ok((settings, record))
    }
}
