/*!
 * Tests for style resolution
 */

use subburn::app_config::StyleConfig;
use subburn::errors::StyleError;
use subburn::style::{lookup_color_name, resolve_color, Position, Rgb, StyleResolver};

/// Named colors resolve independently of case
#[test]
fn test_resolveColor_withRedInMixedCase_shouldEncodeAsReversedBytes() {
    for input in ["red", "Red", "RED", "  red "] {
        let color = resolve_color(input).unwrap();
        assert_eq!(color, Rgb { r: 0xFF, g: 0, b: 0 });
        assert_eq!(color.to_ass_color(), "&H000000FF", "input {:?}", input);
    }
}

/// Every named color in the table resolves to a valid encoding
#[test]
fn test_resolveColor_withAllNamedColors_shouldResolve() {
    let expected = [
        ("black", "&H00000000"),
        ("white", "&H00FFFFFF"),
        ("red", "&H000000FF"),
        ("green", "&H0000FF00"),
        ("blue", "&H00FF0000"),
        ("yellow", "&H0000FFFF"),
        ("cyan", "&H00FFFF00"),
        ("magenta", "&H00FF00FF"),
        ("orange", "&H0000A5FF"),
        ("purple", "&H00800080"),
    ];

    for (name, ass) in expected {
        assert_eq!(resolve_color(name).unwrap().to_ass_color(), ass, "color {}", name);
    }
}

/// Unknown names pass through unchanged to literal parsing
#[test]
fn test_lookupColorName_withUnknownName_shouldReturnInputUnchanged() {
    assert_eq!(lookup_color_name("#AbCdEf"), "#AbCdEf");
    assert_eq!(lookup_color_name("teal"), "teal");
    assert_eq!(lookup_color_name("Orange"), "#FFA500");
}

/// Lowercase hex literals are accepted and encoded in uppercase
#[test]
fn test_resolveColor_withLowercaseHex_shouldEncodeUppercase() {
    let color = resolve_color("#a1b2c3").unwrap();
    assert_eq!(color.to_ass_color(), "&H00C3B2A1");
    assert_eq!(color.to_string(), "#A1B2C3");
}

/// Malformed literals are rejected instead of producing corrupt bytes
#[test]
fn test_resolveColor_withShortHex_shouldReturnMalformedColor() {
    let err = resolve_color("#FFF").unwrap_err();
    assert_eq!(err, StyleError::MalformedColor { input: "#FFF".to_string() });
    assert!(err.to_string().contains("#FFF"));
}

/// Position table matches the anchor and margin pairs
#[test]
fn test_position_withAllVariants_shouldMapToAnchorAndMargin() {
    let cases = [
        ("bottom", Position::Bottom, 2, 30),
        ("middle", Position::Middle, 5, 30),
        ("top", Position::Top, 8, 30),
        ("slightly-above-bottom", Position::SlightlyAboveBottom, 5, 180),
        ("1", Position::Bottom, 2, 30),
        ("2", Position::Middle, 5, 30),
        ("3", Position::Top, 8, 30),
        ("4", Position::SlightlyAboveBottom, 5, 180),
        ("Slightly_Above_Bottom", Position::SlightlyAboveBottom, 5, 180),
    ];

    for (input, position, anchor, margin) in cases {
        let parsed = Position::parse_or_default(input);
        assert_eq!(parsed, position, "input {:?}", input);
        assert_eq!(parsed.anchor_code(), anchor);
        assert_eq!(parsed.margin_v(), margin);
    }
}

/// CamelCase position names resolve like their hyphenated forms
#[test]
fn test_position_withCamelCaseNames_shouldResolveEveryPosition() {
    let cases = [
        ("Bottom", Position::Bottom, 2, 30),
        ("Middle", Position::Middle, 5, 30),
        ("Top", Position::Top, 8, 30),
        ("SlightlyAboveBottom", Position::SlightlyAboveBottom, 5, 180),
        ("AboveBottom", Position::SlightlyAboveBottom, 5, 180),
        ("slightly above bottom", Position::SlightlyAboveBottom, 5, 180),
    ];

    for (input, position, anchor, margin) in cases {
        let parsed = Position::parse_or_default(input);
        assert_eq!(parsed, position, "input {:?}", input);
        assert_eq!((parsed.anchor_code(), parsed.margin_v()), (anchor, margin));
    }
}

/// Unrecognized positions fall back to bottom
#[test]
fn test_position_withUnrecognizedInput_shouldDefaultToBottom() {
    for input in ["", "5", "left", "upside-down"] {
        assert_eq!(Position::parse_or_default(input), Position::Bottom);
    }
}

/// The resolver builds the style record from the options
#[test]
fn test_styleResolver_withCustomOptions_shouldBuildStyleRecord() {
    let config = StyleConfig {
        words_per_line: 4,
        color: "yellow".to_string(),
        font_weight: 700,
        font_size: 56,
        shadow_strength: 2.5,
        bounce: true,
        position: "top".to_string(),
    };

    let (settings, record) = StyleResolver::resolve(&config).unwrap();

    assert_eq!(settings.max_words_per_line, 4);
    assert!(settings.bounce_enabled);
    assert_eq!(settings.position, Position::Top);
    assert_eq!(
        record.to_string(),
        "Style: Default,Playfair Display,56,&H0000FFFF,700,0,0,0,100,100,0,0,1,2,2.5,8,10,10,30,1"
    );
}

/// Default options produce the default record
#[test]
fn test_styleResolver_withDefaults_shouldMatchDefaultRecord() {
    let (_, record) = StyleResolver::resolve(&StyleConfig::default()).unwrap();
    assert_eq!(
        record.to_string(),
        "Style: Default,Playfair Display,48,&H00FFFFFF,400,0,0,0,100,100,0,0,1,2,1.0,2,10,10,30,1"
    );
}

/// Font weight outside 100-900 is passed through verbatim
#[test]
fn test_styleResolver_withOutOfRangeWeight_shouldPassThrough() {
    let config = StyleConfig {
        font_weight: 1200,
        ..StyleConfig::default()
    };
    let (settings, record) = StyleResolver::resolve(&config).unwrap();
    assert_eq!(settings.font_weight, 1200);
    assert_eq!(record.bold, 1200);
}

/// Zero shadow disables it but is still valid
#[test]
fn test_styleResolver_withZeroShadow_shouldResolve() {
    let config = StyleConfig {
        shadow_strength: 0.0,
        ..StyleConfig::default()
    };
    let (_, record) = StyleResolver::resolve(&config).unwrap();
    assert!(record.to_string().contains(",1,2,0.0,2,"));
}

/// Invalid numeric options are rejected
#[test]
fn test_styleResolver_withInvalidNumbers_shouldFail() {
    let zero_words = StyleConfig { words_per_line: 0, ..StyleConfig::default() };
    assert_eq!(StyleResolver::resolve(&zero_words).unwrap_err(), StyleError::InvalidWordsPerLine);

    let zero_size = StyleConfig { font_size: 0, ..StyleConfig::default() };
    assert_eq!(StyleResolver::resolve(&zero_size).unwrap_err(), StyleError::InvalidFontSize);

    let negative_shadow = StyleConfig { shadow_strength: -1.0, ..StyleConfig::default() };
    assert_eq!(
        StyleResolver::resolve(&negative_shadow).unwrap_err(),
        StyleError::InvalidShadowStrength(-1.0)
    );

    let bad_color = StyleConfig { color: "chartreuse".to_string(), ..StyleConfig::default() };
    assert!(matches!(
        StyleResolver::resolve(&bad_color).unwrap_err(),
        StyleError::MalformedColor { .. }
    ));
}
