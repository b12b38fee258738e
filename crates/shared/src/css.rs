//! CSS value validation.
//!
//! Host pages hand the widget raw strings for colors and lengths; these
//! validators recognize the grammars the rendered surface accepts.

use validator::ValidationError;

/// Named colors accepted without further parsing.
const NAMED_COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown", "black", "white",
    "gray", "grey", "transparent",
];

/// Relative font-size keywords accepted in addition to explicit lengths.
const RELATIVE_FONT_SIZES: &[&str] = &[
    "smaller", "larger", "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large",
];

lazy_static::lazy_static! {
    static ref HEX_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap();
    static ref FUNC_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^(rgba?|hsla?)\(").unwrap();
    static ref PX_REGEX: regex::Regex = regex::Regex::new(r"^\d+px$").unwrap();
    static ref SCALED_LENGTH_REGEX: regex::Regex =
        regex::Regex::new(r"^\d+(\.\d+)?(em|rem|%)$").unwrap();
}

/// Returns true for hex triplets/sextuplets, `rgb()/rgba()`, `hsl()/hsla()`,
/// and the fixed named-color set.
pub fn is_valid_color(color: &str) -> bool {
    HEX_COLOR_REGEX.is_match(color)
        || FUNC_COLOR_REGEX.is_match(color)
        || NAMED_COLORS.contains(&color.to_lowercase().as_str())
}

/// Returns true for `px`, `em`, `rem`, `%` lengths and `auto`.
pub fn is_valid_length(value: &str) -> bool {
    PX_REGEX.is_match(value) || SCALED_LENGTH_REGEX.is_match(value) || value == "auto"
}

/// Returns true for explicit lengths plus the relative size keywords.
pub fn is_valid_font_size(value: &str) -> bool {
    PX_REGEX.is_match(value)
        || SCALED_LENGTH_REGEX.is_match(value)
        || RELATIVE_FONT_SIZES.contains(&value)
}

/// Validates that a value is a recognized CSS color.
pub fn validate_css_color(color: &str) -> Result<(), ValidationError> {
    if is_valid_color(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("css_color");
        err.message = Some("Must be a valid CSS color".into());
        Err(err)
    }
}

/// Validates that a value is a recognized CSS length.
pub fn validate_css_length(value: &str) -> Result<(), ValidationError> {
    if is_valid_length(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("css_length");
        err.message = Some("Must be a valid CSS length".into());
        Err(err)
    }
}

/// Validates that a value is a recognized CSS font size.
pub fn validate_css_font_size(value: &str) -> Result<(), ValidationError> {
    if is_valid_font_size(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("css_font_size");
        err.message = Some("Must be a valid CSS font size".into());
        Err(err)
    }
}
