use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::MAX_TEXT_LENGTH;

lazy_static! {
    /// Angle brackets stripped from free text to keep markup out of popups
    pub static ref ANGLE_BRACKET_REGEX: Regex = Regex::new(r"[<>]").unwrap();

    /// Characters not allowed in stored object names
    /// - Kept: letters, digits, '.', '_', '-'
    /// - Everything else collapses to a single '_'
    pub static ref UNSAFE_FILE_NAME_REGEX: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Trim, strip angle brackets and cap the length of user text
pub fn sanitize_text(text: &str) -> String {
    ANGLE_BRACKET_REGEX
        .replace_all(text.trim(), "")
        .chars()
        .take(MAX_TEXT_LENGTH)
        .collect()
}

/// Make an uploaded file name safe to embed in an object key
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned = UNSAFE_FILE_NAME_REGEX.replace_all(name.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err("Coordinates must be finite numbers".to_string());
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok(())
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}
