use std::path::PathBuf;

use jems_shared::{DEFAULT_HUE, parse_color};

pub const DEFAULT_LOG_FILTER: &str = "info";

pub const MAP_PATH_ENV: &str = "JEMS_MAP_PATH";
pub const PRETTY_OUTPUT_ENV: &str = "JEMS_PRETTY_OUTPUT";
pub const DEFAULT_HUE_ENV: &str = "JEMS_DEFAULT_HUE";

/// Document to load before replaying actions. Unset means start from the
/// placeholder document.
pub fn map_path() -> Option<PathBuf> {
    std::env::var(MAP_PATH_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn pretty_output() -> bool {
    std::env::var(PRETTY_OUTPUT_ENV)
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}

/// Hue for the placeholder document.
pub fn default_hue() -> String {
    std::env::var(DEFAULT_HUE_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| parse_color(value).is_some())
        .unwrap_or_else(|| DEFAULT_HUE.to_string())
}
