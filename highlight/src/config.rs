use serde::{Deserialize, Serialize};

/// Highlight colors, handed out in first-seen order and reused cyclically.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#fde68a", "#fca5a5", "#93c5fd", "#a7f3d0", "#c4b5fd", "#f9a8d4", "#fdba74", "#86efac",
    "#fcd34d", "#a5f3fc",
];

/// Configuration for span highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Background colors for label combinations (`#rgb` or `#rrggbb`)
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Spans shorter than this (in characters, after cleaning) are ignored
    #[serde(default = "default_min_span_chars")]
    pub min_span_chars: usize,
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect()
}

fn default_min_span_chars() -> usize {
    2
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            min_span_chars: default_min_span_chars(),
        }
    }
}

impl HighlightConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.palette.is_empty() {
            return Err("palette must contain at least one color".to_string());
        }

        if let Some(bad) = self.palette.iter().find(|c| !is_hex_color(c)) {
            return Err(format!(
                "palette color {bad:?} is not a #rgb or #rrggbb hex color"
            ));
        }

        if self.min_span_chars == 0 {
            return Err("min_span_chars must be > 0".to_string());
        }

        Ok(())
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
