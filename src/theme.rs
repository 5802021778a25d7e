//! Theme loading: btop-style `theme[key]="value"` files for the UI colours.
//! Piece colours come from the catalog and are not themed.

use crate::catalog::{ColorError, Rgba};
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Board and panel background.
    pub bg: Rgba,
    /// Borders.
    pub div_line: Rgba,
    /// Score and help text.
    pub main_fg: Rgba,
    /// Titles.
    pub title: Rgba,
    /// Game-over banner and the colour the board fades to.
    pub alert: Rgba,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("theme[{key}]: {source}")]
    InvalidColor {
        key: String,
        #[source]
        source: ColorError,
    },
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Rgba::rgb(0, 0, 0),
            div_line: Rgba::rgb(255, 255, 255),
            main_fg: Rgba::rgb(0xAB, 0xB2, 0xBF),
            title: Rgba::rgb(0xE5, 0xC0, 0x7B),
            alert: Rgba::rgb(0xE0, 0x6C, 0x75),
        }
    }
}

impl Theme {
    /// Load from file; defaults when `path` is `None`. Missing keys keep their
    /// default; a present but malformed value is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(path)?;
        Self::from_map(&parse_theme_file(&s))
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let get = |keys: &[&str], fallback: Rgba| -> Result<Rgba, ThemeError> {
            for &key in keys {
                if let Some(v) = map.get(key) {
                    return v.parse().map_err(|source| ThemeError::InvalidColor {
                        key: key.to_string(),
                        source,
                    });
                }
            }
            Ok(fallback)
        };
        let d = Self::default();
        // btop key names so existing btop themes load unchanged.
        // Translucent values are composited over the background.
        let bg = get(&["main_bg", "meter_bg"], d.bg)?.over(d.bg);
        Ok(Self {
            bg,
            div_line: get(&["div_line"], d.div_line)?.over(bg),
            main_fg: get(&["main_fg"], d.main_fg)?.over(bg),
            title: get(&["title"], d.title)?.over(bg),
            alert: get(&["cpu_end", "temp_end"], d.alert)?.over(bg),
        })
    }
}

/// Terminal colour for an opaque `Rgba`.
pub fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'').trim();
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}
