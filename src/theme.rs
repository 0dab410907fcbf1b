//! Theme system for the viewer
//!
//! YAML-based theming with compile-time embedded themes and user overrides
//! from the config directory.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/gridclue/themes/{id}.yaml`
//! 2. Embedded: built-in themes compiled into the binary

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

pub const CLASSIC_YAML: &str = include_str!("../themes/classic.yaml");
pub const NIGHT_YAML: &str = include_str!("../themes/night.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "classic", "night")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "classic",
        yaml: CLASSIC_YAML,
    },
    BuiltinTheme {
        id: "night",
        yaml: NIGHT_YAML,
    },
];

/// RGBA color (0-255 per channel), parsed from `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse from a hex string: `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // Length is in bytes; multi-byte input must be rejected before
        // slicing at fixed offsets.
        if !hex.is_ascii() {
            return Err(format!(
                "bad hex color {:?}: expected #RRGGBB or #RRGGBBAA",
                s
            ));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("bad hex color {:?}: {}", s, e))
        };
        match hex.len() {
            6 => Ok(Self {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: parse(0..2)?,
                g: parse(2..4)?,
                b: parse(4..6)?,
                a: parse(6..8)?,
            }),
            _ => Err(format!(
                "bad hex color {:?}: expected #RRGGBB or #RRGGBBAA",
                s
            )),
        }
    }

    /// Pack as 0xAARRGGBB for the softbuffer surface.
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// `#RRGGBB` form for SVG attributes (alpha handled separately).
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl Visitor<'_> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a hex color string like \"#RRGGBB\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
                Color::from_hex(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(ColorVisitor)
    }
}

/// Colors used to paint the grid, shared by the window and SVG paths.
#[derive(Debug, Clone, Deserialize)]
pub struct GridColors {
    /// Window / page background
    pub background: Color,
    /// Active cell fill
    pub cell_fill: Color,
    /// Run-boundary edges
    pub edge: Color,
    /// Cell characters
    pub text: Color,
    /// Clue numbers
    pub number: Color,
}

/// A complete theme
#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: GridColors,
}

impl Theme {
    pub fn from_yaml(yaml: &str) -> Result<Theme, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse theme: {}", e))
    }

    pub fn from_builtin(id: &str) -> Result<Theme, String> {
        BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown builtin theme: {}", id))
            .and_then(|t| Theme::from_yaml(t.yaml))
    }
}

impl Default for Theme {
    // Matches themes/classic.yaml.
    fn default() -> Self {
        Theme {
            name: "Classic".to_string(),
            colors: GridColors {
                background: Color::rgb(255, 255, 255),
                cell_fill: Color::rgb(240, 240, 240),
                edge: Color::rgb(0, 0, 0),
                text: Color::rgb(0, 0, 0),
                number: Color::rgb(0, 0, 0),
            },
        }
    }
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user -> builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}
