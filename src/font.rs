//! Startup font loading
//!
//! No font is bundled with the binary; the glyph face comes from an
//! explicit `--font` path or the first readable entry in a list of
//! well-known system font locations.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use fontdue::{Font, FontSettings};

/// Well-known sans-serif font locations, tried in order.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    // macOS
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Verdana.ttf",
    "/Library/Fonts/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Load the display font, preferring the override when given.
///
/// Startup fails with a clear error if no usable font is found.
pub fn load_font(override_path: Option<&Path>) -> Result<Font> {
    if let Some(path) = override_path {
        return load_font_file(path)
            .with_context(|| format!("Failed to load font {}", path.display()));
    }

    for candidate in system_font_candidates() {
        if candidate.is_file() {
            match load_font_file(&candidate) {
                Ok(font) => {
                    tracing::info!("Using system font {}", candidate.display());
                    return Ok(font);
                }
                Err(e) => {
                    tracing::warn!("Skipping font {}: {}", candidate.display(), e);
                }
            }
        }
    }

    bail!(
        "No usable font found; install DejaVu Sans or Liberation Sans, \
         or pass one explicitly with --font <PATH>"
    )
}

/// Parse one font file with fontdue.
pub fn load_font_file(path: &Path) -> Result<Font> {
    let bytes = std::fs::read(path)?;
    Font::from_bytes(bytes, FontSettings::default()).map_err(|e| anyhow!("{}", e))
}

fn system_font_candidates() -> Vec<PathBuf> {
    SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_list_is_not_empty() {
        assert!(!system_font_candidates().is_empty());
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_font(Some(&dir.path().join("nope.ttf")));
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        assert!(load_font_file(&path).is_err());
    }
}
