use std::path::Path;
use std::sync::OnceLock;

use fontdue::{Font, FontSettings};
use log::{debug, warn};

use zplrast_analyzer::RasterImage;

/// Process-wide face registry, loaded on first demand.
///
/// The regular face comes from the bundled font path; the bold variants are
/// best-effort system lookups and may be absent. Every face is optional:
/// with no face at all, measurement falls back to a heuristic advance and
/// glyph painting is skipped.
pub struct FontRegistry {
    sans: Option<Font>,
    bold: Option<Font>,
    condensed_bold: Option<Font>,
}

static REGISTRY: OnceLock<FontRegistry> = OnceLock::new();

const SANS_PATHS: &[&str] = &[
    concat!(env!("CARGO_MANIFEST_DIR"), "/fonts/DejaVuSans.ttf"),
    "fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

const BOLD_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
];

const CONDENSED_BOLD_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansCondensed-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansCondensed-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSansCondensed-Bold.ttf",
];

/// First-demand load; repeat calls return the same registry untouched.
pub fn ensure_fonts() -> &'static FontRegistry {
    REGISTRY.get_or_init(FontRegistry::load)
}

impl FontRegistry {
    fn load() -> Self {
        let sans = load_first(SANS_PATHS);
        if sans.is_none() {
            warn!("no DejaVu Sans face found; text fields will not be painted");
        }
        let bold = load_first(BOLD_PATHS);
        let condensed_bold = load_first(CONDENSED_BOLD_PATHS);
        if bold.is_none() && condensed_bold.is_none() {
            debug!("no bold DejaVu variant found, falling back to the regular face");
        }
        Self {
            sans,
            bold,
            condensed_bold,
        }
    }

    /// Face for a ZPL font designator: `'0'` prefers the condensed bold,
    /// then bold, then regular; everything else uses the regular face.
    pub fn face_for(&self, designator: char) -> Option<&Font> {
        if designator == '0' {
            self.condensed_bold
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.sans.as_ref())
        } else {
            self.sans.as_ref()
        }
    }

    /// Sum of glyph advances at the given pixel size, falling back to
    /// `0.6 × size` per character without a face.
    pub fn measure(&self, designator: char, text: &str, px: f32) -> f32 {
        match self.face_for(designator) {
            Some(font) => text.chars().map(|c| font.metrics(c, px).advance_width).sum(),
            None => text.chars().count() as f32 * px * 0.6,
        }
    }

    /// Rasterize `text` straight into an RGBA canvas, baseline at
    /// `(x, baseline)`. Used for barcode interpretation lines; a missing
    /// face skips painting.
    pub fn raster_text(
        &self,
        img: &mut RasterImage,
        designator: char,
        text: &str,
        px: f32,
        x: f32,
        baseline: f32,
    ) {
        let Some(font) = self.face_for(designator) else {
            return;
        };
        let mut pen_x = x;
        for ch in text.chars() {
            let (metrics, coverage) = font.rasterize(ch, px);
            if metrics.width == 0 || metrics.height == 0 {
                pen_x += metrics.advance_width;
                continue;
            }
            let gx = (pen_x + metrics.xmin as f32).round() as i32;
            let gy = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    let px_x = gx + col as i32;
                    let px_y = gy + row as i32;
                    if px_x < 0 || px_y < 0 {
                        continue;
                    }
                    // Ink over white: darken proportionally to coverage.
                    let shade = 255 - alpha;
                    img.set(px_x as u32, px_y as u32, [shade, shade, shade, 255]);
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

fn load_first(paths: &[&str]) -> Option<Font> {
    for path in paths {
        if !Path::new(path).is_file() {
            continue;
        }
        match std::fs::read(path) {
            Ok(bytes) => match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => {
                    debug!("loaded font {path}");
                    return Some(font);
                }
                Err(err) => warn!("unusable font {path}: {err}"),
            },
            Err(err) => warn!("failed to read font {path}: {err}"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::ensure_fonts;

    #[test]
    fn repeated_demand_returns_the_same_registry() {
        let a = ensure_fonts() as *const _;
        let b = ensure_fonts() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn measurement_is_monotonic_in_text_length() {
        let reg = ensure_fonts();
        let short = reg.measure('0', "HI", 30.0);
        let long = reg.measure('0', "HIHI", 30.0);
        assert!(long > short);
        assert!(short > 0.0);
    }
}
