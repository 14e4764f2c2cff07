//! Font descriptions and text measurement.
//!
//! # Overview
//!
//! - [`FontSpec`]: family, size in points and weight of a label font
//! - [`TextMeasure`]: the measurement seam used by the text fitter
//! - [`CosmicTextMeasure`]: process-wide measurer backed by cosmic-text
//! - [`ApproximateMeasure`]: deterministic per-character advance table
//!
//! Sizes are points; measurements are pixels at 96 DPI
//! ([`FontSpec::pixel_size`]).

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::{info, trace};

const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Line height as a multiple of the pixel size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Ascent as a multiple of the pixel size.
const ASCENT_FACTOR: f32 = 0.8;

/// Font used for a label.
///
/// # Examples
///
/// ```
/// use pathview_core::draw::FontSpec;
///
/// let font = FontSpec::new("Arial", 9).with_bold(true);
/// assert_eq!(font.size(), 9);
/// assert_eq!(font.with_size(8).size(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    family: String,
    size: u16,
    bold: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Size in points
    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Size in pixels at 96 DPI
    pub fn pixel_size(&self) -> f32 {
        f32::from(self.size) * 4.0 / 3.0
    }

    pub fn with_size(mut self, size: u16) -> Self {
        self.size = size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, 9)
    }
}

/// Measures single-line text runs.
///
/// Implementations must be safe to share across threads; one measurer
/// serves all concurrent render requests.
pub trait TextMeasure: Send + Sync {
    /// Advance width of `text` on one line, in pixels
    fn width(&self, text: &str, font: &FontSpec) -> f32;

    /// Distance from the top of a line to its baseline
    fn ascent(&self, font: &FontSpec) -> f32 {
        font.pixel_size() * ASCENT_FACTOR
    }

    /// Distance between consecutive baselines
    fn line_height(&self, font: &FontSpec) -> f32 {
        font.pixel_size() * LINE_HEIGHT_FACTOR
    }
}

/// Deterministic measurer using a fixed advance per character class.
///
/// Used when no system font is available and in tests, where a fixed
/// advance makes label wrapping predictable.
#[derive(Debug, Clone, Default)]
pub struct ApproximateMeasure {
    fixed_advance: Option<f32>,
}

impl ApproximateMeasure {
    /// A measurer where every character advances `factor` times the pixel size.
    pub fn fixed(factor: f32) -> Self {
        Self {
            fixed_advance: Some(factor),
        }
    }

    fn advance(&self, ch: char) -> f32 {
        if let Some(factor) = self.fixed_advance {
            return factor;
        }
        match ch {
            ' ' => 0.28,
            '.' | ',' | ':' | ';' | '!' | '|' | '\'' | 'i' | 'j' | 'l' | 'I' => 0.28,
            '(' | ')' | '[' | ']' | '-' | '/' | 'f' | 't' | 'r' => 0.34,
            'm' | 'w' | 'M' | 'W' => 0.85,
            'A'..='Z' => 0.67,
            '0'..='9' | '+' => 0.56,
            _ if ch.is_ascii() => 0.52,
            _ => 1.0,
        }
    }
}

impl TextMeasure for ApproximateMeasure {
    fn width(&self, text: &str, font: &FontSpec) -> f32 {
        let bold = if font.is_bold() { 1.05 } else { 1.0 };
        text.chars().map(|ch| self.advance(ch)).sum::<f32>() * font.pixel_size() * bold
    }
}

/// Measurer backed by a shared cosmic-text [`FontSystem`].
///
/// The font database is loaded once, on first use, and reused by every
/// later measurement. Text for which no glyphs can be shaped (no fonts
/// installed) falls back to [`ApproximateMeasure`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmicTextMeasure;

struct FontDatabase {
    font_system: Mutex<FontSystem>,
}

static FONT_DATABASE: OnceLock<FontDatabase> = OnceLock::new();

impl FontDatabase {
    fn get() -> &'static FontDatabase {
        FONT_DATABASE.get_or_init(|| {
            info!("Initializing FontSystem");
            FontDatabase {
                font_system: Mutex::new(FontSystem::new()),
            }
        })
    }

    fn shaped_width(&self, text: &str, font: &FontSpec) -> Option<f32> {
        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let font_size_px = font.pixel_size();
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let weight = if font.is_bold() {
            Weight::BOLD
        } else {
            Weight::NORMAL
        };
        let attrs = Attrs::new().family(Family::Name(font.family())).weight(weight);

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .reduce(f32::max)
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn width(&self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match FontDatabase::get().shaped_width(text, font) {
            Some(width) => width,
            None => {
                trace!(text; "No shaped glyphs, using approximate width");
                ApproximateMeasure::default().width(text, font)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_font_pixel_size() {
        assert_approx_eq!(f32, FontSpec::new("Arial", 12).pixel_size(), 16.0);
        assert_approx_eq!(f32, FontSpec::new("Arial", 0).pixel_size(), 0.0);
    }

    #[test]
    fn test_fixed_measure_is_linear() {
        let measure = ApproximateMeasure::fixed(0.5);
        let font = FontSpec::new("Arial", 12);
        assert_approx_eq!(f32, measure.width("abcd", &font), 32.0);
        assert_approx_eq!(f32, measure.width("", &font), 0.0);
        assert_approx_eq!(f32, measure.line_height(&font), 19.2, epsilon = 0.001);
        assert_approx_eq!(f32, measure.ascent(&font), 12.8, epsilon = 0.001);
    }

    #[test]
    fn test_approximate_measure_scales_with_size() {
        let measure = ApproximateMeasure::default();
        let small = measure.width("Glucose", &FontSpec::new("Arial", 8));
        let large = measure.width("Glucose", &FontSpec::new("Arial", 16));
        assert_approx_eq!(f32, large, small * 2.0, epsilon = 0.001);
    }

    #[test]
    fn test_bold_is_wider() {
        let measure = ApproximateMeasure::default();
        let font = FontSpec::new("Arial", 10);
        assert!(measure.width("ATP", &font.clone().with_bold(true)) > measure.width("ATP", &font));
    }

    #[test]
    fn test_cosmic_measure_empty_and_growing() {
        let measure = CosmicTextMeasure;
        let font = FontSpec::default();
        assert_approx_eq!(f32, measure.width("", &font), 0.0);
        assert!(measure.width("ADP", &font) > 0.0);
        assert!(measure.width("ADP + Pi", &font) > measure.width("ADP", &font));
    }
}
