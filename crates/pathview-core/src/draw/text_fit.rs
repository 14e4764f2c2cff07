//! Fitting labels inside fixed node shapes.
//!
//! The fitter works in three steps:
//!
//! 1. [`fit`] tries to place a label at one font size: first on a single
//!    line, then by greedily packing words, splitting words that overflow
//!    at punctuation (see [`fragments`]).
//! 2. [`fit_shrinking`] retries with a font one point smaller on every
//!    failure, down to size 1. Below that the label is not drawn at all.
//! 3. [`layout`] positions the accepted lines: the block is centered
//!    vertically with each baseline one ascent below its line top, and
//!    every line is centered horizontally on its own width.
//!
//! A [`TextPrimitive`] carries a fitted label into the layered canvas. Its
//! optional [`TextSplit`] paints the part of the label left of a split
//! point in an alternate color over a 1px shadow; the lines are not
//! re-fitted for it.

use log::trace;

use crate::{
    color::Color,
    draw::text::{FontSpec, TextMeasure},
    geometry::{Bounds, Point},
};

/// Characters after which an overflowing word may be broken.
pub const SPLIT_PUNCTUATION: [char; 7] = [':', '.', '-', ',', ')', '/', '+'];

/// Splits `word` after every split punctuation character.
///
/// Every fragment except possibly the last ends with one of
/// [`SPLIT_PUNCTUATION`].
///
/// ```
/// use pathview_core::draw::text_fit::fragments;
///
/// assert_eq!(fragments("p-S473-AKT1"), ["p-", "S473-", "AKT1"]);
/// assert_eq!(fragments("ATP"), ["ATP"]);
/// ```
pub fn fragments(word: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (index, ch) in word.char_indices() {
        if SPLIT_PUNCTUATION.contains(&ch) {
            let end = index + ch.len_utf8();
            parts.push(&word[start..end]);
            start = end;
        }
    }
    if start < word.len() {
        parts.push(&word[start..]);
    }
    parts
}

/// Wraps `text` into lines no wider than `max_width` at the given font.
///
/// Returns `None` when the text cannot be placed at this size: a fragment
/// alone is wider than `max_width`, or the wrapped lines are taller than
/// `max_height`.
pub fn fit(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    max_height: f32,
    measure: &dyn TextMeasure,
) -> Option<Vec<String>> {
    let line_height = measure.line_height(font);
    let fits = |candidate: &str| measure.width(candidate, font) <= max_width;

    if fits(text) && line_height <= max_height {
        return Some(vec![text.to_string()]);
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let joined = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&joined) {
            current = joined;
            continue;
        }
        for (position, fragment) in fragments(word).into_iter().enumerate() {
            let separator = if position == 0 && !current.is_empty() {
                " "
            } else {
                ""
            };
            let candidate = format!("{current}{separator}{fragment}");
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !fits(fragment) {
                return None;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = fragment.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() as f32 * line_height > max_height {
        return None;
    }
    Some(lines)
}

/// Fits `text` inside `bounds`, shrinking the font one point at a time.
///
/// Returns `None` when the label does not fit even at size 1; callers
/// draw nothing in that case.
pub fn fit_shrinking(
    text: &str,
    font: &FontSpec,
    bounds: Bounds,
    measure: &dyn TextMeasure,
) -> Option<FittedText> {
    if text.trim().is_empty() {
        return None;
    }
    for size in (1..=font.size()).rev() {
        let attempt = font.clone().with_size(size);
        if let Some(lines) = fit(text, &attempt, bounds.width(), bounds.height(), measure) {
            return Some(layout(lines, attempt, bounds, measure));
        }
    }
    trace!(text, width = bounds.width(), height = bounds.height(); "Label does not fit, skipping");
    None
}

/// Positions already-wrapped lines inside `bounds`.
pub fn layout(
    lines: Vec<String>,
    font: FontSpec,
    bounds: Bounds,
    measure: &dyn TextMeasure,
) -> FittedText {
    let line_height = measure.line_height(&font);
    let ascent = measure.ascent(&font);
    let center = bounds.center();
    let top = center.y() - lines.len() as f32 * line_height / 2.0;

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let width = measure.width(&text, &font);
            let baseline = top + index as f32 * line_height + ascent;
            FittedLine {
                origin: Point::new(center.x() - width / 2.0, baseline),
                width,
                text,
            }
        })
        .collect();

    FittedText {
        font,
        line_height,
        lines,
    }
}

/// One positioned line of a fitted label.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLine {
    text: String,
    /// Left end of the baseline
    origin: Point,
    width: f32,
}

impl FittedLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// A label that has been fitted and laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    font: FontSpec,
    line_height: f32,
    lines: Vec<FittedLine>,
}

impl FittedText {
    /// The font size the label was accepted at
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn lines(&self) -> &[FittedLine] {
        &self.lines
    }
}

/// Two-color overlay of a fitted label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSplit {
    /// Fraction of the label box, from the left, drawn in `color`
    pub point: f32,
    pub color: Color,
    /// Color of the 1px offset copy drawn beneath the left part
    pub shadow: Color,
}

/// Offset of the shadow copy under the split region.
const SHADOW_OFFSET: f32 = 1.0;

/// A label ready for the text layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    text: FittedText,
    color: Color,
    bounds: Bounds,
    split: Option<TextSplit>,
}

impl TextPrimitive {
    pub fn new(text: FittedText, color: Color, bounds: Bounds) -> Self {
        Self {
            text,
            color,
            bounds,
            split: None,
        }
    }

    /// Adds a split overlay; a point outside `(0, 1]` leaves the label single-colored.
    pub fn with_split(mut self, split: TextSplit) -> Self {
        if split.point > 0.0 && split.point.is_finite() {
            self.split = Some(TextSplit {
                point: split.point.min(1.0),
                ..split
            });
        }
        self
    }

    pub fn text(&self) -> &FittedText {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn split(&self) -> Option<&TextSplit> {
        self.split.as_ref()
    }

    /// Expands the label into concrete runs in paint order.
    ///
    /// Without a split every line yields one run in the base color. With a
    /// split, each line yields the base color clipped right of the split,
    /// then the shadow copy and the alternate color clipped left of it.
    pub fn runs(&self) -> Vec<TextRun> {
        let font = self.text.font();
        let Some(split) = self.split else {
            return self
                .text
                .lines()
                .iter()
                .map(|line| TextRun::new(line, font, self.color, None))
                .collect();
        };

        let split_x = self.bounds.min_x() + split.point * self.bounds.width();
        let left = Bounds::new(
            self.bounds.min_x(),
            self.bounds.min_y(),
            split_x,
            self.bounds.max_y(),
        );
        let right = Bounds::new(
            split_x,
            self.bounds.min_y(),
            self.bounds.max_x(),
            self.bounds.max_y(),
        );

        let mut runs = Vec::with_capacity(self.text.lines().len() * 3);
        for line in self.text.lines() {
            if split.point < 1.0 {
                runs.push(TextRun::new(line, font, self.color, Some(right)));
            }
            let shadow = TextRun::new(line, font, split.shadow, Some(left));
            runs.push(TextRun {
                origin: shadow.origin.add_point(Point::new(SHADOW_OFFSET, SHADOW_OFFSET)),
                ..shadow
            });
            runs.push(TextRun::new(line, font, split.color, Some(left)));
        }
        runs
    }
}

/// A single line of text at a fixed position, as handed to a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Left end of the baseline
    pub origin: Point,
    pub font: FontSpec,
    pub color: Color,
    /// Region outside of which the run is not painted
    pub clip: Option<Bounds>,
}

impl TextRun {
    fn new(line: &FittedLine, font: &FontSpec, color: Color, clip: Option<Bounds>) -> Self {
        Self {
            text: line.text.clone(),
            origin: line.origin,
            font: font.clone(),
            color,
            clip,
        }
    }
}
