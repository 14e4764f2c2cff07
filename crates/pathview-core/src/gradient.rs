//! Multi-stop color gradients used by analysis overlays and legends.
//!
//! A [`Gradient`] holds two or three `(offset, color)` stops. The first stop
//! sits at offset `0`, the last at offset `1`, and offsets strictly increase.
//! [`Gradient::interpolate`] maps a scalar in `[0, 1]` onto the gradient.

use thiserror::Error;

use crate::color::Color;

/// Errors raised when building a [`Gradient`]
#[derive(Debug, Error, PartialEq)]
pub enum GradientError {
    #[error("gradient needs 2 or 3 stops, got {0}")]
    StopCount(usize),

    #[error("gradient must start at offset 0 and end at offset 1")]
    OpenEnded,

    #[error("gradient offsets must strictly increase (stop {index} at {offset})")]
    NotIncreasing { index: usize, offset: f32 },
}

/// A single gradient stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    offset: f32,
    color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// An immutable, validated color gradient.
///
/// # Examples
///
/// ```
/// use pathview_core::{color::Color, gradient::Gradient};
///
/// let min = Color::new("#ffff00").unwrap();
/// let max = Color::new("#0000ff").unwrap();
/// let gradient = Gradient::two_stop(min, max);
///
/// assert_eq!(gradient.interpolate(0.0), min);
/// assert_eq!(gradient.interpolate(1.0), max);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Creates a gradient from explicit stops.
    ///
    /// # Errors
    ///
    /// Returns a [`GradientError`] when the stop count is not 2 or 3, when
    /// the ends are not at `0` and `1`, or when offsets do not strictly increase.
    pub fn new(stops: Vec<GradientStop>) -> Result<Self, GradientError> {
        if !(2..=3).contains(&stops.len()) {
            return Err(GradientError::StopCount(stops.len()));
        }
        let first = stops[0].offset;
        let last = stops[stops.len() - 1].offset;
        if first != 0.0 || last != 1.0 {
            return Err(GradientError::OpenEnded);
        }
        for (index, pair) in stops.windows(2).enumerate() {
            if pair[1].offset <= pair[0].offset || pair[1].offset.is_nan() {
                return Err(GradientError::NotIncreasing {
                    index: index + 1,
                    offset: pair[1].offset,
                });
            }
        }
        Ok(Self { stops })
    }

    /// Gradient from `min` at offset 0 to `max` at offset 1.
    pub fn two_stop(min: Color, max: Color) -> Self {
        Self {
            stops: vec![GradientStop::new(0.0, min), GradientStop::new(1.0, max)],
        }
    }

    /// Three-stop gradient with `stop` at offset 0.5.
    pub fn three_stop(min: Color, stop: Color, max: Color) -> Self {
        Self {
            stops: vec![
                GradientStop::new(0.0, min),
                GradientStop::new(0.5, stop),
                GradientStop::new(1.0, max),
            ],
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at the lowest end of the gradient
    pub fn min_color(&self) -> Color {
        self.stops[0].color
    }

    /// Color at the highest end of the gradient
    pub fn max_color(&self) -> Color {
        self.stops[self.stops.len() - 1].color
    }

    /// Returns the gradient color for `t`.
    ///
    /// `t` is clamped to `[0, 1]`. At a stop offset the stop's exact color is
    /// returned; between stops the bracketing colors are mixed linearly in sRGB.
    /// A NaN `t` maps to the minimum color.
    pub fn interpolate(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        for pair in self.stops.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if t == lower.offset {
                return lower.color;
            }
            if t < upper.offset {
                let local = (t - lower.offset) / (upper.offset - lower.offset);
                return lower.color.lerp(upper.color, local);
            }
        }
        self.max_color()
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn gradient() -> Gradient {
        Gradient::three_stop(
            Color::new("#000000").unwrap(),
            Color::new("#808080").unwrap(),
            Color::new("#ffffff").unwrap(),
        )
    }

    /// On a grey ramp the red channel must never decrease as `t` grows.
    fn check_interpolation_is_monotonic(t1: f32, t2: f32) -> Result<(), TestCaseError> {
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let gradient = gradient();
        let a = gradient.interpolate(lo).components()[0];
        let b = gradient.interpolate(hi).components()[0];
        prop_assert!(a <= b + 1e-5, "interpolate({lo}) = {a} > interpolate({hi}) = {b}");
        Ok(())
    }

    /// Every interpolated component stays within `[0, 1]`.
    fn check_components_in_range(t: f32) -> Result<(), TestCaseError> {
        for c in gradient().interpolate(t).components() {
            prop_assert!((0.0..=1.0 + 1e-5).contains(&c));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn interpolation_is_monotonic(t1 in -0.5f32..1.5, t2 in -0.5f32..1.5) {
            check_interpolation_is_monotonic(t1, t2)?;
        }

        #[test]
        fn components_in_range(t in -10.0f32..10.0) {
            check_components_in_range(t)?;
        }
    }
}
