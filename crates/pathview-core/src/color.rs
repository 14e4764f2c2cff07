//! Color handling for Pathview diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, providing convenience methods for working with colors
//! in palettes, gradients and output surfaces.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathview_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a color from straight (non-premultiplied) sRGB components in `[0, 1]`.
    pub fn from_srgb(components: [f32; 4]) -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::new(components)),
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathview_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the color as straight sRGB components `[r, g, b, a]`, each in `[0, 1]`.
    pub fn components(&self) -> [f32; 4] {
        self.color.to_alpha_color::<Srgb>().components
    }

    /// Linear interpolation in sRGB space.
    ///
    /// `t` is clamped to `[0, 1]`; `t = 0` yields `self` and `t = 1` yields `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathview_core::color::Color;
    ///
    /// let black = Color::new("black").unwrap();
    /// let white = Color::new("white").unwrap();
    /// let grey = black.lerp(white, 0.5);
    /// assert!((grey.components()[0] - 0.5).abs() < 0.001);
    /// ```
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return self;
        }
        if t == 1.0 {
            return other;
        }
        let from = self.components();
        let to = other.components();
        let mut mixed = [0.0f32; 4];
        for (channel, value) in mixed.iter_mut().enumerate() {
            *value = (to[channel] - from[channel]).mul_add(t, from[channel]);
        }
        Color::from_srgb(mixed)
    }

    /// Returns the `#rrggbb` form of this color, ignoring alpha.
    ///
    /// ```
    /// use pathview_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.components();
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_srgb([0.0, 0.0, 0.0, 1.0])
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}
