//! Stroke definitions for borders, segments and highlight outlines.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width, dash style, cap and join
//! - [`StrokeStyle`]: solid, dashed, dotted or a custom dash pattern
//! - [`StrokeCap`] / [`StrokeJoin`]: endpoint and corner rendering
//!
//! Dash patterns are kept as plain lengths so that any output surface can
//! translate them; [`StrokeStyle::dash_array`] returns `None` for solid lines.

use std::str::FromStr;

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// 5 on, 5 off
    Dashed,
    /// 2 on, 3 off
    Dotted,
    /// Repeating on/off lengths
    Custom(Vec<f32>),
}

impl StrokeStyle {
    /// Dash lengths for this style, or `None` for a solid line.
    pub fn dash_array(&self) -> Option<Vec<f32>> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(vec![5.0, 5.0]),
            Self::Dotted => Some(vec![2.0, 3.0]),
            Self::Custom(pattern) if pattern.is_empty() => None,
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }

    /// Multiplies every dash length by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        match self.dash_array() {
            None => Self::Solid,
            Some(pattern) => Self::Custom(pattern.into_iter().map(|v| v * factor).collect()),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            pattern => pattern
                .split([',', ' '])
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<f32>()
                        .map_err(|_| format!("invalid dash pattern `{s}`"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Custom),
        }
    }
}

/// How line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// How line corners are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A stroke for rendering lines and outlines.
///
/// # Examples
///
/// ```
/// use pathview_core::{color::Color, draw::{StrokeCap, StrokeDefinition}};
///
/// let border = StrokeDefinition::solid(Color::new("black").unwrap(), 1.0);
/// let halo = StrokeDefinition::solid(Color::new("#0000ff").unwrap(), 6.0)
///     .with_cap(StrokeCap::Round);
/// assert!(halo.width() > border.width());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a solid stroke with butt caps and miter joins.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self::solid(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: StrokeJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::solid(Color::default(), 1.0)
    }
}
