//! Configuration for rendering requests.
//!
//! [`AppConfig`] is the deserializable root read from TOML. A
//! [`RenderConfig`] is derived from it once per request and threaded through
//! the whole pipeline; every pixel quantity in it is already multiplied by
//! the output scale factor.

use std::path::PathBuf;

use serde::Deserialize;

use pathview_core::{
    draw::FontSpec,
    geometry::{Insets, Size},
};

use crate::profile::{ColorProfile, ProfileError};

const DEFAULT_PROFILE: &str = "modern";
const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_FONT_SIZE: u16 = 9;

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    render: RenderSection,

    #[serde(default)]
    profile: ProfileSection,
}

impl AppConfig {
    pub fn new(render: RenderSection, profile: ProfileSection) -> Self {
        Self { render, profile }
    }

    pub fn render(&self) -> &RenderSection {
        &self.render
    }

    pub fn profile(&self) -> &ProfileSection {
        &self.profile
    }
}

/// `[render]` section
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_scale")]
    scale: f32,
    #[serde(default = "default_font_family")]
    font_family: String,
    #[serde(default = "default_font_size")]
    font_size: u16,
    /// Space around the diagram at scale 1
    margin: Option<f32>,
}

fn default_scale() -> f32 {
    1.0
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> u16 {
    DEFAULT_FONT_SIZE
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            margin: None,
        }
    }
}

impl RenderSection {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: u16) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = Some(margin);
        self
    }
}

/// `[profile]` section: a built-in profile name or a path to a profile document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSection {
    name: Option<String>,
    path: Option<PathBuf>,
}

impl ProfileSection {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: None,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            path: Some(path.into()),
        }
    }

    /// Loads the configured profile; a path wins over a name, and the
    /// `modern` profile is used when neither is set.
    pub fn load(&self) -> Result<ColorProfile, ProfileError> {
        match (&self.path, &self.name) {
            (Some(path), _) => ColorProfile::from_path(path),
            (None, Some(name)) => ColorProfile::builtin(name),
            (None, None) => ColorProfile::builtin(DEFAULT_PROFILE),
        }
    }
}

/// Pixel sizes and fonts for one render request.
///
/// # Examples
///
/// ```
/// use pathview::config::RenderConfig;
///
/// let thumbnail = RenderConfig::for_scale(0.5);
/// let legend = thumbnail.legend_size();
/// assert_eq!(legend.width(), 35.0);
/// assert_eq!(legend.height(), 175.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    scale: f32,
    margin: f32,
    node_border_width: f32,
    halo_width: f32,
    flag_width: f32,
    selection_width: f32,
    segment_width: f32,
    corner_radius: f32,
    label_font: FontSpec,
    attachment_font: FontSpec,
    label_padding: Insets,
    legend_size: Size,
    legend_margin: f32,
    tick_overhang: f32,
}

/// Scales a font size, never going below one point.
fn scaled_font(family: &str, size: u16, scale: f32) -> FontSpec {
    let scaled = (f32::from(size) * scale).round().clamp(1.0, f32::from(u16::MAX));
    FontSpec::new(family, scaled as u16)
}

impl RenderConfig {
    /// Default sizes multiplied by `scale`.
    ///
    /// A non-positive or non-finite scale is treated as 1.
    pub fn for_scale(scale: f32) -> Self {
        Self::build(scale, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, 15.0)
    }

    /// Derives the request configuration from the application configuration.
    pub fn from_app(config: &AppConfig) -> Self {
        let render = config.render();
        Self::build(
            render.scale(),
            render.font_family(),
            render.font_size(),
            render.margin.unwrap_or(15.0),
        )
    }

    fn build(scale: f32, family: &str, font_size: u16, margin: f32) -> Self {
        let f = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale: f,
            margin: margin * f,
            node_border_width: 1.0 * f,
            halo_width: 6.0 * f,
            flag_width: 4.0 * f,
            selection_width: 2.0 * f,
            segment_width: 1.0 * f,
            corner_radius: 8.0 * f,
            label_font: scaled_font(family, font_size, f),
            attachment_font: scaled_font(family, font_size.saturating_sub(2).max(1), f),
            label_padding: Insets::uniform(4.0 * f),
            legend_size: Size::new(70.0 * f, 350.0 * f),
            legend_margin: 20.0 * f,
            tick_overhang: 8.0 * f,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Space left around the diagram bounding box
    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn node_border_width(&self) -> f32 {
        self.node_border_width
    }

    pub fn halo_width(&self) -> f32 {
        self.halo_width
    }

    pub fn flag_width(&self) -> f32 {
        self.flag_width
    }

    pub fn selection_width(&self) -> f32 {
        self.selection_width
    }

    pub fn segment_width(&self) -> f32 {
        self.segment_width
    }

    /// Corner radius of rounded and cut node shapes
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn label_font(&self) -> &FontSpec {
        &self.label_font
    }

    /// Font of attachment and stoichiometry labels
    pub fn attachment_font(&self) -> &FontSpec {
        &self.attachment_font
    }

    pub fn label_padding(&self) -> Insets {
        self.label_padding
    }

    /// Maximum legend size; shorter diagrams shrink it proportionally
    pub fn legend_size(&self) -> Size {
        self.legend_size
    }

    /// Gap between the diagram bounding box and the legend
    pub fn legend_margin(&self) -> f32 {
        self.legend_margin
    }

    /// How far ticks extend past each side of the legend bar
    pub fn tick_overhang(&self) -> f32 {
        self.tick_overhang
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::for_scale(1.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_render_config_scales_widths() {
        let base = RenderConfig::for_scale(1.0);
        let double = RenderConfig::for_scale(2.0);
        assert_approx_eq!(f32, double.halo_width(), base.halo_width() * 2.0);
        assert_approx_eq!(f32, double.margin(), 30.0);
        assert_eq!(double.label_font().size(), 18);
        assert_approx_eq!(f32, base.legend_size().width(), 70.0);
        assert_approx_eq!(f32, base.legend_size().height(), 350.0);
    }

    #[test]
    fn test_render_config_rejects_bad_scale() {
        assert_eq!(RenderConfig::for_scale(0.0), RenderConfig::for_scale(1.0));
        assert_eq!(RenderConfig::for_scale(f32::NAN), RenderConfig::for_scale(1.0));
    }

    #[test]
    fn test_tiny_scale_keeps_font_positive() {
        assert_eq!(RenderConfig::for_scale(0.01).label_font().size(), 1);
    }

    #[test]
    fn test_app_config_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [render]
            scale = 2.0
            font_family = "Helvetica"
            margin = 5

            [profile]
            name = "standard"
            "#,
        )
        .unwrap();
        let render = RenderConfig::from_app(&config);
        assert_approx_eq!(f32, render.margin(), 10.0);
        assert_eq!(render.label_font().family(), "Helvetica");
        assert_eq!(render.label_font().size(), 18);
        assert_eq!(config.profile().load().unwrap().name(), "standard");
    }

    #[test]
    fn test_app_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_approx_eq!(f32, config.render().scale(), 1.0);
        assert_eq!(config.profile().load().unwrap().name(), "modern");
    }
}
