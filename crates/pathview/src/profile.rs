//! Color profiles.
//!
//! A profile is a TOML document ([`ProfileDocument`]) holding a palette per
//! renderable class, global decoration colors and the analysis gradients.
//! It is validated once into a [`ColorProfile`], whose lookups never fail:
//! every class gets a fully resolved [`ClassPalette`], with unset channels
//! inherited from the `[classes.default]` entry.
//!
//! Two profiles ship with the crate, see [`BUILTIN_PROFILES`].

use std::{fs, path::Path};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use pathview_core::{
    color::Color,
    gradient::{Gradient, GradientError, GradientStop},
    semantic::RenderableClass,
};

/// Names of the profiles embedded in the crate.
pub const BUILTIN_PROFILES: [&str; 2] = ["modern", "standard"];

const MODERN: &str = include_str!("profiles/modern.toml");
const STANDARD: &str = include_str!("profiles/standard.toml");

const DEFAULT_CLASS: &str = "default";

/// Errors raised while loading a profile
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("unknown built-in profile `{0}`")]
    UnknownProfile(String),

    #[error("failed to read profile `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid color for `{key}`: {message}")]
    InvalidColor { key: String, message: String },

    #[error("unknown renderable class `{0}`")]
    UnknownClass(String),

    #[error("no `{channel}` color for class `{class}` and no default")]
    MissingColor { class: String, channel: &'static str },

    #[error("invalid `{key}` gradient: {source}")]
    Gradient {
        key: &'static str,
        #[source]
        source: GradientError,
    },
}

// =============================================================================
// Document
// =============================================================================

/// The serialized form of a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDocument {
    name: String,
    background: String,
    global: GlobalDocument,
    analysis: AnalysisDocument,
    legend: LegendDocument,
    classes: IndexMap<String, ClassDocument>,
}

#[derive(Debug, Clone, Deserialize)]
struct GlobalDocument {
    selection: String,
    halo: String,
    flag: String,
    disease: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalysisDocument {
    text: String,
    hit_text: String,
    enrichment: GradientDocument,
    expression: GradientDocument,
}

#[derive(Debug, Clone, Deserialize)]
struct GradientDocument {
    min: String,
    stop: Option<String>,
    stop_offset: Option<f32>,
    max: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LegendDocument {
    background: String,
    border: String,
    text: String,
    tick: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ClassDocument {
    fill: Option<String>,
    stroke: Option<String>,
    text: Option<String>,
    fade_out_fill: Option<String>,
    fade_out_stroke: Option<String>,
    fade_out_text: Option<String>,
    lighter_fill: Option<String>,
    lighter_stroke: Option<String>,
    lighter_text: Option<String>,
}

fn parse_color(key: &str, value: &str) -> Result<Color, ProfileError> {
    Color::new(value).map_err(|message| ProfileError::InvalidColor {
        key: key.to_string(),
        message,
    })
}

impl GradientDocument {
    fn resolve(&self, key: &'static str) -> Result<Gradient, ProfileError> {
        let min = parse_color(key, &self.min)?;
        let max = parse_color(key, &self.max)?;
        let mut stops = vec![GradientStop::new(0.0, min)];
        if let Some(stop) = &self.stop {
            let offset = self.stop_offset.unwrap_or(0.5);
            stops.push(GradientStop::new(offset, parse_color(key, stop)?));
        }
        stops.push(GradientStop::new(1.0, max));
        Gradient::new(stops).map_err(|source| ProfileError::Gradient { key, source })
    }
}

impl ProfileDocument {
    /// Parses a profile document from TOML.
    pub fn from_toml(source: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(source)?)
    }

    /// Validates the document into a ready-to-use profile.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] for unparsable colors, class names that are
    /// not renderable classes, channels missing from both a class and the
    /// default entry, and malformed gradients.
    pub fn resolve(&self) -> Result<ColorProfile, ProfileError> {
        for class_name in self.classes.keys() {
            if class_name != DEFAULT_CLASS && class_from_name(class_name).is_none() {
                return Err(ProfileError::UnknownClass(class_name.clone()));
            }
        }
        let default = self.classes.get(DEFAULT_CLASS).cloned().unwrap_or_default();

        let mut classes = IndexMap::with_capacity(RenderableClass::ALL.len());
        for class in RenderableClass::ALL {
            let entry = self.classes.get(class.name());
            let palette = ClassPalette::resolve(class.name(), entry, &default)?;
            classes.insert(class, palette);
        }

        let global = &self.global;
        let analysis = &self.analysis;
        let legend = &self.legend;
        let profile = ColorProfile {
            name: self.name.clone(),
            background: parse_color("background", &self.background)?,
            selection: parse_color("global.selection", &global.selection)?,
            halo: parse_color("global.halo", &global.halo)?,
            flag: parse_color("global.flag", &global.flag)?,
            disease: parse_color("global.disease", &global.disease)?,
            analysis: AnalysisPalette {
                text: parse_color("analysis.text", &analysis.text)?,
                hit_text: parse_color("analysis.hit_text", &analysis.hit_text)?,
                enrichment: analysis.enrichment.resolve("analysis.enrichment")?,
                expression: analysis.expression.resolve("analysis.expression")?,
            },
            legend: LegendPalette {
                background: parse_color("legend.background", &legend.background)?,
                border: parse_color("legend.border", &legend.border)?,
                text: parse_color("legend.text", &legend.text)?,
                tick: parse_color("legend.tick", &legend.tick)?,
            },
            classes,
        };
        debug!(name = profile.name.as_str(); "Color profile resolved");
        Ok(profile)
    }
}

fn class_from_name(name: &str) -> Option<RenderableClass> {
    RenderableClass::ALL.into_iter().find(|class| class.name() == name)
}

// =============================================================================
// Resolved profile
// =============================================================================

/// Colors of one renderable class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPalette {
    pub fill: Color,
    pub stroke: Color,
    pub text: Color,
    pub fade_out_fill: Color,
    pub fade_out_stroke: Color,
    pub fade_out_text: Color,
    pub lighter_fill: Color,
    pub lighter_stroke: Color,
    pub lighter_text: Color,
}

impl ClassPalette {
    fn resolve(
        class: &str,
        entry: Option<&ClassDocument>,
        default: &ClassDocument,
    ) -> Result<Self, ProfileError> {
        let channel = |name: &'static str,
                       pick: fn(&ClassDocument) -> &Option<String>|
         -> Result<Color, ProfileError> {
            let value = entry
                .and_then(|doc| pick(doc).as_deref())
                .or_else(|| pick(default).as_deref())
                .ok_or_else(|| ProfileError::MissingColor {
                    class: class.to_string(),
                    channel: name,
                })?;
            parse_color(&format!("classes.{class}.{name}"), value)
        };

        Ok(Self {
            fill: channel("fill", |d| &d.fill)?,
            stroke: channel("stroke", |d| &d.stroke)?,
            text: channel("text", |d| &d.text)?,
            fade_out_fill: channel("fade_out_fill", |d| &d.fade_out_fill)?,
            fade_out_stroke: channel("fade_out_stroke", |d| &d.fade_out_stroke)?,
            fade_out_text: channel("fade_out_text", |d| &d.fade_out_text)?,
            lighter_fill: channel("lighter_fill", |d| &d.lighter_fill)?,
            lighter_stroke: channel("lighter_stroke", |d| &d.lighter_stroke)?,
            lighter_text: channel("lighter_text", |d| &d.lighter_text)?,
        })
    }
}

/// Colors used by analysis overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPalette {
    /// Label color of elements not hit by the analysis
    pub text: Color,
    /// Label color of analysis hits
    pub hit_text: Color,
    pub enrichment: Gradient,
    pub expression: Gradient,
}

/// Colors of the analysis legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendPalette {
    pub background: Color,
    pub border: Color,
    pub text: Color,
    pub tick: Color,
}

/// A validated, read-only color profile.
///
/// # Examples
///
/// ```
/// use pathview::profile::ColorProfile;
/// use pathview_core::semantic::RenderableClass;
///
/// let profile = ColorProfile::builtin("modern").unwrap();
/// let protein = profile.palette(RenderableClass::Protein);
/// assert_eq!(protein.fill.to_hex(), "#8fc19d");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColorProfile {
    name: String,
    background: Color,
    selection: Color,
    halo: Color,
    flag: Color,
    disease: Color,
    analysis: AnalysisPalette,
    legend: LegendPalette,
    classes: IndexMap<RenderableClass, ClassPalette>,
}

impl ColorProfile {
    /// Loads one of the [`BUILTIN_PROFILES`].
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        let source = match name {
            "modern" => MODERN,
            "standard" => STANDARD,
            other => return Err(ProfileError::UnknownProfile(other.to_string())),
        };
        Self::from_toml(source)
    }

    /// Parses and validates a TOML profile document.
    pub fn from_toml(source: &str) -> Result<Self, ProfileError> {
        ProfileDocument::from_toml(source)?.resolve()
    }

    /// Reads a TOML profile document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Stroke color of selected elements
    pub fn selection(&self) -> Color {
        self.selection
    }

    pub fn halo(&self) -> Color {
        self.halo
    }

    pub fn flag(&self) -> Color {
        self.flag
    }

    /// Stroke and text color of disease elements
    pub fn disease(&self) -> Color {
        self.disease
    }

    pub fn analysis(&self) -> &AnalysisPalette {
        &self.analysis
    }

    pub fn legend(&self) -> &LegendPalette {
        &self.legend
    }

    /// The palette of a renderable class.
    pub fn palette(&self, class: RenderableClass) -> &ClassPalette {
        // every class is inserted by `ProfileDocument::resolve`
        &self.classes[&class]
    }
}
