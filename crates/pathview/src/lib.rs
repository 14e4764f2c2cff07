//! Pathview - A renderer for laid-out pathway diagrams.
//!
//! Takes a diagram whose geometry is already computed, a set of decorations
//! (selection, flags, analysis highlights) and optional analysis results,
//! and paints them onto an output surface: element shapes, halos, analysis
//! overlays and a color legend. Expression data with several columns can
//! be exported as one frame per column.

pub mod config;
pub mod export;
pub mod index;
pub mod legend;
pub mod profile;
pub mod render;
pub mod scene;
pub mod style;

mod error;

pub use pathview_core::{color, draw, geometry, gradient, semantic};

pub use error::PathviewError;

use std::sync::Arc;

use log::{debug, info};

use draw::{CosmicTextMeasure, Surface, TextMeasure};
use semantic::{AnalysisDataset, AnalysisType, DecorationSet, Diagram};

use config::{AppConfig, RenderConfig};
use export::SvgSurface;
use profile::ColorProfile;
use scene::Scene;

/// Renders pathway diagrams with a fixed configuration and color profile.
///
/// # Examples
///
/// ```rust,no_run
/// use pathview::{DiagramRenderer, config::AppConfig, semantic::*};
///
/// let renderer = DiagramRenderer::new(AppConfig::default())
///     .expect("Failed to load profile");
///
/// let diagram = Diagram::new("R-HSA-109581", "Apoptosis");
/// let svg = renderer
///     .render_svg(&diagram, &DecorationSet::new(), &AnalysisDataset::none())
///     .expect("Failed to render");
/// println!("{svg}");
/// ```
pub struct DiagramRenderer {
    config: AppConfig,
    render_config: RenderConfig,
    profile: ColorProfile,
    measure: Arc<dyn TextMeasure>,
}

impl DiagramRenderer {
    /// Create a renderer, loading the color profile named by `config`.
    ///
    /// Text is measured with the system fonts.
    ///
    /// # Errors
    ///
    /// Returns [`PathviewError::Profile`] when the profile cannot be loaded.
    pub fn new(config: AppConfig) -> Result<Self, PathviewError> {
        let profile = config.profile().load()?;
        let render_config = RenderConfig::from_app(&config);
        debug!(profile = profile.name(), scale = render_config.scale(); "Renderer configured");
        Ok(Self {
            config,
            render_config,
            profile,
            measure: Arc::new(CosmicTextMeasure::default()),
        })
    }

    /// Replace the color profile.
    pub fn with_profile(mut self, profile: ColorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replace the text measurer.
    pub fn with_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Replace the derived render configuration.
    pub fn with_render_config(mut self, render_config: RenderConfig) -> Self {
        self.render_config = render_config;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    pub fn profile(&self) -> &ColorProfile {
        &self.profile
    }

    /// Index the inputs and render their static layers.
    ///
    /// # Errors
    ///
    /// Returns [`PathviewError::UnrenderableGeometry`] for an unknown shape
    /// descriptor type.
    pub fn scene<'a>(
        &'a self,
        diagram: &'a Diagram,
        decoration: &'a DecorationSet,
        analysis: &'a AnalysisDataset,
    ) -> Result<Scene<'a>, PathviewError> {
        Scene::build(
            diagram,
            decoration,
            analysis,
            &self.profile,
            &self.render_config,
            &*self.measure,
        )
    }

    /// Render the first analysis column onto `surface`.
    pub fn render<S>(
        &self,
        diagram: &Diagram,
        decoration: &DecorationSet,
        analysis: &AnalysisDataset,
        surface: &mut S,
    ) -> Result<(), PathviewError>
    where
        S: Surface + ?Sized,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        self.render_column(diagram, decoration, analysis, 0, surface)
    }

    /// Render one analysis column onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`PathviewError::ColumnOutOfRange`] for a column the analysis
    /// does not have, and [`PathviewError::Export`] when the surface fails.
    pub fn render_column<S>(
        &self,
        diagram: &Diagram,
        decoration: &DecorationSet,
        analysis: &AnalysisDataset,
        column: usize,
        surface: &mut S,
    ) -> Result<(), PathviewError>
    where
        S: Surface + ?Sized,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        info!(diagram = diagram.stable_id(), column; "Rendering diagram");
        let mut scene = self.scene(diagram, decoration, analysis)?;
        let frame = scene.frame(column)?;
        scene.composite(&frame, surface)?;
        info!("Diagram rendered");
        Ok(())
    }

    /// Render the first analysis column to an SVG document.
    pub fn render_svg(
        &self,
        diagram: &Diagram,
        decoration: &DecorationSet,
        analysis: &AnalysisDataset,
    ) -> Result<String, PathviewError> {
        let mut surface = self.svg_surface();
        self.render(diagram, decoration, analysis, &mut surface)?;
        Ok(surface.into_string()?)
    }

    /// Render one frame per expression column.
    ///
    /// The index and static layers are built once and shared by every frame.
    /// `make_surface` is called with the column index to obtain the surface
    /// of each frame.
    ///
    /// # Errors
    ///
    /// Returns [`PathviewError::AnalysisTypeMismatch`] before rendering
    /// anything unless the analysis holds expression data.
    pub fn frames<S, F>(
        &self,
        diagram: &Diagram,
        decoration: &DecorationSet,
        analysis: &AnalysisDataset,
        mut make_surface: F,
    ) -> Result<Vec<S>, PathviewError>
    where
        S: Surface,
        S::Error: std::error::Error + Send + Sync + 'static,
        F: FnMut(usize) -> S,
    {
        let found = analysis.analysis_type();
        if found != AnalysisType::Expression {
            return Err(PathviewError::AnalysisTypeMismatch {
                expected: AnalysisType::Expression,
                found,
            });
        }

        let mut scene = self.scene(diagram, decoration, analysis)?;
        let count = scene.column_count();
        info!(diagram = diagram.stable_id(), frames = count; "Rendering animation frames");

        let mut surfaces = Vec::with_capacity(count);
        for column in 0..count {
            let frame = scene.frame(column)?;
            let mut surface = make_surface(column);
            scene.composite(&frame, &mut surface)?;
            info!(column; "Frame composited");
            surfaces.push(surface);
        }
        Ok(surfaces)
    }

    /// Render one SVG document per expression column.
    pub fn frames_svg(
        &self,
        diagram: &Diagram,
        decoration: &DecorationSet,
        analysis: &AnalysisDataset,
    ) -> Result<Vec<String>, PathviewError> {
        self.frames(diagram, decoration, analysis, |_| self.svg_surface())?
            .into_iter()
            .map(|surface| surface.into_string().map_err(PathviewError::from))
            .collect()
    }

    fn svg_surface(&self) -> SvgSurface {
        SvgSurface::new().with_background(self.profile.background())
    }
}
