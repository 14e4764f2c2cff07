//! A diagram prepared for compositing.
//!
//! A [`Scene`] owns everything that is computed once per request: the
//! Diagram Index, the static layers and the legend. Frames, the analysis
//! overlay and legend ticks of one column, are produced on demand and
//! composited on top of the shared static layers. An animated export builds
//! one scene and asks it for one frame per column.

use log::{debug, info};

use pathview_core::{
    draw::{LayeredOutput, Surface, TextMeasure},
    geometry::{Bounds, Insets},
    semantic::{AnalysisDataset, AnalysisType, DecorationSet, Diagram},
};

use crate::{
    config::RenderConfig,
    error::PathviewError,
    index::DiagramIndex,
    legend::Legend,
    profile::ColorProfile,
    render::{self, RenderContext, Transform, overlay},
    style::StyleResolver,
};

pub struct Scene<'a> {
    index: DiagramIndex<'a>,
    decoration: &'a DecorationSet,
    analysis: &'a AnalysisDataset,
    profile: &'a ColorProfile,
    config: &'a RenderConfig,
    measure: &'a dyn TextMeasure,
    transform: Transform,
    static_layers: LayeredOutput,
    legend: Option<Legend>,
    canvas: Bounds,
}

impl<'a> Scene<'a> {
    /// Indexes the diagram and renders its static layers.
    ///
    /// # Errors
    ///
    /// Fails when an element has unrenderable geometry.
    pub fn build(
        diagram: &'a Diagram,
        decoration: &'a DecorationSet,
        analysis: &'a AnalysisDataset,
        profile: &'a ColorProfile,
        config: &'a RenderConfig,
        measure: &'a dyn TextMeasure,
    ) -> Result<Self, PathviewError> {
        let index = DiagramIndex::build(diagram, decoration, analysis);
        let transform = Transform::new(diagram.bounds(), config);

        let mut static_layers = {
            let ctx = RenderContext {
                index: &index,
                styles: StyleResolver::new(profile),
                config,
                transform,
                measure,
                analysis,
            };
            render::render_static(&ctx)?
        };

        let content = transform.bounds(diagram.bounds());
        let margin = config.margin();
        let mut canvas = Bounds::new(0.0, 0.0, content.max_x() + margin, content.max_y() + margin);

        let legend = Legend::new(content, config, analysis, measure);
        if let Some(legend) = &legend {
            static_layers.merge(legend.render(profile, config, measure)?);
            canvas = canvas.merge(&legend.extent(config).add_padding(Insets::uniform(margin)));
        }

        info!(
            diagram = diagram.stable_id(),
            primitives = static_layers.len(),
            width = canvas.width(),
            height = canvas.height();
            "Scene built"
        );
        Ok(Self {
            index,
            decoration,
            analysis,
            profile,
            config,
            measure,
            transform,
            static_layers,
            legend,
            canvas,
        })
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            index: &self.index,
            styles: StyleResolver::new(self.profile),
            config: self.config,
            transform: self.transform,
            measure: self.measure,
            analysis: self.analysis,
        }
    }

    /// Full extent of the output, legend included.
    pub fn canvas(&self) -> Bounds {
        self.canvas
    }

    pub fn index(&self) -> &DiagramIndex<'a> {
        &self.index
    }

    pub fn static_layers(&self) -> &LayeredOutput {
        &self.static_layers
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Number of frames the analysis supports: the expression columns, or one.
    pub fn column_count(&self) -> usize {
        match self.analysis.analysis_type() {
            AnalysisType::Expression => self.analysis.column_count().max(1),
            _ => 1,
        }
    }

    /// Produces the column-dependent layers of one frame.
    ///
    /// # Errors
    ///
    /// [`PathviewError::ColumnOutOfRange`] for a column the analysis does not have.
    pub fn frame(&mut self, column: usize) -> Result<LayeredOutput, PathviewError> {
        let count = self.column_count();
        if column >= count {
            return Err(PathviewError::ColumnOutOfRange { column, count });
        }
        if let Some(legend) = &mut self.legend {
            legend.set_column(column, self.analysis, self.decoration);
        }

        let mut frame = overlay::render_column(&self.context(), column)?;
        if let Some(legend) = &self.legend {
            frame.merge(legend.render_ticks(self.profile, self.config)?);
        }
        debug!(column, primitives = frame.len(); "Frame rendered");
        Ok(frame)
    }

    /// Draws the static layers and `frame` onto `surface`.
    pub fn composite<S>(&self, frame: &LayeredOutput, surface: &mut S) -> Result<(), PathviewError>
    where
        S: Surface + ?Sized,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        let export = |err: S::Error| PathviewError::Export(Box::new(err));
        surface.begin(self.canvas).map_err(export)?;
        self.static_layers
            .composite_with(frame, surface)
            .map_err(export)?;
        surface.finish().map_err(export)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pathview_core::{
        draw::{ApproximateMeasure, RecordingSurface, RenderLayer, SurfaceOp},
        semantic::{AnalysisBinding, ElementId, Node, ReactomeId, RenderableClass},
    };

    use super::*;

    fn diagram() -> Diagram {
        Diagram::new("R-HSA-1", "d").with_node(Node::new(
            ElementId::new(1),
            ReactomeId::new(101),
            "TP53",
            RenderableClass::Protein,
            Bounds::new(0.0, 0.0, 100.0, 200.0),
        ))
    }

    fn expression() -> AnalysisDataset {
        AnalysisDataset::new(AnalysisType::Expression)
            .with_columns(["a", "b", "c"])
            .with_binding(ReactomeId::new(101), AnalysisBinding::Expression { values: vec![1.0, 2.0, 3.0] })
    }

    #[test]
    fn test_canvas_without_legend() {
        let (diagram, decoration, analysis) = (diagram(), DecorationSet::new(), AnalysisDataset::none());
        let (profile, config) = (ColorProfile::builtin("modern").unwrap(), RenderConfig::default());
        let measure = ApproximateMeasure::default();
        let scene = Scene::build(&diagram, &decoration, &analysis, &profile, &config, &measure).unwrap();
        assert_eq!(scene.canvas(), Bounds::new(0.0, 0.0, 130.0, 230.0));
        assert!(scene.legend().is_none());
        assert_eq!(scene.column_count(), 1);
    }

    #[test]
    fn test_legend_widens_canvas_and_frames_replace_overlay() {
        let (diagram, analysis) = (diagram(), expression());
        let decoration = DecorationSet::new().with_selected([ReactomeId::new(101)]);
        let (profile, config) = (ColorProfile::builtin("modern").unwrap(), RenderConfig::default());
        let measure = ApproximateMeasure::default();
        let mut scene = Scene::build(&diagram, &decoration, &analysis, &profile, &config, &measure).unwrap();

        let legend = scene.legend().unwrap().bar();
        assert!(scene.canvas().max_x() > legend.max_x());
        assert_eq!(scene.column_count(), 3);

        let first = scene.frame(0).unwrap();
        let last = scene.frame(2).unwrap();
        assert_eq!(first.primitives(RenderLayer::AnalysisOverlay).len(), 1);
        assert_eq!(last.primitives(RenderLayer::LegendTicks).len(), 1);
        assert_ne!(
            first.primitives(RenderLayer::AnalysisOverlay),
            last.primitives(RenderLayer::AnalysisOverlay)
        );

        let mut surface = RecordingSurface::default();
        scene.composite(&last, &mut surface).unwrap();
        assert_eq!(surface.ops().first(), Some(&SurfaceOp::Begin(scene.canvas())));
        assert_eq!(surface.ops().last(), Some(&SurfaceOp::Finish));
        assert_eq!(surface.ops_in(RenderLayer::AnalysisOverlay).len(), 1);
    }

    #[test]
    fn test_column_out_of_range() {
        let (diagram, decoration, analysis) = (diagram(), DecorationSet::new(), expression());
        let (profile, config) = (ColorProfile::builtin("modern").unwrap(), RenderConfig::default());
        let measure = ApproximateMeasure::default();
        let mut scene = Scene::build(&diagram, &decoration, &analysis, &profile, &config, &measure).unwrap();
        let err = scene.frame(3).unwrap_err();
        assert!(matches!(err, PathviewError::ColumnOutOfRange { column: 3, count: 3 }));
    }
}
