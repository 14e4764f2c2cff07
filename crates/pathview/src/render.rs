//! Element renderers.
//!
//! Each renderer turns one kind of diagram element into primitives on the
//! layered canvas. Renderers never decide colors or z-order themselves:
//! colors come from the [`StyleResolver`], decoration state from the
//! [`DiagramIndex`], and the layer is picked at write time from the
//! element's render state.
//!
//! Output is split in two parts. The static part ([`render_static`]) holds
//! everything that does not depend on the analysis column. The per-column
//! part ([`overlay::render_column`]) holds the analysis overlay, and is
//! recomputed for every frame of an animated export.

pub mod compartment;
pub mod edge;
pub mod node;
pub mod overlay;
pub mod registry;

use std::fmt::Display;

use log::{debug, warn};

use pathview_core::{
    color::Color,
    draw::{FontSpec, LayeredOutput, Path, TextMeasure, TextPrimitive, shape, text_fit},
    geometry::{Bounds, Point},
    semantic::{AnalysisDataset, ShapeDescriptor, ShapeKind},
};

use crate::{
    config::RenderConfig, error::PathviewError, index::DiagramIndex, style::StyleResolver,
};

pub use registry::{Extra, NodeGeometry, RendererSpec};

/// Maps diagram coordinates onto the output canvas.
///
/// The diagram's bounding box is scaled by the request scale and moved so
/// that its top-left corner sits at `(margin, margin)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    scale: f32,
    offset: Point,
}

impl Transform {
    pub fn new(diagram_bounds: Bounds, config: &RenderConfig) -> Self {
        let scale = config.scale();
        let margin = config.margin();
        Self {
            scale,
            offset: Point::new(
                margin - diagram_bounds.min_x() * scale,
                margin - diagram_bounds.min_y() * scale,
            ),
        }
    }

    pub fn point(&self, point: Point) -> Point {
        point.scale(self.scale).add_point(self.offset)
    }

    pub fn bounds(&self, bounds: Bounds) -> Bounds {
        let min = self.point(bounds.min_point());
        let max = self.point(bounds.max_point());
        Bounds::new(min.x(), min.y(), max.x(), max.y())
    }

    pub fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

/// Read-only state shared by every renderer of one request.
pub struct RenderContext<'a> {
    pub index: &'a DiagramIndex<'a>,
    pub styles: StyleResolver<'a>,
    pub config: &'a RenderConfig,
    pub transform: Transform,
    pub measure: &'a dyn TextMeasure,
    pub analysis: &'a AnalysisDataset,
}

impl RenderContext<'_> {
    /// Fits a label inside `area`, shrinking the font as needed.
    ///
    /// Returns `None` when the label fits at no font size.
    pub fn label(&self, text: &str, font: &FontSpec, area: Bounds, color: Color) -> Option<TextPrimitive> {
        let fitted = text_fit::fit_shrinking(text, font, area, self.measure)?;
        Some(TextPrimitive::new(fitted, color, area))
    }

    /// Canvas path of a shape descriptor.
    ///
    /// Returns `Ok(None)` when the descriptor lacks the control points its
    /// type needs; the shape is skipped with a warning.
    ///
    /// # Errors
    ///
    /// An unknown descriptor type is [`PathviewError::UnrenderableGeometry`].
    pub fn shape_path(
        &self,
        descriptor: &ShapeDescriptor,
        element: impl Display,
    ) -> Result<Option<Path>, PathviewError> {
        let kind = descriptor
            .kind()
            .map_err(|err| PathviewError::UnrenderableGeometry {
                element: element.to_string(),
                kind: err.0,
            })?;
        let t = &self.transform;
        let path = match kind {
            ShapeKind::Arrow => descriptor
                .a()
                .zip(descriptor.b())
                .zip(descriptor.c())
                .map(|((a, b), c)| shape::arrowhead(t.point(a), t.point(b), t.point(c))),
            ShapeKind::Box => descriptor
                .a()
                .zip(descriptor.b())
                .and_then(|(a, b)| Bounds::from_points([t.point(a), t.point(b)]))
                .map(shape::rectangle),
            ShapeKind::Circle => descriptor
                .c()
                .zip(descriptor.r())
                .map(|(c, r)| shape::circle(t.point(c), t.length(r))),
            ShapeKind::DoubleCircle => descriptor
                .c()
                .zip(descriptor.r())
                .map(|(c, r)| {
                    let inner = descriptor.r1().unwrap_or(r * 0.6);
                    shape::double_circle(t.point(c), t.length(r), t.length(inner))
                }),
            ShapeKind::Stop => descriptor
                .a()
                .zip(descriptor.b())
                .map(|(a, b)| shape::stop_bar(t.point(a), t.point(b))),
        };
        if path.is_none() {
            warn!(element:% = element, kind = descriptor.kind_name(); "Shape descriptor is missing control points, skipping");
        }
        Ok(path)
    }
}

/// Renders every element into the column-independent layers.
///
/// # Errors
///
/// Fails on the first element with unrenderable geometry.
pub fn render_static(ctx: &RenderContext<'_>) -> Result<LayeredOutput, PathviewError> {
    let diagram = ctx.index.diagram();
    let mut output = LayeredOutput::new();

    for compartment in diagram.compartments() {
        compartment::render_compartment(ctx, compartment, &mut output)?;
    }
    for node in diagram.nodes() {
        node::render_node(ctx, node, &mut output)?;
        edge::render_connectors(ctx, node, &mut output)?;
    }
    for edge in diagram.edges() {
        edge::render_edge(ctx, edge, &mut output)?;
    }

    debug!(
        compartments = diagram.compartments().len(),
        nodes = diagram.nodes().len(),
        edges = diagram.edges().len(),
        primitives = output.len();
        "Static layers rendered"
    );
    Ok(output)
}

#[cfg(test)]
pub(crate) mod test_support {
    use pathview_core::{
        draw::ApproximateMeasure,
        semantic::{AnalysisDataset, DecorationSet, Diagram},
    };

    use super::*;
    use crate::profile::ColorProfile;

    /// Owns everything a [`RenderContext`] borrows.
    pub struct Fixture {
        pub diagram: Diagram,
        pub decoration: DecorationSet,
        pub analysis: AnalysisDataset,
        pub profile: ColorProfile,
        pub config: RenderConfig,
        pub measure: ApproximateMeasure,
    }

    impl Fixture {
        pub fn new(diagram: Diagram) -> Self {
            Self {
                diagram,
                decoration: DecorationSet::new(),
                analysis: AnalysisDataset::none(),
                profile: ColorProfile::builtin("modern").unwrap(),
                config: RenderConfig::default(),
                measure: ApproximateMeasure::fixed(0.5),
            }
        }

        pub fn with_decoration(mut self, decoration: DecorationSet) -> Self {
            self.decoration = decoration;
            self
        }

        pub fn with_analysis(mut self, analysis: AnalysisDataset) -> Self {
            self.analysis = analysis;
            self
        }

        pub fn index(&self) -> DiagramIndex<'_> {
            DiagramIndex::build(&self.diagram, &self.decoration, &self.analysis)
        }

        pub fn context<'a>(&'a self, index: &'a DiagramIndex<'a>) -> RenderContext<'a> {
            RenderContext {
                index,
                styles: StyleResolver::new(&self.profile),
                config: &self.config,
                transform: Transform::new(self.diagram.bounds(), &self.config),
                measure: &self.measure,
                analysis: &self.analysis,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use pathview_core::{
        draw::{PathCommand, RenderLayer},
        geometry::Point,
        semantic::{Diagram, Edge, ElementId, ReactomeId},
    };

    use super::{test_support::Fixture, *};

    #[test]
    fn test_transform_moves_diagram_to_margin() {
        let config = RenderConfig::for_scale(2.0);
        let transform = Transform::new(Bounds::new(100.0, 50.0, 300.0, 250.0), &config);
        let origin = transform.point(Point::new(100.0, 50.0));
        assert_approx_eq!(f32, origin.x(), 30.0);
        assert_approx_eq!(f32, origin.y(), 30.0);
        let mapped = transform.bounds(Bounds::new(100.0, 50.0, 110.0, 60.0));
        assert_approx_eq!(f32, mapped.width(), 20.0);
        assert_approx_eq!(f32, transform.length(3.0), 6.0);
    }

    #[test]
    fn test_unknown_shape_type_is_unrenderable() {
        let edge = Edge::new(ElementId::new(5), ReactomeId::new(50), "r", Point::new(10.0, 10.0))
            .with_reaction_shape(ShapeDescriptor::new("TRAPEZOID"));
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_edge(edge));
        let index = fixture.index();
        let ctx = fixture.context(&index);
        let err = render_static(&ctx).unwrap_err();
        assert!(matches!(
            err,
            PathviewError::UnrenderableGeometry { ref kind, .. } if kind == "TRAPEZOID"
        ));
    }

    #[test]
    fn test_missing_control_points_are_skipped() {
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d"));
        let index = fixture.index();
        let ctx = fixture.context(&index);
        let path = ctx.shape_path(&ShapeDescriptor::new("ARROW"), "edge 1").unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn test_box_descriptor_maps_to_canvas_rectangle() {
        let diagram = Diagram::new("R-HSA-1", "d").with_bounds(Bounds::new(0.0, 0.0, 100.0, 100.0));
        let fixture = Fixture::new(diagram);
        let index = fixture.index();
        let ctx = fixture.context(&index);
        let descriptor = ShapeDescriptor::rectangle(Point::new(10.0, 10.0), Point::new(20.0, 30.0));
        let path = ctx.shape_path(&descriptor, "edge 1").unwrap().unwrap();
        let bounds = path.bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 25.0);
        assert_approx_eq!(f32, bounds.height(), 20.0);
        assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
        assert!(render_static(&ctx).unwrap().primitives(RenderLayer::Text).is_empty());
    }
}
