//! Reactions and connectors.
//!
//! A reaction is a backbone polyline with an optional reaction shape in
//! the middle and an optional end shape at the product side. Connectors
//! link participant nodes to the backbone; they are stored on the nodes but
//! colored after the reaction they belong to.

use log::trace;

use pathview_core::{
    color::Color,
    draw::{LayeredOutput, Path, Primitive, RenderLayer, StrokeCap, StrokeDefinition, shape},
    geometry::Insets,
    semantic::{Connector, Edge, Node, Segment, ShapeDescriptor, ShapeKind},
};

use super::RenderContext;
use crate::{
    error::PathviewError,
    index::{ElementState, RenderState},
};

/// Renders the backbone and shapes of a reaction.
pub fn render_edge(
    ctx: &RenderContext<'_>,
    edge: &Edge,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let state = ctx.index.element_state(edge.id());
    trace!(edge = edge.id().value(), state:? = state.render; "Rendering reaction");
    let element = format!("reaction {}", edge.id());

    let lines = Lines::new(ctx, edge, state);
    lines.segments(ctx, edge.segments(), out)?;

    for descriptor in edge.reaction_shape().into_iter().chain(edge.end_shape()) {
        lines.shape(ctx, descriptor, &element, out)?;
    }
    Ok(())
}

/// Renders every connector of a node.
///
/// Connectors pointing at a reaction that is not in the diagram were
/// reported when the index was built and are skipped here.
pub fn render_connectors(
    ctx: &RenderContext<'_>,
    node: &Node,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    for connector in node.connectors() {
        let Some(edge) = ctx.index.edge(connector.edge_id()) else {
            continue;
        };
        let state = ctx.index.connector_state(node.id(), edge.id());
        render_connector(ctx, node, edge, connector, state, out)?;
    }
    Ok(())
}

fn render_connector(
    ctx: &RenderContext<'_>,
    node: &Node,
    edge: &Edge,
    connector: &Connector,
    state: ElementState,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let element = format!("connector of node {} to reaction {}", node.id(), edge.id());
    let lines = Lines::new(ctx, edge, state);
    lines.segments(ctx, connector.segments(), out)?;

    if let Some(descriptor) = connector.end_shape() {
        lines.shape(ctx, descriptor, &element, out)?;
    }

    let Some(stoichiometry) = connector.stoichiometry() else {
        return Ok(());
    };
    let Some(descriptor) = stoichiometry.shape().filter(|_| stoichiometry.value() > 1) else {
        return Ok(());
    };
    let Some(path) = ctx.shape_path(descriptor, &element)? else {
        return Ok(());
    };
    let area = path.bounds();
    out.add_to_layer(
        lines.shape_layer,
        Primitive::fill_draw(path, ctx.styles.profile().background(), lines.stroke.clone()),
    )?;
    let text = stoichiometry.value().to_string();
    let label = area.and_then(|area| {
        ctx.label(&text, ctx.config.attachment_font(), area.shrink(Insets::uniform(1.0)), lines.color)
    });
    if let Some(label) = label {
        out.add_to_layer(lines.text_layer, Primitive::Text(label))?;
    }
    Ok(())
}

/// Stroke, colors and layers shared by a reaction or connector's parts.
struct Lines {
    stroke: StrokeDefinition,
    color: Color,
    haloed: bool,
    flagged: bool,
    segment_layer: RenderLayer,
    shape_layer: RenderLayer,
    text_layer: RenderLayer,
}

impl Lines {
    fn new(ctx: &RenderContext<'_>, edge: &Edge, state: ElementState) -> Self {
        let faded = state.render == RenderState::FadeOut;
        let color = ctx.styles.stroke_color(edge.renderable_class(), state);
        let width = if state.selected {
            ctx.config.selection_width()
        } else {
            ctx.config.segment_width()
        };
        Self {
            stroke: StrokeDefinition::solid(color, width),
            color,
            haloed: state.haloed,
            flagged: state.flagged,
            segment_layer: RenderLayer::Segments.fade_out_twin(faded),
            shape_layer: RenderLayer::EdgeShapes.fade_out_twin(faded),
            text_layer: RenderLayer::Text.fade_out_twin(faded),
        }
    }

    fn segments(
        &self,
        ctx: &RenderContext<'_>,
        segments: &[Segment],
        out: &mut LayeredOutput,
    ) -> Result<(), PathviewError> {
        if segments.is_empty() {
            return Ok(());
        }
        let path = segments.iter().fold(Path::new(), |path, segment| {
            path.append(shape::polyline(&[
                ctx.transform.point(segment.from()),
                ctx.transform.point(segment.to()),
            ]))
        });
        if self.flagged {
            let flag = StrokeDefinition::solid(ctx.styles.flag_color(), ctx.config.flag_width())
                .with_cap(StrokeCap::Round);
            out.add_to_layer(RenderLayer::Flags, Primitive::draw(path.clone(), flag))?;
        }
        if self.haloed {
            let halo = StrokeDefinition::solid(ctx.styles.halo_color(), ctx.config.halo_width())
                .with_cap(StrokeCap::Round);
            out.add_to_layer(RenderLayer::Halo, Primitive::draw(path.clone(), halo))?;
        }
        out.add_to_layer(self.segment_layer, Primitive::draw(path, self.stroke.clone()))?;
        Ok(())
    }

    /// Reaction, end or stoichiometry shape; open shapes are filled with the background.
    fn shape(
        &self,
        ctx: &RenderContext<'_>,
        descriptor: &ShapeDescriptor,
        element: &str,
        out: &mut LayeredOutput,
    ) -> Result<(), PathviewError> {
        let Some(path) = ctx.shape_path(descriptor, element)? else {
            return Ok(());
        };
        let area = path.bounds();
        // `kind` already validated by `shape_path`
        if descriptor.kind().ok() == Some(ShapeKind::Stop) {
            out.add_to_layer(self.shape_layer, Primitive::draw(path, self.stroke.clone()))?;
            return Ok(());
        }
        let fill = if descriptor.is_empty() {
            ctx.styles.profile().background()
        } else {
            self.color
        };
        out.add_to_layer(self.shape_layer, Primitive::fill_draw(path, fill, self.stroke.clone()))?;

        let label = descriptor
            .symbol()
            .zip(area)
            .and_then(|(symbol, area)| ctx.label(symbol, ctx.config.attachment_font(), area, self.color));
        if let Some(label) = label {
            out.add_to_layer(self.text_layer, Primitive::Text(label))?;
        }
        Ok(())
    }
}
