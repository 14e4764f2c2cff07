//! Node glyphs.

use log::trace;

use pathview_core::{
    draw::{LayeredOutput, Primitive, RenderLayer, StrokeDefinition, TextSplit, shape},
    geometry::{Bounds, Insets, Point, Size},
    semantic::{AnalysisBinding, Node},
};

use super::{
    RenderContext,
    registry::{Extra, NodeGeometry, RendererSpec},
};
use crate::{error::PathviewError, index::RenderState, style::ResolvedStyle};

const DRUG_BADGE_TEXT: &str = "Rx";

/// Inset of the second border of set glyphs.
const DOUBLE_BORDER_GAP: f32 = 3.0;

/// Renders background, decorations, border, flag, halo and label of a node.
///
/// Connectors are rendered separately, see [`super::edge::render_connectors`].
pub fn render_node(
    ctx: &RenderContext<'_>,
    node: &Node,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let spec = RendererSpec::for_class(node.renderable_class());
    let state = ctx.index.element_state(node.id());
    let style = ctx.styles.resolve(spec.style, state);
    let faded = state.render == RenderState::FadeOut;
    let bounds = ctx.transform.bounds(node.prop());
    let config = ctx.config;
    let outline = spec.geometry.outline(bounds, config.corner_radius());

    trace!(node = node.id().value(), class = spec.style.name(), state:? = state.render; "Rendering node");

    // Background
    let background = match spec.geometry {
        NodeGeometry::Gene => shape::gene(bounds).body,
        _ => outline.clone(),
    };
    out.add_to_layer(
        RenderLayer::NodeBackground.fade_out_twin(faded),
        Primitive::fill(background, style.fill),
    )?;

    // Border
    let border_width = if state.selected {
        config.selection_width()
    } else {
        config.node_border_width()
    };
    let mut border = StrokeDefinition::solid(style.stroke, border_width);
    if node.need_dashed_border() {
        border = StrokeDefinition::dashed(style.stroke, border_width);
    }
    let border_layer = RenderLayer::NodeBorder.fade_out_twin(faded);
    match spec.geometry {
        NodeGeometry::Gene => render_gene_lines(ctx, bounds, &style, &border, faded, out)?,
        NodeGeometry::DoubleRoundedRectangle => {
            let gap = ctx.transform.length(DOUBLE_BORDER_GAP);
            let inner = bounds.shrink(Insets::uniform(gap));
            out.add_to_layer(border_layer, Primitive::draw(outline.clone(), border.clone()))?;
            out.add_to_layer(
                border_layer,
                Primitive::draw(spec.geometry.outline(inner, config.corner_radius() - gap), border.clone()),
            )?;
        }
        _ => out.add_to_layer(border_layer, Primitive::draw(outline.clone(), border.clone()))?,
    }

    // Extras
    for extra in spec.extras {
        match extra {
            Extra::DrugBadge => render_drug_badge(ctx, bounds, &style, faded, out)?,
            Extra::Crossed if node.is_crossed() => {
                let stroke = StrokeDefinition::solid(ctx.styles.profile().disease(), border_width);
                out.add_to_layer(
                    RenderLayer::NodeForeground.fade_out_twin(faded),
                    Primitive::draw(shape::cross(bounds), stroke),
                )?;
            }
            Extra::Attachments => render_attachments(ctx, node, &style, &border, faded, out)?,
            Extra::Crossed => {}
        }
    }

    // Flag and halo sit outside the border.
    if state.flagged {
        let width = config.flag_width();
        let ring = spec
            .geometry
            .outline(bounds.add_padding(Insets::uniform(width / 2.0)), config.corner_radius());
        out.add_to_layer(
            RenderLayer::Flags,
            Primitive::draw(ring, StrokeDefinition::solid(ctx.styles.flag_color(), width)),
        )?;
    }
    if state.haloed {
        let width = config.halo_width();
        let ring = spec
            .geometry
            .outline(bounds.add_padding(Insets::uniform(width / 2.0)), config.corner_radius());
        out.add_to_layer(
            RenderLayer::Halo,
            Primitive::draw(ring, StrokeDefinition::solid(ctx.styles.halo_color(), width)),
        )?;
    }

    // Label
    let area = spec.geometry.label_area(bounds).shrink(config.label_padding());
    if let Some(label) = ctx.label(node.display_name(), config.label_font(), area, style.text) {
        let label = match found_ratio(ctx, node, state.render) {
            Some(point) => label.with_split(TextSplit {
                point,
                color: ctx.styles.profile().analysis().text,
                shadow: ctx.styles.profile().background(),
            }),
            None => label,
        };
        out.add_to_layer(RenderLayer::Text.fade_out_twin(faded), Primitive::Text(label))?;
    }
    Ok(())
}

/// Share of found identifiers of an enrichment hit, when below one.
fn found_ratio(ctx: &RenderContext<'_>, node: &Node, state: RenderState) -> Option<f32> {
    if !state.is_hit() || !ctx.index.analysis_type().is_enrichment_like() {
        return None;
    }
    match ctx.analysis.binding(node.reactome_id()) {
        Some(binding @ AnalysisBinding::Enrichment { .. }) => {
            binding.found_ratio().filter(|ratio| *ratio < 1.0)
        }
        _ => None,
    }
}

fn render_gene_lines(
    ctx: &RenderContext<'_>,
    bounds: Bounds,
    style: &ResolvedStyle,
    border: &StrokeDefinition,
    faded: bool,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let gene = shape::gene(bounds);
    let layer = RenderLayer::NodeBorder.fade_out_twin(faded);
    out.add_to_layer(layer, Primitive::draw(gene.line, border.clone()))?;
    out.add_to_layer(layer, Primitive::draw(gene.bracket, border.clone()))?;
    out.add_to_layer(
        RenderLayer::NodeForeground.fade_out_twin(faded),
        Primitive::fill_draw(gene.head, style.stroke, border.clone().with_width(ctx.config.node_border_width())),
    )?;
    Ok(())
}

fn render_drug_badge(
    ctx: &RenderContext<'_>,
    bounds: Bounds,
    style: &ResolvedStyle,
    faded: bool,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let size = Size::new(
        ctx.transform.length(14.0).min(bounds.width() / 3.0),
        ctx.transform.length(8.0).min(bounds.height() / 2.0),
    );
    let badge = Bounds::new_from_top_left(
        Point::new(bounds.max_x() - size.width(), bounds.max_y() - size.height()),
        size,
    );
    out.add_to_layer(
        RenderLayer::NodeForeground.fade_out_twin(faded),
        Primitive::fill_draw(
            shape::rectangle(badge),
            style.stroke,
            StrokeDefinition::solid(style.stroke, ctx.config.node_border_width()),
        ),
    )?;
    let font = ctx.config.attachment_font().clone().with_bold(true);
    if let Some(label) = ctx.label(DRUG_BADGE_TEXT, &font, badge, ctx.styles.profile().background()) {
        out.add_to_layer(RenderLayer::Text.fade_out_twin(faded), Primitive::Text(label))?;
    }
    Ok(())
}

fn render_attachments(
    ctx: &RenderContext<'_>,
    node: &Node,
    style: &ResolvedStyle,
    border: &StrokeDefinition,
    faded: bool,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let element = format!("attachment of node {}", node.id());
    for attachment in node.attachments() {
        let Some(path) = ctx.shape_path(attachment.shape(), &element)? else {
            continue;
        };
        let area = path.bounds();
        out.add_to_layer(
            RenderLayer::NodeForeground.fade_out_twin(faded),
            Primitive::fill_draw(path, ctx.styles.profile().background(), border.clone()),
        )?;
        let (Some(text), Some(area)) = (attachment.label(), area) else {
            continue;
        };
        if let Some(label) = ctx.label(text, ctx.config.attachment_font(), area, style.text) {
            out.add_to_layer(RenderLayer::Text.fade_out_twin(faded), Primitive::Text(label))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pathview_core::{
        draw::{StrokeStyle, TextPrimitive},
        geometry::Point,
        semantic::{
            AnalysisDataset, AnalysisType, Attachment, DecorationSet, Diagram, ElementId, ReactomeId,
            RenderableClass, ShapeDescriptor,
        },
    };

    use super::*;
    use crate::render::test_support::Fixture;

    fn protein(id: u64) -> Node {
        Node::new(
            ElementId::new(id),
            ReactomeId::new(100 + id),
            "ABC",
            RenderableClass::Protein,
            Bounds::new(10.0, 10.0, 90.0, 40.0),
        )
    }

    fn render(fixture: &Fixture) -> LayeredOutput {
        let index = fixture.index();
        let ctx = fixture.context(&index);
        let mut out = LayeredOutput::new();
        for node in fixture.diagram.nodes() {
            render_node(&ctx, node, &mut out).unwrap();
        }
        out
    }

    fn label(out: &LayeredOutput, layer: RenderLayer) -> &TextPrimitive {
        match &out.primitives(layer)[0] {
            Primitive::Text(text) => text,
            other => panic!("expected text, found {other:?}"),
        }
    }

    #[test]
    fn test_plain_node_layers() {
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(protein(1)));
        let out = render(&fixture);
        assert_eq!(out.primitives(RenderLayer::NodeBackground).len(), 1);
        assert_eq!(out.primitives(RenderLayer::NodeBorder).len(), 1);
        assert_eq!(out.primitives(RenderLayer::Text).len(), 1);
        assert!(out.primitives(RenderLayer::Halo).is_empty());
        assert!(out.primitives(RenderLayer::Flags).is_empty());
        assert_eq!(label(&out, RenderLayer::Text).text().lines()[0].text(), "ABC");
    }

    #[test]
    fn test_fade_out_node_uses_twin_layers() {
        let node = protein(1).with_fade_out(true);
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(node));
        let out = render(&fixture);
        assert!(out.primitives(RenderLayer::NodeBackground).is_empty());
        assert_eq!(out.primitives(RenderLayer::FadeOutNodeBackground).len(), 1);
        assert_eq!(out.primitives(RenderLayer::FadeOutNodeBorder).len(), 1);
        assert_eq!(out.primitives(RenderLayer::FadeOutText).len(), 1);
    }

    #[test]
    fn test_selected_flagged_node_draws_halo_and_flag() {
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(protein(1))).with_decoration(
            DecorationSet::new()
                .with_selected([ReactomeId::new(101)])
                .with_flagged([ReactomeId::new(101)]),
        );
        let out = render(&fixture);
        let Primitive::Draw { stroke, .. } = &out.primitives(RenderLayer::NodeBorder)[0] else {
            panic!("border is a stroke");
        };
        assert_eq!(stroke.color(), fixture.profile.selection());
        assert_eq!(stroke.width(), fixture.config.selection_width());
        assert_eq!(out.primitives(RenderLayer::Halo).len(), 1);
        assert_eq!(out.primitives(RenderLayer::Flags).len(), 1);
    }

    #[test]
    fn test_dashed_border() {
        let node = protein(1).with_dashed_border(true);
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(node));
        let out = render(&fixture);
        let Primitive::Draw { stroke, .. } = &out.primitives(RenderLayer::NodeBorder)[0] else {
            panic!("border is a stroke");
        };
        assert_eq!(stroke.style(), &StrokeStyle::Dashed);
    }

    #[test]
    fn test_drug_badge_and_cross() {
        let node = Node::new(
            ElementId::new(1),
            ReactomeId::new(101),
            "aspirin",
            RenderableClass::ChemicalDrug,
            Bounds::new(0.0, 0.0, 80.0, 30.0),
        )
        .with_crossed(true);
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(node));
        let out = render(&fixture);
        assert_eq!(out.primitives(RenderLayer::NodeForeground).len(), 2);
        assert_eq!(out.primitives(RenderLayer::Text).len(), 2);
    }

    #[test]
    fn test_attachment_box_and_label() {
        let box_shape = ShapeDescriptor::rectangle(Point::new(85.0, 20.0), Point::new(95.0, 30.0));
        let node = protein(1).with_attachment(Attachment::new(Some("P".to_string()), box_shape));
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(node));
        let out = render(&fixture);
        assert_eq!(out.primitives(RenderLayer::NodeForeground).len(), 1);
        assert_eq!(out.primitives(RenderLayer::Text).len(), 2);
    }

    #[test]
    fn test_unknown_attachment_shape_fails() {
        let node = protein(1).with_attachment(Attachment::new(None, ShapeDescriptor::new("BLOB")));
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(node));
        let index = fixture.index();
        let ctx = fixture.context(&index);
        let err = render_node(&ctx, &fixture.diagram.nodes()[0], &mut LayeredOutput::new()).unwrap_err();
        assert!(matches!(err, PathviewError::UnrenderableGeometry { .. }));
    }

    #[test]
    fn test_partial_enrichment_hit_splits_label() {
        let analysis = AnalysisDataset::new(AnalysisType::Enrichment).with_binding(
            ReactomeId::new(101),
            AnalysisBinding::Enrichment {
                found: 1,
                total: 4,
                p_value: 0.001,
            },
        );
        let fixture =
            Fixture::new(Diagram::new("R-HSA-1", "d").with_node(protein(1))).with_analysis(analysis);
        let out = render(&fixture);
        let split = label(&out, RenderLayer::Text).split().copied().unwrap();
        assert_eq!(split.point, 0.25);
    }

    #[test]
    fn test_gene_draws_body_line_bracket_and_head() {
        let gene = Node::new(
            ElementId::new(1),
            ReactomeId::new(101),
            "GENE1",
            RenderableClass::Gene,
            Bounds::new(0.0, 0.0, 80.0, 40.0),
        );
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(gene));
        let out = render(&fixture);
        assert_eq!(out.primitives(RenderLayer::NodeBorder).len(), 2);
        assert_eq!(out.primitives(RenderLayer::NodeForeground).len(), 1);
    }
}
