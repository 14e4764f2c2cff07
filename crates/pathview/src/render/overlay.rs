//! Per-column analysis overlay.
//!
//! Expression hits get their whole glyph filled with the expression
//! gradient color of the column value. Enrichment and species comparison
//! hits get the left `found / total` share of the glyph filled with the
//! enrichment gradient color of their p-value. Both rules apply to every
//! renderable class alike.

use log::trace;

use pathview_core::{
    color::Color,
    draw::{LayeredOutput, Primitive, RenderLayer, shape},
    semantic::Node,
};

use super::{
    RenderContext,
    registry::{NodeGeometry, RendererSpec},
};
use crate::{error::PathviewError, index::RenderState, legend::Scale};

/// Renders the analysis overlay of one column.
///
/// Faded-out nodes never get an overlay.
pub fn render_column(ctx: &RenderContext<'_>, column: usize) -> Result<LayeredOutput, PathviewError> {
    let mut out = LayeredOutput::new();
    let Some(scale) = Scale::for_analysis(ctx.analysis) else {
        return Ok(out);
    };
    let gradient = scale.gradient(ctx.styles.profile());

    for node in ctx.index.diagram().nodes() {
        if !ctx.index.is_hit(node.id()) || ctx.index.state(node.id()) == RenderState::FadeOut {
            continue;
        }
        let Some(binding) = ctx.analysis.binding(node.reactome_id()) else {
            continue;
        };
        let Some(value) = scale.value(binding, column) else {
            continue;
        };
        let color = gradient.interpolate(scale.fraction(value));
        let share = match scale {
            Scale::Expression { .. } => Some(1.0),
            Scale::Enrichment => binding.found_ratio(),
        };
        match share {
            Some(share) if share > 0.0 => fill_share(ctx, node, share, color, &mut out)?,
            _ => {}
        }
    }
    trace!(column, primitives = out.len(); "Analysis overlay rendered");
    Ok(out)
}

fn fill_share(
    ctx: &RenderContext<'_>,
    node: &Node,
    share: f32,
    color: Color,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let spec = RendererSpec::for_class(node.renderable_class());
    let bounds = ctx.transform.bounds(node.prop());
    let region = bounds.with_width(bounds.width() * share);
    let path = match spec.geometry {
        NodeGeometry::Gene => shape::gene(region).body,
        geometry => geometry.outline(region, ctx.config.corner_radius()),
    };
    out.add_to_layer(RenderLayer::AnalysisOverlay, Primitive::fill(path, color))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use pathview_core::{
        geometry::Bounds,
        semantic::{AnalysisBinding, AnalysisDataset, AnalysisType, Diagram, ElementId, ReactomeId, RenderableClass},
    };

    use super::*;
    use crate::render::test_support::Fixture;

    fn node(id: u64, class: RenderableClass) -> Node {
        Node::new(
            ElementId::new(id),
            ReactomeId::new(100 + id),
            "n",
            class,
            Bounds::new(0.0, id as f32 * 50.0, 100.0, id as f32 * 50.0 + 30.0),
        )
    }

    fn overlay(fixture: &Fixture, column: usize) -> LayeredOutput {
        let index = fixture.index();
        let ctx = fixture.context(&index);
        render_column(&ctx, column).unwrap()
    }

    fn fill_of(primitive: &Primitive) -> (Bounds, Color) {
        match primitive {
            Primitive::Fill { path, color } => (path.bounds().unwrap(), *color),
            other => panic!("expected fill, found {other:?}"),
        }
    }

    #[test]
    fn test_expression_overlay_follows_column() {
        let analysis = AnalysisDataset::new(AnalysisType::Expression)
            .with_range(0.0, 10.0)
            .with_binding(ReactomeId::new(101), AnalysisBinding::Expression { values: vec![0.0, 10.0] });
        let diagram = Diagram::new("R-HSA-1", "d")
            .with_node(node(1, RenderableClass::Protein))
            .with_node(node(2, RenderableClass::Protein));
        let fixture = Fixture::new(diagram).with_analysis(analysis);
        let gradient = &fixture.profile.analysis().expression;

        let first = overlay(&fixture, 0);
        assert_eq!(first.primitives(RenderLayer::AnalysisOverlay).len(), 1);
        assert_eq!(fill_of(&first.primitives(RenderLayer::AnalysisOverlay)[0]).1, gradient.min_color());

        let second = overlay(&fixture, 1);
        assert_eq!(fill_of(&second.primitives(RenderLayer::AnalysisOverlay)[0]).1, gradient.max_color());

        assert!(overlay(&fixture, 2).is_empty());
    }

    #[test]
    fn test_enrichment_fills_found_share_for_every_class() {
        let binding = AnalysisBinding::Enrichment {
            found: 1,
            total: 2,
            p_value: 0.0,
        };
        let analysis = AnalysisDataset::new(AnalysisType::Enrichment)
            .with_binding(ReactomeId::new(101), binding.clone())
            .with_binding(ReactomeId::new(102), binding);
        let diagram = Diagram::new("R-HSA-1", "d")
            .with_node(node(1, RenderableClass::ChemicalDrug))
            .with_node(node(2, RenderableClass::Complex));
        let fixture = Fixture::new(diagram).with_analysis(analysis);
        let out = overlay(&fixture, 0);
        let fills = out.primitives(RenderLayer::AnalysisOverlay);
        assert_eq!(fills.len(), 2);
        for primitive in fills {
            let (bounds, color) = fill_of(primitive);
            assert_approx_eq!(f32, bounds.width(), 50.0, epsilon = 1e-3);
            assert_eq!(color, fixture.profile.analysis().enrichment.max_color());
        }
    }

    #[test]
    fn test_faded_and_missing_nodes_get_no_overlay() {
        let analysis = AnalysisDataset::new(AnalysisType::Enrichment).with_binding(
            ReactomeId::new(101),
            AnalysisBinding::Enrichment {
                found: 2,
                total: 2,
                p_value: 0.01,
            },
        );
        let diagram = Diagram::new("R-HSA-1", "d")
            .with_node(node(1, RenderableClass::Protein).with_fade_out(true))
            .with_node(node(2, RenderableClass::Protein));
        let fixture = Fixture::new(diagram).with_analysis(analysis);
        assert!(overlay(&fixture, 0).is_empty());
    }

    #[test]
    fn test_no_analysis_no_overlay() {
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_node(node(1, RenderableClass::Protein)));
        assert!(overlay(&fixture, 0).is_empty());
    }
}
