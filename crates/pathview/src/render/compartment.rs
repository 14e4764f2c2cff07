//! Compartments: fill, outer and inner border, and the name.

use pathview_core::{
    draw::{LayeredOutput, Primitive, RenderLayer, StrokeDefinition, TextPrimitive, shape, text_fit},
    geometry::{Bounds, Size},
    semantic::{Compartment, RenderableClass},
};

use super::RenderContext;
use crate::error::PathviewError;

pub fn render_compartment(
    ctx: &RenderContext<'_>,
    compartment: &Compartment,
    out: &mut LayeredOutput,
) -> Result<(), PathviewError> {
    let state = ctx.index.element_state(compartment.id());
    let style = ctx.styles.resolve(RenderableClass::Compartment, state);
    let radius = ctx.config.corner_radius();
    let stroke = StrokeDefinition::solid(style.stroke, ctx.config.node_border_width());

    let outer = ctx.transform.bounds(compartment.prop());
    out.add_to_layer(
        RenderLayer::CompartmentFill,
        Primitive::fill(shape::rounded_rectangle(outer, radius), style.fill),
    )?;
    out.add_to_layer(
        RenderLayer::CompartmentBorder,
        Primitive::draw(shape::rounded_rectangle(outer, radius), stroke.clone()),
    )?;
    if let Some(inner) = compartment.inner() {
        let inner = ctx.transform.bounds(inner);
        out.add_to_layer(
            RenderLayer::CompartmentBorder,
            Primitive::draw(shape::rounded_rectangle(inner, radius), stroke),
        )?;
    }

    // Names are placed, not fitted: a single line starting at the text position.
    let name = compartment.display_name();
    if name.trim().is_empty() {
        return Ok(());
    }
    let font = ctx.config.label_font().clone().with_bold(true);
    let size = Size::new(
        ctx.measure.width(name, &font),
        ctx.measure.line_height(&font),
    );
    let area = Bounds::new_from_top_left(ctx.transform.point(compartment.text_position()), size);
    let text = text_fit::layout(vec![name.to_string()], font, area, ctx.measure);
    out.add_to_layer(
        RenderLayer::CompartmentText,
        Primitive::Text(TextPrimitive::new(text, style.text, area)),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use pathview_core::{
        geometry::Point,
        semantic::{Diagram, ElementId, ReactomeId},
    };

    use super::*;
    use crate::render::test_support::Fixture;

    fn cytosol() -> Compartment {
        Compartment::new(
            ElementId::new(7),
            ReactomeId::new(70),
            "cytosol",
            Bounds::new(0.0, 0.0, 400.0, 300.0),
        )
        .with_text_position(Point::new(20.0, 270.0))
    }

    fn render(compartment: Compartment) -> (Fixture, LayeredOutput) {
        let fixture = Fixture::new(Diagram::new("R-HSA-1", "d").with_compartment(compartment));
        let index = fixture.index();
        let ctx = fixture.context(&index);
        let mut out = LayeredOutput::new();
        render_compartment(&ctx, &fixture.diagram.compartments()[0], &mut out).unwrap();
        drop(ctx);
        drop(index);
        (fixture, out)
    }

    #[test]
    fn test_single_border_and_name() {
        let (fixture, out) = render(cytosol());
        assert_eq!(out.primitives(RenderLayer::CompartmentFill).len(), 1);
        assert_eq!(out.primitives(RenderLayer::CompartmentBorder).len(), 1);
        let Primitive::Text(text) = &out.primitives(RenderLayer::CompartmentText)[0] else {
            panic!("compartment name is text");
        };
        let line = &text.text().lines()[0];
        assert_eq!(line.text(), "cytosol");
        assert_approx_eq!(f32, line.origin().x(), 20.0 + fixture.config.margin());
    }

    #[test]
    fn test_inner_rectangle_adds_second_border() {
        let (_, out) = render(cytosol().with_inner(Bounds::new(10.0, 10.0, 390.0, 290.0)));
        assert_eq!(out.primitives(RenderLayer::CompartmentBorder).len(), 2);
    }
}
