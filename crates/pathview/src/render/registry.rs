//! Renderable class lookup table.
//!
//! Every [`RenderableClass`] maps to a [`RendererSpec`]: the outline
//! geometry, the palette entry to color it with, and a list of optional
//! decoration steps. Drug variants share the geometry of their base class
//! and add a [`Extra::DrugBadge`] step.

use pathview_core::{
    draw::{Path, shape},
    geometry::Bounds,
    semantic::RenderableClass,
};

/// Outline of a node glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGeometry {
    Rectangle,
    RoundedRectangle,
    /// Rounded rectangle with a second, inset border
    DoubleRoundedRectangle,
    Octagon,
    Hexagon,
    Ellipse,
    Gene,
    Rna,
}

impl NodeGeometry {
    /// The closed outline used for background, border, halo and overlay.
    pub fn outline(self, bounds: Bounds, corner: f32) -> Path {
        match self {
            Self::Rectangle => shape::rectangle(bounds),
            Self::RoundedRectangle | Self::DoubleRoundedRectangle => {
                shape::rounded_rectangle(bounds, corner)
            }
            Self::Octagon => shape::corner_cut_octagon(bounds, corner),
            Self::Hexagon => shape::hexagon(bounds),
            Self::Ellipse => shape::ellipse(bounds),
            Self::Gene => shape::rectangle(bounds),
            Self::Rna => shape::rna(bounds),
        }
    }

    /// Region of the glyph that holds the label.
    pub fn label_area(self, bounds: Bounds) -> Bounds {
        match self {
            Self::Gene => Bounds::new(
                bounds.min_x(),
                bounds.center().y(),
                bounds.max_x(),
                bounds.max_y(),
            ),
            _ => bounds,
        }
    }
}

/// Optional decoration step composed onto a node glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extra {
    /// Small "Rx" box in the bottom-right corner
    DrugBadge,
    /// Diagonal cross when the node is marked crossed
    Crossed,
    /// Modification boxes on the border
    Attachments,
}

/// How one renderable class is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererSpec {
    pub geometry: NodeGeometry,
    /// Palette entry for the class
    pub style: RenderableClass,
    pub extras: &'static [Extra],
}

const PLAIN: &[Extra] = &[Extra::Crossed];
const MODIFIABLE: &[Extra] = &[Extra::Attachments, Extra::Crossed];
const DRUG: &[Extra] = &[Extra::DrugBadge, Extra::Crossed];
const MODIFIABLE_DRUG: &[Extra] = &[Extra::Attachments, Extra::DrugBadge, Extra::Crossed];

impl RendererSpec {
    const fn new(geometry: NodeGeometry, style: RenderableClass, extras: &'static [Extra]) -> Self {
        Self {
            geometry,
            style,
            extras,
        }
    }

    /// Looks up the renderer of a class.
    pub fn for_class(class: RenderableClass) -> Self {
        use NodeGeometry as G;
        use RenderableClass as C;
        match class {
            C::Protein => Self::new(G::RoundedRectangle, class, MODIFIABLE),
            C::ProteinDrug => Self::new(G::RoundedRectangle, class, MODIFIABLE_DRUG),
            C::Complex => Self::new(G::Octagon, class, PLAIN),
            C::ComplexDrug => Self::new(G::Octagon, class, DRUG),
            C::Chemical => Self::new(G::Ellipse, class, PLAIN),
            C::ChemicalDrug => Self::new(G::Ellipse, class, DRUG),
            C::EntitySet => Self::new(G::DoubleRoundedRectangle, class, PLAIN),
            C::EntitySetDrug => Self::new(G::DoubleRoundedRectangle, class, DRUG),
            C::Gene => Self::new(G::Gene, class, MODIFIABLE),
            C::Rna => Self::new(G::Rna, class, MODIFIABLE),
            C::RnaDrug => Self::new(G::Rna, class, MODIFIABLE_DRUG),
            C::EncapsulatedNode => Self::new(G::Hexagon, class, PLAIN),
            C::Entity | C::ProcessNode => Self::new(G::Rectangle, class, PLAIN),
            C::Compartment | C::Reaction => Self::new(G::Rectangle, class, &[]),
        }
    }

    pub fn has(&self, extra: Extra) -> bool {
        self.extras.contains(&extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drug_variants_share_geometry_and_add_badge() {
        let pairs = [
            (RenderableClass::Protein, RenderableClass::ProteinDrug),
            (RenderableClass::Complex, RenderableClass::ComplexDrug),
            (RenderableClass::Chemical, RenderableClass::ChemicalDrug),
            (RenderableClass::EntitySet, RenderableClass::EntitySetDrug),
            (RenderableClass::Rna, RenderableClass::RnaDrug),
        ];
        for (base, drug) in pairs {
            let base_spec = RendererSpec::for_class(base);
            let drug_spec = RendererSpec::for_class(drug);
            assert_eq!(base_spec.geometry, drug_spec.geometry);
            assert!(!base_spec.has(Extra::DrugBadge));
            assert!(drug_spec.has(Extra::DrugBadge));
            assert_eq!(drug_spec.style, drug);
        }
    }

    #[test]
    fn test_every_class_has_a_closed_outline() {
        let bounds = Bounds::new(0.0, 0.0, 60.0, 30.0);
        for class in RenderableClass::ALL {
            let spec = RendererSpec::for_class(class);
            let outline = spec.geometry.outline(bounds, 8.0);
            assert!(outline.is_closed(), "{class} outline is open");
        }
    }

    #[test]
    fn test_gene_label_sits_below_the_body_line() {
        let area = NodeGeometry::Gene.label_area(Bounds::new(0.0, 0.0, 60.0, 40.0));
        assert_eq!(area.min_y(), 20.0);
        assert_eq!(area.max_y(), 40.0);
    }
}
