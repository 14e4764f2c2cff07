//! Layered canvas for deterministic z-ordering.
//!
//! Renderers never draw directly. They append [`Primitive`]s to a named
//! [`RenderLayer`] of a [`LayeredOutput`], in whatever order they traverse
//! the diagram, and the compositor later walks the layers bottom to top and
//! hands each primitive to a [`Surface`].
//!
//! # Overview
//!
//! - [`RenderLayer`]: the fixed layer order, bottom first
//! - [`LayerKind`]: which primitive kinds a layer accepts
//! - [`Primitive`]: fill, stroke, fill-and-stroke or text
//! - [`LayeredOutput`]: append-only per-layer buffers plus the compositor
//!
//! Every layer that can hold faded-out elements has a twin drawn directly
//! beneath it (see [`RenderLayer::fade_out_twin`]), so faded elements never
//! cover normal ones whatever the traversal order.
//!
//! # Example
//!
//! ```
//! # use pathview_core::{color::Color, draw::{shape, LayeredOutput, Primitive, RecordingSurface, RenderLayer}};
//! # use pathview_core::geometry::Bounds;
//! let mut output = LayeredOutput::new();
//! let path = shape::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0));
//!
//! output.add_to_layer(RenderLayer::Text, Primitive::fill(path.clone(), Color::default()))
//!     .unwrap_err();
//! output.add_to_layer(RenderLayer::NodeBackground, Primitive::fill(path, Color::default()))
//!     .unwrap();
//!
//! let mut surface = RecordingSurface::default();
//! output.composite(&mut surface).unwrap();
//! assert_eq!(surface.ops().len(), 1);
//! ```

use std::{collections::BTreeMap, fmt};

use thiserror::Error;

use crate::{
    color::Color,
    draw::{Path, StrokeDefinition, Surface, text_fit::TextPrimitive},
};

/// Which primitive kinds a layer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Fill,
    Draw,
    Text,
    /// Accepts fill, draw and combined primitives
    FillDraw,
}

impl LayerKind {
    /// Returns true if a primitive of kind `primitive` may be added.
    pub fn accepts(self, primitive: LayerKind) -> bool {
        match self {
            Self::FillDraw => primitive != Self::Text,
            kind => kind == primitive,
        }
    }
}

/// The rendering layers of a pathway diagram.
///
/// Layers are composited from bottom to top in declaration order; the
/// derived `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    CompartmentFill,
    CompartmentBorder,
    CompartmentText,
    FadeOutNodeBackground,
    NodeBackground,
    FadeOutNodeForeground,
    NodeForeground,
    AnalysisOverlay,
    FadeOutNodeBorder,
    NodeBorder,
    Flags,
    Halo,
    FadeOutSegments,
    Segments,
    FadeOutEdgeShapes,
    EdgeShapes,
    FadeOutText,
    Text,
    Legend,
    LegendTicks,
    LegendText,
}

impl RenderLayer {
    /// Every layer, bottom first.
    pub const ALL: [RenderLayer; 21] = [
        Self::CompartmentFill,
        Self::CompartmentBorder,
        Self::CompartmentText,
        Self::FadeOutNodeBackground,
        Self::NodeBackground,
        Self::FadeOutNodeForeground,
        Self::NodeForeground,
        Self::AnalysisOverlay,
        Self::FadeOutNodeBorder,
        Self::NodeBorder,
        Self::Flags,
        Self::Halo,
        Self::FadeOutSegments,
        Self::Segments,
        Self::FadeOutEdgeShapes,
        Self::EdgeShapes,
        Self::FadeOutText,
        Self::Text,
        Self::Legend,
        Self::LegendTicks,
        Self::LegendText,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CompartmentFill => "compartment-fill",
            Self::CompartmentBorder => "compartment-border",
            Self::CompartmentText => "compartment-text",
            Self::FadeOutNodeBackground => "fadeout-node-background",
            Self::NodeBackground => "node-background",
            Self::FadeOutNodeForeground => "fadeout-node-foreground",
            Self::NodeForeground => "node-foreground",
            Self::AnalysisOverlay => "analysis-overlay",
            Self::FadeOutNodeBorder => "fadeout-node-border",
            Self::NodeBorder => "node-border",
            Self::Flags => "flags",
            Self::Halo => "halo",
            Self::FadeOutSegments => "fadeout-segments",
            Self::Segments => "segments",
            Self::FadeOutEdgeShapes => "fadeout-edge-shapes",
            Self::EdgeShapes => "edge-shapes",
            Self::FadeOutText => "fadeout-text",
            Self::Text => "text",
            Self::Legend => "legend",
            Self::LegendTicks => "legend-ticks",
            Self::LegendText => "legend-text",
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Self::CompartmentFill
            | Self::FadeOutNodeBackground
            | Self::NodeBackground
            | Self::AnalysisOverlay => LayerKind::Fill,
            Self::CompartmentBorder
            | Self::FadeOutNodeBorder
            | Self::NodeBorder
            | Self::Flags
            | Self::Halo
            | Self::FadeOutSegments
            | Self::Segments
            | Self::LegendTicks => LayerKind::Draw,
            Self::CompartmentText | Self::FadeOutText | Self::Text | Self::LegendText => {
                LayerKind::Text
            }
            Self::FadeOutNodeForeground
            | Self::NodeForeground
            | Self::FadeOutEdgeShapes
            | Self::EdgeShapes
            | Self::Legend => LayerKind::FillDraw,
        }
    }

    /// The layer to write to for an element, given whether it is faded out.
    ///
    /// Layers without a fade-out twin are returned unchanged.
    pub fn fade_out_twin(self, fade_out: bool) -> Self {
        if !fade_out {
            return self;
        }
        match self {
            Self::NodeBackground => Self::FadeOutNodeBackground,
            Self::NodeForeground => Self::FadeOutNodeForeground,
            Self::NodeBorder => Self::FadeOutNodeBorder,
            Self::Segments => Self::FadeOutSegments,
            Self::EdgeShapes => Self::FadeOutEdgeShapes,
            Self::Text => Self::FadeOutText,
            other => other,
        }
    }
}

impl fmt::Display for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single draw primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fill {
        path: Path,
        color: Color,
    },
    Draw {
        path: Path,
        stroke: StrokeDefinition,
    },
    FillDraw {
        path: Path,
        fill: Color,
        stroke: StrokeDefinition,
    },
    Text(TextPrimitive),
}

impl Primitive {
    pub fn fill(path: Path, color: Color) -> Self {
        Self::Fill { path, color }
    }

    pub fn draw(path: Path, stroke: StrokeDefinition) -> Self {
        Self::Draw { path, stroke }
    }

    pub fn fill_draw(path: Path, fill: Color, stroke: StrokeDefinition) -> Self {
        Self::FillDraw { path, fill, stroke }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Fill { .. } => LayerKind::Fill,
            Self::Draw { .. } => LayerKind::Draw,
            Self::FillDraw { .. } => LayerKind::FillDraw,
            Self::Text(_) => LayerKind::Text,
        }
    }

    fn emit<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        match self {
            Self::Fill { path, color } => surface.fill(path, *color),
            Self::Draw { path, stroke } => surface.stroke(path, stroke),
            Self::FillDraw { path, fill, stroke } => surface.fill_and_stroke(path, *fill, stroke),
            Self::Text(text) => text
                .runs()
                .iter()
                .try_for_each(|run| surface.text(run)),
        }
    }
}

/// Error raised when a primitive is written to a layer of another kind.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{found:?} primitive cannot be added to the {layer} layer")]
pub struct LayerError {
    pub layer: RenderLayer,
    pub found: LayerKind,
}

/// Draw primitives grouped by rendering layer.
///
/// Buffers are append-only: within a layer primitives are emitted in
/// insertion order. [`LayeredOutput::clear_layer`] drops a whole layer,
/// which is how per-frame content is replaced.
#[derive(Debug, Clone, Default)]
pub struct LayeredOutput {
    layers: BTreeMap<RenderLayer, Vec<Primitive>>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a primitive to the given layer.
    ///
    /// # Errors
    ///
    /// Returns a [`LayerError`] if the layer does not accept the primitive's kind.
    pub fn add_to_layer(&mut self, layer: RenderLayer, primitive: Primitive) -> Result<(), LayerError> {
        let found = primitive.kind();
        if !layer.kind().accepts(found) {
            return Err(LayerError { layer, found });
        }
        self.layers.entry(layer).or_default().push(primitive);
        Ok(())
    }

    /// Appends every primitive of `other` after this output's own, layer by layer.
    pub fn merge(&mut self, other: LayeredOutput) {
        for (layer, primitives) in other.layers {
            self.layers.entry(layer).or_default().extend(primitives);
        }
    }

    /// Removes every primitive from one layer.
    pub fn clear_layer(&mut self, layer: RenderLayer) {
        self.layers.remove(&layer);
    }

    /// The primitives of one layer, in insertion order.
    pub fn primitives(&self, layer: RenderLayer) -> &[Primitive] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.values().all(Vec::is_empty)
    }

    /// Total number of primitives across layers
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Emits every primitive to `surface`, bottom layer first.
    pub fn composite<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.composite_with(&LayeredOutput::default(), surface)
    }

    /// Emits this output interleaved with `frame`.
    ///
    /// Within each layer this output's primitives come first, then the
    /// frame's. The frame is typically the per-column analysis content of
    /// an animation whose static layers are shared.
    pub fn composite_with<S: Surface + ?Sized>(
        &self,
        frame: &LayeredOutput,
        surface: &mut S,
    ) -> Result<(), S::Error> {
        for layer in RenderLayer::ALL {
            let own = self.primitives(layer);
            let extra = frame.primitives(layer);
            if own.is_empty() && extra.is_empty() {
                continue;
            }
            surface.begin_layer(layer)?;
            for primitive in own.iter().chain(extra) {
                primitive.emit(surface)?;
            }
            surface.end_layer(layer)?;
        }
        Ok(())
    }
}
