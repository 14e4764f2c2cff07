//! Drawing primitives and the layered canvas.
//!
//! Shapes are plain [`Path`]s built by the [`shape`] library, styled with a
//! [`StrokeDefinition`] or a fill color, and collected per [`RenderLayer`] in
//! a [`LayeredOutput`] before being composited onto a [`Surface`].

mod layer;
mod path;
pub mod shape;
mod stroke;
mod surface;
mod text;
pub mod text_fit;

pub use layer::{LayerError, LayerKind, LayeredOutput, Primitive, RenderLayer};
pub use path::{Path, PathCommand};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use surface::{RecordingSurface, Surface, SurfaceOp};
pub use text::{ApproximateMeasure, CosmicTextMeasure, FontSpec, TextMeasure};
pub use text_fit::{FittedText, TextPrimitive, TextRun, TextSplit};
