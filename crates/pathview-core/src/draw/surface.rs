//! Output surface abstraction.
//!
//! A [`Surface`] is the backend that turns composited primitives into a
//! concrete image or document. The compositor calls it once per primitive,
//! bracketed by `begin_layer`/`end_layer` for every non-empty layer.

use std::convert::Infallible;

use crate::{
    color::Color,
    draw::{Path, RenderLayer, StrokeDefinition, text_fit::TextRun},
    geometry::Bounds,
};

/// A drawing backend.
pub trait Surface {
    type Error;

    /// Called once before anything is drawn, with the full canvas extent.
    fn begin(&mut self, bounds: Bounds) -> Result<(), Self::Error>;

    fn begin_layer(&mut self, _layer: RenderLayer) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_layer(&mut self, _layer: RenderLayer) -> Result<(), Self::Error> {
        Ok(())
    }

    fn fill(&mut self, path: &Path, color: Color) -> Result<(), Self::Error>;

    fn stroke(&mut self, path: &Path, stroke: &StrokeDefinition) -> Result<(), Self::Error>;

    /// Fills then strokes the same path.
    fn fill_and_stroke(
        &mut self,
        path: &Path,
        fill: Color,
        stroke: &StrokeDefinition,
    ) -> Result<(), Self::Error> {
        self.fill(path, fill)?;
        self.stroke(path, stroke)
    }

    fn text(&mut self, run: &TextRun) -> Result<(), Self::Error>;

    /// Called once after the last primitive.
    fn finish(&mut self) -> Result<(), Self::Error>;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Begin(Bounds),
    BeginLayer(RenderLayer),
    EndLayer(RenderLayer),
    Fill { path: Path, color: Color },
    Stroke { path: Path, stroke: StrokeDefinition },
    Text(TextRun),
    Finish,
}

/// A surface that records every call, for assertions on drawing output.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Recorded operations emitted inside the given layer.
    pub fn ops_in(&self, layer: RenderLayer) -> Vec<&SurfaceOp> {
        let mut inside = false;
        self.ops
            .iter()
            .filter(|op| match op {
                SurfaceOp::BeginLayer(l) => {
                    inside = *l == layer;
                    false
                }
                SurfaceOp::EndLayer(_) => {
                    inside = false;
                    false
                }
                _ => inside,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Error = Infallible;

    fn begin(&mut self, bounds: Bounds) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::Begin(bounds));
        Ok(())
    }

    fn begin_layer(&mut self, layer: RenderLayer) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::BeginLayer(layer));
        Ok(())
    }

    fn end_layer(&mut self, layer: RenderLayer) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::EndLayer(layer));
        Ok(())
    }

    fn fill(&mut self, path: &Path, color: Color) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::Fill {
            path: path.clone(),
            color,
        });
        Ok(())
    }

    fn stroke(&mut self, path: &Path, stroke: &StrokeDefinition) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::Stroke {
            path: path.clone(),
            stroke: stroke.clone(),
        });
        Ok(())
    }

    fn text(&mut self, run: &TextRun) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::Text(run.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.ops.push(SurfaceOp::Finish);
        Ok(())
    }
}
