//! SVG output.
//!
//! [`SvgSurface`] builds an SVG document with one `<g data-layer="...">`
//! group per composited layer. Clipped text runs, used by split labels,
//! get a `<clipPath>` definition each.

use std::{fmt::Write as _, fs, path::Path as FsPath};

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use pathview_core::{
    color::Color,
    draw::{Path, PathCommand, RenderLayer, StrokeDefinition, Surface, TextRun},
    geometry::Bounds,
};

use super::Error;

/// A [`Surface`] producing an SVG document.
#[derive(Debug, Default)]
pub struct SvgSurface {
    document: Option<Document>,
    definitions: Option<svg_element::Definitions>,
    layer: Option<svg_element::Group>,
    clip_count: usize,
    background: Option<Color>,
    output: Option<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints the whole canvas with `color` before the first layer.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// The finished document, available after [`Surface::finish`].
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Consumes the surface, returning the finished document.
    ///
    /// # Errors
    ///
    /// Fails if the surface was never finished.
    pub fn into_string(self) -> Result<String, Error> {
        self.output
            .ok_or_else(|| Error::Render("SVG surface was not finished".to_string()))
    }

    /// Writes the finished document to `path`.
    pub fn write_to(&self, path: impl AsRef<FsPath>) -> Result<(), Error> {
        let path = path.as_ref();
        let output = self
            .output()
            .ok_or_else(|| Error::Render("SVG surface was not finished".to_string()))?;
        info!(path:? = path; "Writing SVG file");
        fs::write(path, output)?;
        Ok(())
    }

    fn append(&mut self, node: impl Into<Box<dyn svg::Node>>) -> Result<(), Error> {
        if let Some(layer) = self.layer.take() {
            self.layer = Some(layer.add(node));
            return Ok(());
        }
        let document = self
            .document
            .take()
            .ok_or_else(|| Error::Render("drawing before the SVG surface was begun".to_string()))?;
        self.document = Some(document.add(node));
        Ok(())
    }

    fn clip(&mut self, bounds: Bounds) -> String {
        self.clip_count += 1;
        let id = format!("clip-{}", self.clip_count);
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height());
        let clip = svg_element::ClipPath::new().set("id", id.as_str()).add(rect);
        let definitions = self
            .definitions
            .take()
            .unwrap_or_else(svg_element::Definitions::new);
        self.definitions = Some(definitions.add(clip));
        id
    }
}

/// SVG path data of a path.
pub fn path_data(path: &Path) -> String {
    let mut data = String::new();
    for command in path.commands() {
        let _ = match *command {
            PathCommand::MoveTo(p) => write!(data, "M {} {} ", p.x(), p.y()),
            PathCommand::LineTo(p) => write!(data, "L {} {} ", p.x(), p.y()),
            PathCommand::CubicTo(c1, c2, end) => write!(
                data,
                "C {} {}, {} {}, {} {} ",
                c1.x(),
                c1.y(),
                c2.x(),
                c2.y(),
                end.x(),
                end.y()
            ),
            PathCommand::Close => write!(data, "Z "),
        };
    }
    data.truncate(data.trim_end().len());
    data
}

fn stroke_attributes(element: svg_element::Path, stroke: &StrokeDefinition) -> svg_element::Path {
    let color = stroke.color();
    let mut element = element
        .set("stroke", color.to_hex())
        .set("stroke-opacity", color.alpha())
        .set("stroke-width", stroke.width())
        .set("stroke-linecap", stroke.cap().as_str())
        .set("stroke-linejoin", stroke.join().as_str());
    if let Some(dashes) = stroke.style().dash_array() {
        let dashes: Vec<String> = dashes.iter().map(ToString::to_string).collect();
        element = element.set("stroke-dasharray", dashes.join(","));
    }
    element
}

impl Surface for SvgSurface {
    type Error = Error;

    fn begin(&mut self, bounds: Bounds) -> Result<(), Self::Error> {
        debug!(width = bounds.width(), height = bounds.height(); "Beginning SVG document");
        let mut document = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.width(),
                    bounds.height()
                ),
            )
            .set("width", bounds.width())
            .set("height", bounds.height());
        if let Some(color) = self.background {
            document = document.add(
                svg_element::Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("fill", color.to_hex()),
            );
        }
        self.document = Some(document);
        self.definitions = None;
        self.layer = None;
        self.clip_count = 0;
        self.output = None;
        Ok(())
    }

    fn begin_layer(&mut self, layer: RenderLayer) -> Result<(), Self::Error> {
        self.layer = Some(svg_element::Group::new().set("data-layer", layer.name()));
        Ok(())
    }

    fn end_layer(&mut self, _layer: RenderLayer) -> Result<(), Self::Error> {
        let group = self
            .layer
            .take()
            .ok_or_else(|| Error::Render("layer ended without being begun".to_string()))?;
        self.append(group)
    }

    fn fill(&mut self, path: &Path, color: Color) -> Result<(), Self::Error> {
        let element = svg_element::Path::new()
            .set("d", path_data(path))
            .set("fill", color.to_hex())
            .set("fill-opacity", color.alpha())
            .set("stroke", "none");
        self.append(element)
    }

    fn stroke(&mut self, path: &Path, stroke: &StrokeDefinition) -> Result<(), Self::Error> {
        let element = svg_element::Path::new()
            .set("d", path_data(path))
            .set("fill", "none");
        self.append(stroke_attributes(element, stroke))
    }

    fn fill_and_stroke(
        &mut self,
        path: &Path,
        fill: Color,
        stroke: &StrokeDefinition,
    ) -> Result<(), Self::Error> {
        let element = svg_element::Path::new()
            .set("d", path_data(path))
            .set("fill", fill.to_hex())
            .set("fill-opacity", fill.alpha());
        self.append(stroke_attributes(element, stroke))
    }

    fn text(&mut self, run: &TextRun) -> Result<(), Self::Error> {
        let mut element = svg_element::Text::new(run.text.as_str())
            .set("x", run.origin.x())
            .set("y", run.origin.y())
            .set("font-family", run.font.family())
            .set("font-size", run.font.pixel_size())
            .set("fill", run.color.to_hex())
            .set("fill-opacity", run.color.alpha());
        if run.font.is_bold() {
            element = element.set("font-weight", "bold");
        }
        if let Some(bounds) = run.clip {
            let id = self.clip(bounds);
            element = element.set("clip-path", format!("url(#{id})"));
        }
        self.append(element)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        if let Some(group) = self.layer.take() {
            self.append(group)?;
        }
        let mut document = self
            .document
            .take()
            .ok_or_else(|| Error::Render("finishing an SVG surface that was not begun".to_string()))?;
        if let Some(definitions) = self.definitions.take() {
            document = document.add(definitions);
        }
        let output = document.to_string();
        debug!(bytes = output.len(), clips = self.clip_count; "SVG document finished");
        self.output = Some(output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pathview_core::{
        draw::{LayeredOutput, Primitive, shape},
        geometry::Point,
    };

    use super::*;

    fn red() -> Color {
        Color::new("#ff0000").unwrap()
    }

    #[test]
    fn test_path_data() {
        let path = Path::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.0, 0.0))
            .cubic_to(Point::new(10.0, 5.0), Point::new(5.0, 10.0), Point::new(0.0, 10.0))
            .close();
        assert_eq!(path_data(&path), "M 0 0 L 10 0 C 10 5, 5 10, 0 10 Z");
    }

    #[test]
    fn test_layers_become_groups() {
        let mut output = LayeredOutput::new();
        let square = shape::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0));
        output
            .add_to_layer(RenderLayer::NodeBackground, Primitive::fill(square.clone(), red()))
            .unwrap();
        output
            .add_to_layer(
                RenderLayer::NodeBorder,
                Primitive::draw(square, StrokeDefinition::dashed(red(), 2.0)),
            )
            .unwrap();

        let mut surface = SvgSurface::new().with_background(Color::new("#ffffff").unwrap());
        surface.begin(Bounds::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        output.composite(&mut surface).unwrap();
        surface.finish().unwrap();
        let svg = surface.into_string().unwrap();

        assert!(svg.contains("data-layer=\"node-background\""));
        assert!(svg.contains("data-layer=\"node-border\""));
        assert!(svg.contains("stroke-dasharray=\"5,5\""));
        assert!(svg.contains("fill=\"#ff0000\""));
        assert!(svg.find("node-background") < svg.find("node-border"));
    }

    #[test]
    fn test_drawing_before_begin_fails() {
        let mut surface = SvgSurface::new();
        let err = surface.fill(&Path::new(), red()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(surface.into_string().is_err());
    }
}
