//! Renderer-agnostic vector paths.

use crate::geometry::{Bounds, Point};

/// A single path command in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier: first control, second control, end point
    CubicTo(Point, Point, Point),
    Close,
}

/// An ordered list of path commands, possibly with several subpaths.
///
/// # Examples
///
/// ```
/// use pathview_core::{draw::Path, geometry::Point};
///
/// let triangle = Path::new()
///     .move_to(Point::new(0.0, 0.0))
///     .line_to(Point::new(10.0, 0.0))
///     .line_to(Point::new(5.0, 8.0))
///     .close();
/// assert_eq!(triangle.commands().len(), 4);
/// assert!(triangle.is_closed());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, end: Point) -> Self {
        self.commands.push(PathCommand::CubicTo(c1, c2, end));
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Appends all subpaths of `other` after this path's commands.
    pub fn append(mut self, other: Path) -> Self {
        self.commands.extend(other.commands);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True if the last command closes the current subpath
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Every point named by the path, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|command| {
            let points: Vec<Point> = match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
                PathCommand::CubicTo(c1, c2, end) => vec![c1, c2, end],
                PathCommand::Close => Vec::new(),
            };
            points
        })
    }

    /// Bounds of the control polygon, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points())
    }

    /// Signed-area sum of every subpath's vertex polygon (shoelace over the
    /// command end points, curves treated as straight chords), as an absolute value.
    pub fn polygon_area(&self) -> f32 {
        let mut total = 0.0;
        let mut ring: Vec<Point> = Vec::new();
        let flush = |ring: &mut Vec<Point>, total: &mut f32| {
            if ring.len() >= 3 {
                let mut twice = 0.0;
                for (i, a) in ring.iter().enumerate() {
                    let b = ring[(i + 1) % ring.len()];
                    twice += a.x() * b.y() - b.x() * a.y();
                }
                *total += (twice / 2.0).abs();
            }
            ring.clear();
        };
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    flush(&mut ring, &mut total);
                    ring.push(p);
                }
                PathCommand::LineTo(p) | PathCommand::CubicTo(_, _, p) => ring.push(p),
                PathCommand::Close => flush(&mut ring, &mut total),
            }
        }
        flush(&mut ring, &mut total);
        total
    }
}
