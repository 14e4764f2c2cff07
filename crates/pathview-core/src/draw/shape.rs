//! Closed-form geometry for node glyphs and edge decorations.
//!
//! Every function here is pure: a rectangle or a handful of control points
//! go in, a [`Path`] comes out. Rectangles narrower or shorter than one unit
//! produce a collapsed, zero-area path; no input makes these functions panic.

use crate::{
    draw::Path,
    geometry::{Bounds, Point},
};

/// Cubic Bézier handle length for a quarter ellipse.
const KAPPA: f32 = 0.552_284_8;

/// Zero-area closed path along the rectangle's diagonal.
fn collapsed(bounds: Bounds) -> Path {
    Path::new()
        .move_to(bounds.min_point())
        .line_to(bounds.max_point())
        .close()
}

fn is_degenerate(bounds: Bounds) -> bool {
    bounds.to_size().is_degenerate()
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Closed polygon through the given points.
fn polygon(points: &[Point]) -> Path {
    let mut iter = points.iter().copied();
    let Some(first) = iter.next() else {
        return Path::new();
    };
    iter.fold(Path::new().move_to(first), Path::line_to).close()
}

/// Axis-aligned rectangle.
pub fn rectangle(bounds: Bounds) -> Path {
    if is_degenerate(bounds) {
        return collapsed(bounds);
    }
    polygon(&[
        Point::new(bounds.min_x(), bounds.min_y()),
        Point::new(bounds.max_x(), bounds.min_y()),
        Point::new(bounds.max_x(), bounds.max_y()),
        Point::new(bounds.min_x(), bounds.max_y()),
    ])
}

/// Rectangle with quarter-ellipse corners.
///
/// The radius is clamped to half of the shorter side.
pub fn rounded_rectangle(bounds: Bounds, radius: f32) -> Path {
    if is_degenerate(bounds) {
        return collapsed(bounds);
    }
    let r = finite_or_zero(radius).min(bounds.width().min(bounds.height()) / 2.0);
    if r == 0.0 {
        return rectangle(bounds);
    }
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let k = r * KAPPA;
    Path::new()
        .move_to(Point::new(x0 + r, y0))
        .line_to(Point::new(x1 - r, y0))
        .cubic_to(
            Point::new(x1 - r + k, y0),
            Point::new(x1, y0 + r - k),
            Point::new(x1, y0 + r),
        )
        .line_to(Point::new(x1, y1 - r))
        .cubic_to(
            Point::new(x1, y1 - r + k),
            Point::new(x1 - r + k, y1),
            Point::new(x1 - r, y1),
        )
        .line_to(Point::new(x0 + r, y1))
        .cubic_to(
            Point::new(x0 + r - k, y1),
            Point::new(x0, y1 - r + k),
            Point::new(x0, y1 - r),
        )
        .line_to(Point::new(x0, y0 + r))
        .cubic_to(
            Point::new(x0, y0 + r - k),
            Point::new(x0 + r - k, y0),
            Point::new(x0 + r, y0),
        )
        .close()
}

/// Rectangle with its four corners cut at 45 degrees.
pub fn corner_cut_octagon(bounds: Bounds, corner: f32) -> Path {
    if is_degenerate(bounds) {
        return collapsed(bounds);
    }
    let c = finite_or_zero(corner).min(bounds.width().min(bounds.height()) / 2.0);
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    polygon(&[
        Point::new(x0, y0 + c),
        Point::new(x0 + c, y0),
        Point::new(x1 - c, y0),
        Point::new(x1, y0 + c),
        Point::new(x1, y1 - c),
        Point::new(x1 - c, y1),
        Point::new(x0 + c, y1),
        Point::new(x0, y1 - c),
    ])
}

/// Horizontal hexagon with its pointed ends at mid-height.
pub fn hexagon(bounds: Bounds) -> Path {
    if is_degenerate(bounds) {
        return collapsed(bounds);
    }
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let w = bounds.width();
    let cy = bounds.center().y();
    polygon(&[
        Point::new(x0, cy),
        Point::new(x0 + 0.25 * w, y0),
        Point::new(x0 + 0.75 * w, y0),
        Point::new(x1, cy),
        Point::new(x0 + 0.75 * w, y1),
        Point::new(x0 + 0.25 * w, y1),
    ])
}

/// Ellipse inscribed in the rectangle.
pub fn ellipse(bounds: Bounds) -> Path {
    if is_degenerate(bounds) {
        return collapsed(bounds);
    }
    ellipse_arcs(bounds.center(), bounds.width() / 2.0, bounds.height() / 2.0)
}

fn ellipse_arcs(center: Point, rx: f32, ry: f32) -> Path {
    let (cx, cy) = (center.x(), center.y());
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    Path::new()
        .move_to(Point::new(cx + rx, cy))
        .cubic_to(
            Point::new(cx + rx, cy + ky),
            Point::new(cx + kx, cy + ry),
            Point::new(cx, cy + ry),
        )
        .cubic_to(
            Point::new(cx - kx, cy + ry),
            Point::new(cx - rx, cy + ky),
            Point::new(cx - rx, cy),
        )
        .cubic_to(
            Point::new(cx - rx, cy - ky),
            Point::new(cx - kx, cy - ry),
            Point::new(cx, cy - ry),
        )
        .cubic_to(
            Point::new(cx + kx, cy - ry),
            Point::new(cx + rx, cy - ky),
            Point::new(cx + rx, cy),
        )
        .close()
}

/// Circle of radius `radius` around `center`.
pub fn circle(center: Point, radius: f32) -> Path {
    let r = finite_or_zero(radius);
    ellipse(Bounds::new_from_center(
        center,
        crate::geometry::Size::new(2.0 * r, 2.0 * r),
    ))
}

/// Two concentric circles, outer first.
pub fn double_circle(center: Point, outer: f32, inner: f32) -> Path {
    let outer = finite_or_zero(outer);
    let inner = finite_or_zero(inner).min(outer);
    circle(center, outer).append(circle(center, inner))
}

/// Closed triangle through three points.
pub fn arrowhead(a: Point, b: Point, c: Point) -> Path {
    polygon(&[a, b, c])
}

/// Both diagonals of the rectangle as two open subpaths.
pub fn cross(bounds: Bounds) -> Path {
    Path::new()
        .move_to(bounds.min_point())
        .line_to(bounds.max_point())
        .move_to(Point::new(bounds.max_x(), bounds.min_y()))
        .line_to(Point::new(bounds.min_x(), bounds.max_y()))
}

/// Straight bar from `a` to `b`, used for inhibition ends.
pub fn stop_bar(a: Point, b: Point) -> Path {
    Path::new().move_to(a).line_to(b)
}

/// Open polyline through the points; empty for no points.
pub fn polyline(points: &[Point]) -> Path {
    let mut iter = points.iter().copied();
    match iter.next() {
        Some(first) => iter.fold(Path::new().move_to(first), Path::line_to),
        None => Path::new(),
    }
}

/// Parts of a gene glyph.
///
/// A gene is drawn as a horizontal body line across the middle of its
/// rectangle, a bracket rising from the right end of the body to the top
/// edge and turning right, and a filled arrow head at the end of the bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneShape {
    /// Fillable area above the body line
    pub body: Path,
    pub line: Path,
    pub bracket: Path,
    pub head: Path,
}

/// Gene glyph inside the rectangle.
pub fn gene(bounds: Bounds) -> GeneShape {
    if is_degenerate(bounds) {
        let empty = collapsed(bounds);
        return GeneShape {
            body: empty.clone(),
            line: empty.clone(),
            bracket: empty.clone(),
            head: empty,
        };
    }
    let (x0, y0, x1) = (bounds.min_x(), bounds.min_y(), bounds.max_x());
    let cy = bounds.center().y();
    let arrow = (bounds.height() / 4.0).min(bounds.width() / 4.0);
    let bracket_x = x1 - 2.0 * arrow;
    let arm_y = y0 + arrow;

    GeneShape {
        body: rectangle(Bounds::new(x0, arm_y, x1 - arrow, cy)),
        line: stop_bar(Point::new(x0, cy), Point::new(x1, cy)),
        bracket: polyline(&[
            Point::new(bracket_x, cy),
            Point::new(bracket_x, arm_y),
            Point::new(x1 - arrow, arm_y),
        ]),
        head: arrowhead(
            Point::new(x1 - arrow, y0),
            Point::new(x1, arm_y),
            Point::new(x1 - arrow, arm_y + arrow),
        ),
    }
}

/// RNA glyph: a flat top with straight sides and a looped bottom edge.
pub fn rna(bounds: Bounds) -> Path {
    if is_degenerate(bounds) {
        return collapsed(bounds);
    }
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let loop_depth = bounds.height() / 4.0;
    let w = bounds.width();
    Path::new()
        .move_to(Point::new(x0, y0))
        .line_to(Point::new(x1, y0))
        .line_to(Point::new(x1, y1 - loop_depth))
        .cubic_to(
            Point::new(x1 - w / 4.0, y1 + loop_depth),
            Point::new(x0 + w * 3.0 / 4.0, y1 - 2.0 * loop_depth),
            Point::new(x0 + w / 2.0, y1 - loop_depth),
        )
        .cubic_to(
            Point::new(x0 + w / 4.0, y1),
            Point::new(x0 + w / 8.0, y1),
            Point::new(x0, y1 - loop_depth),
        )
        .close()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::geometry::Size;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_rectangle_area() {
        assert_approx_eq!(f32, rectangle(rect(0.0, 0.0, 20.0, 10.0)).polygon_area(), 200.0);
    }

    #[test]
    fn test_octagon_cuts_corners() {
        let path = corner_cut_octagon(rect(0.0, 0.0, 20.0, 10.0), 2.0);
        // 200 minus four triangles of 2 * 2 / 2
        assert_approx_eq!(f32, path.polygon_area(), 192.0);
    }

    #[test]
    fn test_octagon_corner_is_clamped() {
        let path = corner_cut_octagon(rect(0.0, 0.0, 10.0, 4.0), 100.0);
        let bounds = path.bounds().unwrap();
        assert_approx_eq!(f32, bounds.width(), 10.0);
        assert_approx_eq!(f32, bounds.height(), 4.0);
    }

    #[test]
    fn test_hexagon_points() {
        let path = hexagon(rect(0.0, 0.0, 40.0, 20.0));
        // 40 * 20 minus four corner triangles of 10 * 10 / 2
        assert_approx_eq!(f32, path.polygon_area(), 600.0);
    }

    #[test]
    fn test_ellipse_bounds() {
        let bounds = ellipse(rect(10.0, 10.0, 30.0, 20.0)).bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 10.0);
        assert_approx_eq!(f32, bounds.max_x(), 40.0);
        assert_approx_eq!(f32, bounds.min_y(), 10.0);
        assert_approx_eq!(f32, bounds.max_y(), 30.0);
    }

    #[test]
    fn test_double_circle_has_two_subpaths() {
        let path = double_circle(Point::new(0.0, 0.0), 10.0, 6.0);
        let moves = path
            .commands()
            .iter()
            .filter(|c| matches!(c, crate::draw::PathCommand::MoveTo(_)))
            .count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn test_cross_is_open() {
        let path = cross(rect(0.0, 0.0, 10.0, 10.0));
        assert!(!path.is_closed());
        assert_eq!(path.commands().len(), 4);
    }

    #[test]
    fn test_polyline_empty() {
        assert!(polyline(&[]).is_empty());
        assert_eq!(polyline(&[Point::new(1.0, 1.0)]).commands().len(), 1);
    }

    #[test]
    fn test_gene_parts_inside_bounds() {
        let bounds = rect(0.0, 0.0, 80.0, 30.0);
        let gene = gene(bounds);
        for part in [&gene.body, &gene.line, &gene.bracket, &gene.head] {
            let parts = part.bounds().unwrap();
            assert!(bounds.contains(parts.min_point()));
            assert!(bounds.contains(parts.max_point()));
        }
    }

    #[test]
    fn test_degenerate_is_zero_area() {
        let thin = rect(5.0, 5.0, 0.5, 40.0);
        for path in [
            rectangle(thin),
            rounded_rectangle(thin, 4.0),
            corner_cut_octagon(thin, 4.0),
            hexagon(thin),
            ellipse(thin),
            rna(thin),
            gene(thin).body,
        ] {
            assert!(!path.is_empty());
            assert_approx_eq!(f32, path.polygon_area(), 0.0);
        }
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geometry::Size;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            0.0f32..300.0,
            0.0f32..300.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    /// Shapes built from a rectangle never leave it, whatever its size.
    fn check_shapes_stay_in_bounds(bounds: Bounds, radius: f32) -> Result<(), TestCaseError> {
        let slack = bounds.add_padding(crate::geometry::Insets::uniform(0.01));
        for path in [
            rectangle(bounds),
            rounded_rectangle(bounds, radius),
            corner_cut_octagon(bounds, radius),
            hexagon(bounds),
            ellipse(bounds),
        ] {
            let path_bounds = path.bounds();
            prop_assert!(path_bounds.is_some());
            let path_bounds = path_bounds.unwrap_or_default();
            prop_assert!(slack.contains(path_bounds.min_point()));
            prop_assert!(slack.contains(path_bounds.max_point()));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn shapes_stay_in_bounds(bounds in bounds_strategy(), radius in -10.0f32..200.0) {
            check_shapes_stay_in_bounds(bounds, radius)?;
        }
    }
}
