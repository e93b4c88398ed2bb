//! # Irregular Land Parcel
//!
//! Area of a lot surveyed as an ordered ring of (x, y) points in meters,
//! plus a projection of the ring onto a drawing viewport.
//!
//! ## Area
//!
//! Shoelace formula over the closed ring:
//!
//! ```text
//! A = ½ |Σ (xᵢ·yᵢ₊₁ − xᵢ₊₁·yᵢ)|,  i + 1 wrapping to 0
//! ```
//!
//! The area is withheld (`None`) when the ring has fewer than three points
//! or any coordinate is not a number; a partial ring is never measured.
//!
//! ## Projection
//!
//! The ring is scaled uniformly to fit inside the viewport padding, centered,
//! and flipped vertically (survey y points up, screen y points down). Each
//! edge carries its real length and the projected midpoint where a label
//! goes.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::polygon::{polygon_area, Vertex};
//!
//! let lot = vec![
//!     Vertex::new("0", "0"),
//!     Vertex::new("12", "0"),
//!     Vertex::new("12", "30"),
//!     Vertex::new("0", "30"),
//! ];
//! assert_eq!(polygon_area(&lot), Some(360.0));
//! ```

use std::fmt::Write as _;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::parsing::parse_coordinate;
use crate::rows::{unknown_field, ElementRow};

/// A surveyed point as typed (meters).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: String,
    pub y: String,
}

impl Vertex {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Vertex { x: x.into(), y: y.into() }
    }

    /// Numeric point, `None` if either coordinate is not a number
    pub fn point(&self) -> Option<Point> {
        Some(Point {
            x: parse_coordinate(&self.x)?,
            y: parse_coordinate(&self.y)?,
        })
    }
}

impl ElementRow for Vertex {
    const FIELDS: &'static [&'static str] = &["x", "y"];
    const MIN_ROWS: usize = 3;

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "x" => Some(self.x.clone()),
            "y" => Some(self.y.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> CalcResult<()> {
        match name {
            "x" => self.x = value.to_string(),
            "y" => self.y = value.to_string(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    /// A 10 × 20 m rectangle
    fn default_rows() -> Vec<Self> {
        vec![
            Vertex::new("0", "0"),
            Vertex::new("10", "0"),
            Vertex::new("10", "20"),
            Vertex::new("0", "20"),
        ]
    }
}

/// A numeric point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Parse a ring. `None` if it has fewer than three points or any point is
/// not numeric.
pub fn parse_ring(vertices: &[Vertex]) -> Option<Vec<Point>> {
    if vertices.len() < Vertex::MIN_ROWS {
        return None;
    }
    vertices.iter().map(Vertex::point).collect()
}

/// Shoelace area of a numeric ring. Winding order does not matter.
pub fn shoelace_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice_signed: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice_signed.abs() / 2.0
}

/// Area of a typed ring (m²), `None` when it cannot be measured or the
/// coordinates are too large to multiply.
pub fn polygon_area(vertices: &[Vertex]) -> Option<f64> {
    let Some(points) = parse_ring(vertices) else {
        warn!("land area withheld: ring of {} vertices is incomplete", vertices.len());
        return None;
    };
    let area = shoelace_area(&points);
    if !area.is_finite() {
        warn!("land area withheld: coordinates overflow");
        return None;
    }
    Some(area)
}

/// Drawing surface in display units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Margin kept clear on every side for edge labels
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 400.0,
            height: 300.0,
            padding: 30.0,
        }
    }
}

/// An edge of the projected ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    /// Index of the starting vertex; the edge ends at the next one
    pub from: usize,
    /// Real length (m)
    pub length_m: f64,
    /// Where the label goes, in viewport coordinates
    pub anchor: Point,
}

/// The ring mapped onto a viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonProjection {
    pub viewport: Viewport,
    /// Display units per meter
    pub scale: f64,
    /// Vertices in viewport coordinates (y down), in ring order
    pub points: Vec<Point>,
    pub edges: Vec<EdgeLabel>,
}

/// Project a typed ring onto a viewport.
///
/// Returns `None` when the ring cannot be parsed, when its bounding box has
/// zero width or height, or when the viewport leaves no room inside the
/// padding.
pub fn project(vertices: &[Vertex], viewport: Viewport) -> Option<PolygonProjection> {
    let points = parse_ring(vertices)?;

    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), p| (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y)),
    );
    let box_width = max_x - min_x;
    let box_height = max_y - min_y;
    if !(box_width > 0.0 && box_width.is_finite() && box_height > 0.0 && box_height.is_finite()) {
        return None;
    }

    let usable_width = viewport.width - 2.0 * viewport.padding;
    let usable_height = viewport.height - 2.0 * viewport.padding;
    if usable_width <= 0.0 || usable_height <= 0.0 {
        return None;
    }

    let scale = (usable_width / box_width).min(usable_height / box_height);
    let offset_x = (viewport.width - box_width * scale) / 2.0;
    let offset_y = (viewport.height - box_height * scale) / 2.0;

    let projected: Vec<Point> = points
        .iter()
        .map(|p| Point {
            x: offset_x + (p.x - min_x) * scale,
            y: offset_y + (max_y - p.y) * scale,
        })
        .collect();

    let n = points.len();
    let edges = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            EdgeLabel {
                from: i,
                length_m: points[i].distance(&points[j]),
                anchor: projected[i].midpoint(&projected[j]),
            }
        })
        .collect();

    Some(PolygonProjection {
        viewport,
        scale,
        points: projected,
        edges,
    })
}

impl PolygonProjection {
    /// Render the projection as a standalone SVG document.
    ///
    /// `format_length` turns an edge length into its label text, so callers
    /// control decimals and the decimal separator.
    pub fn to_svg(&self, format_length: impl Fn(f64) -> String) -> String {
        let vp = &self.viewport;
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = vp.width,
            h = vp.height
        );

        let ring: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect();
        let _ = writeln!(
            svg,
            "  <polygon points=\"{}\" fill=\"#e8f0fe\" stroke=\"#1a73e8\" stroke-width=\"2\"/>",
            ring.join(" ")
        );

        for p in &self.points {
            let _ = writeln!(
                svg,
                "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"3\" fill=\"#1a73e8\"/>",
                p.x, p.y
            );
        }

        for edge in &self.edges {
            let _ = writeln!(
                svg,
                "  <text x=\"{:.2}\" y=\"{:.2}\" font-family=\"sans-serif\" font-size=\"11\" text-anchor=\"middle\" fill=\"#202124\">{}</text>",
                edge.anchor.x,
                edge.anchor.y,
                format_length(edge.length_m)
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(&str, &str)]) -> Vec<Vertex> {
        coords.iter().map(|(x, y)| Vertex::new(*x, *y)).collect()
    }

    #[test]
    fn test_unit_square_both_windings() {
        let ccw = ring(&[("0", "0"), ("1", "0"), ("1", "1"), ("0", "1")]);
        let cw = ring(&[("0", "0"), ("0", "1"), ("1", "1"), ("1", "0")]);
        assert_eq!(polygon_area(&ccw), Some(1.0));
        assert_eq!(polygon_area(&cw), Some(1.0));
    }

    #[test]
    fn test_huge_coordinates_withhold_area() {
        let huge = ring(&[("0", "0"), ("1e200", "0"), ("1e200", "1e200"), ("0", "1e200")]);
        assert_eq!(polygon_area(&huge), None);

        let spread = ring(&[("-1e308", "0"), ("1e308", "0"), ("0", "1")]);
        assert!(project(&spread, Viewport::default()).is_none());
    }

    #[test]
    fn test_collinear_ring_has_zero_area() {
        let line = ring(&[("0", "0"), ("1", "1"), ("2", "2")]);
        assert_eq!(polygon_area(&line), Some(0.0));
    }

    #[test]
    fn test_irregular_lot() {
        // Trapezoid with parallel sides 10 and 6, height 8 → 64 m²
        let lot = ring(&[("0", "0"), ("10", "0"), ("8", "8"), ("2", "8")]);
        assert_eq!(polygon_area(&lot), Some(64.0));
    }

    #[test]
    fn test_withheld_when_incomplete() {
        assert_eq!(polygon_area(&ring(&[("0", "0"), ("1", "0")])), None);
        assert_eq!(polygon_area(&ring(&[("0", "0"), ("1", "x"), ("1", "1")])), None);
        assert_eq!(polygon_area(&ring(&[("0", "0"), ("", "0"), ("1", "1")])), None);
    }

    #[test]
    fn test_negative_coordinates() {
        let square = ring(&[("-1", "-1"), ("1", "-1"), ("1", "1"), ("-1", "1")]);
        assert_eq!(polygon_area(&square), Some(4.0));
    }

    #[test]
    fn test_projection_fits_and_flips() {
        let lot = ring(&[("0", "0"), ("10", "0"), ("10", "20"), ("0", "20")]);
        let view = Viewport { width: 400.0, height: 300.0, padding: 30.0 };
        let p = project(&lot, view).unwrap();

        // Height governs: 240 / 20 = 12 px per meter
        assert!((p.scale - 12.0).abs() < 1e-9);
        for pt in &p.points {
            assert!(pt.x >= view.padding - 1e-9 && pt.x <= view.width - view.padding + 1e-9);
            assert!(pt.y >= view.padding - 1e-9 && pt.y <= view.height - view.padding + 1e-9);
        }
        // Survey origin is bottom-left on screen
        assert!((p.points[0].y - 270.0).abs() < 1e-9);
        assert!((p.points[2].y - 30.0).abs() < 1e-9);
        // Centered horizontally: 120 px wide drawing in a 400 px viewport
        assert!((p.points[0].x - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_labels() {
        let lot = ring(&[("0", "0"), ("3", "0"), ("3", "4")]);
        let p = project(&lot, Viewport::default()).unwrap();
        let lengths: Vec<f64> = p.edges.iter().map(|e| e.length_m).collect();
        assert!((lengths[0] - 3.0).abs() < 1e-9);
        assert!((lengths[1] - 4.0).abs() < 1e-9);
        assert!((lengths[2] - 5.0).abs() < 1e-9);

        let mid = p.points[0].midpoint(&p.points[1]);
        assert_eq!(p.edges[0].anchor, mid);
    }

    #[test]
    fn test_degenerate_box_has_no_projection() {
        let flat = ring(&[("0", "5"), ("4", "5"), ("9", "5")]);
        assert!(project(&flat, Viewport::default()).is_none());
        let bad = ring(&[("0", "0"), ("4", "?"), ("9", "5")]);
        assert!(project(&bad, Viewport::default()).is_none());
    }

    #[test]
    fn test_svg_output() {
        let lot = ring(&[("0", "0"), ("3", "0"), ("3", "4")]);
        let svg = project(&lot, Viewport::default())
            .unwrap()
            .to_svg(|m| format!("{:.2} m", m));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("5.00 m"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }
}
