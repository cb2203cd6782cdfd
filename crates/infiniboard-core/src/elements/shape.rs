//! Geometric shapes.

use kurbo::{Arc, BezPath, Ellipse, Point, Rect, RoundedRect, Shape as _, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Path flattening tolerance used when converting curves to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Arrow head length in canvas units.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;

/// Closed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    #[default]
    #[serde(rename = "rect")]
    Rectangle,
    #[serde(rename = "roundedRect")]
    RoundedRectangle,
    #[serde(rename = "circle")]
    Ellipse,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
    Parallelogram,
    Cylinder,
    Document,
    Cloud,
    Callout,
    Line,
    Arrow,
    Plus,
    Cross,
}

impl ShapeType {
    /// Every shape kind, in toolbar order.
    pub const ALL: [ShapeType; 17] = [
        ShapeType::Rectangle,
        ShapeType::RoundedRectangle,
        ShapeType::Ellipse,
        ShapeType::Triangle,
        ShapeType::Diamond,
        ShapeType::Pentagon,
        ShapeType::Hexagon,
        ShapeType::Star,
        ShapeType::Parallelogram,
        ShapeType::Cylinder,
        ShapeType::Document,
        ShapeType::Cloud,
        ShapeType::Callout,
        ShapeType::Line,
        ShapeType::Arrow,
        ShapeType::Plus,
        ShapeType::Cross,
    ];

    /// Line and arrow are defined by two endpoints rather than a box.
    pub fn is_linear(self) -> bool {
        matches!(self, ShapeType::Line | ShapeType::Arrow)
    }

    /// Display name for UI.
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "Rectangle",
            ShapeType::RoundedRectangle => "Rounded Rectangle",
            ShapeType::Ellipse => "Ellipse",
            ShapeType::Triangle => "Triangle",
            ShapeType::Diamond => "Diamond",
            ShapeType::Pentagon => "Pentagon",
            ShapeType::Hexagon => "Hexagon",
            ShapeType::Star => "Star",
            ShapeType::Parallelogram => "Parallelogram",
            ShapeType::Cylinder => "Cylinder",
            ShapeType::Document => "Document",
            ShapeType::Cloud => "Cloud",
            ShapeType::Callout => "Callout",
            ShapeType::Line => "Line",
            ShapeType::Arrow => "Arrow",
            ShapeType::Plus => "Plus",
            ShapeType::Cross => "Cross",
        }
    }
}

/// A shape anchored at its element's `x`/`y`.
///
/// `width`/`height` are signed: negative values extend left/up from the
/// anchor. Line and arrow carry an explicit end point instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub shape_type: ShapeType,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
}

impl Shape {
    pub fn new(shape_type: ShapeType, width: f64, height: f64) -> Self {
        Self {
            shape_type,
            width,
            height,
            end_x: None,
            end_y: None,
        }
    }

    /// End point of a line/arrow, falling back to `anchor + size`.
    pub fn end_point(&self, anchor: Point) -> Point {
        Point::new(
            self.end_x.unwrap_or(anchor.x + self.width),
            self.end_y.unwrap_or(anchor.y + self.height),
        )
    }

    /// Set the end point of a line/arrow and keep the size in sync.
    pub fn set_end_point(&mut self, anchor: Point, end: Point) {
        self.width = end.x - anchor.x;
        self.height = end.y - anchor.y;
        self.end_x = Some(end.x);
        self.end_y = Some(end.y);
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        if let Some(end_x) = &mut self.end_x {
            *end_x += delta.x;
        }
        if let Some(end_y) = &mut self.end_y {
            *end_y += delta.y;
        }
    }

    /// Outline path in canvas space for a shape anchored at `anchor`.
    pub fn to_path(&self, anchor: Point) -> BezPath {
        let x = anchor.x;
        let y = anchor.y;
        let w = self.width;
        let h = self.height;
        // Fractional coordinates inside the (signed) box.
        let at = |fx: f64, fy: f64| Point::new(x + w * fx, y + h * fy);
        let frame = Rect::new(x, y, x + w, y + h).abs();

        match self.shape_type {
            ShapeType::Rectangle => polygon(&[at(0.0, 0.0), at(1.0, 0.0), at(1.0, 1.0), at(0.0, 1.0)]),
            ShapeType::RoundedRectangle => {
                let radius = frame.width().min(frame.height()) * 0.15;
                RoundedRect::from_rect(frame, radius).to_path(PATH_TOLERANCE)
            }
            ShapeType::Ellipse => Ellipse::from_rect(frame).to_path(PATH_TOLERANCE),
            ShapeType::Triangle => polygon(&[at(0.5, 0.0), at(0.0, 1.0), at(1.0, 1.0)]),
            ShapeType::Diamond => polygon(&[at(0.5, 0.0), at(1.0, 0.5), at(0.5, 1.0), at(0.0, 0.5)]),
            ShapeType::Pentagon => regular_polygon(frame, 5),
            ShapeType::Hexagon => regular_polygon(frame, 6),
            ShapeType::Star => star(frame),
            ShapeType::Parallelogram => polygon(&[at(0.2, 0.0), at(1.0, 0.0), at(0.8, 1.0), at(0.0, 1.0)]),
            ShapeType::Cylinder => cylinder(frame),
            ShapeType::Document => {
                let mut path = BezPath::new();
                path.move_to(at(0.0, 0.0));
                path.line_to(at(1.0, 0.0));
                path.line_to(at(1.0, 0.85));
                path.curve_to(at(0.75, 0.7), at(0.25, 1.0), at(0.0, 0.85));
                path.close_path();
                path
            }
            ShapeType::Cloud => cloud(frame),
            ShapeType::Callout => polygon(&[
                at(0.0, 0.0),
                at(1.0, 0.0),
                at(1.0, 0.75),
                at(0.4, 0.75),
                at(0.15, 1.0),
                at(0.25, 0.75),
                at(0.0, 0.75),
            ]),
            ShapeType::Line => {
                let mut path = BezPath::new();
                path.move_to(anchor);
                path.line_to(self.end_point(anchor));
                path
            }
            ShapeType::Arrow => {
                let end = self.end_point(anchor);
                let mut path = BezPath::new();
                path.move_to(anchor);
                path.line_to(end);
                append_arrow_head(&mut path, anchor, end);
                path
            }
            ShapeType::Plus => {
                let (a, b) = (1.0 / 3.0, 2.0 / 3.0);
                polygon(&[
                    at(a, 0.0),
                    at(b, 0.0),
                    at(b, a),
                    at(1.0, a),
                    at(1.0, b),
                    at(b, b),
                    at(b, 1.0),
                    at(a, 1.0),
                    at(a, b),
                    at(0.0, b),
                    at(0.0, a),
                    at(a, a),
                ])
            }
            ShapeType::Cross => {
                let mut path = BezPath::new();
                path.move_to(at(0.0, 0.0));
                path.line_to(at(1.0, 1.0));
                path.move_to(at(1.0, 0.0));
                path.line_to(at(0.0, 1.0));
                path
            }
        }
    }
}

/// Append the two barbs of an arrow head pointing at `tip`.
pub fn append_arrow_head(path: &mut BezPath, from: Point, tip: Point) {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    for side in [-1.0, 1.0] {
        let barb = angle + side * PI / 6.0;
        path.move_to(tip);
        path.line_to(Point::new(
            tip.x - ARROW_HEAD_LENGTH * barb.cos(),
            tip.y - ARROW_HEAD_LENGTH * barb.sin(),
        ));
    }
}

fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path.close_path();
    }
    path
}

/// Regular polygon inscribed in the frame's ellipse, first vertex on top.
fn regular_polygon(frame: Rect, sides: usize) -> BezPath {
    let center = frame.center();
    let radii = Vec2::new(frame.width() / 2.0, frame.height() / 2.0);
    let vertices: Vec<Point> = (0..sides)
        .map(|i| {
            let theta = -PI / 2.0 + 2.0 * PI * i as f64 / sides as f64;
            Point::new(center.x + radii.x * theta.cos(), center.y + radii.y * theta.sin())
        })
        .collect();
    polygon(&vertices)
}

/// Five-pointed star with inner radius = outer / 2.5.
fn star(frame: Rect) -> BezPath {
    let center = frame.center();
    let outer = frame.width().min(frame.height()) / 2.0;
    let inner = outer / 2.5;
    let step = PI / 5.0;
    let vertices: Vec<Point> = (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let theta = 1.5 * PI + step * i as f64;
            Point::new(center.x + theta.cos() * radius, center.y + theta.sin() * radius)
        })
        .collect();
    polygon(&vertices)
}

fn cylinder(frame: Rect) -> BezPath {
    let rx = frame.width() / 2.0;
    let ry = frame.height() * 0.1;
    let cx = frame.center().x;
    let top = Point::new(cx, frame.y0 + ry);
    let bottom = Point::new(cx, frame.y1 - ry);

    let mut path = Ellipse::new(top, Vec2::new(rx, ry), 0.0).to_path(PATH_TOLERANCE);
    path.move_to(Point::new(frame.x0, top.y));
    path.line_to(Point::new(frame.x0, bottom.y));
    let base = Arc {
        center: bottom,
        radii: Vec2::new(rx, ry),
        start_angle: PI,
        sweep_angle: -PI,
        x_rotation: 0.0,
    };
    path.extend(base.append_iter(PATH_TOLERANCE));
    path.line_to(Point::new(frame.x1, top.y));
    path
}

/// Eight bumps around the frame's ellipse.
fn cloud(frame: Rect) -> BezPath {
    const LOBES: usize = 8;
    let center = frame.center();
    let rx = frame.width() / 2.0;
    let ry = frame.height() / 2.0;
    let on_ellipse = |theta: f64, scale: f64| {
        Point::new(center.x + rx * scale * theta.cos(), center.y + ry * scale * theta.sin())
    };

    let mut path = BezPath::new();
    path.move_to(on_ellipse(0.0, 0.85));
    for i in 0..LOBES {
        let start = 2.0 * PI * i as f64 / LOBES as f64;
        let end = 2.0 * PI * (i + 1) as f64 / LOBES as f64;
        let mid = (start + end) / 2.0;
        path.quad_to(on_ellipse(mid, 1.25), on_ellipse(end, 0.85));
    }
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let names: Vec<String> = [ShapeType::Rectangle, ShapeType::RoundedRectangle, ShapeType::Ellipse, ShapeType::Parallelogram]
            .iter()
            .map(|t| serde_json::to_string(t).unwrap())
            .collect();
        assert_eq!(names, vec!["\"rect\"", "\"roundedRect\"", "\"circle\"", "\"parallelogram\""]);
    }

    #[test]
    fn test_linear_types() {
        let linear: Vec<_> = ShapeType::ALL.iter().filter(|t| t.is_linear()).collect();
        assert_eq!(linear, vec![&ShapeType::Line, &ShapeType::Arrow]);
    }

    #[test]
    fn test_end_point_falls_back_to_size() {
        let shape = Shape::new(ShapeType::Line, 30.0, -10.0);
        assert_eq!(shape.end_point(Point::new(5.0, 5.0)), Point::new(35.0, -5.0));
    }

    #[test]
    fn test_set_end_point_syncs_size() {
        let mut shape = Shape::new(ShapeType::Arrow, 0.0, 0.0);
        shape.set_end_point(Point::new(10.0, 10.0), Point::new(4.0, 30.0));
        assert!((shape.width + 6.0).abs() < f64::EPSILON);
        assert!((shape.height - 20.0).abs() < f64::EPSILON);
        assert_eq!(shape.end_x, Some(4.0));
    }

    #[test]
    fn test_every_shape_has_a_path() {
        for shape_type in ShapeType::ALL {
            let shape = Shape::new(shape_type, 40.0, 30.0);
            let path = shape.to_path(Point::new(10.0, 10.0));
            assert!(!path.elements().is_empty(), "{shape_type:?} produced an empty path");
        }
    }

    #[test]
    fn test_negative_rectangle_path_stays_inside_box() {
        let shape = Shape::new(ShapeType::Rectangle, -20.0, -10.0);
        let bbox = shape.to_path(Point::new(50.0, 50.0)).bounding_box();
        assert_eq!(bbox, Rect::new(30.0, 40.0, 50.0, 50.0));
    }
}
