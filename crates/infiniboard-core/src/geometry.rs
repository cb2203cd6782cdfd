//! Bounds computation and hit-testing.

use crate::constants::{CONNECTOR_MIN_EXTENT, HIT_TOLERANCE};
use crate::elements::{Element, ElementId, ElementKind, TextMeasure};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in canvas space.
///
/// Shapes report their signed `width`/`height` unchanged, so a box may
/// have negative extents. Containment and intersection normalize first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Zero-size box at `point`.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Normalized rectangle (non-negative extents).
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment after normalizing.
    pub fn contains(&self, point: Point) -> bool {
        let r = self.to_rect();
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }

    /// Inclusive overlap test after normalizing both boxes.
    pub fn intersects(&self, other: &Bounds) -> bool {
        let a = self.to_rect();
        let b = other.to_rect();
        a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
    }

    /// Normalized box grown by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Bounds {
        Bounds::from_rect(self.to_rect().inflate(margin, margin))
    }
}

/// Bounds of an element without resolving connector bindings.
pub fn bounds_of(element: &Element, measure: &dyn TextMeasure) -> Bounds {
    match &element.kind {
        ElementKind::Drawing(d) => d
            .point_bounds()
            .map(Bounds::from_rect)
            .unwrap_or_else(|| Bounds::at(element.position())),
        ElementKind::Shape(s) if s.shape_type.is_linear() => {
            let end = s.end_point(element.position());
            Bounds::from_rect(Rect::from_points(element.position(), end))
        }
        ElementKind::Shape(s) => Bounds::new(element.x, element.y, s.width, s.height),
        ElementKind::Text(t) => Bounds::new(
            element.x,
            element.y - t.font_size,
            measure.measure_width(&t.text, t.font_size),
            t.font_size,
        ),
        ElementKind::Image(img) => Bounds::new(element.x, element.y, img.width, img.height),
        ElementKind::Connector(c) => connector_bounds(c.start_point, c.end_point),
    }
}

/// Box over two endpoints with a minimum extent per axis, centred on
/// the endpoints when the floor applies.
fn connector_bounds(start: Point, end: Point) -> Bounds {
    let rect = Rect::from_points(start, end);
    let center = rect.center();
    let width = rect.width().max(CONNECTOR_MIN_EXTENT);
    let height = rect.height().max(CONNECTOR_MIN_EXTENT);
    Bounds::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

/// Geometry queries against a live element collection.
///
/// Connector bindings resolve one level deep: a connector bound to another
/// connector anchors on that connector's stored endpoints.
#[derive(Clone, Copy)]
pub struct SceneGeometry<'a> {
    elements: &'a [Element],
    measure: &'a dyn TextMeasure,
}

impl<'a> SceneGeometry<'a> {
    pub fn new(elements: &'a [Element], measure: &'a dyn TextMeasure) -> Self {
        Self { elements, measure }
    }

    fn find(&self, id: &str) -> Option<&'a Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Resolve a possibly-bound endpoint: the bound element's bounds center,
    /// or `stored` when unbound or dangling.
    pub fn resolve_endpoint(&self, stored: Point, binding: Option<&ElementId>) -> Point {
        binding
            .and_then(|id| self.find(id))
            .map(|target| bounds_of(target, self.measure).center())
            .unwrap_or(stored)
    }

    /// Effective endpoints of a connector element; `None` for other variants.
    pub fn connector_endpoints(&self, element: &Element) -> Option<(Point, Point)> {
        let c = element.as_connector()?;
        Some((
            self.resolve_endpoint(c.start_point, c.start_element_id.as_ref()),
            self.resolve_endpoint(c.end_point, c.end_element_id.as_ref()),
        ))
    }

    pub fn bounds_of(&self, element: &Element) -> Bounds {
        match self.connector_endpoints(element) {
            Some((start, end)) => connector_bounds(start, end),
            None => bounds_of(element, self.measure),
        }
    }

    /// Topmost element whose bounds, grown by the hit tolerance, contain
    /// `point`.
    pub fn hit_test(&self, point: Point) -> Option<&'a Element> {
        self.elements
            .iter()
            .rev()
            .find(|el| self.bounds_of(el).inflate(HIT_TOLERANCE).contains(point))
    }

    /// Ids of every element whose bounds intersect `area`, in z-order.
    pub fn intersecting(&self, area: &Bounds) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| self.bounds_of(el).intersects(area))
            .map(|el| el.id.clone())
            .collect()
    }

    /// Union of all element bounds, or `None` when empty.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .map(|el| self.bounds_of(el).to_rect())
            .reduce(|acc, r| acc.union(r))
    }
}

/// Topmost element under `point`.
pub fn hit_test<'a>(elements: &'a [Element], point: Point, measure: &'a dyn TextMeasure) -> Option<&'a Element> {
    SceneGeometry::new(elements, measure).hit_test(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Connector, ConnectorStyle, Drawing, FallbackMeasure, Shape, ShapeType, Text};

    fn shape(shape_type: ShapeType, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(Point::new(x, y), "#000", 2.0, ElementKind::Shape(Shape::new(shape_type, w, h)))
    }

    fn drawing(points: Vec<Point>) -> Element {
        Element::new(Point::ZERO, "#000", 2.0, ElementKind::Drawing(Drawing::new(points, false)))
    }

    #[test]
    fn test_drawing_bounds() {
        let el = drawing(vec![Point::new(10.0, 20.0), Point::new(-5.0, 40.0)]);
        assert_eq!(bounds_of(&el, &FallbackMeasure), Bounds::new(-5.0, 20.0, 15.0, 20.0));
    }

    #[test]
    fn test_empty_drawing_bounds_at_anchor() {
        let mut el = drawing(vec![]);
        el.x = 7.0;
        el.y = 9.0;
        assert_eq!(bounds_of(&el, &FallbackMeasure), Bounds::new(7.0, 9.0, 0.0, 0.0));
    }

    #[test]
    fn test_shape_bounds_keep_sign() {
        let el = shape(ShapeType::Rectangle, 100.0, 100.0, -40.0, -20.0);
        let b = bounds_of(&el, &FallbackMeasure);
        assert_eq!(b, Bounds::new(100.0, 100.0, -40.0, -20.0));
        assert!(b.contains(Point::new(80.0, 90.0)));
    }

    #[test]
    fn test_line_bounds_normalized() {
        let mut el = shape(ShapeType::Line, 50.0, 50.0, 0.0, 0.0);
        let anchor = el.position();
        el.as_shape_mut().unwrap().set_end_point(anchor, Point::new(10.0, 80.0));
        assert_eq!(bounds_of(&el, &FallbackMeasure), Bounds::new(10.0, 50.0, 40.0, 30.0));
    }

    #[test]
    fn test_text_bounds_use_baseline() {
        let el = Element::new(Point::new(10.0, 50.0), "#000", 2.0, ElementKind::Text(Text::new("hi", 16.0)));
        assert_eq!(bounds_of(&el, &FallbackMeasure), Bounds::new(10.0, 34.0, 100.0, 16.0));
    }

    #[test]
    fn test_connector_bounds_floor() {
        let el = Element::new(
            Point::new(5.0, 5.0),
            "#000",
            2.0,
            ElementKind::Connector(Connector::new(Point::new(5.0, 5.0), ConnectorStyle::Straight)),
        );
        let b = bounds_of(&el, &FallbackMeasure);
        assert!((b.width - CONNECTOR_MIN_EXTENT).abs() < f64::EPSILON);
        assert!((b.height - CONNECTOR_MIN_EXTENT).abs() < f64::EPSILON);
        assert_eq!(b.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let elements = vec![
            drawing(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]),
            shape(ShapeType::Rectangle, 0.0, 0.0, 50.0, 50.0),
        ];
        let hit = hit_test(&elements, Point::new(5.0, 5.0), &FallbackMeasure).unwrap();
        assert_eq!(hit.id, elements[1].id);
    }

    #[test]
    fn test_hit_test_tolerance() {
        let elements = vec![shape(ShapeType::Rectangle, 0.0, 0.0, 10.0, 10.0)];
        assert!(hit_test(&elements, Point::new(15.0, 15.0), &FallbackMeasure).is_some());
        assert!(hit_test(&elements, Point::new(15.1, 5.0), &FallbackMeasure).is_none());
    }

    #[test]
    fn test_connector_resolves_binding_and_falls_back() {
        let target = shape(ShapeType::Rectangle, 100.0, 100.0, 50.0, 50.0);
        let conn = Connector::new(Point::ZERO, ConnectorStyle::Straight).with_start_element(Some(target.id.clone()));
        let conn = Element::new(Point::ZERO, "#000", 2.0, ElementKind::Connector(conn));

        let live = vec![target, conn.clone()];
        let geometry = SceneGeometry::new(&live, &FallbackMeasure);
        let (start, _) = geometry.connector_endpoints(&conn).unwrap();
        assert_eq!(start, Point::new(125.0, 125.0));

        let dangling = vec![conn.clone()];
        let geometry = SceneGeometry::new(&dangling, &FallbackMeasure);
        let (start, _) = geometry.connector_endpoints(&conn).unwrap();
        assert_eq!(start, Point::ZERO);
    }

    #[test]
    fn test_intersecting_normalizes_marquee() {
        let elements = vec![
            shape(ShapeType::Rectangle, 0.0, 0.0, 10.0, 10.0),
            shape(ShapeType::Rectangle, 100.0, 100.0, 10.0, 10.0),
        ];
        let geometry = SceneGeometry::new(&elements, &FallbackMeasure);
        let marquee = Bounds::new(20.0, 20.0, -15.0, -15.0);
        assert_eq!(geometry.intersecting(&marquee), vec![elements[0].id.clone()]);
    }

    #[test]
    fn test_content_bounds_union() {
        let elements = vec![
            shape(ShapeType::Rectangle, 0.0, 0.0, 10.0, 10.0),
            shape(ShapeType::Ellipse, 90.0, 40.0, 10.0, 20.0),
        ];
        let geometry = SceneGeometry::new(&elements, &FallbackMeasure);
        assert_eq!(geometry.content_bounds(), Some(Rect::new(0.0, 0.0, 100.0, 60.0)));
        assert!(SceneGeometry::new(&[], &FallbackMeasure).content_bounds().is_none());
    }
}
