//! Drawable element definitions for the scene graph.

mod connector;
mod drawing;
mod image;
mod shape;
mod text;

pub use connector::{Connector, ConnectorStyle};
pub use drawing::Drawing;
pub use image::Image;
pub use shape::{Shape, ShapeType};
pub use text::{AdvanceEstimate, FallbackMeasure, Text, TextMeasure};

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
///
/// Opaque on the wire; freshly generated ids are UUID v4 strings.
pub type ElementId = String;

/// Generate a fresh element id.
pub fn new_element_id() -> ElementId {
    Uuid::new_v4().to_string()
}

/// A drawable unit of the scene.
///
/// Serialized flat with a `type` discriminator, matching the persisted
/// document format (`{"id": .., "type": "shape", "shapeType": .., ..}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Anchor position; meaning depends on the variant.
    pub x: f64,
    pub y: f64,
    /// Stroke/fill color as a CSS color string.
    pub color: String,
    pub stroke_width: f64,
    /// Locked elements reject updates and deletion.
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// Variant payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Drawing(Drawing),
    Shape(Shape),
    Text(Text),
    Image(Image),
    Connector(Connector),
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(position: Point, color: impl Into<String>, stroke_width: f64, kind: ElementKind) -> Self {
        Self {
            id: new_element_id(),
            x: position.x,
            y: position.y,
            color: color.into(),
            stroke_width,
            locked: false,
            kind,
        }
    }

    /// Anchor position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Short variant name, used in logs.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Drawing(_) => "drawing",
            ElementKind::Shape(_) => "shape",
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Connector(_) => "connector",
        }
    }

    pub fn as_drawing(&self) -> Option<&Drawing> {
        match &self.kind {
            ElementKind::Drawing(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.kind {
            ElementKind::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match &mut self.kind {
            ElementKind::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match &self.kind {
            ElementKind::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match &mut self.kind {
            ElementKind::Connector(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this element exposes resize handles (shapes other than
    /// line/arrow, and images).
    pub fn is_resizable(&self) -> bool {
        match &self.kind {
            ElementKind::Shape(s) => !s.shape_type.is_linear(),
            ElementKind::Image(_) => true,
            _ => false,
        }
    }

    /// Translate the element by `delta`, moving every stored coordinate.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        match &mut self.kind {
            ElementKind::Drawing(d) => d.translate(delta),
            ElementKind::Shape(s) => s.translate(delta),
            ElementKind::Connector(c) => c.translate(delta),
            ElementKind::Text(_) | ElementKind::Image(_) => {}
        }
    }

    /// Copy with a fresh id, offset by `delta` and unlocked.
    pub fn duplicate_with_offset(&self, delta: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = new_element_id();
        copy.locked = false;
        copy.translate(delta);
        copy
    }

    /// Merge `patch` into this element. Fields that do not apply to the
    /// variant are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(stroke_width) = patch.stroke_width {
            self.stroke_width = stroke_width;
        }

        match &mut self.kind {
            ElementKind::Drawing(d) => {
                if let Some(points) = &patch.points {
                    d.points = points.clone();
                }
            }
            ElementKind::Shape(s) => {
                if let Some(shape_type) = patch.shape_type {
                    s.shape_type = shape_type;
                }
                if let Some(width) = patch.width {
                    s.width = width;
                }
                if let Some(height) = patch.height {
                    s.height = height;
                }
                if patch.end_x.is_some() {
                    s.end_x = patch.end_x;
                }
                if patch.end_y.is_some() {
                    s.end_y = patch.end_y;
                }
            }
            ElementKind::Text(t) => {
                if let Some(text) = &patch.text {
                    t.text = text.clone();
                }
                if let Some(font_size) = patch.font_size {
                    t.font_size = font_size;
                }
            }
            ElementKind::Image(img) => {
                if let Some(width) = patch.width {
                    img.width = width;
                }
                if let Some(height) = patch.height {
                    img.height = height;
                }
            }
            ElementKind::Connector(c) => {
                if let Some(start) = patch.start_point {
                    c.start_point = start;
                }
                if let Some(end) = patch.end_point {
                    c.end_point = end;
                }
                if let Some(style) = patch.connector_style {
                    c.connector_style = style;
                }
                if let Some(arrow) = patch.has_end_arrow {
                    c.has_end_arrow = arrow;
                }
            }
        }
    }
}

/// Partial update for [`Element::apply_patch`].
///
/// `locked` is deliberately absent: lock state only changes through
/// the explicit toggle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<String>,
    pub stroke_width: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub shape_type: Option<ShapeType>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub connector_style: Option<ConnectorStyle>,
    pub has_end_arrow: Option<bool>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            Point::new(x, y),
            "#000000",
            2.0,
            ElementKind::Shape(Shape::new(ShapeType::Rectangle, w, h)),
        )
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(0.0, 0.0, 10.0, 10.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialized_shape_is_flat_and_tagged() {
        let el = rect(1.0, 2.0, 30.0, 40.0);
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "shape");
        assert_eq!(value["shapeType"], "rect");
        assert_eq!(value["strokeWidth"], 2.0);
        assert_eq!(value["width"], 30.0);
        assert_eq!(value["locked"], false);
    }

    #[test]
    fn test_deserialize_original_drawing_payload() {
        let json = r##"{
            "id": "abc123",
            "type": "drawing",
            "x": 0, "y": 0,
            "color": "#ff0000",
            "strokeWidth": 4,
            "points": [{"x": 0, "y": 0}, {"x": 10, "y": 5}],
            "isEraser": true
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.id, "abc123");
        assert!(!el.locked);
        let drawing = el.as_drawing().unwrap();
        assert!(drawing.is_eraser);
        assert_eq!(drawing.points.len(), 2);
    }

    #[test]
    fn test_connector_defaults_to_end_arrow() {
        let json = r##"{
            "id": "c1", "type": "connector", "x": 0, "y": 0,
            "color": "#000", "strokeWidth": 2,
            "startPoint": {"x": 0, "y": 0}, "endPoint": {"x": 5, "y": 5},
            "connectorStyle": "elbow"
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();
        let conn = el.as_connector().unwrap();
        assert!(conn.has_end_arrow);
        assert_eq!(conn.connector_style, ConnectorStyle::Elbow);
        assert!(conn.start_element_id.is_none());
    }

    #[test]
    fn test_translate_drawing_moves_points() {
        let mut el = Element::new(
            Point::ZERO,
            "#000",
            2.0,
            ElementKind::Drawing(Drawing::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)], false)),
        );
        el.translate(Vec2::new(10.0, -5.0));
        let d = el.as_drawing().unwrap();
        assert_eq!(d.points, vec![Point::new(10.0, -5.0), Point::new(14.0, -1.0)]);
    }

    #[test]
    fn test_duplicate_with_offset_unlocks() {
        let mut el = rect(5.0, 5.0, 10.0, 10.0);
        el.locked = true;
        let copy = el.duplicate_with_offset(Vec2::new(20.0, 20.0));
        assert_ne!(copy.id, el.id);
        assert!(!copy.locked);
        assert!((copy.x - 25.0).abs() < f64::EPSILON);
        assert!((copy.y - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_ignores_foreign_fields() {
        let mut el = rect(0.0, 0.0, 10.0, 10.0);
        let patch = ElementPatch {
            width: Some(50.0),
            text: Some("ignored".to_string()),
            color: Some("#00ff00".to_string()),
            ..Default::default()
        };
        el.apply_patch(&patch);
        assert_eq!(el.color, "#00ff00");
        assert!((el.as_shape().unwrap().width - 50.0).abs() < f64::EPSILON);
    }
}
