//! Connectors between elements.

use super::ElementId;
use super::shape::append_arrow_head;
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Routing style of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    #[default]
    Straight,
    /// Horizontal, vertical, horizontal with the bend at the midpoint.
    Elbow,
    Curved,
}

fn default_true() -> bool {
    true
}

/// A line between two points, each optionally bound to another element.
///
/// Bindings are weak: they are looked up by id when the connector is drawn
/// and fall back to the stored point when the target no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub start_point: Point,
    pub end_point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_element_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_element_id: Option<ElementId>,
    #[serde(default)]
    pub connector_style: ConnectorStyle,
    #[serde(default = "default_true")]
    pub has_end_arrow: bool,
}

impl Connector {
    /// Connector with both ends at `point`.
    pub fn new(point: Point, style: ConnectorStyle) -> Self {
        Self {
            start_point: point,
            end_point: point,
            start_element_id: None,
            end_element_id: None,
            connector_style: style,
            has_end_arrow: true,
        }
    }

    pub fn with_start_element(mut self, id: Option<ElementId>) -> Self {
        self.start_element_id = id;
        self
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.start_point += delta;
        self.end_point += delta;
    }

    /// Path between already-resolved endpoints.
    pub fn to_path(&self, start: Point, end: Point) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(start);
        let mid_x = (start.x + end.x) / 2.0;

        // Direction the arrow head points along.
        let approach = match self.connector_style {
            ConnectorStyle::Straight => {
                path.line_to(end);
                start
            }
            ConnectorStyle::Elbow => {
                let bend = Point::new(mid_x, end.y);
                path.line_to(Point::new(mid_x, start.y));
                path.line_to(bend);
                path.line_to(end);
                if (bend - end).hypot() > f64::EPSILON { bend } else { Point::new(mid_x, start.y) }
            }
            ConnectorStyle::Curved => {
                let c2 = Point::new(mid_x, end.y);
                path.curve_to(Point::new(mid_x, start.y), c2, end);
                if (c2 - end).hypot() > f64::EPSILON { c2 } else { start }
            }
        };

        if self.has_end_arrow && (end - start).hypot() > f64::EPSILON {
            append_arrow_head(&mut path, approach, end);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn test_new_connector_is_unbound_with_arrow() {
        let c = Connector::new(Point::new(3.0, 4.0), ConnectorStyle::Straight);
        assert_eq!(c.start_point, c.end_point);
        assert!(c.has_end_arrow);
        assert!(c.start_element_id.is_none() && c.end_element_id.is_none());
    }

    #[test]
    fn test_elbow_route_has_two_bends() {
        let c = Connector::new(Point::ZERO, ConnectorStyle::Elbow);
        let mut c = c;
        c.has_end_arrow = false;
        let path = c.to_path(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        let line_tos: Vec<Point> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(
            line_tos,
            vec![Point::new(50.0, 0.0), Point::new(50.0, 50.0), Point::new(100.0, 50.0)]
        );
    }

    #[test]
    fn test_zero_length_connector_has_no_arrow_head() {
        let c = Connector::new(Point::new(5.0, 5.0), ConnectorStyle::Straight);
        let path = c.to_path(c.start_point, c.end_point);
        assert_eq!(path.elements().len(), 2);
    }
}
