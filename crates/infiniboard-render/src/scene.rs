//! Backend-neutral display list.
//!
//! Everything is expressed in canvas coordinates; `transform` maps them to
//! the output surface.

use crate::color::color_or_black;
use crate::renderer::RenderContext;
use infiniboard_core::elements::{Element, ElementKind};
use infiniboard_core::geometry::SceneGeometry;
use infiniboard_core::selection::{ResizeHandle, handle_rect};
use kurbo::{Affine, BezPath, Point, Rect, Shape as _, Size};
use peniko::Color;

/// Padding between an element and its selection outline.
pub const SELECTION_PADDING: f64 = 5.0;
/// Dash and gap length of the selection outline.
pub const SELECTION_DASH: f64 = 5.0;
const SELECTION_STROKE: f64 = 2.0;
const GRID_STROKE: f64 = 0.5;
/// Grids denser than this many pixels per cell are not drawn.
const MIN_GRID_SPACING_PX: f64 = 2.0;

/// How a stroke combines with what is already painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    /// Clears everything painted before it (destination-out).
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Grid,
    Content,
    Overlay,
}

#[derive(Debug, Clone)]
pub enum DisplayItem {
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        dash: Option<f64>,
        blend: Blend,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
    /// Text with its baseline starting at `origin`.
    Text {
        origin: Point,
        text: String,
        font_size: f64,
        color: Color,
    },
    Image {
        rect: Rect,
        data: String,
    },
}

/// Ordered drawing commands for one frame.
#[derive(Debug, Clone)]
pub struct DisplayList {
    pub size: Size,
    pub transform: Affine,
    pub background: Color,
    pub items: Vec<(Layer, DisplayItem)>,
}

impl DisplayList {
    pub fn new(size: Size, transform: Affine, background: Color) -> Self {
        Self {
            size,
            transform,
            background,
            items: Vec::new(),
        }
    }

    /// Build the full frame for `ctx`: grid, elements in z-order, the
    /// in-progress element, then selection chrome and the marquee.
    pub fn build(ctx: &RenderContext) -> Self {
        let canvas = ctx.canvas;
        let mut list = Self::new(ctx.viewport_size, canvas.viewport.transform(), ctx.background_color);
        if ctx.show_grid {
            list.push_grid(canvas.grid().size);
        }

        let geometry = canvas.geometry();
        for element in canvas.elements() {
            list.push_element(element, &geometry);
        }
        if let Some(element) = canvas.current_element() {
            list.push_element(element, &geometry);
        }

        if ctx.show_selection {
            let zoom = canvas.viewport.zoom;
            for element in canvas.selected_elements() {
                let bounds = geometry.bounds_of(element).to_rect();
                list.push_selection_outline(bounds, ctx.selection_color);
            }
            if let [id] = canvas.selection() {
                if let Some(element) = canvas.get_element(id).filter(|el| el.is_resizable() && !el.locked) {
                    let bounds = geometry.bounds_of(element).to_rect();
                    list.push_handles(bounds, zoom, ctx.selection_color);
                }
            }
        }
        if let Some(marquee) = ctx.marquee {
            list.push_marquee(marquee.abs(), ctx.selection_color, canvas.viewport.zoom);
        }
        list
    }

    pub fn push(&mut self, layer: Layer, item: DisplayItem) {
        self.items.push((layer, item));
    }

    /// Canvas-space rectangle visible on the output surface.
    pub fn visible_rect(&self) -> Rect {
        let inverse = self.transform.inverse();
        Rect::from_points(inverse * Point::ZERO, inverse * Point::new(self.size.width, self.size.height))
    }

    fn push_grid(&mut self, grid_size: f64) {
        let on_screen = grid_size * self.transform.as_coeffs()[0].abs();
        if grid_size <= 0.0 || on_screen < MIN_GRID_SPACING_PX {
            return;
        }
        let visible = self.visible_rect();
        let start_x = (visible.x0 / grid_size).floor() * grid_size - grid_size;
        let start_y = (visible.y0 / grid_size).floor() * grid_size - grid_size;
        let end_x = (visible.x1 / grid_size).ceil() * grid_size + grid_size;
        let end_y = (visible.y1 / grid_size).ceil() * grid_size + grid_size;

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += grid_size;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += grid_size;
        }
        self.push(
            Layer::Grid,
            DisplayItem::Stroke {
                path,
                color: Color::from_rgba8(224, 224, 224, 255),
                width: GRID_STROKE,
                dash: None,
                blend: Blend::Normal,
            },
        );
    }

    fn push_element(&mut self, element: &Element, geometry: &SceneGeometry<'_>) {
        let color = color_or_black(&element.color);
        let stroke = |path: BezPath, blend: Blend| DisplayItem::Stroke {
            path,
            color,
            width: element.stroke_width,
            dash: None,
            blend,
        };
        let item = match &element.kind {
            ElementKind::Drawing(d) => {
                if !d.is_renderable() {
                    return;
                }
                let blend = if d.is_eraser { Blend::Erase } else { Blend::Normal };
                stroke(d.to_path(), blend)
            }
            ElementKind::Shape(s) => stroke(s.to_path(element.position()), Blend::Normal),
            ElementKind::Connector(c) => {
                let Some((start, end)) = geometry.connector_endpoints(element) else {
                    return;
                };
                stroke(c.to_path(start, end), Blend::Normal)
            }
            ElementKind::Text(t) => DisplayItem::Text {
                origin: element.position(),
                text: t.text.clone(),
                font_size: t.font_size,
                color,
            },
            ElementKind::Image(img) => DisplayItem::Image {
                rect: Rect::from_origin_size(element.position(), (img.width, img.height)).abs(),
                data: img.image_data.clone(),
            },
        };
        self.push(Layer::Content, item);
    }

    fn push_selection_outline(&mut self, bounds: Rect, color: Color) {
        self.push(
            Layer::Overlay,
            DisplayItem::Stroke {
                path: bounds.inflate(SELECTION_PADDING, SELECTION_PADDING).to_path(0.1),
                color,
                width: SELECTION_STROKE,
                dash: Some(SELECTION_DASH),
                blend: Blend::Normal,
            },
        );
    }

    fn push_handles(&mut self, bounds: Rect, zoom: f64, color: Color) {
        for handle in ResizeHandle::ALL {
            let path = handle_rect(handle, bounds, zoom).to_path(0.1);
            self.push(
                Layer::Overlay,
                DisplayItem::Fill {
                    path: path.clone(),
                    color: Color::WHITE,
                },
            );
            self.push(
                Layer::Overlay,
                DisplayItem::Stroke {
                    path,
                    color,
                    width: 1.0 / zoom,
                    dash: None,
                    blend: Blend::Normal,
                },
            );
        }
    }

    fn push_marquee(&mut self, rect: Rect, color: Color, zoom: f64) {
        let path = rect.to_path(0.1);
        self.push(
            Layer::Overlay,
            DisplayItem::Fill {
                path: path.clone(),
                color: Color::from_rgba8(59, 130, 246, 25),
            },
        );
        self.push(
            Layer::Overlay,
            DisplayItem::Stroke {
                path,
                color,
                width: 1.0 / zoom,
                dash: Some(4.0 / zoom),
                blend: Blend::Normal,
            },
        );
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.items.iter().filter(|(l, _)| *l == layer).count()
    }
}
