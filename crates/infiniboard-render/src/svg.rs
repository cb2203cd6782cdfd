//! SVG backend.

use crate::color::to_svg_paint;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{Blend, DisplayItem, DisplayList};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use infiniboard_core::canvas::Canvas;
use kurbo::{Affine, Size};
use std::fmt::Write as _;

/// Extent of the eraser mask backdrop in canvas units.
const MASK_EXTENT: f64 = 1.0e7;

/// Default longest side of a thumbnail in pixels.
pub const THUMBNAIL_SIZE: f64 = 200.0;
const THUMBNAIL_PADDING: f64 = 20.0;

/// Renders frames to standalone SVG documents.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn take_document(&mut self) -> String {
        std::mem::take(&mut self.document)
    }

    /// Render a display list.
    ///
    /// Eraser strokes become masks over the group of everything painted
    /// before them, so later content is unaffected.
    pub fn render_list(list: &DisplayList, scale_factor: f64) -> String {
        let mut defs = String::new();
        let mut body = String::new();
        let mut masks = 0usize;

        for (_, item) in &list.items {
            match item {
                DisplayItem::Stroke {
                    path,
                    width,
                    blend: Blend::Erase,
                    ..
                } => {
                    let id = format!("erase{masks}");
                    masks += 1;
                    let _ = write!(
                        defs,
                        r#"<mask id="{id}" maskUnits="userSpaceOnUse" x="{lo}" y="{lo}" width="{span}" height="{span}"><rect x="{lo}" y="{lo}" width="{span}" height="{span}" fill="white"/><path d="{d}" fill="none" stroke="black" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round"/></mask>"#,
                        lo = -MASK_EXTENT,
                        span = MASK_EXTENT * 2.0,
                        d = path.to_svg(),
                    );
                    body = format!(r#"<g mask="url(#{id})">{body}</g>"#);
                }
                DisplayItem::Stroke {
                    path,
                    color,
                    width,
                    dash,
                    blend: Blend::Normal,
                } => {
                    let (paint, opacity) = to_svg_paint(*color);
                    let _ = write!(
                        body,
                        r#"<path d="{}" fill="none" stroke="{paint}" stroke-opacity="{opacity}" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round""#,
                        path.to_svg()
                    );
                    if let Some(dash) = dash {
                        let _ = write!(body, r#" stroke-dasharray="{dash} {dash}""#);
                    }
                    body.push_str("/>");
                }
                DisplayItem::Fill { path, color } => {
                    let (paint, opacity) = to_svg_paint(*color);
                    let _ = write!(body, r#"<path d="{}" fill="{paint}" fill-opacity="{opacity}"/>"#, path.to_svg());
                }
                DisplayItem::Text {
                    origin,
                    text,
                    font_size,
                    color,
                } => {
                    let (paint, opacity) = to_svg_paint(*color);
                    let _ = write!(
                        body,
                        r#"<text x="{}" y="{}" font-size="{font_size}" font-family="sans-serif" fill="{paint}" fill-opacity="{opacity}" xml:space="preserve">{}</text>"#,
                        origin.x,
                        origin.y,
                        escape(text)
                    );
                }
                DisplayItem::Image { rect, data } => {
                    let _ = write!(
                        body,
                        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" href="{}"/>"#,
                        rect.x0,
                        rect.y0,
                        rect.width(),
                        rect.height(),
                        escape(data)
                    );
                }
            }
        }

        let (bg, bg_opacity) = to_svg_paint(list.background);
        let [a, b, c, d, e, f] = list.transform.as_coeffs();
        let width = list.size.width * scale_factor;
        let height = list.size.height * scale_factor;
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {vw} {vh}">"#,
                r#"<defs>{defs}</defs>"#,
                r#"<rect width="100%" height="100%" fill="{bg}" fill-opacity="{bg_opacity}"/>"#,
                r#"<g transform="matrix({a} {b} {c} {d} {e} {f})">{body}</g>"#,
                "</svg>"
            ),
            width = width,
            height = height,
            vw = list.size.width,
            vh = list.size.height,
            defs = defs,
            bg = bg,
            bg_opacity = bg_opacity,
            a = a,
            b = b,
            c = c,
            d = d,
            e = e,
            f = f,
            body = body,
        )
    }

    /// Render the scene framed on its content, scaled so the longest side
    /// is at most `max_size` pixels.
    pub fn render_fitted(canvas: &Canvas, max_size: f64) -> RenderResult<String> {
        let content = canvas.geometry().content_bounds().ok_or(RendererError::EmptyScene)?;
        let framed = content.inflate(THUMBNAIL_PADDING, THUMBNAIL_PADDING);
        let longest = framed.width().max(framed.height());
        if longest <= 0.0 || max_size <= 0.0 {
            return Err(RendererError::RenderFailed("degenerate content bounds".to_string()));
        }
        let scale = max_size / longest;
        let size = Size::new(framed.width() * scale, framed.height() * scale);

        let ctx = RenderContext::new(canvas, size).with_grid(false).without_selection();
        let mut list = DisplayList::build(&ctx);
        list.transform = Affine::scale(scale) * Affine::translate(-framed.origin().to_vec2());
        Ok(Self::render_list(&list, 1.0))
    }

    /// Thumbnail as a `data:image/svg+xml;base64,` URI.
    pub fn thumbnail(canvas: &Canvas, max_size: f64) -> RenderResult<String> {
        let svg = Self::render_fitted(canvas, max_size)?;
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let list = DisplayList::build(ctx);
        self.document = Self::render_list(&list, ctx.scale_factor);
        log::debug!("built svg frame with {} items", list.items.len());
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use infiniboard_core::elements::{Drawing, Element, ElementKind, Shape, ShapeType, Text};
    use kurbo::Point;

    fn render(canvas: &Canvas) -> String {
        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&RenderContext::new(canvas, Size::new(800.0, 600.0)));
        renderer.take_document()
    }

    fn drawing(points: Vec<Point>, eraser: bool) -> Element {
        Element::new(points[0], "#000000", 2.0, ElementKind::Drawing(Drawing::new(points, eraser)))
    }

    #[test]
    fn test_empty_document() {
        let svg = render(&Canvas::new());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="800""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = Canvas::new();
        canvas.add_element(Element::new(
            Point::new(10.0, 20.0),
            "#112233",
            2.0,
            ElementKind::Text(Text::new("a < b & \"c\"", 16.0)),
        ));
        let svg = render(&canvas);
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(svg.contains(r##"fill="#112233""##));
    }

    #[test]
    fn test_eraser_masks_only_earlier_content() {
        let mut canvas = Canvas::new();
        canvas.set_grid_settings(infiniboard_core::snap::GridSettingsPatch {
            enabled: Some(false),
            ..Default::default()
        });
        canvas.add_element(drawing(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], false));
        canvas.add_element(drawing(vec![Point::new(5.0, -5.0), Point::new(5.0, 5.0)], true));
        canvas.add_element(drawing(vec![Point::new(0.0, 20.0), Point::new(10.0, 20.0)], false));
        let svg = render(&canvas);
        let before = canvas.elements()[0].as_drawing().unwrap().to_path().to_svg();
        let after = canvas.elements()[2].as_drawing().unwrap().to_path().to_svg();

        assert_eq!(svg.matches("<mask ").count(), 1);
        let group_start = svg.find(r#"<g mask="url(#erase0)">"#).unwrap();
        let group_end = group_start + svg[group_start..].find("</g>").unwrap();
        let masked = &svg[group_start..group_end];
        assert!(masked.contains(&before));
        assert!(!masked.contains(&after));
        assert!(svg[group_end..].contains(&after));
    }

    #[test]
    fn test_thumbnail_data_uri() {
        let mut canvas = Canvas::new();
        assert!(matches!(SvgRenderer::thumbnail(&canvas, THUMBNAIL_SIZE), Err(RendererError::EmptyScene)));

        canvas.add_element(Element::new(
            Point::new(0.0, 0.0),
            "#000000",
            2.0,
            ElementKind::Shape(Shape::new(ShapeType::Ellipse, 360.0, 160.0)),
        ));
        let uri = SvgRenderer::thumbnail(&canvas, THUMBNAIL_SIZE).unwrap();
        let payload = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let svg = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
        // 400 x 200 framed content scaled to 200 wide.
        assert!(svg.contains(r#"width="200" height="100""#));
    }
}
