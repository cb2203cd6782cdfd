//! Renderer trait abstraction.

use infiniboard_core::canvas::Canvas;
use kurbo::{Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Nothing to render")]
    EmptyScene,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The session to render.
    pub canvas: &'a Canvas,
    /// Output size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio.
    pub scale_factor: f64,
    pub background_color: Color,
    /// Draw the background grid. Defaults to the canvas grid setting.
    pub show_grid: bool,
    /// Outline color of selected elements and resize handles.
    pub selection_color: Color,
    /// Live marquee in canvas coordinates.
    pub marquee: Option<Rect>,
    /// Draw selection outlines and handles.
    pub show_selection: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            show_grid: canvas.grid().enabled,
            selection_color: Color::from_rgba8(0, 102, 255, 255),
            marquee: None,
            show_selection: true,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn with_marquee(mut self, marquee: Option<Rect>) -> Self {
        self.marquee = marquee;
        self
    }

    /// Hide selection chrome, e.g. for exports and thumbnails.
    pub fn without_selection(mut self) -> Self {
        self.show_selection = false;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the backend's frame for `ctx`.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
