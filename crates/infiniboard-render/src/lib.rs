//! Infiniboard Render Library
//!
//! Builds a backend-neutral display list from a canvas session and renders
//! it to SVG for export and thumbnails.

pub mod color;
mod renderer;
pub mod scene;
mod svg;

pub use color::parse_color;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{Blend, DisplayItem, DisplayList, Layer};
pub use svg::{SvgRenderer, THUMBNAIL_SIZE};
