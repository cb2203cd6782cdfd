//! Tuning constants shared by the scene store and the interaction engine.

/// Maximum number of entries kept in the undo log.
pub const HISTORY_CAPACITY: usize = 50;

/// Offset applied to pasted and duplicated elements (both axes).
pub const PASTE_OFFSET: f64 = 20.0;

/// Margin added around element bounds when hit-testing.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Minimum per-axis extent of a connector's bounding box.
pub const CONNECTOR_MIN_EXTENT: f64 = 10.0;

/// Fallback text width used when no measurement context is available.
pub const FALLBACK_TEXT_WIDTH: f64 = 100.0;

/// Zoom bounds.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Wheel zoom factors.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Step used by the keyboard/toolbar zoom commands.
pub const ZOOM_STEP: f64 = 1.2;

/// Padding (screen pixels) used when fitting content to the viewport.
pub const FIT_PADDING: f64 = 50.0;

/// Resize handle edge length in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Minimum element extent enforced while resizing.
pub const MIN_RESIZE_EXTENT: f64 = 10.0;

/// Marquees smaller than this in both dimensions count as a click.
pub const MARQUEE_MIN_EXTENT: f64 = 5.0;

/// Blur events arriving sooner than this after the text entry opened are
/// treated as spurious focus steals.
pub const TEXT_BLUR_GUARD_MS: u64 = 500;

/// Default grid cell edge length.
pub const DEFAULT_GRID_SIZE: f64 = 50.0;

/// Stroke color stored on eraser strokes.
pub const ERASER_COLOR: &str = "#000000";
