//! Tool-driven input state machine.
//!
//! Translates pointer, wheel, keyboard and text-entry events into scene
//! mutations on a [`Canvas`]. Drags and resizes mutate elements live and
//! record a single history entry when the pointer is released.

use crate::camera::ViewportPatch;
use crate::canvas::Canvas;
use crate::constants::{ERASER_COLOR, MARQUEE_MIN_EXTENT, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::elements::{Connector, Drawing, Element, ElementId, ElementKind, Shape, Text};
use crate::geometry::Bounds;
use crate::input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent, TextEntryEvent};
use crate::selection::{ResizeHandle, apply_resize, hit_handle, resize_rect};
use crate::text_entry::{BlurAction, TextEntry};
use crate::tools::ToolKind;
use kurbo::{Point, Rect, Vec2};
use std::time::{Duration, Instant};

/// Exclusive transient mode of the engine.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging the viewport. `offset` is the pointer's screen position
    /// minus the pan at press time.
    Panning { offset: Vec2 },
    FreehandDrawing,
    ShapeDragging,
    ConnectorDragging,
    /// Moving the selection; `last` is the previous (snapped) sample.
    ElementDragging { last: Point, moved: bool },
    MarqueeSelecting { start: Point, current: Point },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        /// Normalized bounds at press time.
        original: Rect,
        /// Snapped canvas point at press time.
        origin: Point,
        changed: bool,
    },
    TextEditing(TextEntry),
}

/// Handles input events and translates them to canvas operations.
#[derive(Debug, Default)]
pub struct InteractionEngine {
    state: InteractionState,
    space_held: bool,
    image_picker_requested: bool,
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Space bar currently forces panning.
    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        match &self.state {
            InteractionState::TextEditing(entry) => Some(entry),
            _ => None,
        }
    }

    /// Keyboard shortcuts are suspended while the text input has focus.
    pub fn is_text_input_focused(&self) -> bool {
        self.text_entry().is_some()
    }

    /// Live marquee rectangle in canvas space.
    pub fn marquee(&self) -> Option<Bounds> {
        match &self.state {
            InteractionState::MarqueeSelecting { start, current } => Some(Bounds::new(
                start.x,
                start.y,
                current.x - start.x,
                current.y - start.y,
            )),
            _ => None,
        }
    }

    /// Whether the image tool asked the host to open a file picker.
    /// Reading the flag clears it.
    pub fn take_image_picker_request(&mut self) -> bool {
        std::mem::take(&mut self.image_picker_requested)
    }

    /// Dispatch any input event.
    pub fn handle(&mut self, canvas: &mut Canvas, event: &InputEvent) {
        match event {
            InputEvent::Pointer(PointerEvent::Down {
                position,
                button,
                modifiers,
                after_ms,
            }) => match after_ms {
                Some(ms) if self.is_text_input_focused() => self.blur_after(canvas, Some(*ms)),
                _ => self.pointer_down(canvas, *position, *button, *modifiers),
            },
            InputEvent::Pointer(PointerEvent::Move { position }) => self.pointer_move(canvas, *position),
            InputEvent::Pointer(PointerEvent::Up { position }) => self.pointer_up(canvas, *position),
            InputEvent::Pointer(PointerEvent::Wheel { position, delta_y }) => {
                self.wheel(canvas, *position, *delta_y)
            }
            InputEvent::Key(KeyEvent::Pressed { key, modifiers }) => {
                self.key_down(canvas, key, *modifiers);
            }
            InputEvent::Key(KeyEvent::Released { key }) => self.key_up(key),
            InputEvent::Text(event) => self.text_event(canvas, event),
            InputEvent::Resize { width, height } => canvas.set_viewport_size(*width, *height),
        }
    }

    // ---- Pointer ----

    /// Press on the canvas. While a text entry is open the press only
    /// commits it.
    pub fn pointer_down(&mut self, canvas: &mut Canvas, position: Point, button: MouseButton, modifiers: Modifiers) {
        if self.is_text_input_focused() {
            self.commit_text(canvas);
            return;
        }
        if !self.is_idle() {
            return;
        }

        let tool = canvas.active_tool();
        if self.space_held || button == MouseButton::Middle || tool == ToolKind::Pan {
            self.state = InteractionState::Panning {
                offset: position.to_vec2() - canvas.viewport.pan(),
            };
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        let point = canvas.screen_to_canvas(position);
        match tool {
            ToolKind::Select => self.begin_select(canvas, point, modifiers.shift),
            ToolKind::Text => self.state = InteractionState::TextEditing(TextEntry::open(position)),
            ToolKind::Draw | ToolKind::Eraser => {
                let settings = canvas.tools();
                let element = if tool == ToolKind::Eraser {
                    Element::new(
                        point,
                        ERASER_COLOR,
                        settings.stroke_width * 2.0,
                        ElementKind::Drawing(Drawing::new(vec![point], true)),
                    )
                } else {
                    Element::new(
                        point,
                        settings.color.clone(),
                        settings.stroke_width,
                        ElementKind::Drawing(Drawing::new(vec![point], false)),
                    )
                };
                canvas.set_current_element(Some(element));
                self.state = InteractionState::FreehandDrawing;
            }
            ToolKind::Shape => {
                let anchor = canvas.grid().snap_point(point);
                let settings = canvas.tools();
                let mut shape = Shape::new(settings.shape_type, 0.0, 0.0);
                if shape.shape_type.is_linear() {
                    shape.set_end_point(anchor, anchor);
                }
                let element = Element::new(anchor, settings.color.clone(), settings.stroke_width, ElementKind::Shape(shape));
                canvas.set_current_element(Some(element));
                self.state = InteractionState::ShapeDragging;
            }
            ToolKind::Connector => {
                let start = canvas.geometry().hit_test(point).map(|el| el.id.clone());
                let settings = canvas.tools();
                let connector = Connector::new(point, settings.connector_style).with_start_element(start);
                let element = Element::new(
                    point,
                    settings.color.clone(),
                    settings.stroke_width,
                    ElementKind::Connector(connector),
                );
                canvas.set_current_element(Some(element));
                self.state = InteractionState::ConnectorDragging;
            }
            ToolKind::Image => self.image_picker_requested = true,
            ToolKind::Pan => {}
        }
        log::debug!("pointer down ({tool:?}) -> {:?}", std::mem::discriminant(&self.state));
    }

    fn begin_select(&mut self, canvas: &mut Canvas, point: Point, shift: bool) {
        if let Some((id, handle, original)) = resize_target(canvas, point) {
            self.state = InteractionState::Resizing {
                id,
                handle,
                original,
                origin: canvas.grid().snap_point(point),
                changed: false,
            };
            return;
        }

        let hit = canvas.geometry().hit_test(point).map(|el| (el.id.clone(), el.locked));
        match hit {
            Some((id, locked)) => {
                if shift {
                    if canvas.is_selected(&id) {
                        canvas.remove_from_selection(&id);
                    } else {
                        canvas.add_to_selection(id.clone());
                    }
                } else if !(canvas.is_selected(&id) && canvas.selection().len() > 1) {
                    canvas.select_elements(vec![id.clone()]);
                }
                if !locked && canvas.is_selected(&id) {
                    self.state = InteractionState::ElementDragging {
                        last: canvas.grid().snap_point(point),
                        moved: false,
                    };
                }
            }
            None => {
                if !shift {
                    canvas.clear_selection();
                }
                self.state = InteractionState::MarqueeSelecting {
                    start: point,
                    current: point,
                };
            }
        }
    }

    pub fn pointer_move(&mut self, canvas: &mut Canvas, position: Point) {
        let point = canvas.screen_to_canvas(position);
        match &mut self.state {
            InteractionState::Idle | InteractionState::TextEditing(_) => {}
            InteractionState::Panning { offset } => {
                let pan = position - *offset;
                canvas.set_viewport(ViewportPatch::pan(pan.x, pan.y));
            }
            InteractionState::MarqueeSelecting { current, .. } => *current = point,
            InteractionState::Resizing {
                id,
                handle,
                original,
                origin,
                changed,
            } => {
                let delta = canvas.grid().snap_point(point) - *origin;
                let rect = resize_rect(*original, *handle, delta);
                if let Some(element) = canvas.get_element_mut(id) {
                    if !element.locked && apply_resize(element, rect) {
                        *changed = true;
                    }
                }
            }
            InteractionState::ElementDragging { last, moved } => {
                let snapped = canvas.grid().snap_point(point);
                let delta = snapped - *last;
                if delta.hypot2() > 0.0 {
                    let ids = canvas.selection().to_vec();
                    for id in &ids {
                        if let Some(element) = canvas.get_element_mut(id) {
                            if !element.locked {
                                element.translate(delta);
                            }
                        }
                    }
                    *last = snapped;
                    *moved = true;
                }
            }
            InteractionState::FreehandDrawing => {
                if let Some(ElementKind::Drawing(drawing)) = canvas.current_element_mut().map(|el| &mut el.kind) {
                    drawing.add_point(point);
                }
            }
            InteractionState::ShapeDragging => {
                let snapped = canvas.grid().snap_point(point);
                if let Some(element) = canvas.current_element_mut() {
                    let anchor = element.position();
                    if let Some(shape) = element.as_shape_mut() {
                        if shape.shape_type.is_linear() {
                            shape.set_end_point(anchor, point);
                        } else {
                            shape.width = snapped.x - anchor.x;
                            shape.height = snapped.y - anchor.y;
                        }
                    }
                }
            }
            InteractionState::ConnectorDragging => {
                if let Some(connector) = canvas.current_element_mut().and_then(Element::as_connector_mut) {
                    connector.end_point = point;
                }
            }
        }
    }

    pub fn pointer_up(&mut self, canvas: &mut Canvas, position: Point) {
        let point = canvas.screen_to_canvas(position);
        match std::mem::take(&mut self.state) {
            InteractionState::TextEditing(entry) => self.state = InteractionState::TextEditing(entry),
            InteractionState::Idle | InteractionState::Panning { .. } => {}
            InteractionState::Resizing { changed, .. } | InteractionState::ElementDragging { moved: changed, .. } => {
                if changed {
                    canvas.push_history();
                }
            }
            InteractionState::MarqueeSelecting { start, .. } => {
                let area = Bounds::new(start.x, start.y, point.x - start.x, point.y - start.y);
                if area.width.abs() > MARQUEE_MIN_EXTENT || area.height.abs() > MARQUEE_MIN_EXTENT {
                    let ids = canvas.elements_in(&area);
                    log::debug!("marquee selected {} elements", ids.len());
                    canvas.select_elements(ids);
                }
            }
            InteractionState::FreehandDrawing | InteractionState::ShapeDragging => {
                canvas.commit_current_element();
            }
            InteractionState::ConnectorDragging => {
                let end_hit = canvas.geometry().hit_test(point).map(|el| el.id.clone());
                if let Some(connector) = canvas.current_element_mut().and_then(Element::as_connector_mut) {
                    connector.end_point = point;
                    if end_hit.is_some() && end_hit != connector.start_element_id {
                        connector.end_element_id = end_hit;
                    }
                }
                canvas.commit_current_element();
            }
        }
    }

    /// Zoom about the cursor; positive `delta_y` zooms out.
    pub fn wheel(&mut self, canvas: &mut Canvas, position: Point, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        canvas.viewport.zoom_at(position, factor);
    }

    /// Abort the transient interaction. In-progress elements are dropped;
    /// moves and resizes already applied are kept and recorded.
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        match std::mem::take(&mut self.state) {
            InteractionState::FreehandDrawing
            | InteractionState::ShapeDragging
            | InteractionState::ConnectorDragging => canvas.set_current_element(None),
            InteractionState::Resizing { changed: true, .. }
            | InteractionState::ElementDragging { moved: true, .. } => canvas.push_history(),
            _ => {}
        }
    }

    /// Settle a drag or resize before a shortcut edits the scene, so its
    /// history entry lands ahead of the edit.
    fn finish_gesture(&mut self, canvas: &mut Canvas) {
        if !self.is_idle() {
            self.cancel(canvas);
        }
    }

    // ---- Keyboard ----

    /// Handle a key press. Returns whether the key was consumed.
    pub fn key_down(&mut self, canvas: &mut Canvas, key: &str, modifiers: Modifiers) -> bool {
        if self.is_text_input_focused() {
            match key {
                "Enter" => self.commit_text(canvas),
                "Escape" => self.state = InteractionState::Idle,
                _ => return false,
            }
            return true;
        }

        if key == " " || key == "Space" {
            self.space_held = true;
            return true;
        }

        let lower = key.to_ascii_lowercase();
        if modifiers.command() {
            if matches!(lower.as_str(), "z" | "y" | "v" | "d" | "l") {
                self.finish_gesture(canvas);
            }
            match lower.as_str() {
                "z" if modifiers.shift => {
                    canvas.redo();
                }
                "z" => {
                    canvas.undo();
                }
                "y" => {
                    canvas.redo();
                }
                "c" => {
                    canvas.copy();
                }
                "v" => {
                    canvas.paste();
                }
                "d" => {
                    canvas.duplicate();
                }
                "a" => canvas.select_all(),
                "l" => {
                    canvas.toggle_lock_selected();
                }
                "+" | "=" => canvas.zoom_in(),
                "-" => canvas.zoom_out(),
                "0" => canvas.reset_zoom(),
                _ => return false,
            }
            return true;
        }

        match key {
            "Delete" | "Backspace" => {
                self.finish_gesture(canvas);
                canvas.delete_selected();
                true
            }
            "Escape" => {
                if self.is_idle() {
                    canvas.clear_selection();
                } else {
                    self.cancel(canvas);
                }
                true
            }
            _ => match ToolKind::from_shortcut(&lower) {
                Some(tool) => {
                    canvas.set_active_tool(tool);
                    if tool == ToolKind::Image {
                        self.image_picker_requested = true;
                    }
                    true
                }
                None => false,
            },
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if key == " " || key == "Space" {
            self.space_held = false;
            if matches!(self.state, InteractionState::Panning { .. }) {
                self.state = InteractionState::Idle;
            }
        }
    }

    // ---- Text entry ----

    pub fn text_event(&mut self, canvas: &mut Canvas, event: &TextEntryEvent) {
        match event {
            TextEntryEvent::Input { value } => {
                if let InteractionState::TextEditing(entry) = &mut self.state {
                    entry.value = value.clone();
                }
            }
            TextEntryEvent::Submit => self.commit_text(canvas),
            TextEntryEvent::Cancel => {
                if self.is_text_input_focused() {
                    self.state = InteractionState::Idle;
                }
            }
            TextEntryEvent::Blur { after_ms } => self.blur_after(canvas, *after_ms),
        }
    }

    /// Blur `after_ms` after the entry opened, or now.
    fn blur_after(&mut self, canvas: &mut Canvas, after_ms: Option<u64>) {
        let now = match (after_ms, &self.state) {
            (Some(ms), InteractionState::TextEditing(entry)) => entry.opened_at() + Duration::from_millis(ms),
            _ => Instant::now(),
        };
        self.text_blur(canvas, now);
    }

    /// Focus left the text input at `now`.
    pub fn text_blur(&mut self, canvas: &mut Canvas, now: Instant) {
        let InteractionState::TextEditing(entry) = &self.state else {
            return;
        };
        match entry.blur_action(now) {
            BlurAction::Refocus => log::debug!("ignoring early blur of text entry"),
            BlurAction::Commit => self.commit_text(canvas),
        }
    }

    /// Close the text entry, creating a Text element unless it is blank.
    fn commit_text(&mut self, canvas: &mut Canvas) {
        if !self.is_text_input_focused() {
            return;
        }
        let InteractionState::TextEditing(entry) = std::mem::take(&mut self.state) else {
            return;
        };
        let Some(text) = entry.committed_text() else {
            return;
        };
        let position = canvas.screen_to_canvas(entry.screen_position);
        let settings = canvas.tools();
        let element = Element::new(
            position,
            settings.color.clone(),
            settings.stroke_width,
            ElementKind::Text(Text::new(text, settings.font_size)),
        );
        canvas.add_element(element);
    }
}

/// The sole selected, unlocked, resizable element and the handle under
/// `point`.
fn resize_target(canvas: &Canvas, point: Point) -> Option<(ElementId, ResizeHandle, Rect)> {
    let [id] = canvas.selection() else {
        return None;
    };
    let element = canvas.get_element(id)?;
    if element.locked || !element.is_resizable() {
        return None;
    }
    let bounds = canvas.geometry().bounds_of(element).to_rect();
    let handle = hit_handle(bounds, point, canvas.viewport.zoom)?;
    Some((id.clone(), handle, bounds))
}
