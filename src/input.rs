use glam::Vec2;
use web_sys as web;

/// What a held pointer button is steering.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    None,
    Rotate,
    Pan,
}

/// Tracks one press from `pointerdown` to `pointerup`.
#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub mode: DragMode,
    pub pointer_id: i32,
    pub start: Vec2,
    pub last: Vec2,
    // Farthest the pointer wandered from `start` during this press
    pub travel: f32,
}

impl DragState {
    pub fn begin(&mut self, mode: DragMode, pointer_id: i32, at: Vec2) {
        self.mode = mode;
        self.pointer_id = pointer_id;
        self.start = at;
        self.last = at;
        self.travel = 0.0;
    }

    /// Record a move and return the delta from the previous position.
    pub fn advance(&mut self, at: Vec2) -> Vec2 {
        let delta = at - self.last;
        self.last = at;
        self.travel = self.travel.max(at.distance(self.start));
        delta
    }

    pub fn is_active(&self) -> bool {
        self.mode != DragMode::None
    }

    /// Whether a release now counts as a click rather than a drag.
    pub fn is_click(&self, slop_px: f32) -> bool {
        self.travel <= slop_px
    }

    pub fn end(&mut self) -> DragMode {
        std::mem::take(&mut self.mode)
    }
}

/// Map a canvas position (CSS pixels, origin top-left) to normalized device
/// coordinates with +y up.
#[inline]
pub fn px_to_ndc(px: Vec2, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(px.x / width * 2.0 - 1.0, 1.0 - px.y / height * 2.0)
}

/// Pointer position relative to the canvas in CSS pixels.
#[inline]
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

#[inline]
pub fn pointer_canvas_ndc(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    px_to_ndc(
        pointer_canvas_px(ev, canvas),
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Keys the viewer responds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    CloseDialog,
}

#[inline]
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    match key {
        "Escape" | "Esc" => Some(KeyCommand::CloseDialog),
        _ => None,
    }
}
