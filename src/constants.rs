// Browser interaction and renderer tuning. Scene-level values live in
// `core::constants`.

// A press that moves less than this (CSS pixels) before release is a click
pub const CLICK_SLOP_PX: f32 = 5.0;

// Mouse buttons as reported by PointerEvent.button
pub const BUTTON_PRIMARY: i16 = 0;
pub const BUTTON_SECONDARY: i16 = 2;

// Canvas background (linear RGB)
pub const CLEAR_COLOR: [f64; 4] = [0.52, 0.62, 0.78, 1.0];

// Figure primitive tessellation
pub const SPHERE_SEGMENTS: u32 = 24;
pub const SPHERE_RINGS: u32 = 16;

// Per-draw uniform slots allocated up front; the buffer grows on demand
pub const INITIAL_DRAW_SLOTS: usize = 64;

// Shadow pass rasterizer bias
pub const SHADOW_BIAS_CONSTANT: i32 = 2;
pub const SHADOW_BIAS_SLOPE: f32 = 2.0;

// DOM element ids in index.html
pub const CANVAS_ID: &str = "app-canvas";
pub const READOUT_ID: &str = "camera-readout";
pub const DIALOG_ID: &str = "dialog-overlay";
pub const DIALOG_CLOSE_ID: &str = "dialog-close";
