use glam::Vec3;

// Shared scene tuning constants used by the web frontend and host tests.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 15.0, 30.0);
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Orbit navigation limits
pub const MIN_ZOOM_DISTANCE: f32 = 3.0;
pub const MAX_ZOOM_DISTANCE: f32 = 50.0;
pub const MIN_POLAR_ANGLE: f32 = std::f32::consts::PI / 6.0;
pub const MAX_POLAR_ANGLE: f32 = 5.0 * std::f32::consts::PI / 6.0;
pub const MIN_CAMERA_Y: f32 = 5.0; // enforced after every control change
pub const DAMPING_FACTOR: f32 = 0.05;
pub const ROTATE_SPEED: f32 = 1.0;
pub const ZOOM_SPEED: f32 = 1.0;
pub const PAN_SPEED: f32 = 1.0;

// Idle "walking" animation
pub const BOB_AMPLITUDE: f32 = 0.1;
pub const BOB_FREQUENCY: f32 = 3.0; // rad/s, period 2π/3
pub const SWAY_AMPLITUDE: f32 = 0.1;
pub const SWAY_FREQUENCY: f32 = 2.0; // rad/s, period π

// Figure layout, relative to the entity's base position
pub const TORSO_SIZE: Vec3 = Vec3::new(0.5, 0.8, 0.3);
pub const TORSO_CENTER_Y: f32 = 0.4;
pub const HEAD_RADIUS: f32 = 0.22;
pub const HEAD_CENTER_Y: f32 = 1.02;
pub const MARKER_RADIUS: f32 = 0.1;
pub const MARKER_CENTER_Y: f32 = 1.55;
pub const MARKER_COLOR: u32 = 0xffd23f;
pub const HEAD_COLOR: u32 = 0xf1c27d; // skin tone shared by every figure

// Hover highlight
pub const HOVER_LIGHTEN: f32 = 0.4; // blend toward white
pub const HOVER_EMISSIVE_INTENSITY: f32 = 0.35;

// Fallback geometry shown when the model fails to load
pub const FALLBACK_BASE_SIZE: f32 = 10.0;
pub const FALLBACK_BASE_COLOR: u32 = 0xff0000;
pub const FALLBACK_TOP_SIZE: f32 = 2.0;
pub const FALLBACK_TOP_Y: f32 = 5.0;
pub const FALLBACK_TOP_COLOR: u32 = 0xffff00;

// Model
pub const DEFAULT_MODEL_URL: &str = "/Desert_Fortress_0902175405_generate.glb";
pub const MODEL_SCALE: f32 = 1.0;

// Lighting rig
pub const AMBIENT_INTENSITY: f32 = 0.4;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, 5.0);
pub const KEY_LIGHT_INTENSITY: f32 = 1.2;
pub const FILL_LIGHT_POSITION: Vec3 = Vec3::new(-10.0, 5.0, -5.0);
pub const FILL_LIGHT_INTENSITY: f32 = 0.6;
pub const RIM_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 10.0, -10.0);
pub const RIM_LIGHT_INTENSITY: f32 = 0.8;
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
pub const POINT_LIGHT_INTENSITY: f32 = 0.5;
pub const SHADOW_MAP_SIZE: u32 = 2048;
pub const SHADOW_HALF_EXTENT: f32 = 30.0; // orthographic shadow frustum half-size
pub const SHADOW_DISTANCE: f32 = 60.0; // how far back along the light direction the shadow camera sits

// Camera readout
pub const READOUT_DECIMALS: i32 = 2;

/// Convert a `0xRRGGBB` sRGB tint into linear RGB for shading.
#[inline]
pub fn hex_color(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
