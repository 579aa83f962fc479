use super::camera::Camera;
use super::constants::*;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Spherical coordinates with +Y up: `phi` is the polar angle from +Y,
/// `theta` the azimuth around Y measured from +Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }

    /// Keep phi away from the poles where the view direction degenerates.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

/// Orbit-style navigation around `target`: rotate, zoom (dolly) and pan with
/// distance and polar-angle limits and exponential damping.
///
/// Input methods only accumulate deltas; `update` applies them to a camera
/// and reports whether the camera moved.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,

    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    last_eye: Option<Vec3>,
    last_target: Vec3,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            min_distance: MIN_ZOOM_DISTANCE,
            max_distance: MAX_ZOOM_DISTANCE,
            min_polar_angle: MIN_POLAR_ANGLE,
            max_polar_angle: MAX_POLAR_ANGLE,
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            rotate_speed: ROTATE_SPEED,
            zoom_speed: ZOOM_SPEED,
            pan_speed: PAN_SPEED,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            last_eye: None,
            last_target: target,
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Pointer drag in pixels; a drag across the full viewport height turns
    /// a full circle.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enable_rotate {
            return;
        }
        let h = viewport_height.max(1.0);
        self.rotate_left(TAU * dx / h * self.rotate_speed);
        self.rotate_up(TAU * dy / h * self.rotate_speed);
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Wheel input: negative `delta_y` moves the camera closer.
    pub fn dolly(&mut self, delta_y: f32) {
        if !self.enable_zoom {
            return;
        }
        if delta_y < 0.0 {
            self.scale *= self.zoom_scale();
        } else if delta_y > 0.0 {
            self.scale /= self.zoom_scale();
        }
    }

    /// Screen-space pan in pixels, scaled so the point under the cursor at
    /// the target's depth follows the pointer.
    pub fn pan_by_pixels(&mut self, dx: f32, dy: f32, camera: &Camera, viewport_height: f32) {
        if !self.enable_pan {
            return;
        }
        let h = viewport_height.max(1.0);
        let target_distance = (camera.eye - self.target).length() * (camera.fovy_radians / 2.0).tan();
        let view = camera.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();
        let left = right * -(2.0 * dx * target_distance / h) * self.pan_speed;
        let upward = up * (2.0 * dy * target_distance / h) * self.pan_speed;
        self.pan_offset += left + upward;
    }

    /// Apply pending input to `camera`. Returns true when the camera moved
    /// (the "change" event).
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.eye - self.target;
        let mut spherical = Spherical::from_offset(offset);

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.eye = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= keep;
            self.spherical_delta.phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        let zoom_changed = self.scale != 1.0;
        self.scale = 1.0;

        let moved = match self.last_eye {
            None => true,
            Some(last) => last.distance_squared(camera.eye) > EPS,
        };
        let retargeted = self.last_target.distance_squared(self.target) > EPS;
        if zoom_changed || moved || retargeted {
            self.last_eye = Some(camera.eye);
            self.last_target = self.target;
            return true;
        }
        false
    }

    /// Adopt an eye position corrected outside the controls, so the next
    /// `update` compares against where the camera actually is.
    pub fn sync_eye(&mut self, camera: &Camera) {
        self.last_eye = Some(camera.eye);
        self.last_target = self.target;
    }

    /// Current distance from the target for `camera`.
    pub fn distance(&self, camera: &Camera) -> f32 {
        (camera.eye - self.target).length()
    }

    pub fn polar_angle(&self, camera: &Camera) -> f32 {
        Spherical::from_offset(camera.eye - self.target).phi
    }
}
