use super::constants::{
    CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_START, READOUT_DECIMALS,
};
use glam::{Mat4, Vec3};
use std::fmt;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The viewer's starting camera, looking at the origin.
    pub fn start(aspect: f32) -> Self {
        Self {
            eye: CAMERA_START,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Camera position as shown on screen: each axis rounded to two decimals.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraReadout {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CameraReadout {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            x: round_to(position.x as f64, READOUT_DECIMALS),
            y: round_to(position.y as f64, READOUT_DECIMALS),
            z: round_to(position.z as f64, READOUT_DECIMALS),
        }
    }
}

impl fmt::Display for CameraReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = READOUT_DECIMALS as usize;
        write!(
            f,
            "X: {:.d$}  Y: {:.d$}  Z: {:.d$}",
            self.x,
            self.y,
            self.z,
            d = d
        )
    }
}

/// Observes the camera once per frame and reports the rounded position only
/// when it differs from the last report.
#[derive(Clone, Debug, Default)]
pub struct CameraTracker {
    last: Option<CameraReadout>,
}

impl CameraTracker {
    pub fn observe(&mut self, position: Vec3) -> Option<CameraReadout> {
        let readout = CameraReadout::from_position(position);
        if self.last == Some(readout) {
            return None;
        }
        self.last = Some(readout);
        Some(readout)
    }
}
