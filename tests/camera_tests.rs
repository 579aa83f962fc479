// Host-side tests for the camera, its readout and change tracking.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod viewer {
    pub mod camera {
        include!("../src/core/camera.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod picking {
        include!("../src/core/picking.rs");
    }
}

use glam::{Vec2, Vec3};
use viewer::camera::*;
use viewer::constants::*;
use viewer::picking::*;

#[test]
fn start_camera_matches_scene_defaults() {
    let cam = Camera::start(16.0 / 9.0);
    assert_eq!(cam.eye, Vec3::new(0.0, 15.0, 30.0));
    assert_eq!(cam.target, Vec3::ZERO);
    assert!((cam.fovy_radians - 75f32.to_radians()).abs() < 1e-6);
}

#[test]
fn round_to_two_decimals() {
    assert_eq!(round_to(1.234, 2), 1.23);
    assert_eq!(round_to(1.235001, 2), 1.24);
    assert_eq!(round_to(-30.154999, 2), -30.15);
    assert_eq!(round_to(5.0, 2), 5.0);
}

#[test]
fn readout_formats_fixed_two_decimals() {
    let r = CameraReadout::from_position(Vec3::new(1.0, 15.0, -2.5));
    assert_eq!(r.to_string(), "X: 1.00  Y: 15.00  Z: -2.50");
    assert_eq!((r.x, r.y, r.z), (1.0, 15.0, -2.5));
}

#[test]
fn tracker_reports_only_changes() {
    let mut tracker = CameraTracker::default();
    let first = tracker.observe(Vec3::new(0.0, 15.0, 30.0));
    assert_eq!(first.map(|r| (r.x, r.y, r.z)), Some((0.0, 15.0, 30.0)));
    assert_eq!(tracker.observe(Vec3::new(0.0, 15.0, 30.0)), None);

    // below the rounding threshold: no report
    assert_eq!(tracker.observe(Vec3::new(0.001, 15.002, 29.999)), None);

    let moved = tracker.observe(Vec3::new(0.02, 15.0, 30.0)).expect("change");
    assert_eq!(moved.x, 0.02);
    assert_eq!(tracker.observe(Vec3::new(0.02, 15.0, 30.0)), None);
}

#[test]
fn center_of_screen_ray_points_at_target() {
    let cam = Camera::start(1.0);
    let ray = screen_ray(&cam, Vec2::ZERO);
    let toward = (cam.target - cam.eye).normalize();
    assert!(ray.dir.abs_diff_eq(toward, 1e-4));
    assert_eq!(ray.origin, cam.eye);
}

#[test]
fn ray_sphere_hits_front_and_inside() {
    let ray = Ray::new(Vec3::ZERO, Vec3::Z);
    let t = ray_sphere(&ray, Vec3::new(0.0, 0.0, 5.0), 2.0).expect("hit");
    assert!((t - 3.0).abs() < 1e-5);

    let inside = ray_sphere(&ray, Vec3::ZERO, 1.0).expect("inside hit");
    assert!((inside - 1.0).abs() < 1e-5);

    assert!(ray_sphere(&ray, Vec3::new(5.0, 0.0, 5.0), 1.0).is_none());
    assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
}

#[test]
fn ray_aabb_slab_test() {
    let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
    let t = ray_aabb(&ray, Vec3::ZERO, Vec3::splat(1.0)).expect("hit");
    assert!((t - 9.0).abs() < 1e-5);
    assert!(ray_aabb(&ray, Vec3::new(3.0, 0.0, 0.0), Vec3::splat(1.0)).is_none());
    assert!((ray.at(t).z + 1.0).abs() < 1e-5);
}
