// Host-side tests for orbit navigation limits, damping and change reporting.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod viewer {
    pub mod camera {
        include!("../src/core/camera.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod controls {
        include!("../src/core/controls.rs");
    }
}

use glam::Vec3;
use std::f32::consts::PI;
use viewer::camera::Camera;
use viewer::constants::*;
use viewer::controls::*;

fn settle(controls: &mut OrbitControls, camera: &mut Camera, frames: usize) {
    for _ in 0..frames {
        controls.update(camera);
    }
}

#[test]
fn spherical_round_trips_offsets() {
    let v = Vec3::new(3.0, 4.0, -2.0);
    let s = Spherical::from_offset(v);
    assert!((s.radius - v.length()).abs() < 1e-5);
    assert!(s.to_offset().abs_diff_eq(v, 1e-4));
}

#[test]
fn first_update_reports_a_change() {
    let mut camera = Camera::start(1.5);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    assert!(controls.update(&mut camera));
    assert!(camera.eye.abs_diff_eq(CAMERA_START, 1e-4));
    assert!(!controls.update(&mut camera));
}

#[test]
fn synced_correction_is_not_reported_again() {
    let mut camera = Camera::start(1.5);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.enable_damping = false;
    controls.update(&mut camera);

    camera.eye.y += 1.0;
    controls.sync_eye(&camera);
    assert!(!controls.update(&mut camera));
    assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 16.0, 30.0), 1e-4));

    // an unsynced correction counts as movement
    camera.eye.y += 1.0;
    assert!(controls.update(&mut camera));
}

#[test]
fn zoom_stays_within_distance_limits() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    for _ in 0..200 {
        controls.dolly(-120.0);
        controls.update(&mut camera);
    }
    assert!((controls.distance(&camera) - MIN_ZOOM_DISTANCE).abs() < 1e-3);

    for _ in 0..200 {
        controls.dolly(120.0);
        controls.update(&mut camera);
    }
    assert!((controls.distance(&camera) - MAX_ZOOM_DISTANCE).abs() < 1e-3);
}

#[test]
fn dolly_direction_follows_wheel_sign() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.update(&mut camera);
    let start = controls.distance(&camera);

    controls.dolly(-1.0);
    assert!(controls.update(&mut camera));
    let closer = controls.distance(&camera);
    assert!(closer < start);
    assert!((closer - start * 0.95).abs() < 1e-3);

    controls.dolly(1.0);
    controls.update(&mut camera);
    assert!((controls.distance(&camera) - start).abs() < 1e-3);
}

#[test]
fn polar_angle_is_clamped() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.enable_damping = false;

    // try to look straight down from above
    controls.rotate_up(PI);
    controls.update(&mut camera);
    assert!((controls.polar_angle(&camera) - MIN_POLAR_ANGLE).abs() < 1e-4);

    // and straight up from below
    controls.rotate_up(-2.0 * PI);
    controls.update(&mut camera);
    assert!((controls.polar_angle(&camera) - MAX_POLAR_ANGLE).abs() < 1e-4);
}

#[test]
fn damping_eases_rotation_over_frames() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.update(&mut camera);
    let start = camera.eye;

    controls.rotate_left(0.5);
    controls.update(&mut camera);
    let first_step = start.distance(camera.eye);
    assert!(first_step > 0.0);

    let before = camera.eye;
    controls.update(&mut camera);
    let second_step = before.distance(camera.eye);
    assert!(second_step < first_step);

    // eventually comes to rest and stops reporting
    settle(&mut controls, &mut camera, 2000);
    assert!(!controls.update(&mut camera));
}

#[test]
fn rotation_keeps_distance() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.update(&mut camera);
    let d = controls.distance(&camera);
    controls.rotate_by_pixels(150.0, 0.0, 600.0);
    settle(&mut controls, &mut camera, 300);
    assert!((controls.distance(&camera) - d).abs() < 1e-3);
}

#[test]
fn pan_moves_target_and_eye_together() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.enable_damping = false;
    controls.update(&mut camera);
    let offset = camera.eye - controls.target;

    controls.pan_by_pixels(100.0, 0.0, &camera.clone(), 600.0);
    assert!(controls.update(&mut camera));
    assert!(controls.target.length() > 0.0);
    // screen-space pan keeps the view direction
    assert!((camera.eye - controls.target).abs_diff_eq(offset, 1e-3));
    assert_eq!(camera.target, controls.target);
}

#[test]
fn disabled_inputs_do_nothing() {
    let mut camera = Camera::start(1.0);
    let mut controls = OrbitControls::new(Vec3::ZERO);
    controls.update(&mut camera);
    controls.enable_rotate = false;
    controls.enable_zoom = false;
    controls.enable_pan = false;
    controls.rotate_by_pixels(100.0, 100.0, 600.0);
    controls.dolly(-5.0);
    controls.pan_by_pixels(50.0, 50.0, &camera.clone(), 600.0);
    assert!(!controls.update(&mut camera));
}
