// Host-side tests for the scene root: frame ticks, camera height clamp,
// dialog flow and scene composition.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod viewer {
    pub mod asset {
        include!("../src/core/asset.rs");
    }
    pub mod camera {
        include!("../src/core/camera.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod controls {
        include!("../src/core/controls.rs");
    }
    pub mod entity {
        include!("../src/core/entity.rs");
    }
    pub mod geometry {
        include!("../src/core/geometry.rs");
    }
    pub mod lighting {
        include!("../src/core/lighting.rs");
    }
    pub mod picking {
        include!("../src/core/picking.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
    pub mod state {
        include!("../src/core/state.rs");
    }
}

use glam::Vec3;
use viewer::asset::AssetLoadError;
use viewer::camera::Camera;
use viewer::constants::*;
use viewer::entity::{SceneAction, ENTITY_PLACEMENTS};
use viewer::picking::Ray;
use viewer::scene::{GroupNode, Light, Scene, SceneNode};
use viewer::state::*;

/// Depth-first search for a group by label.
fn find_group<'a>(scene: &'a Scene, label: &str) -> Option<&'a GroupNode> {
    fn search<'n>(nodes: &'n [SceneNode], label: &str) -> Option<&'n GroupNode> {
        nodes.iter().find_map(|n| match n {
            SceneNode::Group(g) if g.label == label => Some(g),
            SceneNode::Group(g) => search(&g.children, label),
            _ => None,
        })
    }
    search(&scene.nodes, label)
}

fn mesh_count(group: &GroupNode) -> usize {
    group
        .children
        .iter()
        .map(|c| match c {
            SceneNode::Mesh(_) => 1,
            SceneNode::Group(g) => mesh_count(g),
            SceneNode::Light(_) => 0,
        })
        .sum()
}

fn gatekeeper() -> (usize, Vec3) {
    let i = ENTITY_PLACEMENTS
        .iter()
        .position(|p| p.interactive)
        .expect("one interactive placement");
    (i, Vec3::from_array(ENTITY_PLACEMENTS[i].position))
}

fn ray_at_gatekeeper() -> Ray {
    let (_, p) = gatekeeper();
    Ray::new(p + Vec3::new(0.0, TORSO_CENTER_Y, 10.0), Vec3::NEG_Z)
}

#[test]
fn clamp_lifts_low_cameras_only() {
    let mut cam = Camera::start(1.0);
    assert!(!clamp_camera_height(&mut cam));
    assert_eq!(cam.eye, CAMERA_START);

    cam.eye = Vec3::new(3.0, 1.0, 4.0);
    assert!(clamp_camera_height(&mut cam));
    assert_eq!(cam.eye, Vec3::new(3.0, 5.0, 4.0));

    cam.eye.y = 5.0;
    assert!(!clamp_camera_height(&mut cam));
}

#[test]
fn first_tick_reports_the_start_position() {
    let mut state = AppState::new(1.0);
    let update = state.tick(0.0);
    assert!(update.controls_changed);
    let readout = update.readout.expect("first readout");
    assert_eq!((readout.x, readout.y, readout.z), (0.0, 15.0, 30.0));
    assert_eq!(state.readout, Some(readout));

    let update = state.tick(0.016);
    assert_eq!(update.readout, None);
    assert!(!update.controls_changed);
}

#[test]
fn camera_never_settles_below_minimum_height() {
    let mut state = AppState::new(1.0);
    state.controls.enable_damping = false;
    state.tick(0.0);
    // orbit as far down as the polar limit allows
    state.controls.rotate_up(-std::f32::consts::PI);
    for i in 0..10 {
        state.tick(0.1 * i as f32);
        assert!(state.camera.eye.y >= MIN_CAMERA_Y - 1e-4);
    }
}

#[test]
fn panning_below_the_floor_keeps_the_readout_above_minimum_height() {
    let mut state = AppState::new(1.5);
    state.tick(0.0);
    for i in 0..20 {
        state
            .controls
            .pan_by_pixels(0.0, -60.0, &state.camera, 800.0);
        state.tick(i as f32 / 60.0);
    }
    // keep ticking while the damped pan drains out and the camera settles
    for i in 20..400 {
        state.tick(i as f32 / 60.0);
        assert!(state.camera.eye.y >= MIN_CAMERA_Y - 1e-4);
        let readout = state.readout.expect("readout");
        assert!(readout.y >= MIN_CAMERA_Y as f64, "readout y {} below floor", readout.y);
    }
    assert!(state.controls.target.y < 0.0);
}

#[test]
fn clicking_the_gatekeeper_opens_the_dialog() {
    let mut state = AppState::new(1.0);
    state.tick(0.0);
    assert!(!state.dialog_open);

    let action = state.click(&ray_at_gatekeeper());
    assert_eq!(action, Some(SceneAction::OpenDialog));
    assert!(state.dialog_open);

    // clicking again keeps it open
    state.click(&ray_at_gatekeeper());
    assert!(state.dialog_open);

    state.close_dialog();
    assert!(!state.dialog_open);
}

#[test]
fn clicking_empty_space_does_nothing() {
    let mut state = AppState::new(1.0);
    let ray = Ray::new(Vec3::new(0.0, 50.0, 0.0), Vec3::Y);
    assert_eq!(state.click(&ray), None);
    assert!(!state.dialog_open);
}

#[test]
fn hover_follows_the_pointer() {
    let (i, _) = gatekeeper();
    let mut state = AppState::new(1.0);
    assert_eq!(state.pointer_move(&ray_at_gatekeeper()), Some(i));
    assert_eq!(state.entities.hovered(), Some(i));

    let away = Ray::new(Vec3::new(0.0, 50.0, 0.0), Vec3::Y);
    assert_eq!(state.pointer_move(&away), None);
    assert_eq!(state.entities.hovered(), None);

    state.pointer_move(&ray_at_gatekeeper());
    state.pointer_leave();
    assert_eq!(state.entities.hovered(), None);
}

#[test]
fn scene_has_lights_and_figures_while_loading() {
    let state = AppState::new(1.0);
    let scene = state.build_scene();
    assert!(find_group(&scene, "lights").is_some());
    assert!(find_group(&scene, "entities").is_some());
    assert!(find_group(&scene, "model").is_none());
    assert!(find_group(&scene, "fallback").is_none());

    let flat = scene.flatten();
    assert_eq!(flat.lights.len(), 5);
    assert_eq!(flat.draws.len(), ENTITY_PLACEMENTS.len() * 2);
}

#[test]
fn failed_load_swaps_in_the_fallback() {
    let mut state = AppState::new(1.0);
    state.finish_asset_load(Err(AssetLoadError::Empty));
    let scene = state.build_scene();
    let fallback = find_group(&scene, "fallback").expect("fallback group");
    assert_eq!(mesh_count(fallback), 2);
    assert!(find_group(&scene, "model").is_none());
}

#[test]
fn lighting_rig_is_fixed() {
    let state = AppState::new(1.0);
    let flat = state.build_scene().flatten();
    let ambient: Vec<_> = flat
        .lights
        .iter()
        .filter_map(|l| match l {
            Light::Ambient { intensity, .. } => Some(*intensity),
            _ => None,
        })
        .collect();
    assert_eq!(ambient, vec![0.4]);

    let directional: Vec<_> = flat
        .lights
        .iter()
        .filter_map(|l| match l {
            Light::Directional { cast_shadow, .. } => Some(*cast_shadow),
            _ => None,
        })
        .collect();
    assert_eq!(directional.len(), 3);
    assert_eq!(directional.iter().filter(|c| **c).count(), 1);

    let points = flat
        .lights
        .iter()
        .filter(|l| matches!(l, Light::Point { .. }))
        .count();
    assert_eq!(points, 1);
}

#[test]
fn figures_are_the_last_subtree() {
    let state = AppState::new(1.0);
    let scene = state.build_scene();
    match scene.nodes.last() {
        Some(SceneNode::Group(g)) => assert_eq!(g.label, "entities"),
        other => panic!("unexpected last node {:?}", other),
    }
}

#[test]
fn aspect_ignores_degenerate_sizes() {
    let mut state = AppState::new(1.5);
    state.set_aspect(0.0);
    state.set_aspect(f32::NAN);
    assert_eq!(state.camera.aspect, 1.5);
    state.set_aspect(2.0);
    assert_eq!(state.camera.aspect, 2.0);
}
