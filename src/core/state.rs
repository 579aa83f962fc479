use super::asset::{AssetLoadError, AssetState, ModelScene};
use super::camera::{Camera, CameraReadout, CameraTracker};
use super::constants::MIN_CAMERA_Y;
use super::controls::OrbitControls;
use super::entity::{Animated, EntitySet, SceneAction};
use super::lighting::lighting_node;
use super::picking::Ray;
use super::scene::Scene;
use glam::Vec3;

/// Force the camera back up to the minimum viewing height. Returns true if a
/// correction was needed.
pub fn clamp_camera_height(camera: &mut Camera) -> bool {
    if camera.eye.y < MIN_CAMERA_Y {
        camera.eye.y = MIN_CAMERA_Y;
        return true;
    }
    false
}

/// What changed during one `tick`, for the overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameUpdate {
    pub readout: Option<CameraReadout>,
    pub controls_changed: bool,
}

/// Scene root state. Event handlers mutate it; `build_scene` reads it.
pub struct AppState {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub entities: EntitySet,
    pub asset: AssetState,
    pub dialog_open: bool,
    pub readout: Option<CameraReadout>,
    tracker: CameraTracker,
}

impl AppState {
    pub fn new(aspect: f32) -> Self {
        Self {
            camera: Camera::start(aspect),
            controls: OrbitControls::new(Vec3::ZERO),
            entities: EntitySet::reference(SceneAction::OpenDialog),
            asset: AssetState::Pending,
            dialog_open: false,
            readout: None,
            tracker: CameraTracker::default(),
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }

    /// One frame: animate, navigate, observe the camera.
    pub fn tick(&mut self, elapsed: f32) -> FrameUpdate {
        self.entities.tick(elapsed);

        let controls_changed = self.controls.update(&mut self.camera);
        if controls_changed && clamp_camera_height(&mut self.camera) {
            log::debug!("[camera] lifted to y={}", MIN_CAMERA_Y);
            self.controls.sync_eye(&self.camera);
        }

        let readout = self.tracker.observe(self.camera.eye);
        if readout.is_some() {
            self.readout = readout;
        }
        FrameUpdate {
            readout,
            controls_changed,
        }
    }

    pub fn open_dialog(&mut self) {
        if !self.dialog_open {
            log::info!("[dialog] open");
        }
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        if self.dialog_open {
            log::info!("[dialog] close");
        }
        self.dialog_open = false;
    }

    pub fn dispatch(&mut self, action: SceneAction) {
        match action {
            SceneAction::OpenDialog => self.open_dialog(),
        }
    }

    /// Hover follows the nearest interactive figure under the pointer.
    /// Returns the hovered index.
    pub fn pointer_move(&mut self, ray: &Ray) -> Option<usize> {
        let hit = self.entities.pick(ray);
        self.entities.set_hovered(hit);
        hit
    }

    pub fn pointer_leave(&mut self) {
        self.entities.set_hovered(None);
    }

    /// A click (press and release without dragging) at `ray`.
    pub fn click(&mut self, ray: &Ray) -> Option<SceneAction> {
        let index = self.entities.pick(ray)?;
        let action = self.entities.click(index)?;
        log::info!("[input] entity {} clicked", index);
        self.dispatch(action);
        Some(action)
    }

    pub fn finish_asset_load(&mut self, result: Result<ModelScene, AssetLoadError>) {
        self.asset.complete(result);
    }

    /// Compose lights, the model subtree (if any) and the figures.
    pub fn build_scene(&self) -> Scene {
        let mut scene = Scene::default();
        scene.push(lighting_node());
        if let Some(model) = self.asset.node() {
            scene.push(model);
        }
        scene.push(self.entities.node());
        scene
    }
}
