pub mod asset;
pub mod camera;
pub mod config;
pub mod constants;
pub mod controls;
pub mod entity;
pub mod geometry;
pub mod lighting;
pub mod picking;
pub mod scene;
pub mod state;

pub use asset::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use controls::*;
pub use entity::*;
pub use geometry::*;
pub use lighting::*;
pub use picking::*;
pub use scene::*;
pub use state::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
