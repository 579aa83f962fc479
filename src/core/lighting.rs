use super::constants::*;
use super::scene::{GroupNode, Light, SceneNode};
use glam::{Mat4, Vec3};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
pub const MAX_POINT_LIGHTS: usize = 2;

/// The fixed rig: one ambient, three directional (the first casts shadows)
/// and one point light.
pub fn lighting_rig() -> [Light; 5] {
    [
        Light::Ambient {
            color: Vec3::ONE,
            intensity: AMBIENT_INTENSITY,
        },
        Light::Directional {
            position: KEY_LIGHT_POSITION,
            color: Vec3::ONE,
            intensity: KEY_LIGHT_INTENSITY,
            cast_shadow: true,
            shadow_map_size: SHADOW_MAP_SIZE,
        },
        Light::Directional {
            position: FILL_LIGHT_POSITION,
            color: hex_color(0xffffff),
            intensity: FILL_LIGHT_INTENSITY,
            cast_shadow: false,
            shadow_map_size: 0,
        },
        Light::Directional {
            position: RIM_LIGHT_POSITION,
            color: hex_color(0xffffff),
            intensity: RIM_LIGHT_INTENSITY,
            cast_shadow: false,
            shadow_map_size: 0,
        },
        Light::Point {
            position: POINT_LIGHT_POSITION,
            color: hex_color(0xffffff),
            intensity: POINT_LIGHT_INTENSITY,
        },
    ]
}

pub fn lighting_node() -> SceneNode {
    let mut group = GroupNode::new("lights", Mat4::IDENTITY);
    group
        .children
        .extend(lighting_rig().into_iter().map(SceneNode::Light));
    SceneNode::Group(group)
}

/// Lights reduced to what the shader consumes. Colors are premultiplied by
/// intensity; directional entries carry the direction toward the light.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightBlock {
    pub ambient: Vec3,
    pub directional: Vec<(Vec3, Vec3, bool)>,
    pub point: Vec<(Vec3, Vec3)>,
    /// Position of the first shadow-casting directional light, if any.
    pub shadow_caster: Option<Vec3>,
}

impl LightBlock {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut block = LightBlock::default();
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => block.ambient += color * intensity,
                Light::Directional {
                    position,
                    color,
                    intensity,
                    cast_shadow,
                    ..
                } => {
                    if block.directional.len() >= MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("[lights] dropping directional light beyond {MAX_DIRECTIONAL_LIGHTS}");
                        continue;
                    }
                    let casts = cast_shadow && block.shadow_caster.is_none();
                    if casts {
                        block.shadow_caster = Some(position);
                    }
                    let dir = position.try_normalize().unwrap_or(Vec3::Y);
                    block.directional.push((dir, color * intensity, casts));
                }
                Light::Point {
                    position,
                    color,
                    intensity,
                } => {
                    if block.point.len() >= MAX_POINT_LIGHTS {
                        log::warn!("[lights] dropping point light beyond {MAX_POINT_LIGHTS}");
                        continue;
                    }
                    block.point.push((position, color * intensity));
                }
            }
        }
        block
    }
}

/// Orthographic view-projection for a directional light aimed at the origin.
pub fn shadow_view_proj(light_position: Vec3) -> Mat4 {
    let dir = light_position.try_normalize().unwrap_or(Vec3::Y);
    let eye = dir * SHADOW_DISTANCE;
    let up = if dir.abs_diff_eq(Vec3::Y, 1e-3) {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, up);
    let e = SHADOW_HALF_EXTENT;
    let proj = Mat4::orthographic_rh(-e, e, -e, e, 0.1, SHADOW_DISTANCE * 2.0);
    proj * view
}
