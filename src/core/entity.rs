use super::constants::*;
use super::picking::{ray_aabb, ray_sphere, Ray};
use super::scene::{GroupNode, Material, MeshNode, Primitive, SceneNode};
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

/// Static placement of one decorative figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityPlacement {
    pub position: [f32; 3],
    /// `0xRRGGBB` sRGB torso tint.
    pub color: u32,
    pub interactive: bool,
}

/// Reference layout: figures wandering around the fortress walls. Only the
/// gatekeeper (third entry) reacts to the pointer.
pub const ENTITY_PLACEMENTS: [EntityPlacement; 5] = [
    EntityPlacement {
        position: [-9.0, 0.0, 7.0],
        color: 0xe07a5f,
        interactive: false,
    },
    EntityPlacement {
        position: [8.0, 0.0, -8.0],
        color: 0x3d405b,
        interactive: false,
    },
    EntityPlacement {
        position: [6.5, 0.0, 9.0],
        color: 0x81b29a,
        interactive: true,
    },
    EntityPlacement {
        position: [-7.5, 0.0, -9.5],
        color: 0xf2cc8f,
        interactive: false,
    },
    EntityPlacement {
        position: [11.0, 0.0, 1.5],
        color: 0x9a8c98,
        interactive: false,
    },
];

/// What a click on an entity asks the scene root to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneAction {
    OpenDialog,
}

/// Anything that advances with the shared frame clock.
pub trait Animated {
    fn tick(&mut self, elapsed: f32);
}

#[inline]
pub fn idle_offset(elapsed: f32) -> f32 {
    BOB_AMPLITUDE * (elapsed * BOB_FREQUENCY).sin()
}

#[inline]
pub fn idle_yaw(elapsed: f32) -> f32 {
    SWAY_AMPLITUDE * (elapsed * SWAY_FREQUENCY).sin()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.yaw), self.translation)
    }
}

#[derive(Clone, Debug)]
pub struct AnimatedEntity {
    placement: EntityPlacement,
    hovered: bool,
    on_click: Option<SceneAction>,
    pose: Pose,
}

impl AnimatedEntity {
    /// `on_click` is only kept for interactive placements.
    pub fn new(placement: EntityPlacement, on_click: Option<SceneAction>) -> Self {
        let base = Vec3::from_array(placement.position);
        Self {
            placement,
            hovered: false,
            on_click: on_click.filter(|_| placement.interactive),
            pose: Pose {
                translation: base,
                yaw: 0.0,
            },
        }
    }

    pub fn placement(&self) -> &EntityPlacement {
        &self.placement
    }

    pub fn is_interactive(&self) -> bool {
        self.placement.interactive
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn base_position(&self) -> Vec3 {
        Vec3::from_array(self.placement.position)
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Returns true when the hover state changed.
    pub fn pointer_enter(&mut self) -> bool {
        if !self.placement.interactive || self.hovered {
            return false;
        }
        self.hovered = true;
        self.pose = self.rest_pose();
        true
    }

    pub fn pointer_leave(&mut self) -> bool {
        if !self.placement.interactive || !self.hovered {
            return false;
        }
        self.hovered = false;
        true
    }

    pub fn click(&self) -> Option<SceneAction> {
        if !self.placement.interactive {
            return None;
        }
        self.on_click
    }

    fn rest_pose(&self) -> Pose {
        Pose {
            translation: self.base_position(),
            yaw: 0.0,
        }
    }

    /// Distance along `ray` to the figure's torso or head. Non-interactive
    /// figures are transparent to the pointer.
    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        if !self.placement.interactive {
            return None;
        }
        let local = ray.to_local(self.pose.matrix());
        let torso = ray_aabb(
            &local,
            Vec3::new(0.0, TORSO_CENTER_Y, 0.0),
            TORSO_SIZE * 0.5,
        );
        let head = ray_sphere(&local, Vec3::new(0.0, HEAD_CENTER_Y, 0.0), HEAD_RADIUS);
        match (torso, head) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn torso_material(&self) -> Material {
        let base = hex_color(self.placement.color);
        if self.hovered {
            let lighter = base.lerp(Vec3::ONE, HOVER_LIGHTEN);
            Material::glowing(lighter, lighter, HOVER_EMISSIVE_INTENSITY)
        } else {
            Material::flat(base)
        }
    }

    fn head_material(&self) -> Material {
        let base = hex_color(HEAD_COLOR);
        if self.hovered {
            let lighter = base.lerp(Vec3::ONE, HOVER_LIGHTEN);
            Material::glowing(lighter, lighter, HOVER_EMISSIVE_INTENSITY)
        } else {
            Material::flat(base)
        }
    }

    /// Meshes in figure-local space: torso, head, and the marker while hovered.
    pub fn parts(&self) -> SmallVec<[MeshNode; 3]> {
        let mut parts = SmallVec::new();
        parts.push(MeshNode::primitive(
            Primitive::Cuboid { size: TORSO_SIZE },
            Vec3::new(0.0, TORSO_CENTER_Y, 0.0),
            self.torso_material(),
        ));
        parts.push(MeshNode::primitive(
            Primitive::Sphere {
                radius: HEAD_RADIUS,
            },
            Vec3::new(0.0, HEAD_CENTER_Y, 0.0),
            self.head_material(),
        ));
        if self.hovered {
            let marker = hex_color(MARKER_COLOR);
            parts.push(MeshNode::primitive(
                Primitive::Sphere {
                    radius: MARKER_RADIUS,
                },
                Vec3::new(0.0, MARKER_CENTER_Y, 0.0),
                Material::glowing(marker, marker, 1.0),
            ));
        }
        parts
    }

    pub fn node(&self) -> SceneNode {
        let mut group = GroupNode::new("entity", self.pose.matrix());
        group
            .children
            .extend(self.parts().into_iter().map(SceneNode::Mesh));
        SceneNode::Group(group)
    }
}

impl Animated for AnimatedEntity {
    fn tick(&mut self, elapsed: f32) {
        if self.hovered {
            self.pose = self.rest_pose();
            return;
        }
        let mut translation = self.base_position();
        translation.y += idle_offset(elapsed);
        self.pose = Pose {
            translation,
            yaw: idle_yaw(elapsed),
        };
    }
}

/// Fixed, ordered set of figures. Also the registration list the frame clock
/// ticks.
#[derive(Clone, Debug, Default)]
pub struct EntitySet {
    entities: Vec<AnimatedEntity>,
}

impl EntitySet {
    /// Every interactive placement gets `on_interact` as its click action.
    pub fn from_placements(placements: &[EntityPlacement], on_interact: SceneAction) -> Self {
        Self {
            entities: placements
                .iter()
                .map(|p| AnimatedEntity::new(*p, Some(on_interact)))
                .collect(),
        }
    }

    pub fn reference(on_interact: SceneAction) -> Self {
        Self::from_placements(&ENTITY_PLACEMENTS, on_interact)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AnimatedEntity> {
        self.entities.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimatedEntity> {
        self.entities.iter()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.is_hovered())
    }

    /// Nearest interactive figure under `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<usize> {
        let mut best = None::<(usize, f32)>;
        for (i, e) in self.entities.iter().enumerate() {
            if let Some(t) = e.hit(ray) {
                match best {
                    Some((_, bt)) if t >= bt => {}
                    _ => best = Some((i, t)),
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Move hover to `index` (or clear it). Returns true if anything changed.
    pub fn set_hovered(&mut self, index: Option<usize>) -> bool {
        let mut changed = false;
        for (i, e) in self.entities.iter_mut().enumerate() {
            changed |= if Some(i) == index {
                e.pointer_enter()
            } else {
                e.pointer_leave()
            };
        }
        changed
    }

    pub fn click(&self, index: usize) -> Option<SceneAction> {
        self.entities.get(index).and_then(|e| e.click())
    }

    pub fn node(&self) -> SceneNode {
        let mut group = GroupNode::new("entities", Mat4::IDENTITY);
        group
            .children
            .extend(self.entities.iter().map(|e| e.node()));
        SceneNode::Group(group)
    }
}

impl Animated for EntitySet {
    fn tick(&mut self, elapsed: f32) {
        for e in &mut self.entities {
            e.tick(elapsed);
        }
    }
}
