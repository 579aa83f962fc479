use glam::{Mat4, Vec3};

// Typed scene-graph descriptors. The scene root rebuilds this tree every frame
// from its state; the renderer only ever sees the flattened form.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Cuboid { size: Vec3 },
    Sphere { radius: f32 },
}

impl Primitive {
    /// Scale that maps the unit mesh of this primitive onto its dimensions.
    pub fn unit_scale(&self) -> Vec3 {
        match *self {
            Primitive::Cuboid { size } => size,
            Primitive::Sphere { radius } => Vec3::splat(radius),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeshSource {
    Primitive(Primitive),
    /// Index into the loaded model's mesh list.
    Model(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Linear RGB base color.
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl Material {
    pub fn flat(color: Vec3) -> Self {
        Self {
            color,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
        }
    }

    pub fn glowing(color: Vec3, emissive: Vec3, intensity: f32) -> Self {
        Self {
            color,
            emissive,
            emissive_intensity: intensity,
        }
    }

    #[inline]
    pub fn emitted(&self) -> Vec3 {
        self.emissive * self.emissive_intensity
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Vec3,
        intensity: f32,
    },
    /// Shines from `position` toward the origin.
    Directional {
        position: Vec3,
        color: Vec3,
        intensity: f32,
        cast_shadow: bool,
        shadow_map_size: u32,
    },
    Point {
        position: Vec3,
        color: Vec3,
        intensity: f32,
    },
}

impl Light {
    fn transformed(self, world: Mat4) -> Self {
        match self {
            Light::Ambient { .. } => self,
            Light::Directional {
                position,
                color,
                intensity,
                cast_shadow,
                shadow_map_size,
            } => Light::Directional {
                position: world.transform_point3(position),
                color,
                intensity,
                cast_shadow,
                shadow_map_size,
            },
            Light::Point {
                position,
                color,
                intensity,
            } => Light::Point {
                position: world.transform_point3(position),
                color,
                intensity,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    pub source: MeshSource,
    /// Local transform. For primitives this already includes the unit scale.
    pub transform: Mat4,
    pub material: Material,
}

impl MeshNode {
    pub fn primitive(primitive: Primitive, center: Vec3, material: Material) -> Self {
        Self {
            source: MeshSource::Primitive(primitive),
            transform: Mat4::from_scale_rotation_translation(
                primitive.unit_scale(),
                glam::Quat::IDENTITY,
                center,
            ),
            material,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupNode {
    pub label: &'static str,
    pub transform: Mat4,
    pub children: Vec<SceneNode>,
}

impl GroupNode {
    pub fn new(label: &'static str, transform: Mat4) -> Self {
        Self {
            label,
            transform,
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Light(Light),
    Mesh(MeshNode),
    Group(GroupNode),
}

/// A mesh with its transform resolved to world space.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub source: MeshSource,
    pub world: Mat4,
    pub material: Material,
}

#[derive(Clone, Debug, Default)]
pub struct FlatScene {
    pub lights: Vec<Light>,
    pub draws: Vec<DrawItem>,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn flatten(&self) -> FlatScene {
        let mut out = FlatScene::default();
        for node in &self.nodes {
            flatten_into(node, Mat4::IDENTITY, &mut out);
        }
        out
    }
}

fn flatten_into(node: &SceneNode, parent: Mat4, out: &mut FlatScene) {
    match node {
        SceneNode::Light(light) => out.lights.push(light.transformed(parent)),
        SceneNode::Mesh(mesh) => out.draws.push(DrawItem {
            source: mesh.source,
            world: parent * mesh.transform,
            material: mesh.material,
        }),
        SceneNode::Group(group) => {
            let world = parent * group.transform;
            for child in &group.children {
                flatten_into(child, world, out);
            }
        }
    }
}
