// Host-side tests for scene flattening, lighting reduction, generated meshes
// and the GPU uniform layouts.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod viewer {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod geometry {
        include!("../src/core/geometry.rs");
    }
    pub mod lighting {
        include!("../src/core/lighting.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
}
mod uniforms {
    include!("../src/render/uniforms.rs");
}

use glam::{Mat4, Vec3};
use uniforms::*;
use viewer::geometry::*;
use viewer::lighting::*;
use viewer::scene::*;

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

#[test]
fn unit_cube_has_flat_faces() {
    let cube = unit_cube();
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.triangle_count(), 12);
    for p in &cube.positions {
        assert!(p.iter().all(|c| c.abs() <= 0.5 + 1e-6));
    }
    // every triangle winds outward, matching its stored normal
    for tri in cube.indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| Vec3::from_array(cube.positions[tri[k] as usize]));
        let n = Vec3::from_array(cube.normals[tri[0] as usize]);
        assert!((b - a).cross(c - a).dot(n) > 0.0);
    }
}

#[test]
fn unit_sphere_vertices_lie_on_radius_one() {
    let sphere = unit_sphere(12, 8);
    assert_eq!(sphere.vertex_count(), 13 * 9);
    assert_eq!(sphere.triangle_count(), 12 * 8 * 2);
    for p in &sphere.positions {
        assert!((Vec3::from_array(*p).length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn computed_normals_fall_back_to_up() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
    let normals = compute_normals(&positions, &[0, 1, 2]);
    assert!(normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
}

#[test]
fn flatten_composes_group_transforms() {
    let mut inner = GroupNode::new("inner", Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
    inner.children.push(SceneNode::Mesh(MeshNode::primitive(
        Primitive::Sphere { radius: 0.5 },
        Vec3::new(1.0, 0.0, 0.0),
        Material::flat(Vec3::ONE),
    )));
    inner.children.push(SceneNode::Light(Light::Point {
        position: Vec3::ZERO,
        color: Vec3::ONE,
        intensity: 1.0,
    }));
    let mut outer = GroupNode::new("outer", Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
    outer.children.push(SceneNode::Group(inner));

    let mut scene = Scene::default();
    scene.push(SceneNode::Group(outer));
    assert!(find_group(&scene, "inner").is_some());
    assert!(find_group(&scene, "missing").is_none());

    let flat = scene.flatten();
    assert_eq!(flat.draws.len(), 1);
    let centre = flat.draws[0].world.transform_point3(Vec3::ZERO);
    assert!(centre.abs_diff_eq(Vec3::new(11.0, 2.0, 0.0), 1e-6));
    // unit scale is baked into the mesh transform
    let rim = flat.draws[0].world.transform_point3(Vec3::X);
    assert!(((rim - centre).length() - 0.5).abs() < 1e-6);

    match flat.lights[0] {
        Light::Point { position, .. } => {
            assert!(position.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-6))
        }
        other => panic!("unexpected light {:?}", other),
    }
}

#[test]
fn light_block_premultiplies_and_marks_one_shadow_caster() {
    let block = LightBlock::from_lights(&lighting_rig());
    assert!(block.ambient.abs_diff_eq(Vec3::splat(0.4), 1e-6));
    assert_eq!(block.directional.len(), 3);
    assert_eq!(block.point.len(), 1);
    assert_eq!(block.directional.iter().filter(|d| d.2).count(), 1);
    assert_eq!(block.shadow_caster, Some(Vec3::new(10.0, 10.0, 5.0)));

    let (dir, color, _) = block.directional[0];
    assert!((dir.length() - 1.0).abs() < 1e-5);
    assert!(color.abs_diff_eq(Vec3::splat(1.2), 1e-6));
}

#[test]
fn light_block_caps_directional_lights() {
    let extra = Light::Directional {
        position: Vec3::Y,
        color: Vec3::ONE,
        intensity: 1.0,
        cast_shadow: true,
        shadow_map_size: 512,
    };
    let block = LightBlock::from_lights(&[extra; 6]);
    assert_eq!(block.directional.len(), MAX_DIRECTIONAL_LIGHTS);
    // only the first shadow caster samples the map
    assert_eq!(block.directional.iter().filter(|d| d.2).count(), 1);
}

#[test]
fn shadow_projection_keeps_origin_in_view() {
    let vp = shadow_view_proj(Vec3::new(10.0, 10.0, 5.0));
    let clip = vp * Vec3::ZERO.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn uniform_layouts_match_the_shader() {
    assert_eq!(std::mem::size_of::<DrawUniforms>(), 160);
    assert_eq!(std::mem::size_of::<GlobalUniforms>(), 368);
    assert_eq!(std::mem::size_of::<GlobalUniforms>() % 16, 0);
}

#[test]
fn draw_slots_respect_offset_alignment() {
    assert_eq!(draw_slot_stride(256), 256);
    assert_eq!(draw_slot_stride(64), 192);
    assert_eq!(draw_slot_stride(0), 160);
}

#[test]
fn global_uniforms_pack_light_counts() {
    let block = LightBlock::from_lights(&lighting_rig());
    let u = GlobalUniforms::new(
        Mat4::IDENTITY,
        Mat4::IDENTITY,
        Vec3::new(0.0, 15.0, 30.0),
        block.ambient,
        &block.directional,
        &block.point,
    );
    assert_eq!(u.counts[0], 3);
    assert_eq!(u.counts[1], 1);
    assert_eq!(u.dir_dirs[0][3], 1.0);
    assert_eq!(u.dir_dirs[1][3], 0.0);
    assert_eq!(u.eye, [0.0, 15.0, 30.0, 1.0]);
}

#[test]
fn draw_uniforms_carry_material() {
    let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let u = DrawUniforms::new(world, Vec3::new(0.5, 0.25, 1.0), Vec3::splat(0.1));
    assert_eq!(u.color, [0.5, 0.25, 1.0, 1.0]);
    assert_eq!(u.emissive[..3], [0.1, 0.1, 0.1]);
    assert_eq!(u.model, world.to_cols_array_2d());
    // translation does not affect normals
    let normal = Mat4::from_cols_array_2d(&u.normal);
    assert!(normal.transform_vector3(Vec3::Y).abs_diff_eq(Vec3::Y, 1e-6));

    let flat = DrawUniforms::new(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)), Vec3::ONE, Vec3::ZERO);
    assert_eq!(flat.normal, Mat4::IDENTITY.to_cols_array_2d());
}
