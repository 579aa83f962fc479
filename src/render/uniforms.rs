use glam::{Mat4, Vec3};

pub(crate) const MAX_DIR: usize = 4;
pub(crate) const MAX_POINT: usize = 2;

/// Per-frame uniforms, mirroring `Globals` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) light_view_proj: [[f32; 4]; 4],
    pub(crate) eye: [f32; 4],
    pub(crate) ambient: [f32; 4],
    pub(crate) dir_dirs: [[f32; 4]; MAX_DIR],
    pub(crate) dir_colors: [[f32; 4]; MAX_DIR],
    pub(crate) point_pos: [[f32; 4]; MAX_POINT],
    pub(crate) point_colors: [[f32; 4]; MAX_POINT],
    pub(crate) counts: [u32; 4],
}

impl GlobalUniforms {
    /// `directional` holds (direction toward light, premultiplied color,
    /// samples shadow map); `point` holds (position, premultiplied color).
    /// Entries beyond the shader's capacity are dropped.
    pub(crate) fn new(
        view_proj: Mat4,
        light_view_proj: Mat4,
        eye: Vec3,
        ambient: Vec3,
        directional: &[(Vec3, Vec3, bool)],
        point: &[(Vec3, Vec3)],
    ) -> Self {
        let mut u = Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            ambient: ambient.extend(1.0).to_array(),
            dir_dirs: [[0.0; 4]; MAX_DIR],
            dir_colors: [[0.0; 4]; MAX_DIR],
            point_pos: [[0.0; 4]; MAX_POINT],
            point_colors: [[0.0; 4]; MAX_POINT],
            counts: [0; 4],
        };
        for (i, (dir, color, shadowed)) in directional.iter().take(MAX_DIR).enumerate() {
            u.dir_dirs[i] = dir.extend(if *shadowed { 1.0 } else { 0.0 }).to_array();
            u.dir_colors[i] = color.extend(1.0).to_array();
            u.counts[0] += 1;
        }
        for (i, (pos, color)) in point.iter().take(MAX_POINT).enumerate() {
            u.point_pos[i] = pos.extend(1.0).to_array();
            u.point_colors[i] = color.extend(1.0).to_array();
            u.counts[1] += 1;
        }
        u
    }
}

/// Per-draw uniforms, mirroring `Draw` in scene.wgsl. One slot per draw in a
/// dynamically offset buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) normal: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
    pub(crate) emissive: [f32; 4],
}

impl DrawUniforms {
    pub(crate) fn new(world: Mat4, color: Vec3, emissive: Vec3) -> Self {
        let normal = if world.determinant().abs() > f32::EPSILON {
            world.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model: world.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
            emissive: emissive.extend(0.0).to_array(),
        }
    }
}

/// Distance between consecutive draw slots, rounded up to the device's
/// dynamic offset alignment.
#[inline]
pub(crate) fn draw_slot_stride(min_alignment: u32) -> u64 {
    let size = std::mem::size_of::<DrawUniforms>() as u64;
    let align = u64::from(min_alignment.max(1));
    size.div_ceil(align) * align
}
