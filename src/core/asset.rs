use super::constants::*;
use super::geometry::{compute_normals, MeshData};
use super::scene::{GroupNode, Material, MeshNode, MeshSource, Primitive, SceneNode};
use glam::{Mat4, Vec3, Vec4};

/// The one failure the viewer knows about: the model could not be fetched or
/// parsed.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("fetch of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("model is not valid glTF: {0}")]
    Parse(#[from] gltf::Error),
    #[error("buffer {0} is not embedded in the .glb container")]
    ExternalBuffer(usize),
    #[error("model contains no drawable triangles")]
    Empty,
}

/// Decoded RGBA8 image, sRGB encoded.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub name: Option<String>,
    pub data: MeshData,
    /// Node transform accumulated down the glTF hierarchy.
    pub transform: Mat4,
    /// Linear RGBA base color factor.
    pub base_color: Vec4,
    /// Index into `ModelScene::textures`.
    pub texture: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelScene {
    pub meshes: Vec<ModelMesh>,
    pub textures: Vec<Option<ModelTexture>>,
}

impl ModelScene {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.data.triangle_count()).sum()
    }

    pub fn node(&self) -> SceneNode {
        let mut group = GroupNode::new("model", Mat4::from_scale(Vec3::splat(MODEL_SCALE)));
        group
            .children
            .extend(self.meshes.iter().enumerate().map(|(i, m)| {
                SceneNode::Mesh(MeshNode {
                    source: MeshSource::Model(i),
                    transform: m.transform,
                    material: Material::flat(m.base_color.truncate()),
                })
            }));
        SceneNode::Group(group)
    }
}

/// Parse a binary glTF container into flat meshes.
pub fn parse_glb(bytes: &[u8]) -> Result<ModelScene, AssetLoadError> {
    let gltf = gltf::Gltf::from_slice(bytes)?;

    let mut buffers: Vec<&[u8]> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffers.push(blob),
                None => return Err(AssetLoadError::ExternalBuffer(buffer.index())),
            },
            gltf::buffer::Source::Uri(_) => {
                return Err(AssetLoadError::ExternalBuffer(buffer.index()))
            }
        }
    }

    let textures = gltf
        .images()
        .map(|image| decode_image(&image, &buffers))
        .collect::<Vec<_>>();

    let mut scene = ModelScene {
        meshes: Vec::new(),
        textures,
    };
    let root = gltf.default_scene().or_else(|| gltf.scenes().next());
    match root {
        Some(root) => {
            for node in root.nodes() {
                visit_node(&node, Mat4::IDENTITY, &buffers, &mut scene);
            }
        }
        None => {
            // no scene list: start from every node that is nobody's child
            let children: Vec<usize> = gltf
                .nodes()
                .flat_map(|n| n.children().map(|c| c.index()).collect::<Vec<_>>())
                .collect();
            for node in gltf.nodes().filter(|n| !children.contains(&n.index())) {
                visit_node(&node, Mat4::IDENTITY, &buffers, &mut scene);
            }
        }
    }

    if scene.meshes.is_empty() {
        return Err(AssetLoadError::Empty);
    }
    log::info!(
        "[asset] parsed {} meshes, {} triangles, {} images",
        scene.meshes.len(),
        scene.triangle_count(),
        scene.textures.len()
    );
    Ok(scene)
}

fn decode_image(source: &gltf::Image<'_>, buffers: &[&[u8]]) -> Option<ModelTexture> {
    match source.source() {
        gltf::image::Source::View { view, .. } => {
            let buffer = buffers.get(view.buffer().index())?;
            let bytes = buffer.get(view.offset()..view.offset() + view.length())?;
            match image::load_from_memory(bytes) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    Some(ModelTexture {
                        width: rgba.width(),
                        height: rgba.height(),
                        rgba: rgba.into_raw(),
                    })
                }
                Err(e) => {
                    log::warn!("[asset] image {} could not be decoded: {}", source.index(), e);
                    None
                }
            }
        }
        gltf::image::Source::Uri { uri, .. } => {
            log::warn!("[asset] image {} references external {}; skipped", source.index(), uri);
            None
        }
    }
}

fn visit_node(node: &gltf::Node<'_>, parent: Mat4, buffers: &[&[u8]], out: &mut ModelScene) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "[asset] mesh {} uses {:?}; only triangle lists are drawn",
                    mesh.index(),
                    primitive.mode()
                );
                continue;
            }
            if let Some(model_mesh) = read_primitive(&primitive, buffers) {
                out.meshes.push(ModelMesh {
                    name: node.name().or(mesh.name()).map(str::to_owned),
                    transform: world,
                    ..model_mesh
                });
            }
        }
    }
    for child in node.children() {
        visit_node(&child, world, buffers, out);
    }
}

fn read_primitive(primitive: &gltf::Primitive<'_>, buffers: &[&[u8]]) -> Option<ModelMesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).copied());
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let normals = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None => compute_normals(&positions, &indices),
    };
    let uvs = match reader.read_tex_coords(0) {
        Some(uvs) => uvs.into_f32().collect(),
        None => vec![[0.0, 0.0]; positions.len()],
    };

    let pbr = primitive.material().pbr_metallic_roughness();
    let texture = pbr
        .base_color_texture()
        .map(|info| info.texture().source().index());

    Some(ModelMesh {
        name: None,
        data: MeshData {
            positions,
            normals,
            uvs,
            indices,
        },
        transform: Mat4::IDENTITY,
        base_color: Vec4::from_array(pbr.base_color_factor()),
        texture,
    })
}

/// Load state of the model subtree.
#[derive(Clone, Debug, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready(ModelScene),
    /// Load error flag; never reset.
    Failed,
}

impl AssetState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AssetState::Pending)
    }

    pub fn model(&self) -> Option<&ModelScene> {
        match self {
            AssetState::Ready(m) => Some(m),
            _ => None,
        }
    }

    /// Settle the one load attempt. Later results are ignored.
    pub fn complete(&mut self, result: Result<ModelScene, AssetLoadError>) {
        if !self.is_pending() {
            log::warn!("[asset] ignoring a second load result");
            return;
        }
        *self = match result {
            Ok(model) => {
                log::info!("[asset] model ready ({} meshes)", model.meshes.len());
                AssetState::Ready(model)
            }
            Err(e) => {
                log::error!("[asset] load failed, showing fallback: {}", e);
                AssetState::Failed
            }
        };
    }

    /// The model subtree: nothing while pending, the model when ready, the
    /// two fallback boxes after a failure.
    pub fn node(&self) -> Option<SceneNode> {
        match self {
            AssetState::Pending => None,
            AssetState::Ready(model) => Some(model.node()),
            AssetState::Failed => Some(fallback_node()),
        }
    }
}

pub fn fallback_node() -> SceneNode {
    let mut group = GroupNode::new("fallback", Mat4::IDENTITY);
    group.children.push(SceneNode::Mesh(MeshNode::primitive(
        Primitive::Cuboid {
            size: Vec3::splat(FALLBACK_BASE_SIZE),
        },
        Vec3::ZERO,
        Material::flat(hex_color(FALLBACK_BASE_COLOR)),
    )));
    group.children.push(SceneNode::Mesh(MeshNode::primitive(
        Primitive::Cuboid {
            size: Vec3::splat(FALLBACK_TOP_SIZE),
        },
        Vec3::new(0.0, FALLBACK_TOP_Y, 0.0),
        Material::flat(hex_color(FALLBACK_TOP_COLOR)),
    )));
    SceneNode::Group(group)
}
