use crate::constants::{CLEAR_COLOR, INITIAL_DRAW_SLOTS, SPHERE_RINGS, SPHERE_SEGMENTS};
use crate::core::{
    shadow_view_proj, unit_cube, unit_sphere, Camera, DrawItem, FlatScene, LightBlock,
    MeshSource, ModelScene, Primitive, SHADOW_MAP_SIZE,
};
use glam::Mat4;
use web_sys as web;

mod gpu_mesh;
mod helpers;
mod targets;
mod uniforms;
use gpu_mesh::{GpuMesh, GpuTexture};
use targets::RenderTargets;
use uniforms::{draw_slot_stride, DrawUniforms, GlobalUniforms};

struct ModelMeshGpu {
    mesh: GpuMesh,
    texture: Option<usize>,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,

    scene_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    // group 0 for the camera pass: globals + shadow map
    scene_globals_bg: wgpu::BindGroup,
    // group 0 for the shadow pass: globals only
    shadow_globals_bg: wgpu::BindGroup,

    draw_bgl: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bg: wgpu::BindGroup,
    draw_stride: u64,
    draw_slots: usize,
    draw_staging: Vec<u8>,

    texture_bgl: wgpu::BindGroupLayout,
    texture_sampler: wgpu::Sampler,
    white: GpuTexture,

    cube: GpuMesh,
    sphere: GpuMesh,
    model_meshes: Vec<ModelMeshGpu>,
    model_textures: Vec<Option<GpuTexture>>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height, SHADOW_MAP_SIZE);
        log::info!(
            "[gpu] surface {}x{} {:?}, shadow map {}",
            width,
            height,
            format,
            targets.shadow_size()
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });

        // Bind group layouts
        let vs_fs = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let scene_globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_globals_bgl"),
            entries: &[
                helpers::uniform_entry(0, vs_fs, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let shadow_globals_bgl =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shadow_globals_bgl"),
                entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX, false)],
            });
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[helpers::uniform_entry(0, vs_fs, true)],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pipelines
        let scene_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&scene_globals_bgl, &draw_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let shadow_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pl"),
            bind_group_layouts: &[&shadow_globals_bgl, &draw_bgl],
            push_constant_ranges: &[],
        });
        let scene_pipeline = helpers::make_scene_pipeline(&device, &scene_pl, &shader, format);
        let shadow_pipeline = helpers::make_shadow_pipeline(&device, &shadow_pl, &shader);

        // Uniforms
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        let scene_globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_globals_bg"),
            layout: &scene_globals_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_globals_bg"),
            layout: &shadow_globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let draw_stride = draw_slot_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (draw_buffer, draw_bg) =
            create_draw_slots(&device, &draw_bgl, draw_stride, INITIAL_DRAW_SLOTS);

        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let white = GpuTexture::white(&device, &queue, &texture_bgl, &texture_sampler);

        let cube = GpuMesh::upload(&device, "cube", &unit_cube());
        let sphere = GpuMesh::upload(&device, "sphere", &unit_sphere(SPHERE_SEGMENTS, SPHERE_RINGS));

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            scene_pipeline,
            shadow_pipeline,
            globals_buffer,
            scene_globals_bg,
            shadow_globals_bg,
            draw_bgl,
            draw_buffer,
            draw_bg,
            draw_stride,
            draw_slots: INITIAL_DRAW_SLOTS,
            draw_staging: Vec::new(),
            texture_bgl,
            texture_sampler,
            white,
            cube,
            sphere,
            model_meshes: Vec::new(),
            model_textures: Vec::new(),
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: CLEAR_COLOR[3],
            },
        })
    }

    /// Upload the loaded model's meshes and images. Replaces any previous model.
    pub fn upload_model(&mut self, model: &ModelScene) {
        self.model_textures = model
            .textures
            .iter()
            .enumerate()
            .map(|(i, tex)| {
                tex.as_ref().map(|t| {
                    GpuTexture::from_rgba(
                        &self.device,
                        &self.queue,
                        &self.texture_bgl,
                        &self.texture_sampler,
                        &format!("model_tex_{i}"),
                        t,
                    )
                })
            })
            .collect();
        self.model_meshes = model
            .meshes
            .iter()
            .enumerate()
            .map(|(i, m)| ModelMeshGpu {
                mesh: GpuMesh::upload(&self.device, &format!("model_mesh_{i}"), &m.data),
                texture: m.texture,
            })
            .collect();
        log::info!(
            "[gpu] uploaded {} model meshes ({} vertices), {} textures",
            self.model_meshes.len(),
            model.meshes.iter().map(|m| m.data.vertex_count()).sum::<usize>(),
            self.model_textures.iter().flatten().count()
        );
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
        }
    }

    pub fn render(&mut self, camera: &Camera, scene: &FlatScene) -> Result<(), wgpu::SurfaceError> {
        let lights = LightBlock::from_lights(&scene.lights);
        let light_view_proj = lights
            .shadow_caster
            .map(shadow_view_proj)
            .unwrap_or(Mat4::IDENTITY);
        let globals = GlobalUniforms::new(
            camera.view_proj(),
            light_view_proj,
            camera.eye,
            lights.ambient,
            &lights.directional,
            &lights.point,
        );
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.write_draw_slots(&scene.draws);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        if lights.shadow_caster.is_some() {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.shadow_pipeline);
            rpass.set_bind_group(0, &self.shadow_globals_bg, &[]);
            for (slot, item) in scene.draws.iter().enumerate() {
                let Some((mesh, _)) = self.resolve(item) else {
                    continue;
                };
                rpass.set_bind_group(1, &self.draw_bg, &[self.slot_offset(slot)]);
                mesh.draw(&mut rpass);
            }
        }

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.scene_pipeline);
            rpass.set_bind_group(0, &self.scene_globals_bg, &[]);
            for (slot, item) in scene.draws.iter().enumerate() {
                let Some((mesh, texture)) = self.resolve(item) else {
                    continue;
                };
                rpass.set_bind_group(1, &self.draw_bg, &[self.slot_offset(slot)]);
                rpass.set_bind_group(2, &texture.bind_group, &[]);
                mesh.draw(&mut rpass);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl<'a> GpuState<'a> {
    fn resolve(&self, item: &DrawItem) -> Option<(&GpuMesh, &GpuTexture)> {
        match item.source {
            MeshSource::Primitive(Primitive::Cuboid { .. }) => Some((&self.cube, &self.white)),
            MeshSource::Primitive(Primitive::Sphere { .. }) => Some((&self.sphere, &self.white)),
            MeshSource::Model(i) => {
                let m = self.model_meshes.get(i)?;
                let texture = m
                    .texture
                    .and_then(|t| self.model_textures.get(t))
                    .and_then(Option::as_ref)
                    .unwrap_or(&self.white);
                Some((&m.mesh, texture))
            }
        }
    }

    #[inline]
    fn slot_offset(&self, slot: usize) -> u32 {
        (slot as u64 * self.draw_stride) as u32
    }

    fn write_draw_slots(&mut self, draws: &[DrawItem]) {
        if draws.len() > self.draw_slots {
            let slots = draws.len().next_power_of_two();
            (self.draw_buffer, self.draw_bg) =
                create_draw_slots(&self.device, &self.draw_bgl, self.draw_stride, slots);
            self.draw_slots = slots;
            log::debug!("[gpu] draw slots grown to {}", slots);
        }
        let stride = self.draw_stride as usize;
        self.draw_staging.clear();
        self.draw_staging.resize(draws.len() * stride, 0);
        for (slot, item) in draws.iter().enumerate() {
            let u = DrawUniforms::new(item.world, item.material.color, item.material.emitted());
            let start = slot * stride;
            let bytes = bytemuck::bytes_of(&u);
            self.draw_staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !self.draw_staging.is_empty() {
            self.queue
                .write_buffer(&self.draw_buffer, 0, &self.draw_staging);
        }
    }
}

fn create_draw_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw_uniforms"),
        size: stride * slots.max(1) as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}
