//! Scene renderer
//!
//! Everything is recorded into a single render pass. Each visible view sets its
//! viewport and frame uniforms, then draws terrain, landing pads, the rocket and
//! finally that camera's exhaust billboards.

use std::mem::size_of;
use std::path::Path;

use glam::Mat4;
use launch_mesh::{load_obj, MeshData, ShapeVertex, TexturedVertex};
use launch_particles::{BillboardVertex, MAX_PARTICLES, VERTICES_PER_PARTICLE};
use launch_scene::{
    build_rocket_mesh, landing_pad_transforms, normal_matrix, SceneLighting, SceneState,
    SceneView, ViewerConfig, GL_TO_WGPU_CLIP,
};
use wgpu::util::DeviceExt;
use wgpu::*;

use crate::error::Result;
use crate::texture::GpuTexture;

const CLEAR_COLOR: Color = Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};
const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
/// Split screen draws two views
const MAX_VIEWS: usize = 2;
const PARTICLE_VERTEX_CAPACITY: usize = MAX_PARTICLES * VERTICES_PER_PARTICLE;

/// Per-view uniforms shared by every pipeline (group 0)
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    /// w carries the specular shininess
    ambient: [f32; 4],
    light_positions: [[f32; 4]; 3],
    light_colors: [[f32; 4]; 3],
}

impl FrameUniforms {
    fn new(view: &SceneView, lighting: &SceneLighting) -> Self {
        let view_proj = GL_TO_WGPU_CLIP * view.camera.view_projection();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: view.camera.position.extend(1.0).to_array(),
            sun_direction: lighting.sun_direction.extend(0.0).to_array(),
            sun_color: lighting.sun_color.extend(1.0).to_array(),
            ambient: lighting.ambient.extend(lighting.shininess).to_array(),
            light_positions: lighting.point_lights.map(|l| l.position.extend(1.0).to_array()),
            light_colors: lighting.point_lights.map(|l| l.color.extend(1.0).to_array()),
        }
    }
}

/// Per-object uniforms (group 1 for terrain and lit shapes)
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ModelUniforms {
    fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: Mat4::from_mat3(normal_matrix(&model)).to_cols_array_2d(),
        }
    }
}

/// Non-indexed triangle list on the GPU
struct GpuMesh {
    vertex_buffer: Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    /// `None` for an empty vertex list
    fn new<V: bytemuck::Pod>(device: &Device, label: &str, vertices: &[V]) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }
        let vertex_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: BufferUsages::VERTEX,
        });
        Some(Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        })
    }

    fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

struct ModelBinding {
    buffer: Buffer,
    bind_group: BindGroup,
}

impl ModelBinding {
    fn new(device: &Device, layout: &BindGroupLayout, label: &str, model: Mat4) -> Self {
        let buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&ModelUniforms::new(model)),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &Queue, model: Mat4) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ModelUniforms::new(model)));
    }
}

/// Uniforms and billboard stream owned by one view
struct ViewResources {
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    particle_buffer: Buffer,
    particle_vertices: u32,
}

impl ViewResources {
    fn new(device: &Device, frame_layout: &BindGroupLayout, index: usize) -> Self {
        let frame_buffer = device.create_buffer(&BufferDescriptor {
            label: Some(&format!("frame_uniforms_{}", index)),
            size: size_of::<FrameUniforms>() as BufferAddress,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some(&format!("frame_bind_group_{}", index)),
            layout: frame_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });
        let particle_buffer = device.create_buffer(&BufferDescriptor {
            label: Some(&format!("particle_vertices_{}", index)),
            size: (PARTICLE_VERTEX_CAPACITY * size_of::<BillboardVertex>()) as BufferAddress,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            frame_buffer,
            frame_bind_group,
            particle_buffer,
            particle_vertices: 0,
        }
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    source: &'a str,
    bind_group_layouts: &'a [&'a BindGroupLayout],
    vertex_layout: VertexBufferLayout<'static>,
    blend: Option<BlendState>,
    cull_mode: Option<Face>,
    depth_write: bool,
}

fn create_pipeline(
    device: &Device,
    format: TextureFormat,
    desc: PipelineDesc<'_>,
) -> RenderPipeline {
    let shader_module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(desc.label),
        source: ShaderSource::Wgsl(desc.source.into()),
    });

    let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: VertexState {
            module: &shader_module,
            entry_point: "vs_main",
            compilation_options: Default::default(),
            buffers: &[desc.vertex_layout],
        },
        fragment: Some(FragmentState {
            module: &shader_module,
            entry_point: "fs_main",
            compilation_options: Default::default(),
            targets: &[Some(ColorTargetState {
                format,
                blend: desc.blend,
                write_mask: ColorWrites::ALL,
            })],
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn uniform_layout(device: &Device, label: &str, visibility: ShaderStages) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn texture_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("texture_bind_group_layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn texture_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    texture: &GpuTexture,
    label: &str,
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&texture.view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

fn create_depth_texture(device: &Device, size: (u32, u32)) -> TextureView {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&TextureViewDescriptor::default())
}

fn load_mesh(path: &Path) -> Result<MeshData> {
    let mesh = load_obj(path)?;
    mesh.validate()?;
    Ok(mesh)
}

/// Missing or malformed models are logged and left out of the scene
fn load_mesh_or_skip(path: &Path) -> Option<MeshData> {
    match load_mesh(path) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

pub struct SceneRenderer {
    terrain_pipeline: RenderPipeline,
    lit_pipeline: RenderPipeline,
    particle_pipeline: RenderPipeline,
    views: Vec<ViewResources>,
    terrain: Option<GpuMesh>,
    terrain_model: ModelBinding,
    terrain_texture: BindGroup,
    landing_pad: Option<GpuMesh>,
    pad_models: Vec<ModelBinding>,
    rocket: Option<GpuMesh>,
    rocket_model: ModelBinding,
    particle_texture: BindGroup,
    depth_view: TextureView,
}

impl SceneRenderer {
    pub fn new(
        device: &Device,
        queue: &Queue,
        format: TextureFormat,
        size: (u32, u32),
        config: &ViewerConfig,
    ) -> Self {
        let frame_layout = uniform_layout(
            device,
            "frame_bind_group_layout",
            ShaderStages::VERTEX | ShaderStages::FRAGMENT,
        );
        let model_layout = uniform_layout(device, "model_bind_group_layout", ShaderStages::VERTEX);
        let texture_layout = texture_layout(device);

        let terrain_pipeline = create_pipeline(
            device,
            format,
            PipelineDesc {
                label: "terrain_pipeline",
                source: include_str!("shaders/terrain.wgsl"),
                bind_group_layouts: &[&frame_layout, &model_layout, &texture_layout],
                vertex_layout: TexturedVertex::desc(),
                blend: None,
                cull_mode: Some(Face::Back),
                depth_write: true,
            },
        );
        let lit_pipeline = create_pipeline(
            device,
            format,
            PipelineDesc {
                label: "lit_pipeline",
                source: include_str!("shaders/lit.wgsl"),
                bind_group_layouts: &[&frame_layout, &model_layout],
                vertex_layout: ShapeVertex::desc(),
                blend: None,
                cull_mode: Some(Face::Back),
                depth_write: true,
            },
        );
        let particle_pipeline = create_pipeline(
            device,
            format,
            PipelineDesc {
                label: "particle_pipeline",
                source: include_str!("shaders/particle.wgsl"),
                bind_group_layouts: &[&frame_layout, &texture_layout],
                vertex_layout: BillboardVertex::desc(),
                blend: Some(BlendState::ALPHA_BLENDING),
                cull_mode: None,
                depth_write: false,
            },
        );

        let assets = &config.assets;

        let terrain = load_mesh_or_skip(&assets.path(&assets.terrain)).and_then(|mesh| {
            GpuMesh::new(device, "terrain_vertices", &mesh.to_textured_vertices())
        });
        let terrain_model =
            ModelBinding::new(device, &model_layout, "terrain_model", Mat4::IDENTITY);
        let terrain_texture =
            GpuTexture::load_or_white(device, queue, &assets.path(&assets.terrain_texture));
        let terrain_texture =
            texture_bind_group(device, &texture_layout, &terrain_texture, "terrain_texture");

        let landing_pad = load_mesh_or_skip(&assets.path(&assets.landing_pad)).and_then(|mesh| {
            GpuMesh::new(device, "landing_pad_vertices", &mesh.to_shape_vertices())
        });
        let pad_models = landing_pad_transforms()
            .iter()
            .enumerate()
            .map(|(i, model)| {
                let label = format!("landing_pad_model_{}", i);
                ModelBinding::new(device, &model_layout, &label, *model)
            })
            .collect();

        let rocket_mesh = build_rocket_mesh(config.rocket.shape_subdivisions);
        log::info!(
            "Rocket mesh: {} triangles ({} subdivisions)",
            rocket_mesh.triangle_count(),
            config.rocket.shape_subdivisions
        );
        let rocket = GpuMesh::new(device, "rocket_vertices", &rocket_mesh.to_shape_vertices());
        let rocket_model = ModelBinding::new(device, &model_layout, "rocket_model", Mat4::IDENTITY);

        let particle_texture =
            GpuTexture::load_or_white(device, queue, &assets.path(&assets.particle_texture));
        let particle_texture =
            texture_bind_group(device, &texture_layout, &particle_texture, "particle_texture");

        let views = (0..MAX_VIEWS)
            .map(|i| ViewResources::new(device, &frame_layout, i))
            .collect();

        log::info!("Scene renderer initialized");

        Self {
            terrain_pipeline,
            lit_pipeline,
            particle_pipeline,
            views,
            terrain,
            terrain_model,
            terrain_texture,
            landing_pad,
            pad_models,
            rocket,
            rocket_model,
            particle_texture,
            depth_view: create_depth_texture(device, size),
        }
    }

    pub fn resize(&mut self, device: &Device, size: (u32, u32)) {
        self.depth_view = create_depth_texture(device, size);
    }

    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        target: &TextureView,
        scene: &SceneState,
        views: &[SceneView],
    ) {
        self.rocket_model.write(queue, scene.rocket.model_matrix());

        let lighting = scene.lighting();
        for (resources, view) in self.views.iter_mut().zip(views) {
            queue.write_buffer(
                &resources.frame_buffer,
                0,
                bytemuck::bytes_of(&FrameUniforms::new(view, &lighting)),
            );

            let count = view.billboards.len().min(PARTICLE_VERTEX_CAPACITY);
            if count > 0 {
                queue.write_buffer(
                    &resources.particle_buffer,
                    0,
                    bytemuck::cast_slice(&view.billboards[..count]),
                );
            }
            resources.particle_vertices = count as u32;
        }

        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for (resources, view) in self.views.iter().zip(views) {
                let vp = view.viewport;
                if vp.width < 1.0 || vp.height < 1.0 {
                    continue;
                }
                pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
                pass.set_bind_group(0, &resources.frame_bind_group, &[]);

                if let Some(terrain) = &self.terrain {
                    pass.set_pipeline(&self.terrain_pipeline);
                    pass.set_bind_group(1, &self.terrain_model.bind_group, &[]);
                    pass.set_bind_group(2, &self.terrain_texture, &[]);
                    terrain.draw(&mut pass);
                }

                pass.set_pipeline(&self.lit_pipeline);
                if let Some(pad) = &self.landing_pad {
                    for model in &self.pad_models {
                        pass.set_bind_group(1, &model.bind_group, &[]);
                        pad.draw(&mut pass);
                    }
                }
                if let Some(rocket) = &self.rocket {
                    pass.set_bind_group(1, &self.rocket_model.bind_group, &[]);
                    rocket.draw(&mut pass);
                }

                // Last, so blending sees everything opaque behind it
                if resources.particle_vertices > 0 {
                    pass.set_pipeline(&self.particle_pipeline);
                    pass.set_bind_group(1, &self.particle_texture, &[]);
                    pass.set_vertex_buffer(0, resources.particle_buffer.slice(..));
                    pass.draw(0..resources.particle_vertices, 0..1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
