use crate::camera::{ChaseCamera, IsometricCamera};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use driftscape_common::VoxelConfig;
use driftscape_render::Viewport;
use driftscape_scene::{Cityscape, FlightScene, palette};
use glam::Mat4;
use wgpu::util::DeviceExt;

const VOXEL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const MAX_BOXES: usize = 1024;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    edge_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SeaUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: &Mat4, color: [f32; 4]) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }
}

const INSTANCE_STRIDE: u64 = std::mem::size_of::<InstanceData>() as u64;

/// Generate unit cube vertices and indices.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Line-list edges of a cube slightly larger than a slot, so edges sit outside the faces.
fn edge_mesh(size: f32) -> Vec<[f32; 3]> {
    let p = size / 2.0;
    let corners = [
        [-p, -p, -p],
        [p, -p, -p],
        [p, -p, p],
        [-p, -p, p],
        [-p, p, -p],
        [p, p, -p],
        [p, p, p],
        [-p, p, p],
    ];
    #[rustfmt::skip]
    let edges: [(usize, usize); 12] = [
        (0, 1), (1, 2), (2, 3), (3, 0), // bottom
        (4, 5), (5, 6), (6, 7), (7, 4), // top
        (0, 4), (1, 5), (2, 6), (3, 7), // sides
    ];
    edges
        .iter()
        .flat_map(|&(a, b)| [corners[a], corners[b]])
        .collect()
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];
    wgpu::VertexBufferLayout {
        array_stride: INSTANCE_STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRS,
    }
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: wgpu::TextureFormat::Depth32Float,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

struct PipelineDesc<'a> {
    label: &'static str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vs: &'static str,
    fs: &'static str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some(desc.vs),
            compilation_options: Default::default(),
            buffers: desc.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(depth_state(desc.depth_write)),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// GPU-side instance buffer with its capacity in instances.
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) as u64) * INSTANCE_STRIDE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            count: 0,
        }
    }
}

/// Sea mesh buffers; vertex positions are rewritten whenever the wave field ticks.
struct SeaMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: usize,
    index_count: u32,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    box_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,
    sea_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    sea_uniform_buffer: wgpu::Buffer,
    sea_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    edge_vertex_buffer: wgpu::Buffer,
    edge_vertex_count: u32,
    city_instances: Option<InstanceBuffer>,
    box_instances: InstanceBuffer,
    sea_mesh: Option<SeaMesh>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    /// Wireframe color, taken from the cityscape config on each sync.
    edge_color: [f32; 4],
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        viewport: &Viewport,
    ) -> Self {
        let edge_color = VoxelConfig::default().edge_color;
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                edge_color,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sea_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sea_uniform_buffer"),
            contents: bytemuck::bytes_of(&SeaUniforms {
                model: Mat4::IDENTITY.to_cols_array_2d(),
                color: palette::SEA,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sea_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sea_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let sea_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sea_bind_group"),
            layout: &sea_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sea_uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let sea_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sea_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &sea_layout],
            push_constant_ranges: &[],
        });

        let box_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("box_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BOX_SHADER.into()),
        });
        let edge_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("edge_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::EDGE_SHADER.into()),
        });
        let sea_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sea_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SEA_SHADER.into()),
        });

        let box_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "box_pipeline",
                layout: &pipeline_layout,
                shader: &box_shader,
                vs: "vs_main",
                fs: "fs_main",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    instance_layout(),
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
            },
        );

        let edge_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "edge_pipeline",
                layout: &pipeline_layout,
                shader: &edge_shader,
                vs: "vs_edge",
                fs: "fs_edge",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    instance_layout(),
                ],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                depth_write: false,
            },
        );

        let sea_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "sea_pipeline",
                layout: &sea_pipeline_layout,
                shader: &sea_shader,
                vs: "vs_sea",
                fs: "fs_sea",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                depth_write: true,
            },
        );

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let cube_index_count = cube_indices.len() as u32;

        let edge_verts = edge_mesh(1.02);
        let edge_vertex_count = edge_verts.len() as u32;
        let edge_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("edge_vertex_buffer"),
            contents: bytemuck::cast_slice(&edge_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let box_instances = InstanceBuffer::new(device, "box_instance_buffer", MAX_BOXES);
        let depth_texture = Self::create_depth_texture(device, viewport);

        Self {
            box_pipeline,
            edge_pipeline,
            sea_pipeline,
            uniform_buffer,
            uniform_bind_group,
            sea_uniform_buffer,
            sea_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count,
            edge_vertex_buffer,
            edge_vertex_count,
            city_instances: None,
            box_instances,
            sea_mesh: None,
            depth_texture,
            surface_format,
            edge_color,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, viewport: &Viewport) {
        self.depth_texture = Self::create_depth_texture(device, viewport);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Upload the cityscape's dirty instance range (everything after a rebuild).
    pub fn sync_cityscape(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &mut Cityscape) {
        self.edge_color = scene.config().edge_color;
        let instances = scene.instances_mut();
        let needed = instances.len();
        let stale = self
            .city_instances
            .as_ref()
            .is_none_or(|b| b.capacity != needed);

        let range = if stale {
            tracing::debug!(instances = needed, "allocating cityscape instance buffer");
            let mut buffer = InstanceBuffer::new(device, "city_instance_buffer", needed);
            buffer.count = needed as u32;
            self.city_instances = Some(buffer);
            instances.take_dirty();
            Some(0..needed)
        } else {
            instances.take_dirty()
        };

        let (Some(range), Some(target)) = (range, &self.city_instances) else {
            return;
        };
        if range.is_empty() {
            return;
        }
        let data: Vec<InstanceData> = instances.transforms()[range.clone()]
            .iter()
            .map(|m| InstanceData::new(m, VOXEL_COLOR))
            .collect();
        queue.write_buffer(
            &target.buffer,
            range.start as u64 * INSTANCE_STRIDE,
            bytemuck::cast_slice(&data),
        );
    }

    /// Upload sea vertices when the wave field has ticked, plus this frame's boxes.
    pub fn sync_flight(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &mut FlightScene) {
        let vertex_count = scene.sea.field.len();
        let stale = self
            .sea_mesh
            .as_ref()
            .is_none_or(|m| m.vertex_count != vertex_count);
        if stale {
            let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("sea_vertex_buffer"),
                size: (vertex_count.max(1) * std::mem::size_of::<[f32; 3]>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sea_index_buffer"),
                contents: bytemuck::cast_slice(&scene.sea.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.sea_mesh = Some(SeaMesh {
                vertex_buffer,
                index_buffer,
                vertex_count,
                index_count: scene.sea.indices.len() as u32,
            });
        }

        let dirty = scene.sea.field.take_dirty();
        if let Some(mesh) = &self.sea_mesh {
            if dirty || stale {
                let positions: Vec<[f32; 3]> = scene
                    .sea
                    .field
                    .positions()
                    .iter()
                    .map(|p| p.to_array())
                    .collect();
                queue.write_buffer(&mesh.vertex_buffer, 0, bytemuck::cast_slice(&positions));
            }
        }
        queue.write_buffer(
            &self.sea_uniform_buffer,
            0,
            bytemuck::bytes_of(&SeaUniforms {
                model: scene.sea.model_matrix().to_cols_array_2d(),
                color: palette::SEA,
            }),
        );

        let boxes = scene.boxes();
        if boxes.len() > self.box_instances.capacity {
            tracing::warn!(
                boxes = boxes.len(),
                capacity = self.box_instances.capacity,
                "dropping boxes beyond instance capacity"
            );
        }
        let data: Vec<InstanceData> = boxes
            .iter()
            .take(self.box_instances.capacity)
            .map(|b| InstanceData::new(&b.model, b.color))
            .collect();
        if !data.is_empty() {
            queue.write_buffer(&self.box_instances.buffer, 0, bytemuck::cast_slice(&data));
        }
        self.box_instances.count = data.len() as u32;
    }

    /// Draw the voxel grid: solid slots, then the wireframe pass over the same instances.
    pub fn render_cityscape(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &IsometricCamera,
    ) {
        let clear = wgpu::Color::WHITE;
        self.draw(device, queue, view, camera.view_projection(), clear, |pass| {
            let Some(instances) = &self.city_instances else {
                return;
            };
            if instances.count == 0 {
                return;
            }
            pass.set_vertex_buffer(1, instances.buffer.slice(..));

            pass.set_pipeline(&self.box_pipeline);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.cube_index_count, 0, 0..instances.count);

            pass.set_pipeline(&self.edge_pipeline);
            pass.set_vertex_buffer(0, self.edge_vertex_buffer.slice(..));
            pass.draw(0..self.edge_vertex_count, 0..instances.count);
        });
    }

    /// Draw the sea, the plane and the clouds.
    pub fn render_flight(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &ChaseCamera,
    ) {
        let clear = wgpu::Color {
            r: 0.776,
            g: 0.682,
            b: 0.533,
            a: 1.0,
        };
        self.draw(device, queue, view, camera.view_projection(), clear, |pass| {
            if let Some(mesh) = &self.sea_mesh {
                pass.set_pipeline(&self.sea_pipeline);
                pass.set_bind_group(1, &self.sea_bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if self.box_instances.count > 0 {
                pass.set_pipeline(&self.box_pipeline);
                pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.box_instances.buffer.slice(..));
                pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.cube_index_count, 0, 0..self.box_instances.count);
            }
        });
    }

    fn draw(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        view_proj: Mat4,
        clear: wgpu::Color,
        record: impl FnOnce(&mut wgpu::RenderPass<'_>),
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
                edge_color: self.edge_color,
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            record(&mut pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, viewport: &Viewport) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: viewport.width.max(1),
                height: viewport.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_mesh_is_closed() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn edge_mesh_has_twelve_lines() {
        let edges = edge_mesh(1.02);
        assert_eq!(edges.len(), 24);
        assert!(edges.iter().flatten().all(|c| (c.abs() - 0.51).abs() < 1e-6));
    }

    #[test]
    fn instance_data_round_trips_columns() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let d = InstanceData::new(&m, VOXEL_COLOR);
        assert_eq!(d.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(INSTANCE_STRIDE, 80);
    }
}
