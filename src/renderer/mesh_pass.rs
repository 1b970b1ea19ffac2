use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::config::LightingConfig;
use crate::scene::{MeshVertex, SceneAsset, SceneGraph};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame camera and light data, group 0
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_direction: [f32; 4],
    pub light_color: [f32; 4],
    pub ambient_color: [f32; 4],
}

impl FrameUniforms {
    pub fn new(view_proj: Mat4, lighting: &LightingConfig) -> Self {
        let directional = &lighting.directional;
        // Light travels from its position towards the origin
        let direction = (-Vec3::from(directional.position))
            .try_normalize()
            .unwrap_or(Vec3::NEG_Y);
        let light = Vec3::from(directional.color) * directional.intensity;
        let ambient = Vec3::from(lighting.ambient.color) * lighting.ambient.intensity;

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_direction: direction.extend(0.0).to_array(),
            light_color: light.extend(1.0).to_array(),
            ambient_color: ambient.extend(1.0).to_array(),
        }
    }
}

/// Per-draw node data, group 1 with a dynamic offset
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
}

impl DrawUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(world: Mat4, base_color: [f32; 4]) -> Self {
        let normal_matrix = if world.determinant().abs() > f32::EPSILON {
            world.inverse().transpose()
        } else {
            world
        };
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            base_color,
        }
    }
}

/// Round `size` up to a multiple of `alignment`
pub fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

struct GpuPrimitive {
    node: usize,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    base_color: [f32; 4],
}

/// Forward pass drawing every displayed mesh node with one directional and
/// one ambient light.
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
    primitives: Vec<GpuPrimitive>,
    lighting: LightingConfig,
}

impl MeshPass {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        lighting: LightingConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("frame_bind_group_layout"),
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(DrawUniforms::SIZE),
                },
                count: None,
            }],
            label: Some("draw_bind_group_layout"),
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniforms"),
            contents: bytemuck::cast_slice(&[FrameUniforms::new(Mat4::IDENTITY, &lighting)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let draw_stride = align_to(
            DrawUniforms::SIZE,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(device, &draw_layout, draw_stride, 1);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: 1,
            primitives: Vec::new(),
            lighting,
        }
    }

    fn create_draw_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: stride * capacity.max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(DrawUniforms::SIZE),
                }),
            }],
            label: Some("draw_bind_group"),
        });

        (buffer, bind_group)
    }

    /// Create GPU buffers for every primitive of every displayed mesh node
    pub fn upload(&mut self, device: &wgpu::Device, asset: &SceneAsset) {
        self.primitives.clear();

        for (node, mesh_index) in asset.graph.mesh_nodes() {
            let Some(mesh) = asset.meshes.get(mesh_index) else {
                log::warn!("Node {} references missing mesh {}", node, mesh_index);
                continue;
            };

            for primitive in &mesh.primitives {
                if primitive.vertices.is_empty() || primitive.indices.is_empty() {
                    continue;
                }

                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Vertex Buffer"),
                    contents: bytemuck::cast_slice(&primitive.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Index Buffer"),
                    contents: bytemuck::cast_slice(&primitive.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

                self.primitives.push(GpuPrimitive {
                    node,
                    vertex_buffer,
                    index_buffer,
                    index_count: primitive.indices.len() as u32,
                    base_color: primitive.base_color,
                });
            }
        }

        if self.primitives.len() > self.draw_capacity {
            let (buffer, bind_group) = Self::create_draw_buffer(
                device,
                &self.draw_layout,
                self.draw_stride,
                self.primitives.len(),
            );
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = self.primitives.len();
        }

        log::info!("Uploaded {} primitives", self.primitives.len());
    }

    /// Write camera, light and node matrices for this frame
    pub fn prepare(&self, queue: &wgpu::Queue, graph: Option<&SceneGraph>, view_proj: Mat4) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[FrameUniforms::new(view_proj, &self.lighting)]),
        );

        let Some(graph) = graph else {
            return;
        };
        if self.primitives.is_empty() {
            return;
        }

        let stride = self.draw_stride as usize;
        let mut data = vec![0u8; stride * self.primitives.len()];
        for (i, primitive) in self.primitives.iter().enumerate() {
            let uniforms = DrawUniforms::new(graph.world(primitive.node), primitive.base_color);
            let bytes = bytemuck::bytes_of(&uniforms);
            data[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.draw_buffer, 0, &data);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.primitives.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for (i, primitive) in self.primitives.iter().enumerate() {
            let offset = (i as u64 * self.draw_stride) as u32;
            render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
            render_pass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..primitive.index_count, 0, 0..1);
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}
