use crate::error::RenderError;
use crate::shaders;
use crate::texture::{GpuTexture, TextureImage, TextureLoader, fallback_color};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::collections::HashMap;
use std::ops::Range;
use std::path::PathBuf;
use virtworld_common::MeshId;
use virtworld_kernel::OffsetCache;
use virtworld_render::{Camera, ColorSource, DrawCommand, DrawList, Shape, TextureSlot};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

/// Model matrix and material for one non-instanced draw.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SingleInstance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    color_src: u32,
    _pad: [u32; 3],
}

impl SingleInstance {
    fn new(model: Mat4, source: ColorSource) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: source.flat_color().to_rgba().to_array(),
            color_src: source.shader_code(),
            _pad: [0; 3],
        }
    }
}

/// Material for one instanced draw, bound at a dynamic offset.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
    color_src: u32,
    _pad: [u32; 3],
}

impl MaterialUniform {
    fn new(source: ColorSource) -> Self {
        Self {
            color: source.flat_color().to_rgba().to_array(),
            color_src: source.shader_code(),
            _pad: [0; 3],
        }
    }
}

const SINGLE_STRIDE: u64 = std::mem::size_of::<SingleInstance>() as u64;
const MATERIAL_SIZE: u64 = std::mem::size_of::<MaterialUniform>() as u64;
const OFFSET_STRIDE: u64 = std::mem::size_of::<[f32; 3]>() as u64;

struct GpuMesh {
    buffer: wgpu::Buffer,
}

/// Offset buffer for one instanced mesh, tagged with the cache generation it
/// was built from.
struct OffsetUpload {
    generation: u64,
    buffer: Option<wgpu::Buffer>,
    count: u32,
}

/// A buffer that grows by doubling and never shrinks.
struct GrowBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl GrowBuffer {
    fn new(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        capacity: u64,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage,
            mapped_at_creation: false,
        });
        Self {
            label,
            usage,
            buffer,
            capacity,
        }
    }

    /// Make room for `needed` bytes. Returns true when the buffer was replaced.
    fn reserve(&mut self, device: &wgpu::Device, needed: u64) -> Result<bool, RenderError> {
        if needed <= self.capacity {
            return Ok(false);
        }
        let limit = device.limits().max_buffer_size;
        if needed > limit {
            return Err(RenderError::InstanceBufferTooLarge { needed, limit });
        }
        let capacity = needed.next_power_of_two().min(limit);
        tracing::debug!("growing {} to {capacity} bytes", self.label);
        *self = Self::new(device, self.label, self.usage, capacity);
        Ok(true)
    }
}

enum PlannedDraw {
    Single {
        mesh: MeshId,
        vertices: Range<u32>,
        instance: u64,
    },
    Instanced {
        mesh: MeshId,
        vertices: Range<u32>,
        material: u32,
        count: u32,
    },
}

/// wgpu scene renderer.
///
/// Meshes are uploaded the first time a draw list references them and kept
/// for the renderer's lifetime. Instance offsets are re-uploaded only when
/// the cache generation changes.
pub struct WgpuRenderer {
    single_pipeline: wgpu::RenderPipeline,
    instanced_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    material_stride: u64,
    materials: GrowBuffer,
    material_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    textures: [GpuTexture; 2],
    texture_bind_group: wgpu::BindGroup,
    singles: GrowBuffer,
    meshes: HashMap<MeshId, GpuMesh>,
    offsets: HashMap<MeshId, OffsetUpload>,
    loader: TextureLoader,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(MATERIAL_SIZE),
                },
                count: None,
            }],
        });
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let material_stride = MATERIAL_SIZE.div_ceil(alignment) * alignment;
        let materials = GrowBuffer::new(
            device,
            "material_buffer",
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            material_stride * 8,
        );
        let material_bind_group = Self::material_bind_group(device, &material_layout, &materials);

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });
        let textures = TextureSlot::ALL.map(|slot| {
            GpuTexture::upload(device, queue, slot, &TextureImage::solid(fallback_color(slot)))
        });
        let texture_bind_group = Self::texture_bind_group(device, &texture_layout, &textures);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &material_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x2,
            ],
        };
        let single_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "single_pipeline",
            "vs_single",
            &[
                vertex_layout.clone(),
                wgpu::VertexBufferLayout {
                    array_stride: SINGLE_STRIDE,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x4,
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                        7 => Uint32,
                    ],
                },
            ],
        );
        let instanced_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "instanced_pipeline",
            "vs_instanced",
            &[
                vertex_layout,
                wgpu::VertexBufferLayout {
                    array_stride: OFFSET_STRIDE,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![2 => Float32x3],
                },
            ],
        );

        let singles = GrowBuffer::new(
            device,
            "single_instance_buffer",
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            SINGLE_STRIDE * 64,
        );

        Self {
            single_pipeline,
            instanced_pipeline,
            globals_buffer,
            globals_bind_group,
            material_layout,
            material_stride,
            materials,
            material_bind_group,
            texture_layout,
            textures,
            texture_bind_group,
            singles,
            meshes: HashMap::new(),
            offsets: HashMap::new(),
            loader: TextureLoader::new(),
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Start loading an image file into `slot`. The slot shows its fallback
    /// colour until the load lands on a later frame.
    pub fn load_texture(&mut self, slot: TextureSlot, path: impl Into<PathBuf>) {
        self.loader.request(slot, path);
    }

    /// Replace the image in `slot` immediately.
    pub fn set_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: TextureSlot,
        image: &TextureImage,
    ) {
        self.textures[slot.index()] = GpuTexture::upload(device, queue, slot, image);
        self.texture_bind_group =
            Self::texture_bind_group(device, &self.texture_layout, &self.textures);
    }

    pub fn pending_textures(&self) -> usize {
        self.loader.pending()
    }

    /// Upload `meshes` ahead of the first frame. Returns how many meshes are
    /// resident afterwards.
    pub fn prepare<'a>(
        &mut self,
        device: &wgpu::Device,
        meshes: impl IntoIterator<Item = &'a Shape>,
    ) -> usize {
        for shape in meshes {
            self.upload_mesh(device, shape);
        }
        self.meshes.len()
    }

    /// Render one frame into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        camera: &Camera,
        frame: &DrawList<'_>,
    ) -> Result<(), RenderError> {
        self.apply_loaded_textures(device, queue);

        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view_proj: camera.view_projection().to_cols_array_2d(),
            }),
        );

        let mut singles: Vec<SingleInstance> = Vec::new();
        let mut materials: Vec<MaterialUniform> = Vec::new();
        let mut draws: Vec<PlannedDraw> = Vec::new();
        for command in &frame.commands {
            let shape = command.shape();
            self.upload_mesh(device, shape);
            match command {
                DrawCommand::Single { model, .. } => {
                    for batch in shape.draw_batches() {
                        draws.push(PlannedDraw::Single {
                            mesh: shape.id(),
                            vertices: batch.vertices,
                            instance: singles.len() as u64,
                        });
                        singles.push(SingleInstance::new(*model, batch.color));
                    }
                }
                DrawCommand::Instanced { offsets, .. } => {
                    let count = self.upload_offsets(device, shape.id(), offsets);
                    if count == 0 {
                        continue;
                    }
                    for batch in shape.draw_batches() {
                        draws.push(PlannedDraw::Instanced {
                            mesh: shape.id(),
                            vertices: batch.vertices,
                            material: materials.len() as u32,
                            count,
                        });
                        materials.push(MaterialUniform::new(batch.color));
                    }
                }
            }
        }

        if !singles.is_empty() {
            self.singles
                .reserve(device, SINGLE_STRIDE * singles.len() as u64)?;
            queue.write_buffer(&self.singles.buffer, 0, bytemuck::cast_slice(&singles));
        }
        if !materials.is_empty() {
            let stride = self.material_stride as usize;
            if self
                .materials
                .reserve(device, (stride * materials.len()) as u64)?
            {
                self.material_bind_group =
                    Self::material_bind_group(device, &self.material_layout, &self.materials);
            }
            let mut bytes = vec![0u8; stride * materials.len()];
            for (chunk, material) in bytes.chunks_exact_mut(stride).zip(&materials) {
                chunk[..MATERIAL_SIZE as usize].copy_from_slice(bytemuck::bytes_of(material));
            }
            queue.write_buffer(&self.materials.buffer, 0, &bytes);
        }

        let c = frame.clear_color;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.r as f64,
                            g: c.g as f64,
                            b: c.b as f64,
                            a: 1.0,
                        }),
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

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_bind_group(1, &self.material_bind_group, &[0]);
            pass.set_bind_group(2, &self.texture_bind_group, &[]);

            for draw in &draws {
                match draw {
                    PlannedDraw::Single {
                        mesh,
                        vertices,
                        instance,
                    } => {
                        let start = instance * SINGLE_STRIDE;
                        pass.set_pipeline(&self.single_pipeline);
                        pass.set_vertex_buffer(0, self.meshes[mesh].buffer.slice(..));
                        pass.set_vertex_buffer(
                            1,
                            self.singles.buffer.slice(start..start + SINGLE_STRIDE),
                        );
                        pass.draw(vertices.clone(), 0..1);
                    }
                    PlannedDraw::Instanced {
                        mesh,
                        vertices,
                        material,
                        count,
                    } => {
                        let Some(offsets) = self.offsets[mesh].buffer.as_ref() else {
                            continue;
                        };
                        let dynamic_offset = material * self.material_stride as u32;
                        pass.set_pipeline(&self.instanced_pipeline);
                        pass.set_bind_group(1, &self.material_bind_group, &[dynamic_offset]);
                        pass.set_vertex_buffer(0, self.meshes[mesh].buffer.slice(..));
                        pass.set_vertex_buffer(1, offsets.slice(..));
                        pass.draw(vertices.clone(), 0..*count);
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn apply_loaded_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        for loaded in self.loader.poll() {
            match loaded.result {
                Ok(image) => {
                    tracing::info!(
                        "texture {} ({}x{}) ready in slot {}",
                        loaded.path.display(),
                        image.width,
                        image.height,
                        loaded.slot.index()
                    );
                    self.set_texture(device, queue, loaded.slot, &image);
                }
                Err(e) => {
                    tracing::warn!(
                        "texture {} failed, slot {} keeps its fallback colour: {e}",
                        loaded.path.display(),
                        loaded.slot.index()
                    );
                }
            }
        }
    }

    fn upload_mesh(&mut self, device: &wgpu::Device, shape: &Shape) {
        self.meshes.entry(shape.id()).or_insert_with(|| {
            let vertices: Vec<GpuVertex> = shape
                .vertices()
                .iter()
                .map(|v| GpuVertex {
                    position: v.position.to_array(),
                    uv: v.uv.to_array(),
                })
                .collect();
            tracing::debug!("uploading mesh {:?} ({} vertices)", shape.id().0, vertices.len());
            GpuMesh {
                buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            }
        });
    }

    /// Upload `cache` for `mesh` unless the resident copy has the same
    /// generation. Returns the instance count.
    fn upload_offsets(&mut self, device: &wgpu::Device, mesh: MeshId, cache: &OffsetCache) -> u32 {
        let stale = self
            .offsets
            .get(&mesh)
            .is_none_or(|upload| upload.generation != cache.generation());
        if stale {
            let buffer = (!cache.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("offset_buffer"),
                    contents: bytemuck::cast_slice(cache.offsets()),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            });
            tracing::debug!(
                "uploaded {} instance offsets (generation {})",
                cache.len(),
                cache.generation()
            );
            self.offsets.insert(
                mesh,
                OffsetUpload {
                    generation: cache.generation(),
                    buffer,
                    count: cache.len() as u32,
                },
            );
        }
        self.offsets.get(&mesh).map_or(0, |upload| upload.count)
    }

    fn material_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        materials: &GrowBuffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &materials.buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(MATERIAL_SIZE),
                }),
            }],
        })
    }

    fn texture_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        textures: &[GpuTexture; 2],
    ) -> wgpu::BindGroup {
        let [t0, t1] = textures;
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&t0.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&t0.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&t1.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&t1.sampler),
                },
            ],
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
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

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Scene pipeline: triangle lists, no culling, depth tested.
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    label: &str,
    vertex_entry: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtworld_common::Rgb;

    #[test]
    fn gpu_structs_match_shader_layout() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 20);
        assert_eq!(SINGLE_STRIDE, 96);
        // WGSL rounds `Material` up to a 16-byte multiple.
        assert_eq!(MATERIAL_SIZE, 32);
        assert_eq!(OFFSET_STRIDE, 12);
    }

    #[test]
    fn single_instance_carries_model_and_material() {
        let model = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let flat = SingleInstance::new(model, ColorSource::Flat(Rgb::GREEN));
        assert_eq!(flat.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(flat.color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(flat.color_src, 1);

        let textured = SingleInstance::new(model, ColorSource::Texture(TextureSlot::Zero));
        assert_eq!(textured.color_src, 3);
    }

    #[test]
    fn material_uses_shader_codes() {
        let m = MaterialUniform::new(ColorSource::Texture(TextureSlot::One));
        assert_eq!(m.color_src, 4);
        assert_eq!(m.color, [1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn shader_declares_every_entry_point() {
        for entry in ["fn vs_single", "fn vs_instanced", "fn fs_main"] {
            assert!(shaders::SCENE_SHADER.contains(entry), "{entry}");
        }
    }
}
