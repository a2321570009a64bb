//! Text renderer
//!
//! Owns the text pipeline, the uniform buffer and a growable vertex buffer.
//! Fonts are uploaded once into [`GpuFont`] handles; every draw writes the
//! uniforms and vertices, then submits one render pass with one draw call.
//! GPU state lives in these handles, never in globals, so any number of fonts
//! and renderers can coexist.

use std::sync::Arc;

use quill_text::{Color, Font, Quad, QuadSink, Vertex};

use crate::shaders::TEXT_SHADER;

/// Error type for renderer operations
#[derive(Debug)]
pub enum RendererError {
    /// Failed to request GPU adapter
    AdapterNotFound,
    /// Failed to request GPU device
    DeviceError(wgpu::RequestDeviceError),
    /// Failed to map a readback buffer
    BufferMapError(wgpu::BufferAsyncError),
}

impl std::fmt::Display for RendererError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererError::AdapterNotFound => write!(f, "No suitable GPU adapter found"),
            RendererError::DeviceError(e) => write!(f, "Failed to request GPU device: {}", e),
            RendererError::BufferMapError(e) => write!(f, "Failed to map buffer: {}", e),
        }
    }
}

impl std::error::Error for RendererError {}

/// Uniform buffer for the text shader
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextUniforms {
    pub resolution: [f32; 2],
    pub _padding: [f32; 2],
    pub text_color: [f32; 4],
}

/// Configuration for creating a text renderer
#[derive(Clone, Debug)]
pub struct TextRendererConfig {
    /// Format of the render targets text is drawn into
    pub texture_format: wgpu::TextureFormat,
    /// Vertices the dynamic vertex buffer starts sized for (grows on demand)
    pub initial_vertex_capacity: usize,
    /// Atlas sampling filter
    pub filter: wgpu::FilterMode,
}

impl Default for TextRendererConfig {
    fn default() -> Self {
        Self {
            texture_format: wgpu::TextureFormat::Rgba8Unorm,
            // 256 glyphs
            initial_vertex_capacity: 256 * 6,
            filter: wgpu::FilterMode::Linear,
        }
    }
}

/// A font's atlas uploaded to the GPU
pub struct GpuFont {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

impl GpuFont {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Draws laid-out glyph quads with wgpu
pub struct TextRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: wgpu::Buffer,
    vertices: wgpu::Buffer,
    /// Capacity of `vertices`, in vertices
    vertex_capacity: usize,
    sampler: wgpu::Sampler,
    resolution: (u32, u32),
}

impl TextRenderer {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        config: TextRendererConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Text Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(TEXT_SHADER)),
        });

        // Bind group layout: uniforms, atlas texture, sampler
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Text Bind Group Layout"),
            entries: &[
                // Uniforms (resolution, text color)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Glyph atlas
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Text Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Straight alpha blending
        let blend_state = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.texture_format,
                    blend: Some(blend_state),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Text Uniforms"),
            size: std::mem::size_of::<TextUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertex_capacity = config.initial_vertex_capacity.max(6);
        let vertices = create_vertex_buffer(&device, vertex_capacity);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Glyph Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: config.filter,
            min_filter: config.filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            uniforms,
            vertices,
            vertex_capacity,
            sampler,
            resolution: (800, 600),
        }
    }

    /// Set the size of the render target text is drawn into
    pub fn update_resolution(&mut self, width: u32, height: u32) {
        self.resolution = (width.max(1), height.max(1));
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    /// Upload a font's atlas into a texture
    pub fn upload_font(&self, font: &Font) -> GpuFont {
        let atlas = font.atlas();
        let (width, height) = atlas.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Glyph Atlas Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Text Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        tracing::debug!("Uploaded {}x{} glyph atlas", width, height);

        GpuFont {
            texture,
            view,
            bind_group,
        }
    }

    /// Draw `text` into `target` with its baseline starting at `(x, y)`.
    ///
    /// Returns the number of glyphs drawn.
    pub fn draw(
        &mut self,
        target: &wgpu::TextureView,
        gpu_font: &GpuFont,
        font: &Font,
        x: f32,
        y: f32,
        scale: f32,
        text: &str,
    ) -> usize {
        let mut pass = TextPass {
            renderer: self,
            target,
            font: gpu_font,
        };
        font.draw(&mut pass, x, y, scale, text)
    }

    fn ensure_vertex_capacity(&mut self, needed: usize) {
        if needed <= self.vertex_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        tracing::debug!(
            "Growing text vertex buffer from {} to {} vertices",
            self.vertex_capacity,
            capacity
        );
        self.vertices = create_vertex_buffer(&self.device, capacity);
        self.vertex_capacity = capacity;
    }

    fn submit(
        &mut self,
        target: &wgpu::TextureView,
        font: &GpuFont,
        color: Color,
        vertices: &[Vertex],
    ) {
        let uniforms = TextUniforms {
            resolution: [self.resolution.0 as f32, self.resolution.1 as f32],
            _padding: [0.0; 2],
            text_color: color.to_array(),
        };
        self.queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));

        self.ensure_vertex_capacity(vertices.len());
        self.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(vertices));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Text Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Text Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load, // Preserve existing content
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let byte_len = std::mem::size_of_val(vertices) as u64;
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &font.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertices.slice(..byte_len));
            render_pass.draw(0..vertices.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// One draw call's worth of state
struct TextPass<'a> {
    renderer: &'a mut TextRenderer,
    target: &'a wgpu::TextureView,
    font: &'a GpuFont,
}

impl QuadSink for TextPass<'_> {
    fn draw_quads(&mut self, color: Color, quads: &[Quad]) {
        let vertices: &[Vertex] = bytemuck::cast_slice(quads);
        self.renderer
            .submit(self.target, self.font, color, vertices);
    }
}

/// `vert` then `vert_tex_coord`, 16-byte stride
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        // vert
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        },
        // vert_tex_coord
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 8,
            shader_location: 1,
        },
    ];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Text Vertex Buffer"),
        size: (std::mem::size_of::<Vertex>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
