use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget, Vertex};
use crate::scene::Scene;
use crate::texture::{SlotTable, TextureSlot, MAX_TEXTURE_SLOTS};

/// First texture binding; slot `i` is bound at `TEXTURE_BINDING_BASE + i`.
const TEXTURE_BINDING_BASE: u32 = 2;

// ── uniform ───────────────────────────────────────────────────────────────

/// Uniform layout (48 bytes):
///
///  offset  0  y_scale   f32
///  offset 16  channels  [[u32; 4]; 2]   channel count per slot, 0 when unused
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Globals {
    y_scale: f32,
    _pad: [f32; 3],
    channels: [[u32; 4]; 2],
}

const _: () = assert!(std::mem::size_of::<Globals>() == 48);

impl Globals {
    fn new(y_scale: f32, slots: &SlotTable) -> Self {
        let mut channels = [[0u32; 4]; 2];
        for (i, slot) in slots.iter().enumerate() {
            channels[i / 4][i % 4] = slot.channels().count();
        }
        Self { y_scale, _pad: [0.0; 3], channels }
    }
}

// ── gpu slot ──────────────────────────────────────────────────────────────

struct GpuSlot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    /// Generation of the CPU mirror last uploaded.
    generation: Option<u64>,
}

impl GpuSlot {
    fn create(device: &wgpu::Device, index: usize, slot: &TextureSlot) -> Self {
        let label = format!("pigment slot {index}");
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: wgpu::Extent3d {
                width: slot.width(),
                height: slot.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: slot.channels().format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!(
            "created GPU texture for slot {index} ({}x{}, {:?})",
            slot.width(),
            slot.height(),
            slot.channels()
        );
        Self { texture, view, width: slot.width(), height: slot.height(), generation: None }
    }

    fn upload(&mut self, queue: &wgpu::Queue, slot: &TextureSlot) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            slot.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(slot.width() * slot.channels().count()),
                rows_per_image: Some(slot.height()),
            },
            wgpu::Extent3d { width: slot.width(), height: slot.height(), depth_or_array_layers: 1 },
        );
        self.generation = Some(slot.generation());
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws a [`Scene`] with one pipeline and one draw call.
///
/// GPU resources are created on first use. Slot textures follow the scene's CPU
/// mirrors: a changed generation re-uploads, a changed size recreates the texture and
/// rebuilds the bind group. Unused texture bindings point at a 1×1 placeholder.
///
/// The pipeline is built from the first scene's shaders; use one renderer per scene.
#[derive(Default)]
pub struct SceneRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings (rebuilt when a slot texture is recreated)
    bind_group: Option<wgpu::BindGroup>,
    globals_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,
    placeholder: Option<wgpu::TextureView>,

    // textures, indexed like the scene's slot table
    slots: Vec<GpuSlot>,

    // geometry
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `scene.vertices()` and draws them over the target's current contents.
    ///
    /// An empty scene records nothing. Invalid WGSL surfaces through the device's
    /// uncaptured-error handler, which panics by default.
    pub fn draw_scene(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scene: &Scene) {
        if scene.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx, scene);
        self.ensure_sampler(ctx);
        self.ensure_placeholder(ctx);
        self.sync_textures(ctx, scene.slots());
        self.ensure_vertex_buffer(ctx, scene.capacity());
        self.ensure_bindings(ctx);

        let Some(ubo) = self.globals_ubo.as_ref() else { return; };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&Globals::new(scene.y_scale(), scene.slots())));

        let Some(vbo) = self.vertex_buffer.as_ref() else { return; };
        let vertices = scene.vertices();
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

        let Some(pipeline)   = self.pipeline.as_ref()   else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pigment scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let bytes = (vertices.len() * std::mem::size_of::<Vertex>()) as u64;
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..bytes));
        rpass.draw(0..vertices.len() as u32, 0..1);
    }

    // ── texture sync ───────────────────────────────────────────────────────

    fn sync_textures(&mut self, ctx: &RenderCtx<'_>, slots: &SlotTable) {
        for (i, slot) in slots.iter().enumerate() {
            let fits = self
                .slots
                .get(i)
                .is_some_and(|gpu| gpu.width == slot.width() && gpu.height == slot.height());
            if !fits {
                let gpu = GpuSlot::create(ctx.device, i, slot);
                if i < self.slots.len() {
                    self.slots[i] = gpu;
                } else {
                    self.slots.push(gpu);
                }
                self.bind_group = None;
            }

            let gpu = &mut self.slots[i];
            if gpu.generation != Some(slot.generation()) {
                gpu.upload(ctx.queue, slot);
            }
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shaders = &scene.config().shaders;
        let vs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pigment scene vs"),
            source: wgpu::ShaderSource::Wgsl(shaders.vertex.clone()),
        });
        let fs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pigment scene fs"),
            source: wgpu::ShaderSource::Wgsl(shaders.fragment.clone()),
        });

        let mut entries = vec![
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ];
        entries.extend((0..MAX_TEXTURE_SLOTS as u32).map(|i| wgpu::BindGroupLayoutEntry {
            binding: TEXTURE_BINDING_BASE + i,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }));

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pigment scene bgl"),
            entries: &entries,
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pigment scene pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pigment scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
            multiview_mask: None,
            cache: None,
        });

        log::debug!("scene pipeline built for {:?}", ctx.surface_format);
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pigment scene sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_placeholder(&mut self, ctx: &RenderCtx<'_>) {
        if self.placeholder.is_some() {
            return;
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pigment placeholder texture"),
            size: wgpu::Extent3d { width: 1, height: 1, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        self.placeholder = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>, capacity: usize) {
        if self.vertex_buffer.is_some() && self.vertex_capacity >= capacity {
            return;
        }
        self.vertex_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pigment scene vbo"),
            size: (capacity.max(1) * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = capacity;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.globals_ubo.is_some() {
            return;
        }

        let Some(bgl)         = self.bind_group_layout.as_ref() else { return; };
        let Some(sampler)     = self.sampler.as_ref()           else { return; };
        let Some(placeholder) = self.placeholder.as_ref()       else { return; };

        let ubo = match self.globals_ubo.take() {
            Some(ubo) => ubo,
            None => ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("pigment scene globals ubo"),
                size: std::mem::size_of::<Globals>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        };

        let mut entries = vec![
            wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
        ];
        entries.extend((0..MAX_TEXTURE_SLOTS).map(|i| {
            let view = self.slots.get(i).map_or(placeholder, |gpu| &gpu.view);
            wgpu::BindGroupEntry {
                binding: TEXTURE_BINDING_BASE + i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            }
        }));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pigment scene bind group"),
            layout: bgl,
            entries: &entries,
        });

        self.bind_group = Some(bind_group);
        self.globals_ubo = Some(ubo);
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
