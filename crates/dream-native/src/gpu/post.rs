use super::targets::RenderTargets;

/// Uniforms for `shaders/glass.wgsl`; 48 bytes, matching its WGSL layout.
#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlassUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) radius: f32,
    pub(crate) corner_radius: f32,
    pub(crate) rotation: f32,
    pub(crate) alpha: f32,
    pub(crate) center: [f32; 2],
    pub(crate) half_extent: [f32; 2],
}

/// Blur, blit and glass pipelines plus one uniform buffer per pass.
pub(crate) struct PostResources {
    bgl: wgpu::BindGroupLayout, // tex+sampler+uniform
    sampler: wgpu::Sampler,
    pub(crate) blur_h_uniforms: wgpu::Buffer,
    pub(crate) blur_v_uniforms: wgpu::Buffer,
    pub(crate) glass_uniforms: wgpu::Buffer,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) blit_pipeline: wgpu::RenderPipeline,
    pub(crate) glass_pipeline: wgpu::RenderPipeline,
}

/// Bind groups that reference the offscreen targets; rebuilt on resize.
pub(crate) struct PostBindGroups {
    pub(crate) blur_h: wgpu::BindGroup,
    pub(crate) blur_v: wgpu::BindGroup,
    pub(crate) blit: wgpu::BindGroup,
    pub(crate) glass: wgpu::BindGroup,
}

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<GlassUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn make_post_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    frag_entry: &str,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(frag_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(frag_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
    ) -> Self {
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glass_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glass_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glass_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        Self {
            blur_h_uniforms: uniform_buffer(device, "blur_h_uniforms"),
            blur_v_uniforms: uniform_buffer(device, "blur_v_uniforms"),
            glass_uniforms: uniform_buffer(device, "glass_uniforms"),
            blur_pipeline: make_post_pipeline(device, &layout, shader, "fs_blur", format, None),
            blit_pipeline: make_post_pipeline(
                device,
                &layout,
                shader,
                "fs_blit",
                format,
                Some(wgpu::BlendState::REPLACE),
            ),
            glass_pipeline: make_post_pipeline(
                device,
                &layout,
                shader,
                "fs_glass",
                format,
                Some(wgpu::BlendState::ALPHA_BLENDING),
            ),
            bgl,
            sampler,
        }
    }

    fn bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        src: &wgpu::TextureView,
        uniforms: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(src),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    }

    pub(crate) fn bind_groups(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
    ) -> PostBindGroups {
        let group = |label: &str, src: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
            self.bind_group(device, label, src, uniforms)
        };
        PostBindGroups {
            blur_h: group("bg_blur_h", &targets.scene_view, &self.blur_h_uniforms),
            blur_v: group("bg_blur_v", &targets.blur_a_view, &self.blur_v_uniforms),
            blit: group("bg_blit", &targets.scene_view, &self.glass_uniforms),
            glass: group("bg_glass", &targets.blur_b_view, &self.glass_uniforms),
        }
    }
}

/// One full-screen triangle into `target`, cleared first.
pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bind_group, &[]);
    r.draw(0..3, 0..1);
}
