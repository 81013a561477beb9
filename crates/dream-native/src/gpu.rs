use wgpu::util::DeviceExt;

use chrono_dream::background::BackgroundUniforms;
use chrono_dream::compositor::GlassBlur;
use chrono_dream::{Frame, SpriteInstance, BACKGROUND_WGSL, GLASS_WGSL, SPRITES_WGSL};

mod post;
mod targets;

use post::{GlassUniforms, PostBindGroups, PostResources};
use targets::RenderTargets;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteUniforms {
    resolution: [f32; 2],
    _pad: [f32; 2],
}

const INITIAL_SPRITE_CAPACITY: usize = 256;

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    background_pipeline: wgpu::RenderPipeline,
    background_uniforms: wgpu::Buffer,
    background_bind_group: wgpu::BindGroup,
    sprite_pipeline: wgpu::RenderPipeline,
    sprite_uniforms: wgpu::Buffer,
    sprite_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    targets: RenderTargets,
    post: PostResources,
    post_groups: PostBindGroups,
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn uniform_buffer<T>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("sprite_instances"),
        size: (std::mem::size_of::<SpriteInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
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
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let blend_target = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        // Background: one full-screen triangle, no vertex buffers.
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background"),
            source: wgpu::ShaderSource::Wgsl(BACKGROUND_WGSL.into()),
        });
        let background_uniforms =
            uniform_buffer::<BackgroundUniforms>(&device, "background_uniforms");
        let background_layout =
            uniform_layout(&device, "background_bgl", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let background_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("background_bg"),
            layout: &background_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: background_uniforms.as_entire_binding(),
            }],
        });
        let background_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("background_pl"),
                bind_group_layouts: &[&background_layout],
                push_constant_ranges: &[],
            });
        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&background_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_background"),
                targets: &blend_target,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Sprites: unit quad plus per-instance data.
        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprites"),
            source: wgpu::ShaderSource::Wgsl(SPRITES_WGSL.into()),
        });
        let sprite_uniforms = uniform_buffer::<SpriteUniforms>(&device, "sprite_uniforms");
        let sprite_layout =
            uniform_layout(&device, "sprite_bgl", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let sprite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_bg"),
            layout: &sprite_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sprite_uniforms.as_entire_binding(),
            }],
        });
        let sprite_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pl"),
            bind_group_layouts: &[&sprite_layout],
            push_constant_ranges: &[],
        });

        let corners: [f32; 12] = [
            -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&corners),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = instance_buffer(&device, INITIAL_SPRITE_CAPACITY);

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: SpriteInstance
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SpriteInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    1 => Float32x2,
                    2 => Float32x2,
                    3 => Float32x4,
                    4 => Float32,
                    5 => Uint32,
                    6 => Float32,
                    7 => Float32,
                ],
            },
        ];
        let sprite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&sprite_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &sprite_shader,
                entry_point: Some("vs_sprite"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &sprite_shader,
                entry_point: Some("fs_sprite"),
                targets: &blend_target,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Glass: offscreen scene, half-res blur ping-pong, masked composite.
        let glass_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glass"),
            source: wgpu::ShaderSource::Wgsl(GLASS_WGSL.into()),
        });
        let targets = RenderTargets::new(&device, config.width, config.height, format);
        let post = PostResources::new(&device, &glass_shader, format);
        let post_groups = post.bind_groups(&device, &targets);

        log::info!("[gpu] surface {}x{} {:?}", config.width, config.height, format);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            background_pipeline,
            background_uniforms,
            background_bind_group,
            sprite_pipeline,
            sprite_uniforms,
            sprite_bind_group,
            quad_vb,
            instance_vb,
            instance_capacity: INITIAL_SPRITE_CAPACITY,
            targets,
            post,
            post_groups,
        })
    }

    pub fn size(&self) -> [f32; 2] {
        [self.config.width as f32, self.config.height as f32]
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.targets
            .recreate(&self.device, new_size.width, new_size.height, self.config.format);
        self.post_groups = self.post.bind_groups(&self.device, &self.targets);
    }

    fn write_glass_uniforms(&self, blur: &GlassBlur) {
        let base = GlassUniforms {
            resolution: self.size(),
            radius: blur.radius,
            corner_radius: blur.mask.corner_radius,
            rotation: blur.mask.rotation,
            alpha: blur.mask.color[3],
            center: blur.mask.center,
            half_extent: blur.mask.half_extent,
            ..GlassUniforms::default()
        };
        let with_dir = |blur_dir| GlassUniforms { blur_dir, ..base };
        self.queue.write_buffer(
            &self.post.blur_h_uniforms,
            0,
            bytemuck::bytes_of(&with_dir([1.0, 0.0])),
        );
        self.queue.write_buffer(
            &self.post.blur_v_uniforms,
            0,
            bytemuck::bytes_of(&with_dir([0.0, 1.0])),
        );
        self.queue
            .write_buffer(&self.post.glass_uniforms, 0, bytemuck::bytes_of(&base));
    }

    fn draw_sprites(&self, rpass: &mut wgpu::RenderPass<'_>, range: std::ops::Range<u32>) {
        if range.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.sprite_pipeline);
        rpass.set_bind_group(0, &self.sprite_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..6, range);
    }

    /// The layers behind the card go to the offscreen scene, which is
    /// blurred and sampled inside the card outline. The card, foreground
    /// particles and chrome are then drawn sharp on top.
    pub fn render(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let behind = frame.sprites_behind_glass();
        let over = frame.sprites_over_glass();
        let total = behind.len() + over.len();
        if total > self.instance_capacity {
            self.instance_capacity = total.next_power_of_two();
            self.instance_vb = instance_buffer(&self.device, self.instance_capacity);
        }

        self.queue
            .write_buffer(&self.background_uniforms, 0, bytemuck::bytes_of(&frame.background));
        self.queue.write_buffer(
            &self.sprite_uniforms,
            0,
            bytemuck::bytes_of(&SpriteUniforms {
                resolution: self.size(),
                _pad: [0.0; 2],
            }),
        );
        let stride = std::mem::size_of::<SpriteInstance>() as u64;
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&behind));
        self.queue.write_buffer(
            &self.instance_vb,
            behind.len() as u64 * stride,
            bytemuck::cast_slice(&over),
        );
        if let Some(blur) = &frame.blur {
            self.write_glass_uniforms(blur);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: background and the layers behind the glass -> scene
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.scene_view,
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
            rpass.set_pipeline(&self.background_pipeline);
            rpass.set_bind_group(0, &self.background_bind_group, &[]);
            rpass.draw(0..3, 0..1);
            self.draw_sprites(&mut rpass, 0..behind.len() as u32);
        }

        // Pass 2 and 3: blur horizontal scene -> blur_a, vertical blur_a -> blur_b
        if frame.blur.is_some() {
            post::blit(
                &mut encoder,
                "blur_h",
                &self.targets.blur_a_view,
                &self.post.blur_pipeline,
                &self.post_groups.blur_h,
            );
            post::blit(
                &mut encoder,
                "blur_v",
                &self.targets.blur_b_view,
                &self.post.blur_pipeline,
                &self.post_groups.blur_v,
            );
        }

        // Pass 4: sharp scene, frosted card region, then everything over the glass
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("present"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            rpass.set_pipeline(&self.post.blit_pipeline);
            rpass.set_bind_group(0, &self.post_groups.blit, &[]);
            rpass.draw(0..3, 0..1);
            if frame.blur.is_some() {
                rpass.set_pipeline(&self.post.glass_pipeline);
                rpass.set_bind_group(0, &self.post_groups.glass, &[]);
                rpass.draw(0..3, 0..1);
            }
            self.draw_sprites(&mut rpass, behind.len() as u32..total as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
