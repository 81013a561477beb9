/// Offscreen colour targets for the glass frosting.
///
/// - `scene_view` holds the background and the layers behind the card at
///   full resolution.
/// - `blur_a_view` and `blur_b_view` are the half-res horizontal and
///   vertical blur results.
pub(crate) struct RenderTargets {
    pub(crate) scene_view: wgpu::TextureView,
    pub(crate) blur_a_view: wgpu::TextureView,
    pub(crate) blur_b_view: wgpu::TextureView,
}

const USAGE: wgpu::TextureUsages =
    wgpu::TextureUsages::RENDER_ATTACHMENT.union(wgpu::TextureUsages::TEXTURE_BINDING);

fn color_view(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: USAGE,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        Self {
            scene_view: color_view(device, "scene_tex", width.max(1), height.max(1), format),
            blur_a_view: color_view(device, "blur_a", bw, bh, format),
            blur_b_view: color_view(device, "blur_b", bw, bh, format),
        }
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) {
        *self = Self::new(device, width, height, format);
    }
}
