/// Parameters for [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when `None` or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Base limits. The texture-size limits are raised to what the adapter supports
    /// so atlases can grow as far as the hardware allows.
    pub required_limits: wgpu::Limits,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
