/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// The quad pipeline needs none; keep this empty for portability.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Accept only a software adapter. Useful on CI machines without a GPU.
    pub force_fallback_adapter: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            force_fallback_adapter: false,
        }
    }
}
