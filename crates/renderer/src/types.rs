/// Presentation pacing requested for the swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentPreference {
    /// Wait for vertical blank (`Fifo`).
    #[default]
    Vsync,
    /// Prefer `Immediate`, then `Mailbox`, falling back to `Fifo`.
    Immediate,
}

/// Adapter power preference forwarded to wgpu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    #[default]
    Low,
    High,
}

/// Summary of the adapter wgpu picked, kept for logging and fps policy.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// True for CPU rasterisers such as llvmpipe or WARP.
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
            || self.name.to_ascii_lowercase().contains("llvmpipe")
    }
}

/// Start-up configuration for the showcase window.
///
/// Built by the binary from CLI flags and the config file. The renderer
/// never reads either source directly.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub window_size: (u32, u32),
    /// Catalogue index of the first effect shown.
    pub start_effect: usize,
    /// Overrides every effect's preferred frame rate when set.
    pub fps_override: Option<u32>,
    pub present: PresentPreference,
    pub power: GpuPowerPreference,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            window_size: (1280, 720),
            start_effect: 0,
            fps_override: None,
            present: PresentPreference::default(),
            power: GpuPowerPreference::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, device_type: wgpu::DeviceType) -> AdapterProfile {
        AdapterProfile {
            name: name.to_string(),
            backend: wgpu::Backend::Vulkan,
            device_type,
        }
    }

    #[test]
    fn software_adapters_are_detected() {
        assert!(profile("llvmpipe (LLVM 17.0.6, 256 bits)", wgpu::DeviceType::Other).is_software());
        assert!(profile("WARP", wgpu::DeviceType::Cpu).is_software());
        assert!(!profile("AMD Radeon RX 7800", wgpu::DeviceType::DiscreteGpu).is_software());
    }

    #[test]
    fn default_config_is_windowed_720p_from_first_effect() {
        let config = RendererConfig::default();
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.start_effect, 0);
        assert!(config.fps_override.is_none());
        assert_eq!(config.present, PresentPreference::Vsync);
    }
}
