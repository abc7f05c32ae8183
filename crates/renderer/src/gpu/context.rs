use anyhow::{anyhow, Context as AnyhowContext, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::types::{AdapterProfile, GpuPowerPreference, PresentPreference};

const FRAME_LATENCY: u32 = 2;

/// Instance, device and swapchain for the showcase window.
///
/// Created once at startup and shared by every effect session.
pub(crate) struct GpuContext {
    pub _instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub surface_format: wgpu::TextureFormat,
    pub adapter_profile: AdapterProfile,
}

impl GpuContext {
    /// The surface is created from `target`'s raw handles, so `target` must
    /// outlive the returned context.
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        gpu_power: GpuPowerPreference,
        present: PresentPreference,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let window_handle = target
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?;
        let display_handle = target
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?;

        // SAFETY: the showcase keeps the window alive until after the context
        // (and therefore the surface) has been dropped.
        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle.as_raw(),
                raw_window_handle: window_handle.as_raw(),
            })
        }
        .context("failed to create rendering surface")?;

        let power_preference = match gpu_power {
            GpuPowerPreference::Low => wgpu::PowerPreference::LowPower,
            GpuPowerPreference::High => wgpu::PowerPreference::HighPerformance,
        };
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let adapter_profile = AdapterProfile::from_wgpu(&adapter.get_info());
        tracing::debug!(
            name = %adapter_profile.name,
            backend = ?adapter_profile.backend,
            device_type = ?adapter_profile.device_type,
            is_software = adapter_profile.is_software(),
            "selected GPU adapter"
        );

        let limits = adapter.limits();
        let max_dimension = limits.max_texture_dimension_2d;
        let width = initial_size.width.max(1);
        let height = initial_size.height.max(1);
        if width > max_dimension || height > max_dimension {
            anyhow::bail!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}"
            );
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("shady device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits,
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        }))
        .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&surface_caps.formats)
            .context("surface reports no supported formats")?;
        let present_mode = choose_present_mode(&surface_caps.present_modes, present);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        tracing::debug!(?surface_format, ?present_mode, "configuring surface");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: FRAME_LATENCY,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size: PhysicalSize::new(width, height),
            surface_format,
            adapter_profile,
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reapplies the current configuration after the surface was lost.
    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// `Bgra8Unorm` if offered, then the first non-sRGB format, then anything.
fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    if formats.contains(&wgpu::TextureFormat::Bgra8Unorm) {
        return Some(wgpu::TextureFormat::Bgra8Unorm);
    }
    let linear = formats.iter().copied().find(|format| !format.is_srgb());
    if linear.is_none() {
        if let Some(fallback) = formats.first() {
            tracing::warn!(
                ?fallback,
                "no linear (non-sRGB) surface format available; falling back to {:?}",
                fallback
            );
        }
    }
    linear.or_else(|| formats.first().copied())
}

fn choose_present_mode(
    modes: &[wgpu::PresentMode],
    preference: PresentPreference,
) -> wgpu::PresentMode {
    let find = |wanted: wgpu::PresentMode| modes.iter().copied().find(|mode| *mode == wanted);
    let vsync = find(wgpu::PresentMode::Fifo)
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::PresentMode::Fifo);
    match preference {
        PresentPreference::Vsync => vsync,
        PresentPreference::Immediate => find(wgpu::PresentMode::Immediate)
            .or_else(|| find(wgpu::PresentMode::Mailbox))
            .unwrap_or(vsync),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{PresentMode, TextureFormat};

    #[test]
    fn prefers_bgra8_unorm() {
        let formats = [TextureFormat::Rgba8UnormSrgb, TextureFormat::Rgba8Unorm, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_linear_then_first() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Rgba8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Rgba8Unorm));

        let srgb_only = [TextureFormat::Rgba8UnormSrgb, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&srgb_only), Some(TextureFormat::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn present_mode_follows_preference() {
        let modes = [PresentMode::Mailbox, PresentMode::Fifo];
        assert_eq!(choose_present_mode(&modes, PresentPreference::Vsync), PresentMode::Fifo);
        assert_eq!(choose_present_mode(&modes, PresentPreference::Immediate), PresentMode::Mailbox);

        let fifo_only = [PresentMode::Fifo];
        assert_eq!(choose_present_mode(&fifo_only, PresentPreference::Immediate), PresentMode::Fifo);
    }
}
