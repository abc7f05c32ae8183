use anyhow::{Context, Result};
use renderer::{PresentPreference, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::config::{ResolvedConfig, ShowConfig};
use crate::paths::AppPaths;

const DEFAULT_FILTER: &str = "warn,shady=info,renderer=info,effects=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";

pub fn initialise_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let renderer_config = merge(&args, &config);
    let effect = &effects::CATALOG[renderer_config.start_effect];
    tracing::info!(
        effect = effect.slug,
        size = ?renderer_config.window_size,
        fps = ?renderer_config.fps_override,
        present = ?renderer_config.present,
        power = ?renderer_config.power,
        "starting shady"
    );
    renderer::run(renderer_config)
}

fn load_config(args: &RunArgs) -> Result<ResolvedConfig> {
    let (path, config) = match args.config.as_ref() {
        Some(path) => (path.clone(), ShowConfig::load(path)?),
        None => {
            let paths = AppPaths::discover()?;
            let path = paths.config_file();
            let config = ShowConfig::load_or_default(&path)?;
            (path, config)
        }
    };
    tracing::debug!(path = %path.display(), ?config, "loaded configuration");
    config
        .resolve()
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

/// CLI flag, then config file, then built-in default.
fn merge(args: &RunArgs, config: &ResolvedConfig) -> RendererConfig {
    let defaults = RendererConfig::default();
    let fps = args
        .fps
        .or(config.fps)
        .or(defaults.fps_override)
        .filter(|fps| *fps > 0);
    let present = match (args.no_vsync, config.vsync) {
        (true, _) | (false, Some(false)) => PresentPreference::Immediate,
        (false, Some(true)) => PresentPreference::Vsync,
        (false, None) => defaults.present,
    };
    RendererConfig {
        window_size: args.size.or(config.size).unwrap_or(defaults.window_size),
        start_effect: args.effect.or(config.effect).unwrap_or(defaults.start_effect),
        fps_override: fps,
        present,
        power: args.power.or(config.power).unwrap_or(defaults.power),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::GpuPowerPreference;

    #[test]
    fn defaults_apply_without_flags_or_config() {
        let config = merge(&RunArgs::default(), &ResolvedConfig::default());
        let defaults = RendererConfig::default();
        assert_eq!(config.window_size, defaults.window_size);
        assert_eq!(config.start_effect, defaults.start_effect);
        assert_eq!(config.present, defaults.present);
        assert_eq!(config.power, defaults.power);
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.start_effect, 0);
        assert_eq!(config.fps_override, None);
        assert_eq!(config.present, PresentPreference::Vsync);
        assert_eq!(config.power, GpuPowerPreference::Low);
    }

    #[test]
    fn cli_flags_beat_config_file() {
        let args = RunArgs {
            effect: Some(4),
            size: Some((640, 480)),
            fps: Some(24),
            no_vsync: true,
            power: Some(GpuPowerPreference::High),
            config: None,
        };
        let file = ResolvedConfig {
            effect: Some(9),
            size: Some((1920, 1080)),
            fps: Some(30),
            vsync: Some(true),
            power: Some(GpuPowerPreference::Low),
        };
        let config = merge(&args, &file);
        assert_eq!(config.start_effect, 4);
        assert_eq!(config.window_size, (640, 480));
        assert_eq!(config.fps_override, Some(24));
        assert_eq!(config.present, PresentPreference::Immediate);
        assert_eq!(config.power, GpuPowerPreference::High);
    }

    #[test]
    fn config_file_fills_missing_flags() {
        let file = ResolvedConfig {
            effect: Some(9),
            size: None,
            fps: Some(0),
            vsync: Some(false),
            power: None,
        };
        let config = merge(&RunArgs::default(), &file);
        assert_eq!(config.start_effect, 9);
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.fps_override, None);
        assert_eq!(config.present, PresentPreference::Immediate);
    }
}
