use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use renderer::GpuPowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "shady",
    author,
    version,
    about = "Cycle through animated GPU shader effects",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Effect to start with, by slug (`northern_lights`) or zero-based index.
    #[arg(long, value_name = "SLUG|INDEX", value_parser = parse_effect)]
    pub effect: Option<usize>,

    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Frame rate for every effect (0 = each effect's preferred rate).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Present without waiting for vertical blank.
    #[arg(long)]
    pub no_vsync: bool,

    /// GPU adapter power preference: `low` or `high`.
    #[arg(long, value_name = "low|high", value_parser = parse_power)]
    pub power: Option<GpuPowerPreference>,

    /// Configuration file to use instead of `<config dir>/config.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effect catalogue.
    List(ListArgs),
    /// Print the resolved configuration directory and file.
    Where,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_effect(value: &str) -> Result<usize, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("effect must not be empty".to_string());
    }
    effects::resolve(trimmed)
        .map(|effect| effect.index)
        .ok_or_else(|| {
            format!(
                "unknown effect '{trimmed}'; expected a slug or an index below {} (see `shady list`)",
                effects::EFFECT_COUNT
            )
        })
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_power(value: &str) -> Result<GpuPowerPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("power preference must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "low" | "low-power" | "integrated" => Ok(GpuPowerPreference::Low),
        "high" | "high-performance" | "discrete" => Ok(GpuPowerPreference::High),
        other => Err(format!(
            "unknown power preference '{other}'; expected low or high"
        )),
    }
}
