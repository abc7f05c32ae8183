mod cli;
mod config;
mod paths;
mod run;

use anyhow::{Context, Result};
use cli::Command;
use effects::CATALOG;
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::List(args)) => run_list(args.json),
        Some(Command::Where) => run_where(),
        None => run::run(cli.run),
    }
}

fn run_list(json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(&CATALOG[..]).context("failed to serialise catalogue")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{:>3}  {:<16} {:<16} {:<24} FPS", "#", "SLUG", "TITLE", "UNIFORMS");
    for effect in &CATALOG {
        println!(
            "{:>3}  {:<16} {:<16} {:<24} {}",
            effect.index,
            effect.slug,
            effect.title,
            effect.uniforms.to_string(),
            effect.preferred_fps
        );
    }
    Ok(())
}

fn run_where() -> Result<()> {
    let paths = AppPaths::discover()?;
    let file = paths.config_file();
    let status = if file.exists() { "present" } else { "missing" };
    println!("config dir : {}", paths.config_dir().display());
    println!("config file: {} ({status})", file.display());
    Ok(())
}
