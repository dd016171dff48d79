#[macro_use]
extern crate lazy_static;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use resources::config::GeneratorConfig;

mod build;
mod image;
mod schedule;
mod utils;

lazy_static! {
    pub static ref CONFIG: GeneratorConfig = load_config().unwrap_or_else(|e| {
        tracing::warn!("{:#}, falling back to defaults", e);
        GeneratorConfig::default()
    });
}

fn load_config() -> Result<GeneratorConfig> {
    Config::builder()
        .add_source(File::with_name("rkubegen").required(false))
        .add_source(Environment::with_prefix("RKUBEGEN"))
        .build()
        .with_context(|| "Failed to load config".to_string())?
        .try_deserialize::<GeneratorConfig>()
        .with_context(|| "Failed to parse config".to_string())
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate manifests and the image descriptor for a specification.
    Build(build::Arg),
    /// Show the image descriptor of a specification's workload.
    Image(image::Arg),
    /// Show the cron expression of a specification's job.
    Schedule(schedule::Arg),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Build(arg) => arg.handle()?,
        Commands::Image(arg) => arg.handle()?,
        Commands::Schedule(arg) => arg.handle()?,
    }

    Ok(())
}
