use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use generator::{generate, output_name, write_artifacts, BuildContext, DockerEnv};

use crate::{
    utils::{load_overlay, load_spec},
    CONFIG,
};

#[derive(Args)]
pub struct Arg {
    /// The base specification YAML file
    #[clap(short, long, parse(from_os_str), value_name = "FILE")]
    file: PathBuf,
    /// Overlay file refining the specification (TOML, YAML or JSON)
    #[clap(short, long, parse(from_os_str), value_name = "OVERLAY")]
    overlay: Option<PathBuf>,
    /// Directory to write the artifacts to, overriding the configured one
    #[clap(short = 'd', long, parse(from_os_str), value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Print the artifacts instead of writing them
    #[clap(long)]
    dry_run: bool,
}

impl Arg {
    pub fn handle(&self) -> Result<()> {
        let spec = load_spec(&self.file)?;
        let overlay = load_overlay(self.overlay.as_deref())?;
        let prefix = output_name(&spec)
            .ok_or_else(|| anyhow!("{} declares no workload and no job", self.file.display()))?
            .to_string();

        let mut ctx = BuildContext::new(CONFIG.clone(), DockerEnv::from_env());
        generate(&mut ctx, &spec, overlay.as_ref())
            .with_context(|| format!("Failed to generate artifacts for {}", self.file.display()))?;

        tracing::info!("Generated {} artifacts for {}", ctx.artifacts().len(), prefix);

        if self.dry_run {
            for artifact in ctx.artifacts() {
                print!("{}", artifact.render()?);
            }
            return Ok(());
        }

        let output_dir = self
            .output_dir
            .to_owned()
            .unwrap_or_else(|| PathBuf::from(&CONFIG.output_dir));
        let written = write_artifacts(&output_dir, &prefix, ctx.artifacts())?;
        for path in written {
            println!("{}", path.display());
        }
        Ok(())
    }
}
