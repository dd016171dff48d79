use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use generator::{image::describe_workload, resolve, validate};

use crate::utils::{load_overlay, load_spec};

#[derive(Args)]
pub struct Arg {
    /// The base specification YAML file
    #[clap(short, long, parse(from_os_str), value_name = "FILE")]
    file: PathBuf,
    /// Overlay file refining the specification
    #[clap(short, long, parse(from_os_str), value_name = "OVERLAY")]
    overlay: Option<PathBuf>,
    /// Print the descriptor as YAML
    #[clap(long)]
    yaml: bool,
}

impl Arg {
    pub fn handle(&self) -> Result<()> {
        let spec = load_spec(&self.file)?;
        let overlay = load_overlay(self.overlay.as_deref())?;
        let workload = spec
            .workload
            .ok_or_else(|| anyhow!("{} declares no workload", self.file.display()))?;

        let resolved = resolve(&workload, overlay.as_ref())
            .and_then(validate)
            .with_context(|| format!("Failed to resolve workload {}", workload.name))?;
        let descriptor = describe_workload(&resolved);

        if self.yaml {
            print!("{}", serde_yaml::to_string(&descriptor)?);
        } else {
            print!("{}", descriptor);
        }
        Ok(())
    }
}
