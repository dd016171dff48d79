use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use generator::schedule::resolve_schedule;

use crate::{
    utils::{load_overlay, load_spec},
    CONFIG,
};

#[derive(Args)]
pub struct Arg {
    /// The base specification YAML file
    #[clap(short, long, parse(from_os_str), value_name = "FILE")]
    file: PathBuf,
    /// Overlay file refining the specification
    #[clap(short, long, parse(from_os_str), value_name = "OVERLAY")]
    overlay: Option<PathBuf>,
    /// Fail on missing schedule fields instead of printing them as null
    #[clap(long)]
    strict: bool,
}

impl Arg {
    pub fn handle(&self) -> Result<()> {
        let spec = load_spec(&self.file)?;
        let overlay = load_overlay(self.overlay.as_deref())?;
        let job = spec
            .job
            .ok_or_else(|| anyhow!("{} declares no job", self.file.display()))?;

        let strict = self.strict || CONFIG.strict_schedule;
        let schedule = resolve_schedule(job.schedule.as_ref(), overlay.as_ref(), strict)
            .with_context(|| format!("Failed to resolve schedule of job {}", job.name))?;
        match schedule {
            Some(schedule) => println!("{}", schedule),
            None => println!("Job {} runs once, it has no schedule", job.name),
        }
        Ok(())
    }
}
