use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use generator::parse_overlay;
use resources::models::{overlay::Overlay, BuildSpec};

/// Reads a base specification from a YAML file.
pub fn load_spec(path: &Path) -> Result<BuildSpec> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;
    serde_yaml::from_reader(file).with_context(|| format!("Failed to parse file {}", path.display()))
}

/// Reads an overlay document. The format follows the file extension.
pub fn load_overlay(path: Option<&Path>) -> Result<Option<Overlay>> {
    let path = match path {
        Some(path) => path,
        None => return Ok(None),
    };
    let tree = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .with_context(|| format!("Failed to read overlay {}", path.display()))?
        .try_deserialize::<serde_json::Value>()
        .with_context(|| format!("Failed to decode overlay {}", path.display()))?;
    let overlay =
        parse_overlay(tree).with_context(|| format!("Invalid overlay {}", path.display()))?;
    Ok(Some(overlay))
}
