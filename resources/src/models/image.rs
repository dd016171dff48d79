use std::{collections::BTreeSet, fmt::Write};

use indenter::indented;
use serde::{Deserialize, Serialize};

/// Everything an image builder needs to build, tag and push the workload image.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// Image name without registry and tag.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,
    /// Ports to expose from the image.
    #[serde(default)]
    pub ports: BTreeSet<u16>,
    pub push: bool,
    pub build_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_config_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_cert_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command_args: Vec<String>,
    pub enable_debug: bool,
    /// Whether the image runs a network service rather than a one-shot job.
    pub service: bool,
}

impl ImageDescriptor {
    /// `[registry/]name:tag`
    pub fn reference(&self) -> String {
        match self.registry.as_deref() {
            Some(registry) if !registry.is_empty() => {
                format!("{}/{}:{}", registry, self.name, self.tag)
            },
            _ => format!("{}:{}", self.name, self.tag),
        }
    }
}

impl std::fmt::Display for ImageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<16} {}", "Image:", self.reference())?;
        if let Some(base_image) = &self.base_image {
            writeln!(f, "{:<16} {}", "Base:", base_image)?;
        }
        let ports = self
            .ports
            .iter()
            .map(|port| port.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "{:<16} {}", "Ports:", ports)?;
        writeln!(f, "{:<16} build={} push={}", "Actions:", self.build_image, self.push)?;
        if let Some(host) = &self.docker_host {
            writeln!(f, "Docker:")?;
            writeln!(indented(f), "{:<12} {}", "Host:", host)?;
            if let Some(cert_path) = &self.docker_cert_path {
                writeln!(indented(f), "{:<12} {}", "Cert path:", cert_path)?;
            }
        }
        if !self.command_args.is_empty() {
            writeln!(f, "{:<16} {}", "Arguments:", self.command_args.join(" "))?;
        }
        Ok(())
    }
}
