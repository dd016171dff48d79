//! Typed schema of the build-time overlay document.
//!
//! Every section rejects keys it does not know, so a misspelled key fails
//! the build instead of being dropped.

use serde::{Deserialize, Serialize};

use super::job::ScheduleFields;
use crate::objects::quantity::Quantity;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Overlay {
    #[serde(default)]
    pub deployment: Option<DeploymentOverlay>,
    #[serde(default)]
    pub config: Option<ConfigOverlay>,
    #[serde(default)]
    pub container: Option<ContainerOverlay>,
    #[serde(default)]
    pub job: Option<JobOverlay>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DeploymentOverlay {
    #[serde(default)]
    pub replicas: Option<u32>,
    #[serde(default)]
    pub min_memory: Option<Quantity>,
    #[serde(default)]
    pub min_cpu: Option<Quantity>,
    #[serde(default)]
    pub max_memory: Option<Quantity>,
    #[serde(default)]
    pub max_cpu: Option<Quantity>,
    #[serde(default)]
    pub probes: Option<ProbesOverlay>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProbesOverlay {
    #[serde(default)]
    pub readiness: Option<ProbeOverlay>,
    #[serde(default)]
    pub liveness: Option<ProbeOverlay>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProbeOverlay {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub envs: Vec<EnvOverlay>,
}

/// An environment variable read from a key of a config map.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnvOverlay {
    pub name: String,
    pub key: String,
    pub config_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ContainerOverlay {
    #[serde(default)]
    pub image: Option<ImageOverlay>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ImageOverlay {
    #[serde(default)]
    pub name: Option<String>,
    /// Registry the image is pushed to.
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct JobOverlay {
    #[serde(default)]
    pub schedule: Option<ScheduleFields>,
}

impl Overlay {
    pub fn deployment(&self) -> Option<&DeploymentOverlay> {
        self.deployment.as_ref()
    }

    pub fn probes(&self) -> Option<&ProbesOverlay> {
        self.deployment().and_then(|deployment| deployment.probes.as_ref())
    }

    pub fn envs(&self) -> &[EnvOverlay] {
        self.config
            .as_ref()
            .map(|config| config.envs.as_slice())
            .unwrap_or_default()
    }

    pub fn image(&self) -> Option<&ImageOverlay> {
        self.container
            .as_ref()
            .and_then(|container| container.image.as_ref())
    }

    pub fn schedule(&self) -> Option<&ScheduleFields> {
        self.job.as_ref().and_then(|job| job.schedule.as_ref())
    }
}
