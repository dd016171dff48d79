use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BuildSettings;
use crate::objects::{
    deployment::{default_replicas, DeploymentStrategy},
    pod::{ContainerPort, EnvVar, ImagePullPolicy, Probe, ResourceRequirements},
    quantity::Quantity,
    volume_claim::AccessMode,
    Labels,
};

/// Base specification of a long-running, network-listening workload,
/// as derived from its source-level declarations.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkloadSpec {
    /// Name of the workload. Also used as the container name.
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
    /// Annotations of the workload object itself.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Annotations of the pods created from the template.
    #[serde(default)]
    pub pod_annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Full image string, `[registry/]name:tag`.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub registry: Option<String>,
    /// Image the workload image is built from.
    #[serde(default)]
    pub base_image: Option<String>,
    #[serde(default)]
    pub image_pull_policy: Option<ImagePullPolicy>,
    /// Ports the workload listens on, in declaration order.
    #[serde(default)]
    pub ports: Vec<ContainerPort>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub liveness_probe: Option<Probe>,
    #[serde(default)]
    pub readiness_probe: Option<Probe>,
    #[serde(default)]
    pub resources: ResourceRequirements,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default)]
    pub strategy: DeploymentStrategy,
    #[serde(default)]
    pub node_selector: BTreeMap<String, String>,
    /// Names of the secrets used to pull the image.
    #[serde(default)]
    pub image_pull_secrets: Vec<String>,
    #[serde(default)]
    pub secrets: Vec<SecretRef>,
    #[serde(default)]
    pub config_maps: Vec<ConfigMapRef>,
    #[serde(default)]
    pub volume_claims: Vec<VolumeClaimRef>,
    #[serde(default)]
    pub autoscaler: Option<AutoscalerDeclaration>,
    #[serde(default)]
    pub build: BuildSettings,
}

impl WorkloadSpec {
    pub fn new(name: impl Into<String>) -> Self {
        WorkloadSpec {
            name: name.into(),
            labels: Labels::new(),
            annotations: BTreeMap::new(),
            pod_annotations: BTreeMap::new(),
            namespace: None,
            image: String::new(),
            registry: None,
            base_image: None,
            image_pull_policy: None,
            ports: vec![],
            env: vec![],
            liveness_probe: None,
            readiness_probe: None,
            resources: ResourceRequirements::default(),
            replicas: default_replicas(),
            strategy: DeploymentStrategy::default(),
            node_selector: BTreeMap::new(),
            image_pull_secrets: vec![],
            secrets: vec![],
            config_maps: vec![],
            volume_claims: vec![],
            autoscaler: None,
            build: BuildSettings::default(),
        }
    }

    /// The first declared container port, the implicit target of probes.
    pub fn first_port(&self) -> Option<u16> {
        self.ports.first().map(|port| port.container_port)
    }
}

/// A secret mounted into the workload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecretRef {
    pub name: String,
    pub mount_path: String,
    #[serde(default = "default_read_only")]
    pub read_only: bool,
    /// File mode of the projected files; 0 leaves the orchestrator default.
    #[serde(default)]
    pub default_mode: u32,
    /// File name to plain-text content.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// A config map, optionally mounted into the workload.
/// Config maps without a mount path only feed environment variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigMapRef {
    pub name: String,
    #[serde(default)]
    pub mount_path: Option<String>,
    #[serde(default = "default_read_only")]
    pub read_only: bool,
    #[serde(default)]
    pub default_mode: u32,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// A persistent volume claim mounted into the workload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeClaimRef {
    pub name: String,
    pub mount_path: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub default_mode: u32,
    #[serde(default)]
    pub access_mode: AccessMode,
    #[serde(default)]
    pub volume_claim_size: Option<Quantity>,
    #[serde(default)]
    pub storage_class: Option<String>,
}

fn default_read_only() -> bool {
    true
}

/// Horizontal scaling bounds. Unset fields are derived from the resolved workload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutoscalerDeclaration {
    #[serde(default)]
    pub min_replicas: Option<u32>,
    #[serde(default)]
    pub max_replicas: Option<u32>,
    #[serde(default)]
    pub cpu_percentage: Option<u32>,
}
