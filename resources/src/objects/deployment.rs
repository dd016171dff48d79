use serde::{Deserialize, Serialize};
use strum::Display;

use super::{pod::PodTemplateSpec, Labels, Metadata, Object};

/// Deployment enables declarative updates for Pods and ReplicaSets.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub metadata: Metadata,
    /// Specification of the desired behavior of the Deployment.
    pub spec: DeploymentSpec,
}

impl Object for Deployment {
    fn kind(&self) -> &'static str {
        "Deployment"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

impl std::fmt::Display for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<16} {}", "Name:", self.metadata.name)?;
        writeln!(f, "{:<16} {}", "Selector:", self.spec.selector.match_labels)?;
        writeln!(f, "{:<16} {}", "Replicas:", self.spec.replicas)?;
        writeln!(f, "{:<16} {}", "Strategy:", self.spec.strategy.type_)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeploymentSpec {
    /// Label selector for pods.
    /// It must match the pod template's labels.
    pub selector: LabelSelector,
    /// The deployment strategy to use to replace existing pods with new ones.
    #[serde(default)]
    pub strategy: DeploymentStrategy,
    /// Number of desired pods.
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    /// Template describes the pods that will be created.
    pub template: PodTemplateSpec,
}

pub fn default_replicas() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// A map of {key,value} pairs that all must match.
    pub match_labels: Labels,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStrategy {
    /// Type of deployment. Can be "Recreate" or "RollingUpdate".
    #[serde(rename = "type", default)]
    pub type_: StrategyType,
    /// Rolling update config params. Present only if type = RollingUpdate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_update: Option<RollingUpdateDeployment>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
pub enum StrategyType {
    /// Kill all existing pods before creating new ones.
    Recreate,
    /// Replace the old ReplicaSets by new one using rolling update.
    RollingUpdate,
}

impl Default for StrategyType {
    fn default() -> Self {
        StrategyType::RollingUpdate
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RollingUpdateDeployment {
    /// The maximum number of pods that can be scheduled above the desired number of pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_surge: Option<IntOrString>,
    /// The maximum number of pods that can be unavailable during the update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,
}

/// Either an absolute number or a percentage such as "25%".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i32),
    String(String),
}
