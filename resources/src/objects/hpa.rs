use serde::{Deserialize, Serialize};

use super::{object_reference::ObjectReference, Metadata, Object};

/// Configuration of a horizontal pod autoscaler.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscaler {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: HorizontalPodAutoscalerSpec,
}

impl Object for HorizontalPodAutoscaler {
    fn kind(&self) -> &'static str {
        "HorizontalPodAutoscaler"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscalerSpec {
    /// Reference to scaled resource.
    /// The autoscaler will learn the current resource consumption
    /// and will set the desired number of pods by using its Scale subresource.
    pub scale_target_ref: ObjectReference,
    /// The lower limit for the number of pods that can be set by the autoscaler.
    pub min_replicas: u32,
    /// The upper limit for the number of pods that can be set by the autoscaler.
    /// It cannot be smaller than MinReplicas.
    pub max_replicas: u32,
    /// Target average CPU utilization (represented as a percentage of requested CPU)
    /// over all the pods.
    #[serde(rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: u32,
}
