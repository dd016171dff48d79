use std::{
    collections::BTreeMap,
    fmt::{Debug, Display, Formatter},
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub mod config_map;
pub mod deployment;
pub mod hpa;
pub mod job;
pub mod object_reference;
pub mod pod;
pub mod quantity;
pub mod secret;
pub mod volume_claim;

pub trait Object: Serialize + Debug + Clone {
    fn kind(&self) -> &'static str;

    fn name(&self) -> &String;
}

/// A manifest of one of the supported resource kinds.
/// Serialized with its `kind` field first, then the object itself.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum KubeObject {
    Deployment(deployment::Deployment),
    Job(job::Job),
    CronJob(job::CronJob),
    ConfigMap(config_map::ConfigMap),
    Secret(secret::Secret),
    PersistentVolumeClaim(volume_claim::PersistentVolumeClaim),
    HorizontalPodAutoscaler(hpa::HorizontalPodAutoscaler),
}

impl KubeObject {
    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            KubeObject::Deployment(_) => ResourceKind::Deployment,
            KubeObject::Job(_) => ResourceKind::Job,
            KubeObject::CronJob(_) => ResourceKind::CronJob,
            KubeObject::ConfigMap(_) => ResourceKind::ConfigMap,
            KubeObject::Secret(_) => ResourceKind::Secret,
            KubeObject::PersistentVolumeClaim(_) => ResourceKind::VolumeClaim,
            KubeObject::HorizontalPodAutoscaler(_) => ResourceKind::Hpa,
        }
    }
}

impl Object for KubeObject {
    fn kind(&self) -> &'static str {
        match self {
            KubeObject::Deployment(object) => object.kind(),
            KubeObject::Job(object) => object.kind(),
            KubeObject::CronJob(object) => object.kind(),
            KubeObject::ConfigMap(object) => object.kind(),
            KubeObject::Secret(object) => object.kind(),
            KubeObject::PersistentVolumeClaim(object) => object.kind(),
            KubeObject::HorizontalPodAutoscaler(object) => object.kind(),
        }
    }

    fn name(&self) -> &String {
        match self {
            KubeObject::Deployment(object) => object.name(),
            KubeObject::Job(object) => object.name(),
            KubeObject::CronJob(object) => object.name(),
            KubeObject::ConfigMap(object) => object.name(),
            KubeObject::Secret(object) => object.name(),
            KubeObject::PersistentVolumeClaim(object) => object.name(),
            KubeObject::HorizontalPodAutoscaler(object) => object.name(),
        }
    }
}

/// Artifact kinds produced by one generation run.
/// The declaration order is the order artifacts are emitted in,
/// and the display form is the file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Secret,
    ConfigMap,
    VolumeClaim,
    Hpa,
    Deployment,
    Job,
    #[strum(serialize = "cronjob")]
    CronJob,
    Image,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Labels(BTreeMap::new())
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Labels {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let labels = self
            .0
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", labels)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Metadata {
    /// Name must be unique within a namespace.
    pub name: String,
    /// Namespace defines the space within which each name must be unique.
    /// Left out of the manifest when unset, so the orchestrator's
    /// current namespace applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Map of string keys and values that can be used
    /// to organize and categorize (scope and select) objects.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Unstructured key value map stored with a resource
    /// that may be set by external tools to store and retrieve arbitrary metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Metadata {
            name: name.into(),
            namespace,
            ..Default::default()
        }
    }
}
