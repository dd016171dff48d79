use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use super::{quantity::Quantity, Metadata, Object};

/// A user's request for and claim to a persistent volume.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaim {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: PersistentVolumeClaimSpec,
}

impl Object for PersistentVolumeClaim {
    fn kind(&self) -> &'static str {
        "PersistentVolumeClaim"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimSpec {
    /// The desired access modes the volume should have.
    pub access_modes: Vec<AccessMode>,
    /// The minimum resources the volume should have.
    pub resources: VolumeResourceRequirements,
    /// Name of the StorageClass required by the claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
}

impl Default for AccessMode {
    fn default() -> Self {
        AccessMode::ReadWriteOnce
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct VolumeResourceRequirements {
    /// Keyed by "storage".
    pub requests: BTreeMap<String, Quantity>,
}
