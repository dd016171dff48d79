//! Manifests for the storage a workload mounts.
//!
//! Secrets and config maps are only emitted when the reference carries data;
//! otherwise the object is expected to exist already. Volume claims are
//! always emitted and need a size.

use std::collections::BTreeMap;

use resources::{
    models::workload::{ConfigMapRef, SecretRef, VolumeClaimRef},
    objects::{
        config_map::ConfigMap,
        secret::Secret,
        volume_claim::{PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements},
        Metadata,
    },
};

use crate::error::{Error, Result};

pub fn secret(reference: &SecretRef, namespace: Option<&str>) -> Option<Secret> {
    if reference.data.is_empty() {
        return None;
    }
    let mut secret = Secret::opaque(Metadata::new(&reference.name, namespace.map(str::to_string)));
    secret.string_data = reference.data.clone();
    Some(secret)
}

pub fn config_map(reference: &ConfigMapRef, namespace: Option<&str>) -> Option<ConfigMap> {
    if reference.data.is_empty() {
        return None;
    }
    let mut config_map =
        ConfigMap::new(Metadata::new(&reference.name, namespace.map(str::to_string)));
    config_map.data = reference.data.clone();
    Some(config_map)
}

pub fn volume_claim(
    reference: &VolumeClaimRef,
    namespace: Option<&str>,
) -> Result<PersistentVolumeClaim> {
    let size = reference.volume_claim_size.clone().ok_or_else(|| {
        Error::missing_field(&format!("volume claim '{}'", reference.name), "size")
    })?;
    Ok(PersistentVolumeClaim {
        api_version: "v1".to_string(),
        metadata: Metadata::new(&reference.name, namespace.map(str::to_string)),
        spec: PersistentVolumeClaimSpec {
            access_modes: vec![reference.access_mode],
            resources: VolumeResourceRequirements {
                requests: BTreeMap::from([("storage".to_string(), size)]),
            },
            storage_class_name: reference.storage_class.clone(),
        },
    })
}
