//! Volume and mount synthesis from storage references.

use std::collections::BTreeSet;

use resources::{
    models::workload::WorkloadSpec,
    objects::pod::{
        ClaimVolumeSource, ConfigMapVolumeSource, SecretVolumeSource, Volume, VolumeMount,
        VolumeSource,
    },
};

use crate::error::{Error, Result};

pub const VOLUME_SUFFIX: &str = "-volume";

pub fn volume_name(reference: &str) -> String {
    format!("{}{}", reference, VOLUME_SUFFIX)
}

/// Mounts of the workload container and the pod volumes backing them,
/// paired index by index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VolumeBindings {
    pub mounts: Vec<VolumeMount>,
    pub volumes: Vec<Volume>,
}

impl VolumeBindings {
    fn bind(&mut self, reference: &str, mount_path: &str, read_only: bool, source: VolumeSource) {
        let name = volume_name(reference);
        self.mounts.push(VolumeMount {
            name: name.clone(),
            mount_path: mount_path.to_string(),
            read_only,
        });
        self.volumes.push(Volume {
            name,
            source,
        });
    }

    /// Every mount names exactly one volume and every volume is mounted.
    pub fn check_integrity(&self) -> Result<()> {
        let mut mounts = BTreeSet::new();
        for mount in &self.mounts {
            if !mounts.insert(mount.name.as_str()) {
                return Err(Error::Validation(format!(
                    "volume mount {} is declared more than once",
                    mount.name
                )));
            }
        }
        let mut volumes = BTreeSet::new();
        for volume in &self.volumes {
            if !volumes.insert(volume.name.as_str()) {
                return Err(Error::Validation(format!(
                    "volume {} is declared more than once",
                    volume.name
                )));
            }
        }

        let unbacked = mounts.difference(&volumes).copied().collect::<Vec<_>>();
        let unmounted = volumes.difference(&mounts).copied().collect::<Vec<_>>();
        if !unbacked.is_empty() || !unmounted.is_empty() {
            return Err(Error::Validation(format!(
                "broken volume references: mounts without volume [{}], volumes without mount [{}]",
                unbacked.join(", "),
                unmounted.join(", ")
            )));
        }
        Ok(())
    }
}

fn default_mode(mode: u32) -> Option<u32> {
    (mode > 0).then(|| mode)
}

/// Binds secrets, then config maps that have a mount path, then volume claims.
pub fn synthesize(spec: &WorkloadSpec) -> VolumeBindings {
    let mut bindings = VolumeBindings::default();
    for secret in &spec.secrets {
        bindings.bind(
            &secret.name,
            &secret.mount_path,
            secret.read_only,
            VolumeSource::Secret(SecretVolumeSource {
                secret_name: secret.name.clone(),
                default_mode: default_mode(secret.default_mode),
            }),
        );
    }
    for config_map in &spec.config_maps {
        if let Some(mount_path) = &config_map.mount_path {
            bindings.bind(
                &config_map.name,
                mount_path,
                config_map.read_only,
                VolumeSource::ConfigMap(ConfigMapVolumeSource {
                    name: config_map.name.clone(),
                    default_mode: default_mode(config_map.default_mode),
                }),
            );
        }
    }
    for claim in &spec.volume_claims {
        bindings.bind(
            &claim.name,
            &claim.mount_path,
            claim.read_only,
            VolumeSource::PersistentVolumeClaim(ClaimVolumeSource {
                claim_name: claim.name.clone(),
            }),
        );
    }
    bindings
}
