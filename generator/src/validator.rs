//! Checks a resolved workload specification before anything is assembled
//! from it.

use std::{collections::BTreeSet, ops::Deref};

use resources::{models::workload::WorkloadSpec, objects::pod::Probe};

use crate::{
    error::{Error, Result},
    resolver::ProbeKind,
    volume,
};

/// A resolved workload specification that passed validation.
/// Read-only from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSpec(WorkloadSpec);

impl Deref for ValidatedSpec {
    type Target = WorkloadSpec;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ValidatedSpec {
    pub fn into_inner(self) -> WorkloadSpec {
        self.0
    }
}

/// Checks a resolved specification. The first failing check aborts.
pub fn validate(mut spec: WorkloadSpec) -> Result<ValidatedSpec> {
    if spec.name.is_empty() {
        return Err(Error::missing_field("workload", "name"));
    }
    if spec.image.is_empty() {
        return Err(Error::missing_field(
            &format!("workload '{}'", spec.name),
            "image",
        ));
    }

    let first_port = spec.first_port();
    fill_probe_port(ProbeKind::Liveness, &mut spec.liveness_probe, first_port)?;
    fill_probe_port(ProbeKind::Readiness, &mut spec.readiness_probe, first_port)?;

    check_references(&spec)?;
    volume::synthesize(&spec).check_integrity()?;

    Ok(ValidatedSpec(spec))
}

fn fill_probe_port(kind: ProbeKind, probe: &mut Option<Probe>, first_port: Option<u16>) -> Result<()> {
    if let Some(probe) = probe {
        if probe.http_get.port == 0 {
            probe.http_get.port = first_port.ok_or_else(|| Error::missing_port(&kind.to_string()))?;
        }
    }
    Ok(())
}

fn check_references(spec: &WorkloadSpec) -> Result<()> {
    let references = spec
        .secrets
        .iter()
        .map(|secret| ("secret", secret.name.as_str(), Some(secret.mount_path.as_str())))
        .chain(spec.config_maps.iter().map(|config_map| {
            ("config map", config_map.name.as_str(), config_map.mount_path.as_deref())
        }))
        .chain(
            spec.volume_claims
                .iter()
                .map(|claim| ("volume claim", claim.name.as_str(), Some(claim.mount_path.as_str()))),
        );

    let mut mount_paths = BTreeSet::new();
    for (kind, name, mount_path) in references {
        if name.is_empty() {
            return Err(Error::Validation(format!("a {} reference has no name", kind)));
        }
        match mount_path {
            Some("") => {
                return Err(Error::Validation(format!(
                    "{} '{}' has an empty mount path",
                    kind, name
                )));
            },
            Some(path) if !mount_paths.insert(path) => {
                return Err(Error::Validation(format!(
                    "{} '{}' is mounted at {}, which is already in use",
                    kind, name, path
                )));
            },
            _ => {},
        }
    }
    Ok(())
}
