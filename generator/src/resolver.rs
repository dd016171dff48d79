//! Overlay resolution for service workloads.
//!
//! Every step is a pure function of the base specification and the overlay.
//! An absent overlay, or an absent overlay section, leaves the base value in
//! place.

use std::collections::{BTreeMap, BTreeSet};

use resources::{
    models::{
        overlay::{ImageOverlay, Overlay, ProbeOverlay},
        workload::WorkloadSpec,
    },
    objects::{
        pod::{EnvVar, Probe, ResourceName, ResourceRequirements},
        quantity::Quantity,
        Labels,
    },
};
use strum::Display;

use crate::{
    error::{Error, Result},
    image::{compose, ImageRef},
};

/// Suffix upstream appends to workload names.
pub const DEPLOYMENT_POSTFIX: &str = "-deployment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProbeKind {
    Liveness,
    Readiness,
}

/// Workload name without the upstream postfix.
pub fn base_name(name: &str) -> &str {
    name.strip_suffix(DEPLOYMENT_POSTFIX).unwrap_or(name)
}

/// Merges the overlay onto the base specification.
pub fn resolve(base: &WorkloadSpec, overlay: Option<&Overlay>) -> Result<WorkloadSpec> {
    let (liveness_probe, readiness_probe) = resolve_probes(base, overlay);
    let image = resolve_image(base, overlay)?;
    Ok(WorkloadSpec {
        labels: resolve_labels(base),
        replicas: resolve_replicas(base, overlay),
        resources: resolve_resources(base, overlay),
        liveness_probe,
        readiness_probe,
        env: resolve_env(base, overlay),
        image: image.image,
        registry: image.registry,
        base_image: image.base_image,
        ..base.clone()
    })
}

/// Declared labels, or `app: <name>` when none are declared.
/// A workload selector must not be empty.
pub fn resolve_labels(base: &WorkloadSpec) -> Labels {
    if base.labels.is_empty() {
        Labels::new().insert("app", base_name(&base.name))
    } else {
        base.labels.clone()
    }
}

pub fn resolve_replicas(base: &WorkloadSpec, overlay: Option<&Overlay>) -> u32 {
    overlay
        .and_then(Overlay::deployment)
        .and_then(|deployment| deployment.replicas)
        .unwrap_or(base.replicas)
}

/// Per-key override of requests (`min_*`) and limits (`max_*`).
/// Keys the overlay does not name keep their base values.
pub fn resolve_resources(base: &WorkloadSpec, overlay: Option<&Overlay>) -> ResourceRequirements {
    let mut resources = base.resources.clone();
    if let Some(deployment) = overlay.and_then(Overlay::deployment) {
        set_quantity(&mut resources.requests, ResourceName::Memory, &deployment.min_memory);
        set_quantity(&mut resources.requests, ResourceName::Cpu, &deployment.min_cpu);
        set_quantity(&mut resources.limits, ResourceName::Memory, &deployment.max_memory);
        set_quantity(&mut resources.limits, ResourceName::Cpu, &deployment.max_cpu);
    }
    resources
}

fn set_quantity(
    quantities: &mut BTreeMap<ResourceName, Quantity>,
    name: ResourceName,
    value: &Option<Quantity>,
) {
    if let Some(value) = value {
        quantities.insert(name, value.clone());
    }
}

/// Liveness and readiness probes, in that order.
///
/// A probe named by the overlay replaces the base probe as a whole. Its port
/// defaults to the first declared container port; with no ports declared it
/// stays 0 and validation reports it.
pub fn resolve_probes(
    base: &WorkloadSpec,
    overlay: Option<&Overlay>,
) -> (Option<Probe>, Option<Probe>) {
    let probes = overlay.and_then(Overlay::probes);
    let pick = |kind: ProbeKind, base_probe: &Option<Probe>| {
        let probe_overlay = probes.and_then(|probes| match kind {
            ProbeKind::Liveness => probes.liveness.as_ref(),
            ProbeKind::Readiness => probes.readiness.as_ref(),
        });
        match probe_overlay {
            Some(probe_overlay) => {
                let probe = probe_from_overlay(probe_overlay, base.first_port());
                tracing::debug!(
                    "{} probe set from overlay: path={:?} port={}",
                    kind,
                    probe.http_get.path,
                    probe.http_get.port
                );
                Some(probe)
            },
            None => base_probe.clone(),
        }
    };
    (
        pick(ProbeKind::Liveness, &base.liveness_probe),
        pick(ProbeKind::Readiness, &base.readiness_probe),
    )
}

fn probe_from_overlay(overlay: &ProbeOverlay, default_port: Option<u16>) -> Probe {
    let port = overlay.port.or(default_port).unwrap_or(0);
    Probe::http(overlay.path.clone(), port)
}

/// Base variables followed by one config-map-sourced variable per overlay entry.
/// Same-named variables are kept; the orchestrator lets the last one win.
pub fn resolve_env(base: &WorkloadSpec, overlay: Option<&Overlay>) -> Vec<EnvVar> {
    let mut env = base.env.clone();
    let mut names = env.iter().map(|var| var.name.clone()).collect::<BTreeSet<_>>();
    for entry in overlay.map(Overlay::envs).unwrap_or_default() {
        if !names.insert(entry.name.clone()) {
            tracing::warn!("Environment variable {} is declared more than once", entry.name);
        }
        env.push(EnvVar::from_config_map(
            &entry.name,
            &entry.config_name,
            &entry.key,
        ));
    }
    env
}

/// Resolved image string together with the coordinates it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub image: String,
    pub registry: Option<String>,
    pub base_image: Option<String>,
}

pub fn resolve_image(base: &WorkloadSpec, overlay: Option<&Overlay>) -> Result<ResolvedImage> {
    resolve_image_coordinates(
        &base.name,
        &base.image,
        base.registry.as_deref(),
        base.base_image.as_deref(),
        overlay.and_then(Overlay::image),
    )
}

/// Applies an overlay image section to declared image coordinates.
///
/// Each overlay field wins over the declared one, except the name: an
/// overlay without a name takes the owner's name, whatever the declared
/// image is called. Without an overlay section, the declared image is only
/// normalized to `[registry/]name:tag`.
pub fn resolve_image_coordinates(
    owner: &str,
    image: &str,
    registry: Option<&str>,
    base_image: Option<&str>,
    overlay: Option<&ImageOverlay>,
) -> Result<ResolvedImage> {
    let registry = registry.filter(|registry| !registry.is_empty());
    let declared = (!image.is_empty()).then(|| ImageRef::parse(image, registry));
    let overlay = match overlay {
        Some(overlay) => overlay,
        None => {
            return Ok(ResolvedImage {
                image: declared
                    .as_ref()
                    .map(ImageRef::reference)
                    .unwrap_or_default(),
                registry: declared
                    .and_then(|declared| declared.registry)
                    .or_else(|| registry.map(str::to_string)),
                base_image: base_image.map(str::to_string),
            });
        },
    };

    let name = overlay
        .name
        .clone()
        .unwrap_or_else(|| base_name(owner).to_string());
    if name.is_empty() {
        return Err(Error::missing_field(&format!("'{}'", owner), "image name"));
    }
    let tag = overlay
        .tag
        .clone()
        .or_else(|| declared.as_ref().map(|declared| declared.tag.clone()))
        .unwrap_or_else(|| crate::image::DEFAULT_TAG.to_string());
    let registry = overlay
        .repository
        .clone()
        .or_else(|| declared.as_ref().and_then(|declared| declared.registry.clone()))
        .or_else(|| registry.map(str::to_string))
        .filter(|registry| !registry.is_empty());
    let base_image = overlay
        .base
        .clone()
        .or_else(|| base_image.map(str::to_string));

    Ok(ResolvedImage {
        image: compose(registry.as_deref(), &name, &tag),
        registry,
        base_image,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use resources::{
        models::overlay::{
            ConfigOverlay, ContainerOverlay, DeploymentOverlay, EnvOverlay, ProbesOverlay,
        },
        objects::pod::ContainerPort,
    };

    use super::*;

    fn base() -> WorkloadSpec {
        let mut spec = WorkloadSpec::new("hello-deployment");
        spec.image = "hello:1.0.0".to_string();
        spec.ports = vec![ContainerPort::new(8080), ContainerPort::new(9090)];
        spec
    }

    fn deployment_overlay(deployment: DeploymentOverlay) -> Overlay {
        Overlay {
            deployment: Some(deployment),
            ..Default::default()
        }
    }

    fn quantity(value: &str) -> Quantity {
        value.parse().unwrap()
    }

    #[test]
    fn replicas_from_overlay() {
        let overlay = deployment_overlay(DeploymentOverlay {
            replicas: Some(5),
            ..Default::default()
        });
        assert_eq!(resolve_replicas(&base(), Some(&overlay)), 5);
    }

    #[test]
    fn replicas_without_overlay() {
        assert_eq!(resolve_replicas(&base(), None), 1);
        let empty = Overlay::default();
        assert_eq!(resolve_replicas(&base(), Some(&empty)), 1);
    }

    #[test]
    fn resources_override_per_key() {
        let mut spec = base();
        spec.resources
            .requests
            .insert(ResourceName::Cpu, quantity("100m"));
        spec.resources
            .requests
            .insert(ResourceName::Memory, quantity("64Mi"));
        spec.resources
            .limits
            .insert(ResourceName::Cpu, quantity("1"));
        let overlay = deployment_overlay(DeploymentOverlay {
            min_memory: Some(quantity("128Mi")),
            max_memory: Some(quantity("256Mi")),
            ..Default::default()
        });

        let resources = resolve_resources(&spec, Some(&overlay));

        assert_eq!(resources.requests[&ResourceName::Cpu], quantity("100m"));
        assert_eq!(resources.requests[&ResourceName::Memory], quantity("128Mi"));
        assert_eq!(resources.limits[&ResourceName::Cpu], quantity("1"));
        assert_eq!(resources.limits[&ResourceName::Memory], quantity("256Mi"));
    }

    #[test]
    fn probe_port_defaults_to_first_port() {
        let overlay = deployment_overlay(DeploymentOverlay {
            probes: Some(ProbesOverlay {
                readiness: Some(ProbeOverlay {
                    port: None,
                    path: Some("/ready".to_string()),
                }),
                liveness: None,
            }),
            ..Default::default()
        });

        let (liveness, readiness) = resolve_probes(&base(), Some(&overlay));

        assert_eq!(liveness, None);
        assert_eq!(readiness, Some(Probe::http(Some("/ready".to_string()), 8080)));
        assert_eq!(readiness.unwrap().initial_delay_seconds, 30);
    }

    #[test]
    fn overlay_probe_replaces_base_probe() {
        let mut spec = base();
        spec.liveness_probe = Some(Probe {
            initial_delay_seconds: 5,
            ..Probe::http(Some("/old".to_string()), 9090)
        });
        let overlay = deployment_overlay(DeploymentOverlay {
            probes: Some(ProbesOverlay {
                readiness: None,
                liveness: Some(ProbeOverlay {
                    port: Some(7070),
                    path: None,
                }),
            }),
            ..Default::default()
        });

        let (liveness, _) = resolve_probes(&spec, Some(&overlay));

        assert_eq!(liveness, Some(Probe::http(None, 7070)));
    }

    #[test]
    fn probe_without_ports_stays_unset() {
        let mut spec = base();
        spec.ports.clear();
        let overlay = deployment_overlay(DeploymentOverlay {
            probes: Some(ProbesOverlay {
                readiness: None,
                liveness: Some(ProbeOverlay::default()),
            }),
            ..Default::default()
        });

        let (liveness, _) = resolve_probes(&spec, Some(&overlay));

        assert_eq!(liveness.unwrap().http_get.port, 0);
    }

    #[test]
    fn env_is_append_only() {
        let mut spec = base();
        spec.env = vec![EnvVar::literal("DB_HOST", "localhost")];
        let overlay = Overlay {
            config: Some(ConfigOverlay {
                envs: vec![EnvOverlay {
                    name: "DB_HOST".to_string(),
                    key: "db.host".to_string(),
                    config_name: "hello-config".to_string(),
                }],
            }),
            ..Default::default()
        };

        let env = resolve_env(&spec, Some(&overlay));

        assert_eq!(
            env,
            vec![
                EnvVar::literal("DB_HOST", "localhost"),
                EnvVar::from_config_map("DB_HOST", "hello-config", "db.host"),
            ]
        );
    }

    #[test]
    fn image_overlay_recomputes_image() {
        let overlay = Overlay {
            container: Some(ContainerOverlay {
                image: Some(ImageOverlay {
                    name: None,
                    repository: Some("registry.example.com".to_string()),
                    tag: Some("2.0.0".to_string()),
                    base: Some("eclipse-temurin:17-jre".to_string()),
                }),
            }),
            ..Default::default()
        };

        let image = resolve_image(&base(), Some(&overlay)).unwrap();

        assert_eq!(
            image,
            ResolvedImage {
                image: "registry.example.com/hello:2.0.0".to_string(),
                registry: Some("registry.example.com".to_string()),
                base_image: Some("eclipse-temurin:17-jre".to_string()),
            }
        );
    }

    #[test]
    fn image_name_falls_back_to_workload_name() {
        let mut spec = base();
        spec.image.clear();
        let overlay = Overlay {
            container: Some(ContainerOverlay {
                image: Some(ImageOverlay::default()),
            }),
            ..Default::default()
        };

        let image = resolve_image(&spec, Some(&overlay)).unwrap();

        assert_eq!(image.image, "hello:latest");
        assert_eq!(image.registry, None);
    }

    #[test]
    fn declared_registry_is_prefixed() {
        let mut spec = base();
        spec.registry = Some("r.example.com".to_string());
        let image = resolve_image(&spec, None).unwrap();
        assert_eq!(image.image, "r.example.com/hello:1.0.0");

        spec.image = "r.example.com/hello:1.0.0".to_string();
        let image = resolve_image(&spec, None).unwrap();
        assert_eq!(image.image, "r.example.com/hello:1.0.0");
    }

    #[test]
    fn overlay_without_name_uses_workload_name() {
        let mut spec = base();
        spec.image = "legacy-app:1.0.0".to_string();
        let overlay = Overlay {
            container: Some(ContainerOverlay {
                image: Some(ImageOverlay {
                    tag: Some("2.0.0".to_string()),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };

        let image = resolve_image(&spec, Some(&overlay)).unwrap();

        assert_eq!(image.image, "hello:2.0.0");
    }

    #[test]
    fn declared_registry_gains_default_tag() {
        let mut spec = base();
        spec.registry = Some("r.io".to_string());
        spec.image = "hello".to_string();

        let image = resolve_image(&spec, None).unwrap();

        assert_eq!(image.image, "r.io/hello:latest");
        assert_eq!(image.registry.as_deref(), Some("r.io"));
    }

    #[test]
    fn absent_overlay_is_identity_apart_from_labels() {
        let spec = base();
        let resolved = resolve(&spec, None).unwrap();
        assert_eq!(resolved.labels, Labels::new().insert("app", "hello"));
        assert_eq!(
            WorkloadSpec {
                labels: spec.labels.clone(),
                ..resolved
            },
            spec
        );
    }

    #[test]
    fn base_name_strips_postfix() {
        assert_eq!(base_name("hello-deployment"), "hello");
        assert_eq!(base_name("hello"), "hello");
    }
}
