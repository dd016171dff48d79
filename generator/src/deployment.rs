use resources::{
    objects::{
        deployment::{Deployment, DeploymentSpec, LabelSelector},
        pod::{
            Container, ExecAction, Lifecycle, LifecycleHandler, LocalObjectReference, PodSpec,
            PodTemplateSpec, TemplateMetadata,
        },
        Metadata,
    },
};

use crate::{
    error::{Error, Result},
    validator::ValidatedSpec,
    volume::VolumeBindings,
};

pub const DEPLOYMENT_API_VERSION: &str = "apps/v1";

/// Seconds a terminating container waits so in-flight connections drain.
pub const PRE_STOP_SLEEP_SECONDS: u32 = 15;

/// Hook run before a container is stopped. Not configurable.
pub fn pre_stop_hook() -> Lifecycle {
    Lifecycle {
        pre_stop: LifecycleHandler {
            exec: ExecAction {
                command: vec!["sleep".to_string(), PRE_STOP_SLEEP_SECONDS.to_string()],
            },
        },
    }
}

pub fn image_pull_secrets(names: &[String]) -> Vec<LocalObjectReference> {
    names
        .iter()
        .map(|name| LocalObjectReference {
            name: name.clone(),
        })
        .collect()
}

/// Builds the Deployment. The selector and the pod template share one label set.
pub fn assemble(spec: &ValidatedSpec, bindings: VolumeBindings) -> Deployment {
    let container = Container {
        name: spec.name.clone(),
        image: spec.image.clone(),
        image_pull_policy: spec.image_pull_policy.unwrap_or_default(),
        ports: spec.ports.clone(),
        env: spec.env.clone(),
        volume_mounts: bindings.mounts,
        liveness_probe: spec.liveness_probe.clone(),
        readiness_probe: spec.readiness_probe.clone(),
        resources: spec.resources.clone(),
        lifecycle: Some(pre_stop_hook()),
    };

    Deployment {
        api_version: DEPLOYMENT_API_VERSION.to_string(),
        metadata: Metadata {
            name: spec.name.clone(),
            namespace: spec.namespace.clone(),
            labels: spec.labels.clone(),
            annotations: spec.annotations.clone(),
        },
        spec: DeploymentSpec {
            selector: LabelSelector {
                match_labels: spec.labels.clone(),
            },
            strategy: spec.strategy.clone(),
            replicas: spec.replicas,
            template: PodTemplateSpec {
                metadata: TemplateMetadata {
                    labels: spec.labels.clone(),
                    annotations: spec.pod_annotations.clone(),
                },
                spec: PodSpec {
                    containers: vec![container],
                    image_pull_secrets: image_pull_secrets(&spec.image_pull_secrets),
                    volumes: bindings.volumes,
                    node_selector: spec.node_selector.clone(),
                    restart_policy: None,
                },
            },
        },
    }
}

/// The selector must equal the label set of the pods the template creates.
pub fn check_selector(deployment: &Deployment) -> Result<()> {
    let selector = &deployment.spec.selector.match_labels;
    if *selector == deployment.spec.template.metadata.labels {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "selector '{}' of {} does not match its pod template",
            selector, deployment.metadata.name
        )))
    }
}
